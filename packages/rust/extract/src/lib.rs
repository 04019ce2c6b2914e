//! HTML → structured table-definition extraction.
//!
//! Parses one table-definition page into a [`TableDefinition`]. This is a
//! total function over arbitrary HTML: absent headings degrade to empty
//! strings, an absent field table to an empty field list, and malformed
//! rows are skipped — extraction never fails.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use sapscout_shared::{FieldRecord, TableDefinition};

/// CSS selector for the field table on a table-definition page.
const FIELD_TABLE_SELECTOR: &str = "table.table-condensed";

/// Minimum number of cells a row must have to be treated as a field row.
const MIN_FIELD_CELLS: usize = 8;

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Target field for one positional column of the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldColumn {
    Name,
    Description,
    DataElement,
    Type,
    Length,
    Decimals,
}

/// Positional column → field mapping for the condensed field table.
///
/// Indices 3 and 5 hold layout-only columns in the source markup and are
/// intentionally unmapped.
pub const COLUMN_MAP: [(usize, FieldColumn); 6] = [
    (0, FieldColumn::Name),
    (1, FieldColumn::Description),
    (2, FieldColumn::DataElement),
    (4, FieldColumn::Type),
    (6, FieldColumn::Length),
    (7, FieldColumn::Decimals),
];

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract a table definition from one HTML document.
///
/// The table name is the final whitespace-separated token of the first
/// `<h1>`; the description is the text of the first `<h2>`; fields come
/// from the condensed field table, header row skipped, in row order.
pub fn extract(html: &str) -> TableDefinition {
    let doc = Html::parse_document(html);

    let name = first_text(&doc, "h1")
        .and_then(|text| text.split_whitespace().last().map(str::to_string))
        .unwrap_or_default();

    let description = first_text(&doc, "h2").unwrap_or_default();

    let fields = extract_fields(&doc);
    debug!(name, fields = fields.len(), "extracted table definition");

    TableDefinition {
        name,
        description,
        fields,
        agent_feedback: None,
    }
}

/// Trimmed text of the first element matching `selector`, if any.
fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).unwrap();
    doc.select(&sel).next().map(element_text)
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Collect field records from the condensed field table.
fn extract_fields(doc: &Html) -> Vec<FieldRecord> {
    let table_sel = Selector::parse(FIELD_TABLE_SELECTOR).unwrap();
    let Some(table) = doc.select(&table_sel).next() else {
        return Vec::new();
    };

    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let mut fields = Vec::new();
    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
        if cells.len() < MIN_FIELD_CELLS {
            continue;
        }
        fields.push(field_from_cells(&cells));
    }
    fields
}

/// Apply [`COLUMN_MAP`] to one row's cell texts.
fn field_from_cells(cells: &[String]) -> FieldRecord {
    let mut field = FieldRecord::default();
    for (index, column) in COLUMN_MAP {
        let value = cells[index].clone();
        match column {
            FieldColumn::Name => field.name = value,
            FieldColumn::Description => field.description = value,
            FieldColumn::DataElement => field.data_element = value,
            FieldColumn::Type => field.field_type = value,
            FieldColumn::Length => field.length = value,
            FieldColumn::Decimals => field.decimals = value,
        }
    }
    field
}
