//! Core domain types for SAP table definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FieldRecord
// ---------------------------------------------------------------------------

/// One column definition within a table definition.
///
/// Every value is a trimmed string taken verbatim from the source page;
/// no column is assumed non-empty. Ordinal position within
/// [`TableDefinition::fields`] mirrors the field order in the SAP table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Technical field name (e.g., `MATNR`).
    pub name: String,
    /// Short field description.
    pub description: String,
    /// Underlying data element.
    pub data_element: String,
    /// ABAP data type (e.g., `CHAR`).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Field length.
    pub length: String,
    /// Decimal places.
    pub decimals: String,
}

// ---------------------------------------------------------------------------
// TableDefinition
// ---------------------------------------------------------------------------

/// The structural description of one SAP database table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name (e.g., `MARA`), derived from the page's primary heading.
    pub name: String,
    /// Table description, taken from the page's secondary heading.
    pub description: String,
    /// Ordered field list; empty when the page had no recognizable table.
    pub fields: Vec<FieldRecord>,
    /// Generated analysis, attached once per successful pipeline run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_feedback: Option<FeedbackBlock>,
}

// ---------------------------------------------------------------------------
// FeedbackBlock
// ---------------------------------------------------------------------------

/// The generated natural-language analysis attached to a table definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackBlock {
    /// Trimmed model response text (empty if the model returned no text).
    pub analysis: String,
    /// When the analysis was generated.
    pub timestamp: DateTime<Utc>,
    /// Identifier of the model that produced the analysis.
    pub model: String,
    /// Version of the prompt the analysis was generated with.
    pub prompt_version: String,
}

// ---------------------------------------------------------------------------
// TableResult
// ---------------------------------------------------------------------------

/// Error document replacing a table definition when a pipeline step fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
}

/// Outcome of one table's pipeline run.
///
/// Untagged: a success serializes to the bare table definition, a failure
/// to `{"error": "..."}` — never a merge of the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableResult {
    Table(TableDefinition),
    Error(ErrorResult),
}

impl TableResult {
    /// Wrap a failure message as a row-level error result.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorResult {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

// ---------------------------------------------------------------------------
// BatchResult
// ---------------------------------------------------------------------------

/// The consolidated document aggregating all per-table results of one
/// batch run, one entry per input row, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// When the batch finished processing.
    pub processed_at: DateTime<Utc>,
    /// Per-table outcomes; failed rows keep their slot.
    pub tables: Vec<TableResult>,
}
