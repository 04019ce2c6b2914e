//! Single-table pipeline: fetch → extract → summarize → persist.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{info, instrument, warn};

use sapscout_gemini::TextGenerator;
use sapscout_shared::{Result, SapScoutError, TableResult};

use crate::persist::save_json;
use crate::summarize;

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("sapscout/", env!("CARGO_PKG_VERSION"));

/// Timeout for page fetches.
const FETCH_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client used for page fetches.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| SapScoutError::Fetch(format!("failed to build HTTP client: {e}")))
}

/// Process one table page end to end.
///
/// Fetch and generation failures short-circuit into a row-level
/// [`TableResult::Error`]; when summarization fails, the extracted
/// structural data is discarded with it. A failed write of the enriched
/// record is logged but does not fail the row.
#[instrument(skip_all, fields(url = %url))]
pub async fn process_url(
    client: &Client,
    generator: &dyn TextGenerator,
    url: &str,
    output_path: &Path,
) -> TableResult {
    let html = match fetch_page(client, url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "page fetch failed");
            return TableResult::error(e.to_string());
        }
    };

    let mut def = sapscout_extract::extract(&html);

    let feedback = match summarize::summarize(generator, &def).await {
        Ok(feedback) => feedback,
        Err(e) => {
            warn!(table = %def.name, error = %e, "summarization failed, discarding extracted data");
            return TableResult::error(e.to_string());
        }
    };
    def.agent_feedback = Some(feedback);

    save_json(&def, output_path);

    info!(table = %def.name, fields = def.fields.len(), "table processed");
    TableResult::Table(def)
}

/// Fetch one page body, treating non-2xx statuses as errors.
async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SapScoutError::Fetch(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SapScoutError::Fetch(format!("{url}: HTTP {status}")));
    }

    response
        .text()
        .await
        .map_err(|e| SapScoutError::Fetch(format!("{url}: body read failed: {e}")))
}
