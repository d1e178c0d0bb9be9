use crate::error::{BudgetPortalError, Result};
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

const FETCH_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Fetches one remote CSV source as text.
///
/// Transport errors and 5xx responses are retried up to
/// [`FETCH_ATTEMPTS`] times; a non-success status that is not a server
/// error fails immediately. Either way the caller sees a single
/// source-load failure and no partial data.
pub async fn fetch_source(client: &Client, url: &str) -> Result<String> {
    let mut last_error: Option<BudgetPortalError> = None;

    for attempt in 1..=FETCH_ATTEMPTS {
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    debug!("Fetched {} ({} attempt(s))", url, attempt);
                    return Ok(response.text().await?);
                }

                let error = BudgetPortalError::SourceLoad {
                    url: url.to_string(),
                    details: format!("HTTP status {}", status),
                };
                if !status.is_server_error() {
                    return Err(error);
                }
                last_error = Some(error);
            }
            Err(e) => last_error = Some(e.into()),
        }

        if attempt < FETCH_ATTEMPTS {
            warn!("Fetch of {} failed (attempt {}), retrying", url, attempt);
            sleep(RETRY_DELAY).await;
        }
    }

    Err(last_error.unwrap_or_else(|| BudgetPortalError::SourceLoad {
        url: url.to_string(),
        details: "exhausted retries".to_string(),
    }))
}

/// Loads the budget and chart-of-accounts sources. Awaited
/// sequentially; aggregation must not start until both are present, so
/// a failure on either halts the pipeline.
pub async fn load_portal_sources(
    budget_url: &str,
    directory_url: &str,
) -> Result<(String, String)> {
    let client = Client::new();
    let budget = fetch_source(&client, budget_url).await?;
    let directory = fetch_source(&client, directory_url).await?;
    Ok((budget, directory))
}
