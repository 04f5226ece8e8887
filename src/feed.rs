use crate::coerce::RawExpenditureRow;
use crate::error::{DashboardError, Result};
use log::warn;
use serde_json::Value;

/// Validates the feed payload's overall shape and extracts its rows.
///
/// Only a payload that is not a JSON array is fatal. An array element
/// that cannot be read as a row object is skipped with a warning — the
/// same isolation policy as malformed cells inside a row.
pub fn rows_from_payload(payload: Value) -> Result<Vec<RawExpenditureRow>> {
    let Value::Array(items) = payload else {
        return Err(DashboardError::InvalidFeedFormat(describe_shape(&payload)));
    };

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<RawExpenditureRow>(item) {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping feed element that is not a row object: {e}"),
        }
    }
    Ok(rows)
}

fn describe_shape(payload: &Value) -> String {
    match payload {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Object(_) => "an object".to_string(),
        Value::Array(_) => "an array".to_string(),
    }
}

/// One-shot GET of the dynamic expenditure feed.
///
/// No retry, no partial results: a non-success status or a body that is
/// not valid JSON surfaces as `FeedUnavailable`, a JSON body that is not
/// an array as `InvalidFeedFormat`, and the caller is expected to flip
/// the dashboard into its error state.
#[cfg(feature = "fetch")]
pub async fn fetch_expenditure_rows(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<RawExpenditureRow>> {
    use log::info;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DashboardError::FeedUnavailable(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DashboardError::FeedUnavailable(format!(
            "HTTP status {status}"
        )));
    }

    let payload: Value = response
        .json()
        .await
        .map_err(|e| DashboardError::FeedUnavailable(format!("body is not valid JSON: {e}")))?;

    let rows = rows_from_payload(payload)?;
    info!("Fetched {} expenditure rows from {url}", rows.len());
    Ok(rows)
}
