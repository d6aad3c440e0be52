//! Request handlers

use appinfo_common::{describe_error, describe_panic, text_success, ResultExt};
use axum::{
    extract::{Query, State},
    response::Response,
};

use super::state::AppState;

/// Name of the query parameter carrying the filter
pub const KEYS_PARAM: &str = "keys";

/// Split a `keys` value on commas, trimming and dropping empty segments
pub fn parse_keys(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Collect, filter and render a snapshot
///
/// Always answers 200; a failed collection is reported in the body.
pub async fn snapshot(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let raw = params
        .iter()
        .find(|(name, _)| name == KEYS_PARAM)
        .map(|(_, value)| value.as_str());
    let keys = parse_keys(raw);
    tracing::debug!(?keys, "snapshot requested");

    let collector = state.collector.clone();
    let body = match tokio::task::spawn_blocking(move || collector.pretty_print_matching(&keys)).await {
        Ok(rendered) => {
            if let Err(e) = &rendered {
                tracing::warn!(error = %e, "collection failed");
            }
            rendered.or_describe()
        }
        Err(e) if e.is_panic() => {
            let text = describe_panic(&*e.into_panic());
            tracing::error!("collection {}", text);
            text
        }
        Err(e) => describe_error(&e),
    };

    text_success(body)
}
