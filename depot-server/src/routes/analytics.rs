use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use content_store::{FrequencyOrder, StoreError, DEFAULT_FREQUENCY_LIMIT};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wc", get(word_count))
        .route("/fw", get(frequent_words))
}

async fn word_count(
    State(state): State<AppState>,
) -> Result<String, ApiError> {
    let count = state.analytics.word_count()?;
    Ok(format!("All files contain {count} words\n"))
}

/// Raw query parameters; validation happens below so that a malformed value
/// is a proper `InvalidArgument` rather than a rejected extractor.
#[derive(Debug, Deserialize)]
struct FrequencyParams {
    limit: Option<String>,
    order: Option<String>,
}

fn parse_limit(raw: Option<&str>) -> Result<usize, StoreError> {
    match raw {
        None | Some("") => Ok(DEFAULT_FREQUENCY_LIMIT),
        Some(s) => s.parse::<usize>().map_err(|_| {
            StoreError::InvalidArgument(format!(
                "invalid `limit` value `{s}`, expected a non-negative integer"
            ))
        }),
    }
}

fn parse_order(raw: Option<&str>) -> Result<FrequencyOrder, StoreError> {
    match raw {
        None | Some("") => Err(StoreError::InvalidArgument(
            "missing `order` parameter, use `asc` or `dsc`".to_owned(),
        )),
        Some(s) => s.parse(),
    }
}

async fn frequent_words(
    State(state): State<AppState>,
    Query(params): Query<FrequencyParams>,
) -> Result<String, ApiError> {
    let order = parse_order(params.order.as_deref())?;
    let limit = parse_limit(params.limit.as_deref())?;

    let words = state.analytics.frequency(limit, order)?;
    let direction = match order {
        FrequencyOrder::Dsc => "most",
        FrequencyOrder::Asc => "least",
    };

    let mut out =
        format!("The {} {} frequent words are:\n", words.len(), direction);
    for word in &words {
        out.push_str(word);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_parses() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_FREQUENCY_LIMIT);
        assert_eq!(parse_limit(Some("")).unwrap(), DEFAULT_FREQUENCY_LIMIT);
        assert_eq!(parse_limit(Some("12")).unwrap(), 12);
        assert_eq!(parse_limit(Some("0")).unwrap(), 0);
    }

    #[test]
    fn limit_rejects_garbage_and_negatives() {
        for bad in ["-1", "3.5", "ten", " 7"] {
            let err = parse_limit(Some(bad)).unwrap_err();
            assert!(matches!(err, StoreError::InvalidArgument(_)));
        }
    }

    #[test]
    fn order_is_required_and_validated() {
        assert_eq!(parse_order(Some("asc")).unwrap(), FrequencyOrder::Asc);
        assert_eq!(parse_order(Some("dsc")).unwrap(), FrequencyOrder::Dsc);

        for bad in [None, Some(""), Some("xyz"), Some("desc")] {
            let err = parse_order(bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidArgument(_)));
        }
    }
}
