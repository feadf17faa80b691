//! REST handlers, one module per feature area.

pub mod compliance;
pub mod failure;
pub mod narrative;
pub mod observability;
pub mod platform;
pub mod regulation;

use axum::{http::StatusCode, Json};
use chrono::{DateTime, Duration, Utc};

use crate::api_errors::ApiError;

/// Success envelope: `{"status": "success", "data": ...}`.
pub fn ok(data: serde_json::Value) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "success", "data": data }))
}

/// Success envelope with 201 Created.
pub fn created(data: serde_json::Value) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::CREATED, ok(data))
}

/// Unwrap a required request field, naming it in the 400 message.
pub fn required<T>(field: Option<T>, name: &str) -> Result<T, ApiError> {
    field.ok_or_else(|| ApiError::bad_request(format!("Missing required field: {name}")))
}

/// Start of a dashboard time window: 1h, 24h, 7d, anything else 30d.
pub fn window_start(time_range: &str) -> DateTime<Utc> {
    let now = Utc::now();
    match time_range {
        "1h" => now - Duration::hours(1),
        "24h" => now - Duration::days(1),
        "7d" => now - Duration::days(7),
        _ => now - Duration::days(30),
    }
}

/// Standard pagination block for list responses.
pub fn pagination(total: usize, limit: usize, offset: usize) -> serde_json::Value {
    serde_json::json!({
        "total_count": total,
        "limit": limit,
        "offset": offset,
        "has_more": offset + limit < total,
    })
}

pub fn default_limit() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_reports_field_name() {
        let err = required(None::<String>, "organization_id").unwrap_err();
        assert!(err.to_string().contains("organization_id"));
        assert_eq!(required(Some(1), "x").unwrap(), 1);
    }

    #[test]
    fn pagination_has_more_flag() {
        let page = pagination(100, 50, 0);
        assert_eq!(page["has_more"], true);
        let page = pagination(100, 50, 50);
        assert_eq!(page["has_more"], false);
    }

    #[test]
    fn window_start_defaults_to_thirty_days() {
        let start = window_start("bogus");
        assert!(Utc::now() - start > Duration::days(29));
    }
}
