//! JSON API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rsvp_common::{Error, RsvpRecord, RsvpSubmission, Tally};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EventDetails;
use crate::service::RsvpService;

/// Shared application state
pub struct AppState {
    pub service: RsvpService,
    pub event: EventDetails,
    pub expose_error_details: bool,
}

impl AppState {
    pub fn new(service: RsvpService) -> Self {
        Self {
            service,
            event: EventDetails::default(),
            expose_error_details: false,
        }
    }

    pub fn with_event(mut self, event: EventDetails) -> Self {
        self.event = event;
        self
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }
}

/// API Error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    /// Map a pipeline error to a response, attaching the cause only when allowed
    pub fn from_error(err: Error, expose_details: bool) -> Self {
        let (status, message) = match &err {
            Error::Validation(msg) => return ApiError::bad_request(msg.clone()),
            Error::StoreWrite(_) | Error::JsonSerialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "save failed")
            }
            Error::StoreList(_) | Error::StoreRead(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch")
            }
            Error::Other(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };

        ApiError {
            status,
            message: message.to_string(),
            details: expose_details.then(|| err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "error": self.message
        });
        if let Some(details) = self.details {
            body["details"] = serde_json::Value::String(details);
        }

        (self.status, Json(body)).into_response()
    }
}

/// Response from a successful submission
#[derive(Debug, Serialize)]
pub struct SubmitRsvpResponse {
    pub success: bool,
    pub id: String,
}

/// All collected records
#[derive(Debug, Serialize)]
pub struct ListRsvpsResponse {
    pub success: bool,
    pub count: usize,
    pub rsvps: Vec<RsvpRecord>,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "rsvp-service"
    }))
}

/// Hint for anyone hitting the submission endpoint with a browser
pub async fn rsvp_status_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "RSVP API is working. Use POST to submit a response."
    }))
}

/// Submit one RSVP
///
/// POST /rsvp
pub async fn submit_rsvp_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RsvpSubmission>, JsonRejection>,
) -> Result<Json<SubmitRsvpResponse>, ApiError> {
    let Json(submission) = payload.map_err(|rejection| {
        warn!("Rejected RSVP body: {}", rejection);
        ApiError::bad_request("invalid request body")
    })?;

    let rsvp = state
        .service
        .submit(submission)
        .await
        .map_err(|e| ApiError::from_error(e, state.expose_error_details))?;

    Ok(Json(SubmitRsvpResponse {
        success: true,
        id: rsvp.id,
    }))
}

/// List all RSVPs, newest first
///
/// GET /admin/rsvps
pub async fn list_rsvps_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ListRsvpsResponse>, ApiError> {
    info!("Listing RSVPs");

    let rsvps = state
        .service
        .collect()
        .await
        .map_err(|e| ApiError::from_error(e, state.expose_error_details))?;

    Ok(Json(ListRsvpsResponse {
        success: true,
        count: rsvps.len(),
        rsvps,
    }))
}

/// Yes/no counts
///
/// GET /admin/stats
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Result<Json<Tally>, ApiError> {
    let tally = state
        .service
        .tally()
        .await
        .map_err(|e| ApiError::from_error(e, state.expose_error_details))?;

    Ok(Json(tally))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err = ApiError::from_error(Error::Validation("name and response required".into()), true);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "name and response required");
        assert!(err.details.is_none());

        let err = ApiError::from_error(Error::StoreWrite("connection reset".into()), false);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "save failed");
        assert!(err.details.is_none());

        let err = ApiError::from_error(Error::StoreList("timed out".into()), true);
        assert_eq!(err.message, "failed to fetch");
        assert_eq!(err.details.as_deref(), Some("Store list failed: timed out"));
    }
}
