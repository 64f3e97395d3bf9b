use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;

use digitpad_shared::{SubmitRequest, SubmitResponse};

use crate::logic::{client_ip, sample_filename, timestamp_token, validate_submission};
use crate::state::AppState;
use crate::storage::SampleRecord;

pub async fn submit_handler(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<SubmitRequest>,
) -> (StatusCode, Json<SubmitResponse>) {
    let bytes = match validate_submission(&request) {
        Ok(bytes) => bytes,
        Err(message) => {
            eprintln!("Sample rejected label={:?} reason={message}", request.label);
            return (
                StatusCode::BAD_REQUEST,
                Json(SubmitResponse::Error {
                    message: Some(message),
                }),
            );
        }
    };

    let token = timestamp_token(Utc::now());
    let filename = sample_filename(&request.label, &token);
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());
    let record = SampleRecord {
        filename: filename.clone(),
        label: request.label.clone(),
        timestamp: token,
        ip: client_ip(forwarded, peer),
    };

    match state.storage.store_sample(&record, &bytes).await {
        Ok(()) => {
            eprintln!(
                "Sample stored file={filename} label={} bytes={}",
                record.label,
                bytes.len()
            );
            (
                StatusCode::OK,
                Json(SubmitResponse::Ok {
                    filename: Some(filename),
                }),
            )
        }
        Err(error) => {
            eprintln!("Sample store failed file={filename} error={error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse::Error {
                    message: Some("Failed to store sample".to_string()),
                }),
            )
        }
    }
}
