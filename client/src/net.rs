use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Window};

use digitpad_shared::{SubmitRequest, SubmitResponse, SUBMIT_PATH};

pub const MSG_NO_LABEL: &str = "Please choose the correct digit label.";
pub const MSG_SENDING: &str = "Sending sample...";
pub const MSG_SAVED: &str = "Sample saved, thank you! You can draw another one.";
pub const MSG_FAILED: &str = "Failed to send sample. Check your connection and try again.";

/// Success needs both the transport-level signal and the server's own
/// acknowledgment. A server-supplied message is surfaced verbatim; every
/// other failure collapses to the generic one.
pub fn response_outcome(transport_ok: bool, body: Option<SubmitResponse>) -> Result<(), String> {
    match body {
        Some(SubmitResponse::Ok { .. }) if transport_ok => Ok(()),
        Some(SubmitResponse::Error {
            message: Some(message),
        }) => Err(message),
        _ => Err(MSG_FAILED.to_string()),
    }
}

/// One attempt, no timeout, no cancellation. The error string is what the
/// status region should show.
pub async fn submit_sample(window: &Window, label: String, image: String) -> Result<(), String> {
    let payload = SubmitRequest { label, image };
    let body = serde_json::to_string(&payload).map_err(|_| MSG_FAILED.to_string())?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&JsValue::from_str(&body));
    let request =
        Request::new_with_str_and_init(SUBMIT_PATH, &init).map_err(|_| MSG_FAILED.to_string())?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(|_| MSG_FAILED.to_string())?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| MSG_FAILED.to_string())?;
    let response: Response = response.dyn_into().map_err(|_| MSG_FAILED.to_string())?;

    let transport_ok = response.ok();
    let parsed = match response.text() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .ok()
            .and_then(|value| value.as_string())
            .and_then(|text| serde_json::from_str::<SubmitResponse>(&text).ok()),
        Err(_) => None,
    };
    response_outcome(transport_ok, parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_transport_and_ok_status_is_success() {
        let outcome = response_outcome(true, Some(SubmitResponse::Ok { filename: None }));
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn application_error_message_is_surfaced_verbatim() {
        let outcome = response_outcome(
            true,
            Some(SubmitResponse::Error {
                message: Some("bad image".to_string()),
            }),
        );
        assert_eq!(outcome, Err("bad image".to_string()));
    }

    #[test]
    fn application_error_without_message_is_generic() {
        let outcome = response_outcome(false, Some(SubmitResponse::Error { message: None }));
        assert_eq!(outcome, Err(MSG_FAILED.to_string()));
    }

    #[test]
    fn missing_or_unparseable_body_is_generic_failure() {
        assert_eq!(response_outcome(true, None), Err(MSG_FAILED.to_string()));
        assert_eq!(response_outcome(false, None), Err(MSG_FAILED.to_string()));
    }

    #[test]
    fn ok_body_on_failed_transport_is_still_failure() {
        let outcome = response_outcome(
            false,
            Some(SubmitResponse::Ok {
                filename: Some("digit_7_x.png".to_string()),
            }),
        );
        assert_eq!(outcome, Err(MSG_FAILED.to_string()));
    }

    #[test]
    fn error_message_wins_over_transport_success() {
        // 2xx with an application-level failure field is a failure.
        let outcome = response_outcome(
            true,
            Some(SubmitResponse::Error {
                message: Some("storage full".to_string()),
            }),
        );
        assert_eq!(outcome, Err("storage full".to_string()));
    }
}
