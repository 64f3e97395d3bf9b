use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use data_url::DataUrl;

use digitpad_shared::{is_valid_label, SubmitRequest, PNG_DATA_URL_PREFIX};

use crate::state::MAX_IMAGE_BYTES;

/// Checks a submission and decodes its raster. Validation order and error
/// strings follow the collection contract: label first, then the data-URL
/// prefix, then the base64 payload.
pub fn validate_submission(request: &SubmitRequest) -> Result<Vec<u8>, String> {
    if !is_valid_label(&request.label) {
        return Err("Invalid or missing label".to_string());
    }
    if !request.image.starts_with(PNG_DATA_URL_PREFIX) {
        return Err("Invalid image data".to_string());
    }
    let url = DataUrl::process(&request.image).map_err(|_| "Failed to decode image".to_string())?;
    let (bytes, _) = url
        .decode_to_vec()
        .map_err(|_| "Failed to decode image".to_string())?;
    if bytes.is_empty() {
        return Err("Failed to decode image".to_string());
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err("Image too large".to_string());
    }
    Ok(bytes)
}

/// UTC timestamp compressed to a filename-safe token, microsecond
/// precision. The same token names the image file and the CSV row.
pub fn timestamp_token(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%S%6fZ").to_string()
}

pub fn sample_filename(label: &str, token: &str) -> String {
    format!("digit_{label}_{token}.png")
}

/// First forwarded hop when behind a proxy, else the socket peer.
pub fn client_ip(forwarded: Option<&str>, peer: SocketAddr) -> String {
    if let Some(value) = forwarded {
        let first = value.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }
    peer.ip().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(label: &str, image: &str) -> SubmitRequest {
        SubmitRequest {
            label: label.to_string(),
            image: image.to_string(),
        }
    }

    #[test]
    fn valid_submission_decodes_bytes() {
        // "hello" in base64; validation does not sniff the PNG magic.
        let bytes = validate_submission(&request("7", "data:image/png;base64,aGVsbG8=")).unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn bad_label_is_rejected_first() {
        let err = validate_submission(&request("x", "data:image/png;base64,aGVsbG8=")).unwrap_err();
        assert_eq!(err, "Invalid or missing label");

        let err = validate_submission(&request("", "not even an image")).unwrap_err();
        assert_eq!(err, "Invalid or missing label");
    }

    #[test]
    fn non_png_data_url_is_rejected() {
        let err = validate_submission(&request("3", "data:image/jpeg;base64,aGVsbG8=")).unwrap_err();
        assert_eq!(err, "Invalid image data");
    }

    #[test]
    fn broken_base64_is_rejected() {
        let err = validate_submission(&request("3", "data:image/png;base64,!!!")).unwrap_err();
        assert_eq!(err, "Failed to decode image");
    }

    #[test]
    fn empty_payload_is_rejected() {
        let err = validate_submission(&request("3", "data:image/png;base64,")).unwrap_err();
        assert_eq!(err, "Failed to decode image");
    }

    #[test]
    fn timestamp_token_is_filename_safe() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 9, 30, 5).unwrap();
        assert_eq!(timestamp_token(now), "20260806T093005000000Z");
    }

    #[test]
    fn filename_embeds_label_and_token() {
        assert_eq!(
            sample_filename("7", "20260806T093005000000Z"),
            "digit_7_20260806T093005000000Z.png"
        );
    }

    #[test]
    fn forwarded_header_wins_over_peer() {
        let peer = SocketAddr::from(([127, 0, 0, 1], 4000));
        assert_eq!(client_ip(Some("203.0.113.9"), peer), "203.0.113.9");
        assert_eq!(
            client_ip(Some("203.0.113.9, 10.0.0.1"), peer),
            "203.0.113.9"
        );
        assert_eq!(client_ip(Some("  "), peer), "127.0.0.1");
        assert_eq!(client_ip(None, peer), "127.0.0.1");
    }
}
