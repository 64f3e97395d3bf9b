use serde::{Deserialize, Serialize};

/// Path of the sample-collection endpoint.
pub const SUBMIT_PATH: &str = "/api/submit";

/// Labels an operator may attach to a sample.
pub const LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Required prefix of the `image` field of a submission.
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

pub fn is_valid_label(value: &str) -> bool {
    LABELS.contains(&value)
}

/// Body of `POST /api/submit`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SubmitRequest {
    pub label: String,
    pub image: String,
}

/// Reply to a submission. `status` is the acknowledgment field: only
/// `"ok"` on a 2xx response counts as success.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmitResponse {
    Ok {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}
