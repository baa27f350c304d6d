//! # Model
//! Upstream item records and the aggregate result served by the API.

use serde::{Deserialize, Serialize};

/// Status marker for a successful pass that produced data.
pub const STATUS_OK: u16 = 200;
/// Status marker for a pass where upstream returned no IDs.
pub const STATUS_NO_DATA: u16 = 204;
/// Status marker for a failed pass.
pub const STATUS_FAILURE: u16 = 500;

/// One upstream record (story, comment, job, poll, ...).
///
/// Nothing is required on decode; missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<i64>,
}

impl Item {
    /// A story is an item of type "story" (any case) with a non-blank url.
    pub fn is_story(&self) -> bool {
        let kind_ok = self
            .kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case("story"));
        let url_ok = self.url.as_deref().is_some_and(|u| !u.trim().is_empty());
        kind_ok && url_ok
    }
}

/// Result of one aggregate pass, also the JSON body of the endpoint.
///
/// Built only through [`AggregateResult::stories`], [`AggregateResult::no_data`]
/// and [`AggregateResult::failure`], so `data` is present iff the status is 200.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    status_code: u16,
    data: Option<Vec<Item>>,
    error_message: Option<String>,
}

impl AggregateResult {
    pub fn stories(items: Vec<Item>) -> Self {
        Self {
            status_code: STATUS_OK,
            data: Some(items),
            error_message: None,
        }
    }

    pub fn no_data() -> Self {
        Self {
            status_code: STATUS_NO_DATA,
            data: None,
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_FAILURE,
            data: None,
            error_message: Some(message.into()),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn data(&self) -> Option<&[Item]> {
        self.data.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}
