//! Uniform JSON body shared by every API response.

use serde::Serialize;

use ergo_domain::params::ListParams;
use ergo_domain::time;

/// `{status, message, timestamp, data?, meta?}`.
///
/// `data` is omitted when `None`; a `Some(())` payload serializes as
/// `"data": null`, which is what successful deletes return.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListParams>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `data`.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            timestamp: time::rfc3339(time::now()),
            data: Some(data),
            meta: None,
        }
    }

    /// Attach the pagination window that produced `data`.
    #[must_use]
    pub fn with_meta(mut self, meta: ListParams) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl Envelope<()> {
    /// Successful response without a payload.
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            timestamp: time::rfc3339(time::now()),
            data: None,
            meta: None,
        }
    }

    /// Failed response; never carries data.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            timestamp: time::rfc3339(time::now()),
            data: None,
            meta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_omit_data_and_meta_on_failure() {
        let json = serde_json::to_value(Envelope::failure("todo not found")).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["status"], false);
        assert_eq!(obj["message"], "todo not found");
        assert!(obj.contains_key("timestamp"));
        assert!(!obj.contains_key("data"));
        assert!(!obj.contains_key("meta"));
    }

    #[test]
    fn should_serialize_unit_payload_as_null() {
        let json = serde_json::to_value(Envelope::success("deleted", ())).unwrap();
        assert!(json.as_object().unwrap().contains_key("data"));
        assert!(json["data"].is_null());
    }

    #[test]
    fn should_echo_meta() {
        let json = serde_json::to_value(
            Envelope::success("ok", Vec::<u8>::new()).with_meta(ListParams::new(3, 4)),
        )
        .unwrap();
        assert_eq!(json["meta"], serde_json::json!({"page": 3, "per_page": 4}));
    }

    #[test]
    fn should_stamp_rfc3339_seconds() {
        let envelope = Envelope::acknowledged("ok");
        assert!(envelope.timestamp.ends_with('Z'));
        assert!(!envelope.timestamp.contains('.'));
    }
}
