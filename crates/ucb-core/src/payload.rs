//! Web-app payload contract.
//!
//! The embedded calculator sends one JSON document per action:
//! `{ "type": "share"|"export", "data": {...}, "message": "...",
//! "timestamp": "..." }`. The tag is decoded once, here, into a closed
//! enum with an explicit arm for unrecognized kinds.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::Result;

/// Finished calculation attached to a payload. The `data` mapping is
/// opaque to the bot: the math happened in the web app.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CalcResult {
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalcPayload {
    /// User shared their results into the chat.
    Share(CalcResult),
    /// User asked for the raw data as a downloadable file.
    Export(CalcResult),
    /// Any other (or missing) `type`: dropped upstream with a diagnostic.
    #[serde(other)]
    Unknown,
}

/// Decode a raw payload document.
///
/// Malformed JSON is an error (the user gets a retry prompt); a well-formed
/// document with an unknown or missing `type`, or with fields the known
/// kinds cannot accept, decodes to `Unknown`.
pub fn decode(text: &str) -> Result<CalcPayload> {
    let value: Value = serde_json::from_str(text)?;
    Ok(serde_json::from_value(value).unwrap_or(CalcPayload::Unknown))
}

/// Pretty-printed UTF-8 JSON bytes of the exported `data` mapping.
pub fn export_bytes(data: &Value) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(data)?)
}

/// Filename for the export artifact, derived from the payload timestamp
/// or the current time.
pub fn export_filename(timestamp: Option<&str>) -> String {
    export_filename_at(timestamp, Utc::now())
}

fn export_filename_at(timestamp: Option<&str>, now: DateTime<Utc>) -> String {
    let stamp = match timestamp.map(str::trim).filter(|t| !t.is_empty()) {
        Some(ts) => ts.replace(':', "-").replace(' ', "_").replace(',', ""),
        None => now.format("%Y-%m-%d_%H-%M-%S").to_string(),
    };
    format!("unit_economics_export_{stamp}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn decodes_share_payload() {
        let payload =
            decode(r#"{"type":"share","data":{"margin":0.2},"message":"done"}"#).unwrap();
        let CalcPayload::Share(result) = payload else {
            panic!("expected share, got {payload:?}");
        };
        assert_eq!(result.message.as_deref(), Some("done"));
        assert_eq!(result.data, json!({"margin": 0.2}));
        assert_eq!(result.timestamp, None);
    }

    #[test]
    fn decodes_export_payload() {
        let payload = decode(
            r#"{"type":"export","data":{"a":1},"message":"done","timestamp":"2026-01-02 10:00:00"}"#,
        )
        .unwrap();
        assert!(matches!(payload, CalcPayload::Export(_)));
    }

    #[test]
    fn unknown_and_missing_types_decode_to_unknown() {
        assert_eq!(decode(r#"{"type":"bogus"}"#).unwrap(), CalcPayload::Unknown);
        assert_eq!(decode(r#"{"data":{"a":1}}"#).unwrap(), CalcPayload::Unknown);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(decode("{not json").is_err());
    }

    #[test]
    fn filename_sanitizes_the_payload_timestamp() {
        assert_eq!(
            export_filename(Some("2026-01-02 10:15:30, final")),
            "unit_economics_export_2026-01-02_10-15-30_final.json"
        );
    }

    #[test]
    fn filename_falls_back_to_current_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            export_filename_at(None, now),
            "unit_economics_export_2026-03-04_05-06-07.json"
        );
        assert_eq!(
            export_filename_at(Some("   "), now),
            "unit_economics_export_2026-03-04_05-06-07.json"
        );
    }

    #[test]
    fn export_bytes_round_trip() {
        let data = json!({"a": 1, "b": {"c": [1, 2]}});
        let bytes = export_bytes(&data).unwrap();
        let parsed: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, data);
    }
}
