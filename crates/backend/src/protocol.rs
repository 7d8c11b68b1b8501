//! JSON-lines framing shared with the fan-control backend.
//!
//! Each call is one request line followed by one reply line:
//!
//! ```text
//! → {"method":"get_status"}
//! ← {"ok":true,"profile":"balanced","cpu_rpm":3200,...}
//! → {"method":"set_profile","params":{"profile":"balanced"}}
//! ← {"ok":true}
//! ```

use fan_core::{PanelError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A call to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Request<'a> {
    GetStatus,
    SetProfile { profile: &'a str },
}

impl Request<'_> {
    pub fn method(&self) -> &'static str {
        match self {
            Request::GetStatus => "get_status",
            Request::SetProfile { .. } => "set_profile",
        }
    }

    /// Serialize to a single newline-terminated line.
    pub fn encode(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)
            .map_err(|e| PanelError::Protocol(format!("encode {}: {e}", self.method())))?;
        line.push('\n');
        Ok(line)
    }
}

/// Parse one reply line.
pub fn decode<T: DeserializeOwned>(method: &str, line: &str) -> Result<T> {
    let line = line.trim();
    if line.is_empty() {
        return Err(PanelError::Protocol(format!("empty reply to {method}")));
    }
    serde_json::from_str(line).map_err(|e| PanelError::Protocol(format!("parse {method} reply: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fan_core::{ApplyResponse, Status};
    use serde_json::Value;

    #[test]
    fn get_status_has_no_params() {
        let line = Request::GetStatus.encode().unwrap();
        assert!(line.ends_with('\n'));
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["method"], "get_status");
        assert!(v.get("params").is_none());
    }

    #[test]
    fn set_profile_forwards_any_string() {
        let line = Request::SetProfile { profile: "Whisper Quiet" }.encode().unwrap();
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["method"], "set_profile");
        assert_eq!(v["params"]["profile"], "Whisper Quiet");
    }

    #[test]
    fn decodes_replies() {
        let s: Status = decode("get_status", "{\"ok\":false,\"error\":\"sensor timeout\"}\n").unwrap();
        assert_eq!(s.error.as_deref(), Some("sensor timeout"));
        let r: ApplyResponse = decode("set_profile", "{\"ok\":true}").unwrap();
        assert!(r.ok);
    }

    #[test]
    fn malformed_replies_are_protocol_errors() {
        let err = decode::<Status>("get_status", "not json").unwrap_err();
        assert!(matches!(err, PanelError::Protocol(_)));
        let err = decode::<Status>("get_status", "  \n").unwrap_err();
        assert_eq!(err.to_string(), "protocol error: empty reply to get_status");
    }
}
