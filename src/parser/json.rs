//! JSON schema file front-end.

use serde_json::Value;

use crate::error::DboGenError;

pub fn parse_json_text(text: &str) -> Result<Value, DboGenError> {
    serde_json::from_str(text).map_err(|e| DboGenError::structural(format!("bad json: {e}")))
}
