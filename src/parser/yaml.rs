//! YAML schema file front-end.
//!
//! YAML deserializes straight into the canonical `serde_json::Value` shape;
//! non-string mapping keys are rejected by serde during that conversion.

use serde_json::Value;

use crate::error::DboGenError;

pub fn parse_yaml_text(text: &str) -> Result<Value, DboGenError> {
    serde_yaml::from_str(text).map_err(|e| DboGenError::structural(format!("bad yaml: {e}")))
}
