//! Shared builders for the unit tests.

use serde_json::Value;

use dbogen::analysis::AnalysisModel;
use dbogen::model::SchemaObject;
use dbogen::parser::{DictParser, ParsedItem};

/// Parse one file-shaped value into schema objects, failing on anything else.
pub fn parse_objects(value: &Value) -> Vec<SchemaObject> {
    let mut diagnostics = Vec::new();
    let items = DictParser::new(0, &mut diagnostics)
        .parse(value)
        .expect("schema value should parse");
    items
        .into_iter()
        .map(|item| match item {
            ParsedItem::Object(object) => object,
            ParsedItem::Change(_) => panic!("expected schema objects only"),
        })
        .collect()
}

/// Build a fully resolved analysis model from one file-shaped value.
pub fn build_model(value: &Value) -> AnalysisModel {
    let mut model = AnalysisModel::new();
    for object in parse_objects(value) {
        model
            .register_schema("test", &object)
            .expect("schema should register");
    }
    model.update_references();
    model
}
