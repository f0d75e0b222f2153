//! Schema file loading: format front-ends and the format-independent parser

mod dict;
mod json;
mod loader;
mod xml;
mod yaml;

pub use dict::{DictParser, ParsedItem};
pub use json::parse_json_text;
pub use loader::{find_version_dirs, parse_schema_file, parse_version_dir, parse_versions};
pub use xml::parse_xml_text;
pub use yaml::parse_yaml_text;
