//! Common test utilities for dbogen tests

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use dbogen::GenerateOptions;

/// A schema file for a plain table with an auto-generated key and a unique
/// email column.
pub const USERS_JSON: &str = r#"{
  "table": {
    "name": "users",
    "columns": [
      {"name": "id", "type": "int", "autoIncrement": true,
       "constraints": [{"type": "primaryKey"}]},
      {"name": "name", "type": "varchar(100)", "constraints": [{"type": "notNull"}]},
      {"name": "email", "type": "varchar(200)",
       "constraints": [{"type": "uniqueKey", "name": "uk_users_email"}]}
    ]
  }
}
"#;

/// A second table, in YAML, with a pulled foreign key back to users.
pub const ORDERS_YAML: &str = "\
table:
  name: orders
  columns:
    - name: id
      type: int
      autoIncrement: true
      constraints:
        - type: primaryKey
    - name: user_id
      type: int
      constraints:
        - type: notNull
        - type: foreignKey
          table: users
          column: id
          pull: always
    - name: note
      type: varchar(255)
";

/// Test context with temporary directories for isolated generation runs
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub schema_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let schema_dir = temp_dir.path().join("schema");
        let output_dir = temp_dir.path().join("out");
        fs::create_dir(&schema_dir).expect("Failed to create schema directory");

        Self {
            _temp_dir: temp_dir,
            schema_dir,
            output_dir,
        }
    }

    /// A context preloaded with the users/orders fixture as version 1.
    pub fn with_users_and_orders() -> Self {
        let ctx = Self::new();
        ctx.write_schema_file("v1", "users.json", USERS_JSON);
        ctx.write_schema_file("v1", "orders.yaml", ORDERS_YAML);
        ctx
    }

    /// Write one schema file under the named version directory.
    pub fn write_schema_file(&self, version_dir: &str, file_name: &str, content: &str) {
        let dir = self.schema_dir.join(version_dir);
        fs::create_dir_all(&dir).expect("Failed to create version directory");
        fs::write(dir.join(file_name), content).expect("Failed to write schema file");
    }

    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            schema_dir: self.schema_dir.clone(),
            output_dir: self.output_dir.clone(),
            platform: "mysql".to_string(),
            package: "default".to_string(),
            overwrite: false,
            verbose: false,
        }
    }
}
