//! File Generation Driver Tests

use std::fs;

use dbogen::analysis::AnalysisModel;
use dbogen::codegen::{
    ExtendedSqlQuery, FileGen, GenConfig, LanguageGenerator, MySqlPrepSqlConverter, QueryBundle,
};
use dbogen::error::DboGenError;
use dbogen::util::pascal_case;
use dbogen::{build_analysis, load_schema};

use super::common::TestContext;

/// A deliberately small generator: one marker line per section, enough to
/// verify the driver's ordering and gating.
struct MarkerGenerator;

impl LanguageGenerator for MarkerGenerator {
    fn generate_filename(&self, config: &GenConfig) -> String {
        format!("{}.php", pascal_case(&config.bundle.schema_name))
    }

    fn generate_header(&self, config: &GenConfig) -> Vec<String> {
        vec![
            "<?php".to_string(),
            format!("class {} {{", pascal_case(&config.bundle.schema_name)),
        ]
    }

    fn generate_read(&self, config: &GenConfig) -> Vec<String> {
        vec![format!(
            "    const READ_SQL = \"{}\";",
            config.bundle.read.sql.text().unwrap_or_default()
        )]
    }

    fn generate_create(&self, config: &GenConfig) -> Vec<String> {
        let create = config.bundle.create.as_ref().expect("writable set");
        vec![format!(
            "    const CREATE_SQL = \"{}\";",
            create.sql.text().unwrap_or_default()
        )]
    }

    fn generate_update(&self, config: &GenConfig) -> Vec<String> {
        // A key-only table is writable but has no update statement.
        match config.bundle.update.as_ref() {
            Some(update) => vec![format!(
                "    const UPDATE_SQL = \"{}\";",
                update.sql.text().unwrap_or_default()
            )],
            None => Vec::new(),
        }
    }

    fn generate_delete(&self, config: &GenConfig) -> Vec<String> {
        let delete = config.bundle.delete.as_ref().expect("writable set");
        vec![format!(
            "    const DELETE_SQL = \"{}\";",
            delete.sql.text().unwrap_or_default()
        )]
    }

    fn generate_extended_sql(
        &self,
        _config: &GenConfig,
        extended: &ExtendedSqlQuery,
    ) -> Vec<String> {
        vec![format!("    // extended: {}", extended.name)]
    }

    fn generate_extended_sql_wrapper(
        &self,
        _config: &GenConfig,
        extended: &ExtendedSqlQuery,
    ) -> Vec<String> {
        vec![format!("    // wrapper: {}", extended.name)]
    }

    fn generate_validations(&self, _config: &GenConfig) -> Vec<String> {
        Vec::new()
    }

    fn generate_footer(&self, _config: &GenConfig) -> Vec<String> {
        vec!["}".to_string()]
    }
}

fn analysis_for(ctx: &TestContext) -> AnalysisModel {
    let loaded = load_schema(&ctx.options()).expect("schema should load");
    build_analysis("default", &loaded.versions[0]).expect("analysis should build")
}

#[test]
fn writes_one_file_per_schema_object() {
    let ctx = TestContext::with_users_and_orders();
    let model = analysis_for(&ctx);
    let converter = MySqlPrepSqlConverter::new("php");
    let filegen = FileGen::new(MarkerGenerator);
    fs::create_dir_all(&ctx.output_dir).expect("output dir");

    let id = model.id_for("users").expect("users registered");
    let bundle = QueryBundle::build(&model, id, &converter).expect("bundle");
    let config = GenConfig {
        schema: model.schema(id),
        analysis: model.analysis(id),
        bundle: &bundle,
        converter: &converter,
        output_dir: &ctx.output_dir,
        fail_if_file_exists: true,
        line_separator: "\n",
    };

    let path = filegen.generate_file(&config).expect("file should generate");
    assert!(path.ends_with("Users.php"));

    let content = fs::read_to_string(&path).expect("generated file on disk");
    assert!(content.starts_with("<?php\nclass Users {"));
    assert!(content.contains("const READ_SQL"));
    assert!(content.contains("INSERT INTO users (name,email) VALUES (:name,:email)"));
    assert!(content.contains("const DELETE_SQL = \"DELETE FROM users WHERE id = :id\";"));
    assert!(content.ends_with("}"));
}

#[test]
fn read_only_sets_get_no_write_sections() {
    let ctx = TestContext::new();
    ctx.write_schema_file(
        "v1",
        "totals.json",
        r#"{
          "view": {
            "name": "user_totals",
            "query": "SELECT user_id, COUNT(*) AS n FROM orders GROUP BY user_id",
            "columns": [
              {"name": "user_id", "type": "int"},
              {"name": "n", "type": "int"}
            ]
          }
        }"#,
    );
    let model = analysis_for(&ctx);
    let converter = MySqlPrepSqlConverter::new("php");
    let filegen = FileGen::new(MarkerGenerator);
    fs::create_dir_all(&ctx.output_dir).expect("output dir");

    let id = model.id_for("user_totals").expect("view registered");
    let bundle = QueryBundle::build(&model, id, &converter).expect("bundle");
    let config = GenConfig {
        schema: model.schema(id),
        analysis: model.analysis(id),
        bundle: &bundle,
        converter: &converter,
        output_dir: &ctx.output_dir,
        fail_if_file_exists: true,
        line_separator: "\n",
    };

    let path = filegen.generate_file(&config).expect("file should generate");
    let content = fs::read_to_string(&path).expect("generated file on disk");
    assert!(content.contains("const READ_SQL"));
    assert!(!content.contains("CREATE_SQL"));
    assert!(!content.contains("UPDATE_SQL"));
    assert!(!content.contains("DELETE_SQL"));
}

#[test]
fn existing_targets_fail_before_anything_is_written() {
    let ctx = TestContext::with_users_and_orders();
    let model = analysis_for(&ctx);
    let converter = MySqlPrepSqlConverter::new("php");
    let filegen = FileGen::new(MarkerGenerator);
    fs::create_dir_all(&ctx.output_dir).expect("output dir");

    let id = model.id_for("users").expect("users registered");
    let bundle = QueryBundle::build(&model, id, &converter).expect("bundle");
    let target = ctx.output_dir.join("Users.php");
    fs::write(&target, "hand-maintained").expect("seed existing file");

    let config = GenConfig {
        schema: model.schema(id),
        analysis: model.analysis(id),
        bundle: &bundle,
        converter: &converter,
        output_dir: &ctx.output_dir,
        fail_if_file_exists: true,
        line_separator: "\n",
    };

    match filegen.generate_file(&config) {
        Err(DboGenError::GenerationConflict { path }) => assert_eq!(path, target),
        other => panic!("expected generation conflict, got {other:?}"),
    }
    let content = fs::read_to_string(&target).expect("file untouched");
    assert_eq!(content, "hand-maintained", "The existing file is left as-is");
}
