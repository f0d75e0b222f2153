//! Analysis Engine Tests

use pretty_assertions::assert_eq;
use serde_json::json;

use dbogen::analysis::AnalysisModel;
use dbogen::error::{DboGenError, Severity};

use super::helpers::{build_model, parse_objects};

fn users_and_orders() -> serde_json::Value {
    json!({
        "tables": [
            {
                "name": "users",
                "columns": [
                    {"name": "id", "type": "int", "autoIncrement": true,
                     "constraints": [{"type": "primaryKey"}]},
                    {"name": "name", "type": "varchar(100)",
                     "constraints": [{"type": "notNull"}]},
                    {"name": "email", "type": "varchar(200)",
                     "constraints": [{"type": "uniqueKey", "name": "uk_users_email"}]}
                ]
            },
            {
                "name": "orders",
                "columns": [
                    {"name": "id", "type": "int", "autoIncrement": true,
                     "constraints": [{"type": "primaryKey"}]},
                    {"name": "user_id", "type": "int",
                     "constraints": [
                         {"type": "notNull"},
                         {"type": "foreignKey", "table": "users", "column": "id",
                          "pull": "always"}
                     ]},
                    {"name": "note", "type": "varchar(255)"}
                ]
            }
        ]
    })
}

// ============================================================================
// Column Classification Tests
// ============================================================================

#[test]
fn constraints_classify_into_column_facts() {
    let model = build_model(&json!({
        "table": {
            "name": "accounts",
            "columns": [
                {"name": "id", "type": "int", "autoIncrement": true,
                 "constraints": [{"type": "primaryKey"}]},
                {"name": "created", "type": "int",
                 "constraints": [
                     {"type": "initialValue", "sql": "UNIX_TIMESTAMP()"},
                     {"type": "noUpdate"}
                 ]},
                {"name": "updated", "type": "int",
                 "constraints": [{"type": "constantUpdate", "sql": "UNIX_TIMESTAMP()"}]},
                {"name": "secret", "type": "varchar(64)",
                 "constraints": [{"type": "notRead"}, {"type": "index"}]},
                {"name": "handle", "type": "varchar(32)",
                 "constraints": [{"type": "notNull"}, {"type": "uniqueIndex"}]}
            ]
        }
    }));
    let analysis = model.analysis_for("accounts").expect("accounts registered");

    let id = analysis.get_column_analysis("id").expect("id column");
    assert!(id.auto_gen && id.is_primary_key && id.read_by);
    assert!(!id.allows_create(), "Auto-generated columns take no caller value");

    let created = analysis.get_column_analysis("created").expect("created column");
    assert!(created.create_value.is_some());
    assert!(created.no_update);
    assert!(!created.allows_update());

    let updated = analysis.get_column_analysis("updated").expect("updated column");
    assert!(updated.update_value.is_some());
    assert!(updated.create_value.is_none());

    let secret = analysis.get_column_analysis("secret").expect("secret column");
    assert!(!secret.is_read);
    assert!(
        !secret.read_by,
        "An indexed column that cannot be read must not produce a read-by operation"
    );

    let handle = analysis.get_column_analysis("handle").expect("handle column");
    assert!(!handle.is_nullable);
    assert!(handle.is_unique && handle.read_by);
}

#[test]
fn foreign_key_columns_do_not_become_read_by() {
    let model = build_model(&users_and_orders());
    let orders = model.analysis_for("orders").expect("orders registered");

    let user_id = orders.get_column_analysis("user_id").expect("user_id column");
    assert!(user_id.foreign_key.is_some());
    assert!(
        !user_id.read_by,
        "A foreign key is a join edge, not a read-by index"
    );
}

#[test]
fn second_foreign_key_on_one_column_is_rejected() {
    let objects = parse_objects(&json!({
        "table": {
            "name": "links",
            "columns": [
                {"name": "id", "type": "int", "constraints": [{"type": "primarykey"}]},
                {"name": "target", "type": "int", "constraints": [
                    {"type": "foreignkey", "table": "users", "column": "id"},
                    {"type": "fakeForeignKey", "table": "groups", "column": "id"}
                ]}
            ]
        }
    }));
    let mut model = AnalysisModel::new();
    let result = model.register_schema("test", &objects[0]);
    assert!(matches!(result, Err(DboGenError::Structural { .. })));
}

// ============================================================================
// Primary Key Rule Tests
// ============================================================================

#[test]
fn tables_declare_exactly_one_primary_key() {
    let missing = parse_objects(&json!({
        "table": {"name": "t", "columns": [{"name": "id", "type": "int"}]}
    }));
    let mut model = AnalysisModel::new();
    match model.register_schema("test", &missing[0]) {
        Err(DboGenError::Structural { message }) => {
            assert!(message.contains("no primary key"), "got: {message}")
        }
        other => panic!("expected missing primary key error, got {other:?}"),
    }

    let doubled = parse_objects(&json!({
        "table": {
            "name": "t",
            "columns": [{"name": "id", "type": "int",
                         "constraints": [{"type": "primarykey"}]}],
            "constraints": [{"type": "primarykey", "columns": ["id"]}]
        }
    }));
    let mut model = AnalysisModel::new();
    match model.register_schema("test", &doubled[0]) {
        Err(DboGenError::Structural { message }) => {
            assert!(message.contains("more than one primary key"), "got: {message}")
        }
        other => panic!("expected doubled primary key error, got {other:?}"),
    }
}

#[test]
fn views_are_exempt_from_the_primary_key_rule() {
    let model = build_model(&json!({
        "view": {
            "name": "user_names",
            "query": "SELECT id, name FROM users",
            "columns": [
                {"name": "id", "type": "int"},
                {"name": "name", "type": "varchar(100)"}
            ]
        }
    }));
    let analysis = model.analysis_for("user_names").expect("view registered");
    assert!(analysis.is_read_only);
    assert!(analysis.columns.iter().all(|c| c.no_update));
}

#[test]
fn table_level_primary_key_spans_columns() {
    let model = build_model(&json!({
        "table": {
            "name": "memberships",
            "columns": [
                {"name": "user_id", "type": "int"},
                {"name": "group_id", "type": "int"}
            ],
            "constraints": [{"type": "primaryKey", "columns": ["user_id", "group_id"]}]
        }
    }));
    let analysis = model.analysis_for("memberships").expect("table registered");

    let names: Vec<&str> = analysis
        .primary_key_columns()
        .iter()
        .map(|c| c.sql_name.as_str())
        .collect();
    assert_eq!(names, vec!["user_id", "group_id"]);
    assert!(
        analysis.has_stable_unique_key(),
        "A fully caller-supplied primary key can anchor an upsert"
    );
}

// ============================================================================
// Reference Pass Tests
// ============================================================================

#[test]
fn reference_pass_binds_foreign_keys() {
    let model = build_model(&users_and_orders());

    let orders = model.analysis_for("orders").expect("orders registered");
    let fk = orders.foreign_keys().next().expect("orders has a foreign key");
    assert_eq!(fk.remote, model.id_for("users"));
    assert!(fk.is_real_fk);
    assert!(fk.pull);
}

#[test]
fn reference_pass_is_idempotent() {
    let mut model = AnalysisModel::new();
    for object in parse_objects(&users_and_orders()) {
        model.register_schema("test", &object).expect("register");
    }
    model.update_references();
    let bound_once = model
        .analysis_for("orders")
        .and_then(|a| a.foreign_keys().next().and_then(|fk| fk.remote));

    model.update_references();
    let bound_twice = model
        .analysis_for("orders")
        .and_then(|a| a.foreign_keys().next().and_then(|fk| fk.remote));

    assert_eq!(bound_once, bound_twice);
    assert_eq!(
        model.diagnostics().count(),
        0,
        "Reruns must not accumulate diagnostics"
    );
}

#[test]
fn unresolved_foreign_keys_warn_instead_of_failing() {
    let model = build_model(&json!({
        "table": {
            "name": "orders",
            "columns": [
                {"name": "id", "type": "int", "constraints": [{"type": "primarykey"}]},
                {"name": "user_id", "type": "int",
                 "constraints": [{"type": "foreignkey", "table": "users", "column": "id"}]}
            ]
        }
    }));

    let warnings: Vec<_> = model
        .diagnostics()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("users"));

    let fk = model
        .analysis_for("orders")
        .and_then(|a| a.foreign_keys().next())
        .expect("foreign key still analyzed");
    assert!(fk.remote.is_none());
}

#[test]
fn late_registration_resolves_on_the_next_pass() {
    let mut model = AnalysisModel::new();
    let objects = parse_objects(&users_and_orders());
    let orders = objects
        .iter()
        .find(|o| o.name() == "orders")
        .expect("orders object");
    let users = objects
        .iter()
        .find(|o| o.name() == "users")
        .expect("users object");

    model.register_schema("test", orders).expect("register orders");
    model.update_references();
    assert_eq!(model.diagnostics().count(), 1, "users is not registered yet");

    model.register_schema("other", users).expect("register users");
    model.update_references();
    assert_eq!(model.diagnostics().count(), 0);
    let fk = model
        .analysis_for("orders")
        .and_then(|a| a.foreign_keys().next())
        .expect("foreign key");
    assert_eq!(fk.remote, model.id_for("users"));
}

// ============================================================================
// Registry Tests
// ============================================================================

#[test]
fn duplicate_schema_names_are_rejected_across_packages() {
    let objects = parse_objects(&json!({
        "table": {"name": "users", "columns": [
            {"name": "id", "type": "int", "constraints": [{"type": "primarykey"}]}
        ]}
    }));
    let mut model = AnalysisModel::new();
    model.register_schema("core", &objects[0]).expect("first registration");

    match model.register_schema("addon", &objects[0]) {
        Err(DboGenError::DuplicateSchemaName { name, package }) => {
            assert_eq!(name, "users");
            assert_eq!(package, "core", "The error names the first registrant");
        }
        other => panic!("expected duplicate name error, got {other:?}"),
    }
}

#[test]
fn references_to_lists_incoming_foreign_keys() {
    let model = build_model(&users_and_orders());

    let incoming = model.references_to("users");
    assert_eq!(incoming.len(), 1);
    let (id, fk) = &incoming[0];
    assert_eq!(model.analysis(*id).sql_name, "orders");
    assert_eq!(fk.column_name, "user_id");

    assert!(model.references_to("orders").is_empty());
}

// ============================================================================
// Selectable Column Set Tests
// ============================================================================

#[test]
fn selectable_sets_combine_columns_and_indexes() {
    let model = build_model(&json!({
        "table": {
            "name": "events",
            "columns": [
                {"name": "id", "type": "int", "autoincrement": true,
                 "constraints": [{"type": "primarykey"}]},
                {"name": "kind", "type": "varchar(32)", "constraints": [{"type": "index"}]},
                {"name": "day", "type": "int"},
                {"name": "slot", "type": "int"}
            ],
            "constraints": [{"type": "uniqueIndex", "name": "ux_day_slot",
                             "columns": ["day", "slot"]}]
        }
    }));
    let analysis = model.analysis_for("events").expect("events registered");

    let sets = analysis.get_selectable_column_sets();
    assert_eq!(
        sets,
        vec![
            vec!["id".to_string()],
            vec!["kind".to_string()],
            vec!["day".to_string(), "slot".to_string()],
        ],
        "Single indexed columns come first, then declared index sets"
    );
    assert!(analysis.has_stable_unique_key());
}
