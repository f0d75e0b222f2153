//! Schema Model Tests

use pretty_assertions::assert_eq;

use dbogen::model::{
    LanguageSet, LanguageString, Order, OrderTracker, SqlSet, SqlString, SqlSyntax,
};

// ============================================================================
// SQL Variant Selection Tests
// ============================================================================

#[test]
fn platform_match_beats_declaration_order() {
    let set = SqlSet::new(
        vec![
            SqlString::new("SELECT NOW()", SqlSyntax::Universal, Vec::new()),
            SqlString::new(
                "SELECT UTC_TIMESTAMP()",
                SqlSyntax::Native,
                vec!["mysql".to_string()],
            ),
        ],
        Vec::new(),
    )
    .expect("sql set should build");

    let variant = set
        .get_for_platform(&["mysql"])
        .expect("mysql variant should be selected");
    assert_eq!(
        variant.sql, "SELECT UTC_TIMESTAMP()",
        "Platform-tagged variant must win even when a universal variant is declared first"
    );
}

#[test]
fn unmatched_platform_falls_back_to_universal() {
    let set = SqlSet::new(
        vec![
            SqlString::new("SELECT NOW()", SqlSyntax::Universal, Vec::new()),
            SqlString::new(
                "SELECT SYSDATE FROM DUAL",
                SqlSyntax::Native,
                vec!["oracle".to_string()],
            ),
        ],
        Vec::new(),
    )
    .expect("sql set should build");

    let variant = set
        .get_for_platform(&["mysql"])
        .expect("universal variant should be selected");
    assert_eq!(variant.sql, "SELECT NOW()");
}

#[test]
fn no_variant_for_platform_yields_none() {
    let set = SqlSet::new(
        vec![SqlString::new(
            "SELECT SYSDATE FROM DUAL",
            SqlSyntax::Native,
            vec!["oracle".to_string()],
        )],
        Vec::new(),
    )
    .expect("sql set should build");

    assert!(
        set.get_for_platform(&["mysql"]).is_none(),
        "A native variant tagged for another platform must not be selected"
    );
}

#[test]
fn platform_tags_compare_case_insensitively() {
    let set = SqlSet::new(
        vec![SqlString::new(
            "SELECT 1",
            SqlSyntax::Native,
            vec!["MySQL".to_string()],
        )],
        Vec::new(),
    )
    .expect("sql set should build");

    assert!(set.get_for_platform(&["mysql"]).is_some());
}

#[test]
fn empty_sql_set_is_rejected() {
    assert!(SqlSet::new(Vec::new(), Vec::new()).is_err());
}

// ============================================================================
// Language Variant Selection Tests
// ============================================================================

#[test]
fn language_variant_selected_case_insensitively() {
    let set = LanguageSet::new(
        vec![
            LanguageString {
                language: "PHP".to_string(),
                code: "$out = time();".to_string(),
            },
            LanguageString {
                language: "python".to_string(),
                code: "out = time.time()".to_string(),
            },
        ],
        Vec::new(),
    )
    .expect("language set should build");

    let variant = set
        .get_for_language("php")
        .expect("php variant should be selected");
    assert_eq!(variant.code, "$out = time();");
    assert!(set.get_for_language("java").is_none());
}

// ============================================================================
// Declaration Order Tests
// ============================================================================

#[test]
fn tracker_hands_out_sequential_orders_per_depth() {
    let mut tracker = OrderTracker::new(3);

    let first = tracker.next(0);
    let second = tracker.next(0);
    let nested = tracker.next(1);

    assert_eq!(first, Order::new(3, 0, 0));
    assert_eq!(second, Order::new(3, 0, 1));
    assert_eq!(nested, Order::new(3, 1, 0), "Depths count independently");
}

#[test]
fn orders_compare_source_first() {
    assert!(Order::new(0, 2, 9) < Order::new(1, 0, 0));
    assert!(Order::new(0, 0, 1) < Order::new(0, 1, 0));
    assert!(Order::new(0, 1, 0) < Order::new(0, 1, 1));
}
