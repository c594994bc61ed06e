//! Unit tests for graph derivation and DOT rendering properties.

use sql_erd::graph::{
    column_relation_dot, entity_relation_dot, ColumnRelationView, EntityRelationView, Rankdir,
};
use sql_erd::schema::{ColumnDesc, ColumnType, EntityModel, ForeignKeyDesc, ModelError, TableDesc};

fn col(name: &str, pk: bool) -> ColumnDesc {
    ColumnDesc {
        name: name.to_string(),
        col_type: ColumnType::Int,
        is_nullable: !pk,
        is_primary_key: pk,
    }
}

fn table(name: &str, columns: Vec<ColumnDesc>) -> TableDesc {
    TableDesc {
        name: name.to_string(),
        columns,
    }
}

fn fk(source: &str, source_col: &str, target: &str, target_col: &str) -> ForeignKeyDesc {
    ForeignKeyDesc {
        constraint: None,
        source_table: source.to_string(),
        source_columns: vec![source_col.to_string()],
        target_table: target.to_string(),
        target_columns: vec![target_col.to_string()],
    }
}

/// users / orders / order_items: the canonical shop schema
fn shop_model() -> EntityModel {
    EntityModel::build(
        vec![
            table("users", vec![col("id", true), col("name", false)]),
            table("orders", vec![col("id", true), col("user_id", false)]),
            table(
                "order_items",
                vec![col("id", true), col("order_id", false), col("user_id", false)],
            ),
        ],
        vec![
            fk("orders", "user_id", "users", "id"),
            fk("order_items", "order_id", "orders", "id"),
            fk("order_items", "user_id", "users", "id"),
        ],
    )
    .unwrap()
}

#[test]
fn shop_schema_summary_has_three_nodes_and_three_edges() {
    let model = shop_model();
    let view = EntityRelationView::from_model(&model);

    assert_eq!(view.tables, vec!["users", "orders", "order_items"]);
    assert_eq!(view.edge_count(), 3);

    let edges: Vec<(&str, &str)> = view
        .edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(
        edges,
        vec![
            ("orders", "users"),
            ("order_items", "orders"),
            ("order_items", "users"),
        ]
    );
}

#[test]
fn shop_schema_detail_has_one_edge_per_relation() {
    let model = shop_model();
    let view = ColumnRelationView::from_model(&model);

    assert_eq!(view.edge_count(), model.relations().len());
    assert_eq!(view.edge_count(), 3);
}

#[test]
fn parallel_relations_collapse_to_one_summary_edge() {
    let model = EntityModel::build(
        vec![
            table("users", vec![col("id", true)]),
            table(
                "audits",
                vec![
                    col("id", true),
                    col("actor_id", false),
                    col("subject_id", false),
                    col("reviewer_id", false),
                ],
            ),
        ],
        vec![
            fk("audits", "actor_id", "users", "id"),
            fk("audits", "subject_id", "users", "id"),
            fk("audits", "reviewer_id", "users", "id"),
        ],
    )
    .unwrap();

    let detail = ColumnRelationView::from_model(&model);
    let summary = EntityRelationView::from_model(&model);
    assert_eq!(detail.edge_count(), 3);
    assert_eq!(summary.edge_count(), 1);
}

#[test]
fn bidirectional_pairs_keep_both_edges() {
    // The collapse key is the ORDERED pair, so opposite directions stay distinct
    let model = EntityModel::build(
        vec![
            table("employees", vec![col("id", true), col("team_id", false)]),
            table("teams", vec![col("id", true), col("lead_id", false)]),
        ],
        vec![
            fk("employees", "team_id", "teams", "id"),
            fk("teams", "lead_id", "employees", "id"),
        ],
    )
    .unwrap();

    let view = EntityRelationView::from_model(&model);
    assert_eq!(view.edge_count(), 2);
}

#[test]
fn self_loop_survives_collapsing() {
    let model = EntityModel::build(
        vec![table(
            "categories",
            vec![col("id", true), col("parent_id", false)],
        )],
        vec![fk("categories", "parent_id", "categories", "id")],
    )
    .unwrap();

    let dot = entity_relation_dot(&model, Rankdir::LR);
    assert!(dot.contains("categories -> categories;"));
}

#[test]
fn every_table_appears_in_both_documents() {
    let model = EntityModel::build(
        vec![
            table("users", vec![col("id", true)]),
            table("unreferenced", vec![col("id", true)]),
        ],
        vec![],
    )
    .unwrap();

    let detail = column_relation_dot(&model, Rankdir::LR);
    let summary = entity_relation_dot(&model, Rankdir::LR);

    assert!(detail.contains("<B>users</B>"));
    assert!(detail.contains("<B>unreferenced</B>"));
    assert!(summary.contains("users [label=\"users\"];"));
    assert!(summary.contains("unreferenced [label=\"unreferenced\"];"));
}

#[test]
fn rendering_twice_is_byte_identical() {
    let model = shop_model();
    assert_eq!(
        column_relation_dot(&model, Rankdir::TB),
        column_relation_dot(&model, Rankdir::TB)
    );
    assert_eq!(
        entity_relation_dot(&model, Rankdir::TB),
        entity_relation_dot(&model, Rankdir::TB)
    );
}

#[test]
fn all_rankdir_values_are_emitted_verbatim() {
    let model = shop_model();
    for (rankdir, expected) in [
        (Rankdir::LR, "rankdir=LR;"),
        (Rankdir::RL, "rankdir=RL;"),
        (Rankdir::TB, "rankdir=TB;"),
        (Rankdir::BT, "rankdir=BT;"),
    ] {
        assert!(entity_relation_dot(&model, rankdir).contains(expected));
        assert!(column_relation_dot(&model, rankdir).contains(expected));
    }
}

#[test]
fn unresolved_relation_produces_no_graph() {
    let result = EntityModel::build(
        vec![table("orders", vec![col("id", true), col("user_id", false)])],
        vec![fk("orders", "user_id", "users", "id")],
    );

    assert!(matches!(
        result,
        Err(ModelError::UnresolvedRelation { .. })
    ));
}
