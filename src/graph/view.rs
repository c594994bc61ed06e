//! Graph views derived from the entity model.
//!
//! Both views are pure, read-only projections: deriving a view never
//! mutates the model, and deriving twice from the same model yields
//! structurally identical views (same nodes, same edges, same order).
//! Tables iterate in registration order and edges in relation discovery
//! order, so rendered output is deterministic.

use crate::schema::EntityModel;
use ahash::AHashSet;

/// A column row in the detailed view
#[derive(Debug, Clone)]
pub struct ColumnNode {
    /// Column name
    pub name: String,
    /// Column type (as string for display)
    pub col_type: String,
    /// Whether this column is a primary key
    pub is_primary_key: bool,
    /// Whether this column is a foreign key
    pub is_foreign_key: bool,
    /// Whether this column is nullable
    pub is_nullable: bool,
}

/// A table grouping of column nodes in the detailed view
#[derive(Debug, Clone)]
pub struct TableNode {
    /// Table name
    pub name: String,
    /// All columns in declaration order
    pub columns: Vec<ColumnNode>,
}

/// A column-level edge (one per foreign-key relation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEdge {
    /// Source table (child with the FK column)
    pub from_table: String,
    /// Source column (FK column)
    pub from_column: String,
    /// Target table (parent being referenced)
    pub to_table: String,
    /// Target column (referenced column, usually PK)
    pub to_column: String,
}

/// Detailed view: one node row per column, one edge per relation.
#[derive(Debug)]
pub struct ColumnRelationView {
    /// Tables in registration order, each with full column info
    pub tables: Vec<TableNode>,
    /// Column-level edges in relation discovery order
    pub edges: Vec<ColumnEdge>,
}

impl ColumnRelationView {
    /// Derive the detailed view from a model
    pub fn from_model(model: &EntityModel) -> Self {
        let tables = model
            .iter_tables()
            .map(|t| TableNode {
                name: t.name.clone(),
                columns: t
                    .columns
                    .iter()
                    .map(|c| ColumnNode {
                        name: c.name.clone(),
                        col_type: c.col_type.to_string(),
                        is_primary_key: c.is_primary_key,
                        is_foreign_key: c.is_foreign_key,
                        is_nullable: c.is_nullable,
                    })
                    .collect(),
            })
            .collect();

        let edges = model
            .relations()
            .iter()
            .map(|r| {
                let (from_table, from_column) = model.column(r.source);
                let (to_table, to_column) = model.column(r.target);
                ColumnEdge {
                    from_table: from_table.name.clone(),
                    from_column: from_column.name.clone(),
                    to_table: to_table.name.clone(),
                    to_column: to_column.name.clone(),
                }
            })
            .collect();

        Self { tables, edges }
    }

    /// Keep only the given tables; edges with either endpoint outside the
    /// retained set are dropped
    pub fn retain_tables(&mut self, keep: &AHashSet<String>) {
        self.tables.retain(|t| keep.contains(&t.name));
        self.edges
            .retain(|e| keep.contains(&e.from_table) && keep.contains(&e.to_table));
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// A table-level edge in the summary view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityEdge {
    /// Source table (child side)
    pub from: String,
    /// Target table (parent side)
    pub to: String,
}

/// Summary view: one node per table, parallel relations between the same
/// ordered table pair collapsed into a single edge. Self-referencing
/// relations are kept as loop edges.
#[derive(Debug)]
pub struct EntityRelationView {
    /// Table names in registration order
    pub tables: Vec<String>,
    /// Collapsed edges in first-seen order
    pub edges: Vec<EntityEdge>,
}

impl EntityRelationView {
    /// Derive the summary view from a model
    pub fn from_model(model: &EntityModel) -> Self {
        let tables = model.iter_tables().map(|t| t.name.clone()).collect();

        // Collapse by ordered (source table, target table) pair: the first
        // relation for a pair emits the edge, later ones are skipped.
        let mut seen = AHashSet::new();
        let mut edges = Vec::new();
        for relation in model.relations() {
            let pair = (relation.source.table, relation.target.table);
            if seen.insert(pair) {
                let (from, _) = model.column(relation.source);
                let (to, _) = model.column(relation.target);
                edges.push(EntityEdge {
                    from: from.name.clone(),
                    to: to.name.clone(),
                });
            }
        }

        Self { tables, edges }
    }

    /// Keep only the given tables; edges with either endpoint outside the
    /// retained set are dropped
    pub fn retain_tables(&mut self, keep: &AHashSet<String>) {
        self.tables.retain(|t| keep.contains(t));
        self.edges
            .retain(|e| keep.contains(&e.from) && keep.contains(&e.to));
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDesc, ColumnType, EntityModel, ForeignKeyDesc, TableDesc};

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

    fn sample_model() -> EntityModel {
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
    fn detail_view_has_one_edge_per_relation() {
        let model = sample_model();
        let view = ColumnRelationView::from_model(&model);
        assert_eq!(view.table_count(), 3);
        assert_eq!(view.edge_count(), model.relations().len());
    }

    #[test]
    fn detail_view_preserves_column_order() {
        let model = sample_model();
        let view = ColumnRelationView::from_model(&model);
        let items = &view.tables[2];
        let names: Vec<_> = items.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "order_id", "user_id"]);
    }

    #[test]
    fn summary_view_collapses_parallel_relations() {
        let model = EntityModel::build(
            vec![
                table("users", vec![col("id", true)]),
                table(
                    "messages",
                    vec![col("id", true), col("sender_id", false), col("receiver_id", false)],
                ),
            ],
            vec![
                fk("messages", "sender_id", "users", "id"),
                fk("messages", "receiver_id", "users", "id"),
            ],
        )
        .unwrap();

        let view = EntityRelationView::from_model(&model);
        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.edges[0].from, "messages");
        assert_eq!(view.edges[0].to, "users");
    }

    #[test]
    fn summary_view_keeps_self_loop() {
        let model = EntityModel::build(
            vec![table(
                "categories",
                vec![col("id", true), col("parent_id", false)],
            )],
            vec![fk("categories", "parent_id", "categories", "id")],
        )
        .unwrap();

        let view = EntityRelationView::from_model(&model);
        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.edges[0].from, "categories");
        assert_eq!(view.edges[0].to, "categories");
    }

    #[test]
    fn isolated_table_appears_in_both_views() {
        let model = EntityModel::build(
            vec![table("settings", vec![col("id", true)])],
            vec![],
        )
        .unwrap();

        let detail = ColumnRelationView::from_model(&model);
        let summary = EntityRelationView::from_model(&model);
        assert_eq!(detail.table_count(), 1);
        assert_eq!(detail.edge_count(), 0);
        assert_eq!(summary.tables, vec!["settings"]);
        assert_eq!(summary.edge_count(), 0);
    }

    #[test]
    fn retain_tables_drops_dangling_edges() {
        let model = sample_model();
        let mut view = EntityRelationView::from_model(&model);
        let keep: AHashSet<String> =
            ["users".to_string(), "orders".to_string()].into_iter().collect();
        view.retain_tables(&keep);

        assert_eq!(view.tables, vec!["users", "orders"]);
        assert_eq!(view.edges, vec![EntityEdge {
            from: "orders".to_string(),
            to: "users".to_string(),
        }]);
    }
}
