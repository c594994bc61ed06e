//! End-to-end tests over the library pipeline: SQL text → statements →
//! descriptors → validated model.

use sql_erd::reader::StatementReader;
use sql_erd::schema::{DdlExtractor, EntityModel, ModelError};

fn build_model(sql: &str) -> Result<EntityModel, ModelError> {
    let mut statements = StatementReader::new(sql.as_bytes());
    let mut extractor = DdlExtractor::new();
    while let Some(stmt) = statements.next_statement().unwrap() {
        extractor.read_statement(&stmt);
    }
    let (tables, fks) = extractor.finish();
    EntityModel::build(tables, fks)
}

const SHOP_SQL: &str = r#"
-- shop schema
CREATE TABLE users (
  id INT PRIMARY KEY,
  email VARCHAR(255) NOT NULL
);

CREATE TABLE orders (
  id INT PRIMARY KEY,
  user_id INT NOT NULL,
  placed_at DATETIME,
  FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE order_items (
  id INT PRIMARY KEY,
  order_id INT,
  user_id INT,
  CONSTRAINT fk_items_order FOREIGN KEY (order_id) REFERENCES orders(id),
  CONSTRAINT fk_items_user FOREIGN KEY (user_id) REFERENCES users(id)
);

INSERT INTO users (id, email) VALUES (1, 'alice@example.com; not a statement break');
"#;

#[test]
fn full_pipeline_builds_expected_model() {
    let model = build_model(SHOP_SQL).unwrap();

    assert_eq!(model.len(), 3);
    assert_eq!(model.relations().len(), 3);

    let users = model.get_table("users").unwrap();
    assert!(users.get_column("id").unwrap().is_primary_key);
    assert!(!users.get_column("email").unwrap().is_nullable);

    let orders = model.get_table("orders").unwrap();
    assert!(orders.get_column("user_id").unwrap().is_foreign_key);
    assert!(orders.get_column("placed_at").unwrap().is_nullable);
}

#[test]
fn relation_constraint_names_survive_the_pipeline() {
    let model = build_model(SHOP_SQL).unwrap();
    let named: Vec<_> = model
        .relations()
        .iter()
        .filter_map(|r| r.constraint.as_deref())
        .collect();
    assert_eq!(named, vec!["fk_items_order", "fk_items_user"]);
}

#[test]
fn alter_table_foreign_keys_resolve() {
    let sql = r#"
CREATE TABLE users (id INT PRIMARY KEY);
CREATE TABLE posts (id INT PRIMARY KEY, author_id INT);
ALTER TABLE posts ADD CONSTRAINT posts_author_fk
  FOREIGN KEY (author_id) REFERENCES users(id);
"#;
    let model = build_model(sql).unwrap();
    assert_eq!(model.relations().len(), 1);
    assert_eq!(
        model.relations()[0].constraint.as_deref(),
        Some("posts_author_fk")
    );
}

#[test]
fn fk_to_missing_table_fails_construction() {
    let sql = r#"
CREATE TABLE orders (
  id INT PRIMARY KEY,
  user_id INT,
  FOREIGN KEY (user_id) REFERENCES users(id)
);
"#;
    let err = build_model(sql).unwrap_err();
    assert!(matches!(
        err,
        ModelError::UnresolvedRelation { ref target_table, .. } if target_table == "users"
    ));
}

#[test]
fn fk_to_missing_column_fails_construction() {
    let sql = r#"
CREATE TABLE users (id INT PRIMARY KEY);
CREATE TABLE orders (
  id INT PRIMARY KEY,
  user_id INT,
  FOREIGN KEY (user_id) REFERENCES users(uuid)
);
"#;
    let err = build_model(sql).unwrap_err();
    assert!(matches!(
        err,
        ModelError::UnresolvedRelation { ref target_column, .. } if target_column == "uuid"
    ));
}

#[test]
fn duplicate_create_table_fails_construction() {
    let sql = r#"
CREATE TABLE users (id INT PRIMARY KEY);
CREATE TABLE users (id INT PRIMARY KEY);
"#;
    let err = build_model(sql).unwrap_err();
    assert_eq!(
        err,
        ModelError::DuplicateTable {
            name: "users".to_string()
        }
    );
}

#[test]
fn schema_qualified_names_are_kept() {
    let sql = r#"
CREATE TABLE "public"."users" (id INT PRIMARY KEY);
CREATE TABLE "public"."orders" (
  id INT PRIMARY KEY,
  user_id INT,
  FOREIGN KEY (user_id) REFERENCES "public"."users"(id)
);
"#;
    let model = build_model(sql).unwrap();
    assert!(model.get_table("public.users").is_some());
    assert_eq!(model.relations().len(), 1);
}
