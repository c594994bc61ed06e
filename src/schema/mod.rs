//! Schema model for ERD generation.
//!
//! This module provides:
//! - Data models for tables, columns, and foreign-key relations
//! - Descriptor types produced by the DDL reader
//! - Validated, all-or-nothing construction of the entity model

mod ddl;

pub use ddl::*;

use ahash::AHashMap;
use std::fmt;
use thiserror::Error;

/// Unique identifier for a table within a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

/// Unique identifier for a column within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub u16);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnId({})", self.0)
    }
}

/// SQL column type classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    /// Integer types: INT, INTEGER, TINYINT, SMALLINT, MEDIUMINT
    Int,
    /// Big integer types: BIGINT
    BigInt,
    /// Text types: CHAR, VARCHAR, TEXT, etc.
    Text,
    /// UUID types (detected by declared type)
    Uuid,
    /// Decimal/numeric types
    Decimal,
    /// Date/time types
    DateTime,
    /// Boolean type
    Bool,
    /// Any other type
    Other(String),
}

impl ColumnType {
    /// Parse a SQL type string into a ColumnType
    /// Supports MySQL, PostgreSQL, and SQLite types
    pub fn from_sql_type(type_str: &str) -> Self {
        let type_lower = type_str.to_lowercase();
        let base_type = type_lower.split('(').next().unwrap_or(&type_lower).trim();

        match base_type {
            "int" | "integer" | "tinyint" | "smallint" | "mediumint" | "int4" | "int2" => {
                ColumnType::Int
            }
            "serial" | "smallserial" => ColumnType::Int,
            "bigint" | "int8" | "bigserial" => ColumnType::BigInt,
            "char" | "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" | "enum"
            | "set" | "character" => ColumnType::Text,
            "decimal" | "numeric" | "float" | "double" | "real" | "float4" | "float8" | "money" => {
                ColumnType::Decimal
            }
            "date" | "datetime" | "timestamp" | "time" | "year" | "timestamptz" | "timetz"
            | "interval" => ColumnType::DateTime,
            "bool" | "boolean" => ColumnType::Bool,
            "binary" | "varbinary" | "blob" | "bytea" => {
                // binary(16) is the common UUID storage
                if type_lower.contains("16") {
                    ColumnType::Uuid
                } else {
                    ColumnType::Other(type_str.to_string())
                }
            }
            "uuid" => ColumnType::Uuid,
            _ => ColumnType::Other(type_str.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::BigInt => write!(f, "BIGINT"),
            ColumnType::Text => write!(f, "VARCHAR"),
            ColumnType::Uuid => write!(f, "UUID"),
            ColumnType::Decimal => write!(f, "DECIMAL"),
            ColumnType::DateTime => write!(f, "DATETIME"),
            ColumnType::Bool => write!(f, "BOOL"),
            ColumnType::Other(s) => write!(f, "{}", s.to_uppercase()),
        }
    }
}

/// Column descriptor as read from the schema source, before validation
#[derive(Debug, Clone)]
pub struct ColumnDesc {
    /// Column name
    pub name: String,
    /// Declared type
    pub col_type: ColumnType,
    /// Whether the column allows NULL values
    pub is_nullable: bool,
    /// Whether the column is part of the primary key
    pub is_primary_key: bool,
}

/// Table descriptor as read from the schema source, before validation
#[derive(Debug, Clone)]
pub struct TableDesc {
    /// Table name (schema-qualified if the source qualified it)
    pub name: String,
    /// Column descriptors in declaration order
    pub columns: Vec<ColumnDesc>,
}

/// Foreign-key descriptor as read from the schema source, before resolution
#[derive(Debug, Clone)]
pub struct ForeignKeyDesc {
    /// Constraint name, if the source named it
    pub constraint: Option<String>,
    /// Owning (child) table name
    pub source_table: String,
    /// FK column names in the owning table
    pub source_columns: Vec<String>,
    /// Referenced (parent) table name
    pub target_table: String,
    /// Referenced column names, positionally paired with `source_columns`
    pub target_columns: Vec<String>,
}

/// Column definition within a table
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type
    pub col_type: ColumnType,
    /// Position in table (0-indexed)
    pub ordinal: ColumnId,
    /// Whether this column is part of the primary key
    pub is_primary_key: bool,
    /// Whether this column is the source of a foreign-key relation
    pub is_foreign_key: bool,
    /// Whether this column allows NULL values
    pub is_nullable: bool,
}

/// Table definition with its columns in declaration order
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Table ID within the model
    pub id: TableId,
    /// Column definitions in order
    pub columns: Vec<Column>,
}

impl Table {
    /// Get a column by name (exact match first, then ASCII-case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name).or_else(|| {
            self.columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
        })
    }

    /// Get column ID by name
    pub fn get_column_id(&self, name: &str) -> Option<ColumnId> {
        self.get_column(name).map(|c| c.ordinal)
    }

    /// Get column by ID
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.get(id.0 as usize)
    }
}

/// A resolved endpoint of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    pub table: TableId,
    pub column: ColumnId,
}

/// A directed foreign-key relation between two resolved columns
#[derive(Debug, Clone)]
pub struct Relation {
    /// Constraint name, if the source named it
    pub constraint: Option<String>,
    /// FK column in the owning (child) table
    pub source: ColumnRef,
    /// Referenced column in the parent table
    pub target: ColumnRef,
}

/// Errors raised while constructing the entity model.
///
/// Both are fatal: a partial model is never returned, and no diagram is
/// produced from a model that failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The same table name was registered twice
    #[error("duplicate table definition: {name}")]
    DuplicateTable { name: String },

    /// A foreign key references a table or column absent from the model
    #[error("unresolved foreign key `{constraint}`: {source_table}.{source_column} -> {target_table}.{target_column}")]
    UnresolvedRelation {
        constraint: String,
        source_table: String,
        source_column: String,
        target_table: String,
        target_column: String,
    },
}

/// The entity model: all tables and foreign-key relations of one schema
/// snapshot. Built once per run, read-only thereafter. Tables keep their
/// registration order and relations their discovery order, so every
/// derived view iterates deterministically.
#[derive(Debug)]
pub struct EntityModel {
    tables: Vec<Table>,
    by_name: AHashMap<String, TableId>,
    relations: Vec<Relation>,
}

impl EntityModel {
    /// Build a validated model from source descriptors.
    ///
    /// Construction is all-or-nothing: a duplicate table name or a
    /// foreign key that fails to resolve aborts with an error naming the
    /// offending schema object.
    pub fn build(
        table_descs: Vec<TableDesc>,
        fk_descs: Vec<ForeignKeyDesc>,
    ) -> Result<Self, ModelError> {
        let mut tables: Vec<Table> = Vec::with_capacity(table_descs.len());
        let mut by_name: AHashMap<String, TableId> = AHashMap::with_capacity(table_descs.len());

        for desc in table_descs {
            if by_name.contains_key(&desc.name) {
                return Err(ModelError::DuplicateTable { name: desc.name });
            }
            let id = TableId(tables.len() as u32);
            let columns = desc
                .columns
                .into_iter()
                .enumerate()
                .map(|(i, c)| Column {
                    name: c.name,
                    col_type: c.col_type,
                    ordinal: ColumnId(i as u16),
                    is_primary_key: c.is_primary_key,
                    is_foreign_key: false,
                    is_nullable: c.is_nullable,
                })
                .collect();
            by_name.insert(desc.name.clone(), id);
            tables.push(Table {
                name: desc.name,
                id,
                columns,
            });
        }

        let mut relations = Vec::new();
        for fk in fk_descs {
            for (i, source_column) in fk.source_columns.iter().enumerate() {
                let target_column = fk.target_columns.get(i).map(String::as_str).unwrap_or("?");
                let unresolved = || ModelError::UnresolvedRelation {
                    constraint: fk.constraint.clone().unwrap_or_else(|| "(unnamed)".into()),
                    source_table: fk.source_table.clone(),
                    source_column: source_column.clone(),
                    target_table: fk.target_table.clone(),
                    target_column: target_column.to_string(),
                };

                let source = resolve(&tables, &by_name, &fk.source_table, source_column)
                    .ok_or_else(unresolved)?;
                let target = resolve(&tables, &by_name, &fk.target_table, target_column)
                    .ok_or_else(unresolved)?;

                tables[source.table.0 as usize].columns[source.column.0 as usize].is_foreign_key =
                    true;
                relations.push(Relation {
                    constraint: fk.constraint.clone(),
                    source,
                    target,
                });
            }
        }

        Ok(Self {
            tables,
            by_name,
            relations,
        })
    }

    /// Get table ID by name (exact match first, then ASCII-case-insensitive)
    pub fn get_table_id(&self, name: &str) -> Option<TableId> {
        if let Some(&id) = self.by_name.get(name) {
            return Some(id);
        }
        self.tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .map(|t| t.id)
    }

    /// Get table by ID
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(id.0 as usize)
    }

    /// Get table by name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.get_table_id(name).and_then(|id| self.table(id))
    }

    /// Resolve a relation endpoint to its table and column
    pub fn column(&self, r: ColumnRef) -> (&Table, &Column) {
        let table = &self.tables[r.table.0 as usize];
        (table, &table.columns[r.column.0 as usize])
    }

    /// Iterate over all tables in registration order
    pub fn iter_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// All relations in discovery order
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Get the number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the model has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn resolve(
    tables: &[Table],
    by_name: &AHashMap<String, TableId>,
    table_name: &str,
    column_name: &str,
) -> Option<ColumnRef> {
    let table_id = by_name.get(table_name).copied().or_else(|| {
        tables
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(table_name))
            .map(|t| t.id)
    })?;
    let column = tables[table_id.0 as usize].get_column_id(column_name)?;
    Some(ColumnRef {
        table: table_id,
        column,
    })
}
