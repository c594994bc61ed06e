//! SQL DDL parsing for schema snapshot extraction.
//!
//! Parses CREATE TABLE and ALTER TABLE statements to extract:
//! - Column definitions with types and nullability
//! - Primary key constraints (inline and table-level)
//! - Foreign key constraints (inline and via ALTER TABLE)
//!
//! The extractor emits unvalidated descriptors in discovery order;
//! validation and resolution happen in [`super::EntityModel::build`].

use super::{ColumnDesc, ColumnType, ForeignKeyDesc, TableDesc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Regex to extract the (possibly schema-qualified) table name from CREATE TABLE.
/// Supports: `table` (MySQL), "table" (PostgreSQL), [table] (MSSQL), unquoted, schema.table
static CREATE_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?((?:[\[`"]?[\w$]+[\]`"]?\s*\.\s*)*[\[`"]?[\w$]+[\]`"]?)"#,
    )
    .unwrap()
});

/// Regex to extract the table name from ALTER TABLE
static ALTER_TABLE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^ALTER\s+TABLE\s+(?:ONLY\s+)?((?:[\[`"]?[\w$]+[\]`"]?\s*\.\s*)*[\[`"]?[\w$]+[\]`"]?)"#,
    )
    .unwrap()
});

/// Regex for a column definition: name followed by a type
static COLUMN_DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*[\[`"]?([^\[\]`"\s,]+)[\]`"]?\s+(\w+(?:\([^)]+\))?(?:\s+unsigned)?)"#)
        .unwrap()
});

/// Regex for a table-level PRIMARY KEY constraint
static PRIMARY_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)PRIMARY\s+KEY\s*(?:CLUSTERED\s+|NONCLUSTERED\s+)?\(([^)]+)\)").unwrap()
});

/// Regex for an inline PRIMARY KEY on a column definition
static INLINE_PRIMARY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

/// Regex for a FOREIGN KEY constraint with optional constraint name and
/// possibly schema-qualified referenced table
static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:CONSTRAINT\s+[\[`"]?([^\[\]`"\s]+)[\]`"]?\s+)?FOREIGN\s+KEY\s*\(([^)]+)\)\s*REFERENCES\s+((?:[\[`"]?[\w$]+[\]`"]?\s*\.\s*)*[\[`"]?[\w$]+[\]`"]?)\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Regex to detect a NOT NULL constraint
static NOT_NULL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").unwrap());

/// Extracts table and foreign-key descriptors from a stream of DDL statements.
#[derive(Debug, Default)]
pub struct DdlExtractor {
    tables: Vec<TableDesc>,
    foreign_keys: Vec<ForeignKeyDesc>,
}

impl DdlExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one statement; non-DDL statements are ignored
    pub fn read_statement(&mut self, stmt: &str) {
        let stmt = strip_leading_comments(stmt);
        if CREATE_TABLE_NAME_RE.is_match(stmt) {
            self.read_create_table(stmt);
        } else if ALTER_TABLE_NAME_RE.is_match(stmt) {
            self.read_alter_table(stmt);
        }
    }

    /// Finish extraction, yielding descriptors in discovery order
    pub fn finish(self) -> (Vec<TableDesc>, Vec<ForeignKeyDesc>) {
        (self.tables, self.foreign_keys)
    }

    fn read_create_table(&mut self, stmt: &str) -> Option<()> {
        let raw_name = CREATE_TABLE_NAME_RE.captures(stmt)?.get(1)?.as_str();
        let table_name = normalize_name(raw_name);

        let body = table_body(stmt)?;
        let mut columns = Vec::new();
        let mut pk_columns: Vec<String> = Vec::new();

        for part in split_table_body(&body) {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }

            let upper = trimmed.to_uppercase();
            if upper.starts_with("PRIMARY KEY")
                || upper.starts_with("CONSTRAINT")
                || upper.starts_with("FOREIGN KEY")
                || upper.starts_with("KEY ")
                || upper.starts_with("INDEX ")
                || upper.starts_with("UNIQUE ")
                || upper.starts_with("FULLTEXT ")
                || upper.starts_with("SPATIAL ")
                || upper.starts_with("CHECK ")
            {
                if let Some(cols) = parse_primary_key_constraint(trimmed) {
                    pk_columns.extend(cols);
                }
                self.foreign_keys
                    .extend(parse_foreign_keys(trimmed, &table_name));
            } else if let Some(mut col) = parse_column_def(trimmed) {
                if INLINE_PRIMARY_KEY_RE.is_match(trimmed) {
                    col.is_primary_key = true;
                    col.is_nullable = false;
                }
                columns.push(col);
            }
        }

        for pk_name in pk_columns {
            if let Some(col) = columns
                .iter_mut()
                .find(|c| c.name.eq_ignore_ascii_case(&pk_name))
            {
                col.is_primary_key = true;
                col.is_nullable = false;
            }
        }

        self.tables.push(TableDesc {
            name: table_name,
            columns,
        });
        Some(())
    }

    fn read_alter_table(&mut self, stmt: &str) -> Option<()> {
        let raw_name = ALTER_TABLE_NAME_RE.captures(stmt)?.get(1)?.as_str();
        let table_name = normalize_name(raw_name);
        self.foreign_keys.extend(parse_foreign_keys(stmt, &table_name));
        Some(())
    }
}

/// Skip whitespace and `--`/`/* */` comments preceding the statement keyword
fn strip_leading_comments(mut s: &str) -> &str {
    loop {
        s = s.trim_start();
        if let Some(rest) = s.strip_prefix("--") {
            match rest.find('\n') {
                Some(i) => s = &rest[i + 1..],
                None => return "",
            }
        } else if let Some(rest) = s.strip_prefix("/*") {
            match rest.find("*/") {
                Some(i) => s = &rest[i + 2..],
                None => return "",
            }
        } else {
            return s;
        }
    }
}

/// Strip quoting from a possibly schema-qualified identifier, keeping the
/// qualification as part of the name
fn normalize_name(raw: &str) -> String {
    raw.split('.')
        .map(|seg| {
            seg.trim()
                .trim_matches('`')
                .trim_matches('"')
                .trim_matches('[')
                .trim_matches(']')
        })
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Extract the body of a CREATE TABLE statement (between the first `(` and
/// its matching `)`), honoring string literals
fn table_body(stmt: &str) -> Option<String> {
    let bytes = stmt.as_bytes();
    let mut depth = 0;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &b) in bytes.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if b == b'\\' && in_string {
            escape_next = true;
            continue;
        }

        if b == b'\'' {
            in_string = !in_string;
            continue;
        }

        if in_string {
            continue;
        }

        if b == b'(' {
            if depth == 0 {
                start = Some(i + 1);
            }
            depth += 1;
        } else if b == b')' {
            depth -= 1;
            if depth == 0 {
                if let Some(s) = start {
                    return Some(stmt[s..i].to_string());
                }
            }
        }
    }

    None
}

/// Split a table body by commas, respecting nested parentheses and strings
pub fn split_table_body(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for ch in body.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            current.push(ch);
            escape_next = true;
            continue;
        }

        if ch == '\'' {
            in_string = !in_string;
            current.push(ch);
            continue;
        }

        if in_string {
            current.push(ch);
            continue;
        }

        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current = String::new();
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }

    parts
}

/// Parse a single column definition
fn parse_column_def(def: &str) -> Option<ColumnDesc> {
    let caps = COLUMN_DEF_RE.captures(def)?;
    let name = caps.get(1)?.as_str().to_string();
    let type_str = caps.get(2)?.as_str();

    Some(ColumnDesc {
        name,
        col_type: ColumnType::from_sql_type(type_str),
        is_nullable: !NOT_NULL_RE.is_match(def),
        is_primary_key: false,
    })
}

/// Parse a table-level PRIMARY KEY constraint, returning column names
fn parse_primary_key_constraint(constraint: &str) -> Option<Vec<String>> {
    let caps = PRIMARY_KEY_RE.captures(constraint)?;
    Some(parse_column_list(caps.get(1)?.as_str()))
}

/// Parse FOREIGN KEY constraints out of a statement or body fragment
fn parse_foreign_keys(stmt: &str, source_table: &str) -> Vec<ForeignKeyDesc> {
    let mut fks = Vec::new();

    for caps in FOREIGN_KEY_RE.captures_iter(stmt) {
        let constraint = caps.get(1).map(|m| m.as_str().to_string());
        let source_columns = caps
            .get(2)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();
        let target_table = caps
            .get(3)
            .map(|m| normalize_name(m.as_str()))
            .unwrap_or_default();
        let target_columns = caps
            .get(4)
            .map(|m| parse_column_list(m.as_str()))
            .unwrap_or_default();

        if !source_columns.is_empty() && !target_table.is_empty() && !target_columns.is_empty() {
            fks.push(ForeignKeyDesc {
                constraint,
                source_table: source_table.to_string(),
                source_columns,
                target_table,
                target_columns,
            });
        }
    }

    fks
}

/// Parse a comma-separated column list, stripping quotes (backticks, double
/// quotes, brackets)
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| {
            c.trim()
                .trim_matches('`')
                .trim_matches('"')
                .trim_matches('[')
                .trim_matches(']')
                .to_string()
        })
        .filter(|c| !c.is_empty())
        .collect()
}
