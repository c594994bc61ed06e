//! Graphviz DOT output for the two diagram views.
//!
//! Rendering is a single-pass, stateless transformation: a well-formed
//! view always renders, and the same view always produces byte-identical
//! text (iteration is over the view's ordered vectors, never a hash map).

use crate::graph::format::Rankdir;
use crate::graph::view::{ColumnRelationView, EntityRelationView, TableNode};

/// Generate the detailed (column-level) DOT document: one record-style
/// node per table listing every column, one edge per foreign-key relation
/// wired between column ports.
pub fn detail_to_dot(view: &ColumnRelationView, rankdir: Rankdir) -> String {
    let mut output = String::new();

    output.push_str("digraph ERD {\n");
    output.push_str("  graph [pad=\"0.5\", nodesep=\"1\", ranksep=\"1.5\"];\n");
    output.push_str(&format!("  rankdir={};\n", rankdir));
    output.push_str("  node [shape=none, margin=0];\n");
    output.push_str("  edge [arrowhead=crow, arrowtail=none, dir=both];\n\n");

    for table in &view.tables {
        let label = table_label(table);
        output.push_str(&format!(
            "  {} [label=<{}>];\n",
            escape_dot_id(&table.name),
            label
        ));
    }

    if !view.edges.is_empty() {
        output.push('\n');
    }

    for edge in &view.edges {
        let label = format!("{}→{}", edge.from_column, edge.to_column);
        output.push_str(&format!(
            "  {}:{} -> {}:{} [label=\"{}\"];\n",
            escape_dot_id(&edge.from_table),
            escape_dot_id(&edge.from_column),
            escape_dot_id(&edge.to_table),
            escape_dot_id(&edge.to_column),
            escape_dot_string(&label)
        ));
    }

    output.push_str("}\n");
    output
}

/// Generate the summary (entity-level) DOT document: one box node per
/// table, one edge per collapsed table pair.
pub fn summary_to_dot(view: &EntityRelationView, rankdir: Rankdir) -> String {
    let mut output = String::new();

    output.push_str("digraph ERD {\n");
    output.push_str("  graph [pad=\"0.5\", nodesep=\"0.6\", ranksep=\"1\"];\n");
    output.push_str(&format!("  rankdir={};\n", rankdir));
    output.push_str("  node [shape=box, style=\"rounded,filled\", fillcolor=\"#e2e8f0\"];\n");
    output.push_str("  edge [arrowhead=crow, arrowtail=none, dir=both];\n\n");

    for table in &view.tables {
        output.push_str(&format!(
            "  {} [label=\"{}\"];\n",
            escape_dot_id(table),
            escape_dot_string(table)
        ));
    }

    if !view.edges.is_empty() {
        output.push('\n');
    }

    for edge in &view.edges {
        output.push_str(&format!(
            "  {} -> {};\n",
            escape_dot_id(&edge.from),
            escape_dot_id(&edge.to)
        ));
    }

    output.push_str("}\n");
    output
}

/// Generate the HTML-like table label for the detailed view
fn table_label(table: &TableNode) -> String {
    let mut html = String::new();

    html.push_str("<TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\" CELLPADDING=\"4\">");

    html.push_str(&format!(
        "<TR><TD BGCOLOR=\"#4a5568\" COLSPAN=\"3\"><FONT COLOR=\"white\"><B>{}</B></FONT></TD></TR>",
        escape_html(&table.name)
    ));

    for col in &table.columns {
        let key_marker = if col.is_primary_key {
            "🔑 PK"
        } else if col.is_foreign_key {
            "🔗 FK"
        } else {
            ""
        };

        let null_marker = if col.is_nullable && !col.is_primary_key {
            " <FONT COLOR=\"#888888\">NULL</FONT>"
        } else {
            ""
        };

        html.push_str("<TR>");
        html.push_str(&format!(
            "<TD ALIGN=\"LEFT\" PORT=\"{}\">{}{}</TD>",
            escape_html(&col.name),
            escape_html(&col.name),
            null_marker
        ));
        html.push_str(&format!(
            "<TD ALIGN=\"LEFT\"><FONT COLOR=\"#666666\">{}</FONT></TD>",
            escape_html(&col.col_type)
        ));
        html.push_str(&format!("<TD ALIGN=\"CENTER\">{}</TD>", key_marker));
        html.push_str("</TR>");
    }

    html.push_str("</TABLE>");
    html
}

/// Escape a string for use in DOT HTML labels
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Escape a string for use as a DOT node or port ID: plain identifiers
/// pass through, anything else is double-quoted
fn escape_dot_id(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_') {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Escape a string for use inside a double-quoted DOT attribute value
fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
