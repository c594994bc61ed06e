//! ERD graph derivation and rendering.
//!
//! This module provides:
//! - Two views over the entity model: column-level (detailed) and
//!   entity-level (summary, with collapsed parallel edges)
//! - Graphviz DOT serialization for both views
//! - The two-call contract consumed by the export layer

pub mod format;
pub mod view;

pub use format::{detail_to_dot, summary_to_dot, ImageFormat, Rankdir};
pub use view::{ColumnRelationView, EntityRelationView};
// Re-export for tests and external use
#[allow(unused_imports)]
pub use view::{ColumnEdge, ColumnNode, EntityEdge, TableNode};

use crate::schema::EntityModel;

/// Render the detailed column-relation diagram for a model as a complete
/// DOT document, ready to be written to a file verbatim.
pub fn column_relation_dot(model: &EntityModel, rankdir: Rankdir) -> String {
    detail_to_dot(&ColumnRelationView::from_model(model), rankdir)
}

/// Render the summarized entity-relation diagram for a model as a complete
/// DOT document, ready to be written to a file verbatim.
pub fn entity_relation_dot(model: &EntityModel, rankdir: Rankdir) -> String {
    summary_to_dot(&EntityRelationView::from_model(model), rankdir)
}
