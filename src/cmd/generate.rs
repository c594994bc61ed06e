//! Generate command implementation: schema dump in, two diagrams out.

use crate::config::{CliOverrides, ErdConfig};
use crate::export;
use crate::graph::{detail_to_dot, summary_to_dot, ColumnRelationView, EntityRelationView};
use crate::reader;
use crate::schema::{DdlExtractor, EntityModel, ForeignKeyDesc, TableDesc};
use ahash::AHashSet;
use anyhow::{bail, Context, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

/// Run the generate command
#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    prefix: Option<String>,
    format: Option<String>,
    rankdir: Option<String>,
    config: Option<PathBuf>,
    tables: Option<String>,
    exclude: Option<String>,
    keep_dot: bool,
) -> Result<()> {
    let config = ErdConfig::resolve(
        CliOverrides {
            output_dir: output,
            prefix,
            format,
            rankdir,
        },
        config.as_deref(),
    )?;

    if !file.exists() {
        bail!("input file does not exist: {}", file.display());
    }

    eprintln!("Reading schema: {}", file.display());
    let (table_descs, fk_descs) = read_schema(&file)?;

    let model = EntityModel::build(table_descs, fk_descs)?;

    if model.is_empty() {
        eprintln!("No tables found in the file.");
        return Ok(());
    }

    let mut detail = ColumnRelationView::from_model(&model);
    let mut summary = EntityRelationView::from_model(&model);

    if tables.is_some() || exclude.is_some() {
        let keep = retained_tables(&model, tables.as_deref(), exclude.as_deref());
        detail.retain_tables(&keep);
        summary.retain_tables(&keep);
    }

    let detail_text = detail_to_dot(&detail, config.rankdir);
    let summary_text = summary_to_dot(&summary, config.rankdir);

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "cannot create output directory {}",
            config.output_dir.display()
        )
    })?;

    for (text, view) in [(&detail_text, "detail"), (&summary_text, "summary")] {
        if config.format.is_dot() || keep_dot {
            export::write_dot(text, &config.dot_path(view))?;
        }
        if !config.format.is_dot() {
            export::render(text, &config.image_path(view), config.format)?;
        }
    }

    eprintln!(
        "\nERD: {} tables, {} relationships ({} after collapsing)",
        detail.table_count(),
        detail.edge_count(),
        summary.edge_count()
    );

    Ok(())
}

/// Read table and foreign-key descriptors from a SQL dump file
fn read_schema(path: &Path) -> Result<(Vec<TableDesc>, Vec<ForeignKeyDesc>)> {
    let mut statements = reader::open(path)?;
    let mut extractor = DdlExtractor::new();

    while let Some(stmt) = statements
        .next_statement()
        .with_context(|| format!("error reading {}", path.display()))?
    {
        extractor.read_statement(&stmt);
    }

    Ok(extractor.finish())
}

/// Compute the set of table names retained by --tables/--exclude globs
fn retained_tables(
    model: &EntityModel,
    tables: Option<&str>,
    exclude: Option<&str>,
) -> AHashSet<String> {
    let include: Vec<Pattern> = parse_patterns(tables);
    let excluded: Vec<Pattern> = parse_patterns(exclude);

    model
        .iter_tables()
        .map(|t| t.name.as_str())
        .filter(|name| include.is_empty() || include.iter().any(|p| p.matches(name)))
        .filter(|name| !excluded.iter().any(|p| p.matches(name)))
        .map(|name| name.to_string())
        .collect()
}

fn parse_patterns(list: Option<&str>) -> Vec<Pattern> {
    list.map(|s| {
        s.split(',')
            .filter_map(|p| Pattern::new(p.trim()).ok())
            .collect()
    })
    .unwrap_or_default()
}
