//! Diagram export: DOT file writing and Graphviz rendering.
//!
//! The renderer boundary is one narrow call: DOT text in, image file out.
//! Text is piped to the `dot` subprocess over stdin, so no intermediate
//! file exists to clean up.

use crate::graph::ImageFormat;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Write a DOT document to a file verbatim
pub fn write_dot(dot_text: &str, path: &Path) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    file.write_all(dot_text.as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))?;
    eprintln!("DOT written to: {}", path.display());
    Ok(())
}

/// Render a DOT document to an image using the Graphviz `dot` command
pub fn render(dot_text: &str, output_path: &Path, format: ImageFormat) -> Result<()> {
    let format_arg = format!("-T{}", format.extension());

    let mut child = Command::new("dot")
        .arg(&format_arg)
        .arg("-o")
        .arg(output_path)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "Graphviz 'dot' command not found. Install Graphviz or use --format dot instead."
                )
            } else {
                anyhow::anyhow!("Failed to run dot: {}", e)
            }
        })?;

    if let Some(ref mut stdin) = child.stdin {
        stdin.write_all(dot_text.as_bytes())?;
    }

    let status = child.wait()?;
    if !status.success() {
        bail!("Graphviz dot command failed with status: {}", status);
    }

    eprintln!("Rendered to: {}", output_path.display());
    Ok(())
}
