//! Output format types for diagram export.

mod dot;

pub use dot::{detail_to_dot, summary_to_dot};

use std::fmt;
use std::str::FromStr;

/// Image format produced by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Graphviz DOT text written as-is (no external renderer needed)
    Dot,
    /// SVG via the `dot` renderer
    #[default]
    Svg,
    /// PNG via the `dot` renderer
    Png,
    /// PDF via the `dot` renderer
    Pdf,
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" | "graphviz" => Ok(ImageFormat::Dot),
            "svg" => Ok(ImageFormat::Svg),
            "png" => Ok(ImageFormat::Png),
            "pdf" => Ok(ImageFormat::Pdf),
            _ => Err(format!(
                "Unknown format: {}. Valid options: dot, svg, png, pdf",
                s
            )),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl ImageFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Dot => "gv",
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
            ImageFormat::Pdf => "pdf",
        }
    }

    /// Whether this format is the DOT text itself (no renderer involved)
    pub fn is_dot(&self) -> bool {
        matches!(self, ImageFormat::Dot)
    }
}

/// Layout direction for the diagram (Graphviz rankdir)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rankdir {
    /// Left to right
    #[default]
    LR,
    /// Right to left
    RL,
    /// Top to bottom
    TB,
    /// Bottom to top
    BT,
}

impl FromStr for Rankdir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LR" => Ok(Rankdir::LR),
            "RL" => Ok(Rankdir::RL),
            "TB" => Ok(Rankdir::TB),
            "BT" => Ok(Rankdir::BT),
            _ => Err(format!(
                "Unknown rankdir: {}. Valid options: LR, RL, TB, BT",
                s
            )),
        }
    }
}

impl fmt::Display for Rankdir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rankdir::LR => write!(f, "LR"),
            Rankdir::RL => write!(f, "RL"),
            Rankdir::TB => write!(f, "TB"),
            Rankdir::BT => write!(f, "BT"),
        }
    }
}
