mod generate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-erd")]
#[command(version)]
#[command(about = "Generate entity-relationship diagrams from SQL schema dumps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the detailed and summary ER diagrams from a SQL file
    Generate {
        /// Input SQL file with CREATE TABLE statements
        /// Supports .gz, .bz2, .xz, .zst compression
        file: PathBuf,

        /// Output directory for the diagram files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File-name prefix; output files are <prefix>-detail.* and <prefix>-summary.*
        #[arg(short, long)]
        prefix: Option<String>,

        /// Output format: dot, svg, png, pdf (svg by default; non-dot formats
        /// require Graphviz)
        #[arg(short, long)]
        format: Option<String>,

        /// Diagram layout direction: LR, RL, TB, BT
        #[arg(short, long)]
        rankdir: Option<String>,

        /// YAML config file (default: sql-erd.yaml in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only include tables matching these glob patterns (comma-separated)
        #[arg(short, long)]
        tables: Option<String>,

        /// Exclude tables matching these glob patterns (comma-separated)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Keep the .gv files when rendering images
        #[arg(long)]
        keep_dot: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            file,
            output,
            prefix,
            format,
            rankdir,
            config,
            tables,
            exclude,
            keep_dot,
        } => generate::run(
            file, output, prefix, format, rankdir, config, tables, exclude, keep_dot,
        ),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}
