use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "qci-assets", version, about = "Generate the quantum carbon intelligence assets")]
struct Cli {
    /// Working directory containing the `assets/` tree.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Create the output directories if they are missing.
    #[arg(long)]
    create_dirs: bool,

    /// Circuit diagram renderer.
    #[arg(long, value_enum, default_value_t = DiagramChoice::Auto)]
    diagram: DiagramChoice,

    /// Parent directory for staged animation frames (defaults to the system temp dir).
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DiagramChoice {
    /// Probe for the native circuit renderer, fall back to text.
    Auto,
    Circuit,
    Text,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let opts = qci_assets::GenerateOpts {
        root: cli.root,
        create_dirs: cli.create_dirs,
        staging_root: cli.staging_dir,
        diagram: match cli.diagram {
            DiagramChoice::Auto => None,
            DiagramChoice::Circuit => Some(qci_assets::DiagramKind::Circuit),
            DiagramChoice::Text => Some(qci_assets::DiagramKind::TextFallback),
        },
        system_fonts: true,
    };

    let report = qci_assets::generate_all(&opts)
        .with_context(|| format!("generate assets under '{}'", opts.root.display()))?;
    tracing::info!(
        files = report.written().len(),
        diagram = report.diagram_kind.as_str(),
        "generation finished"
    );

    println!("{}", qci_assets::COMPLETION_MESSAGE);
    Ok(())
}
