use clap::{Parser, Subcommand};
use retro_blocks::content::FreeContent;
use retro_blocks::entry::{self, EntryKind};
use retro_blocks::{config, output, render, scan, text};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "retro-blocks")]
#[command(about = "Render and inspect free-form retrospective content")]
#[command(long_about = "\
Render and inspect free-form retrospective content

Content is block-structured JSON as written by the retrospective editor.
Older shapes are accepted everywhere and upgraded on read:

  { \"blocks\": [ { \"type\": \"paragraph\", \"data\": { \"text\": \"...\" } } ] }
  { \"text\": \"written before blocks existed\" }
  \"a bare string\"

A FILE may also hold a whole entry record (id, date, type, content); its
FREE content is used. Pass '-' to read from stdin.

Entry directory layout:

  entries/
  ├── config.toml                  # Viewer labels and colors (optional)
  ├── 2024-06-10-kpt.json          # One entry record per file
  ├── 2024-06-12-free.json
  ├── archive/                     # Subdirectories are walked too
  └── .drafts/                     # Hidden entries are skipped

Run 'retro-blocks gen-config' to generate a documented config.toml.
Set RUST_LOG (e.g. RUST_LOG=retro_blocks=debug) for diagnostics.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render content as HTML
    Render {
        /// Content or entry JSON, '-' for stdin
        file: PathBuf,
        /// Emit a complete HTML page with styles instead of a fragment
        #[arg(long)]
        standalone: bool,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the plain text used for search
    Text {
        /// Content or entry JSON, '-' for stdin
        file: PathBuf,
        /// Print the character count instead of the text
        #[arg(long)]
        count: bool,
    },
    /// Print content upgraded to the current block format
    Normalize {
        /// Content or entry JSON, '-' for stdin
        file: PathBuf,
    },
    /// Print the block tree
    Outline {
        /// Content or entry JSON, '-' for stdin
        file: PathBuf,
    },
    /// Validate every entry record under a directory
    Check {
        /// Entries directory
        dir: PathBuf,
    },
    /// Find entries containing a query, newest first
    Search {
        /// Entries directory
        dir: PathBuf,
        /// Case-insensitive text to look for
        query: String,
        /// Only entries of this type
        #[arg(long, value_enum)]
        kind: Option<EntryKind>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            file,
            standalone,
            output,
        } => {
            let content = read_content(&file)?;
            let config = config::load_config(&cli.config_dir)?;
            let markup = if standalone {
                render::render_document(&content, &config)
            } else {
                render::render_content(&content, &config.labels)
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, markup.into_string())?;
                    tracing::info!(path = %path.display(), "wrote HTML");
                }
                None => println!("{}", markup.into_string()),
            }
        }
        Command::Text { file, count } => {
            let content = read_content(&file)?;
            if count {
                println!("{}", text::char_count(&content));
            } else {
                println!("{}", text::plain_text(&content));
            }
        }
        Command::Normalize { file } => {
            let content = read_content(&file)?;
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Outline { file } => {
            let content = read_content(&file)?;
            output::print_outline(&content);
        }
        Command::Check { dir } => {
            println!("==> Checking {}", dir.display());
            let report = scan::scan(&dir)?;
            output::print_scan_output(&report);
            println!("==> Entries are valid");
        }
        Command::Search { dir, query, kind } => {
            let entries = scan::scan(&dir)?.into_entries();
            let found = entry::search(&entries, &query, kind);
            output::print_search_results(&found, &query);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays clean for piping.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retro_blocks=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Read free-form content from a file, or stdin when `path` is `-`.
fn read_content(path: &Path) -> Result<FreeContent, Box<dyn std::error::Error>> {
    let json = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    let content = entry::parse_free_content(&json)?;
    tracing::debug!(blocks = content.blocks.len(), "read content");
    Ok(content)
}
