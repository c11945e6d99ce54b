//! firstline CLI - note title extraction tool
//!
//! Derives filenames for Markdown notes from their first line.

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use firstline::{title_from_line, OsPreset, Proposal, Settings, TitleExtractor};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Note filenames from first lines
#[derive(Parser)]
#[command(
    name = "firstline",
    version,
    about = "Derive note filenames from their first line",
    long_about = "firstline - Derive Markdown note filenames from their first line.\n\n\
                  Strips markup, resolves links and sanitizes the result for the\n\
                  target filesystem.\n\n\
                  Usage:\n  \
                  firstline line \"# My **note**\"   Title for a single line\n  \
                  firstline file note.md           Title for a note\n  \
                  firstline scan ./vault -r        Titles for every note in a folder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Target platform for filename rules
    #[arg(long, global = true)]
    os: Option<OsArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the title for a raw first line
    Line {
        /// Line text
        text: String,
    },

    /// Print the proposed title for a note file
    File {
        /// Note path
        path: PathBuf,
    },

    /// List notes whose filename differs from their proposed title
    Scan {
        /// Directory to scan
        dir: PathBuf,

        /// Descend into subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Output JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Print the effective settings as JSON
    Settings,
}

/// Target platform
#[derive(Clone, Copy, ValueEnum)]
enum OsArg {
    Linux,
    Macos,
    Windows,
    Android,
    Ios,
}

impl From<OsArg> for OsPreset {
    fn from(os: OsArg) -> Self {
        match os {
            OsArg::Linux => OsPreset::Linux,
            OsArg::Macos => OsPreset::MacOs,
            OsArg::Windows => OsPreset::Windows,
            OsArg::Android => OsPreset::Android,
            OsArg::Ios => OsPreset::Ios,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(cli.settings.as_deref(), cli.os)?;

    match cli.command {
        Commands::Line { text } => {
            println!("{}", title_from_line(&text, &settings));
        }

        Commands::File { path } => {
            let proposal = TitleExtractor::with_settings(settings).propose_file(&path)?;
            println!("{}", proposal.title);
            if let Some(ref safeword) = proposal.blocked_by {
                eprintln!(
                    "{} blocked by safeword \"{}\"",
                    "!".yellow().bold(),
                    safeword
                );
            }
        }

        Commands::Scan {
            dir,
            recursive,
            json,
        } => {
            run_scan(&dir, recursive, json, settings)?;
        }

        Commands::Settings => {
            println!("{}", settings.to_json_pretty()?);
        }
    }

    Ok(())
}

fn load_settings(
    path: Option<&Path>,
    os: Option<OsArg>,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match path {
        Some(p) => Settings::load(p)?,
        None => Settings::default(),
    };
    if let Some(os) = os {
        settings = settings.with_os_preset(os.into());
    }
    settings.validate()?;
    Ok(settings)
}

/// One note whose title would change.
struct Rename {
    path: PathBuf,
    current: String,
    proposal: Proposal,
}

fn run_scan(
    dir: &Path,
    recursive: bool,
    json: bool,
    settings: Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = create_spinner("Scanning notes...");

    let mut notes = Vec::new();
    collect_notes(dir, recursive, &mut notes)?;
    notes.sort();

    let extractor = TitleExtractor::with_settings(settings);
    let mut renames = Vec::new();
    for (i, path) in notes.iter().enumerate() {
        pb.set_message(format!("Reading notes... {}/{}", i + 1, notes.len()));
        let proposal = match extractor.propose_file(path) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let current = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if proposal.differs_from(&current) {
            renames.push(Rename {
                path: path.clone(),
                current,
                proposal,
            });
        }
    }

    pb.finish_and_clear();

    if json {
        let entries: Vec<_> = renames
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "current": r.current,
                    "title": r.proposal.title,
                    "blockedBy": r.proposal.blocked_by,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for rename in &renames {
        match rename.proposal.blocked_by {
            Some(ref safeword) => println!(
                "  {} {} → {} {}",
                "!".yellow().bold(),
                rename.current,
                rename.proposal.title.dimmed(),
                format!("(safeword \"{}\")", safeword).yellow()
            ),
            None => println!(
                "  {} {} → {}",
                "→".green(),
                rename.current,
                rename.proposal.title.bold()
            ),
        }
    }

    let blocked = renames.iter().filter(|r| r.proposal.is_blocked()).count();
    println!("\n{}", "Scan Summary".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Notes".bold(), notes.len());
    println!("{}: {}", "To rename".bold(), renames.len() - blocked);
    println!("{}: {}", "Blocked".bold(), blocked);

    Ok(())
}

/// Collects `*.md` files under `dir`.
fn collect_notes(dir: &Path, recursive: bool, notes: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            let hidden = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with('.'));
            if recursive && !hidden {
                collect_notes(&path, recursive, notes)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "md") {
            notes.push(path);
        }
    }
    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
