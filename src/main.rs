use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::debug;

use bmfind::config::{Config, SearchSettings};
use bmfind::consts::{DEFAULT_HISTORY_LIMIT, LOG_ENV, LOG_STYLE_ENV, default_db_path};
use bmfind::history::sqlite::SqliteHistory;
use bmfind::history::{History, record_reports};
use bmfind::output::{OutputFormat, Summary, ignore_broken_pipe, summary_line, write_reports};
use bmfind::scan::{ScanConfig, Scanner, Source};
use bmfind::search::Algorithm;

#[derive(Parser)]
#[command(name = "bmfind", version, author, about = "Find every occurrence of a pattern, Boyer–Moore style.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// SQLite database for config and history (use :memory: for ephemeral)
    #[arg(short, long, global = true)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Search files (or stdin) for a pattern
    Search {
        /// Text to look for
        pattern: String,

        /// Files to search; reads stdin when none are given
        files: Vec<PathBuf>,

        /// Search algorithm (default: stored config, then boyer-moore)
        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,

        /// Output format (default: stored config, then text)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Keep at most this many matches per source
        #[arg(short, long)]
        max_matches: Option<usize>,

        /// Print only the number of matches per source
        #[arg(short, long, default_value_t = false)]
        count: bool,

        /// Do not record this search in history
        #[arg(long, default_value_t = false)]
        no_history: bool,
    },
    /// Read or change stored defaults
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show past searches
    History {
        /// Number of entries to show
        #[arg(short, long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,

        /// Only entries whose pattern contains this text
        #[arg(short, long)]
        grep: Option<String>,

        /// Delete all history
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a stored value
    Get { key: String },
    /// Store a value
    Set { key: String, value: String },
    /// Remove a stored value
    Unset { key: String },
    /// Print all stored values
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    if std::env::var(LOG_ENV).is_ok() {
        let env = env_logger::Env::new()
            .filter(LOG_ENV)
            .write_style(LOG_STYLE_ENV);
        env_logger::init_from_env(env);
    }

    let cli = Cli::parse();
    let db = resolve_db(cli.db)?;
    debug!("using database {db}");

    match cli.command {
        Command::Search {
            pattern,
            files,
            algorithm,
            format,
            max_matches,
            count,
            no_history,
        } => {
            let config = Config::open(&db)?;
            let SearchSettings { algorithm, format } = config.resolve(algorithm, format)?;

            let sources: Vec<Source> = if files.is_empty() {
                vec![Source::Stdin]
            } else {
                files.into_iter().map(Source::File).collect()
            };

            let scanner = Scanner::new(ScanConfig {
                algorithm,
                max_matches,
            });
            let reports = scanner.scan(&pattern, &sources).await;
            let summary = Summary::of(&reports);

            // Recorded before printing so a closed stdout cannot lose it
            if !no_history {
                let history = SqliteHistory::new(&db)?;
                record_reports(&history, &pattern, algorithm, &reports).await?;
            }

            let mut stdout = io::stdout().lock();
            ignore_broken_pipe(
                write_reports(&mut stdout, &reports, format, count)
                    .and_then(|()| stdout.flush()),
            )?;

            if format == OutputFormat::Text {
                eprintln!("{}", summary_line(&summary));
            }

            Ok(ExitCode::from(summary.exit_status()))
        }
        Command::Config { action } => {
            let config = Config::open(&db)?;
            match action {
                ConfigAction::Get { key } => match config.get(&key)? {
                    Some(value) => println!("{value}"),
                    None => return Ok(ExitCode::FAILURE),
                },
                ConfigAction::Set { key, value } => {
                    config.set(&key, &value)?;
                    println!("✓ {key} = {value}");
                }
                ConfigAction::Unset { key } => {
                    if !config.remove(&key)? {
                        eprintln!("no value stored for `{key}`");
                        return Ok(ExitCode::FAILURE);
                    }
                    println!("✓ {key} removed");
                }
                ConfigAction::List => {
                    for (key, value) in config.entries()? {
                        println!("{key} = {value}");
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::History { limit, grep, clear } => {
            let history = SqliteHistory::new(&db)?;
            if clear {
                history.clear().await?;
                println!("✓ history cleared");
                return Ok(ExitCode::SUCCESS);
            }
            let entries = match grep {
                Some(query) => history.recall(&query).await?,
                None => history.recent(limit).await?,
            };
            for entry in entries {
                println!(
                    "{:<12} {:>6}  {:?} in {}",
                    entry.algorithm.as_str(),
                    entry.matches,
                    entry.pattern,
                    entry.source
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `--db` if given, otherwise `~/.bmfind/bmfind.db` (parent created on demand).
fn resolve_db(db: Option<String>) -> anyhow::Result<String> {
    if let Some(db) = db {
        return Ok(db);
    }
    let path = default_db_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    path.to_str()
        .map(str::to_string)
        .context("database path is not valid UTF-8")
}
