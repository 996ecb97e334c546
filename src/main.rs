use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use scrumbook::parser::roster::RosterTarget;
use scrumbook::parser::{parse_rosters, parse_season, parse_team_list, CalendarParser, SimpleTable};
use scrumbook::registry::{MemoryRegistry, SeasonContext};
use scrumbook::{Context, Result};

#[derive(Parser)]
#[command(name = "scrumbook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Historical rugby records ingestion", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a column-aligned standings table into rows and matches
    Table {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Registry fixture JSON
        #[arg(short, long)]
        registry: PathBuf,

        /// Season context JSON
        #[arg(short, long)]
        season: Option<PathBuf>,
    },

    /// Parse a narrative match calendar into match records
    Calendar {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Season context JSON
        #[arg(short, long)]
        season: PathBuf,
    },

    /// Parse a season header blurb into title, years and date span
    Season {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Parse a roster list into player-season assignments
    Roster {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,

        /// Registry fixture JSON
        #[arg(short, long)]
        registry: PathBuf,

        #[arg(long)]
        season_id: u32,

        #[arg(long)]
        team_id: u32,

        #[arg(long)]
        year: i32,

        /// Create persons not found in the registry
        #[arg(long)]
        create: bool,
    },

    /// Parse an archival team list into team entries
    Teams {
        /// Input file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Table {
            file,
            registry,
            season,
        } => {
            let registry = load_registry(&registry)?;
            let ctx = season.map(|p| load_season(&p)).transpose()?;
            let parsed = SimpleTable::build(&read_input(file)?).parse(&registry, ctx.as_ref());
            eprintln!(
                "{}",
                format!(
                    "{} rows, {} matches",
                    parsed.rows.len(),
                    parsed.matches.len()
                )
                .green()
            );
            emit(&serde_json::json!({ "rows": parsed.rows, "matches": parsed.matches }))
        }

        Commands::Calendar { file, season } => {
            let ctx = load_season(&season)?;
            let matches = CalendarParser::new(&ctx).parse(&read_input(file)?);
            eprintln!("{}", format!("{} matches", matches.len()).green());
            emit(&matches)
        }

        Commands::Season { file } => {
            let header = parse_season(&read_input(file)?)?;
            eprintln!("{}", format!("{} {}", header.title, header.year).green());
            emit(&header)
        }

        Commands::Roster {
            file,
            registry,
            season_id,
            team_id,
            year,
            create,
        } => {
            let mut reg = load_registry(&registry)?;
            let target = RosterTarget {
                season_id,
                team_id,
                year,
            };
            let assignments = parse_rosters(&read_input(file)?, &mut reg, target, create);
            eprintln!("{}", format!("{} assignments", assignments.len()).green());
            emit(&assignments)
        }

        Commands::Teams { file } => {
            let entries = parse_team_list(&read_input(file)?);
            eprintln!("{}", format!("{} teams", entries.len()).green());
            emit(&entries)
        }
    }
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn load_registry(path: &PathBuf) -> Result<MemoryRegistry> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read registry {}", path.display()))?;
    MemoryRegistry::from_json(&json)
}

fn load_season(path: &PathBuf) -> Result<SeasonContext> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read season context {}", path.display()))?;
    serde_json::from_str(&json).context("invalid season context JSON")
}

fn emit<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
