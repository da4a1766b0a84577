use anyhow::{anyhow, Context};
use capmap_catalog::Catalog;
use capmap_core::{
    telemetry, CapmapConfig, Confirmation, ImportSession, ResetOutcome, SessionObserver,
};
use capmap_ingest::ImportSource;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const DEFAULT_STORE_DIR: &str = ".capmap";

/// Progress bar and notices on stderr
struct TerminalObserver;

impl SessionObserver for TerminalObserver {
    fn on_progress(&self, percent: u8) {
        let filled = usize::from(percent / 5);
        eprint!("\r[{:<20}] {percent:>3}% complete", "#".repeat(filled));
        if percent == 100 {
            eprintln!();
        }
    }

    fn on_failure(&self, message: &str) {
        eprintln!("\n{message}");
    }
}

/// y/N prompt on the controlling terminal
struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn cli() -> Command {
    Command::new("capmap")
        .version(capmap_core::VERSION)
        .about("Capability maturity heat-map: import, show and reset capability levels")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("store-dir")
                .long("store-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding persisted capability levels"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(Command::new("show").about("Print the current capability heat-map"))
        .subcommand(
            Command::new("import")
                .about("Import capability levels from a CSV file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("CSV file with a header row and `capability,level` rows"),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Discard imported levels and restore defaults")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Skip the confirmation prompt"),
                ),
        )
        .subcommand(Command::new("sample").about("Print a sample import file"))
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<CapmapConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => CapmapConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CapmapConfig::new(),
    };

    if let Some(dir) = matches.get_one::<PathBuf>("store-dir") {
        config.store_dir = Some(dir.clone());
    } else if config.store_dir.is_none() {
        config.store_dir = Some(PathBuf::from(DEFAULT_STORE_DIR));
    }
    Ok(config)
}

fn render(catalog: &Catalog) {
    for category in catalog.categories() {
        println!("{}", category.category);
        for item in &category.items {
            let level = item.level.value();
            let dots: String = (1..=4).map(|i| if i <= level { '●' } else { '○' }).collect();
            println!("  {dots} {level} {:<12} {}", item.level.label(), item.name);
        }
        println!();
    }
}

async fn run(matches: ArgMatches) -> anyhow::Result<ExitCode> {
    let config = load_config(&matches)?;
    let store = config.build_store();
    let session = ImportSession::restore(config, store, Arc::new(TerminalObserver)).await?;

    match matches.subcommand() {
        Some(("show", _)) => render(&session.catalog()),
        Some(("import", sub)) => {
            let file = sub
                .get_one::<PathBuf>("file")
                .ok_or_else(|| anyhow!("missing file argument"))?;
            let source = ImportSource::from_path(file);
            eprintln!("Selected file: {}", source.display_name());

            match session.start(source).await {
                Ok(outcome) => {
                    render(&outcome.catalog);
                    if !outcome.persisted {
                        return Ok(ExitCode::from(2));
                    }
                }
                Err(_) => return Ok(ExitCode::FAILURE),
            }
        }
        Some(("reset", sub)) => {
            let outcome = if sub.get_flag("yes") {
                session.reset_import(&|_: &str| true).await?
            } else {
                session.reset_import(&StdinConfirmation).await?
            };
            match outcome {
                ResetOutcome::Reset => eprintln!("Capability levels reset to defaults."),
                ResetOutcome::Declined => eprintln!("Reset cancelled."),
            }
        }
        Some(("sample", _)) => print!("{}", session.definition().generate_default().to_sample_csv()),
        Some((other, _)) => return Err(anyhow!("unknown command '{other}'")),
        None => return Err(anyhow!("no command given")),
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();

    if let Err(e) = telemetry::init_tracing(matches.get_flag("json-logs")) {
        eprintln!("failed to initialise logging: {e}");
    }

    match run(matches).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
