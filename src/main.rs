use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use wpscout::{
    config::Config,
    fetch::{parse_target, HttpFetcher},
    logging::{init_logging, level_for_verbosity, LogFormat},
    model::ScanReport,
    output::{format_result_to_string, print_result, OutputFormat},
    scan::SiteScanner,
    version::VersionExtractor,
    vulndb::CveDatabase,
    wordlist::{WordlistLoader, DETECTION_WORDLIST},
};

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const ADVISORIES_FOUND: u8 = 2;
    pub const NOT_WORDPRESS: u8 = 3;
    pub const CONFIG_ERROR: u8 = 4;
}

#[derive(Parser)]
#[command(name = "wpscout")]
#[command(
    author,
    version,
    about = "Fingerprint WordPress sites and report known advisories"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a site
    Scan {
        /// Target URL (http:// is assumed when no scheme is given)
        target: String,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Advisory database (JSON)
        #[arg(long)]
        cve_db: Option<PathBuf>,

        /// Directory searched for wordlists before the built-in ones
        #[arg(long)]
        wordlist_dir: Option<PathBuf>,

        /// Detection probes in flight at once
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Exit with an error code if advisories are found
        #[arg(long)]
        fail_on_vuln: bool,

        /// Exit with an error code if the target is not WordPress
        #[arg(long)]
        fail_on_missing: bool,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let code = exit_code_for_error(&e);
            if code == exit_codes::CONFIG_ERROR {
                eprintln!("Configuration error: {:#}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(code)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let log_format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_logging(level_for_verbosity(cli.verbose), log_format);

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });

    match cli.command {
        Commands::Scan {
            target,
            format,
            cve_db,
            wordlist_dir,
            concurrency,
            timeout,
            output,
            no_color,
            fail_on_vuln,
            fail_on_missing,
        } => {
            let mut config = config;
            if let Some(path) = cve_db {
                config.cve_database = Some(path);
            }
            if let Some(dir) = wordlist_dir {
                config.wordlist_dir = Some(dir);
            }
            if let Some(n) = concurrency {
                config.concurrency = n;
            }
            if let Some(secs) = timeout {
                config.timeout_secs = secs;
            }
            if no_color {
                config.color = false;
            }

            let format_str = format.unwrap_or(config.default_format.clone());
            let format = OutputFormat::from_str(&format_str).map_err(|e| anyhow::anyhow!(e))?;

            let report = run_scan(&target, &config, format).await?;

            if let Some(path) = output {
                std::fs::write(&path, format_result_to_string(&report, format)?)?;
                if format == OutputFormat::Table {
                    println!("Results written to: {}", path);
                }
            } else {
                let colorize = config.color && format == OutputFormat::Table;
                print_result(&report, format, colorize)?;
            }

            Ok(determine_exit_code(&report, fail_on_vuln, fail_on_missing))
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

async fn run_scan(target: &str, config: &Config, format: OutputFormat) -> Result<ScanReport> {
    let target = parse_target(target)?;
    let fetcher = HttpFetcher::from_config(config)?;

    let loader = match &config.wordlist_dir {
        Some(dir) => WordlistLoader::with_dir(dir),
        None => WordlistLoader::embedded(),
    };
    let wordlist = loader.get_wordlist(DETECTION_WORDLIST)?;

    let database = match &config.cve_database {
        Some(path) => {
            let db = CveDatabase::open(path)
                .with_context(|| format!("Failed to open advisory database {}", path.display()))?;
            if db.is_empty() {
                tracing::warn!(path = %path.display(), "advisory database has no entries");
            } else {
                tracing::info!(versions = db.len(), "advisory database loaded");
            }
            Some(db)
        }
        None => {
            tracing::warn!("no advisory database configured, skipping advisory lookup");
            None
        }
    };

    let mut scanner = SiteScanner::new(&fetcher, wordlist)
        .with_concurrency(config.concurrency)
        .with_extractor(VersionExtractor::with_latest_url(&config.latest_version_url));

    if let Some(db) = &database {
        scanner = scanner.with_database(db);
    }

    if format == OutputFormat::Table {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("   {spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} Probing...")?
                .progress_chars("#>-"),
        );
        scanner = scanner.with_progress(pb);
    }

    Ok(scanner.run(&target).await?)
}

/// Determine the exit code from the report and the --fail-on-* flags
fn determine_exit_code(report: &ScanReport, fail_on_vuln: bool, fail_on_missing: bool) -> u8 {
    if fail_on_missing && !report.is_wordpress {
        exit_codes::NOT_WORDPRESS
    } else if fail_on_vuln && !report.advisories.is_empty() {
        exit_codes::ADVISORIES_FOUND
    } else {
        exit_codes::SUCCESS
    }
}

/// Bad targets, wordlists and config get their own code; everything else
/// is a plain error.
fn exit_code_for_error(e: &anyhow::Error) -> u8 {
    let is_configuration = e
        .downcast_ref::<wpscout::Error>()
        .is_some_and(wpscout::Error::is_configuration);

    if is_configuration {
        exit_codes::CONFIG_ERROR
    } else {
        exit_codes::ERROR
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'wpscout config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wpscout::model::DetectionOutcome;

    #[test]
    fn test_configuration_errors_get_their_own_exit_code() {
        let err = anyhow::Error::from(wpscout::Error::EmptyWordlist);
        assert_eq!(exit_code_for_error(&err), exit_codes::CONFIG_ERROR);

        let err = anyhow::Error::from(wpscout::Error::WordlistNotFound {
            name: "missing.txt".to_string(),
        })
        .context("loading wordlist");
        assert_eq!(exit_code_for_error(&err), exit_codes::CONFIG_ERROR);

        let err = anyhow::Error::from(wpscout::Error::ContractViolation("closed".to_string()));
        assert_eq!(exit_code_for_error(&err), exit_codes::ERROR);

        assert_eq!(exit_code_for_error(&anyhow::anyhow!("boom")), exit_codes::ERROR);
    }

    #[test]
    fn test_determine_exit_code() {
        let missing = ScanReport::new("http://wp.test/", DetectionOutcome::default());
        assert_eq!(determine_exit_code(&missing, false, false), exit_codes::SUCCESS);
        assert_eq!(determine_exit_code(&missing, false, true), exit_codes::NOT_WORDPRESS);

        let mut found = ScanReport::new("http://wp.test/", DetectionOutcome::default())
            .with_advisories(vec!["CVE-2017-0001".to_string()]);
        found.is_wordpress = true;
        assert_eq!(determine_exit_code(&found, true, true), exit_codes::ADVISORIES_FOUND);
        assert_eq!(determine_exit_code(&found, false, false), exit_codes::SUCCESS);
    }
}
