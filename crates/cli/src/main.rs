//! zitadel-migrate command-line tool.
//!
//! Converts Auth0 and Keycloak user exports into a ZITADEL bulk-import
//! document, and generates / validates configuration files.

mod style;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use zitadel_migrate_core::config::{AppConfig, DEFAULT_CONFIG_TOML};
use zitadel_migrate_core::migration::{run_migration, Auth0Source, KeycloakSource, Source};
use zitadel_migrate_core::{duration, MigrationConfig};

const DEFAULT_CONFIG_PATH: &str = "./zitadel-migrate.toml";

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// zitadel-migrate command-line tool.
#[derive(Parser, Debug)]
#[command(
    name = "zitadel-migrate",
    version,
    about = "Transform identity provider exports into ZITADEL import data"
)]
struct Cli {
    /// Path to a TOML configuration file. Flags override its values.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform a provider export into an import document.
    Migrate {
        #[command(subcommand)]
        provider: Provider,
    },

    /// Generate a default configuration file.
    Init {
        /// Output path for the generated config file.
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },

    /// Validate a configuration file.
    Validate,
}

#[derive(Subcommand, Debug)]
enum Provider {
    /// Transform Auth0 users and passwords.
    Auth0 {
        /// Path to the users export (one JSON object per line).
        #[arg(long)]
        users: Option<PathBuf>,

        /// Path to the passwords export (one JSON object per line).
        #[arg(long)]
        passwords: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Transform a Keycloak realm export.
    Keycloak {
        /// Path to the realm export.
        #[arg(long)]
        realm: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Flags shared by all providers.
#[derive(Args, Debug)]
struct CommonArgs {
    /// ID of the organization the users are imported into.
    #[arg(long = "org")]
    organization_id: Option<String>,

    /// Path of the generated import document.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Timeout of the import request, e.g. 30m or 1h30m.
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Mark all imported emails as verified.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    email_verified: Option<bool>,

    /// Pretty-print the generated JSON.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    multiline: Option<bool>,
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    duration::parse(s).map_err(|e| e.to_string())
}

impl CommonArgs {
    /// Apply the flags that were given on top of `config`.
    fn apply(self, config: &mut MigrationConfig) {
        if let Some(org) = self.organization_id {
            config.organization_id = org;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(email_verified) = self.email_verified {
            config.email_verified = email_verified;
        }
        if let Some(multi_line) = self.multiline {
            config.multi_line = multi_line;
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { output } => cmd_init(&output),
        Commands::Validate => {
            let path = cli
                .config
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            cmd_validate(&path)
        }
        Commands::Migrate { provider } => {
            let file = load_config(cli.config.as_deref())?;
            cmd_migrate(&file, provider)
        }
    }
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// Load the configuration file if one was given, otherwise start from the
/// built-in defaults.
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from_file(path).context("failed to load configuration file"),
        None => {
            debug!("no configuration file given, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Resolve the provider source and run-level settings from the file
/// configuration and the command-line flags.
fn resolve(file: &AppConfig, provider: Provider) -> Result<(Box<dyn Source>, MigrationConfig)> {
    let mut config = file
        .migration_config()
        .context("invalid [migration] section")?;

    let source: Box<dyn Source> = match provider {
        Provider::Auth0 {
            users,
            passwords,
            common,
        } => {
            common.apply(&mut config);
            let mut source = Auth0Source::from(&file.auth0);
            if let Some(users) = users {
                source.users_path = users;
            }
            if let Some(passwords) = passwords {
                source.passwords_path = passwords;
            }
            Box::new(source)
        }
        Provider::Keycloak { realm, common } => {
            common.apply(&mut config);
            let mut source = KeycloakSource::from(&file.keycloak);
            if let Some(realm) = realm {
                source.realm_path = realm;
            }
            Box::new(source)
        }
    };

    Ok((source, config))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_migrate(file: &AppConfig, provider: Provider) -> Result<()> {
    let (source, config) = resolve(file, provider)?;

    let report = run_migration(source.as_ref(), &config)
        .with_context(|| format!("{} migration failed", source.name()))?;

    println!(
        "{}",
        style::success(&format!(
            "{} users written to {} ({} with password)",
            report.users,
            report.output_path.display(),
            report.users_with_password
        ))
    );
    if report.users == 0 {
        println!("{}", style::warn("the export contained no users"));
    }
    Ok(())
}

fn cmd_init(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!(
            "file already exists: {}. Use a different path or remove the existing file.",
            output.display()
        );
    }

    std::fs::write(output, DEFAULT_CONFIG_TOML).context("failed to write config file")?;

    println!(
        "{}",
        style::success(&format!("Default configuration written to {}", output.display()))
    );
    println!();
    println!("Next steps:");
    println!("  1. Set migration.organization_id to the target organization");
    println!("  2. Point the [auth0] or [keycloak] paths at your exports");
    println!(
        "  3. Validate with: zitadel-migrate validate --config {}",
        output.display()
    );
    println!(
        "  4. Run: zitadel-migrate migrate auth0 --config {}",
        output.display()
    );

    Ok(())
}

fn cmd_validate(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());
    println!();

    let config = AppConfig::load_from_file(config_path).context("failed to parse configuration")?;
    println!("{}", style::success("TOML structure is valid"));

    if let Err(e) = config.validate() {
        println!("{}", style::error(&format!("Validation error: {}", e)));
        anyhow::bail!("configuration validation failed");
    }
    println!("{}", style::success("All required fields are valid"));

    println!();
    println!("{}", style::header("Configuration summary:"));
    let m = &config.migration;
    println!("  Organization  : {}", m.organization_id);
    println!("  Output        : {}", m.output_path.display());
    println!("  Timeout       : {}", m.timeout);
    println!("  Email verified: {}", m.email_verified);
    println!("  Multi-line    : {}", m.multi_line);
    println!(
        "  {}",
        style::dim(&format!(
            "auth0: {} + {}",
            config.auth0.users_path.display(),
            config.auth0.passwords_path.display()
        ))
    );
    println!(
        "  {}",
        style::dim(&format!("keycloak: {}", config.keycloak.realm_path.display()))
    );
    println!();
    println!("Configuration is valid.");

    Ok(())
}
