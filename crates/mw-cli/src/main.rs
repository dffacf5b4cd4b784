//! Model Warden CLI
//!
//! Command-line driver for the Model Warden governance pipeline:
//! inventory inspection, risk tiering, lifecycle risk review, and the
//! audit export run.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use mw_core::{ExportRun, ManifestBuilder, RecordStore, RiskTier};
use mw_observability::{AuditEventType, AuditResult, GovernanceAuditLog};
use std::path::PathBuf;
use uuid::Uuid;

mod config;
mod inputs;
mod seed;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "model-warden")]
#[command(author = "Model Warden Team")]
#[command(version)]
#[command(about = "AI system inventory, risk tiering, and auditable evidence packaging", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: OutputFormat,

    /// Inventory file (JSON array of system records)
    #[arg(long, value_name = "FILE")]
    inventory: Option<PathBuf>,

    /// Lifecycle risks file (JSON array of risk entries)
    #[arg(long, value_name = "FILE")]
    risks: Option<PathBuf>,

    /// Use the built-in demo inventory
    #[arg(long)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the system inventory
    Inventory {
        #[command(subcommand)]
        action: InventoryCommands,
    },

    /// Compute and inspect risk tier classifications
    Tier {
        #[command(subcommand)]
        action: TierCommands,
    },

    /// Inspect the lifecycle risk catalog
    Risk {
        #[command(subcommand)]
        action: RiskCommands,
    },

    /// Run the full export pipeline: artifacts, manifest, archive
    Export {
        /// Output directory for this run
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Archive file name
        #[arg(long)]
        archive_name: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
enum InventoryCommands {
    /// List inventoried systems
    List,

    /// Show one system by name or id
    Show {
        /// System name or UUID
        system: String,
    },
}

#[derive(Subcommand)]
enum TierCommands {
    /// Classify all systems and list the results
    List,

    /// Classify one system by name or id
    Compute {
        /// System name or UUID
        system: String,
    },
}

#[derive(Subcommand)]
enum RiskCommands {
    /// List lifecycle risks ranked by severity
    List {
        /// Restrict to one system (name or UUID)
        #[arg(short, long)]
        system: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = AppConfig::load(&config_path).unwrap_or_else(|_| {
        if cli.verbose {
            eprintln!("Using default configuration (no config file found)");
        }
        AppConfig::default()
    });

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config
            .logging
            .level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    };
    mw_observability::init_logging_with_config(mw_observability::LoggingConfig {
        level: log_level,
        json_format: cli.format == OutputFormat::Json || config.logging.json,
        ..Default::default()
    });

    let mut store = build_store(&cli)?;

    match &cli.command {
        Commands::Inventory { action } => cmd_inventory(action, &store, cli.format),
        Commands::Tier { action } => cmd_tier(action, &mut store, cli.format),
        Commands::Risk { action } => cmd_risk(action, &store, cli.format),
        Commands::Export {
            output_dir,
            archive_name,
        } => cmd_export(
            &mut store,
            &config,
            output_dir.clone(),
            archive_name.clone(),
            cli.format,
        ),
        Commands::Config => cmd_config(&config, cli.format),
    }
}

fn default_config_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "model-warden", "model-warden") {
        dirs.config_dir().join("config.yaml")
    } else {
        PathBuf::from("config/default.yaml")
    }
}

/// Builds the record store from the selected input source.
fn build_store(cli: &Cli) -> Result<RecordStore> {
    if cli.demo {
        return seed::demo_store();
    }

    let mut store = RecordStore::new();
    if let Some(path) = &cli.inventory {
        for input in inputs::load_inventory(path)? {
            store
                .register(input.into_record())
                .context("Failed to register system record")?;
        }
    }
    if let Some(path) = &cli.risks {
        for input in inputs::load_risks(path)? {
            let risk = input.into_risk(&store)?;
            store.record_risk(risk).context("Failed to record risk")?;
        }
    }
    Ok(store)
}

/// Resolves a system reference given as a name or a UUID.
fn resolve_system(store: &RecordStore, reference: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(reference) {
        if store.system(id).is_some() {
            return Ok(id);
        }
    }
    store
        .system_by_name(reference)
        .map(|r| r.system_id)
        .with_context(|| format!("Unknown system: {}", reference))
}

fn tier_colored(tier: RiskTier) -> colored::ColoredString {
    match tier {
        RiskTier::Tier1 => tier.to_string().red(),
        RiskTier::Tier2 => tier.to_string().yellow(),
        RiskTier::Tier3 => tier.to_string().green(),
    }
}

fn cmd_inventory(
    action: &InventoryCommands,
    store: &RecordStore,
    format: OutputFormat,
) -> Result<()> {
    match action {
        InventoryCommands::List => {
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&store.records())?);
                return Ok(());
            }
            println!("{}", "AI System Inventory".bold());
            println!("───────────────────");
            if store.is_empty() {
                println!("No systems registered (use --demo or --inventory)");
                return Ok(());
            }
            for record in store.records() {
                println!(
                    "  {} {} [{}] {} / {} / {}",
                    record.system_id.to_string()[..8].cyan(),
                    record.name.bold(),
                    record.ai_type,
                    record.decision_criticality,
                    record.data_sensitivity,
                    record.deployment_mode
                );
            }
        }
        InventoryCommands::Show { system } => {
            let id = resolve_system(store, system)?;
            let record = store
                .system(id)
                .context("System disappeared from the store")?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(record)?);
                return Ok(());
            }
            println!("{} {}", "System:".bold(), record.name);
            println!("─────────────────────────────────────────");
            println!("  {} {}", "Id:".cyan(), record.system_id);
            println!("  {} {}", "Domain:".cyan(), record.domain);
            println!("  {} {}", "Type:".cyan(), record.ai_type);
            println!("  {} {}", "Owner:".cyan(), record.owner_role);
            println!("  {} {}", "Deployment:".cyan(), record.deployment_mode);
            println!("  {} {}", "Criticality:".cyan(), record.decision_criticality);
            println!("  {} {}", "Automation:".cyan(), record.automation_level);
            println!("  {} {}", "Sensitivity:".cyan(), record.data_sensitivity);
            println!(
                "  {} {}",
                "Dependencies:".cyan(),
                if record.external_dependencies.is_empty() {
                    "none".to_string()
                } else {
                    record.external_dependencies.join(", ")
                }
            );
            println!("  {} {}", "Updated:".cyan(), record.last_updated);
        }
    }
    Ok(())
}

fn cmd_tier(action: &TierCommands, store: &mut RecordStore, format: OutputFormat) -> Result<()> {
    match action {
        TierCommands::List => {
            store.recompute_all_tiers();
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&store.tier_results())?);
                return Ok(());
            }
            println!("{}", "Risk Tiering Results".bold());
            println!("────────────────────");
            for result in store.tier_results() {
                let name = store
                    .system(result.system_id)
                    .map(|r| r.name.as_str())
                    .unwrap_or("Unknown");
                println!(
                    "  {} {} (total {})",
                    tier_colored(result.risk_tier),
                    name,
                    result.score_breakdown.total_score
                );
            }
        }
        TierCommands::Compute { system } => {
            let id = resolve_system(store, system)?;
            let result = store.recompute_tier(id)?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(result)?);
                return Ok(());
            }
            println!("{} {}", "Tier:".bold(), tier_colored(result.risk_tier));
            println!("  {} {}", "Total:".cyan(), result.score_breakdown.total_score);
            println!("  {} {}", "Version:".cyan(), result.scoring_version);
            println!("  {}", result.justification);
            println!("  {}", "Required controls:".cyan());
            for control in &result.required_controls {
                println!("    - {}", control);
            }
        }
    }
    Ok(())
}

fn cmd_risk(action: &RiskCommands, store: &RecordStore, format: OutputFormat) -> Result<()> {
    match action {
        RiskCommands::List { system } => {
            let ranked = match system {
                Some(reference) => {
                    let id = resolve_system(store, reference)?;
                    store
                        .risks_by_severity()
                        .into_iter()
                        .filter(|r| r.system_id == id)
                        .collect()
                }
                None => store.risks_by_severity(),
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&ranked)?);
                return Ok(());
            }
            println!("{}", "Lifecycle Risk Map (by severity)".bold());
            println!("────────────────────────────────");
            if ranked.is_empty() {
                println!("No lifecycle risks recorded");
                return Ok(());
            }
            for risk in ranked {
                let severity = match risk.severity {
                    s if s >= 15 => s.to_string().red(),
                    s if s >= 8 => s.to_string().yellow(),
                    s => s.to_string().green(),
                };
                let name = store
                    .system(risk.system_id)
                    .map(|r| r.name.as_str())
                    .unwrap_or("Unknown");
                println!(
                    "  [{:>2}] {} / {} - {}",
                    severity, name, risk.lifecycle_phase, risk.risk_statement
                );
            }
        }
    }
    Ok(())
}

fn cmd_export(
    store: &mut RecordStore,
    config: &AppConfig,
    output_dir: Option<PathBuf>,
    archive_name: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    if store.is_empty() {
        println!(
            "{}",
            "Warning: exporting an empty inventory (use --demo or --inventory)".yellow()
        );
    }

    store.recompute_all_tiers();

    let out_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.output_dir));
    let archive_name = archive_name.unwrap_or_else(|| config.archive_name.clone());
    let audit = GovernanceAuditLog::new(256);
    let actor = config.team_or_user.as_str();

    let mut run = ExportRun::new(&out_dir);
    let run_id = run.run_id();
    let span = mw_observability::run_span!(run_id);
    let _guard = span.enter();

    println!("{}", "Running export pipeline...".cyan());

    match run.export_artifacts(store) {
        Ok(artifacts) => {
            audit.log_run_event(
                AuditEventType::ArtifactsExported,
                actor,
                run_id,
                &format!("Exported {} audit artifacts", artifacts.paths().len()),
                AuditResult::Success,
            );
        }
        Err(e) => {
            audit.log_run_event(
                AuditEventType::ArtifactsExported,
                actor,
                run_id,
                "Artifact export failed",
                AuditResult::Failure(e.to_string()),
            );
            return Err(e).context("Artifact export failed");
        }
    }

    let builder = ManifestBuilder::new(actor, env!("CARGO_PKG_VERSION"));
    let manifest = match run.build_manifest(&builder) {
        Ok(manifest) => {
            audit.log_run_event(
                AuditEventType::ManifestBuilt,
                actor,
                run_id,
                &format!("Built manifest over {} artifacts", manifest.artifacts.len()),
                AuditResult::Success,
            );
            manifest.clone()
        }
        Err(e) => {
            audit.log_run_event(
                AuditEventType::ManifestBuilt,
                actor,
                run_id,
                "Manifest build failed",
                AuditResult::Failure(e.to_string()),
            );
            return Err(e).context("Manifest build failed");
        }
    };

    let archive_path = match run.package(&archive_name) {
        Ok(path) => {
            audit.log_run_event(
                AuditEventType::PackageCreated,
                actor,
                run_id,
                &format!("Packaged audit archive {}", path.display()),
                AuditResult::Success,
            );
            path.to_path_buf()
        }
        Err(e) => {
            audit.log_run_event(
                AuditEventType::PackageCreated,
                actor,
                run_id,
                "Packaging failed",
                AuditResult::Failure(e.to_string()),
            );
            return Err(e).context("Packaging failed");
        }
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&manifest)?);
        return Ok(());
    }

    println!();
    println!("{} {}", "Run:".bold(), run_id);
    println!("{}", "Artifact digests".bold());
    println!("────────────────");
    for artifact in &manifest.artifacts {
        println!("  {} {}", artifact.sha256.cyan(), artifact.name);
    }
    println!();
    println!(
        "{} {}",
        "Audit package ready:".green().bold(),
        archive_path.display()
    );
    Ok(())
}

fn cmd_config(config: &AppConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }
    println!("{}", "Current Configuration".bold());
    println!("─────────────────────");
    println!("  Team/User: {}", config.team_or_user);
    println!("  Output dir: {}", config.output_dir);
    println!("  Archive: {}", config.archive_name);
    println!("  Log level: {}", config.logging.level);
    Ok(())
}
