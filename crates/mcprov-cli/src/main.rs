//! mcprov - Game server provisioner
//!
//! Usage:
//!   mcprov provision              # Provision every configured server
//!   mcprov provision --only lobby # Provision selected servers
//!   mcprov validate               # Check configuration without network access

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcprov_core::config::parser::to_toml;
use mcprov_core::prelude::*;

#[derive(Parser)]
#[command(name = "mcprov")]
#[command(about = "Provision game servers from a declarative config", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to mcprov.toml or mcprov.json (auto-discovered if omitted)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision configured servers
    Provision {
        /// Only provision servers with these names
        #[arg(long = "only", value_name = "NAME")]
        only: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate the configuration and show the planned servers
    Validate {
        /// Print the fully resolved configuration as TOML
        #[arg(long)]
        show_config: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "mcprov=debug,mcprov_core=debug,info"
    } else {
        "mcprov=info,mcprov_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = match &cli.config {
        Some(path) => ConfigStore::from_path(path.clone()),
        None => ConfigStore::discover()?,
    };
    tracing::debug!(config = %store.config_path().display(), "Using configuration");
    let config = store.load()?;

    match cli.command {
        Commands::Provision { only, format } => run_provision(config, &only, format),
        Commands::Validate { show_config } => run_validate(&config, show_config),
    }
}

fn run_provision(mut config: ProvisionConfig, only: &[String], format: OutputFormat) -> Result<()> {
    config.retain_servers(only);
    if config.servers.is_empty() {
        anyhow::bail!("No servers selected");
    }

    let http = ReqwestClient::new(
        &config.http.user_agent,
        Duration::from_secs(config.http.timeout_secs),
    )?;
    let provisioner = Provisioner::new(http, ProvisionSettings::from(&config));

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let report = runtime.block_on(provisioner.provision_all(&config.servers));

    match format {
        OutputFormat::Table => print_table(&report),
        OutputFormat::Json => print_json(&report)?,
    }

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_validate(config: &ProvisionConfig, show_config: bool) -> Result<()> {
    println!("Configuration OK: {} server(s)", config.servers.len());
    println!("Templates: {}", config.template_dir.display());
    for server in &config.servers {
        let version = server.mc_version.as_deref().unwrap_or("latest");
        println!(
            "  {} ({} {}) -> {}",
            server.label(),
            server.engine,
            version,
            server.server_dir.display()
        );
        for template in &server.templates {
            println!("    template {template}");
        }
        for source in server.plugins.items() {
            println!("    plugin   {}", source.label());
        }
    }
    if show_config {
        println!();
        print!("{}", to_toml(config)?);
    }
    Ok(())
}

fn print_table(report: &RunReport) {
    for server in &report.servers {
        let status = if server.is_done() { "ok" } else { "FAILED" };
        println!("{:<24} {}", server.server, status);

        if let Some(engine) = &server.engine {
            let action = match engine.action {
                EngineAction::Downloaded => "downloaded",
                EngineAction::UpToDate => "up to date",
            };
            println!(
                "  engine   {} {} build {} ({})",
                engine.project, engine.version, engine.build, action
            );
        }
        if server.templates_copied > 0 {
            println!("  templates {} file(s) copied", server.templates_copied);
        }
        for plugin in &server.plugins {
            match &plugin.result {
                Ok(path) => println!("  plugin   {} -> {}", plugin.source, path.display()),
                Err(err) => println!("  plugin   {} skipped: {}", plugin.source, err),
            }
        }
        if let Some(err) = &server.error {
            println!("  error    after {}: {}", server.reached, err);
        }
    }

    let failed = report.failed_servers().count();
    println!();
    println!(
        "{} server(s) provisioned, {} failed",
        report.servers.len() - failed,
        failed
    );
}

fn print_json(report: &RunReport) -> Result<()> {
    let servers: Vec<_> = report
        .servers
        .iter()
        .map(|server| {
            let plugins: Vec<_> = server
                .plugins
                .iter()
                .map(|p| match &p.result {
                    Ok(path) => serde_json::json!({
                        "source": p.source,
                        "file": path,
                    }),
                    Err(err) => serde_json::json!({
                        "source": p.source,
                        "error": err.to_string(),
                        "status": err.status(),
                        "remote": err.is_remote_side(),
                    }),
                })
                .collect();
            serde_json::json!({
                "server": server.server,
                "stage": server.stage,
                "reached": server.reached,
                "error": server.error.as_ref().map(|e| e.to_string()),
                "engine": server.engine,
                "templates_copied": server.templates_copied,
                "plugins": plugins,
            })
        })
        .collect();

    let output = serde_json::json!({
        "success": report.is_success(),
        "servers": servers,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
