use clap::Parser;
use portal_catalog::app::commands;
use portal_catalog::config::cli::{Command, LogFormat};
use portal_catalog::core::query::CatalogQuery;
use portal_catalog::utils::error::{ErrorCategory, ErrorSeverity, PortalError};
use portal_catalog::utils::{logger, validation::Validate};
use portal_catalog::{CatalogClient, CatalogService, CliConfig};
use std::io::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Text => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::debug!("CLI arguments: {:?}", cli);

    if let Err(e) = run(&cli).await {
        report(&e);
        std::process::exit(exit_code(e.severity()));
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> portal_catalog::Result<()> {
    let config = cli.resolve()?;
    config.validate()?;
    tracing::debug!(
        "Using {} (timeout {:?})",
        config.base_url.as_deref().unwrap_or_default(),
        config.transport.timeout
    );

    let service = CatalogService::<CatalogClient>::from_config(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::List {
            search,
            member,
            page,
            json,
        } => {
            let query = CatalogQuery::new(search.clone(), member.clone());
            commands::list(&service, &query, *page, config.page_size, *json, &mut out).await?;
        }
        Command::Show { id, json } => {
            if !commands::show(&service, *id, *json, &mut out).await? {
                out.flush()?;
                std::process::exit(4);
            }
        }
        Command::Members => commands::members(&service, &mut out).await?,
        Command::Login => {
            tracing::info!("🔐 Logging in to {}", service.api().login_url());
            commands::login(&service, &mut out).await?;
        }
        Command::Probe => commands::probe(&service, &mut out).await?,
    }

    out.flush()?;
    Ok(())
}

fn report(e: &PortalError) {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    if e.category() == ErrorCategory::Auth || e.category() == ErrorCategory::CatalogFetch {
        if let Some(body) = e.body().filter(|b| !b.trim().is_empty()) {
            eprintln!("   Response: {}", body);
        }
    }
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
