//! spdiff - interactive stored-procedure comparison shell
//!
//! One user action is one sequential chain: resolve connections, fetch
//! metadata and bodies, render the diff. Two independent handles are opened
//! per comparison and dropped afterwards; nothing is pooled across actions.

mod cache;
mod cli;
mod output;

use anyhow::Result;
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};
use tracing_subscriber::EnvFilter;

use cache::{key_for, ProcedureCache, PROCEDURE_CACHE_TTL};
use cli::{parse_proc_spec, Cli};
use spdiff_core::ConnectionTarget;
use spdiff_diff::{html, render, ContextMode, DiffOptions};
use spdiff_mssql::{resolve, MssqlConnection};

fn init_logging() {
    // RUST_LOG takes precedence; default keeps connection diagnostics in the
    // log without leaking them into the prompts.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,spdiff_cli=info,spdiff_mssql=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut cache = ProcedureCache::new(PROCEDURE_CACHE_TTL);
    let interactive = cli.source_proc.is_none() && cli.target_proc.is_none();

    loop {
        compare_once(&cli, &mut cache).await?;

        if !interactive {
            break;
        }
        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Compare another pair?")
            .default(false)
            .interact()?;
        if !again {
            break;
        }
    }

    Ok(())
}

async fn compare_once(cli: &Cli, cache: &mut ProcedureCache) -> Result<()> {
    let source_base = cli.source_target();
    let target_base = cli.target_target();

    let Some(source_db) =
        pick_database("source", &source_base, cli.source_database.as_deref()).await?
    else {
        return Ok(());
    };
    let Some(target_db) =
        pick_database("target", &target_base, cli.target_database.as_deref()).await?
    else {
        return Ok(());
    };

    let source_scoped = source_base.with_database(source_db);
    let target_scoped = target_base.with_database(target_db);

    let Some(source) = connect("source", &source_scoped).await else {
        return Ok(());
    };
    let Some(target) = connect("target", &target_scoped).await else {
        source.close();
        return Ok(());
    };

    let source_pick = pick_procedure(
        "source",
        &source,
        &source_scoped,
        cache,
        cli.source_proc.as_deref(),
    )
    .await?;
    let Some((source_schema, source_name)) = source_pick else {
        source.close();
        target.close();
        return Ok(());
    };
    let target_pick = pick_procedure(
        "target",
        &target,
        &target_scoped,
        cache,
        cli.target_proc.as_deref(),
    )
    .await?;
    let Some((target_schema, target_name)) = target_pick else {
        source.close();
        target.close();
        return Ok(());
    };

    // Bodies are always re-fetched so the diff reflects current state.
    let source_code = source.fetch_procedure_body(&source_schema, &source_name).await;
    let target_code = target.fetch_procedure_body(&target_schema, &target_name).await;
    source.close();
    target.close();

    if source_code.is_empty() && target_code.is_empty() {
        println!("No code could be fetched from either side. Check permissions.");
        return Ok(());
    }

    let options = DiffOptions {
        wrap_width: cli.wrap_width.max(1),
        context: match cli.context {
            Some(lines) => ContextMode::Collapsed(lines),
            None => ContextMode::Full,
        },
    };
    let report = render(&source_code, &target_code, &options);
    tracing::debug!(rows = report.rows.len(), "report rendered");

    let title = format!(
        "{}.{} vs {}.{}",
        source_schema, source_name, target_schema, target_name
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report, &title, options.wrap_width);
    }

    if let Some(path) = &cli.html {
        std::fs::write(path, html::render_page(&report, &title, options.wrap_width))?;
        println!("HTML report written to {}", path.display());
    }

    Ok(())
}

/// Resolve a database-scoped handle, reporting failure uniformly.
async fn connect(label: &str, target: &ConnectionTarget) -> Option<MssqlConnection> {
    match resolve(target).await.into_handle() {
        Some(handle) => Some(handle),
        None => {
            // Detail stays in the diagnostic log; the operator gets one
            // non-alarming line.
            println!("Could not connect to {} ({label}).", target.host);
            None
        }
    }
}

async fn pick_database(
    label: &str,
    target: &ConnectionTarget,
    preselected: Option<&str>,
) -> Result<Option<String>> {
    if let Some(database) = preselected {
        return Ok(Some(database.to_string()));
    }

    // Enumeration always runs against master; the selected database gets its
    // own handle afterwards.
    let Some(handle) = connect(label, &target.master_scoped()).await else {
        return Ok(None);
    };
    let databases = handle.list_databases().await;
    handle.close();

    if databases.is_empty() {
        println!("No databases to show on {} ({label}).", target.host);
        return Ok(None);
    }

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Select the {label} database"))
        .items(&databases)
        .default(0)
        .interact()?;
    Ok(Some(databases[index].clone()))
}

async fn pick_procedure(
    label: &str,
    handle: &MssqlConnection,
    target: &ConnectionTarget,
    cache: &mut ProcedureCache,
    preselected: Option<&str>,
) -> Result<Option<(String, String)>> {
    if let Some(spec) = preselected {
        match parse_proc_spec(spec) {
            Some(parsed) => return Ok(Some(parsed)),
            None => {
                println!("Invalid procedure spec '{spec}', expected schema.name.");
                return Ok(None);
            }
        }
    }

    let key = key_for(target);
    let refs = match cache.get(&key) {
        Some(refs) => refs,
        None => {
            let refs = handle.list_procedures().await;
            cache.insert(key, refs.clone());
            refs
        }
    };

    if refs.is_empty() {
        println!("No stored procedures to show on {} ({label}).", target.host);
        return Ok(None);
    }

    let labels: Vec<&str> = refs.iter().map(|r| r.label.as_str()).collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Select the {label} procedure"))
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(Some((refs[index].schema.clone(), refs[index].name.clone())))
}
