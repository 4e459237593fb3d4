//! Rede Recarga - rotating BI dashboard
//!
//! Main entry point for the terminal kiosk.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Local;
use recarga_app::utils::display::{render_report, HELP};
use recarga_app::utils::logging::init_tracing;
use recarga_app::{execute, AppContext, Command, Reply};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

const TICK: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so we can see .env loading
    init_tracing();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => warn!("Could not load .env file: {e}"),
    }

    let config = recarga_infra::config::load().context("failed to load configuration")?;
    let mut ctx = AppContext::new(config, today()).context("failed to initialize dashboard")?;
    info!("Rede Recarga dashboard starting...");

    println!("{HELP}");
    show(&mut ctx, Instant::now()).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(TICK);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                if ctx.rotation_due(now) {
                    show(&mut ctx, now).await;
                } else if let Some(status) = ctx.status_line(now) {
                    print!("\r{status}   ");
                    if let Err(e) = std::io::stdout().flush() {
                        debug!(error = %e, "failed to flush status line");
                    }
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("failed to read stdin")? else {
                    info!("stdin closed, rotating without operator input");
                    stdin_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                println!();
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match execute(&mut ctx, command, Instant::now(), today()).await {
                    Ok(Reply::Show(text)) => println!("{text}"),
                    Ok(Reply::Quit) => break,
                    Err(e) => {
                        error!(error = %e, "command failed");
                        println!("Erro: {e:#}");
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
        }
    }

    info!("Rede Recarga dashboard stopped");
    Ok(())
}

/// Render the current report; a failure is shown and retried while rotating.
async fn show(ctx: &mut AppContext, now: Instant) {
    let len = ctx.session().controller().catalog().len();
    match ctx.show_current(now).await {
        Ok(report) => println!("{}", render_report(report, len)),
        Err(e) => {
            println!("\nErro ao carregar relatório: {e}");
            if ctx.pending().is_some() {
                println!("Nova tentativa no próximo ciclo de rotação.");
            } else {
                println!("Rotação pausada. Use 'refresh' para tentar novamente.");
            }
        }
    }
}

fn today() -> chrono::NaiveDate {
    Local::now().date_naive()
}
