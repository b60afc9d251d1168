//! Chatforge CLI and REST API entry point.
//!
//! Binary name: `chatforge`
//!
//! Parses CLI arguments, sets up tracing, loads the global config and the
//! completion provider, then dispatches to the matching command handler or
//! starts the REST API server.

mod catalog;
mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG wins when set.
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,chatforge=debug,chatforge_core=debug,chatforge_infra=debug",
        _ => "trace",
    };
    chatforge_observe::init_tracing(filter, cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatforge", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let result = run(cli, state).await;

    chatforge_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { output, force } => {
            cli::config::init_config(&state, &output, force, cli.json).await?;
        }

        Commands::Wizard { output } => {
            cli::wizard::run_wizard(&state, &output).await?;
        }

        Commands::Set {
            field,
            value,
            config,
        } => {
            cli::config::set_field(&config, &field, &value, cli.json).await?;
        }

        Commands::ToggleFeature { feature, config } => {
            cli::config::toggle_feature(&config, &feature, cli.json).await?;
        }

        Commands::Show { config } => {
            cli::config::show_config(&config, cli.json).await?;
        }

        Commands::Catalog => {
            cli::config::print_catalog(cli.json)?;
        }

        Commands::Chat { config } => {
            cli::chat::run_chat_loop(&state, &config).await?;
        }

        Commands::Embed {
            config,
            html,
            output,
        } => {
            cli::embed::embed(&state, &config, html, output, cli.json).await?;
        }

        Commands::Export {
            format,
            config,
            output,
        } => {
            cli::embed::export(&state, format, &config, output, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Chatforge API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!(
                "  {} via {}",
                console::style(&state.global_config.completion.settings.model).dim(),
                console::style(state.engine.provider_name()).dim()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let sweep_shutdown = tokio_util::sync::CancellationToken::new();
            let sweeper = state.spawn_session_sweeper(sweep_shutdown.clone());
            let router = http::router::build_router(state);

            let served = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await;
            sweep_shutdown.cancel();
            if let Some(sweeper) = sweeper {
                let _ = sweeper.await;
            }
            served?;

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
