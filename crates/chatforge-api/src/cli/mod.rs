//! CLI command definitions and dispatch for the `chatforge` binary.
//!
//! Uses clap derive macros for argument parsing. Chatbot configurations are
//! plain JSON files selected with `-c` (default `chatbot-config.json`).

pub mod chat;
pub mod config;
pub mod embed;
pub mod wizard;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Build, preview and export website chatbots.
#[derive(Parser)]
#[command(name = "chatforge", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default chatbot configuration.
    Init {
        /// Where to write the configuration.
        #[arg(short, long, default_value = "chatbot-config.json")]
        output: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Configure a chatbot step by step.
    Wizard {
        /// Where to write the configuration.
        #[arg(short, long, default_value = "chatbot-config.json")]
        output: PathBuf,
    },

    /// Set one configuration field (e.g. `companyName Acme`).
    Set {
        /// Field name (camelCase or snake_case).
        field: String,

        /// New value.
        value: String,

        #[arg(short, long, default_value = "chatbot-config.json")]
        config: PathBuf,
    },

    /// Turn a feature on or off.
    ToggleFeature {
        /// Feature id (appointment, faq, leadCapture, productInfo, liveChat).
        feature: String,

        #[arg(short, long, default_value = "chatbot-config.json")]
        config: PathBuf,
    },

    /// Show a configuration summary, personality and welcome message.
    Show {
        #[arg(short, long, default_value = "chatbot-config.json")]
        config: PathBuf,
    },

    /// List the available website types, purposes, tones, features and industries.
    Catalog,

    /// Chat with the configured bot in the terminal.
    Chat {
        #[arg(short, long, default_value = "chatbot-config.json")]
        config: PathBuf,
    },

    /// Generate the embeddable widget snippet.
    Embed {
        #[arg(short, long, default_value = "chatbot-config.json")]
        config: PathBuf,

        /// Wrap the snippet in a standalone HTML page.
        #[arg(long)]
        html: bool,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the configuration or the standalone page as a file.
    Export {
        /// What to export.
        #[arg(value_enum)]
        format: ExportFormat,

        #[arg(short, long, default_value = "chatbot-config.json")]
        config: PathBuf,

        /// Output file (defaults to chatbot-config.json / chatbot.html).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// chatbot-config.json
    Config,
    /// chatbot.html
    Html,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_set_with_defaults() {
        let cli = Cli::try_parse_from(["chatforge", "set", "companyName", "Acme"]).unwrap();
        match cli.command {
            Commands::Set {
                field,
                value,
                config,
            } => {
                assert_eq!(field, "companyName");
                assert_eq!(value, "Acme");
                assert_eq!(config, PathBuf::from("chatbot-config.json"));
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn test_parse_export_html() {
        let cli = Cli::try_parse_from([
            "chatforge", "export", "html", "-c", "acme.json", "-o", "site/chatbot.html",
        ])
        .unwrap();
        match cli.command {
            Commands::Export {
                format,
                config,
                output,
            } => {
                assert_eq!(format, ExportFormat::Html);
                assert_eq!(config, PathBuf::from("acme.json"));
                assert_eq!(output, Some(PathBuf::from("site/chatbot.html")));
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["chatforge", "catalog", "--json", "-vv", "--otel"]).unwrap();
        assert!(cli.json);
        assert!(cli.otel);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Catalog));
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["chatforge", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, 3000);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_unknown_export_format_rejected() {
        assert!(Cli::try_parse_from(["chatforge", "export", "pdf"]).is_err());
    }
}
