//! PersonaQuery CLI: ask questions about a candidate's documents from the terminal

use clap::{Parser, Subcommand};
use personaquery_engine::{
    AskMode, Config, Conversation, HttpGateway, PromptOrigin, Resolution, SubmitOutcome,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "PERSONAQUERY_LOG";

/// Conversational client for the PersonaQuery answer service
#[derive(Parser)]
#[command(name = "personaquery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base address of the answer service (overrides config and PERSONAQUERY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file (default: <config dir>/personaquery/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Answering mode requested from the service (chat or interview)
    #[arg(long, global = true, value_parser = parse_mode)]
    mode: Option<AskMode>,

    /// Number of passages the service should retrieve
    #[arg(long, global = true)]
    top_k: Option<u32>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Ask a single question and print the answer
    Ask {
        /// The question (words are joined with spaces)
        #[arg(required = true)]
        question: Vec<String>,

        /// Output the assistant message as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the answer service is reachable
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn parse_mode(s: &str) -> Result<AskMode, String> {
    AskMode::parse(s).ok_or_else(|| format!("unknown mode {s:?} (expected chat or interview)"))
}

fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it only logs to a file
    let log_to_stderr = !matches!(cli.command, None | Some(Commands::Tui));
    if let Err(e) = init_logging(cli.log_file.as_deref(), log_to_stderr) {
        eprintln!("Error: cannot open log file: {e}");
        std::process::exit(1);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        None | Some(Commands::Tui) => match rt.block_on(personaquery_tui::run_tui(&config)) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        },
        Some(Commands::Ask { question, json }) => {
            rt.block_on(cmd_ask(&config, &question.join(" "), json))
        }
        Some(Commands::Health { json }) => rt.block_on(cmd_health(&config, json)),
        Some(Commands::Config { save }) => cmd_config(&config, cli.config.as_deref(), save),
    };

    std::process::exit(code);
}

fn init_logging(log_file: Option<&Path>, to_stderr: bool) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else if to_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, personaquery_engine::ConfigError> {
    let mut config = Config::resolve(cli.config.as_deref(), cli.api_url.as_deref())?;
    if let Some(mode) = cli.mode {
        config.mode = Some(mode);
    }
    if let Some(top_k) = cli.top_k {
        config.top_k = Some(top_k);
    }
    info!(api_url = %config.api_url, "Configuration resolved");
    Ok(config)
}

async fn cmd_ask(config: &Config, question: &str, json: bool) -> i32 {
    let mut conversation = Conversation::from_config(config);

    let resolution = match conversation
        .submit_question(question, PromptOrigin::Manual)
        .await
    {
        SubmitOutcome::Resolved(resolution) => resolution,
        SubmitOutcome::Ignored(reason) => {
            eprintln!("Error: nothing to ask ({reason:?})");
            return 1;
        }
    };

    if json {
        let Some(message) = conversation.messages().last() else {
            return 1;
        };
        match serde_json::to_string_pretty(message) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        }
    } else {
        let view = conversation.render_transcript();
        if let Some(answer) = view.bubbles().last() {
            println!("{}", answer.content);
            if let Some(sources) = &answer.sources {
                println!("\nSources:");
                for source in sources {
                    match &source.score {
                        Some(score) => println!("  - {}  {score}", source.label),
                        None => println!("  - {}", source.label),
                    }
                    if let Some(snippet) = &source.snippet {
                        println!("    {}", snippet.replace('\n', "\n    "));
                    }
                }
            }
        }
    }

    if let Some(error) = conversation.last_error() {
        eprintln!("{error}");
    }

    i32::from(resolution == Resolution::Failed)
}

async fn cmd_health(config: &Config, json: bool) -> i32 {
    let gateway = HttpGateway::new(config);
    let report = match gateway.health().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {} unreachable: {e}", config.health_url());
            return 1;
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error: {e}");
                return 1;
            }
        }
    } else {
        println!("Service: {}", config.api_url);
        println!("Status:  {}", report.status);
        if !report.author_links.is_empty() {
            println!("\nLinks:");
            for (name, url) in &report.author_links {
                println!("  {name}: {url}");
            }
        }
    }

    i32::from(!report.is_ok())
}

fn cmd_config(config: &Config, path: Option<&Path>, save: bool) -> i32 {
    match serde_json::to_string_pretty(config) {
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    }

    if save {
        let Some(path) = path.map(Path::to_path_buf).or_else(Config::default_path) else {
            eprintln!("Error: no config directory on this platform; pass --config");
            return 1;
        };
        if let Err(e) = config.save(&path) {
            eprintln!("Error: {e}");
            return 1;
        }
        eprintln!("Saved {}", path.display());
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["personaquery"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_joins_words_and_accepts_global_flags() {
        let cli = Cli::try_parse_from([
            "personaquery",
            "ask",
            "Best-fit",
            "roles",
            "--api-url",
            "http://localhost:9000",
            "--mode",
            "interview",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cli.mode, Some(AskMode::Interview));
        match cli.command {
            Some(Commands::Ask { question, json }) => {
                assert_eq!(question.join(" "), "Best-fit roles");
                assert!(!json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["personaquery", "ask"]).is_err());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["personaquery", "--mode", "shout", "health"]).is_err());
    }
}
