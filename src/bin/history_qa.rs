//! history-qa — 校史问答命令行前端
//!
//! Usage:
//!   history-qa [--config <file.yaml>] [--knowledge <file.txt>]
//!
//! Reads questions from stdin, one per line. `:1`..`:4` submit a suggested question,
//! `:q` (or EOF) exits, Ctrl-C aborts the question in flight.

use anyhow::{bail, Context};
use history_qa::config::ClientConfig;
use history_qa::conversation::{ConversationController, Direction, SubmitOutcome};
use history_qa::knowledge::{KnowledgePreamble, QUICK_QUESTIONS};
use history_qa::AnswerClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

struct Args {
    config: Option<PathBuf>,
    knowledge: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> anyhow::Result<Args> {
    let mut parsed = Args {
        config: None,
        knowledge: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--knowledge" => {
                let path = iter.next().context("--knowledge requires a path")?;
                parsed.knowledge = Some(PathBuf::from(path));
            }
            "help" | "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

fn print_usage() {
    println!(
        r#"history-qa — 东北师范大学校史问答

USAGE:
    history-qa [--config <file.yaml>] [--knowledge <file.txt>]

COMMANDS (stdin):
    <question>      Ask a question
    :1 .. :4        Ask a suggested question
    :q              Quit

ENVIRONMENT:
    HISTORY_QA_API_KEY          Bearer credential (required)
    HISTORY_QA_ENDPOINT         Completion endpoint URL
    HISTORY_QA_MODEL            Model identifier
    HISTORY_QA_TIMEOUT_SECS     Per-question deadline
    RUST_LOG                    Log filter"#
    );
}

fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let base = match &args.config {
        Some(path) => ClientConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ClientConfig::default(),
    };
    let mut config = base.with_overrides(|key| std::env::var(key).ok());
    if let Some(path) = &args.knowledge {
        config.knowledge_file = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

/// `RUST_LOG` when set and valid, `warn` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn print_suggestions() {
    println!("常见问题：");
    for (i, q) in QUICK_QUESTIONS.iter().enumerate() {
        println!("  :{} {}", i + 1, q);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&argv)?;
    let config = load_config(&args)?;

    let preamble = match &config.knowledge_file {
        Some(path) => KnowledgePreamble::from_file(path)
            .with_context(|| format!("failed to load knowledge file {}", path.display()))?,
        None => KnowledgePreamble::default(),
    };
    let client = AnswerClient::new(config, preamble)?;
    let controller = ConversationController::new(Arc::new(client));

    print_suggestions();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0usize;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == ":q" {
            break;
        }

        if let Some(index) = line.strip_prefix(':') {
            let picked = index
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map(|i| controller.quick_question(i))
                .unwrap_or(false);
            if !picked {
                print_suggestions();
                continue;
            }
        } else {
            controller.set_input(line);
        }

        tokio::select! {
            outcome = controller.submit_pending() => {
                if outcome == SubmitOutcome::Rejected {
                    continue;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                controller.cancel_inflight();
            }
        }

        let exchanges = controller.exchanges();
        for record in exchanges.iter().skip(shown) {
            match record.direction {
                Direction::User => println!("> {}", record.text),
                Direction::System if record.is_error => println!("! {}", record.text),
                Direction::System => println!("{}", record.text),
            }
        }
        shown = exchanges.len();
    }

    Ok(())
}
