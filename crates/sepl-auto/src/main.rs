mod render;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use sepl_core::recording::RecordingDriver;
use sepl_core::{CompiledScript, ExecuteOptions, SeplConfig, SeplError, StatementExecutor};

#[derive(Parser)]
#[command(name = "sepl-auto", version, about = "Compile and trace SEPL browser automation scripts")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, env = "SEPL_LOG_FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a script and print its variables and statements
    Check {
        /// Path to the script file (reads stdin if omitted)
        script: Option<PathBuf>,
    },
    /// Execute a script against an in-memory recording browser
    Trace {
        /// Path to the script file (reads stdin if omitted)
        script: Option<PathBuf>,
        /// Text served by elements matching SELECTOR
        #[arg(short, long = "element", value_name = "SELECTOR=TEXT", value_parser = parse_pair)]
        elements: Vec<(String, String)>,
        /// HTML served by elements matching SELECTOR
        #[arg(long = "html", value_name = "SELECTOR=HTML", value_parser = parse_pair)]
        html: Vec<(String, String)>,
        /// Selectors that match no element
        #[arg(long = "missing", value_name = "SELECTOR")]
        missing: Vec<String>,
        /// Leave the browser session open after the run
        #[arg(long)]
        keep_open: bool,
    },
}

/// Splits on the last `=`, since selectors often contain one.
fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.rsplit_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected SELECTOR=VALUE, got '{}'", raw))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = SeplConfig::load();

    let _guard = match init_tracing(cli.log_file.as_deref(), &config) {
        Ok(guard) => guard,
        Err(e) => return fail(&e),
    };

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

fn fail(e: &SeplError) -> ExitCode {
    eprintln!("Error: {}", e);
    ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
}

/// `RUST_LOG`, else the configured filter, else `warn`.
fn init_tracing(log_file: Option<&Path>, config: &SeplConfig) -> Result<Option<WorkerGuard>, SeplError> {
    let filter = EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| config.log_filter.as_deref().and_then(|f| EnvFilter::try_new(f).ok()))
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| SeplError::Config(format!("invalid log file path: {}", path.display())))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(Some(guard))
}

fn read_source(path: Option<&Path>) -> Result<String, SeplError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), SeplError> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{}", text);
    Ok(())
}

async fn run(cli: Cli, config: &SeplConfig) -> Result<(), SeplError> {
    match cli.command {
        Command::Check { script } => {
            let source = read_source(script.as_deref())?;
            let compiled = CompiledScript::compile(&source)?;
            info!(statements = compiled.statements().len(), "script compiled");
            match cli.format {
                OutputFormat::Text => print!("{}", render::check_text(&compiled)),
                OutputFormat::Json => print_json(&render::check_json(&compiled))?,
            }
            Ok(())
        }
        Command::Trace { script, elements, html, missing, keep_open } => {
            let source = read_source(script.as_deref())?;
            let mut compiled = CompiledScript::compile(&source)?;

            let mut driver = RecordingDriver::new();
            for (selector, text) in elements {
                driver = driver.with_text(selector, text);
            }
            for (selector, markup) in html {
                driver = driver.with_html(selector, markup);
            }
            for selector in missing {
                driver = driver.missing(selector);
            }
            let driver = Arc::new(driver);

            let mut options = ExecuteOptions::from(config);
            if keep_open {
                options.close_on_exit = false;
            }
            let result = StatementExecutor::new(driver.clone(), options)
                .execute(&mut compiled)
                .await;

            let calls = driver.calls();
            let report = result.as_ref().ok();
            match cli.format {
                OutputFormat::Text => print!("{}", render::trace_text(&calls, compiled.variables(), report)),
                OutputFormat::Json => print_json(&render::trace_json(&calls, compiled.variables(), report))?,
            }
            result.map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_keeps_equals_in_selector() {
        assert_eq!(
            parse_pair("input[name=q]=hello"),
            Ok(("input[name=q]".to_string(), "hello".to_string()))
        );
        assert_eq!(
            parse_pair("//button[@type='submit']=Send"),
            Ok(("//button[@type='submit']".to_string(), "Send".to_string()))
        );
        assert_eq!(parse_pair("#posts="), Ok(("#posts".to_string(), String::new())));
        assert!(parse_pair("#posts").is_err());
    }
}
