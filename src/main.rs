//! Sheetcalc - A terminal spreadsheet with snapshot undo/redo

mod config;
#[cfg(feature = "tui")]
mod tui;

use anyhow::{Context, Result, bail};
use sheetcalc_core::{Document, LoadOutcome};
use sheetcalc_engine::engine::{create_grid, evaluate_formula};
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: sheetcalc [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --rows <N>                Rows for a new grid (default: 10)");
    eprintln!("  --cols <N>                Columns for a new grid (default: 10)");
    eprintln!("  --config <FILE>           Read settings from this config.toml");
    eprintln!("  --session <FILE>          Session file to restore and auto-save");
    eprintln!("  --no-session              Do not restore or save a session");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula against an empty grid and exit");
    eprintln!("  -h, --help                Print help");
}

struct Args {
    rows: Option<usize>,
    cols: Option<usize>,
    config_file: Option<PathBuf>,
    session_file: Option<PathBuf>,
    no_session: bool,
    command: Option<String>,
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str, what: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} requires {}", flag, what),
    }
}

fn parse_count(value: &str, flag: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("{} expects a positive integer, got '{}'", flag, value),
    }
}

/// Parse the command line. `Ok(None)` means help was printed.
fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut parsed = Args {
        rows: None,
        cols: None,
        config_file: None,
        session_file: None,
        no_session: false,
        command: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "--rows" => {
                let value = next_value(args, &mut i, "--rows", "a number")?;
                parsed.rows = Some(parse_count(value, "--rows")?);
            }
            "--cols" => {
                let value = next_value(args, &mut i, "--cols", "a number")?;
                parsed.cols = Some(parse_count(value, "--cols")?);
            }
            "--config" => {
                let value = next_value(args, &mut i, "--config", "a file path")?;
                parsed.config_file = Some(PathBuf::from(value));
            }
            "--session" => {
                let value = next_value(args, &mut i, "--session", "a file path")?;
                parsed.session_file = Some(PathBuf::from(value));
            }
            "--no-session" => parsed.no_session = true,
            "-c" | "--command" => {
                let value = next_value(args, &mut i, "--command", "a formula")?;
                parsed.command = Some(value.to_string());
            }
            arg if arg.starts_with('-') => {
                print_usage();
                bail!("Unknown option: {}", arg);
            }
            arg => {
                print_usage();
                bail!("Unexpected argument: {}", arg);
            }
        }
        i += 1;
    }
    Ok(Some(parsed))
}

/// Evaluate one formula against an empty default grid.
/// Returns the display text and whether evaluation failed.
fn evaluate_command(text: &str) -> (String, bool) {
    let formula = if text.starts_with('=') {
        text.to_string()
    } else {
        format!("={}", text)
    };
    let grid = create_grid(sheetcalc_core::DEFAULT_ROWS, sheetcalc_core::DEFAULT_COLS);
    let value = evaluate_formula(&formula, &grid);
    (value.display(), value.is_error())
}

/// Build the store from config and flags, restoring the session if any.
fn open_document(args: &Args, config: &config::Config) -> Result<Document> {
    let rows = args.rows.unwrap_or(config.rows);
    let cols = args.cols.unwrap_or(config.cols);

    let session = if args.no_session {
        None
    } else {
        args.session_file.clone().or_else(|| config.session_file.clone())
    };

    let doc = match session {
        Some(path) => {
            let (doc, outcome) = Document::open_session(&path, rows, cols)
                .with_context(|| format!("Cannot create a {} x {} grid", rows, cols))?;
            if let LoadOutcome::Reset { reason } = outcome {
                eprintln!(
                    "Warning: discarded session {} ({}); starting with an empty grid",
                    path.display(),
                    reason
                );
            }
            doc
        }
        None => Document::with_dimensions(rows, cols)
            .with_context(|| format!("Cannot create a {} x {} grid", rows, cols))?,
    };
    Ok(doc.with_history_limit(config.history_limit))
}

#[cfg(feature = "tui")]
fn run_interactive(doc: Document, config: &config::Config) -> Result<()> {
    let mut app = tui::App::new(doc, config.column_width, config.autosave);
    tui::run(&mut app).context("Terminal UI failed")
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_doc: Document, _config: &config::Config) -> Result<()> {
    bail!("sheetcalc was built without the `tui` feature; use -c to evaluate a formula")
}

fn run() -> Result<i32> {
    let argv: Vec<String> = env::args().collect();
    let Some(args) = parse_args(&argv)? else {
        return Ok(0);
    };

    if let Some(text) = args.command.as_deref() {
        let (display, failed) = evaluate_command(text);
        println!("{}", display);
        return Ok(if failed { 1 } else { 0 });
    }

    let (config, warnings) = config::load_config(args.config_file.as_ref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    let doc = open_document(&args, &config)?;
    run_interactive(doc, &config)?;
    Ok(0)
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("sheetcalc")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parse_all_flags() {
        let args = parse_args(&argv(&[
            "--rows", "5", "--cols", "7", "--config", "c.toml", "--session", "s.json",
            "--no-session", "-c", "1+1",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(args.rows, Some(5));
        assert_eq!(args.cols, Some(7));
        assert_eq!(args.config_file, Some(PathBuf::from("c.toml")));
        assert_eq!(args.session_file, Some(PathBuf::from("s.json")));
        assert!(args.no_session);
        assert_eq!(args.command.as_deref(), Some("1+1"));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(parse_args(&argv(&["--rows"])).is_err());
        assert!(parse_args(&argv(&["--rows", "0"])).is_err());
        assert!(parse_args(&argv(&["--cols", "x"])).is_err());
        assert!(parse_args(&argv(&["--bogus"])).is_err());
        assert!(parse_args(&argv(&["file.json"])).is_err());
    }

    #[test]
    fn evaluate_command_prefixes_equals() {
        assert_eq!(evaluate_command("1+2"), ("3".to_string(), false));
        assert_eq!(evaluate_command("=10/4"), ("2.5".to_string(), false));
        assert_eq!(evaluate_command("SUM(A1:B2)"), ("0".to_string(), false));
        assert_eq!(evaluate_command("1+"), ("#ERR".to_string(), true));
    }

    #[test]
    fn open_document_without_session() {
        let args = Args {
            rows: Some(3),
            cols: None,
            config_file: None,
            session_file: None,
            no_session: true,
            command: None,
        };
        let config = config::Config {
            cols: 4,
            history_limit: Some(2),
            ..config::Config::default()
        };
        let doc = open_document(&args, &config).unwrap();
        assert_eq!((doc.rows(), doc.cols()), (3, 4));
        assert_eq!(doc.history_limit(), Some(2));
        assert!(doc.session_path().is_none());
    }

    #[test]
    fn open_document_restores_session_flag_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let mut saved = Document::with_dimensions(2, 2).unwrap();
        saved.update_cell(1, 1, "hi").unwrap();
        saved.save_session_to(&path).unwrap();

        let args = Args {
            rows: None,
            cols: None,
            config_file: None,
            session_file: Some(path.clone()),
            no_session: false,
            command: None,
        };
        let doc = open_document(&args, &config::Config::default()).unwrap();
        assert_eq!(doc.cell(1, 1).unwrap().formula, "hi");
        assert_eq!(doc.session_path(), Some(&path));
    }

    #[test]
    fn open_document_rejects_oversized_grid() {
        let args = Args {
            rows: Some(5_000),
            cols: Some(5_000),
            config_file: None,
            session_file: None,
            no_session: true,
            command: None,
        };
        assert!(open_document(&args, &config::Config::default()).is_err());
    }
}
