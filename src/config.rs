//! User configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use sheetcalc_core::{DEFAULT_COLS, DEFAULT_ROWS};
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const DEFAULT_COLUMN_WIDTH: usize = 10;
const MIN_COLUMN_WIDTH: usize = 4;
const MAX_COLUMN_WIDTH: usize = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    rows: Option<usize>,
    cols: Option<usize>,
    column_width: Option<usize>,
    history_limit: Option<usize>,
    session_file: Option<PathBuf>,
    autosave: Option<bool>,
}

/// Resolved settings, after defaults have been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub column_width: usize,
    pub history_limit: Option<usize>,
    /// `None` when no data directory could be determined.
    pub session_file: Option<PathBuf>,
    pub autosave: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            column_width: DEFAULT_COLUMN_WIDTH,
            history_limit: None,
            session_file: default_session_path(),
            autosave: true,
        }
    }
}

/// Load `config.toml` from `config_file`, or from the platform config dir.
///
/// Never fails: problems are returned as warnings and the affected settings
/// keep their defaults. A missing default config file is not a warning.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let path = config_file.cloned().or_else(user_config_path);

    let file = match path.as_ref() {
        Some(path) if path.exists() => read_config_file(path, &mut warnings),
        Some(path) if config_file.is_some() => {
            warnings.push(format!("Config file not found: {}", path.display()));
            None
        }
        _ => None,
    };

    let config = apply(file.unwrap_or_default(), &mut warnings);
    (config, warnings)
}

fn read_config_file(path: &Path, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match parse_config(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

fn apply(file: ConfigFile, warnings: &mut Vec<String>) -> Config {
    let defaults = Config::default();

    let rows = positive_or_default("rows", file.rows, defaults.rows, warnings);
    let cols = positive_or_default("cols", file.cols, defaults.cols, warnings);

    let column_width = match file.column_width {
        Some(w) if !(MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&w) => {
            let clamped = w.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
            warnings.push(format!(
                "column_width {} out of range ({}-{}); using {}",
                w, MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH, clamped
            ));
            clamped
        }
        Some(w) => w,
        None => defaults.column_width,
    };

    Config {
        rows,
        cols,
        column_width,
        history_limit: file.history_limit,
        session_file: file.session_file.or(defaults.session_file),
        autosave: file.autosave.unwrap_or(defaults.autosave),
    }
}

fn positive_or_default(
    name: &str,
    value: Option<usize>,
    default: usize,
    warnings: &mut Vec<String>,
) -> usize {
    match value {
        Some(0) => {
            warnings.push(format!("{} must be at least 1; using {}", name, default));
            default
        }
        Some(n) => n,
        None => default,
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn default_session_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetcalc")?;
    let mut path = proj.data_dir().to_path_buf();
    path.push("session.json");
    Some(path)
}
