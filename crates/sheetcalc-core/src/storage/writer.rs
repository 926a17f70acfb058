//! Writer for JSON session files

use super::Session;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Write a session to a file, creating parent directories as needed.
pub fn write_session(path: &Path, session: &Session) -> Result<()> {
    let content = write_session_content(session)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Serialize a session to pretty-printed JSON
pub fn write_session_content(session: &Session) -> Result<String> {
    Ok(serde_json::to_string_pretty(session)?)
}
