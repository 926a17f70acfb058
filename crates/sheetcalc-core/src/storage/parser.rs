//! Reader for JSON session files

use super::Session;
use crate::error::{Result, SheetError};
use std::fs;
use std::path::Path;

/// Refuse to read session files larger than this.
const MAX_SESSION_FILE_BYTES: u64 = 256 * 1_048_576; // 256 MiB

/// Read and parse a session file. Shape is not validated here.
pub fn parse_session(path: &Path) -> Result<Session> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_SESSION_FILE_BYTES {
        return Err(SheetError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: session file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_SESSION_FILE_BYTES
            ),
        )));
    }
    let content = fs::read_to_string(path)?;
    parse_session_content(&content)
}

/// Parse session JSON from a string
pub fn parse_session_content(content: &str) -> Result<Session> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetcalc_engine::engine::CellValue;

    #[test]
    fn test_parse_minimal_session() {
        let json = r#"{
            "rows": 1,
            "cols": 2,
            "grid": [[
                {"id": "A1", "value": {"Text": "5"}, "formula": "5"},
                {"id": "B1", "value": {"Number": 10.0}, "formula": "=A1*2"}
            ]]
        }"#;
        let session = parse_session_content(json).unwrap();
        assert_eq!((session.rows, session.cols), (1, 2));
        assert_eq!(session.grid[0][1].value, CellValue::Number(10.0));
        assert!(session.past.is_empty());
        assert!(session.future.is_empty());
        assert!(session.selection.is_none());
    }

    #[test]
    fn test_parse_non_finite_number() {
        let json = r#"{"rows":1,"cols":1,"grid":[[
            {"id":"A1","value":{"Number":"-Infinity"},"formula":"=-1/0"}
        ]]}"#;
        let session = parse_session_content(json).unwrap();
        assert_eq!(session.grid[0][0].value, CellValue::Number(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_session_content("{\"rows\": 1,"),
            Err(SheetError::Json(_))
        ));
        assert!(matches!(
            parse_session_content("{\"rows\": 1, \"cols\": 1}"),
            Err(SheetError::Json(_))
        ));
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_session(Path::new("/nonexistent/sheetcalc/session.json")).unwrap_err();
        assert!(matches!(err, SheetError::Io(_)));
    }
}
