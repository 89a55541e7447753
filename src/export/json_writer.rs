//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::chatlog::ExportRow;
use crate::error::Result;

/// Writes rows to a JSON file as an array.
///
/// # Format
/// ```json
/// [
///   {"date": "02/15/2024", "time": "02:35 PM", "sender": "Alice", "message": "Hello"}
/// ]
/// ```
pub fn write_json(rows: &[ExportRow], output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(rows)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts rows to a pretty-printed JSON array.
pub fn to_json(rows: &[ExportRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
