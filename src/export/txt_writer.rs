//! Plain text writer, one line per message.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::chatlog::ExportRow;
use crate::error::Result;

fn line(row: &ExportRow) -> String {
    format!("{}, {} - {}: {}\n", row.date, row.time, row.sender, row.message)
}

/// Writes rows as `"{date}, {time} - {sender}: {message}"` lines.
pub fn write_txt(rows: &[ExportRow], output_path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    for row in rows {
        writer.write_all(line(row).as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Same as [`write_txt`], returned as a string.
pub fn to_txt(rows: &[ExportRow]) -> String {
    rows.iter().map(line).collect()
}
