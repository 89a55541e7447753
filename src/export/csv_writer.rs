//! CSV output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::chatlog::ExportRow;
use crate::error::Result;

/// Byte order mark spreadsheet tools use to detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const HEADER: [&str; 4] = ["Date", "Time", "Sender", "Message"];

fn write_rows<W: Write>(rows: &[ExportRow], out: W) -> Result<W> {
    let mut writer = csv::WriterBuilder::new().delimiter(b',').from_writer(out);
    writer.write_record(HEADER)?;
    for row in rows {
        writer.write_record([&row.date, &row.time, &row.sender, &row.message])?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| crate::ChatdomError::Io(e.into_error()))
}

/// Writes rows to a CSV file.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `Date`, `Time`, `Sender`, `Message`
/// - Encoding: UTF-8 with a byte order mark
pub fn write_csv(rows: &[ExportRow], output_path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(output_path)?;
    file.write_all(UTF8_BOM)?;
    write_rows(rows, file)?;
    Ok(())
}

/// Converts rows to a CSV string, without the byte order mark.
pub fn to_csv(rows: &[ExportRow]) -> Result<String> {
    let bytes = write_rows(rows, Vec::new())?;
    Ok(String::from_utf8(bytes)?)
}
