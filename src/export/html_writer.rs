//! HTML table writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::chatlog::ExportRow;
use crate::error::Result;

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders rows as a `<table>` with `Date`, `Time`, `Sender` and `Message`
/// columns.
pub fn to_html(rows: &[ExportRow]) -> String {
    let mut html = String::from("<table>\n  <thead>\n    <tr>\n");
    for column in ["Date", "Time", "Sender", "Message"] {
        html.push_str(&format!("      <th>{column}</th>\n"));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in rows {
        html.push_str("    <tr>\n");
        for cell in [&row.date, &row.time, &row.sender, &row.message] {
            html.push_str(&format!("      <td>{}</td>\n", escape_html(cell)));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>\n");
    html
}

/// Writes rows to an HTML file.
pub fn write_html(rows: &[ExportRow], output_path: impl AsRef<Path>) -> Result<()> {
    let mut file = File::create(output_path)?;
    file.write_all(to_html(rows).as_bytes())?;
    Ok(())
}
