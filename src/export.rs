//! File writing utilities for achievement export.
//!
//! The JSON export is the download offered next to the search results: an
//! array of objects with the table's columns, timestamps cut to whole
//! seconds. CSV carries the same columns with a header row.

use crate::error::Result;
use crate::models::{Achievement, ExportFormat};
use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name used when exporting without an explicit target
pub const DEFAULT_EXPORT_STEM: &str = "achievements";

/// Header row for CSV exports, in column order
const CSV_HEADER: [&str; 6] = ["id", "employee", "department", "achievement", "point", "update_ts"];

/// Write achievements into `output_dir` as `achievements.<ext>`.
///
/// # Returns
///
/// Path of the created file
pub fn write_achievements_to_dir(
    achievements: &[Achievement],
    format: ExportFormat,
    output_dir: &Path,
) -> Result<PathBuf> {
    create_dir_all(output_dir)?;
    let file_path = output_dir.join(format!("{DEFAULT_EXPORT_STEM}.{}", format.extension()));
    write_achievements_to_file(achievements, format, &file_path)?;
    Ok(file_path)
}

/// Write achievements to a file in the specified format.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn write_achievements_to_file(achievements: &[Achievement], format: ExportFormat, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);
    match format {
        ExportFormat::Json => write_json(achievements, writer),
        ExportFormat::Csv => write_csv(achievements, writer),
    }
}

/// Write achievements as a pretty-printed JSON array.
pub fn write_json<W: Write>(achievements: &[Achievement], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, achievements)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write achievements as CSV with a header row.
pub fn write_csv<W: Write>(achievements: &[Achievement], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    writer.write_record(CSV_HEADER)?;

    for row in achievements {
        writer.write_record([
            row.id.to_string().as_str(),
            row.employee.as_str(),
            row.department.as_str(),
            row.achievement.as_str(),
            row.point.as_str(),
            row.update_ts_display().as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
