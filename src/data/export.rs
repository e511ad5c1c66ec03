use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::FilteredView;
use crate::error::RenderError;

/// File name offered by the download action.
pub const EXPORT_FILENAME: &str = "filtered_penguins.csv";

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Write the header row and every row of `view`. Missing cells are empty.
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(view: &FilteredView, writer: W) -> csv::Result<usize> {
    let mut out = csv::Writer::from_writer(writer);
    let columns = view.column_names();
    out.write_record(columns)?;

    let mut written = 0;
    for p in view.rows() {
        out.write_record(columns.iter().map(|c| p.cell(c).unwrap_or_default()))?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// Write `view` to `path`. The file is closed whether or not writing succeeds.
pub fn export_to_path(view: &FilteredView, path: &Path) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let rows = write_csv(view, BufWriter::new(file))
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {rows} rows to {}", path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CsvExport – the download sink's artifact
// ---------------------------------------------------------------------------

/// Rendered CSV text of the current filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: &'static str,
    pub contents: String,
    pub rows: usize,
}

impl CsvExport {
    pub fn from_view(view: &FilteredView) -> Result<Self, RenderError> {
        let mut buf = Vec::new();
        let rows = write_csv(view, &mut buf).map_err(|e| RenderError::Export(e.to_string()))?;
        let contents = String::from_utf8(buf).map_err(|e| RenderError::Export(e.to_string()))?;
        Ok(CsvExport {
            filename: EXPORT_FILENAME,
            contents,
            rows,
        })
    }
}
