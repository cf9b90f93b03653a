//! CSV load and save boundary.

use crate::error::{Result, ResultExt, ScrubError};
use crate::table::Table;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows sampled when inferring column dtypes.
const INFER_SCHEMA_ROWS: usize = 100;

/// Load a delimited-text file with a header row.
///
/// Dtypes are inferred from the first rows. If that read fails (for example a
/// column that looks numeric early and holds text later) the schema is
/// inferred again from the whole file. Only if that also fails is every
/// column read as String and left for the type coercer.
/// Empty fields become Missing.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScrubError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    info!("Loading dataset from: {}", path.display());

    let df = match read_csv(path, Some(INFER_SCHEMA_ROWS)) {
        Ok(df) => df,
        Err(e) => {
            debug!("Typed loading failed, inferring from the whole file: {}", e);
            match read_csv(path, None) {
                Ok(df) => df,
                Err(e) => {
                    debug!("Full-scan loading failed, retrying as text: {}", e);
                    read_csv(path, Some(0))
                        .context(format!("Failed to read '{}'", path.display()))?
                }
            }
        }
    };

    if df.width() == 0 {
        return Err(ScrubError::MalformedTable(format!(
            "'{}' has no columns",
            path.display()
        )));
    }

    info!("Dataset loaded successfully: {:?}", df.shape());
    Ok(Table::new(df))
}

fn read_csv(path: &Path, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_infer_schema_length(infer_schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
}

/// Write a table as comma-separated text with a header row.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let mut df = table.frame().clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Failed to write '{}'", path.display()))?;

    info!("Cleaned data written to: {}", path.display());
    Ok(())
}
