//! Streaming table load from delimiter-separated files

use super::{LoadError, Table, TableBuilder};
use crate::progress::{ProgressReport, ProgressTracker};
use async_compression::tokio::bufread::GzipDecoder;
use csv_async::AsyncReaderBuilder;
use futures::StreamExt;
use std::{path::Path, sync::Arc};
use tokio::{
    fs::File,
    io::{AsyncRead, BufReader},
};

/// Load the phrase table from a CSV or TSV file, gzipped or not
///
/// The field delimiter is inferred from the file name: `.csv` means commas,
/// anything else means tabs. A trailing `.gz` extension enables gzip
/// decompression and is stripped before looking at the inner extension.
pub async fn load(path: &Path, report: &ProgressReport) -> Result<Arc<Table>, LoadError> {
    let displayed_path = path.display().to_string().into_boxed_str();
    let file = File::open(path).await.map_err(|source| LoadError::Open {
        path: displayed_path.clone(),
        source,
    })?;
    let reader = BufReader::new(file);

    let rows = report.add_counter("Loading the phrase table", "rows");
    let delimiter = delimiter_for(path);
    let result = if is_gzipped(path) {
        read_table(GzipDecoder::new(reader), delimiter, displayed_path, &rows).await
    } else {
        read_table(reader, delimiter, displayed_path, &rows).await
    };
    rows.finish();
    result.map(Arc::new)
}

/// Decode delimiter-separated records into a table
async fn read_table<R>(
    input: R,
    delimiter: u8,
    path: Box<str>,
    rows: &ProgressTracker,
) -> Result<Table, LoadError>
where
    R: AsyncRead + Unpin + Send,
{
    let parse_error = |source| LoadError::Parse {
        path: path.clone(),
        source,
    };
    let mut reader = AsyncReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .create_reader(input);

    // The header row decides the table's shape and must name a phrase column
    let headers = reader.headers().await.map_err(parse_error)?;
    let mut builder = TableBuilder::new(headers.iter().map(Box::from))?;

    // Everything below the header is data
    let mut records = reader.records();
    while let Some(record) = records.next().await {
        let record = record.map_err(parse_error)?;
        builder.push_record(record.iter());
        rows.make_progress(1);
    }

    let table = builder.finish()?;
    log::debug!(
        "loaded {} rows and {} columns from {path}",
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

/// Field delimiter implied by the file name
fn delimiter_for(path: &Path) -> u8 {
    let inner: &Path = if is_gzipped(path) {
        path.file_stem().map_or(path, Path::new)
    } else {
        path
    };
    match inner.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
        _ => b'\t',
    }
}

/// Truth that the file name announces gzip compression
fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}
