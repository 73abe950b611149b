//! Tabular (CSV) input and output
//!
//! Input delimiter is sniffed from the first 2048 bytes: `;` when it occurs
//! more often than `,`, otherwise `,`. The sample is raw bytes (BOM
//! included), not decoded characters. Both delimiters are ASCII, so this only
//! narrows the window when multi-byte text falls inside it. A UTF-8 BOM is
//! stripped. Output is
//! always comma-delimited with the header taken from the first row.

use crate::error::{CloudOptError, Result};
use crate::models::Row;
use std::fs::File;
use std::io::{Chain, Cursor, Read, Write};
use std::path::Path;

/// Bytes inspected for delimiter sniffing
pub const SNIFF_BYTES: usize = 2048;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Underlying stream of a [`TableReader`]: the sniffed sample, then the rest
pub type Source<R> = Chain<Cursor<Vec<u8>>, R>;

/// Choose the input delimiter from a sample of the data
pub fn sniff_delimiter(sample: &[u8]) -> u8 {
    let sample = &sample[..sample.len().min(SNIFF_BYTES)];
    let semicolons = sample.iter().filter(|&&b| b == b';').count();
    let commas = sample.iter().filter(|&&b| b == b',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Iterator of [`Row`]s over a CSV stream with a header line
pub struct TableReader<R: Read> {
    inner: csv::Reader<Source<R>>,
    headers: Vec<String>,
    record: csv::StringRecord,
}

impl TableReader<File> {
    /// Open a CSV file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| CloudOptError::InputUnreadable {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }
}

impl<'a> TableReader<&'a [u8]> {
    /// Read CSV from an in-memory buffer
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }
}

impl<R: Read> TableReader<R> {
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let mut sample = Vec::with_capacity(SNIFF_BYTES);
        (&mut reader)
            .take(SNIFF_BYTES as u64)
            .read_to_end(&mut sample)?;

        let delimiter = sniff_delimiter(&sample);
        if sample.starts_with(UTF8_BOM) {
            sample.drain(..UTF8_BOM.len());
        }

        let mut inner = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(Cursor::new(sample).chain(reader));
        let headers = inner.headers()?.iter().map(str::to_string).collect();

        Ok(Self {
            inner,
            headers,
            record: csv::StringRecord::new(),
        })
    }
}

impl<R: Read> Iterator for TableReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.read_record(&mut self.record) {
            Ok(true) => Some(Ok(self
                .headers
                .iter()
                .zip(self.record.iter())
                .map(|(h, v)| (h.as_str(), v))
                .collect())),
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

/// Write rows as CSV, header from the first row's keys
///
/// Later rows missing a header field get an empty value; fields not in the
/// header are not written.
pub fn write_rows<W: Write>(writer: W, rows: &[Row]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let header: Vec<&str> = first.keys().collect();

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&header)?;
    for row in rows {
        writer.write_record(header.iter().map(|key| row.get(key).unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize rows to CSV bytes
pub fn to_csv_bytes(rows: &[Row]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_rows(&mut buffer, rows)?;
    Ok(buffer)
}

/// Write rows to a CSV file, replacing it
pub fn write_file(path: &Path, rows: &[Row]) -> Result<()> {
    write_rows(File::create(path)?, rows)
}
