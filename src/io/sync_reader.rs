//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over commands from a CSV command log.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<EscrowCommand, EscrowError>` for each CSV row:
//!
//! ```no_run
//! use escrow_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("{:?}", command),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - A missing or unreadable file is returned from `new()`
//! - Individual row errors are yielded as `Err` items and iteration continues
//! - Parse errors carry the line number reported by the csv reader

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{EscrowCommand, EscrowError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming reader over a command log file
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
}

impl SyncReader {
    /// Open a command log
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file does not exist, `IoError` for any
    /// other open failure.
    pub fn new(path: &Path) -> Result<Self, EscrowError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EscrowError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => EscrowError::from(e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self { reader })
    }
}

impl Iterator for SyncReader {
    type Item = Result<EscrowCommand, EscrowError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        let item = match deserializer.next()? {
            Ok(csv_record) => convert_csv_record(csv_record),
            Err(e) => Err(EscrowError::from(e)),
        };
        Some(item)
    }
}
