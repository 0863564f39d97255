//! Asynchronous CSV reader with batch interface
//!
//! Reads commands from a CSV command log in batches for the async strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of EscrowCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```
//!
//! Malformed rows are logged, counted and skipped; they never end a batch
//! early.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::EscrowCommand;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
        }
    }

    /// Rows dropped so far because they could not be read or converted
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Read up to `batch_size` valid commands
    ///
    /// An empty batch means the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<EscrowCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(command) => batch.push(command),
                    Err(e) => {
                        self.skipped += 1;
                        warn!(error = %e, "skipping command row");
                    }
                },
                Some(Err(e)) => {
                    self.skipped += 1;
                    warn!(error = %e, "skipping malformed CSV row");
                }
                None => break,
            }
        }

        batch
    }
}
