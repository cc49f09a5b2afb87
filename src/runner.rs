//! Line-oriented driver.
//!
//! Reads one record per line, writes one output line per record, in order.
//! Records end at `\n`, `\r\n` or a lone `\r`. A record that is not valid
//! UTF-8 is an invalid event, not a read failure.

use std::io::{self, BufRead, ErrorKind, Write};
use tracing::{debug, info, warn};

use crate::processor::{ProcessorStats, StreamProcessor};
use crate::store::WindowedGraph;
use crate::types::StreamInput;
use crate::validate::EventValidator;

/// Error type for runner operations.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Failed to read a record.
    #[error("Failed to read line {line}: {source}")]
    Read {
        /// 1-based line number.
        line: u64,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Failed to write an output line.
    #[error("Failed to write output: {0}")]
    Write(#[from] io::Error),
}

/// Splits a byte stream into records on `\n`, `\r\n` and lone `\r`.
#[derive(Debug)]
struct RecordReader<R> {
    inner: R,
    /// Last record ended in `\r`; a directly following `\n` belongs to it.
    skip_lf: bool,
}

impl<R: BufRead> RecordReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            skip_lf: false,
        }
    }

    /// Read the next record into `buf`, without its terminator.
    ///
    /// Returns `false` at end of input.
    fn read_record(&mut self, buf: &mut Vec<u8>) -> io::Result<bool> {
        buf.clear();
        let mut read_any = false;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                return Ok(read_any);
            }

            let mut start = 0;
            if self.skip_lf {
                self.skip_lf = false;
                if available[0] == b'\n' {
                    start = 1;
                }
            }

            let rest = &available[start..];
            match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(i) => {
                    buf.extend_from_slice(&rest[..i]);
                    self.skip_lf = rest[i] == b'\r';
                    self.inner.consume(start + i + 1);
                    return Ok(true);
                }
                None => {
                    buf.extend_from_slice(rest);
                    read_any |= !rest.is_empty();
                    let consumed = available.len();
                    self.inner.consume(consumed);
                }
            }
        }
    }
}

/// Drive `processor` over every line of `reader`, writing results to `writer`.
///
/// Returns the processor's counters once the input is exhausted.
pub fn run_stream<G, R, W>(
    processor: &mut StreamProcessor<G>,
    validator: &EventValidator,
    reader: R,
    mut writer: W,
) -> Result<ProcessorStats, RunError>
where
    G: WindowedGraph,
    R: BufRead,
    W: Write,
{
    let mut records = RecordReader::new(reader);
    let mut record = Vec::new();
    let mut line_no: u64 = 0;

    loop {
        let more = records
            .read_record(&mut record)
            .map_err(|source| RunError::Read {
                line: line_no + 1,
                source,
            })?;
        if !more {
            break;
        }
        line_no += 1;

        let input = match std::str::from_utf8(&record) {
            Ok(text) => validator.classify(text),
            Err(e) => {
                warn!(line = line_no, error = %e, "rejected record");
                StreamInput::Invalid
            }
        };
        let output = processor.process(input);
        writeln!(writer, "{}", output)?;

        if line_no % 10_000 == 0 {
            debug!(lines = line_no, watermark = processor.watermark(), "progress");
        }
    }

    writer.flush()?;

    let stats = processor.stats();
    info!(
        lines = line_no,
        events = stats.events,
        invalid = stats.invalid,
        blank = stats.blank,
        edges_evicted = stats.edges_evicted,
        "stream complete"
    );

    Ok(stats)
}
