//! Append-only CSV sink for snapshot rows.

mod sink;

pub use sink::CsvSink;
