use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use polars::prelude::*;

use podpulse_domain::{COLUMNS, SnapshotRow};
use podpulse_ports::SinkPort;

/// Appends rows to a CSV file. The header is written only when the file is
/// missing or empty; existing content is never truncated. A torn last line
/// left by an interrupted write is terminated before new rows go in.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SinkPort for CsvSink {
    async fn append(&self, rows: &[SnapshotRow]) -> Result<()> {
        if rows.is_empty() {
            tracing::debug!(path = %self.path.display(), "no rows to append");
            return Ok(());
        }

        let frame = to_frame(rows)?;
        let count = rows.len();
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_frame(&path, frame))
            .await
            .context("CSV writer task panicked")??;

        tracing::info!(path = %self.path.display(), rows = count, "data written");
        Ok(())
    }
}

fn to_frame(rows: &[SnapshotRow]) -> Result<DataFrame> {
    let cells: Vec<_> = rows.iter().map(SnapshotRow::cells).collect();
    let columns = COLUMNS
        .iter()
        .enumerate()
        .map(|(index, name)| {
            // Empty cells go in as nulls so the writer leaves them bare.
            let values: Vec<Option<&str>> = cells
                .iter()
                .map(|row| Some(row[index].as_str()).filter(|cell| !cell.is_empty()))
                .collect();
            Series::new(name, values)
        })
        .collect::<Vec<_>>();
    DataFrame::new(columns).context("building snapshot frame")
}

fn needs_header(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len() == 0),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(true),
        Err(err) => Err(err).with_context(|| format!("inspecting {}", path.display())),
    }
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    file.seek(SeekFrom::End(-1))
        .with_context(|| format!("seeking {}", path.display()))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(last[0] == b'\n')
}

fn write_frame(path: &Path, mut frame: DataFrame) -> Result<()> {
    let include_header = needs_header(path)?;
    let torn = !include_header && !ends_with_newline(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    if torn {
        tracing::warn!(path = %path.display(), "terminating partial last line");
        file.write_all(b"\n")
            .with_context(|| format!("writing {}", path.display()))?;
    }

    CsvWriter::new(&mut file)
        .include_header(include_header)
        .finish(&mut frame)
        .with_context(|| format!("writing {}", path.display()))?;
    file.flush()?;
    file.sync_data()
        .with_context(|| format!("syncing {}", path.display()))?;
    Ok(())
}
