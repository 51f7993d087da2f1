//! Report destination chosen by `--output`.
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered writer for a report, either standard output or a file.
pub struct ReportSink {
    destination: Option<PathBuf>,
    writer: BufWriter<Box<dyn Write>>,
}

impl ReportSink {
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let writer: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(io::stdout()),
        };
        Ok(Self {
            destination: path.map(Path::to_path_buf),
            writer: BufWriter::new(writer),
        })
    }

    pub fn destination(&self) -> String {
        self.destination
            .as_ref()
            .map_or_else(|| "standard output".to_string(), |p| p.display().to_string())
    }

    /// Flush everything written so far.
    pub fn finish(mut self) -> Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("failed to write report to {}", self.destination()))
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
