//! Display sinks for periodic monitor snapshots

use crate::monitor::stats::MonitorSnapshot;
use std::io::{self, Write};

/// Destination for the monitor's periodic snapshot
pub trait DisplaySink: Send {
    fn emit(&mut self, snapshot: &MonitorSnapshot) -> io::Result<()>;
}

/// Writes the three-line snapshot to standard output
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl DisplaySink for ConsoleSink {
    fn emit(&mut self, snapshot: &MonitorSnapshot) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", snapshot)?;
        out.flush()
    }
}

/// Writes snapshots into any writer (files, buffers)
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> DisplaySink for WriterSink<W> {
    fn emit(&mut self, snapshot: &MonitorSnapshot) -> io::Result<()> {
        writeln!(self.writer, "{}", snapshot)?;
        self.writer.flush()
    }
}

/// Sink that records every snapshot for later inspection
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct SnapshotRecorder {
    snapshots: std::sync::Arc<std::sync::Mutex<Vec<MonitorSnapshot>>>,
}

#[cfg(test)]
impl SnapshotRecorder {
    pub(crate) fn snapshots(&self) -> Vec<MonitorSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl DisplaySink for SnapshotRecorder {
    fn emit(&mut self, snapshot: &MonitorSnapshot) -> io::Result<()> {
        self.snapshots.lock().unwrap().push(*snapshot);
        Ok(())
    }
}
