//! JSON Exporter
//!
//! Writes each inventory record as one line of compact JSON.

use std::io::{self, Write};

use crate::ports::{InventoryExporter, InventoryRecord};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl JsonExporter {
    /// Render a record as a single line (no trailing newline).
    pub fn to_line(record: &InventoryRecord<'_>) -> serde_json::Result<String> {
        serde_json::to_string(record)
    }
}

impl InventoryExporter for JsonExporter {
    fn export(&self, record: &InventoryRecord<'_>, out: &mut dyn Write) -> io::Result<()> {
        let line = Self::to_line(record).map_err(io::Error::other)?;
        writeln!(out, "{}", line)
    }
}
