//! Presentation of query results as tables or JSON.
//!
//! Everything here takes an explicit [`OutputConfig`] and a writer, so
//! rendering never depends on process-wide flags.

mod table;

use std::collections::BTreeMap;
use std::io::{self, Write};

use colored::Color;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{ClusterProperties, ResourceManifest, ValidationResult, ValidationType};
use table::{Cell, Table};

pub const TYPE_WIDTH: usize = 10;
pub const RESOURCE_WIDTH: usize = 80;
pub const MESSAGE_WIDTH: usize = 40;

/// How results are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Coloured output and progress spinners
    pub pretty: bool,
    /// JSON instead of tables
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            pretty: true,
            json: false,
        }
    }
}

impl OutputConfig {
    pub fn plain() -> Self {
        OutputConfig {
            pretty: false,
            json: false,
        }
    }

    pub fn json() -> Self {
        OutputConfig {
            pretty: false,
            json: true,
        }
    }
}

/// Pretty-printed (2-space) JSON followed by a newline
pub fn render_json<T: Serialize + ?Sized>(value: &T, out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn type_color(kind: ValidationType) -> Color {
    match kind {
        ValidationType::Success => Color::Green,
        ValidationType::Warning => Color::Yellow,
        ValidationType::Error => Color::Red,
    }
}

/// Validation entries followed by a summary row
pub fn render_validation(
    result: &ValidationResult,
    config: &OutputConfig,
    out: &mut dyn Write,
) -> io::Result<()> {
    if config.json {
        return render_json(result, out);
    }

    let mut table = Table::new()
        .column("Type", Some(TYPE_WIDTH))
        .column("Resource", Some(RESOURCE_WIDTH))
        .column("Message", Some(MESSAGE_WIDTH));

    for (name, entry) in result.resources() {
        table.row([
            Cell::colored(entry.kind.as_str(), type_color(entry.kind)),
            Cell::from(name.as_str()),
            Cell::from(entry.message.as_str()),
        ]);
    }

    let counts = result.counts();
    let status = result.status();
    table.separator();
    table.row([
        Cell::colored(status.as_str(), type_color(status)),
        Cell::from(format!(
            "{} resources validated successfully, {} warnings, {} errors",
            counts.success, counts.warning, counts.error
        )),
        Cell::from("N/A"),
    ]);

    table.render(out, config.pretty)
}

/// One row per cluster with its properties as compact JSON
pub fn render_clusters(
    clusters: &BTreeMap<String, ClusterProperties>,
    config: &OutputConfig,
    out: &mut dyn Write,
) -> io::Result<()> {
    if config.json {
        return render_json(clusters, out);
    }

    let mut table = Table::new()
        .column("Cluster", None)
        .column("Properties", Some(RESOURCE_WIDTH));

    for (name, properties) in clusters {
        table.row([
            Cell::from(name.as_str()),
            Cell::from(serde_json::to_string(properties)?),
        ]);
    }

    table.render(out, config.pretty)
}

/// One row per declared property of a single cluster
pub fn render_cluster(
    properties: &ClusterProperties,
    config: &OutputConfig,
    out: &mut dyn Write,
) -> io::Result<()> {
    if config.json {
        return render_json(properties, out);
    }

    let mut table = Table::new()
        .column("Property", None)
        .column("Value", Some(RESOURCE_WIDTH));

    for (key, value) in properties.iter() {
        table.row([Cell::from(key), Cell::from(display_value(value)?)]);
    }

    table.render(out, config.pretty)
}

/// One row per manifest, in declaration order
pub fn render_manifests(
    manifests: &[ResourceManifest],
    config: &OutputConfig,
    out: &mut dyn Write,
) -> io::Result<()> {
    if config.json {
        return render_json(manifests, out);
    }

    let mut table = Table::new()
        .column("Kind", None)
        .column("Namespace", None)
        .column("Name", Some(RESOURCE_WIDTH))
        .column("API Version", None);

    for manifest in manifests {
        table.row([
            manifest.kind().unwrap_or("-"),
            manifest.namespace().unwrap_or("-"),
            manifest.name().unwrap_or("-"),
            manifest.api_version().unwrap_or("-"),
        ]);
    }

    table.separator();
    table.row([format!("{} resources", manifests.len())]);

    table.render(out, config.pretty)
}

/// Strings unquoted, everything else as compact JSON
fn display_value(value: &Value) -> io::Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}
