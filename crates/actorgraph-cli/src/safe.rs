//! Lenient discovery that survives broken actor entries.
//!
//! The manifest is read as a plain TOML table and each actor is decoded on its
//! own, so one malformed entry does not hide the rest. Links are not followed.

use std::fmt::Write;
use std::path::Path;

use tracing::warn;

use actorgraph_error::{Error, Result};

use crate::listing::write_header;
use crate::repository::{ActorEntry, MANIFEST_FILE, read_manifest_text, relative_path};

#[derive(Debug, Default)]
pub struct SafeReport {
    pub output: String,
    /// One message per actor entry that could not be decoded.
    pub skipped: Vec<String>,
}

pub fn safe_discover(base_dir: &Path, cwd: &Path) -> Result<SafeReport> {
    let manifest_path = base_dir.join(MANIFEST_FILE);
    let text = read_manifest_text(&manifest_path)?;
    let table: toml::Table = text.parse().map_err(|err: toml::de::Error| {
        Error::manifest_invalid(manifest_path.display().to_string(), err.message().to_string())
            .with_operation("safe::discover")
            .set_source(err)
    })?;

    let name = table
        .get("name")
        .and_then(toml::Value::as_str)
        .unwrap_or("<unnamed>");

    let mut report = SafeReport::default();
    let mut actors = Vec::new();

    let entries = table
        .get("actors")
        .and_then(toml::Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for (index, entry) in entries.iter().enumerate() {
        match entry.clone().try_into::<ActorEntry>() {
            Ok(actor) => actors.push(actor),
            Err(err) => {
                let label = entry
                    .get("name")
                    .and_then(toml::Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("#{index}"));
                warn!(actor = %label, error = %err, "skipping actor entry");
                report
                    .skipped
                    .push(format!("actor {label}: {}", err.message()));
            }
        }
    }

    actors.sort_by(|a, b| a.name.cmp(&b.name));

    write_header(&mut report.output, name, base_dir);
    let _ = writeln!(report.output, "Actors({}):", actors.len());
    for actor in &actors {
        let path = relative_path(&base_dir.join(&actor.path), cwd);
        let _ = writeln!(report.output, "   - {:<35} {}", actor.name, path.display());
        if !actor.consumes.is_empty() {
            let _ = writeln!(report.output, "       consumes: {}", actor.consumes.join(", "));
        }
        if !actor.produces.is_empty() {
            let _ = writeln!(report.output, "       produces: {}", actor.produces.join(", "));
        }
    }
    report.output.push('\n');

    Ok(report)
}
