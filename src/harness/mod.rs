//! Connectivity schema harness.
//!
//! Loads every `*.schema.json` under `schemas/`, indexes them by the
//! discriminator at `properties.schema.const`, then validates each `*.json`
//! under `fixtures/` against the schema named by its top-level `schema`
//! field. Loader problems are fatal; validation failures are collected into
//! a [`ValidationReport`].

pub mod index;
pub mod report;

pub use index::{discriminator, SchemaEntry, SchemaIndex};
pub use report::{FixtureOutcome, ValidationReport, Violation};

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Layout;
use crate::errors::{HarnessError, HarnessResult};

/// Suffix a fixture file must carry to be validated.
pub const FIXTURE_SUFFIX: &str = ".json";

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Files in `dir` whose name ends with `suffix`, in directory listing order.
pub(crate) fn list_files(dir: &Path, suffix: &str) -> HarnessResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| HarnessError::io(dir, e))?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

pub(crate) fn read_json(path: &Path) -> HarnessResult<Value> {
    let raw = std::fs::read_to_string(path).map_err(|e| HarnessError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|source| HarnessError::Json { path: path.to_path_buf(), source })
}

/// Validates one parsed fixture against the schema it names.
pub fn validate_fixture(index: &SchemaIndex, name: &str, fixture: &Value) -> HarnessResult<FixtureOutcome> {
    let key = fixture
        .get("schema")
        .and_then(Value::as_str)
        .ok_or_else(|| HarnessError::MissingSchemaKey { fixture: name.to_string() })?;
    let entry = index.get(key).ok_or_else(|| HarnessError::UnknownSchemaKey {
        fixture: name.to_string(),
        key: key.to_string(),
    })?;
    let outcome = FixtureOutcome::new(name, entry.violations(fixture));
    debug!(fixture = %name, schema = %key, schema_file = %entry.file(), ok = outcome.ok, "fixture validated");
    Ok(outcome)
}

/// Validates every fixture in `dir`, writing each status line to `out` as
/// soon as the fixture is checked. Stops at the first fixture that names a
/// missing or unknown schema.
pub fn validate_fixtures(
    index: &SchemaIndex,
    dir: &Path,
    out: &mut impl Write,
) -> HarnessResult<ValidationReport> {
    let mut report = ValidationReport::default();
    for path in list_files(dir, FIXTURE_SUFFIX)? {
        let name = file_name(&path);
        let fixture = read_json(&path)?;
        let outcome = validate_fixture(index, &name, &fixture)?;
        outcome.render(out).map_err(HarnessError::Output)?;
        report.push(outcome);
    }
    Ok(report)
}

/// Full harness run over `layout`: load, validate, summarize.
pub fn run(layout: &Layout, out: &mut impl Write) -> HarnessResult<ValidationReport> {
    let index = SchemaIndex::load(&layout.schemas_dir())?;
    if index.is_empty() {
        warn!(dir = %layout.schemas_dir().display(), "no schemas found");
    }
    info!(keys = ?index.keys(), root = %layout.root.display(), "schema index ready");
    let report = validate_fixtures(&index, &layout.fixtures_dir(), out)?;
    report.render_summary(out).map_err(HarnessError::Output)?;
    info!(
        fixtures = report.fixtures().len(),
        failed = report.failures().count(),
        "validation finished"
    );
    Ok(report)
}

/// Runs the harness and maps the outcome to the process exit status.
///
/// Status lines and the banner go to `out`; the failure summary goes to
/// `err`. Loader errors are returned and should also end the process with a
/// failure status.
pub fn check(layout: &Layout, out: &mut impl Write, err: &mut impl Write) -> HarnessResult<ExitCode> {
    let report = run(layout, out)?;
    if report.all_ok() {
        return Ok(ExitCode::SUCCESS);
    }
    let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
    writeln!(
        err,
        "{} of {} fixtures failed validation: {}",
        failed.len(),
        report.fixtures().len(),
        failed.join(", ")
    )
    .map_err(HarnessError::Output)?;
    Ok(ExitCode::FAILURE)
}
