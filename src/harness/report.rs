use serde::Serialize;
use std::io::{self, Write};

/// One error reported by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub instance_path: String,
    pub schema_path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureOutcome {
    pub name: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Violation>,
}

impl FixtureOutcome {
    pub fn new(name: impl Into<String>, errors: Vec<Violation>) -> Self {
        Self { name: name.into(), ok: errors.is_empty(), errors }
    }

    /// Writes the `OK`/`FAIL` status line, followed on failure by the
    /// violation list as pretty-printed JSON.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        if self.ok {
            writeln!(out, "OK   {}", self.name)
        } else {
            writeln!(out, "FAIL {}", self.name)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&self.errors)?)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    fixtures: Vec<FixtureOutcome>,
    all_ok: bool,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self { fixtures: Vec::new(), all_ok: true }
    }
}

impl ValidationReport {
    pub fn push(&mut self, outcome: FixtureOutcome) {
        self.all_ok &= outcome.ok;
        self.fixtures.push(outcome);
    }

    pub fn all_ok(&self) -> bool {
        self.all_ok
    }

    pub fn fixtures(&self) -> &[FixtureOutcome] {
        &self.fixtures
    }

    pub fn failures(&self) -> impl Iterator<Item = &FixtureOutcome> {
        self.fixtures.iter().filter(|o| !o.ok)
    }

    /// Success banner, written only when every fixture passed.
    pub fn render_summary(&self, out: &mut impl Write) -> io::Result<()> {
        if self.all_ok {
            writeln!(out, "All {} connectivity fixtures are valid.", self.fixtures.len())?;
        }
        Ok(())
    }
}
