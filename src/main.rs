use anyhow::Context;
use flowguard::{config::Layout, harness, logging};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    let layout = Layout::default();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    harness::check(&layout, &mut stdout.lock(), &mut stderr.lock())
        .with_context(|| format!("checking connectivity fixtures in {}", layout.root.display()))
}
