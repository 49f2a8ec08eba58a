pub mod cli;
pub mod diagnostics;
pub mod dispatch;

use anyhow::Result;
use clap::Parser;
use tunedeck_app::LocalBackends;

use crate::cli::Cli;
use crate::diagnostics::DiagnosticsSession;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let diagnostics = DiagnosticsSession::initialize(cli.diagnostics)?;
    if let Some(path) = diagnostics.path() {
        tracing::info!(path = %path.display(), "diagnostics enabled");
    }

    let backends = LocalBackends::open()?;
    let app = backends.app();
    let result = dispatch::run_with_deps(cli, &app);
    if let Err(error) = &result {
        diagnostics.record(format!("command failed: {error:#}"));
    }
    result
}
