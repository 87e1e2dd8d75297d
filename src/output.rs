//! Shell output for resolved variables.
//!
//! Each variable becomes one `export NAME=VALUE` line, ready for `eval`.

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use crate::resolver::ResultMap;

/// How values are rendered on the `export` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `export NAME=VALUE`, value written verbatim
    #[default]
    Export,
    /// `export NAME='VALUE'`, value quoted for POSIX shells
    Quoted,
}

/// Renders one line per variable, in name order.
pub fn render_exports(env: &ResultMap, format: OutputFormat) -> Result<Vec<String>> {
    env.iter()
        .map(|(name, value)| {
            let value = match format {
                OutputFormat::Export => value.clone(),
                OutputFormat::Quoted => shlex::try_quote(value)?.into_owned(),
            };
            Ok(format!("export {name}={value}"))
        })
        .collect()
}

/// Writes the rendered lines to `out`. Nothing is written if rendering fails.
pub fn write_exports<W: Write>(out: &mut W, env: &ResultMap, format: OutputFormat) -> Result<()> {
    let lines = render_exports(env, format)?;
    debug!(lines = lines.len(), ?format, "Writing exports");

    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    Ok(())
}
