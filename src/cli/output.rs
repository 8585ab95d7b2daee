//! Output formatting for CLI commands.

use std::io::Write;

use serde::Serialize;

use crate::cli::args::{LancetArgs, OutputFormat};
use crate::error::Result;
use crate::search::SearchResult;

/// Result structure for distance parsing.
#[derive(Debug, Serialize)]
pub struct DistanceResult {
    pub input: String,
    pub meters: f64,
}

/// Result structure for shape relations.
#[derive(Debug, Serialize)]
pub struct RelateResult {
    pub relation: String,
    pub shapes: usize,
    pub matches: Vec<usize>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> Result<()>;
}

impl HumanOutput for SearchResult {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "{} hits, max score {:.6}, took {:?}",
            self.total_hits, self.max_score, self.took
        )?;
        for (rank, hit) in self.hits.iter().enumerate() {
            writeln!(out, "{:>3}. {} ({:.6})", rank + 1, hit.id, hit.score)?;
            if let Some(expl) = &hit.expl {
                for line in expl.to_string().lines() {
                    writeln!(out, "       {line}")?;
                }
            }
        }
        Ok(())
    }
}

impl HumanOutput for DistanceResult {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{} = {} m", self.input, self.meters)?;
        Ok(())
    }
}

impl HumanOutput for RelateResult {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "{} of {} shapes match relation {}",
            self.matches.len(),
            self.shapes,
            self.relation
        )?;
        for index in &self.matches {
            writeln!(out, "{index}")?;
        }
        Ok(())
    }
}

/// Write `result` in the format selected on the command line.
pub fn output_result<T: Serialize + HumanOutput>(
    result: &T,
    cli_args: &LancetArgs,
    out: &mut dyn Write,
) -> Result<()> {
    match cli_args.output_format {
        OutputFormat::Human => result.write_human(out),
        OutputFormat::Json => {
            let json = if cli_args.pretty {
                serde_json::to_string_pretty(result)?
            } else {
                serde_json::to_string(result)?
            };
            writeln!(out, "{json}")?;
            Ok(())
        }
    }
}
