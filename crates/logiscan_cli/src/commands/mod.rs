//! Subcommand handlers.
//!
//! Each handler builds its result with `anyhow::Result` and hands it to
//! [`emit`], which prints text or JSON and picks the exit code.

pub mod analyze;
pub mod classify;
pub mod domain;
pub mod normalize;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::json_types::{print_pretty_json, ErrorJsonOutput};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Domain bounds; anything left out comes from the config.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RangeArgs {
    /// Lower bound of the domain
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Upper bound of the domain
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Sampling step
    #[arg(long, allow_negative_numbers = true)]
    pub step: Option<f64>,
}

/// Print `result` in `format` and map it to an exit code.
///
/// Text errors go to stderr. JSON errors go to stdout as an
/// [`ErrorJsonOutput`] so scripts always get a parseable document.
pub(crate) fn emit<T, J: Serialize>(
    result: Result<T>,
    format: OutputFormat,
    input: Option<&str>,
    text: impl FnOnce(&T) -> String,
    json: impl FnOnce(&T) -> J,
) -> ExitCode {
    match result {
        Ok(value) => {
            match format {
                OutputFormat::Text => println!("{}", text(&value)),
                OutputFormat::Json => print_pretty_json(&json(&value)),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            match format {
                OutputFormat::Text => eprintln!("Error: {:#}", e),
                OutputFormat::Json => print_pretty_json(&ErrorJsonOutput::from_error(&e, input)),
            }
            ExitCode::FAILURE
        }
    }
}
