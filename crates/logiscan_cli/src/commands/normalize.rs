use std::process::ExitCode;

use clap::Args;
use logiscan_engine::Normalizer;

use super::{emit, OutputFormat};
use crate::format::format_steps;
use crate::json_types::{NormalizeJsonOutput, StepJson};

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Formula in mixed notation
    pub formula: String,

    /// Also list each rewrite rule that changed the text
    #[arg(long, default_value_t = false)]
    pub steps: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: NormalizeArgs) -> ExitCode {
    let (normalized, steps) = Normalizer::default().normalize_with_steps(&args.formula);
    let show_steps = args.steps;

    emit(
        Ok(()),
        args.format,
        Some(args.formula.as_str()),
        |_| {
            if show_steps {
                format_steps(&steps, &normalized)
            } else {
                normalized.clone()
            }
        },
        |_| NormalizeJsonOutput {
            ok: true,
            input: args.formula.clone(),
            normalized: normalized.clone(),
            steps: if show_steps {
                steps.iter().map(StepJson::from).collect()
            } else {
                Vec::new()
            },
        },
    )
}
