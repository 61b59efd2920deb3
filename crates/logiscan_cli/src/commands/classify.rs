use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use logiscan_engine::{Classification, Classifier, NotationTables};

use super::{emit, OutputFormat};
use crate::config::LogiscanConfig;
use crate::format::format_classification;
use crate::json_types::ClassifyJsonOutput;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Formula to inspect
    pub formula: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: ClassifyArgs, config: &LogiscanConfig) -> ExitCode {
    let classifier = Classifier::new(NotationTables::shared()).with_strict(config.strict_predicates);
    let result: Result<Classification> = Ok(classifier.classify(&args.formula));

    emit(
        result,
        args.format,
        Some(args.formula.as_str()),
        format_classification,
        |c| ClassifyJsonOutput::new(&args.formula, c),
    )
}
