//! analyze subcommand handler.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use logiscan_engine::{truth_series, Analysis, AnalysisResult, Analyzer, NotationTables, TruthSeries};

use super::{emit, OutputFormat, RangeArgs};
use crate::config::LogiscanConfig;
use crate::format::format_analysis;
use crate::json_types::AnalyzeJsonOutput;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Formula to analyze, e.g. "∀x: x*x ≥ 0" or "1 < x ≤ 3"
    pub formula: String,

    #[command(flatten)]
    pub range: RangeArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: AnalyzeArgs, config: &LogiscanConfig) -> ExitCode {
    emit(
        run_inner(&args, config),
        args.format,
        Some(args.formula.as_str()),
        |(analysis, _)| format_analysis(analysis),
        |(analysis, series)| AnalyzeJsonOutput::new(analysis, series),
    )
}

fn run_inner(args: &AnalyzeArgs, config: &LogiscanConfig) -> Result<(Analysis, TruthSeries)> {
    let domain = config.domain(args.range.min, args.range.max, args.range.step);
    let analyzer = Analyzer::new(NotationTables::shared(), config.analyzer_options());
    let analysis = analyzer.analyze_domain(&args.formula, domain)?;

    let series = match &analysis.result {
        AnalysisResult::Unquantified { segments, .. } => truth_series(segments, domain.min, domain.max),
        AnalysisResult::Quantified { .. } => TruthSeries::new(),
    };
    Ok((analysis, series))
}
