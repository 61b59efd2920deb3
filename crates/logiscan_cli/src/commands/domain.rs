//! domain subcommand handler: validates a domain and lists its grid.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use logiscan_engine::{preview_domain, Analyzer, Domain, DomainPreview, NotationTables};

use super::{emit, OutputFormat, RangeArgs};
use crate::config::LogiscanConfig;
use crate::format::format_preview;
use crate::json_types::DomainJsonOutput;

#[derive(Args, Debug)]
pub struct DomainArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Maximum number of points to list
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: DomainArgs, config: &LogiscanConfig) -> ExitCode {
    emit(
        run_inner(&args, config),
        args.format,
        None,
        |(domain, preview)| format_preview(domain, preview),
        |(domain, preview)| DomainJsonOutput::new(domain, preview.clone()),
    )
}

fn run_inner(args: &DomainArgs, config: &LogiscanConfig) -> Result<(Domain, DomainPreview)> {
    let domain = config.domain(args.range.min, args.range.max, args.range.step);
    Analyzer::new(NotationTables::shared(), config.analyzer_options()).validate_domain(&domain)?;

    let limit = args.limit.unwrap_or(config.preview_limit);
    Ok((domain, preview_domain(&domain, limit)))
}
