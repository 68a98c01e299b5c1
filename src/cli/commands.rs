//! Command implementations.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use log::info;

use crate::cleaning::{CleaningPipeline, OutlierCaps};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{load_or_default, Config};
use crate::data::filter::FilterSpec;
use crate::data::loader::load_file;
use crate::data::writer::write_listings;
use crate::error::{InsightsError, Result};
use crate::query::{run_query, FeatureMatrix, FilterOptions};
use crate::state::Session;

/// Execute a CLI command.
pub fn execute_command(args: InsightsArgs) -> Result<()> {
    let config = load_or_default(args.config.as_deref())?;
    match &args.command {
        Command::Clean(clean_args) => clean(clean_args, &config, &args),
        Command::Query(query_args) => query(query_args, &config, &args),
        Command::Options(options_args) => options(options_args, &config, &args),
        Command::Estimate(estimate_args) => estimate(estimate_args, &config, &args),
        Command::Features(features_args) => features(features_args, &config, &args),
    }
}

fn clean(args: &CleanArgs, config: &Config, cli_args: &InsightsArgs) -> Result<()> {
    let input = args.input.as_ref().unwrap_or(&config.paths.raw_input);
    let output = args.output.as_ref().unwrap_or(&config.paths.cleaned_output);

    let mut policy = config.cleaning.clone();
    if args.trim_outliers {
        policy.outliers = OutlierCaps::visualization();
    }

    let report = CleaningPipeline::with_policy(policy).run(input, output)?;
    output_result(
        &CleanOutput {
            input: input.display().to_string(),
            output: output.display().to_string(),
            report,
        },
        cli_args,
        render_clean,
    )
}

/// The cleaned dataset path: `--data`, else the configured output.
fn data_path<'a>(data: Option<&'a PathBuf>, config: &'a Config) -> &'a Path {
    data.unwrap_or(&config.paths.cleaned_output)
}

/// Filter from `--filter` (if any) with the individual flags laid over it.
fn resolve_filter(args: &FilterArgs) -> Result<FilterSpec> {
    let flags = args.to_spec();
    let Some(path) = &args.filter else {
        return Ok(flags);
    };
    let file = File::open(path).map_err(|e| InsightsError::io(path, e))?;
    let base: FilterSpec = serde_json::from_reader(io::BufReader::new(file))?;
    info!("loaded filter from {}", path.display());
    let mut spec = base.merged_with(flags);
    if let Some(superhost_only) = args.superhost_only {
        spec.superhost_only = superhost_only;
    }
    Ok(spec)
}

fn open_filtered(args: &FilterArgs, config: &Config) -> Result<Session> {
    let mut session = Session::open(data_path(args.data.as_ref(), config))?;
    session.set_filter(resolve_filter(args)?);
    if let Some(status) = &session.status_message {
        info!("{status}");
    }
    Ok(session)
}

fn query(args: &QueryArgs, config: &Config, cli_args: &InsightsArgs) -> Result<()> {
    let dataset = load_file(data_path(args.filter.data.as_ref(), config))?;
    let filter = resolve_filter(&args.filter)?;
    let result = run_query(&dataset, &filter);

    let exported_to = match &args.export {
        Some(path) => {
            write_listings(path, &result.listings)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    let shown = result.listings.iter().take(args.show_rows).copied().collect();
    output_result(
        &QueryOutput {
            filter,
            summary: result.summary,
            listings: shown,
            exported_to,
        },
        cli_args,
        render_query,
    )
}

fn options(args: &OptionsArgs, config: &Config, cli_args: &InsightsArgs) -> Result<()> {
    let dataset = load_file(data_path(args.data.as_ref(), config))?;
    output_result(&FilterOptions::from_dataset(&dataset), cli_args, render_options)
}

fn estimate(args: &EstimateArgs, config: &Config, cli_args: &InsightsArgs) -> Result<()> {
    let session = open_filtered(&args.filter, config)?;
    let estimate = session.estimate(args.guests, args.bedrooms, args.for_room_type)?;
    output_result(
        &EstimateOutput {
            filter: session.filter().clone(),
            estimate,
        },
        cli_args,
        render_estimate,
    )
}

fn features(args: &FeaturesArgs, config: &Config, cli_args: &InsightsArgs) -> Result<()> {
    let session = open_filtered(&args.filter, config)?;
    let matrix = FeatureMatrix::from_listings(&session.visible());

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| InsightsError::io(path, e))?;
            matrix.write_csv(BufWriter::new(file))?;
            if cli_args.verbosity() > 0 {
                eprintln!("Wrote {} feature rows to {}", matrix.nrows(), path.display());
            }
        }
        None => matrix.write_csv(io::stdout().lock())?,
    }
    Ok(())
}
