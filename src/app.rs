//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - initialises logging
//! - loads CSVs and runs the estimation pipeline
//! - prints reports
//! - writes prediction / model files

use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;

use crate::cli::{Command, CommonArgs, FitArgs, GenerateArgs, PredictArgs, RunArgs};
use crate::data::{SyntheticConfig, generate_synthetic};
use crate::domain::{GradientConfig, RunConfig, RunSpec};
use crate::error::AppError;
use crate::io::{load_table, read_model_json, write_model_json, write_predictions, write_table_csv};
use crate::report::{
    RULE, fmt_vec, format_coefficients, format_cost_trace, format_dataset_summary, format_run,
    format_suite_section, format_suite_summary, mse,
};

pub mod pipeline;

use pipeline::RunOutput;

/// Entry point for the `lr` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is fine; a malformed one is worth knowing about.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: failed to load .env: {e}");
        }
    }

    // `lr` on its own runs the six-configuration suite.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Fit(args) => handle_fit(args),
        Command::Predict(args) => handle_predict(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    // Tests and embedders may have installed a logger already.
    let _ = builder.try_init();
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let output_dir = (!args.no_output).then(|| args.output_dir.clone());
    let config = run_config_from_args(&args.common, output_dir, None, false)?;
    let dataset = pipeline::load_dataset(&config)?;

    let results = pipeline::run_suite(&dataset.train.table, &dataset.test.table, &config);

    let mut failed = 0usize;
    for (spec, result) in &results {
        print!("{}", format_suite_section(spec, result));
        if let Err(err) = result {
            log::error!("{} failed: {err}", spec.label());
            failed += 1;
        }
    }
    println!("{RULE}");

    let write_errors = match &config.output_dir {
        Some(dir) => write_suite_predictions(dir, &results),
        None => Vec::new(),
    };

    if args.summary {
        println!();
        print!("{}", format_dataset_summary(&dataset));
        println!();
        print!("{}", format_suite_summary(&results));
    }

    suite_outcome(failed + write_errors.len(), write_errors.len(), results.len())
}

/// Write one prediction file per successful configuration.
///
/// Every file is attempted; failures are returned rather than stopping the loop.
fn write_suite_predictions(
    dir: &Path,
    results: &[(RunSpec, Result<RunOutput, AppError>)],
) -> Vec<(RunSpec, AppError)> {
    results
        .iter()
        .filter_map(|(spec, result)| {
            let out = result.as_ref().ok()?;
            let err = write_predictions(&dir.join(spec.output_file_name()), &out.predictions).err()?;
            log::error!("{}: {err}", spec.label());
            Some((*spec, err))
        })
        .collect()
}

/// Exit status of `lr run` once every section has been printed.
///
/// Estimation failures take precedence (code 4); a run whose only failures were
/// prediction writes reports the IO code (2).
fn suite_outcome(failed: usize, write_failures: usize, total: usize) -> Result<(), AppError> {
    if failed == 0 {
        return Ok(());
    }
    let code = if failed > write_failures { 4 } else { 2 };
    Err(AppError::new(code, format!("{failed} of {total} configurations failed.")))
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(
        &args.common,
        args.output_dir.clone(),
        args.export_model.clone(),
        args.trace,
    )?;
    let dataset = pipeline::load_dataset(&config)?;
    let spec = RunSpec {
        method: args.method,
        zscore: args.zscore,
    };

    let out = pipeline::run_spec(&dataset.train.table, &dataset.test.table, spec, &config)?;

    println!("{}", spec.label());
    print!("{}", format_dataset_summary(&dataset));
    println!();
    print!("{}", format_coefficients(&out));
    println!();
    print!("{}", format_run(&out));

    if config.trace && !out.costs.is_empty() {
        println!("\nCost trace:");
        print!("{}", format_cost_trace(&out.costs));
    }

    if let Some(dir) = &config.output_dir {
        write_predictions(&dir.join(spec.output_file_name()), &out.predictions)?;
    }
    if let Some(path) = &config.export_model {
        write_model_json(path, &out.to_model_file(&config))?;
        println!("Model written to {}", path.display());
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let model = read_model_json(&args.model)?;
    let data = load_table(&args.input, false)?;

    let predictions = pipeline::predict_with_model(&model, &data.table)?;
    println!(
        "{} model ({} columns) applied to {} rows",
        model.method.display_name(),
        model.feature_names.len(),
        predictions.len()
    );

    if let Some(actual) = &data.table.response {
        println!("MSE:  {}", mse(&predictions, actual)?);
    }

    match &args.output {
        Some(path) => write_predictions(path, &predictions)?,
        None => println!("{}", fmt_vec(&predictions)),
    }
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let data = generate_synthetic(&SyntheticConfig {
        train_rows: args.train_rows,
        test_rows: args.test_rows,
        features: args.features,
        noise_sd: args.noise,
        seed: args.seed,
    })?;

    write_table_csv(&args.train, &data.train)?;
    write_table_csv(&args.test, &data.test)?;

    println!(
        "Wrote {} train rows to {} and {} test rows to {}",
        args.train_rows,
        args.train.display(),
        args.test_rows,
        args.test.display()
    );
    let parts: Vec<String> = data.true_beta.iter().map(|b| format!("{b:.6}")).collect();
    println!("Generator beta (offset first): [{}]", parts.join(", "));
    Ok(())
}

/// Convert shared CLI arguments into a validated `RunConfig`.
pub fn run_config_from_args(
    args: &CommonArgs,
    output_dir: Option<PathBuf>,
    export_model: Option<PathBuf>,
    trace: bool,
) -> Result<RunConfig, AppError> {
    if !(args.alpha.is_finite() && args.alpha > 0.0) {
        return Err(AppError::new(2, format!("--alpha must be finite and > 0, got {}", args.alpha)));
    }

    Ok(RunConfig {
        train_path: args.train.clone(),
        test_path: args.test.clone(),
        gradient: GradientConfig {
            learning_rate: args.alpha,
            max_iterations: args.iterations,
            init: args.init.with_seed(args.seed),
        },
        zscore_scope: args.zscore_scope,
        output_dir,
        export_model,
        trace,
    })
}

/// Rewrite argv so `lr` defaults to `lr run`.
///
/// Rules:
/// - `lr`                      -> `lr run`
/// - `lr --train a.csv ...`    -> `lr run --train a.csv ...`
/// - `lr --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "fit" | "predict" | "generate");
    if is_subcommand {
        return argv;
    }

    // A leading flag is treated as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InitialBeta;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_suite() {
        assert_eq!(rewrite_args(argv(&["lr"])), argv(&["lr", "run"]));
        assert_eq!(
            rewrite_args(argv(&["lr", "--alpha", "0.01"])),
            argv(&["lr", "run", "--alpha", "0.01"])
        );
        assert_eq!(rewrite_args(argv(&["lr", "--help"])), argv(&["lr", "--help"]));
        assert_eq!(rewrite_args(argv(&["lr", "fit", "-z"])), argv(&["lr", "fit", "-z"]));
    }

    #[test]
    fn config_from_args_carries_hyperparameters() {
        let cli = crate::cli::Cli::try_parse_from(["lr", "fit", "--alpha", "0.02", "--iterations", "7", "--seed", "3"])
            .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = run_config_from_args(&args.common, None, None, false).unwrap();
        assert_eq!(config.gradient.max_iterations, 7);
        assert_eq!(config.gradient.init, InitialBeta::Uniform { seed: 3 });
        assert!((config.gradient.learning_rate - 0.02).abs() < 1e-15);
    }

    #[test]
    fn suite_outcome_counts_every_failure() {
        assert!(suite_outcome(0, 0, 6).is_ok());

        let estimation = suite_outcome(2, 0, 6).unwrap_err();
        assert_eq!(estimation.exit_code(), 4);
        assert_eq!(estimation.message(), "2 of 6 configurations failed.");

        assert_eq!(suite_outcome(1, 1, 6).unwrap_err().exit_code(), 2);
        assert_eq!(suite_outcome(3, 1, 6).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn failed_prediction_write_does_not_stop_the_others() {
        use crate::domain::Method;
        use crate::models::LinearModel;
        use nalgebra::DVector;

        let output = |spec: RunSpec| RunOutput {
            spec,
            model: LinearModel::new(DVector::from_row_slice(&[0.0, 1.0])),
            costs: Vec::new(),
            predictions: DVector::from_row_slice(&[1.0, 2.0]),
            mse: 0.0,
            columns: vec!["offset".to_string(), "x".to_string()],
            normalization: None,
        };
        let results: Vec<(RunSpec, Result<RunOutput, AppError>)> = RunSpec::SUITE
            .iter()
            .map(|&spec| {
                let result = if spec.method == Method::Closed {
                    Err(AppError::new(4, "singular"))
                } else {
                    Ok(output(spec))
                };
                (spec, result)
            })
            .collect();

        // A regular file where the output directory should be: every write fails.
        let blocker = std::env::temp_dir().join(format!("lr-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"").unwrap();
        let errors = write_suite_predictions(&blocker.join("out"), &results);
        std::fs::remove_file(&blocker).ok();

        let specs: Vec<RunSpec> = errors.iter().map(|(s, _)| *s).collect();
        assert_eq!(specs, vec![RunSpec::SUITE[1], RunSpec::SUITE[2], RunSpec::SUITE[4], RunSpec::SUITE[5]]);
        assert!(errors.iter().all(|(_, e)| e.exit_code() == 2));
    }

    #[test]
    fn negative_alpha_is_rejected() {
        let cli = crate::cli::Cli::try_parse_from(["lr", "fit", "--alpha=-1"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(run_config_from_args(&args.common, None, None, false).unwrap_err().exit_code(), 2);
    }
}
