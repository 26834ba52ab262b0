use crate::Pipelines::analyze_model2::{AnalyzeInputs, analyze};
use crate::Pipelines::edit_model2::{EditInputs, edit};
use crate::errors::Model2Error;
use crate::settings::{AnalysisConfig, ReportScope, SentinelSelector};
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, info, warn};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "m2tune")]
#[command(about = "Analyze model2 simulations and re-weight their rules")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file; command line options override its fields
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory receiving every output file (default: ./results)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Width at which the text reports are wrapped
    #[arg(long, global = true)]
    pub wrap_width: Option<usize>,

    /// Also write the log (at debug level) to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print summary tables to the console
    #[arg(long, global = true)]
    pub print_tables: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Which rules fired, which reactants went missing (MODEL2 POE POR NODE)
    Analyze {
        /// model2 file the simulation ran with
        model2: PathBuf,
        /// element presence table
        poe: PathBuf,
        /// rule usage table
        por: PathBuf,
        /// node annotation file (annot_node.csv from `edit`)
        node: PathBuf,
        /// Timesteps feeding the missing-element summary: final | all | last:N
        #[arg(long)]
        scope: Option<ReportScope>,
    },
    /// Re-weight the rules of a model2 file (MODEL2 POE)
    Edit {
        /// model2 file to re-weight
        model2: PathBuf,
        /// element presence table; only its header is read
        poe: PathBuf,
        /// Key of the sentinel rule, e.g. R95
        #[arg(long, conflicts_with_all = ["sentinel_expression", "sentinel_last", "no_sentinel"])]
        sentinel_key: Option<String>,
        /// Reaction expression of the sentinel rule, e.g. "NONE => NONE"
        #[arg(long, conflicts_with_all = ["sentinel_last", "no_sentinel"])]
        sentinel_expression: Option<String>,
        /// Use the last rule of the model as sentinel
        #[arg(long, conflicts_with = "no_sentinel")]
        sentinel_last: bool,
        /// Do not reset any rule weight
        #[arg(long)]
        no_sentinel: bool,
        /// Weight the sentinel rule is reset to
        #[arg(long)]
        reset_weight: Option<f64>,
    },
    /// Write a configuration file with the default values
    InitConfig {
        /// target JSON file
        path: PathBuf,
    },
}

fn level_filter(cli: &Cli) -> LevelFilter {
    if cli.quiet {
        return LevelFilter::Warn;
    }
    match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Terminal logger, combined with a file logger when `--log-file` is given.
pub fn init_logging(cli: &Cli) -> Result<(), Model2Error> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level_filter(cli),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(log_file) = &cli.log_file {
        let file = File::create(log_file).map_err(|e| Model2Error::io(log_file, e))?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }
    CombinedLogger::init(loggers)
        .map_err(|e| Model2Error::InvalidConfig(format!("logger already set: {}", e)))
}

/// Configuration file (or defaults) with the command line overrides applied.
pub fn build_config(cli: &Cli) -> Result<AnalysisConfig, Model2Error> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(width) = cli.wrap_width {
        config.wrap_width = width;
    }
    match &cli.command {
        Commands::Analyze { scope, .. } => {
            if let Some(scope) = scope {
                config.report_scope = *scope;
            }
        }
        Commands::Edit {
            sentinel_key,
            sentinel_expression,
            sentinel_last,
            no_sentinel,
            reset_weight,
            ..
        } => {
            if let Some(key) = sentinel_key {
                config.sentinel.selector = SentinelSelector::Key { key: key.clone() };
            } else if let Some(expression) = sentinel_expression {
                config.sentinel.selector = SentinelSelector::Expression {
                    expression: expression.clone(),
                };
            } else if *sentinel_last {
                config.sentinel.selector = SentinelSelector::LastRule;
            } else if *no_sentinel {
                config.sentinel.selector = SentinelSelector::Disabled;
            }
            if let Some(weight) = reset_weight {
                config.sentinel.reset_weight = *weight;
            }
        }
        Commands::InitConfig { .. } => {}
    }
    config.validate()?;
    Ok(config)
}

/// Runs the subcommand selected on the command line.
pub fn run(cli: &Cli) -> Result<(), Model2Error> {
    let config = build_config(cli)?;
    match &cli.command {
        Commands::Analyze {
            model2,
            poe,
            por,
            node,
            ..
        } => {
            let inputs = AnalyzeInputs::new(model2, poe, por, node);
            let summary = analyze(&inputs, &config)?;
            info!(
                "Analysis finished: {} used rules, {} missing elements, reports in '{}'",
                summary.used_rules.len(),
                summary.missing_elements.len(),
                config.output_dir.display()
            );
            if cli.print_tables {
                summary.pretty_print();
            }
        }
        Commands::Edit { model2, poe, .. } => {
            let summary = edit(&EditInputs::new(model2, poe), &config)?;
            let unused = summary.unused_elements();
            if !unused.is_empty() {
                warn!("{} elements are never used", unused.len());
            }
            info!(
                "Edit finished: {} rules re-weighted, outputs in '{}'",
                summary.rule_set.len(),
                config.output_dir.display()
            );
            if cli.print_tables {
                summary.pretty_print();
            }
        }
        Commands::InitConfig { path } => {
            config.save(path)?;
            info!("Configuration template written to '{}'", path.display());
        }
    }
    Ok(())
}

/// Entry point of the binary: parses arguments, sets up logging and runs the command.
pub fn run_cli() -> Result<(), Model2Error> {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli) {
        eprintln!("logging disabled: {}", e);
    }
    run(&cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "m2tune", "analyze", "m.model2", "a.poe", "a.por", "annot_node.csv", "--scope",
            "last:3", "--output-dir", "out",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.report_scope, ReportScope::Last(3));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        match cli.command {
            Commands::Analyze { node, .. } => assert_eq!(node, PathBuf::from("annot_node.csv")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_edit_sentinel_options() {
        let cli = Cli::try_parse_from([
            "m2tune",
            "edit",
            "m.model2",
            "a.poe",
            "--sentinel-key",
            "R95",
            "--reset-weight",
            "0.01",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(
            config.sentinel.selector,
            SentinelSelector::Key {
                key: "R95".to_string()
            }
        );
        assert_eq!(config.sentinel.reset_weight, 0.01);

        let cli =
            Cli::try_parse_from(["m2tune", "edit", "m.model2", "a.poe", "--no-sentinel"]).unwrap();
        assert_eq!(
            build_config(&cli).unwrap().sentinel.selector,
            SentinelSelector::Disabled
        );

        let conflicting = Cli::try_parse_from([
            "m2tune",
            "edit",
            "m.model2",
            "a.poe",
            "--sentinel-key",
            "R1",
            "--no-sentinel",
        ]);
        assert!(conflicting.is_err());
    }

    #[test]
    fn test_missing_positional_argument() {
        assert!(Cli::try_parse_from(["m2tune", "analyze", "m.model2", "a.poe"]).is_err());
    }

    #[test]
    fn test_config_file_with_overrides() {
        let mut temp_config = NamedTempFile::new().unwrap();
        writeln!(temp_config, r#"{{ "output_dir": "from_file", "wrap_width": 60 }}"#).unwrap();
        let config_path = temp_config.path().to_str().unwrap();

        let cli = Cli::try_parse_from([
            "m2tune", "--config", config_path, "--wrap-width", "100", "edit", "m.model2", "a.poe",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("from_file"));
        assert_eq!(config.wrap_width, 100);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli =
            Cli::try_parse_from(["m2tune", "edit", "m.model2", "a.poe", "--reset-weight=-1"])
                .unwrap();
        assert!(matches!(
            build_config(&cli),
            Err(Model2Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_level_filter() {
        let cli = Cli::try_parse_from(["m2tune", "-vv", "init-config", "c.json"]).unwrap();
        assert_eq!(level_filter(&cli), LevelFilter::Trace);
        let cli = Cli::try_parse_from(["m2tune", "-q", "init-config", "c.json"]).unwrap();
        assert_eq!(level_filter(&cli), LevelFilter::Warn);
    }
}
