//! # Analysis of a finished simulation
//!
//! Ties the model2 rules to the simulator outputs:
//! 1) rule table from the model2 file
//! 2) rules whose usage varied (por) and how often each fired per timestep
//! 3) elements missing at each timestep (poe) and the rules still possible
//! 4) node annotation rows of the elements missing in the reported timesteps
//!
//! ## Usage
//! ```rust, ignore
//! let inputs = AnalyzeInputs::new("model.model2", "run.poe", "run.por", "results/annot_node.csv");
//! let summary = analyze(&inputs, &AnalysisConfig::default())?;
//! summary.pretty_print();
//! ```
use crate::Model2::elements::{ElementUsage, pretty_print_element_usage};
use crate::Model2::rules::RuleSet;
use crate::Simulation::feasibility::{
    FeasibilityReport, sim_possible_rules, summary_missing_elements, write_lost_reactives,
    write_possible_rules,
};
use crate::Simulation::tables::{PresenceTable, UsageTable};
use crate::Simulation::usage::{
    TimestepUsage, UsedRule, find_used_rules, rules_in_timesteps, write_rules_applied,
};
use crate::errors::Model2Error;
use crate::settings::AnalysisConfig;
use log::info;
use prettytable::{Table, row};
use std::path::PathBuf;

/// input files of the analyze pipeline
#[derive(Debug, Clone)]
pub struct AnalyzeInputs {
    pub model_file: PathBuf,
    pub poe_file: PathBuf,
    pub por_file: PathBuf,
    pub node_annotation: PathBuf,
}

impl AnalyzeInputs {
    pub fn new(
        model_file: impl Into<PathBuf>,
        poe_file: impl Into<PathBuf>,
        por_file: impl Into<PathBuf>,
        node_annotation: impl Into<PathBuf>,
    ) -> Self {
        Self {
            model_file: model_file.into(),
            poe_file: poe_file.into(),
            por_file: por_file.into(),
            node_annotation: node_annotation.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub rule_count: usize,
    pub used_rules: Vec<UsedRule>,
    pub usage_report: Vec<TimestepUsage>,
    pub feasibility: FeasibilityReport,
    /// elements missing in the timesteps selected by the report scope
    pub missing_elements: Vec<String>,
    pub missing_summary: Vec<ElementUsage>,
    pub written: Vec<PathBuf>,
}

impl AnalysisSummary {
    pub fn pretty_print(&self) {
        println!("\n=== SIMULATION ANALYSIS ===");
        let mut table = Table::new();
        table.add_row(row!["Quantity", "Value"]);
        table.add_row(row!["Rules in model", self.rule_count]);
        table.add_row(row!["Rules with varying usage", self.used_rules.len()]);
        table.add_row(row!["Timesteps", self.feasibility.timesteps.len()]);
        table.add_row(row!["Missing elements reported", self.missing_elements.len()]);
        table.printstd();
        self.feasibility.pretty_print();
        if !self.missing_summary.is_empty() {
            pretty_print_element_usage(&self.missing_summary);
        }
        for path in &self.written {
            println!("written: {}", path.display());
        }
    }
}

/// Runs the analyze pipeline and writes its four report files under the output directory.
pub fn analyze(
    inputs: &AnalyzeInputs,
    config: &AnalysisConfig,
) -> Result<AnalysisSummary, Model2Error> {
    config.validate()?;
    let layout = config.layout();

    let rule_set = RuleSet::from_file(&inputs.model_file)?;
    rule_set.warn_if_empty();

    let usage_table = UsageTable::from_file(&inputs.por_file)?;
    let used_rules = find_used_rules(&usage_table);
    let usage_report = rules_in_timesteps(&used_rules, &usage_table.events);
    write_rules_applied(&usage_report, &layout.rules_applied(), config.wrap_width)?;

    let presence = PresenceTable::from_file(&inputs.poe_file)?;
    let feasibility = sim_possible_rules(&rule_set, &presence);
    write_lost_reactives(&feasibility, &layout.lost_reactives())?;
    write_possible_rules(&feasibility, &layout.possible_rules(), config.wrap_width)?;

    let missing_elements = feasibility.missing_in_scope(config.report_scope, &presence.elements);
    info!(
        "{} elements missing in scope '{}'",
        missing_elements.len(),
        config.report_scope
    );
    let missing_summary = summary_missing_elements(
        &missing_elements,
        &inputs.node_annotation,
        &layout.missing_elements_summary(),
    )?;

    Ok(AnalysisSummary {
        rule_count: rule_set.len(),
        used_rules,
        usage_report,
        feasibility,
        missing_elements,
        missing_summary,
        written: vec![
            layout.rules_applied(),
            layout.lost_reactives(),
            layout.possible_rules(),
            layout.missing_elements_summary(),
        ],
    })
}
