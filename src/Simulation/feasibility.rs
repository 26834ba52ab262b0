use super::tables::PresenceTable;
use crate::Model2::elements::{ANNOTATION_HEADER, ElementUsage, read_node_annotation_records};
use crate::Model2::rules::RuleSet;
use crate::Utils::load_from_file::create_output;
use crate::Utils::text_report::fill;
use crate::errors::Model2Error;
use crate::settings::ReportScope;
use log::{info, warn};
use prettytable::{Table, row};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

/// missing elements and possible rules at one timestep
#[derive(Debug, Clone, PartialEq)]
pub struct TimestepFeasibility {
    pub label: String,
    /// elements with zero presence, in header order
    pub missing: Vec<String>,
    /// keys of the rules whose reactants are all present
    pub possible_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeasibilityReport {
    pub timesteps: Vec<TimestepFeasibility>,
}

impl FeasibilityReport {
    /// Union of the missing elements of the timesteps covered by `scope`, in header order.
    pub fn missing_in_scope(&self, scope: ReportScope, elements: &[String]) -> Vec<String> {
        let selected: HashSet<&str> = self.timesteps[scope.range(self.timesteps.len())]
            .iter()
            .flat_map(|ts| ts.missing.iter().map(String::as_str))
            .collect();
        elements
            .iter()
            .filter(|e| selected.contains(e.as_str()))
            .cloned()
            .collect()
    }

    pub fn pretty_print(&self) {
        println!("__________FEASIBILITY PER TIMESTEP__________");
        let mut table = Table::new();
        table.add_row(row!["Timestep", "Missing elements", "Possible rules"]);
        for ts in &self.timesteps {
            table.add_row(row![ts.label, ts.missing.len(), ts.possible_rules.len()]);
        }
        table.printstd();
    }
}

/// Partitions elements into present and missing at every timestep and lists the rules
/// whose reactants are all present.
pub fn sim_possible_rules(rule_set: &RuleSet, presence: &PresenceTable) -> FeasibilityReport {
    let known: HashSet<&str> = presence.elements.iter().map(String::as_str).collect();
    let mut unknown: Vec<&str> = rule_set
        .all_reactants()
        .into_iter()
        .filter(|r| !known.contains(r))
        .collect();
    unknown.sort_unstable();
    unknown.dedup();
    for reactant in unknown {
        warn!(
            "reactant '{}' is not a column of the presence table; rules using it are never possible",
            reactant
        );
    }

    let timesteps = presence
        .timesteps
        .iter()
        .map(|row| {
            let mut present: Vec<&str> = Vec::new();
            let mut missing: Vec<String> = Vec::new();
            for (element, value) in presence.elements.iter().zip(&row.values) {
                if *value != 0.0 {
                    present.push(element);
                } else {
                    missing.push(element.clone());
                }
            }
            let possible_rules = rule_set
                .possible_rules(&present)
                .into_iter()
                .map(|r| r.key.clone())
                .collect();
            TimestepFeasibility {
                label: row.label.clone(),
                missing,
                possible_rules,
            }
        })
        .collect();
    FeasibilityReport { timesteps }
}

/// Writes `lost_reactives.txt`: the missing elements of every timestep.
pub fn write_lost_reactives(report: &FeasibilityReport, path: &Path) -> Result<(), Model2Error> {
    let mut out = create_output(path)?;
    let io_err = |e| Model2Error::io(path, e);
    for ts in &report.timesteps {
        writeln!(out, "Timestep : {}, missing elements : ", ts.label).map_err(io_err)?;
        writeln!(out, "{:?}", ts.missing).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    info!("Wrote missing elements to '{}'", path.display());
    Ok(())
}

/// Writes `possible_rules.txt`: the possible rule keys of every timestep, wrapped.
pub fn write_possible_rules(
    report: &FeasibilityReport,
    path: &Path,
    wrap_width: usize,
) -> Result<(), Model2Error> {
    let mut out = create_output(path)?;
    let io_err = |e| Model2Error::io(path, e);
    for ts in &report.timesteps {
        writeln!(out, "Timestep : {}", ts.label).map_err(io_err)?;
        let keys = format!("{:?}", ts.possible_rules);
        writeln!(out, "{}", fill(&keys, wrap_width)).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    info!("Wrote possible rules to '{}'", path.display());
    Ok(())
}

/// Filters the node annotation file down to the rows of the missing elements and writes
/// them verbatim, in annotation order, under the annotation header.
pub fn summary_missing_elements(
    missing: &[String],
    annotation_file: &Path,
    output: &Path,
) -> Result<Vec<ElementUsage>, Model2Error> {
    let records = read_node_annotation_records(annotation_file)?;

    let mut writer = csv::Writer::from_writer(create_output(output)?);
    writer
        .write_record(ANNOTATION_HEADER)
        .map_err(|e| Model2Error::csv(output, e))?;

    let mut matched = Vec::new();
    for record in &records {
        let Some(element) = record.get(0) else {
            continue;
        };
        if !missing.iter().any(|m| m == element) {
            continue;
        }
        let usage = ElementUsage::from_record(record, annotation_file)?;
        writer
            .write_record(record)
            .map_err(|e| Model2Error::csv(output, e))?;
        matched.push(usage);
    }
    writer.flush().map_err(|e| Model2Error::io(output, e))?;
    info!(
        "{} of {} missing elements found in '{}'",
        matched.len(),
        missing.len(),
        annotation_file.display()
    );
    Ok(matched)
}
