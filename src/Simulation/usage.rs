use super::tables::{TimestepEvents, UsageTable};
use crate::Utils::load_from_file::create_output;
use crate::Utils::text_report::fill;
use crate::errors::Model2Error;
use log::{debug, info};
use std::io::Write;
use std::path::Path;

/// rule whose usage varied during the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct UsedRule {
    pub name: String,
    /// usage percentage at every timestep
    pub usage: Vec<f64>,
}

/// A rule column is constant when every timestep reports 0% or every timestep reports 100%.
pub fn is_constant_usage(values: &[f64]) -> bool {
    values.iter().all(|v| *v == 0.0) || values.iter().all(|v| *v == 100.0)
}

/// Rules whose usage percentage varied across timesteps, in column order.
pub fn find_used_rules(table: &UsageTable) -> Vec<UsedRule> {
    let used: Vec<UsedRule> = table
        .rule_names
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let usage = table.column(i);
            if is_constant_usage(&usage) {
                debug!("rule {} has constant usage, skipped", name);
                None
            } else {
                Some(UsedRule {
                    name: name.clone(),
                    usage,
                })
            }
        })
        .collect();
    info!(
        "{} of {} rules varied during the simulation",
        used.len(),
        table.rule_names.len()
    );
    used
}

/// Times a rule fired: the product is rounded half-to-even, then divided by 100 and truncated.
pub fn fires(usage_percentage: f64, event_count: u64) -> u64 {
    let scaled = (usage_percentage * event_count as f64).round_ties_even() / 100.0;
    scaled.trunc() as u64
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleFiring {
    pub rule: String,
    pub fires: u64,
}

/// rules fired at one timestep
#[derive(Debug, Clone, PartialEq)]
pub struct TimestepUsage {
    pub label: String,
    pub firings: Vec<RuleFiring>,
}

impl TimestepUsage {
    /// human-readable summary line of the timestep
    pub fn sentence(&self) -> String {
        if self.firings.is_empty() {
            return format!("At {}, no rule has been used", self.label);
        }
        let names: Vec<&str> = self.firings.iter().map(|f| f.rule.as_str()).collect();
        let counts: Vec<String> = self.firings.iter().map(|f| f.fires.to_string()).collect();
        format!(
            "At {}, the rule(s) {} has or have been used {} times respectively",
            self.label,
            names.join(", "),
            counts.join(", ")
        )
    }
}

/// Fire counts of every used rule with nonzero usage, per timestep.
pub fn rules_in_timesteps(used: &[UsedRule], events: &[TimestepEvents]) -> Vec<TimestepUsage> {
    events
        .iter()
        .enumerate()
        .map(|(step, ts)| TimestepUsage {
            label: ts.label.clone(),
            firings: used
                .iter()
                .filter(|rule| rule.usage[step] != 0.0)
                .map(|rule| RuleFiring {
                    rule: rule.name.clone(),
                    fires: fires(rule.usage[step], ts.events),
                })
                .collect(),
        })
        .collect()
}

/// Writes one wrapped summary paragraph per timestep.
pub fn write_rules_applied(
    report: &[TimestepUsage],
    path: &Path,
    wrap_width: usize,
) -> Result<(), Model2Error> {
    let mut out = create_output(path)?;
    let io_err = |e| Model2Error::io(path, e);
    for ts in report {
        writeln!(out, "{}", fill(&ts.sentence(), wrap_width)).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    info!("Wrote rule usage of {} timesteps to '{}'", report.len(), path.display());
    Ok(())
}
