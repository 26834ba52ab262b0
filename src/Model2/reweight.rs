//! Heuristic re-weighting of rules from the consumption/production ratios of their species.
//!
//! Each rule gets the mean ratio of its reactants and the mean ratio of its products;
//! rules that consume over-consumed species and make under-consumed ones are boosted,
//! the reverse are damped. After the table, the sentinel (no-op) rule selected by
//! [`SentinelPolicy`] gets its weight reset.
use super::elements::{ElementUsage, ratio_of};
use super::rules::{Rule, RuleSet};
use crate::errors::{Model2Error, checked_ratio};
use crate::settings::{SentinelPolicy, SentinelSelector};
use log::{debug, info, warn};
use prettytable::{Table, row};
use std::fmt;

/// Branch of the weight decision table taken for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightAdjustment {
    Quadruple,
    Quarter,
    Double,
    Halve,
    /// no branch of the table matched
    Unchanged,
}

impl WeightAdjustment {
    /// First matching row of the table wins; ties and boundary cases fall through to `Unchanged`.
    pub fn decide(reactant_mean: f64, product_mean: f64) -> Self {
        let (r, p) = (reactant_mean, product_mean);
        if r > 1.0 && p <= 1.0 {
            WeightAdjustment::Quadruple
        } else if r <= 1.0 && p > 1.0 {
            WeightAdjustment::Quarter
        } else if r < 1.0 && p < 1.0 && r > p {
            WeightAdjustment::Double
        } else if r < 1.0 && p < 1.0 && r < p {
            WeightAdjustment::Halve
        } else if r > 1.0 && p > 1.0 && r > p {
            WeightAdjustment::Halve
        } else if r > 1.0 && p > 1.0 && r < p {
            WeightAdjustment::Double
        } else {
            WeightAdjustment::Unchanged
        }
    }

    pub fn apply(&self, weight: f64) -> f64 {
        match self {
            WeightAdjustment::Quadruple => weight * 4.0,
            WeightAdjustment::Quarter => weight / 4.0,
            WeightAdjustment::Double => weight * 2.0,
            WeightAdjustment::Halve => weight / 2.0,
            WeightAdjustment::Unchanged => weight,
        }
    }
}

impl fmt::Display for WeightAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeightAdjustment::Quadruple => "x4",
            WeightAdjustment::Quarter => "/4",
            WeightAdjustment::Double => "x2",
            WeightAdjustment::Halve => "/2",
            WeightAdjustment::Unchanged => "=",
        };
        write!(f, "{}", s)
    }
}

/// Mean element ratios of one rule and what the table did with its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleReweight {
    pub key: String,
    pub reactant_mean: f64,
    pub product_mean: f64,
    pub adjustment: WeightAdjustment,
    pub old_weight: f64,
    pub new_weight: f64,
    /// weight was overridden by the sentinel policy
    pub sentinel: bool,
}

/// reactant -> product edge of the interaction network
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub rule_key: String,
    pub source: String,
    pub target: String,
    /// weight text of the rule in the input model
    pub initial_weight: String,
    /// rule weight after the decision table
    pub updated_weight: f64,
    pub adjustment: WeightAdjustment,
}

impl Interaction {
    /// edge label of the annotation file
    pub fn label(&self) -> String {
        format!("{} (pp) {}", self.source, self.target)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReweightOutcome {
    pub reweights: Vec<RuleReweight>,
    pub interactions: Vec<Interaction>,
    /// key of the rule reset by the sentinel policy, if any matched
    pub sentinel_key: Option<String>,
}

impl ReweightOutcome {
    pub fn count(&self, adjustment: WeightAdjustment) -> usize {
        self.reweights
            .iter()
            .filter(|r| r.adjustment == adjustment)
            .count()
    }

    pub fn pretty_print(&self) {
        println!("__________RULE RE-WEIGHTING__________");
        let mut table = Table::new();
        table.add_row(row!["Rule", "Mean reac ratio", "Mean prod ratio", "Change", "Old", "New"]);
        for r in &self.reweights {
            let change = if r.sentinel {
                "reset".to_string()
            } else {
                r.adjustment.to_string()
            };
            table.add_row(row![
                r.key,
                format!("{:.3}", r.reactant_mean),
                format!("{:.3}", r.product_mean),
                change,
                r.old_weight,
                r.new_weight
            ]);
        }
        table.printstd();
    }
}

/// Mean of the stored element ratios over one side of a rule.
fn mean_ratio(rule: &Rule, species: &[String], usage: &[ElementUsage]) -> Result<f64, Model2Error> {
    let mut sum = 0.0;
    for s in species {
        sum += ratio_of(usage, s).ok_or_else(|| Model2Error::InconsistentElementSet {
            element: s.clone(),
            rule: rule.key.clone(),
        })?;
    }
    // a side without species has no mean
    Ok(checked_ratio(sum, species.len() as f64).unwrap_or(0.0))
}

/// Index of the rule selected by the sentinel policy.
pub fn find_sentinel(rule_set: &RuleSet, policy: &SentinelPolicy) -> Option<usize> {
    match &policy.selector {
        SentinelSelector::Disabled => None,
        SentinelSelector::Key { key } => rule_set.rules.iter().position(|r| &r.key == key),
        SentinelSelector::Expression { expression } => rule_set
            .rules
            .iter()
            .position(|r| r.matches_expression(expression)),
        SentinelSelector::LastRule => rule_set.rules.len().checked_sub(1),
    }
}

/// Re-weights every rule of `rule_set` in place and returns the per-rule record and the
/// interaction edges. Edges carry the table-adjusted weight, taken before the sentinel reset.
pub fn reweight_rules(
    rule_set: &mut RuleSet,
    usage: &[ElementUsage],
    policy: &SentinelPolicy,
) -> Result<ReweightOutcome, Model2Error> {
    let mut outcome = ReweightOutcome::default();
    for rule in rule_set.rules.iter_mut() {
        let reactant_mean = mean_ratio(rule, &rule.reactants, usage)?;
        let product_mean = mean_ratio(rule, &rule.products, usage)?;
        let adjustment = WeightAdjustment::decide(reactant_mean, product_mean);
        if adjustment == WeightAdjustment::Unchanged {
            debug!(
                "{}: no adjustment for ratios {:.3}/{:.3}",
                rule.key, reactant_mean, product_mean
            );
        }
        let old_weight = rule.weight;
        rule.weight = adjustment.apply(old_weight);

        for (source, target) in rule.interactions() {
            outcome.interactions.push(Interaction {
                rule_key: rule.key.clone(),
                source,
                target,
                initial_weight: rule.raw_weight.clone(),
                updated_weight: rule.weight,
                adjustment,
            });
        }
        outcome.reweights.push(RuleReweight {
            key: rule.key.clone(),
            reactant_mean,
            product_mean,
            adjustment,
            old_weight,
            new_weight: rule.weight,
            sentinel: false,
        });
    }

    match find_sentinel(rule_set, policy) {
        Some(idx) => {
            let rule = &mut rule_set.rules[idx];
            rule.weight = policy.reset_weight;
            outcome.reweights[idx].new_weight = policy.reset_weight;
            outcome.reweights[idx].sentinel = true;
            info!(
                "Sentinel rule {} ({}) reset to {}",
                rule.key, rule.expression, policy.reset_weight
            );
            outcome.sentinel_key = Some(rule.key.clone());
        }
        None => {
            if policy.selector != SentinelSelector::Disabled {
                warn!("No rule matches sentinel selector {:?}", policy.selector);
            }
        }
    }
    info!(
        "Re-weighted {} rules: {} x4, {} /4, {} x2, {} /2, {} unchanged",
        outcome.reweights.len(),
        outcome.count(WeightAdjustment::Quadruple),
        outcome.count(WeightAdjustment::Quarter),
        outcome.count(WeightAdjustment::Double),
        outcome.count(WeightAdjustment::Halve),
        outcome.count(WeightAdjustment::Unchanged),
    );
    Ok(outcome)
}
