use crate::Utils::load_from_file::read_lines;
use crate::errors::Model2Error;
use log::{debug, info, warn};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// line that ends the rule section of a model2 file
pub const SENTINEL_LINE: &str = "--INITIAL";
pub const COMMENT_PREFIX: char = '%';
pub const ARROW: &str = "=>";

static SPECIES_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s*)\+(\s*)").expect("species separator pattern is valid"));

/// Splits one side of a reaction expression ("A + B+C") into trimmed species names.
/// A `+` glued to the end of a name ("NAD+", "Ca2+") is a charge, not a separator.
pub fn split_species(side: &str) -> Vec<String> {
    let side = side.trim();
    let mut species = Vec::new();
    let mut start = 0;
    for caps in SPECIES_SEPARATOR.captures_iter(side) {
        let (Some(m), Some(before), Some(after)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let glued = before.as_str().is_empty()
            && side[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| !c.is_whitespace())
            && (!after.as_str().is_empty() || m.end() == side.len());
        if glued {
            continue;
        }
        species.push(&side[start..m.start()]);
        start = m.end();
    }
    species.push(&side[start..]);
    species
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a reaction expression into (reactants, products). `None` if it has no arrow.
pub fn split_expression(expression: &str) -> Option<(Vec<String>, Vec<String>)> {
    let (lhs, rhs) = expression.split_once(ARROW)?;
    Some((split_species(lhs), split_species(rhs)))
}

/// one rule of a model2 file
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// generated key: "R" + ordinal in file order
    pub key: String,
    /// reaction expression exactly as written before the tab
    pub expression: String,
    pub reactants: Vec<String>,
    pub products: Vec<String>,
    /// weight text as found in the file
    pub raw_weight: String,
    pub weight: f64,
}

impl Rule {
    /// Parses a rule line of the form `<reactants> => <products>\t<weight>`.
    pub fn parse(index: usize, line_no: usize, line: &str) -> Result<Self, Model2Error> {
        let malformed = |reason: &str| Model2Error::MalformedRuleLine {
            line_no,
            line: line.to_string(),
            reason: reason.to_string(),
        };
        let mut fields = line.trim_end().split('\t');
        let expression = fields.next().unwrap_or_default();
        let raw_weight = fields
            .next()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .ok_or_else(|| malformed("no tab-separated weight"))?;
        let extra = fields.count();
        if extra > 0 {
            debug!("line {}: ignoring {} extra field(s)", line_no, extra);
        }
        let weight: f64 = raw_weight
            .parse()
            .map_err(|_| malformed("weight is not a number"))?;
        let (reactants, products) =
            split_expression(expression).ok_or_else(|| malformed("no '=>' in expression"))?;

        Ok(Rule {
            key: format!("R{}", index),
            expression: expression.to_string(),
            reactants,
            products,
            raw_weight: raw_weight.to_string(),
            weight,
        })
    }

    /// true if the rule has the same reactants and products as `expression`
    pub fn matches_expression(&self, expression: &str) -> bool {
        match split_expression(expression) {
            Some((reactants, products)) => reactants == self.reactants && products == self.products,
            None => false,
        }
    }

    /// reactant x product pairs of the rule, in rule order
    pub fn interactions(&self) -> Vec<(String, String)> {
        self.reactants
            .iter()
            .flat_map(|r| self.products.iter().map(move |p| (r.clone(), p.clone())))
            .collect()
    }
}

/// rules of a model2 file plus everything from the sentinel line onward
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    /// sentinel line and the lines after it, verbatim
    pub trailer: Vec<String>,
}

impl RuleSet {
    pub fn from_file(model_file: &Path) -> Result<Self, Model2Error> {
        let lines = read_lines(model_file)?;
        let rule_set = Self::from_lines(&lines).map_err(|e| match e {
            Model2Error::MissingSentinel { sentinel, .. } => Model2Error::MissingSentinel {
                path: model_file.to_path_buf(),
                sentinel,
            },
            other => other,
        })?;
        info!(
            "Parsed {} rules from '{}'",
            rule_set.rules.len(),
            model_file.display()
        );
        Ok(rule_set)
    }

    /// Builds the rule table from model2 lines. Parsing stops at the sentinel line;
    /// comment and blank lines are skipped and do not consume a rule key.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, Model2Error> {
        let mut rules = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if line.trim_end() == SENTINEL_LINE {
                let trailer = lines[i..]
                    .iter()
                    .map(|l| l.as_ref().trim_end().to_string())
                    .collect();
                return Ok(RuleSet { rules, trailer });
            }
            if line.starts_with(COMMENT_PREFIX) || line.trim().is_empty() {
                continue;
            }
            rules.push(Rule::parse(rules.len(), i + 1, line)?);
        }
        Err(Model2Error::MissingSentinel {
            path: Default::default(),
            sentinel: SENTINEL_LINE.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.key == key)
    }

    /// every reactant occurrence across the rule set, in rule order
    pub fn all_reactants(&self) -> Vec<&str> {
        self.rules
            .iter()
            .flat_map(|r| r.reactants.iter().map(String::as_str))
            .collect()
    }

    /// every product occurrence across the rule set, in rule order
    pub fn all_products(&self) -> Vec<&str> {
        self.rules
            .iter()
            .flat_map(|r| r.products.iter().map(String::as_str))
            .collect()
    }

    /// Rules whose reactants are all contained in `present`.
    pub fn possible_rules<'a>(&'a self, present: &[&str]) -> Vec<&'a Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.reactants.iter().all(|r| present.contains(&r.as_str())))
            .collect()
    }

    pub fn warn_if_empty(&self) {
        if self.rules.is_empty() {
            warn!("model contains no rules before '{}'", SENTINEL_LINE);
        }
    }
}
