use super::rules::RuleSet;
use crate::Utils::load_from_file::{create_output, ensure_exists};
use crate::errors::{Model2Error, checked_ratio};
use csv::StringRecord;
use log::{debug, info, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

pub const ANNOTATION_HEADER: [&str; 4] = ["Element", "Nreac", "Nprod", "Ratio"];

/// Node annotation row: how often an element is consumed and produced by the rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementUsage {
    #[serde(rename = "Element")]
    pub element: String,
    #[serde(rename = "Nreac")]
    pub n_reac: usize,
    #[serde(rename = "Nprod")]
    pub n_prod: usize,
    #[serde(
        rename = "Ratio",
        serialize_with = "serialize_ratio",
        deserialize_with = "deserialize_ratio"
    )]
    pub ratio: f64,
}

/// defined ratios are written with 3 decimals, undefined ones as a bare 0
fn serialize_ratio<S: Serializer>(ratio: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *ratio == 0.0 {
        serializer.serialize_str("0")
    } else {
        serializer.serialize_str(&format!("{:.3}", ratio))
    }
}

fn deserialize_ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<f64>().map_err(serde::de::Error::custom)
}

/// 3-decimal value as written in the annotation file; exact ties go to the even digit
fn round3(x: f64) -> f64 {
    format!("{:.3}", x).parse().unwrap_or(x)
}

impl ElementUsage {
    pub fn new(element: &str, n_reac: usize, n_prod: usize) -> Self {
        let ratio = checked_ratio(n_reac as f64, n_prod as f64)
            .map(round3)
            .unwrap_or(0.0);
        Self {
            element: element.to_string(),
            n_reac,
            n_prod,
            ratio,
        }
    }

    /// Positional decoding of one `Element,Nreac,Nprod,Ratio` row.
    pub fn from_record(record: &StringRecord, path: &Path) -> Result<Self, Model2Error> {
        record
            .deserialize(None)
            .map_err(|e| Model2Error::csv(path, e))
    }

    /// element never appears in any rule
    pub fn is_unused(&self) -> bool {
        self.n_reac == 0 && self.n_prod == 0
    }
}

/// Counts reactant/product occurrences of each element over the whole rule set.
pub fn annotate_elements(elements: &[String], rule_set: &RuleSet) -> Vec<ElementUsage> {
    let reactants = rule_set.all_reactants();
    let products = rule_set.all_products();
    let usage: Vec<ElementUsage> = elements
        .iter()
        .map(|elt| {
            let n_reac = reactants.iter().filter(|r| **r == elt.as_str()).count();
            let n_prod = products.iter().filter(|p| **p == elt.as_str()).count();
            ElementUsage::new(elt, n_reac, n_prod)
        })
        .collect();
    for unused in usage.iter().filter(|u| u.is_unused()) {
        warn!(
            "{} is never used in the simulation and can be removed",
            unused.element
        );
    }
    usage
}

/// Looks up the stored ratio of an element.
pub fn ratio_of(usage: &[ElementUsage], element: &str) -> Option<f64> {
    usage.iter().find(|u| u.element == element).map(|u| u.ratio)
}

/// Writes the node annotation table (`Element,Nreac,Nprod,Ratio`).
pub fn write_node_annotation(usage: &[ElementUsage], path: &Path) -> Result<(), Model2Error> {
    let mut writer = csv::Writer::from_writer(create_output(path)?);
    for row in usage {
        writer.serialize(row).map_err(|e| Model2Error::csv(path, e))?;
    }
    writer.flush().map_err(|e| Model2Error::io(path, e))?;
    info!("Wrote {} element annotations to '{}'", usage.len(), path.display());
    Ok(())
}

/// Data rows of a node annotation file, in file order. A first row equal to
/// [`ANNOTATION_HEADER`] is skipped; headerless files are read from their first line.
pub fn read_node_annotation_records(path: &Path) -> Result<Vec<StringRecord>, Model2Error> {
    ensure_exists(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Model2Error::csv(path, e))?;
    let mut records = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Model2Error::csv(path, e))?;
        if i == 0 && record.iter().eq(ANNOTATION_HEADER) {
            continue;
        }
        records.push(record);
    }
    debug!("{} annotation rows in '{}'", records.len(), path.display());
    Ok(records)
}

/// Reads every row of a node annotation file.
pub fn read_node_annotation(path: &Path) -> Result<Vec<ElementUsage>, Model2Error> {
    read_node_annotation_records(path)?
        .iter()
        .map(|record| ElementUsage::from_record(record, path))
        .collect()
}

/// Prints the element usage table to the console.
pub fn pretty_print_element_usage(usage: &[ElementUsage]) {
    println!("__________ELEMENT USAGE__________");
    let mut table = Table::new();
    table.add_row(row!["Element", "Nreac", "Nprod", "Ratio", "Used"]);
    for u in usage {
        let used = if u.is_unused() { "no" } else { "yes" };
        table.add_row(row![u.element, u.n_reac, u.n_prod, format!("{:.3}", u.ratio), used]);
    }
    table.printstd();
}
