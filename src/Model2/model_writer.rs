use super::reweight::{Interaction, WeightAdjustment};
use super::rules::RuleSet;
use crate::Utils::load_from_file::create_output;
use crate::errors::Model2Error;
use log::info;
use std::io::Write;
use std::path::Path;

/// Shortest text that parses back to the same weight ("4.0", "0.001", "0.375").
pub fn format_weight(weight: f64) -> String {
    format!("{:?}", weight)
}

/// Writes the model with the current rule weights followed by the trailer of the input model.
pub fn write_updated_model(rule_set: &RuleSet, path: &Path) -> Result<(), Model2Error> {
    let mut out = create_output(path)?;
    let io_err = |e| Model2Error::io(path, e);
    for rule in &rule_set.rules {
        writeln!(out, "{}\t{}", rule.expression, format_weight(rule.weight)).map_err(io_err)?;
    }
    for line in &rule_set.trailer {
        writeln!(out, "{}", line).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    info!(
        "Wrote updated model with {} rules to '{}'",
        rule_set.len(),
        path.display()
    );
    Ok(())
}

/// Writes the interaction network in Cytoscape SIF form, one `<source> pp <target>` per edge.
pub fn write_network(interactions: &[Interaction], path: &Path) -> Result<(), Model2Error> {
    let mut out = create_output(path)?;
    let io_err = |e| Model2Error::io(path, e);
    for edge in interactions {
        writeln!(out, "{} pp {}", edge.source, edge.target).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    info!("Wrote {} network edges to '{}'", interactions.len(), path.display());
    Ok(())
}

/// Score of an edge after re-weighting. Untouched rules keep their weight text as read.
pub fn score_changed(edge: &Interaction) -> String {
    match edge.adjustment {
        WeightAdjustment::Unchanged => edge.initial_weight.clone(),
        _ => format_weight(edge.updated_weight),
    }
}

/// Writes the tab-separated edge annotation table `Edge, Score_init, Score_changed`.
pub fn write_edge_annotation(interactions: &[Interaction], path: &Path) -> Result<(), Model2Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(create_output(path)?);
    let csv_err = |e| Model2Error::csv(path, e);
    writer
        .write_record(["Edge", "Score_init", "Score_changed"])
        .map_err(csv_err)?;
    for edge in interactions {
        writer
            .write_record([
                edge.label(),
                edge.initial_weight.clone(),
                score_changed(edge),
            ])
            .map_err(csv_err)?;
    }
    writer.flush().map_err(|e| Model2Error::io(path, e))?;
    Ok(())
}
