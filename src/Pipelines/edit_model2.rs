//! # Re-weighting of a model2 file
//!
//! 1) rule table and interaction edges from the model2 file
//! 2) element list from the header of the presence table (poe)
//! 3) Nreac/Nprod annotation of every element -> annot_node.csv
//! 4) decision-table re-weighting and sentinel reset -> updated_modelfile.model2
//! 5) network and edge annotation -> cytoscape_network.sif, annot_edge.csv
use crate::Model2::elements::{
    ElementUsage, annotate_elements, pretty_print_element_usage, write_node_annotation,
};
use crate::Model2::model_writer::{write_edge_annotation, write_network, write_updated_model};
use crate::Model2::reweight::{ReweightOutcome, reweight_rules};
use crate::Model2::rules::RuleSet;
use crate::Simulation::tables::read_element_names;
use crate::errors::Model2Error;
use crate::settings::AnalysisConfig;
use log::info;
use std::path::PathBuf;

/// input files of the edit pipeline
#[derive(Debug, Clone)]
pub struct EditInputs {
    pub model_file: PathBuf,
    pub poe_file: PathBuf,
}

impl EditInputs {
    pub fn new(model_file: impl Into<PathBuf>, poe_file: impl Into<PathBuf>) -> Self {
        Self {
            model_file: model_file.into(),
            poe_file: poe_file.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditSummary {
    pub rule_set: RuleSet,
    pub element_usage: Vec<ElementUsage>,
    pub outcome: ReweightOutcome,
    pub written: Vec<PathBuf>,
}

impl EditSummary {
    pub fn unused_elements(&self) -> Vec<&str> {
        self.element_usage
            .iter()
            .filter(|u| u.is_unused())
            .map(|u| u.element.as_str())
            .collect()
    }

    pub fn pretty_print(&self) {
        println!("\n=== MODEL RE-WEIGHTING ===");
        pretty_print_element_usage(&self.element_usage);
        self.outcome.pretty_print();
        let unused = self.unused_elements();
        if !unused.is_empty() {
            println!("never used, can be removed: {}", unused.join(", "));
        }
        for path in &self.written {
            println!("written: {}", path.display());
        }
    }
}

/// Runs the edit pipeline and writes the updated model and the network files.
pub fn edit(inputs: &EditInputs, config: &AnalysisConfig) -> Result<EditSummary, Model2Error> {
    config.validate()?;
    let layout = config.layout();

    let mut rule_set = RuleSet::from_file(&inputs.model_file)?;
    rule_set.warn_if_empty();
    let elements = read_element_names(&inputs.poe_file)?;
    info!("{} elements in '{}'", elements.len(), inputs.poe_file.display());

    let element_usage = annotate_elements(&elements, &rule_set);
    write_node_annotation(&element_usage, &layout.node_annotation())?;

    let outcome = reweight_rules(&mut rule_set, &element_usage, &config.sentinel)?;
    write_updated_model(&rule_set, &layout.updated_model())?;
    write_network(&outcome.interactions, &layout.network())?;
    write_edge_annotation(&outcome.interactions, &layout.edge_annotation())?;

    Ok(EditSummary {
        rule_set,
        element_usage,
        outcome,
        written: vec![
            layout.node_annotation(),
            layout.updated_model(),
            layout.network(),
            layout.edge_annotation(),
        ],
    })
}
