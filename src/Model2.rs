/// Rule table builder for model2 files: sequential rule keys, reaction expression split
/// into reactants and products, weight, and the verbatim trailer after `--INITIAL`.
/// # Examples
/// ```
/// use M2Tune::Model2::rules::RuleSet;
/// let lines = vec!["% toy", "A + B => C\t1.0", "C => A + B\t0.5", "--INITIAL", "A\t100"];
/// let rule_set = RuleSet::from_lines(&lines).unwrap();
/// assert_eq!(rule_set.len(), 2);
/// assert_eq!(rule_set.rules[1].key, "R1");
/// assert_eq!(rule_set.rules[1].products, vec!["A", "B"]);
/// ```
pub mod rules;
/// Element usage annotator: Nreac, Nprod and Nreac/Nprod ratio of every element,
/// node annotation file reading and writing.
pub mod elements;
/// Rule re-weighting engine: decision table on mean reactant/product ratios,
/// sentinel rule reset, interaction edges.
pub mod reweight;
mod reweight_tests;
/// writers for the updated model2 file, the Cytoscape network and the edge annotation
pub mod model_writer;
