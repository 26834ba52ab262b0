/// Loaders for the simulator's tab-delimited outputs: the element presence table (poe)
/// and the rule usage table (por).
pub mod tables;
/// Usage extractor and reporter: which rules varied during the simulation and how many
/// times each fired at every timestep.
/// # Examples
/// ```
/// use M2Tune::Simulation::usage::fires;
/// // 50% of 10 events
/// assert_eq!(fires(50.0, 10), 5);
/// ```
pub mod usage;
/// Feasibility computer and missing-element summarizer: elements absent at each timestep,
/// rules whose reactants are all present, and the annotation rows of the missing elements.
pub mod feasibility;
