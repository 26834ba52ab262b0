/// analyze: which rules fired, which reactants went missing, annotation rows of the missing ones
pub mod analyze_model2;
/// edit: element annotation, rule re-weighting, updated model2 and network files
pub mod edit_model2;
mod pipeline_tests;
