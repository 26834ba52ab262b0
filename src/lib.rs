#[allow(non_snake_case)]
pub mod Model2;
#[allow(non_snake_case)]
pub mod Pipelines;
#[allow(non_snake_case)]
pub mod Simulation;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod errors;
pub mod settings;
