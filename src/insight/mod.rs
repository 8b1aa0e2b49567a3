pub mod generator;
pub mod rules;
