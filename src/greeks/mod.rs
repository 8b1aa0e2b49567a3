pub mod aggregator;
pub mod sensitivity;
