pub mod curve;
pub mod density;
