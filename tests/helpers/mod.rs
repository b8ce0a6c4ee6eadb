pub mod data;
pub mod harness;
