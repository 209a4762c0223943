// Application layer: wires configuration, adapters and the calculator together.

pub mod runner;

pub use runner::{build_calculator, run, RunSummary};
