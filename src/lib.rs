pub mod compaction;
pub mod constants;
pub mod error;
pub mod expulsion;
pub mod heat_solver;
pub mod kinetics;
pub mod lithology;
pub mod maturity;
pub mod optimizer;
pub mod phase;
pub mod progress;
pub mod sim;
pub mod stratigraphy;
