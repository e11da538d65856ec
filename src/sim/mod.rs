pub mod history;
pub mod simulation;

pub use history::{LayerHistory, LayerMeta, LayerStepRecord, RunResult};
pub use simulation::{SimProps, Simulation};
