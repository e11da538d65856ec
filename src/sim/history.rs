// src/sim/history.rs - Per-run time-series bundle handed back to the caller

use serde::{Deserialize, Serialize};

use crate::kinetics::KerogenType;
use crate::lithology::LithologyType;
use crate::phase::FluidPhase;

/// One layer's state at one simulation time step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerStepRecord {
    pub time_ma: f64,
    pub top_m: f64,
    pub bottom_m: f64,
    pub thickness_m: f64,
    pub porosity_avg: f64,
    pub temperature_c: f64,
    pub ro: f64,
    pub transformation_ratio: f64,
    /// Hydrocarbon mass generated this step per unit area, per Ma
    pub generation_rate_kg_m2_ma: f64,
    /// Cumulative expelled mass per unit area
    pub expelled_kg_m2: f64,
    pub phase: FluidPhase,
}

/// Append-only record stream for one layer, oldest step first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerHistory {
    pub layer_id: String,
    pub records: Vec<LayerStepRecord>,
}

/// Display metadata for one layer, echoed back with the results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerMeta {
    pub id: String,
    pub name: String,
    pub lithology: LithologyType,
    pub age_start_ma: f64,
    pub present_thickness_m: f64,
    pub is_source: bool,
    pub kerogen: KerogenType,
}

/// Everything one successful run produces. JSON-serializable; the caller owns
/// persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Layers oldest-first, matching the order of `history`
    pub layers: Vec<LayerMeta>,
    pub history: Vec<LayerHistory>,
    pub max_depth_m: f64,
}

impl RunResult {
    fn final_profile(&self, value: impl Fn(&LayerStepRecord) -> f64) -> Vec<(f64, f64)> {
        let mut profile: Vec<(f64, f64)> = self
            .history
            .iter()
            .filter_map(|layer| layer.records.last())
            .map(|record| (0.5 * (record.top_m + record.bottom_m), value(record)))
            .collect();
        profile.sort_by(|a, b| a.0.total_cmp(&b.0));
        profile
    }

    /// Linear interpolation over a (depth, value) profile, clamped to the
    /// endpoint values outside the sampled range.
    fn interpolate(profile: &[(f64, f64)], depth_m: f64) -> Option<f64> {
        let first = profile.first()?;
        if depth_m <= first.0 {
            return Some(first.1);
        }
        let last = profile.last()?;
        if depth_m >= last.0 {
            return Some(last.1);
        }
        for pair in profile.windows(2) {
            let (z0, v0) = pair[0];
            let (z1, v1) = pair[1];
            if depth_m >= z0 && depth_m <= z1 {
                let ratio = if z1 > z0 { (depth_m - z0) / (z1 - z0) } else { 0.5 };
                return Some(v0 + ratio * (v1 - v0));
            }
        }
        None
    }

    /// Final-step (present-day) Ro at a depth, interpolated between layer
    /// centers. None when the run produced no records.
    pub fn ro_at_depth(&self, depth_m: f64) -> Option<f64> {
        Self::interpolate(&self.final_profile(|r| r.ro), depth_m)
    }

    /// Final-step temperature (°C) at a depth.
    pub fn temperature_at_depth(&self, depth_m: f64) -> Option<f64> {
        Self::interpolate(&self.final_profile(|r| r.temperature_c), depth_m)
    }
}
