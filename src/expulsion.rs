// src/expulsion.rs - Threshold bucket model for primary expulsion
//
// A source rock retains generated hydrocarbons in its pore space until the
// pore saturation passes a retention threshold; everything above the
// threshold-equivalent mass is expelled. Mass balance is exact by
// construction: expelled + retained == existing + generated on every call.

use serde::{Deserialize, Serialize};

/// Result of one expulsion evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Expelled {
    pub expelled_kg: f64,
    pub retained_kg: f64,
    /// Pore saturation before expulsion, clamped to [0,1] for reporting
    pub saturation: f64,
}

/// Per-layer expulsion bookkeeping, created at deposition for source layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpulsionState {
    pub generated_kg: f64,
    pub expelled_kg: f64,
    pub retained_kg: f64,
    pub saturation: f64,
}

/// Split (existing + generated) mass into retained and expelled parts by
/// comparing the implied pore saturation against `threshold_saturation`.
pub fn calculate_expulsion(
    generated_kg: f64,
    existing_kg: f64,
    porosity: f64,
    bulk_volume_m3: f64,
    hc_density_kg_m3: f64,
    threshold_saturation: f64,
) -> Expelled {
    let total_kg = existing_kg + generated_kg;
    let pore_volume_m3 = porosity * bulk_volume_m3;

    if pore_volume_m3 <= 0.0 || hc_density_kg_m3 <= 0.0 {
        // no pore space to hold anything: everything leaves
        return Expelled { expelled_kg: total_kg, retained_kg: 0.0, saturation: 1.0 };
    }

    let hc_volume_m3 = total_kg / hc_density_kg_m3;
    let saturation = hc_volume_m3 / pore_volume_m3;

    if saturation > threshold_saturation {
        let retained_kg = threshold_saturation * pore_volume_m3 * hc_density_kg_m3;
        Expelled {
            expelled_kg: total_kg - retained_kg,
            retained_kg,
            saturation: saturation.min(1.0),
        }
    } else {
        Expelled { expelled_kg: 0.0, retained_kg: total_kg, saturation: saturation.max(0.0) }
    }
}

impl ExpulsionState {
    /// Fold one step's generated mass into the cumulative accounts.
    pub fn absorb(
        &mut self,
        generated_kg: f64,
        porosity: f64,
        bulk_volume_m3: f64,
        hc_density_kg_m3: f64,
        threshold_saturation: f64,
    ) -> Expelled {
        let split = calculate_expulsion(
            generated_kg,
            self.retained_kg,
            porosity,
            bulk_volume_m3,
            hc_density_kg_m3,
            threshold_saturation,
        );
        self.generated_kg += generated_kg;
        self.expelled_kg += split.expelled_kg;
        self.retained_kg = split.retained_kg;
        self.saturation = split.saturation;
        split
    }

    /// Accrue generated mass without invoking the bucket split, used before
    /// the maturity onset, when nothing is allowed to leave. Keeps the
    /// generated == expelled + retained invariant intact.
    pub fn retain(&mut self, generated_kg: f64) {
        self.generated_kg += generated_kg;
        self.retained_kg += generated_kg;
    }
}
