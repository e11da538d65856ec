// src/maturity.rs - Kerogen transformation and thermal maturity per layer
//
// Two maturity signals advance side by side every step:
//  - transformation ratio (TR) from the 20-bin Arrhenius decay of the
//    kerogen's reaction potential, and
//  - vitrinite reflectance (Ro) from the classical time-temperature index.
// Ro is TTI-derived, not TR-derived; the two can diverge and are reported
// separately. Both are irreversible: TR and Ro never decrease.

use serde::{Deserialize, Serialize};

use crate::constants::{
    FREQUENCY_FACTOR_PER_S, GAS_CONSTANT_KCAL, RO_INITIAL, RO_MAX, SECONDS_PER_MA,
    kelvin_to_celsius,
};
use crate::kinetics::{KINETIC_BINS, KerogenKinetics, KerogenType, kinetics_for};

/// Waples-style Ro-from-TTI correlation, Ro = slope·log10(TTI) + intercept,
/// fit through (TTI 15, Ro 0.65) and (TTI 160, Ro 1.3)
mod tti_correlation {
    pub const LOG10_SLOPE: f64 = 0.6321;
    pub const INTERCEPT: f64 = -0.0934;
    /// TTI doubles every 10 °C above this reference temperature
    pub const REFERENCE_TEMP_C: f64 = 100.0;
    pub const DOUBLING_INTERVAL_C: f64 = 10.0;
}

/// Continuous maturation state of one layer, created at deposition and
/// advanced every step thereafter. Never reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityState {
    /// Unreacted potential per activation-energy bin; each entry only decays
    pub fractions_remaining: Vec<f64>,
    /// 1 − Σremaining/Σinitial, in [0,1], non-decreasing
    pub transformation_ratio: f64,
    /// Vitrinite reflectance equivalent (%Ro), non-decreasing from 0.2
    pub ro: f64,
    /// Cumulative time-temperature index
    pub tti: f64,
}

impl MaturityState {
    pub fn new(kerogen: KerogenType) -> Self {
        let kinetics = kinetics_for(kerogen);
        MaturityState {
            fractions_remaining: kinetics.potentials.to_vec(),
            transformation_ratio: 0.0,
            ro: RO_INITIAL,
            tti: 0.0,
        }
    }

    /// Advance one time step at the layer's current temperature. Returns the
    /// transformation-ratio increment of this step (≥ 0), the hook the
    /// orchestrator uses to size generated mass.
    pub fn step(&mut self, temperature_k: f64, dt_ma: f64, kinetics: &KerogenKinetics) -> f64 {
        debug_assert_eq!(self.fractions_remaining.len(), KINETIC_BINS);

        let dt_s = dt_ma * SECONDS_PER_MA;
        for (fraction, energy) in self
            .fractions_remaining
            .iter_mut()
            .zip(kinetics.activation_energies.iter())
        {
            // first-order decay integrated analytically over the step
            let rate = FREQUENCY_FACTOR_PER_S
                * (-energy / (GAS_CONSTANT_KCAL * temperature_k)).exp();
            *fraction *= (-rate * dt_s).exp();
        }

        let total_potential = kinetics.total_potential();
        let previous_tr = self.transformation_ratio;
        if total_potential > 0.0 {
            let remaining: f64 = self.fractions_remaining.iter().sum();
            let tr = 1.0 - remaining / total_potential;
            // guard against floating-point wobble near the asymptote
            self.transformation_ratio = tr.clamp(previous_tr, 1.0);
        }

        self.tti += tti_increment(temperature_k, dt_ma);
        self.ro = ro_from_tti(self.tti).max(self.ro).min(RO_MAX);

        self.transformation_ratio - previous_tr
    }
}

/// TTI contribution of `dt_ma` spent at `temperature_k`: Δt·2^((T−100 °C)/10).
pub fn tti_increment(temperature_k: f64, dt_ma: f64) -> f64 {
    let temp_c = kelvin_to_celsius(temperature_k);
    let exponent =
        (temp_c - tti_correlation::REFERENCE_TEMP_C) / tti_correlation::DOUBLING_INTERVAL_C;
    dt_ma * exponent.exp2()
}

/// Logarithmic Ro correlation, floored at the depositional baseline. Total
/// over tti ∈ [0, ∞).
pub fn ro_from_tti(tti: f64) -> f64 {
    if tti <= 0.0 {
        return RO_INITIAL;
    }
    let ro = tti_correlation::LOG10_SLOPE * tti.log10() + tti_correlation::INTERCEPT;
    ro.clamp(RO_INITIAL, RO_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::celsius_to_kelvin;
    use approx::assert_relative_eq;
    use more_asserts::{assert_ge, assert_gt, assert_le};

    #[test]
    fn fresh_state_matches_kinetics_table() {
        let state = MaturityState::new(KerogenType::Type2);
        let kinetics = kinetics_for(KerogenType::Type2);
        assert_eq!(state.fractions_remaining, kinetics.potentials.to_vec());
        assert_eq!(state.transformation_ratio, 0.0);
        assert_relative_eq!(state.ro, RO_INITIAL);
        assert_eq!(state.tti, 0.0);
    }

    #[test]
    fn tr_and_ro_are_monotonic_under_a_heating_history() {
        let kinetics = kinetics_for(KerogenType::Type2);
        let mut state = MaturityState::new(KerogenType::Type2);
        let mut last_tr = 0.0;
        let mut last_ro = state.ro;

        // ramp from 20 °C to 220 °C over 100 Ma
        for step in 0..100 {
            let temp_k = celsius_to_kelvin(20.0 + 2.0 * step as f64);
            let increment = state.step(temp_k, 1.0, kinetics);
            assert_ge!(increment, 0.0);
            assert_ge!(state.transformation_ratio, last_tr);
            assert_ge!(state.ro, last_ro);
            last_tr = state.transformation_ratio;
            last_ro = state.ro;
        }

        // a 220 °C endpoint has cracked most of the potential
        assert_gt!(state.transformation_ratio, 0.9);
        assert_le!(state.transformation_ratio, 1.0);
        assert_le!(state.ro, RO_MAX);
    }

    #[test]
    fn cooling_never_reverses_maturity() {
        let kinetics = kinetics_for(KerogenType::Type1);
        let mut state = MaturityState::new(KerogenType::Type1);
        state.step(celsius_to_kelvin(150.0), 10.0, kinetics);
        let tr_hot = state.transformation_ratio;
        let ro_hot = state.ro;

        state.step(celsius_to_kelvin(30.0), 10.0, kinetics);
        assert_ge!(state.transformation_ratio, tr_hot);
        assert_ge!(state.ro, ro_hot);
    }

    #[test]
    fn ro_correlation_hits_its_anchor_points() {
        assert_relative_eq!(ro_from_tti(15.0), 0.65, epsilon = 0.01);
        assert_relative_eq!(ro_from_tti(160.0), 1.3, epsilon = 0.01);
        // below the oil window the floor holds
        assert_relative_eq!(ro_from_tti(0.001), RO_INITIAL);
        assert_relative_eq!(ro_from_tti(0.0), RO_INITIAL);
        // far past the anchors the cap holds
        assert_relative_eq!(ro_from_tti(1.0e30), RO_MAX);
    }

    #[test]
    fn tti_doubles_every_ten_degrees() {
        let at_100 = tti_increment(celsius_to_kelvin(100.0), 1.0);
        let at_110 = tti_increment(celsius_to_kelvin(110.0), 1.0);
        assert_relative_eq!(at_100, 1.0);
        assert_relative_eq!(at_110 / at_100, 2.0);
    }

    #[test]
    fn cold_shallow_history_stays_immature() {
        let kinetics = kinetics_for(KerogenType::Type2);
        let mut state = MaturityState::new(KerogenType::Type2);
        for _ in 0..10 {
            state.step(celsius_to_kelvin(25.0), 1.0, kinetics);
        }
        assert_relative_eq!(state.ro, RO_INITIAL);
        assert!(state.transformation_ratio < 0.01);
    }
}
