// src/sim/simulation.rs - The forward-model time loop
//
// One Simulation owns one run: deposit layers oldest-first, and each step
// re-compact the active stack, advance conductive heat, advance kerogen
// kinetics, and account expulsion for mature source rocks. History is
// append-only and handed back wholesale; any numerical failure aborts the
// whole run with the failing time step attached.

use tracing::debug;

use crate::compaction::{BurialGeometry, initialize_solid_thickness, layer_geometry};
use crate::constants::{
    DEFAULT_HEAT_FLOW_MW_M2, DEFAULT_STEP_MA, DEFAULT_SURFACE_TEMP_C, EXPULSION_ONSET_RO,
    EXPULSION_THRESHOLD_SATURATION, HC_DENSITY_KGM3, SECONDS_PER_MA, celsius_to_kelvin,
    kelvin_to_celsius,
};
use crate::error::{BasinError, Result};
use crate::expulsion::ExpulsionState;
use crate::heat_solver::{ThermalNode, solve_heat_step};
use crate::kinetics::kinetics_for;
use crate::maturity::MaturityState;
use crate::phase::fluid_phase;
use crate::progress::ProgressSink;
use crate::sim::history::{LayerHistory, LayerMeta, LayerStepRecord, RunResult};
use crate::stratigraphy::{InitializedLayer, StratigraphicLayer, validate_and_sort};

pub struct SimProps {
    pub layers: Vec<StratigraphicLayer>,
    /// Basal heat flow (mW/m²); default 60
    pub heat_flow_mw_m2: Option<f64>,
    /// Fixed surface temperature (°C); default 20
    pub surface_temp_c: Option<f64>,
    /// Time step (Ma); default 1
    pub step_ma: Option<f64>,
    pub progress: ProgressSink,
}

impl SimProps {
    pub fn new(layers: Vec<StratigraphicLayer>) -> Self {
        SimProps {
            layers,
            heat_flow_mw_m2: None,
            surface_temp_c: None,
            step_ma: None,
            progress: ProgressSink::Null,
        }
    }

    pub fn with_heat_flow(mut self, mw_m2: f64) -> Self {
        self.heat_flow_mw_m2 = Some(mw_m2);
        self
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = sink;
        self
    }
}

pub struct Simulation {
    layers: Vec<InitializedLayer>,
    heat_flow_mw_m2: f64,
    surface_temp_c: f64,
    step_ma: f64,
    progress: ProgressSink,

    // per-layer evolving state, parallel to `layers` (oldest first)
    temperatures_k: Vec<Option<f64>>,
    maturity: Vec<Option<MaturityState>>,
    expulsion: Vec<ExpulsionState>,
    history: Vec<Vec<LayerStepRecord>>,
    max_depth_m: f64,
}

impl Simulation {
    /// Validate the project descriptor and stage a run. The caller's layer
    /// list is deep-copied; nothing here mutates it.
    pub fn new(props: SimProps) -> Result<Simulation> {
        let mut layers = validate_and_sort(&props.layers)?;
        initialize_solid_thickness(&mut layers);

        let step_ma = props.step_ma.unwrap_or(DEFAULT_STEP_MA);
        if !step_ma.is_finite() || step_ma <= 0.0 {
            return Err(BasinError::invalid_input(format!(
                "time step must be a positive finite number of Ma, got {step_ma}"
            )));
        }
        let heat_flow_mw_m2 = props.heat_flow_mw_m2.unwrap_or(DEFAULT_HEAT_FLOW_MW_M2);
        if !heat_flow_mw_m2.is_finite() {
            return Err(BasinError::invalid_input(format!(
                "basal heat flow must be finite, got {heat_flow_mw_m2}"
            )));
        }
        let surface_temp_c = props.surface_temp_c.unwrap_or(DEFAULT_SURFACE_TEMP_C);
        if !surface_temp_c.is_finite() {
            return Err(BasinError::invalid_input(format!(
                "surface temperature must be finite, got {surface_temp_c}"
            )));
        }

        let count = layers.len();
        Ok(Simulation {
            layers,
            heat_flow_mw_m2,
            surface_temp_c,
            step_ma,
            progress: props.progress,
            temperatures_k: vec![None; count],
            maturity: vec![None; count],
            expulsion: vec![ExpulsionState::default(); count],
            history: vec![Vec::new(); count],
            max_depth_m: 0.0,
        })
    }

    /// Run the full forward model from the oldest deposition age to present.
    /// Consumes the simulation; a failed run discards all partial history.
    pub fn run(mut self) -> Result<RunResult> {
        let max_age = self.layers[0].source.age_start_ma;
        let steps = (max_age / self.step_ma).ceil() as usize;
        debug!(max_age_ma = max_age, steps, heat_flow = self.heat_flow_mw_m2, "starting run");

        let mut previous_ma = max_age;
        for i in 0..=steps {
            let time_ma = (max_age - i as f64 * self.step_ma).max(0.0);
            // the final clamped iteration covers less than a full step
            let dt_ma = previous_ma - time_ma;
            self.advance_step(time_ma, dt_ma).map_err(|e| e.at_time(time_ma))?;
            previous_ma = time_ma;

            let percent = if max_age > 0.0 {
                (max_age - time_ma) / max_age * 100.0
            } else {
                100.0
            };
            self.progress.report(percent);
        }

        debug!(max_depth_m = self.max_depth_m, "run complete");
        Ok(self.into_result())
    }

    /// Number of layers already deposited at `time_ma`. Layers are sorted
    /// oldest-first, so the active set is always a prefix.
    fn active_count(&self, time_ma: f64) -> usize {
        self.layers
            .iter()
            .take_while(|l| l.source.age_start_ma >= time_ma - 1e-9)
            .count()
    }

    fn advance_step(&mut self, time_ma: f64, dt_ma: f64) -> Result<()> {
        let active = self.active_count(time_ma);
        if active == 0 {
            return Ok(());
        }

        // Burial geometry, top of stack (youngest active) downward
        let mut geometries: Vec<BurialGeometry> = Vec::with_capacity(active);
        let mut depth = 0.0;
        for idx in (0..active).rev() {
            let geometry = layer_geometry(&self.layers[idx], depth)?;
            depth = geometry.bottom_m;
            geometries.push(geometry);
        }
        self.max_depth_m = self.max_depth_m.max(depth);

        // geometries[j] belongs to layer index active-1-j (top-down order)
        let surface_k = celsius_to_kelvin(self.surface_temp_c);
        let basal_flux = self.heat_flow_mw_m2 * 1.0e-3; // mW/m² → W/m²

        let nodes: Vec<ThermalNode> = geometries
            .iter()
            .enumerate()
            .map(|(j, geometry)| {
                let idx = active - 1 - j;
                let layer = &self.layers[idx];
                let center = 0.5 * (geometry.top_m + geometry.bottom_m);
                // a freshly deposited layer starts on the local conductive gradient
                let temperature = self.temperatures_k[idx].unwrap_or_else(|| {
                    surface_k + basal_flux / layer.thermal.conductivity_w_m_k * center
                });
                ThermalNode {
                    center_depth_m: center,
                    conductivity_w_m_k: layer.thermal.conductivity_w_m_k,
                    bulk_density_kg_m3: geometry.bulk_density_kg_m3,
                    heat_capacity_j_kg_k: layer.thermal.heat_capacity_j_kg_k,
                    radiogenic_w_m3: layer.thermal.radiogenic_w_m3,
                    temperature_k: temperature,
                }
            })
            .collect();

        let dt_s = dt_ma * SECONDS_PER_MA;
        let temps = solve_heat_step(&nodes, dt_s, surface_k, basal_flux);
        for (j, temp) in temps.iter().enumerate() {
            let idx = active - 1 - j;
            self.temperatures_k[idx] = Some(*temp);
        }

        // Kinetics, phase, and expulsion for every active layer
        for (j, geometry) in geometries.iter().enumerate() {
            let idx = active - 1 - j;
            let layer = &self.layers[idx];
            let kerogen = layer.source.kerogen();
            let kinetics = kinetics_for(kerogen);
            let temperature_k = self.temperatures_k[idx].unwrap_or(surface_k);

            let state = self.maturity[idx].get_or_insert_with(|| MaturityState::new(kerogen));
            let tr_increment = state.step(temperature_k, dt_ma, kinetics);
            let ro = state.ro;
            let transformation_ratio = state.transformation_ratio;

            let mut generation_rate = 0.0;
            if layer.source.is_source() {
                // generation potential per unit area scales with the solid
                // framework mass and its organic fraction
                let potential_kg_m2 = layer.solid_thickness_m
                    * layer.compaction.grain_density_kg_m3
                    * layer.source.toc_fraction();
                let generated_kg = tr_increment * potential_kg_m2;
                if dt_ma > 0.0 {
                    generation_rate = generated_kg / dt_ma;
                }

                let expulsion = &mut self.expulsion[idx];
                if ro > EXPULSION_ONSET_RO {
                    expulsion.absorb(
                        generated_kg,
                        geometry.porosity_avg,
                        geometry.thickness_m, // bulk volume per m² of area
                        HC_DENSITY_KGM3,
                        EXPULSION_THRESHOLD_SATURATION,
                    );
                } else {
                    // below the expulsion onset everything generated stays put
                    expulsion.retain(generated_kg);
                }
            }

            self.history[idx].push(LayerStepRecord {
                time_ma,
                top_m: geometry.top_m,
                bottom_m: geometry.bottom_m,
                thickness_m: geometry.thickness_m,
                porosity_avg: geometry.porosity_avg,
                temperature_c: kelvin_to_celsius(temperature_k),
                ro,
                transformation_ratio,
                generation_rate_kg_m2_ma: generation_rate,
                expelled_kg_m2: self.expulsion[idx].expelled_kg,
                phase: fluid_phase(ro, kerogen),
            });
        }

        Ok(())
    }

    fn into_result(self) -> RunResult {
        let layers = self
            .layers
            .iter()
            .map(|layer| LayerMeta {
                id: layer.source.id.clone(),
                name: layer.source.name.clone(),
                lithology: layer.lithology,
                age_start_ma: layer.source.age_start_ma,
                present_thickness_m: layer.source.thickness_m,
                is_source: layer.source.is_source(),
                kerogen: layer.source.kerogen(),
            })
            .collect();

        let history = self
            .layers
            .iter()
            .zip(self.history)
            .map(|(layer, records)| LayerHistory { layer_id: layer.source.id.clone(), records })
            .collect();

        RunResult { layers, history, max_depth_m: self.max_depth_m }
    }
}
