// src/optimizer.rs - Genetic-algorithm calibration of basal heat flow
//
// A small fixed population of heat-flow candidates is evolved for a fixed
// number of generations. Every candidate's fitness is one full forward run
// scored against observed Ro/temperature profiles (or a synthetic target when
// none are supplied). Runs are independent, so a generation evaluates in
// parallel; selection waits on the whole generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{HEAT_FLOW_MAX_MW_M2, HEAT_FLOW_MIN_MW_M2, SYNTHETIC_TARGET_HEAT_FLOW};
use crate::progress::CancelToken;
use crate::sim::{SimProps, Simulation};
use crate::stratigraphy::StratigraphicLayer;

/// Fitness assigned to a candidate whose forward run failed (or that was
/// skipped after cancellation). Large but finite, so one bad gene never
/// aborts a calibration.
pub const PENALTY_FITNESS: f64 = 1.0e9;

const TOURNAMENT_SIZE: usize = 3;
const ELITE_COUNT: usize = 2;
/// Bound of the Gaussian-like mutation perturbation (mW/m²)
const MUTATION_SIGMA: f64 = 15.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Candidate {
    pub heat_flow_mw_m2: f64,
    /// Absolute misfit against the calibration targets; lower is better
    pub fitness: f64,
}

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    /// Seed for the injected RNG; None draws one from the OS
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            population_size: 10,
            generations: 5,
            mutation_rate: 0.2,
            seed: None,
        }
    }
}

/// Observed calibration profiles, each a list of (depth m, value) samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalibrationData {
    pub ro: Vec<(f64, f64)>,
    pub temperature_c: Vec<(f64, f64)>,
}

impl CalibrationData {
    pub fn is_empty(&self) -> bool {
        self.ro.is_empty() && self.temperature_c.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerResult {
    pub best: Candidate,
    /// Best fitness of each generation; non-increasing thanks to elitism
    pub best_fitness_history: Vec<f64>,
}

pub struct ParameterOptimizer {
    layers: Vec<StratigraphicLayer>,
    calibration: Option<CalibrationData>,
    config: OptimizerConfig,
    cancel: CancelToken,
}

impl ParameterOptimizer {
    pub fn new(
        layers: Vec<StratigraphicLayer>,
        calibration: Option<CalibrationData>,
        config: OptimizerConfig,
    ) -> Self {
        ParameterOptimizer {
            layers,
            calibration,
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Token the caller can hold on to to stop the search between
    /// generations and between candidate evaluations.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn optimize(&self) -> OptimizerResult {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let population_size = self.config.population_size.max(ELITE_COUNT);

        let mut genes: Vec<f64> = (0..population_size)
            .map(|_| rng.random_range(HEAT_FLOW_MIN_MW_M2..=HEAT_FLOW_MAX_MW_M2))
            .collect();

        let mut best_fitness_history = Vec::with_capacity(self.config.generations);
        let mut population = self.evaluate_generation(&genes);

        for generation in 0..self.config.generations {
            best_fitness_history.push(population[0].fitness);
            info!(
                generation,
                best_heat_flow = population[0].heat_flow_mw_m2,
                best_fitness = population[0].fitness,
                "generation evaluated"
            );

            if self.cancel.is_cancelled() || generation + 1 == self.config.generations {
                break;
            }

            genes = self.evolve(&population, &mut rng);
            let next = self.evaluate_generation(&genes);
            // elites keep their evaluated fitness; merging keeps the best
            // seen so far at the front
            population = merge_elites(&population, next);
        }

        OptimizerResult { best: population[0], best_fitness_history }
    }

    /// Evaluate a generation of genes in parallel; the result is sorted by
    /// ascending fitness.
    fn evaluate_generation(&self, genes: &[f64]) -> Vec<Candidate> {
        let mut population: Vec<Candidate> = genes
            .par_iter()
            .map(|&gene| Candidate {
                heat_flow_mw_m2: gene,
                fitness: self.evaluate(gene),
            })
            .collect();
        population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        population
    }

    /// One full forward run scored against the calibration targets.
    fn evaluate(&self, heat_flow_mw_m2: f64) -> f64 {
        if self.cancel.is_cancelled() {
            return PENALTY_FITNESS;
        }

        let props = SimProps::new(self.layers.clone()).with_heat_flow(heat_flow_mw_m2);
        let result = match Simulation::new(props).and_then(Simulation::run) {
            Ok(result) => result,
            Err(err) => {
                debug!(heat_flow_mw_m2, %err, "candidate run failed, assigning penalty");
                return PENALTY_FITNESS;
            }
        };

        match &self.calibration {
            Some(calibration) if !calibration.is_empty() => {
                let mut misfit = 0.0;
                for &(depth_m, observed) in &calibration.ro {
                    match result.ro_at_depth(depth_m) {
                        Some(predicted) => misfit += (predicted - observed).abs(),
                        None => misfit += PENALTY_FITNESS,
                    }
                }
                for &(depth_m, observed) in &calibration.temperature_c {
                    match result.temperature_at_depth(depth_m) {
                        Some(predicted) => misfit += (predicted - observed).abs(),
                        None => misfit += PENALTY_FITNESS,
                    }
                }
                misfit
            }
            // no observations: score against the synthetic target heat flow
            _ => (heat_flow_mw_m2 - SYNTHETIC_TARGET_HEAT_FLOW).abs(),
        }
    }

    /// Produce the next generation's genes: elites pass through unmodified,
    /// the rest come from tournament selection, averaging crossover, and
    /// bounded Gaussian-like mutation. Every gene is clamped to the
    /// physically plausible heat-flow range after every operation.
    fn evolve(&self, population: &[Candidate], rng: &mut StdRng) -> Vec<f64> {
        let mut genes: Vec<f64> = population
            .iter()
            .take(ELITE_COUNT)
            .map(|c| c.heat_flow_mw_m2)
            .collect();

        while genes.len() < population.len() {
            let mother = tournament_select(population, rng);
            let father = tournament_select(population, rng);
            let mut gene = clamp_gene(0.5 * (mother.heat_flow_mw_m2 + father.heat_flow_mw_m2));

            if rng.random_range(0.0..1.0) < self.config.mutation_rate {
                gene = clamp_gene(gene + gaussian_like(rng) * MUTATION_SIGMA);
            }

            genes.push(gene);
        }

        genes
    }
}

fn clamp_gene(heat_flow_mw_m2: f64) -> f64 {
    heat_flow_mw_m2.clamp(HEAT_FLOW_MIN_MW_M2, HEAT_FLOW_MAX_MW_M2)
}

/// Best of `TOURNAMENT_SIZE` uniform draws, with replacement.
fn tournament_select<'a>(population: &'a [Candidate], rng: &mut StdRng) -> &'a Candidate {
    let mut best = &population[rng.random_range(0..population.len())];
    for _ in 1..TOURNAMENT_SIZE {
        let challenger = &population[rng.random_range(0..population.len())];
        if challenger.fitness < best.fitness {
            best = challenger;
        }
    }
    best
}

/// Bounded Gaussian-like draw in [-1, 1]: the mean of three uniform samples
/// concentrates around zero without needing a separate distributions crate.
fn gaussian_like(rng: &mut StdRng) -> f64 {
    (rng.random_range(-1.0..1.0) + rng.random_range(-1.0..1.0) + rng.random_range(-1.0..1.0)) / 3.0
}

/// Keep the population sorted and the best-ever candidates at the front.
fn merge_elites(previous: &[Candidate], next: Vec<Candidate>) -> Vec<Candidate> {
    let mut merged = next;
    for elite in previous.iter().take(ELITE_COUNT) {
        // the elite gene was re-evaluated in `next`; keep whichever scored
        // better so the front of the population never regresses
        if !merged
            .iter()
            .any(|c| c.heat_flow_mw_m2 == elite.heat_flow_mw_m2 && c.fitness <= elite.fitness)
        {
            merged.push(*elite);
        }
    }
    merged.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    merged.truncate(previous.len());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use more_asserts::{assert_ge, assert_le};

    #[test]
    fn gaussian_like_stays_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let draw = gaussian_like(&mut rng);
            assert_ge!(draw, -1.0);
            assert_le!(draw, 1.0);
        }
    }

    #[test]
    fn clamp_holds_the_physical_range() {
        assert_eq!(clamp_gene(10.0), HEAT_FLOW_MIN_MW_M2);
        assert_eq!(clamp_gene(500.0), HEAT_FLOW_MAX_MW_M2);
        assert_eq!(clamp_gene(75.0), 75.0);
    }

    #[test]
    fn tournament_prefers_fitter_candidates() {
        let population = vec![
            Candidate { heat_flow_mw_m2: 60.0, fitness: 0.0 },
            Candidate { heat_flow_mw_m2: 140.0, fitness: 80.0 },
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let mut wins = 0;
        for _ in 0..200 {
            if tournament_select(&population, &mut rng).fitness == 0.0 {
                wins += 1;
            }
        }
        // best of three draws from two candidates picks the fitter one 7/8
        // of the time in expectation
        assert_ge!(wins, 150);
    }

    #[test]
    fn merge_keeps_the_best_ever_in_front() {
        let previous = vec![
            Candidate { heat_flow_mw_m2: 61.0, fitness: 1.0 },
            Candidate { heat_flow_mw_m2: 70.0, fitness: 10.0 },
            Candidate { heat_flow_mw_m2: 90.0, fitness: 30.0 },
        ];
        let next = vec![
            Candidate { heat_flow_mw_m2: 80.0, fitness: 20.0 },
            Candidate { heat_flow_mw_m2: 100.0, fitness: 40.0 },
            Candidate { heat_flow_mw_m2: 110.0, fitness: 50.0 },
        ];
        let merged = merge_elites(&previous, next);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].fitness, 1.0);
    }
}
