// src/compaction.rs - Burial and decompaction on the exponential porosity law
//
// Porosity follows φ(z) = φ0·exp(−c·z). The solid fraction integrated over a
// layer's depth range,
//   Hs = H + (φ0/c)·exp(−c·top)·(exp(−c·H) − 1),
// is the layer's invariant: burial squeezes pore water out but never solid
// grains. Present-day geometry fixes Hs once; every past geometry is then the
// Newton back-solve of the same relation at a shallower top depth.

use crate::constants::WATER_DENSITY_KGM3;
use crate::error::{BasinError, Result};
use crate::stratigraphy::InitializedLayer;

/// Newton-iteration budget for the thickness back-solve
pub const NEWTON_MAX_ITERATIONS: u32 = 20;
/// Convergence tolerance on the thickness update (m)
pub const NEWTON_TOLERANCE_M: f64 = 0.1;

/// Geometry of one layer at one burial state.
#[derive(Debug, Clone, Copy)]
pub struct BurialGeometry {
    pub top_m: f64,
    pub bottom_m: f64,
    pub thickness_m: f64,
    /// Trapezoidal average of top and bottom porosity
    pub porosity_avg: f64,
    pub bulk_density_kg_m3: f64,
}

/// Solid thickness of a layer spanning [top, top + thickness].
fn solid_thickness(surface_porosity: f64, decay_per_m: f64, top_m: f64, thickness_m: f64) -> f64 {
    let phi_term = surface_porosity / decay_per_m * (-decay_per_m * top_m).exp();
    thickness_m + phi_term * ((-decay_per_m * thickness_m).exp() - 1.0)
}

/// Assign present-day tops/bottoms and the invariant solid thickness to every
/// layer. Layers are consumed in present stratigraphic order, youngest (top)
/// first, running depth downward from the surface. Runs once, before any time
/// stepping.
pub fn initialize_solid_thickness(layers: &mut [InitializedLayer]) {
    let mut depth = 0.0;
    // layers arrive sorted oldest-first; the present-day stack reads youngest-first
    for layer in layers.iter_mut().rev() {
        let thickness = layer.source.thickness_m;
        layer.present_top_m = depth;
        layer.present_bottom_m = depth + thickness;
        layer.solid_thickness_m = solid_thickness(
            layer.compaction.surface_porosity,
            layer.compaction.decay_per_m,
            depth,
            thickness,
        );
        depth += thickness;
    }
}

/// Solve for a layer's geometry when its top sits at `top_m`, preserving the
/// solid-thickness invariant. Newton–Raphson on
///   f(H) = H + (φ0/c)·e^(−c·top)·(e^(−c·H) − 1) − Hs
/// with f'(H) = 1 − φ0·e^(−c·(top+H)), starting from H = 1.5·Hs.
pub fn layer_geometry(layer: &InitializedLayer, top_m: f64) -> Result<BurialGeometry> {
    let phi0 = layer.compaction.surface_porosity;
    let c = layer.compaction.decay_per_m;
    let hs = layer.solid_thickness_m;

    let phi_term = phi0 / c * (-c * top_m).exp();

    let mut thickness = 1.5 * hs;
    let mut residual = f64::INFINITY;
    let mut converged = false;

    for _ in 0..NEWTON_MAX_ITERATIONS {
        let f = thickness + phi_term * ((-c * thickness).exp() - 1.0) - hs;
        let df = 1.0 - phi0 * (-c * (top_m + thickness)).exp();
        let delta = f / df;
        thickness -= delta;
        residual = delta.abs();
        if residual < NEWTON_TOLERANCE_M {
            converged = true;
            break;
        }
    }

    if !converged || !thickness.is_finite() || thickness <= 0.0 {
        return Err(BasinError::CompactionNonConvergence {
            layer_id: layer.id().to_string(),
            top_m,
            residual_m: residual,
            iterations: NEWTON_MAX_ITERATIONS,
        });
    }

    let bottom_m = top_m + thickness;
    let porosity_top = phi0 * (-c * top_m).exp();
    let porosity_bottom = phi0 * (-c * bottom_m).exp();
    let porosity_avg = 0.5 * (porosity_top + porosity_bottom);
    let bulk_density = porosity_avg * WATER_DENSITY_KGM3
        + (1.0 - porosity_avg) * layer.compaction.grain_density_kg_m3;

    Ok(BurialGeometry {
        top_m,
        bottom_m,
        thickness_m: thickness,
        porosity_avg,
        bulk_density_kg_m3: bulk_density,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stratigraphy::{StratigraphicLayer, validate_and_sort};
    use approx::assert_relative_eq;
    use more_asserts::{assert_gt, assert_lt};

    fn stack(specs: &[(&str, f64, f64, &str)]) -> Vec<InitializedLayer> {
        let layers: Vec<StratigraphicLayer> = specs
            .iter()
            .map(|(id, age, thickness, lith)| StratigraphicLayer {
                id: id.to_string(),
                name: id.to_string(),
                lithology: lith.to_string(),
                age_start_ma: *age,
                thickness_m: *thickness,
                source_rock: None,
            })
            .collect();
        let mut initialized = validate_and_sort(&layers).unwrap();
        initialize_solid_thickness(&mut initialized);
        initialized
    }

    #[test]
    fn solid_thickness_round_trips_present_geometry() {
        // Back-solving at the present-day top must reproduce the present-day
        // thickness within the Newton tolerance.
        let layers = stack(&[
            ("top", 10.0, 150.0, "sandstone"),
            ("mid", 40.0, 300.0, "shale"),
            ("base", 90.0, 500.0, "limestone"),
        ]);
        for layer in &layers {
            let geometry = layer_geometry(layer, layer.present_top_m).unwrap();
            assert_relative_eq!(
                geometry.thickness_m,
                layer.source.thickness_m,
                epsilon = NEWTON_TOLERANCE_M
            );
        }
    }

    #[test]
    fn shallower_burial_decompacts() {
        let layers = stack(&[("cover", 10.0, 400.0, "sandstone"), ("deep", 60.0, 200.0, "shale")]);
        let deep = &layers[0]; // oldest-first ordering
        assert_eq!(deep.id(), "deep");

        let at_depth = layer_geometry(deep, deep.present_top_m).unwrap();
        let at_surface = layer_geometry(deep, 0.0).unwrap();
        assert_gt!(at_surface.thickness_m, at_depth.thickness_m);
        assert_gt!(at_surface.porosity_avg, at_depth.porosity_avg);
        assert_lt!(at_surface.bulk_density_kg_m3, at_depth.bulk_density_kg_m3);
    }

    #[test]
    fn solid_thickness_is_less_than_bulk_thickness() {
        let layers = stack(&[("unit", 25.0, 250.0, "shale")]);
        assert_lt!(layers[0].solid_thickness_m, 250.0);
        assert_gt!(layers[0].solid_thickness_m, 0.0);
    }

    #[test]
    fn bulk_density_lies_between_water_and_grain() {
        let layers = stack(&[("unit", 25.0, 100.0, "sandstone")]);
        let geometry = layer_geometry(&layers[0], 0.0).unwrap();
        assert_gt!(geometry.bulk_density_kg_m3, WATER_DENSITY_KGM3);
        assert_lt!(geometry.bulk_density_kg_m3, layers[0].compaction.grain_density_kg_m3);
    }

    #[test]
    fn deep_burial_converges() {
        // 5 km of overburden still converges inside the iteration budget
        let layers = stack(&[("unit", 25.0, 300.0, "shale")]);
        let geometry = layer_geometry(&layers[0], 5000.0).unwrap();
        // fully compacted: thickness approaches the solid thickness
        assert_relative_eq!(
            geometry.thickness_m,
            layers[0].solid_thickness_m,
            max_relative = 0.1
        );
    }
}
