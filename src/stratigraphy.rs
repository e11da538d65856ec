// src/stratigraphy.rs - Caller-facing layer records and pre-run validation

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TOC_FRACTION;
use crate::error::{BasinError, Result};
use crate::kinetics::KerogenType;
use crate::lithology::{CompactionProfile, LithologyType, ThermalProfile, resolve_lithology};

/// Source-rock flags a caller may attach to a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRockInfo {
    pub kerogen: KerogenType,
    /// Total organic carbon as a mass fraction of the solid framework
    pub toc_fraction: Option<f64>,
}

/// One stratigraphic unit as described by the caller. Ages are deposition
/// ages in Ma; thickness is present-day. Order in the input list is not
/// trusted; the engine sorts by age before simulating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratigraphicLayer {
    pub id: String,
    pub name: String,
    pub lithology: String,
    pub age_start_ma: f64,
    pub thickness_m: f64,
    #[serde(default)]
    pub source_rock: Option<SourceRockInfo>,
}

impl StratigraphicLayer {
    pub fn is_source(&self) -> bool {
        self.source_rock.is_some()
    }

    /// Kerogen type for kinetics, defaulting to Type II when the layer is not
    /// flagged or the flag omits it.
    pub fn kerogen(&self) -> KerogenType {
        self.source_rock
            .as_ref()
            .map(|s| s.kerogen)
            .unwrap_or_default()
    }

    pub fn toc_fraction(&self) -> f64 {
        self.source_rock
            .as_ref()
            .and_then(|s| s.toc_fraction)
            .unwrap_or(DEFAULT_TOC_FRACTION)
    }
}

/// A validated layer carrying its resolved property profiles and the derived
/// burial invariants. This is the engine's working copy; the caller's list
/// is never mutated.
#[derive(Debug, Clone)]
pub struct InitializedLayer {
    pub source: StratigraphicLayer,
    pub lithology: LithologyType,
    pub compaction: &'static CompactionProfile,
    pub thermal: &'static ThermalProfile,
    /// Time-invariant solid rock thickness (m); set by initialize_solid_thickness
    pub solid_thickness_m: f64,
    pub present_top_m: f64,
    pub present_bottom_m: f64,
}

impl InitializedLayer {
    fn from_source(source: StratigraphicLayer) -> Self {
        let (lithology, compaction, thermal) = resolve_lithology(&source.lithology);
        InitializedLayer {
            source,
            lithology,
            compaction,
            thermal,
            solid_thickness_m: 0.0,
            present_top_m: 0.0,
            present_bottom_m: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.source.id
    }
}

/// Validate the caller's stratigraphy and deep-copy it into working layers
/// sorted oldest-first (descending age_start). Rejects empty input,
/// non-positive thickness, and negative or non-finite ages before any
/// numerics run.
pub fn validate_and_sort(layers: &[StratigraphicLayer]) -> Result<Vec<InitializedLayer>> {
    if layers.is_empty() {
        return Err(BasinError::invalid_input("stratigraphy has no layers"));
    }

    for layer in layers {
        if !layer.thickness_m.is_finite() || layer.thickness_m <= 0.0 {
            return Err(BasinError::invalid_input(format!(
                "layer '{}' has non-positive thickness {}",
                layer.id, layer.thickness_m
            )));
        }
        if !layer.age_start_ma.is_finite() || layer.age_start_ma < 0.0 {
            return Err(BasinError::invalid_input(format!(
                "layer '{}' has invalid deposition age {}",
                layer.id, layer.age_start_ma
            )));
        }
        if let Some(src) = &layer.source_rock {
            if let Some(toc) = src.toc_fraction {
                if !(0.0..=1.0).contains(&toc) {
                    return Err(BasinError::invalid_input(format!(
                        "layer '{}' has TOC fraction {} outside [0,1]",
                        layer.id, toc
                    )));
                }
            }
        }
    }

    let mut initialized: Vec<InitializedLayer> = layers
        .iter()
        .cloned()
        .map(InitializedLayer::from_source)
        .collect();

    // Oldest first; ties keep caller order
    initialized.sort_by(|a, b| b.source.age_start_ma.total_cmp(&a.source.age_start_ma));

    Ok(initialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(id: &str, age: f64, thickness: f64) -> StratigraphicLayer {
        StratigraphicLayer {
            id: id.to_string(),
            name: id.to_string(),
            lithology: "sandstone".to_string(),
            age_start_ma: age,
            thickness_m: thickness,
            source_rock: None,
        }
    }

    #[test]
    fn sorts_oldest_first_regardless_of_caller_order() {
        let layers = vec![layer("young", 10.0, 100.0), layer("old", 80.0, 200.0), layer("mid", 40.0, 50.0)];
        let sorted = validate_and_sort(&layers).unwrap();
        let ids: Vec<&str> = sorted.iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["old", "mid", "young"]);
    }

    #[test]
    fn rejects_empty_stratigraphy() {
        assert!(validate_and_sort(&[]).is_err());
    }

    #[test]
    fn rejects_non_positive_thickness() {
        let err = validate_and_sort(&[layer("bad", 10.0, 0.0)]).unwrap_err();
        assert!(matches!(err, BasinError::InvalidInput { .. }));
        assert!(validate_and_sort(&[layer("neg", 10.0, -5.0)]).is_err());
    }

    #[test]
    fn kerogen_accessor_defaults_to_type2() {
        let plain = layer("plain", 10.0, 100.0);
        assert_eq!(plain.kerogen(), KerogenType::Type2);
        assert!(!plain.is_source());

        let mut flagged = layer("src", 10.0, 100.0);
        flagged.source_rock = Some(SourceRockInfo { kerogen: KerogenType::Type3, toc_fraction: None });
        assert_eq!(flagged.kerogen(), KerogenType::Type3);
        assert_eq!(flagged.toc_fraction(), DEFAULT_TOC_FRACTION);
    }

    #[test]
    fn validation_never_mutates_caller_layers() {
        let layers = vec![layer("a", 5.0, 100.0), layer("b", 30.0, 40.0)];
        let before = serde_json::to_string(&layers).unwrap();
        let _ = validate_and_sort(&layers).unwrap();
        let after = serde_json::to_string(&layers).unwrap();
        assert_eq!(before, after);
    }
}
