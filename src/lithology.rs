// src/lithology.rs - Lithology system with compaction and thermal properties

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LithologyType {
    Sandstone,
    Shale,
    Limestone,
    Siltstone,
    Salt,
    Coal,
    /// Fallback kind for lithology names the tables do not know; carries the
    /// default profile set
    Unclassified,
}

impl LithologyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LithologyType::Sandstone => "sandstone",
            LithologyType::Shale => "shale",
            LithologyType::Limestone => "limestone",
            LithologyType::Siltstone => "siltstone",
            LithologyType::Salt => "salt",
            LithologyType::Coal => "coal",
            LithologyType::Unclassified => "unclassified",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandstone" | "sand" => Some(LithologyType::Sandstone),
            "shale" | "mudstone" => Some(LithologyType::Shale),
            "limestone" | "carbonate" | "chalk" => Some(LithologyType::Limestone),
            "siltstone" | "silt" => Some(LithologyType::Siltstone),
            "salt" | "halite" | "evaporite" => Some(LithologyType::Salt),
            "coal" => Some(LithologyType::Coal),
            _ => None,
        }
    }
}

/// Athy-style compaction parameters: φ(z) = φ0·exp(−c·z)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompactionProfile {
    /// Depositional (surface) porosity, fraction of bulk volume
    pub surface_porosity: f64,
    /// Exponential porosity decay constant (1/m)
    pub decay_per_m: f64,
    /// Density of the solid grain framework (kg/m³)
    pub grain_density_kg_m3: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThermalProfile {
    pub conductivity_w_m_k: f64,
    pub heat_capacity_j_kg_k: f64,
    /// Radiogenic heat production of the rock matrix (W/m³)
    pub radiogenic_w_m3: f64,
}

static COMPACTION_PROFILES: Lazy<HashMap<LithologyType, CompactionProfile>> = Lazy::new(|| {
    use LithologyType::*;
    let mut m = HashMap::new();

    m.insert(Sandstone, CompactionProfile {
        surface_porosity: 0.49,
        decay_per_m: 2.7e-4,
        grain_density_kg_m3: 2650.0,
    });

    m.insert(Shale, CompactionProfile {
        surface_porosity: 0.63,
        decay_per_m: 5.1e-4,
        grain_density_kg_m3: 2720.0,
    });

    m.insert(Limestone, CompactionProfile {
        surface_porosity: 0.51,
        decay_per_m: 5.2e-4,
        grain_density_kg_m3: 2710.0,
    });

    m.insert(Siltstone, CompactionProfile {
        surface_porosity: 0.56,
        decay_per_m: 3.9e-4,
        grain_density_kg_m3: 2680.0,
    });

    // Salt does not compact; a tiny decay constant keeps the Newton solve well-posed
    m.insert(Salt, CompactionProfile {
        surface_porosity: 0.01,
        decay_per_m: 1.0e-6,
        grain_density_kg_m3: 2160.0,
    });

    m.insert(Coal, CompactionProfile {
        surface_porosity: 0.70,
        decay_per_m: 7.0e-4,
        grain_density_kg_m3: 1500.0,
    });

    m
});

static THERMAL_PROFILES: Lazy<HashMap<LithologyType, ThermalProfile>> = Lazy::new(|| {
    use LithologyType::*;
    let mut m = HashMap::new();

    m.insert(Sandstone, ThermalProfile {
        conductivity_w_m_k: 3.2,
        heat_capacity_j_kg_k: 855.0,
        radiogenic_w_m3: 0.7e-6,
    });

    m.insert(Shale, ThermalProfile {
        conductivity_w_m_k: 1.5,
        heat_capacity_j_kg_k: 860.0,
        radiogenic_w_m3: 1.8e-6,
    });

    m.insert(Limestone, ThermalProfile {
        conductivity_w_m_k: 2.8,
        heat_capacity_j_kg_k: 840.0,
        radiogenic_w_m3: 0.6e-6,
    });

    m.insert(Siltstone, ThermalProfile {
        conductivity_w_m_k: 2.1,
        heat_capacity_j_kg_k: 860.0,
        radiogenic_w_m3: 1.3e-6,
    });

    m.insert(Salt, ThermalProfile {
        conductivity_w_m_k: 5.7,
        heat_capacity_j_kg_k: 880.0,
        radiogenic_w_m3: 0.01e-6,
    });

    m.insert(Coal, ThermalProfile {
        conductivity_w_m_k: 0.3,
        heat_capacity_j_kg_k: 1300.0,
        radiogenic_w_m3: 0.1e-6,
    });

    m
});

/// Fallback used for lithology names the tables do not know (shale-like, since
/// undifferentiated basin fill is mud-dominated)
pub const DEFAULT_COMPACTION: CompactionProfile = CompactionProfile {
    surface_porosity: 0.56,
    decay_per_m: 3.9e-4,
    grain_density_kg_m3: 2700.0,
};

pub const DEFAULT_THERMAL: ThermalProfile = ThermalProfile {
    conductivity_w_m_k: 2.0,
    heat_capacity_j_kg_k: 860.0,
    radiogenic_w_m3: 1.0e-6,
};

pub fn compaction_profile(kind: LithologyType) -> &'static CompactionProfile {
    COMPACTION_PROFILES.get(&kind).unwrap_or(&DEFAULT_COMPACTION)
}

pub fn thermal_profile(kind: LithologyType) -> &'static ThermalProfile {
    THERMAL_PROFILES.get(&kind).unwrap_or(&DEFAULT_THERMAL)
}

/// Resolve a caller-supplied lithology name, falling back to the default
/// profile set on anything unrecognized. Never fails.
pub fn resolve_lithology(name: &str) -> (LithologyType, &'static CompactionProfile, &'static ThermalProfile) {
    match LithologyType::from_name(name) {
        Some(kind) => (kind, compaction_profile(kind), thermal_profile(kind)),
        None => {
            warn!(lithology = name, "unknown lithology, using default profile");
            (LithologyType::Unclassified, &DEFAULT_COMPACTION, &DEFAULT_THERMAL)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_idempotent() {
        let a = compaction_profile(LithologyType::Sandstone);
        let b = compaction_profile(LithologyType::Sandstone);
        assert_eq!(a.surface_porosity, b.surface_porosity);
        assert_eq!(a.decay_per_m, b.decay_per_m);

        let t1 = thermal_profile(LithologyType::Shale);
        let t2 = thermal_profile(LithologyType::Shale);
        assert_eq!(t1.conductivity_w_m_k, t2.conductivity_w_m_k);
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        let (kind, compaction, thermal) = resolve_lithology("kryptonite");
        assert_eq!(kind, LithologyType::Unclassified);
        assert_eq!(compaction.surface_porosity, DEFAULT_COMPACTION.surface_porosity);
        assert_eq!(thermal.conductivity_w_m_k, DEFAULT_THERMAL.conductivity_w_m_k);
    }

    #[test]
    fn name_aliases_resolve() {
        assert_eq!(LithologyType::from_name("Sand"), Some(LithologyType::Sandstone));
        assert_eq!(LithologyType::from_name("mudstone"), Some(LithologyType::Shale));
        assert_eq!(LithologyType::from_name("halite"), Some(LithologyType::Salt));
        assert_eq!(LithologyType::from_name("granite"), None);
    }

    #[test]
    fn every_lithology_has_physical_parameters() {
        for kind in [
            LithologyType::Sandstone,
            LithologyType::Shale,
            LithologyType::Limestone,
            LithologyType::Siltstone,
            LithologyType::Salt,
            LithologyType::Coal,
            LithologyType::Unclassified,
        ] {
            let c = compaction_profile(kind);
            assert!(c.surface_porosity > 0.0 && c.surface_porosity < 1.0);
            assert!(c.decay_per_m > 0.0);
            assert!(c.grain_density_kg_m3 > 1000.0);

            let t = thermal_profile(kind);
            assert!(t.conductivity_w_m_k > 0.0);
            assert!(t.heat_capacity_j_kg_k > 0.0);
            assert!(t.radiogenic_w_m3 >= 0.0);
        }
    }
}
