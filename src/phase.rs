// src/phase.rs - Generated-fluid phase from maturity and kerogen type

use serde::{Deserialize, Serialize};

use crate::kinetics::KerogenType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FluidPhase {
    Immature,
    Oil,
    Condensate,
    Gas,
    DryGas,
    Overmature,
}

impl FluidPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FluidPhase::Immature => "immature",
            FluidPhase::Oil => "oil",
            FluidPhase::Condensate => "condensate",
            FluidPhase::Gas => "gas",
            FluidPhase::DryGas => "dry_gas",
            FluidPhase::Overmature => "overmature",
        }
    }
}

/// Classify the fluid a source rock generates at reflectance `ro`. Total over
/// ro ∈ [0, ∞): anything below the oil window is Immature. Type III kerogen
/// runs a gas-biased window, with a narrower oil leg and earlier gas onset than
/// the oil-prone types.
pub fn fluid_phase(ro: f64, kerogen: KerogenType) -> FluidPhase {
    match kerogen {
        KerogenType::Type1 | KerogenType::Type2 => match ro {
            r if r < 0.6 => FluidPhase::Immature,
            r if r < 1.0 => FluidPhase::Oil,
            r if r < 1.3 => FluidPhase::Condensate,
            r if r < 2.6 => FluidPhase::Gas,
            r if r < 4.0 => FluidPhase::DryGas,
            _ => FluidPhase::Overmature,
        },
        KerogenType::Type3 => match ro {
            r if r < 0.6 => FluidPhase::Immature,
            r if r < 0.8 => FluidPhase::Oil,
            r if r < 1.1 => FluidPhase::Condensate,
            r if r < 3.0 => FluidPhase::Gas,
            r if r < 4.0 => FluidPhase::DryGas,
            _ => FluidPhase::Overmature,
        },
    }
}
