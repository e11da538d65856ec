// Physical constants for the basin forward model (SI unless noted)

pub const TO_KELVIN: f64 = 273.15;
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;
pub const SECONDS_PER_MA: f64 = 1.0e6 * SECONDS_PER_YEAR;

// Gas constant in kcal/(mol·K) to match the kcal/mol activation-energy schema
pub const GAS_CONSTANT_KCAL: f64 = 1.987e-3;

// Arrhenius pre-exponential frequency factor (1/s), shared by all kerogen bins
pub const FREQUENCY_FACTOR_PER_S: f64 = 1.0e13;

// Formation-water density used in the bulk-density mix (kg/m³)
pub const WATER_DENSITY_KGM3: f64 = 1030.0;

// Density of generated hydrocarbon fluid used for pore-saturation accounting (kg/m³)
pub const HC_DENSITY_KGM3: f64 = 800.0;

// Pore saturation a source rock retains before expelling the excess
pub const EXPULSION_THRESHOLD_SATURATION: f64 = 0.2;

// Ro at which expulsion accounting switches on (oil-generation onset)
pub const EXPULSION_ONSET_RO: f64 = 0.7;

// default sim settings:
pub const DEFAULT_SURFACE_TEMP_C: f64 = 20.0;
pub const DEFAULT_HEAT_FLOW_MW_M2: f64 = 60.0;
pub const DEFAULT_STEP_MA: f64 = 1.0;

// Vitrinite reflectance bounds: deposition baseline and the physical cap
pub const RO_INITIAL: f64 = 0.2;
pub const RO_MAX: f64 = 4.0;

// Mass fraction of organic carbon assumed for source rocks when the caller
// does not supply one
pub const DEFAULT_TOC_FRACTION: f64 = 0.02;

// Heat-flow gene bounds for calibration (mW/m²)
pub const HEAT_FLOW_MIN_MW_M2: f64 = 30.0;
pub const HEAT_FLOW_MAX_MW_M2: f64 = 150.0;

// Synthetic calibration target used when no observed data is supplied (mW/m²)
pub const SYNTHETIC_TARGET_HEAT_FLOW: f64 = 60.0;

pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - TO_KELVIN
}
