/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for allocation percentages
pub const PERCENT_PRECISION: u32 = 2;

/// Decimal precision for reported ratios
pub const RATIO_PRECISION: u32 = 4;

/// Monthly steps per simulated year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Upper bound on projection and retirement horizons, in years
pub const MAX_HORIZON_YEARS: u32 = 120;

/// Class id assigned to assets carrying no class weights
pub const UNCLASSIFIED_CLASS_ID: &str = "UNCLASSIFIED";
