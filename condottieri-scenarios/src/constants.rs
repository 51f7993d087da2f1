//! Centralized limits and fixed values for the scenario model.

// Random income -----------------------------------------------------------
/// Highest face of the income die.
pub const DIE_SIDES: u8 = 6;
/// Number of die faces, and therefore entries in every random income table.
pub const DIE_FACES: usize = DIE_SIDES as usize;
/// Largest stored income entry; doubling it must still fit a `u32`.
pub const INCOME_ENTRY_MAX: u32 = u32::MAX / 2;
/// Shape of a normalized (whitespace-stripped) income list.
pub(crate) const INCOME_LIST_PATTERN: &str = r"^([0-9]+,){5}[0-9]+$";

// Slugs -------------------------------------------------------------------
pub(crate) const SETTING_SLUG_MAX_LEN: usize = 50;
pub(crate) const SCENARIO_SLUG_MAX_LEN: usize = 128;
pub(crate) const COUNTRY_SLUG_MAX_LEN: usize = 20;
pub(crate) const RELIGION_SLUG_MAX_LEN: usize = 20;

// Areas -------------------------------------------------------------------
pub(crate) const AREA_CODE_MAX_LEN: usize = 5;

// Countries ---------------------------------------------------------------
pub(crate) const COLOR_HEX_LEN: usize = 6;

// Display -----------------------------------------------------------------
/// Label used for the contender without a country.
pub const AUTONOMOUS_LABEL: &str = "Autonomous";
