//! Placement rules for homes, initial setups, disabled areas and city incomes.
//!
//! Every check is a pure decision over facts the caller gathered from the
//! current scenario state. Checks stop at the first failing condition, in the
//! priority order documented on each function.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unit::UnitType;

/// Why a single placement attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum PlacementError {
    #[error("you cannot define an autonomous home")]
    HomeIsAutonomous,
    #[error("a sea area cannot be controlled")]
    AreaNotAllowed,
    #[error("this area is disabled")]
    AreaDisabled,
    #[error("this area is already controlled by another country")]
    HomeAlreadyTaken,
    #[error("a {0} is not allowed in this area")]
    WrongUnitType(UnitType),
    #[error("you cannot place two units of the same type on the same area")]
    AreaOccupied,
    #[error("selected area is controlled by a country")]
    AreaControlledByCountry,
    #[error("selected area is occupied by one or more units")]
    AreaOccupiedByUnits,
    #[error("selected area has special income")]
    AreaHasSpecialIncome,
}

impl PlacementError {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::HomeIsAutonomous => "home_is_autonomous",
            Self::AreaNotAllowed => "area_not_allowed",
            Self::AreaDisabled => "area_disabled",
            Self::HomeAlreadyTaken => "home_already_taken",
            Self::WrongUnitType(_) => "wrong_unit_type",
            Self::AreaOccupied => "area_occupied",
            Self::AreaControlledByCountry => "area_controlled_by_country",
            Self::AreaOccupiedByUnits => "area_occupied_by_units",
            Self::AreaHasSpecialIncome => "area_has_special_income",
        }
    }
}

/// Decide whether an area may become a home of a contender.
///
/// # Errors
///
/// In priority order: [`PlacementError::HomeIsAutonomous`] when the contender
/// has no country, [`PlacementError::AreaNotAllowed`] for a sea,
/// [`PlacementError::AreaDisabled`] when the area is disabled in the scenario
/// and [`PlacementError::HomeAlreadyTaken`] when another contender already
/// holds it.
pub const fn check_home(
    contender_has_country: bool,
    area_is_sea: bool,
    area_already_home: bool,
    area_disabled: bool,
) -> Result<(), PlacementError> {
    if !contender_has_country {
        return Err(PlacementError::HomeIsAutonomous);
    }
    if area_is_sea {
        return Err(PlacementError::AreaNotAllowed);
    }
    if area_disabled {
        return Err(PlacementError::AreaDisabled);
    }
    if area_already_home {
        return Err(PlacementError::HomeAlreadyTaken);
    }
    Ok(())
}

/// Decide whether an initial unit may be placed on an area.
///
/// Type acceptance is checked before occupancy.
///
/// # Errors
///
/// In priority order: [`PlacementError::WrongUnitType`],
/// [`PlacementError::AreaDisabled`] and [`PlacementError::AreaOccupied`].
pub const fn check_setup(
    unit_type: UnitType,
    area_accepts_type: bool,
    area_disabled: bool,
    area_has_setup_of_type: bool,
) -> Result<(), PlacementError> {
    if !area_accepts_type {
        return Err(PlacementError::WrongUnitType(unit_type));
    }
    if area_disabled {
        return Err(PlacementError::AreaDisabled);
    }
    if area_has_setup_of_type {
        return Err(PlacementError::AreaOccupied);
    }
    Ok(())
}

/// Decide whether an area may be disabled for a scenario.
///
/// # Errors
///
/// In priority order: [`PlacementError::AreaControlledByCountry`] when a home
/// sits on the area, [`PlacementError::AreaOccupiedByUnits`] when any setup
/// does, and [`PlacementError::AreaHasSpecialIncome`] when it is a city income.
pub const fn check_disable_area(
    area_has_home: bool,
    area_has_setup: bool,
    area_has_city_income: bool,
) -> Result<(), PlacementError> {
    if area_has_home {
        return Err(PlacementError::AreaControlledByCountry);
    }
    if area_has_setup {
        return Err(PlacementError::AreaOccupiedByUnits);
    }
    if area_has_city_income {
        return Err(PlacementError::AreaHasSpecialIncome);
    }
    Ok(())
}

/// Decide whether a city may give special income in a scenario.
///
/// # Errors
///
/// Returns [`PlacementError::AreaDisabled`] if the area is disabled.
pub const fn check_city_income(area_is_disabled: bool) -> Result<(), PlacementError> {
    if area_is_disabled {
        return Err(PlacementError::AreaDisabled);
    }
    Ok(())
}
