//! Board areas and the rules binding their geographic and economic attributes.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::unit::{InvalidUnitType, UnitType};

/// Geographic and economic attributes of an area.
///
/// `control_income` is what a country earns for controlling both the province
/// and its city (seas give 0). `garrison_income` is what an unbesieged
/// garrison earns without controlling the province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaAttributes {
    #[serde(default)]
    pub is_sea: bool,
    #[serde(default)]
    pub is_coast: bool,
    #[serde(default)]
    pub has_city: bool,
    #[serde(default)]
    pub is_fortified: bool,
    #[serde(default)]
    pub has_port: bool,
    /// A sea province that can be controlled but cannot hold an army.
    #[serde(default)]
    pub mixed: bool,
    #[serde(default = "default_control_income")]
    pub control_income: u32,
    #[serde(default)]
    pub garrison_income: u32,
}

const fn default_control_income() -> u32 {
    1
}

impl Default for AreaAttributes {
    /// A plain land province: no city, one ducat of control income.
    fn default() -> Self {
        Self {
            is_sea: false,
            is_coast: false,
            has_city: false,
            is_fortified: false,
            has_port: false,
            mixed: false,
            control_income: default_control_income(),
            garrison_income: 0,
        }
    }
}

/// A rule of the area attribute checker that an attribute set failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum AreaRule {
    #[error("an area without a city cannot be fortified")]
    FortifiedWithoutCity,
    #[error("an area without a city cannot have a port")]
    PortWithoutCity,
    #[error("the control income for an area without city must be 1")]
    ControlIncomeWithoutCity,
    #[error("the garrison income for an area without city must be 0")]
    GarrisonIncomeWithoutCity,
    #[error("the control income for an area with a city must be 2 or higher")]
    CityControlIncomeTooLow,
    #[error("an area cannot be sea and coast at the same time")]
    SeaIsCoast,
    #[error("there cannot be a city in a sea area")]
    SeaHasCity,
    #[error("the control income for a sea area must be 0")]
    SeaControlIncome,
    #[error("an area cannot be sea and mixed at the same time")]
    SeaIsMixed,
    #[error("the minimum control income for land areas is 1")]
    LandControlIncomeTooLow,
    #[error("an area must be a coast to have a port")]
    PortWithoutCoast,
    #[error(
        "for an area with a fortified city, the control income must be the garrison income + 1"
    )]
    FortifiedIncomeMismatch,
}

impl AreaRule {
    /// Stable snake_case identifier of the rule.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FortifiedWithoutCity => "fortified_without_city",
            Self::PortWithoutCity => "port_without_city",
            Self::ControlIncomeWithoutCity => "control_income_without_city",
            Self::GarrisonIncomeWithoutCity => "garrison_income_without_city",
            Self::CityControlIncomeTooLow => "city_control_income_too_low",
            Self::SeaIsCoast => "sea_is_coast",
            Self::SeaHasCity => "sea_has_city",
            Self::SeaControlIncome => "sea_control_income",
            Self::SeaIsMixed => "sea_is_mixed",
            Self::LandControlIncomeTooLow => "land_control_income_too_low",
            Self::PortWithoutCoast => "port_without_coast",
            Self::FortifiedIncomeMismatch => "fortified_income_mismatch",
        }
    }
}

/// Check an attribute set against every area rule.
///
/// All rules are evaluated; the result lists each failing rule once, in rule
/// order. An empty result means the combination is valid.
#[must_use]
pub fn check_area_attributes(attrs: &AreaAttributes) -> Vec<AreaRule> {
    let mut failed = Vec::new();

    if attrs.has_city {
        if attrs.control_income < 2 {
            failed.push(AreaRule::CityControlIncomeTooLow);
        }
    } else {
        if attrs.is_fortified {
            failed.push(AreaRule::FortifiedWithoutCity);
        }
        if attrs.has_port {
            failed.push(AreaRule::PortWithoutCity);
        }
        // Seas have no city and earn nothing; the land rule below covers 0.
        if attrs.control_income > 1 {
            failed.push(AreaRule::ControlIncomeWithoutCity);
        }
        if attrs.garrison_income != 0 {
            failed.push(AreaRule::GarrisonIncomeWithoutCity);
        }
    }

    if attrs.is_sea {
        if attrs.is_coast {
            failed.push(AreaRule::SeaIsCoast);
        }
        if attrs.has_city {
            failed.push(AreaRule::SeaHasCity);
        }
        if attrs.control_income != 0 {
            failed.push(AreaRule::SeaControlIncome);
        }
        if attrs.mixed {
            failed.push(AreaRule::SeaIsMixed);
        }
    } else if attrs.control_income < 1 {
        failed.push(AreaRule::LandControlIncomeTooLow);
    }

    if !attrs.is_coast && attrs.has_port {
        failed.push(AreaRule::PortWithoutCoast);
    }

    if attrs.is_fortified
        && i64::from(attrs.control_income) - i64::from(attrs.garrison_income) != 1
    {
        failed.push(AreaRule::FortifiedIncomeMismatch);
    }

    failed
}

impl AreaAttributes {
    /// Whether a unit of the given type can be built here.
    #[must_use]
    pub const fn build_possible(&self, unit: UnitType) -> bool {
        match unit {
            UnitType::Army => !(self.is_sea || self.mixed),
            UnitType::Fleet => self.has_port,
            UnitType::Garrison => self.is_fortified,
        }
    }

    /// Whether a unit of the given type can stay here.
    #[must_use]
    pub const fn accepts_type(&self, unit: UnitType) -> bool {
        match unit {
            UnitType::Army => !(self.is_sea || self.mixed),
            UnitType::Fleet => self.is_sea || self.is_coast,
            UnitType::Garrison => self.is_fortified,
        }
    }

    /// [`Self::build_possible`] for a raw unit code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUnitType`] if `code` is not `A`, `F` or `G`.
    pub fn build_possible_code(&self, code: &str) -> Result<bool, InvalidUnitType> {
        Ok(self.build_possible(code.parse()?))
    }

    /// [`Self::accepts_type`] for a raw unit code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUnitType`] if `code` is not `A`, `F` or `G`.
    pub fn accepts_type_code(&self, code: &str) -> Result<bool, InvalidUnitType> {
        Ok(self.accepts_type(code.parse()?))
    }
}

/// A board area of a setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// 1-5 characters identifying the area within its setting.
    pub code: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: AreaAttributes,
    /// Only meaningful in settings that play with religious wars.
    #[serde(default)]
    pub religion: Option<String>,
}

impl Area {
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        attributes: AreaAttributes,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            attributes,
            religion: None,
        }
    }

    #[must_use]
    pub fn with_religion(mut self, religion: impl Into<String>) -> Self {
        self.religion = Some(religion.into());
        self
    }

    #[must_use]
    pub fn check(&self) -> Vec<AreaRule> {
        check_area_attributes(&self.attributes)
    }

    #[must_use]
    pub const fn build_possible(&self, unit: UnitType) -> bool {
        self.attributes.build_possible(unit)
    }

    #[must_use]
    pub const fn accepts_type(&self, unit: UnitType) -> bool {
        self.attributes.accepts_type(unit)
    }
}
