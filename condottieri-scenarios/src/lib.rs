//! Condottieri Scenarios
//!
//! Domain model and consistency validator for Condottieri scenario data:
//! settings with their areas and borders, scenarios with contenders, homes,
//! initial units, disabled areas and city incomes.
//! This crate performs no I/O; documents come in through [`ScenarioLoader`].

pub mod area;
pub mod board;
pub mod catalog;
pub mod constants;
pub mod disaster;
pub mod income;
pub mod placement;
pub mod scenario;
pub mod slug;
pub mod unit;
pub mod validate;

use std::collections::BTreeMap;

// Re-export commonly used types
pub use area::{Area, AreaAttributes, AreaRule, check_area_attributes};
pub use board::{Border, Configuration, RouteStep, Setting, SettingError, TradeRoute};
pub use catalog::{CatalogError, Country, Religion, SpecialUnit};
pub use disaster::{DisasterCell, DisasterGrids, DisasterKind};
pub use income::{IncomeError, IncomeTable};
pub use placement::{
    PlacementError, check_city_income, check_disable_area, check_home, check_setup,
};
pub use scenario::{
    Contender, ContenderId, ContenderSummary, Home, Scenario, ScenarioError, Setup, Treasury,
};
pub use slug::{slugify, unique_slug};
pub use unit::{InvalidUnitType, UnitType};
pub use validate::{EntityRef, ValidationReport, Violation, ViolationKind, validate_scenario};

/// Trait for abstracting where settings and scenarios are stored
/// Storage-specific implementations should provide this
pub trait ScenarioLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a setting by slug
    ///
    /// # Errors
    ///
    /// Returns an error if the setting cannot be found or parsed.
    fn load_setting(&self, slug: &str) -> Result<Setting, Self::Error>;

    /// Load a scenario by slug
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario cannot be found or parsed.
    fn load_scenario(&self, slug: &str) -> Result<Scenario, Self::Error>;

    /// Slugs of every available scenario, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario listing cannot be read.
    fn scenario_slugs(&self) -> Result<Vec<String>, Self::Error>;
}

/// A validated scenario together with the setting it was checked against.
#[derive(Debug, Clone)]
pub struct ScenarioCheck {
    pub scenario: Scenario,
    pub setting: Setting,
    pub report: ValidationReport,
}

impl ScenarioCheck {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }
}

/// Loads scenarios through a [`ScenarioLoader`] and validates them
pub struct ScenarioEngine<L>
where
    L: ScenarioLoader,
{
    loader: L,
}

impl<L> ScenarioEngine<L>
where
    L: ScenarioLoader,
{
    /// Create a new engine with the provided loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    pub const fn loader(&self) -> &L {
        &self.loader
    }

    /// Load one scenario with its setting and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario or its setting cannot be loaded.
    pub fn check_scenario(&self, slug: &str) -> Result<ScenarioCheck, L::Error> {
        let scenario = self.loader.load_scenario(slug)?;
        let setting = self.loader.load_setting(&scenario.setting)?;
        let report = validate_scenario(&setting, &scenario);
        Ok(ScenarioCheck {
            scenario,
            setting,
            report,
        })
    }

    /// Validate every scenario the loader knows about, in slug order.
    ///
    /// Each setting is loaded once and shared by its scenarios.
    ///
    /// # Errors
    ///
    /// Returns the first load error encountered.
    pub fn check_all(&self) -> Result<Vec<ScenarioCheck>, L::Error> {
        let mut settings: BTreeMap<String, Setting> = BTreeMap::new();
        let mut checks = Vec::new();

        for slug in self.loader.scenario_slugs()? {
            let scenario = self.loader.load_scenario(&slug)?;
            let setting = if let Some(setting) = settings.get(&scenario.setting) {
                setting.clone()
            } else {
                let setting = self.loader.load_setting(&scenario.setting)?;
                settings.insert(scenario.setting.clone(), setting.clone());
                setting
            };
            let report = validate_scenario(&setting, &scenario);
            log::debug!("{slug}: {} violation(s)", report.len());
            checks.push(ScenarioCheck {
                scenario,
                setting,
                report,
            });
        }
        Ok(checks)
    }
}
