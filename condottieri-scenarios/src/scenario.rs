//! Scenarios: the starting position of a game on a setting.
//!
//! A [`Scenario`] groups its contenders (one per country plus a single
//! autonomous contender), their homes, initial units and treasuries, the
//! areas disabled for the scenario and the cities that give extra income.
//!
//! Editing goes through explicit operations that gather the current facts,
//! run the matching placement check and only mutate on success. Documents
//! loaded from storage skip those operations, which is why
//! [`crate::validate::validate_scenario`] re-checks everything.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::area::Area;
use crate::board::Setting;
use crate::constants::{AUTONOMOUS_LABEL, SCENARIO_SLUG_MAX_LEN};
use crate::placement::{
    PlacementError, check_city_income, check_disable_area, check_home, check_setup,
};
use crate::slug::{slugify, unique_slug};
use crate::unit::UnitType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("scenario belongs to setting '{expected}', not '{found}'")]
    SettingMismatch { expected: String, found: String },
    #[error("no contender with id {0}")]
    UnknownContender(ContenderId),
    #[error("area '{0}' does not belong to the scenario's setting")]
    UnknownArea(String),
    #[error("country '{0}' already has a contender in this scenario")]
    DuplicateContender(String),
    #[error("country '{0}' has no random income table in this setting")]
    MissingIncomeTable(String),
    #[error("area '{0}' is already listed")]
    AlreadyListed(String),
    #[error("area '{0}' has no city")]
    NotACity(String),
    #[error("no contender id is left after {0}")]
    ContenderIdsExhausted(ContenderId),
    #[error("area {area}: {source}")]
    Placement {
        area: String,
        source: PlacementError,
    },
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ContenderId(pub u32);

impl fmt::Display for ContenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Starting ducats of a contender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    pub ducats: u32,
    /// Random income is doubled for this contender.
    #[serde(default)]
    pub double: bool,
}

const fn default_is_home() -> bool {
    true
}

/// An area controlled by a contender at the start of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub area: String,
    /// `false` for a controlled province outside the home country.
    #[serde(default = "default_is_home")]
    pub is_home: bool,
}

/// An initial unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setup {
    pub area: String,
    pub unit_type: UnitType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contender {
    pub id: ContenderId,
    /// Country static name; `None` for the autonomous contender.
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub treasury: Option<Treasury>,
    #[serde(default)]
    pub homes: Vec<Home>,
    #[serde(default)]
    pub setups: Vec<Setup>,
}

impl Contender {
    #[must_use]
    pub const fn autonomous(id: ContenderId) -> Self {
        Self {
            id,
            country: None,
            priority: 0,
            treasury: None,
            homes: Vec::new(),
            setups: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_autonomous(&self) -> bool {
        self.country.is_none()
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.country.as_deref().unwrap_or(AUTONOMOUS_LABEL)
    }
}

impl fmt::Display for Contender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What one country starts the game with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContenderSummary<'a> {
    pub country: &'a str,
    pub homes: Vec<&'a str>,
    pub setups: Vec<&'a Setup>,
    pub ducats: u32,
    pub double: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub designer: Option<String>,
    /// Slug of the setting the scenario is played on.
    pub setting: String,
    pub start_year: u32,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub contenders: Vec<Contender>,
    /// Codes of the areas not used in this scenario.
    #[serde(default)]
    pub disabled_areas: Vec<String>,
    /// Codes of the cities giving special income.
    #[serde(default)]
    pub city_incomes: Vec<String>,
}

impl Scenario {
    /// Create a scenario with its autonomous contender.
    #[must_use]
    pub fn new(setting: impl Into<String>, title: impl Into<String>, start_year: u32) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title, SCENARIO_SLUG_MAX_LEN),
            title,
            description: String::new(),
            designer: None,
            setting: setting.into(),
            start_year,
            enabled: false,
            contenders: vec![Contender::autonomous(ContenderId(0))],
            disabled_areas: Vec::new(),
            city_incomes: Vec::new(),
        }
    }

    /// Parse a scenario document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a scenario.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Make the slug unique among `existing` slugs.
    #[must_use]
    pub fn with_unique_slug(mut self, existing: &BTreeSet<String>) -> Self {
        self.slug = unique_slug(&self.slug, existing, SCENARIO_SLUG_MAX_LEN);
        self
    }

    #[must_use]
    pub fn contender(&self, id: ContenderId) -> Option<&Contender> {
        self.contenders.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn contender_for(&self, country: &str) -> Option<&Contender> {
        self.contenders
            .iter()
            .find(|c| c.country.as_deref() == Some(country))
    }

    fn contender_mut(&mut self, id: ContenderId) -> Result<&mut Contender, ScenarioError> {
        self.contenders
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(ScenarioError::UnknownContender(id))
    }

    fn next_contender_id(&self) -> Result<ContenderId, ScenarioError> {
        let Some(last) = self.contenders.iter().map(|c| c.id).max() else {
            return Ok(ContenderId::default());
        };
        last.0
            .checked_add(1)
            .map(ContenderId)
            .ok_or(ScenarioError::ContenderIdsExhausted(last))
    }

    fn resolve_area<'s>(
        &self,
        setting: &'s Setting,
        code: &str,
    ) -> Result<&'s Area, ScenarioError> {
        if setting.slug != self.setting {
            return Err(ScenarioError::SettingMismatch {
                expected: self.setting.clone(),
                found: setting.slug.clone(),
            });
        }
        setting
            .area(code)
            .ok_or_else(|| ScenarioError::UnknownArea(code.to_string()))
    }

    /// Add a contender for a country.
    ///
    /// # Errors
    ///
    /// Fails if the country already takes part or has no random income table
    /// in the setting.
    pub fn add_contender(
        &mut self,
        setting: &Setting,
        country: &str,
    ) -> Result<ContenderId, ScenarioError> {
        if self.contender_for(country).is_some() {
            return Err(ScenarioError::DuplicateContender(country.to_string()));
        }
        if !setting.country_incomes.contains_key(country) {
            log::debug!("{}: no income table for {country}", self.slug);
            return Err(ScenarioError::MissingIncomeTable(country.to_string()));
        }
        let id = self.next_contender_id()?;
        self.contenders.push(Contender {
            country: Some(country.to_string()),
            ..Contender::autonomous(id)
        });
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`ScenarioError::UnknownContender`] for an unknown id.
    pub fn set_treasury(
        &mut self,
        contender: ContenderId,
        ducats: u32,
        double: bool,
    ) -> Result<(), ScenarioError> {
        self.contender_mut(contender)?.treasury = Some(Treasury { ducats, double });
        Ok(())
    }

    // Occupancy facts -----------------------------------------------------

    #[must_use]
    pub fn is_disabled(&self, area: &str) -> bool {
        self.disabled_areas.iter().any(|code| code == area)
    }

    #[must_use]
    pub fn has_city_income(&self, area: &str) -> bool {
        self.city_incomes.iter().any(|code| code == area)
    }

    /// Homes on `area` across all contenders.
    pub fn homes_on<'a>(&'a self, area: &'a str) -> impl Iterator<Item = &'a Home> + 'a {
        self.contenders
            .iter()
            .flat_map(|c| c.homes.iter())
            .filter(move |home| home.area == area)
    }

    /// Setups on `area` across all contenders.
    pub fn setups_on<'a>(&'a self, area: &'a str) -> impl Iterator<Item = &'a Setup> + 'a {
        self.contenders
            .iter()
            .flat_map(|c| c.setups.iter())
            .filter(move |setup| setup.area == area)
    }

    fn placement_error(area: &str, source: PlacementError) -> ScenarioError {
        log::debug!("placement on {area} refused: {source}");
        ScenarioError::Placement {
            area: area.to_string(),
            source,
        }
    }

    // Editing -------------------------------------------------------------

    /// Give `area` to a contender as a home.
    ///
    /// # Errors
    ///
    /// Fails for an unknown contender or area, or with the first failing
    /// home placement rule.
    pub fn add_home(
        &mut self,
        setting: &Setting,
        contender: ContenderId,
        area: &str,
        is_home: bool,
    ) -> Result<(), ScenarioError> {
        let target = self.resolve_area(setting, area)?;
        let has_country = self
            .contender(contender)
            .ok_or(ScenarioError::UnknownContender(contender))?
            .country
            .is_some();
        check_home(
            has_country,
            target.attributes.is_sea,
            self.homes_on(area).next().is_some(),
            self.is_disabled(area),
        )
        .map_err(|err| Self::placement_error(area, err))?;

        self.contender_mut(contender)?.homes.push(Home {
            area: area.to_string(),
            is_home,
        });
        Ok(())
    }

    /// Place an initial unit for a contender.
    ///
    /// # Errors
    ///
    /// Fails for an unknown contender or area, or with the first failing
    /// setup placement rule.
    pub fn add_setup(
        &mut self,
        setting: &Setting,
        contender: ContenderId,
        area: &str,
        unit_type: UnitType,
    ) -> Result<(), ScenarioError> {
        let target = self.resolve_area(setting, area)?;
        if self.contender(contender).is_none() {
            return Err(ScenarioError::UnknownContender(contender));
        }
        check_setup(
            unit_type,
            target.accepts_type(unit_type),
            self.is_disabled(area),
            self.setups_on(area).any(|s| s.unit_type == unit_type),
        )
        .map_err(|err| Self::placement_error(area, err))?;

        self.contender_mut(contender)?.setups.push(Setup {
            area: area.to_string(),
            unit_type,
        });
        Ok(())
    }

    /// Take an area out of play for this scenario.
    ///
    /// # Errors
    ///
    /// Fails for an unknown or already disabled area, or when a home, a unit
    /// or a city income still uses it.
    pub fn disable_area(&mut self, setting: &Setting, area: &str) -> Result<(), ScenarioError> {
        self.resolve_area(setting, area)?;
        if self.is_disabled(area) {
            return Err(ScenarioError::AlreadyListed(area.to_string()));
        }
        check_disable_area(
            self.homes_on(area).next().is_some(),
            self.setups_on(area).next().is_some(),
            self.has_city_income(area),
        )
        .map_err(|err| Self::placement_error(area, err))?;

        self.disabled_areas.push(area.to_string());
        Ok(())
    }

    /// Make a city give special income in this scenario.
    ///
    /// # Errors
    ///
    /// Fails for an unknown area, an area without a city, a city already
    /// listed, or a disabled area.
    pub fn add_city_income(&mut self, setting: &Setting, area: &str) -> Result<(), ScenarioError> {
        let target = self.resolve_area(setting, area)?;
        if !target.attributes.has_city {
            return Err(ScenarioError::NotACity(area.to_string()));
        }
        if self.has_city_income(area) {
            return Err(ScenarioError::AlreadyListed(area.to_string()));
        }
        check_city_income(self.is_disabled(area))
            .map_err(|err| Self::placement_error(area, err))?;

        self.city_incomes.push(area.to_string());
        Ok(())
    }

    // Views ---------------------------------------------------------------

    /// Contenders playing a country.
    #[must_use]
    pub fn number_of_players(&self) -> usize {
        self.contenders.iter().filter(|c| !c.is_autonomous()).count()
    }

    #[must_use]
    pub fn autonomous(&self) -> Option<&Contender> {
        self.contenders.iter().find(|c| c.is_autonomous())
    }

    /// Units that start the game without a country.
    #[must_use]
    pub fn autonomous_setups(&self) -> Vec<&Setup> {
        self.contenders
            .iter()
            .filter(|c| c.is_autonomous())
            .flat_map(|c| c.setups.iter())
            .collect()
    }

    /// Names of the disabled areas, in listing order.
    #[must_use]
    pub fn disabled_list<'s>(&self, setting: &'s Setting) -> Vec<&'s str> {
        self.disabled_areas
            .iter()
            .filter_map(|code| setting.area(code))
            .map(|area| area.name.as_str())
            .collect()
    }

    /// Cities giving special income.
    #[must_use]
    pub fn major_cities<'s>(&self, setting: &'s Setting) -> Vec<&'s Area> {
        self.city_incomes
            .iter()
            .filter_map(|code| setting.area(code))
            .collect()
    }

    /// Starting homes, units and treasury of every country, in country order.
    #[must_use]
    pub fn setup_summary(&self) -> Vec<ContenderSummary<'_>> {
        let mut summary: Vec<_> = self
            .contenders
            .iter()
            .filter_map(|c| {
                let country = c.country.as_deref()?;
                let treasury = c.treasury.unwrap_or_default();
                Some(ContenderSummary {
                    country,
                    homes: c.homes.iter().map(|h| h.area.as_str()).collect(),
                    setups: c.setups.iter().collect(),
                    ducats: treasury.ducats,
                    double: treasury.double,
                })
            })
            .collect();
        summary.sort_by(|a, b| a.country.cmp(b.country));
        summary
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
