//! Settings: the board a family of scenarios is played on.
//!
//! A [`Setting`] owns its areas, the borders between them, trade routes,
//! disaster grids and the random income tables of countries and cities.
//! Editing operations keep the setting-level invariants: area attributes are
//! consistent, codes are unique, and borders always exist in both directions.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::area::{Area, AreaRule};
use crate::constants::{AREA_CODE_MAX_LEN, DIE_FACES, SETTING_SLUG_MAX_LEN};
use crate::disaster::{DisasterCell, DisasterGrids, DisasterKind};
use crate::income::{IncomeError, IncomeTable};
use crate::slug::slugify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("area code '{0}' already exists in this setting")]
    DuplicateArea(String),
    #[error("area code '{0}' must be 1-5 characters")]
    InvalidAreaCode(String),
    #[error("area {code} is inconsistent: {}", join_rules(.rules))]
    InvalidArea { code: String, rules: Vec<AreaRule> },
    #[error("area '{0}' does not belong to this setting")]
    UnknownArea(String),
    #[error("area '{0}' cannot border itself")]
    SelfBorder(String),
    #[error("a border between {from} and {to} already exists")]
    DuplicateBorder { from: String, to: String },
    #[error("a trade route needs at least one step")]
    EmptyRoute,
    #[error("area {0} appears twice in the same trade route")]
    DuplicateRouteStep(String),
    #[error("area {area} already has a {kind} cell")]
    DuplicateDisasterCell { kind: DisasterKind, area: String },
    #[error("no trade route id is left after {0}")]
    TradeRouteIdsExhausted(u32),
}

fn join_rules(rules: &[AreaRule]) -> String {
    rules
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Options fixed when a setting is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub religious_war: bool,
    #[serde(default)]
    pub trade_routes: bool,
}

/// A directed border between two areas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Border {
    pub from: String,
    pub to: String,
    /// Land-only borders cannot be crossed by fleets.
    #[serde(default)]
    pub only_land: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    pub area: String,
    #[serde(default)]
    pub is_end: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRoute {
    pub id: u32,
    pub steps: Vec<RouteStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub configuration: Configuration,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub borders: Vec<Border>,
    #[serde(default)]
    pub trade_routes: Vec<TradeRoute>,
    #[serde(default)]
    pub disasters: DisasterGrids,
    /// Stored income lists keyed by country static name.
    #[serde(default)]
    pub country_incomes: BTreeMap<String, String>,
    /// Stored income lists keyed by city area code.
    #[serde(default)]
    pub city_incomes: BTreeMap<String, String>,
}

impl Setting {
    /// Create an empty setting whose slug is derived from `title`.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title, SETTING_SLUG_MAX_LEN),
            title,
            description: String::new(),
            enabled: false,
            configuration: Configuration::default(),
            areas: Vec::new(),
            borders: Vec::new(),
            trade_routes: Vec::new(),
            disasters: DisasterGrids::default(),
            country_incomes: BTreeMap::new(),
            city_incomes: BTreeMap::new(),
        }
    }

    /// Parse a setting document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a setting.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    #[must_use]
    pub fn area(&self, code: &str) -> Option<&Area> {
        self.areas.iter().find(|area| area.code == code)
    }

    /// Areas indexed by code. Later duplicates never shadow the first entry.
    #[must_use]
    pub fn area_index(&self) -> BTreeMap<&str, &Area> {
        let mut index = BTreeMap::new();
        for area in &self.areas {
            index.entry(area.code.as_str()).or_insert(area);
        }
        index
    }

    /// Add an area after checking its code and attributes.
    ///
    /// # Errors
    ///
    /// Returns [`SettingError::InvalidAreaCode`], [`SettingError::DuplicateArea`]
    /// or [`SettingError::InvalidArea`] listing every failing attribute rule.
    pub fn add_area(&mut self, area: Area) -> Result<(), SettingError> {
        let code_len = area.code.chars().count();
        if code_len == 0 || code_len > AREA_CODE_MAX_LEN {
            return Err(SettingError::InvalidAreaCode(area.code));
        }
        if self.area(&area.code).is_some() {
            return Err(SettingError::DuplicateArea(area.code));
        }
        let rules = area.check();
        if !rules.is_empty() {
            log::debug!("rejected area {}: {} rule(s) failed", area.code, rules.len());
            return Err(SettingError::InvalidArea {
                code: area.code,
                rules,
            });
        }
        self.areas.push(area);
        Ok(())
    }

    /// Add a border and its reverse in one step.
    ///
    /// # Errors
    ///
    /// Fails if either area is unknown, the areas are the same, or a border
    /// already links them in either direction.
    pub fn add_border(
        &mut self,
        from: &str,
        to: &str,
        only_land: bool,
    ) -> Result<(), SettingError> {
        for code in [from, to] {
            if self.area(code).is_none() {
                return Err(SettingError::UnknownArea(code.to_string()));
            }
        }
        if from == to {
            return Err(SettingError::SelfBorder(from.to_string()));
        }
        if self.borders.iter().any(|b| {
            (b.from == from && b.to == to) || (b.from == to && b.to == from)
        }) {
            return Err(SettingError::DuplicateBorder {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        self.borders.push(Border {
            from: from.to_string(),
            to: to.to_string(),
            only_land,
        });
        self.borders.push(Border {
            from: to.to_string(),
            to: from.to_string(),
            only_land,
        });
        Ok(())
    }

    /// Whether `to` can be reached from `from` in one move.
    ///
    /// Fleets cannot cross a land-only border, checked in both directions.
    #[must_use]
    pub fn is_adjacent(&self, from: &str, to: &str, fleet: bool) -> bool {
        let between =
            |b: &&Border| (b.from == from && b.to == to) || (b.from == to && b.to == from);
        if fleet && self.borders.iter().filter(between).any(|b| b.only_land) {
            return false;
        }
        self.borders.iter().any(|b| b.from == from && b.to == to)
    }

    /// Borders whose reverse (with the same `only_land` flag) is missing.
    #[must_use]
    pub fn border_violations(&self) -> Vec<&Border> {
        let present: BTreeSet<(&str, &str, bool)> = self
            .borders
            .iter()
            .map(|b| (b.from.as_str(), b.to.as_str(), b.only_land))
            .collect();
        self.borders
            .iter()
            .filter(|b| !present.contains(&(b.to.as_str(), b.from.as_str(), b.only_land)))
            .collect()
    }

    /// Add a trade route through existing areas and return its id.
    ///
    /// # Errors
    ///
    /// Fails on an empty route, an unknown area, an area listed twice, or
    /// when the highest route id is already `u32::MAX`.
    pub fn add_trade_route(&mut self, steps: Vec<RouteStep>) -> Result<u32, SettingError> {
        if steps.is_empty() {
            return Err(SettingError::EmptyRoute);
        }
        let mut seen = BTreeSet::new();
        for step in &steps {
            if self.area(&step.area).is_none() {
                return Err(SettingError::UnknownArea(step.area.clone()));
            }
            if !seen.insert(step.area.as_str()) {
                return Err(SettingError::DuplicateRouteStep(step.area.clone()));
            }
        }
        let id = match self.trade_routes.iter().map(|route| route.id).max() {
            None => 1,
            Some(last) => last
                .checked_add(1)
                .ok_or(SettingError::TradeRouteIdsExhausted(last))?,
        };
        self.trade_routes.push(TradeRoute { id, steps });
        Ok(id)
    }

    pub fn set_country_income(&mut self, country: impl Into<String>, table: IncomeTable) {
        self.country_incomes.insert(country.into(), table.to_string());
    }

    /// # Errors
    ///
    /// Returns [`SettingError::UnknownArea`] if the city is not in this setting.
    pub fn set_city_income(&mut self, city: &str, table: IncomeTable) -> Result<(), SettingError> {
        if self.area(city).is_none() {
            return Err(SettingError::UnknownArea(city.to_string()));
        }
        self.city_incomes.insert(city.to_string(), table.to_string());
        Ok(())
    }

    /// The parsed income table of a country, if one is stored.
    #[must_use]
    pub fn country_income(&self, country: &str) -> Option<Result<IncomeTable, IncomeError>> {
        self.country_incomes
            .get(country)
            .map(|text| IncomeTable::parse(text))
    }

    /// The parsed income table of a city, if one is stored.
    #[must_use]
    pub fn city_income(&self, city: &str) -> Option<Result<IncomeTable, IncomeError>> {
        self.city_incomes.get(city).map(|text| IncomeTable::parse(text))
    }

    /// Ducats a country earns for a die roll.
    ///
    /// A country without a table earns nothing; the gap is logged.
    ///
    /// # Errors
    ///
    /// Returns [`IncomeError::InvalidDie`] for a die outside 1-6 and
    /// [`IncomeError::MalformedIncomeList`] if the stored list is broken.
    pub fn country_random_income(
        &self,
        country: &str,
        die: u8,
        double: bool,
    ) -> Result<u32, IncomeError> {
        if let Some(table) = self.country_income(country) {
            table?.get_ducats(die, double)
        } else {
            log::error!("random income not found for country {country} in {}", self.slug);
            IncomeTable::new([0; DIE_FACES]).get_ducats(die, false)
        }
    }

    /// Ducats a city earns for a die roll.
    ///
    /// A city without a table earns nothing; the gap is logged.
    ///
    /// # Errors
    ///
    /// Same as [`Self::country_random_income`].
    pub fn city_random_income(&self, city: &str, die: u8) -> Result<u32, IncomeError> {
        if let Some(table) = self.city_income(city) {
            table?.get_ducats(die, false)
        } else {
            log::error!("random income not found for city {city} in {}", self.slug);
            IncomeTable::new([0; DIE_FACES]).get_ducats(die, false)
        }
    }

    /// Place an area in a disaster grid.
    ///
    /// # Errors
    ///
    /// Fails if the area is unknown or already has a cell of this kind.
    pub fn add_disaster_cell(
        &mut self,
        kind: DisasterKind,
        area: &str,
        row: u32,
        column: u32,
    ) -> Result<(), SettingError> {
        if self.area(area).is_none() {
            return Err(SettingError::UnknownArea(area.to_string()));
        }
        let grid = self.disasters.grid_mut(kind);
        if grid.contains_key(area) {
            return Err(SettingError::DuplicateDisasterCell {
                kind,
                area: area.to_string(),
            });
        }
        grid.insert(area.to_string(), DisasterCell { row, column });
        Ok(())
    }

    /// Areas struck by a disaster roll on the given row and/or column.
    #[must_use]
    pub fn roll_disaster(
        &self,
        kind: DisasterKind,
        row: Option<u32>,
        column: Option<u32>,
    ) -> Vec<&str> {
        self.disasters.roll(kind, row, column)
    }
}
