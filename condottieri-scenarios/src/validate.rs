//! Whole-scenario consistency validation.
//!
//! [`validate_scenario`] re-runs every area and placement rule over a
//! scenario and its setting and collects all violations instead of stopping
//! at the first one. Facts such as "is this area already a home" are
//! recomputed from the full entity set, so the result does not depend on the
//! order entities were created in, and two conflicting entries are both
//! reported.
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

use crate::area::AreaRule;
use crate::board::Setting;
use crate::income::IncomeTable;
use crate::placement::{
    PlacementError, check_city_income, check_disable_area, check_home, check_setup,
};
use crate::scenario::{ContenderId, Scenario};
use crate::unit::UnitType;

/// The record a violation is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum EntityRef {
    Area { code: String },
    Border { from: String, to: String },
    CountryIncome { country: String },
    CityRandomIncome { area: String },
    Scenario { slug: String },
    Contender { contender: ContenderId },
    Home { contender: ContenderId, area: String },
    Setup { contender: ContenderId, area: String, unit_type: UnitType },
    DisabledArea { area: String },
    CityIncome { area: String },
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Area { code } => write!(f, "area {code}"),
            Self::Border { from, to } => write!(f, "border {from}->{to}"),
            Self::CountryIncome { country } => write!(f, "income table of {country}"),
            Self::CityRandomIncome { area } => write!(f, "income table of city {area}"),
            Self::Scenario { slug } => write!(f, "scenario {slug}"),
            Self::Contender { contender } => write!(f, "contender {contender}"),
            Self::Home { contender, area } => write!(f, "home {area} of contender {contender}"),
            Self::Setup {
                contender,
                area,
                unit_type,
            } => write!(f, "{unit_type} in {area} of contender {contender}"),
            Self::DisabledArea { area } => write!(f, "disabled area {area}"),
            Self::CityIncome { area } => write!(f, "city income {area}"),
        }
    }
}

/// What is wrong, with the parameters of its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ViolationKind {
    #[error("{area}: {rule}")]
    AreaAttributeConflict { area: String, rule: AreaRule },
    #[error("{area}: {error}")]
    Placement { area: String, error: PlacementError },
    #[error("the scenario has no autonomous contender")]
    MissingAutonomousContender,
    #[error("contender {0} is a second autonomous contender")]
    DuplicateAutonomousContender(ContenderId),
    #[error("border {from}->{to} has no matching border {to}->{from}")]
    AsymmetricBorder { from: String, to: String, only_land: bool },
    #[error("area '{0}' does not belong to the setting")]
    UnknownArea(String),
    #[error("country '{0}' has no random income table in the setting")]
    MissingIncomeTable(String),
    #[error("income list '{0}' must have 6 comma separated numbers")]
    MalformedIncomeList(String),
    #[error("area code '{0}' is used by more than one area")]
    DuplicateArea(String),
    #[error("border {from}->{to} is listed more than once")]
    DuplicateBorder { from: String, to: String },
    #[error("contender id {0} is used more than once")]
    DuplicateContenderId(ContenderId),
    #[error("country '{0}' has more than one contender")]
    DuplicateContender(String),
    #[error("area '{0}' is listed more than once")]
    DuplicateEntry(String),
}

impl ViolationKind {
    /// Machine-readable identifier of the violation.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AreaAttributeConflict { .. } => "area_attribute_conflict",
            Self::Placement { error, .. } => error.code(),
            Self::MissingAutonomousContender => "missing_autonomous_contender",
            Self::DuplicateAutonomousContender(_) => "duplicate_autonomous_contender",
            Self::AsymmetricBorder { .. } => "asymmetric_border",
            Self::UnknownArea(_) => "unknown_area",
            Self::MissingIncomeTable(_) => "missing_income_table",
            Self::MalformedIncomeList(_) => "malformed_income_list",
            Self::DuplicateArea(_) => "duplicate_area",
            Self::DuplicateBorder { .. } => "duplicate_border",
            Self::DuplicateContenderId(_) => "duplicate_contender_id",
            Self::DuplicateContender(_) => "duplicate_contender",
            Self::DuplicateEntry(_) => "duplicate_entry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub entity: EntityRef,
    pub kind: ViolationKind,
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    #[must_use]
    pub fn new(entity: EntityRef, kind: ViolationKind) -> Self {
        Self {
            code: kind.code(),
            message: kind.to_string(),
            entity,
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.entity, self.message)
    }
}

/// Ordered violations of one validation pass. Empty means consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Number of violations per code.
    #[must_use]
    pub fn counts_by_code(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.code).or_insert(0) += 1;
        }
        counts
    }

    fn push(&mut self, entity: EntityRef, kind: ViolationKind) {
        self.violations.push(Violation::new(entity, kind));
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// Check a scenario and its setting, collecting every violation.
///
/// Order of the report: area attributes, homes, setups, disabled areas, city
/// incomes, the autonomous contender count, border symmetry, references to
/// unknown areas, contenders without an income table, unparsable income
/// lists, and finally repeated entries. Only the second and later copies of a
/// repeated entry are reported. Running it twice on the same data yields the
/// same report.
#[must_use]
pub fn validate_scenario(setting: &Setting, scenario: &Scenario) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut unknown = Vec::new();
    let areas = setting.area_index();

    for area in &setting.areas {
        for rule in area.check() {
            report.push(
                EntityRef::Area {
                    code: area.code.clone(),
                },
                ViolationKind::AreaAttributeConflict {
                    area: area.code.clone(),
                    rule,
                },
            );
        }
    }

    let placement = |area: &str, error: PlacementError| ViolationKind::Placement {
        area: area.to_string(),
        error,
    };

    for contender in &scenario.contenders {
        for home in &contender.homes {
            let entity = EntityRef::Home {
                contender: contender.id,
                area: home.area.clone(),
            };
            let Some(area) = areas.get(home.area.as_str()) else {
                unknown.push((entity, home.area.clone()));
                continue;
            };
            if let Err(error) = check_home(
                contender.country.is_some(),
                area.attributes.is_sea,
                scenario.homes_on(&home.area).count() > 1,
                scenario.is_disabled(&home.area),
            ) {
                report.push(entity, placement(&home.area, error));
            }
        }
    }

    for contender in &scenario.contenders {
        for setup in &contender.setups {
            let entity = EntityRef::Setup {
                contender: contender.id,
                area: setup.area.clone(),
                unit_type: setup.unit_type,
            };
            let Some(area) = areas.get(setup.area.as_str()) else {
                unknown.push((entity, setup.area.clone()));
                continue;
            };
            let same_type = scenario
                .setups_on(&setup.area)
                .filter(|other| other.unit_type == setup.unit_type)
                .count();
            if let Err(error) = check_setup(
                setup.unit_type,
                area.accepts_type(setup.unit_type),
                scenario.is_disabled(&setup.area),
                same_type > 1,
            ) {
                report.push(entity, placement(&setup.area, error));
            }
        }
    }

    for code in &scenario.disabled_areas {
        let entity = EntityRef::DisabledArea { area: code.clone() };
        if !areas.contains_key(code.as_str()) {
            unknown.push((entity, code.clone()));
            continue;
        }
        if let Err(error) = check_disable_area(
            scenario.homes_on(code).next().is_some(),
            scenario.setups_on(code).next().is_some(),
            scenario.has_city_income(code),
        ) {
            report.push(entity, placement(code, error));
        }
    }

    for code in &scenario.city_incomes {
        let entity = EntityRef::CityIncome { area: code.clone() };
        if !areas.contains_key(code.as_str()) {
            unknown.push((entity, code.clone()));
            continue;
        }
        if let Err(error) = check_city_income(scenario.is_disabled(code)) {
            report.push(entity, placement(code, error));
        }
    }

    let mut autonomous = scenario.contenders.iter().filter(|c| c.is_autonomous());
    if autonomous.next().is_none() {
        report.push(
            EntityRef::Scenario {
                slug: scenario.slug.clone(),
            },
            ViolationKind::MissingAutonomousContender,
        );
    }
    for extra in autonomous {
        report.push(
            EntityRef::Contender {
                contender: extra.id,
            },
            ViolationKind::DuplicateAutonomousContender(extra.id),
        );
    }

    for border in setting.border_violations() {
        report.push(
            EntityRef::Border {
                from: border.from.clone(),
                to: border.to.clone(),
            },
            ViolationKind::AsymmetricBorder {
                from: border.from.clone(),
                to: border.to.clone(),
                only_land: border.only_land,
            },
        );
    }

    for (entity, code) in unknown {
        report.push(entity, ViolationKind::UnknownArea(code));
    }

    for contender in &scenario.contenders {
        if let Some(country) = &contender.country
            && !setting.country_incomes.contains_key(country)
        {
            report.push(
                EntityRef::Contender {
                    contender: contender.id,
                },
                ViolationKind::MissingIncomeTable(country.clone()),
            );
        }
    }

    for (country, text) in &setting.country_incomes {
        if IncomeTable::parse(text).is_err() {
            report.push(
                EntityRef::CountryIncome {
                    country: country.clone(),
                },
                ViolationKind::MalformedIncomeList(text.clone()),
            );
        }
    }
    for (city, text) in &setting.city_incomes {
        if IncomeTable::parse(text).is_err() {
            report.push(
                EntityRef::CityRandomIncome { area: city.clone() },
                ViolationKind::MalformedIncomeList(text.clone()),
            );
        }
    }

    check_uniqueness(setting, scenario, &mut report);

    log::debug!(
        "validated scenario {} on {}: {} violation(s)",
        scenario.slug,
        setting.slug,
        report.len()
    );
    report
}

/// Entries loaded from documents bypass the editing operations, so every
/// key those operations keep unique is checked again here.
fn check_uniqueness(setting: &Setting, scenario: &Scenario, report: &mut ValidationReport) {
    let mut codes = BTreeSet::new();
    for area in &setting.areas {
        if !codes.insert(area.code.as_str()) {
            report.push(
                EntityRef::Area {
                    code: area.code.clone(),
                },
                ViolationKind::DuplicateArea(area.code.clone()),
            );
        }
    }

    let mut borders = BTreeSet::new();
    for border in &setting.borders {
        if !borders.insert((border.from.as_str(), border.to.as_str())) {
            report.push(
                EntityRef::Border {
                    from: border.from.clone(),
                    to: border.to.clone(),
                },
                ViolationKind::DuplicateBorder {
                    from: border.from.clone(),
                    to: border.to.clone(),
                },
            );
        }
    }

    let mut ids = BTreeSet::new();
    for contender in &scenario.contenders {
        if !ids.insert(contender.id) {
            report.push(
                EntityRef::Contender {
                    contender: contender.id,
                },
                ViolationKind::DuplicateContenderId(contender.id),
            );
        }
    }

    let mut countries = BTreeSet::new();
    for contender in &scenario.contenders {
        if let Some(country) = &contender.country
            && !countries.insert(country.as_str())
        {
            report.push(
                EntityRef::Contender {
                    contender: contender.id,
                },
                ViolationKind::DuplicateContender(country.clone()),
            );
        }
    }

    let mut disabled = BTreeSet::new();
    for code in &scenario.disabled_areas {
        if !disabled.insert(code.as_str()) {
            report.push(
                EntityRef::DisabledArea { area: code.clone() },
                ViolationKind::DuplicateEntry(code.clone()),
            );
        }
    }

    let mut city_incomes = BTreeSet::new();
    for code in &scenario.city_incomes {
        if !city_incomes.insert(code.as_str()) {
            report.push(
                EntityRef::CityIncome { area: code.clone() },
                ViolationKind::DuplicateEntry(code.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Area, AreaAttributes};
    use crate::board::Border;
    use crate::scenario::{Contender, Home, Setup};

    fn fortified_city() -> AreaAttributes {
        AreaAttributes {
            is_coast: true,
            has_city: true,
            is_fortified: true,
            has_port: true,
            control_income: 3,
            garrison_income: 2,
            ..AreaAttributes::default()
        }
    }

    fn setting() -> Setting {
        let mut setting = Setting::new("Italy");
        setting
            .add_area(Area::new("GEN", "Genoa", fortified_city()))
            .unwrap();
        setting
            .add_area(Area::new("LUC", "Lucca", AreaAttributes::default()))
            .unwrap();
        setting.add_border("GEN", "LUC", false).unwrap();
        setting.set_country_income("genoa", IncomeTable::new([1, 1, 2, 2, 3, 3]));
        setting
    }

    fn codes(report: &ValidationReport) -> Vec<&'static str> {
        report.iter().map(|v| v.code).collect()
    }

    #[test]
    fn consistent_scenario_has_empty_report() {
        let setting = setting();
        let mut scenario = Scenario::new(&setting.slug, "Start", 1454);
        let genoa = scenario.add_contender(&setting, "genoa").unwrap();
        scenario.add_home(&setting, genoa, "GEN", true).unwrap();
        scenario
            .add_setup(&setting, genoa, "GEN", UnitType::Garrison)
            .unwrap();
        let report = validate_scenario(&setting, &scenario);
        assert!(report.is_valid(), "{report:?}");
    }

    #[test]
    fn conflicting_homes_are_both_reported() {
        let setting = setting();
        let mut scenario = Scenario::new(&setting.slug, "Start", 1454);
        scenario.contenders.push(Contender {
            country: Some("genoa".to_string()),
            homes: vec![Home {
                area: "LUC".to_string(),
                is_home: true,
            }],
            ..Contender::autonomous(ContenderId(1))
        });
        scenario.contenders.push(Contender {
            country: Some("milan".to_string()),
            homes: vec![Home {
                area: "LUC".to_string(),
                is_home: true,
            }],
            ..Contender::autonomous(ContenderId(2))
        });
        let report = validate_scenario(&setting, &scenario);
        assert_eq!(
            codes(&report),
            vec!["home_already_taken", "home_already_taken", "missing_income_table"]
        );
        assert_eq!(
            report.violations[2].entity,
            EntityRef::Contender {
                contender: ContenderId(2)
            }
        );
    }

    #[test]
    fn accumulates_in_step_order() {
        let mut setting = setting();
        setting.areas.push(Area::new(
            "BAD",
            "Bad",
            AreaAttributes {
                has_port: true,
                ..AreaAttributes::default()
            },
        ));
        setting.borders.push(Border {
            from: "LUC".to_string(),
            to: "BAD".to_string(),
            only_land: true,
        });
        setting
            .city_incomes
            .insert("GEN".to_string(), "1,2,3".to_string());

        let mut scenario = Scenario::new(&setting.slug, "Broken", 1454);
        scenario.contenders[0].setups.push(Setup {
            area: "LUC".to_string(),
            unit_type: UnitType::Garrison,
        });
        scenario.contenders[0].setups.push(Setup {
            area: "XXX".to_string(),
            unit_type: UnitType::Army,
        });
        scenario.contenders.push(Contender::autonomous(ContenderId(7)));
        scenario.disabled_areas.push("GEN".to_string());
        scenario.city_incomes.push("GEN".to_string());

        let report = validate_scenario(&setting, &scenario);
        assert_eq!(
            codes(&report),
            vec![
                "area_attribute_conflict",
                "area_attribute_conflict",
                "wrong_unit_type",
                "area_has_special_income",
                "area_disabled",
                "duplicate_autonomous_contender",
                "asymmetric_border",
                "unknown_area",
                "malformed_income_list",
            ]
        );
        assert_eq!(
            report.violations[0].kind,
            ViolationKind::AreaAttributeConflict {
                area: "BAD".to_string(),
                rule: AreaRule::PortWithoutCity,
            }
        );
        assert_eq!(report.counts_by_code()["area_attribute_conflict"], 2);
    }

    #[test]
    fn repeated_entries_are_reported_after_the_first() {
        let mut setting = setting();
        setting.set_country_income("milan", IncomeTable::new([1, 1, 1, 2, 2, 2]));
        setting.areas.push(Area::new(
            "LUC",
            "Lucca Sea",
            AreaAttributes {
                is_sea: true,
                control_income: 0,
                ..AreaAttributes::default()
            },
        ));
        setting.borders.push(Border {
            from: "GEN".to_string(),
            to: "LUC".to_string(),
            only_land: false,
        });

        let mut scenario = Scenario::new(&setting.slug, "Loaded", 1454);
        for (id, country) in [(1, "genoa"), (2, "genoa"), (2, "milan")] {
            scenario.contenders.push(Contender {
                country: Some(country.to_string()),
                ..Contender::autonomous(ContenderId(id))
            });
        }
        scenario.disabled_areas.push("LUC".to_string());
        scenario.disabled_areas.push("LUC".to_string());
        scenario.city_incomes.push("GEN".to_string());
        scenario.city_incomes.push("GEN".to_string());

        let report = validate_scenario(&setting, &scenario);
        assert_eq!(
            codes(&report),
            vec![
                "duplicate_area",
                "duplicate_border",
                "duplicate_contender_id",
                "duplicate_contender",
                "duplicate_entry",
                "duplicate_entry",
            ]
        );
        assert_eq!(
            report.violations[2].entity,
            EntityRef::Contender {
                contender: ContenderId(2)
            }
        );
        assert_eq!(
            report.violations[3].kind,
            ViolationKind::DuplicateContender("genoa".to_string())
        );
        assert_eq!(
            report.violations[5].entity,
            EntityRef::CityIncome {
                area: "GEN".to_string()
            }
        );
        assert_eq!(
            report.violations[0].message,
            "area code 'LUC' is used by more than one area"
        );
    }

    #[test]
    fn missing_autonomous_contender() {
        let setting = setting();
        let mut scenario = Scenario::new(&setting.slug, "Start", 1454);
        scenario.contenders.clear();
        let report = validate_scenario(&setting, &scenario);
        assert_eq!(codes(&report), vec!["missing_autonomous_contender"]);
        assert_eq!(
            report.violations[0].to_string(),
            "[missing_autonomous_contender] scenario start: \
             the scenario has no autonomous contender"
        );
    }

    #[test]
    fn messages_carry_parameters() {
        let violation = Violation::new(
            EntityRef::Setup {
                contender: ContenderId(1),
                area: "LUC".to_string(),
                unit_type: UnitType::Garrison,
            },
            ViolationKind::Placement {
                area: "LUC".to_string(),
                error: PlacementError::WrongUnitType(UnitType::Garrison),
            },
        );
        assert_eq!(violation.code, "wrong_unit_type");
        assert_eq!(violation.message, "LUC: a Garrison is not allowed in this area");
        assert_eq!(
            violation.to_string(),
            "[wrong_unit_type] Garrison in LUC of contender #1: \
             LUC: a Garrison is not allowed in this area"
        );
    }
}
