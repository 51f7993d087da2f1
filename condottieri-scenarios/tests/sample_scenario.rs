use condottieri_scenarios::{
    Border, Contender, ContenderId, DisasterKind, PlacementError, Scenario, ScenarioError, Setting,
    UnitType, ViolationKind, validate_scenario,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn italy() -> Setting {
    Setting::from_json(include_str!("../../data/settings/italy.json")).unwrap()
}

fn italy_1454() -> Scenario {
    Scenario::from_json(include_str!("../../data/scenarios/italy-1454.json")).unwrap()
}

#[test]
fn sample_scenario_is_consistent() {
    let report = validate_scenario(&italy(), &italy_1454());
    assert!(report.is_valid(), "{:#?}", report.violations);
}

#[test]
fn validation_is_idempotent() {
    let setting = italy();
    let mut scenario = italy_1454();
    scenario.contenders.push(Contender::autonomous(ContenderId(9)));
    scenario.disabled_areas.push("GEN".to_string());

    let first = validate_scenario(&setting, &scenario);
    let second = validate_scenario(&setting, &scenario);
    assert!(!first.is_valid());
    assert_eq!(first, second);
}

#[test]
fn second_autonomous_contender_is_flagged() {
    let setting = italy();
    let mut scenario = italy_1454();
    scenario.contenders.push(Contender::autonomous(ContenderId(4)));
    let report = validate_scenario(&setting, &scenario);
    let kinds: Vec<_> = report.iter().map(|v| v.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![ViolationKind::DuplicateAutonomousContender(ContenderId(4))]
    );
}

#[test]
fn removing_a_reverse_border_breaks_symmetry() {
    let mut setting = italy();
    setting
        .borders
        .retain(|b| !(b.from == "LUC" && b.to == "GEN"));
    let report = validate_scenario(&setting, &italy_1454());
    assert_eq!(report.len(), 1);
    assert_eq!(
        report.violations[0].kind,
        ViolationKind::AsymmetricBorder {
            from: "GEN".to_string(),
            to: "LUC".to_string(),
            only_land: true,
        }
    );
}

#[test]
fn border_flag_mismatch_breaks_symmetry_both_ways() {
    let mut setting = italy();
    for border in &mut setting.borders {
        if border.from == "PAV" && border.to == "GEN" {
            border.only_land = true;
        }
    }
    let report = validate_scenario(&setting, &italy_1454());
    assert_eq!(report.counts_by_code()["asymmetric_border"], 2);
}

#[test]
fn editing_operations_keep_the_scenario_consistent() {
    let setting = italy();
    let mut scenario = italy_1454();
    let genoa = scenario.contender_for("genoa").map(|c| c.id).unwrap();
    let milan = scenario.contender_for("milan").map(|c| c.id).unwrap();

    assert_eq!(
        scenario.add_home(&setting, milan, "GEN", true),
        Err(ScenarioError::Placement {
            area: "GEN".to_string(),
            source: PlacementError::HomeAlreadyTaken,
        })
    );
    assert!(matches!(
        scenario.add_setup(&setting, milan, "PAV", UnitType::Garrison),
        Err(ScenarioError::Placement {
            source: PlacementError::WrongUnitType(UnitType::Garrison),
            ..
        })
    ));
    scenario
        .add_setup(&setting, genoa, "PAV", UnitType::Army)
        .unwrap();
    scenario.add_city_income(&setting, "PIS").unwrap();
    assert!(matches!(
        scenario.disable_area(&setting, "LIG"),
        Err(ScenarioError::Placement {
            source: PlacementError::AreaOccupiedByUnits,
            ..
        })
    ));

    assert!(validate_scenario(&setting, &scenario).is_valid());
}

#[test]
fn derived_views() {
    let setting = italy();
    let scenario = italy_1454();
    assert_eq!(scenario.number_of_players(), 3);
    assert_eq!(scenario.autonomous_setups().len(), 1);
    assert_eq!(scenario.disabled_list(&setting), vec!["Tyrrhenian Sea"]);
    let cities: Vec<_> = scenario
        .major_cities(&setting)
        .into_iter()
        .map(|a| a.code.as_str())
        .collect();
    assert_eq!(cities, vec!["MIL"]);

    let summary = scenario.setup_summary();
    let countries: Vec<_> = summary.iter().map(|s| s.country).collect();
    assert_eq!(countries, vec!["florence", "genoa", "milan"]);
    assert_eq!(summary[1].homes, vec!["GEN", "PAV"]);
    assert_eq!((summary[2].ducats, summary[2].double), (12, true));
}

#[test]
fn board_queries() {
    let setting = italy();
    assert!(setting.is_adjacent("GEN", "LUC", false));
    assert!(!setting.is_adjacent("GEN", "LUC", true));
    assert!(setting.is_adjacent("LIG", "TYR", true));
    assert!(!setting.is_adjacent("MIL", "GEN", false));
    assert!(setting.configuration.trade_routes);
    assert_eq!(setting.trade_routes[0].steps.len(), 3);
    assert_eq!(
        setting.roll_disaster(DisasterKind::Famine, None, Some(1)),
        vec!["LUC", "MIL"]
    );
    assert!(
        setting
            .borders
            .contains(&Border {
                from: "TYR".to_string(),
                to: "LIG".to_string(),
                only_land: false,
            })
    );
}

#[test]
fn random_income_from_the_sample_setting() {
    let setting = italy();
    assert_eq!(setting.country_random_income("milan", 5, false), Ok(4));
    assert_eq!(setting.country_random_income("milan", 5, true), Ok(8));
    assert_eq!(setting.city_random_income("PIS", 3), Ok(1));
    assert_eq!(setting.country_random_income("venice", 3, false), Ok(0));

    let table = setting.country_income("genoa").unwrap().unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(1454);
    for _ in 0..32 {
        let (die, ducats) = table.roll(&mut rng, false).unwrap();
        assert_eq!(table.get_ducats(die, false), Ok(ducats));
    }
}
