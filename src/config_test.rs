use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: Vec<(String, String)> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
}

#[test]
fn empty_environment_keeps_defaults() {
    let cfg = PlanConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg.settings, PlanSettings::default());
}

#[test]
fn overrides_are_applied() {
    let cfg = PlanConfig::from_lookup(lookup_from(&[
        (WALL_THICKNESS_VAR, "8"),
        (LAYOUT_GAP_VAR, " 40 "),
        (MAX_ROW_WIDTH_VAR, "1200"),
        (GRID_SIZE_VAR, "25"),
    ]))
    .unwrap();
    assert_eq!(cfg.settings.wall_thickness, 8.0);
    assert_eq!(cfg.settings.layout_gap, 40.0);
    assert_eq!(cfg.settings.max_row_width, 1200.0);
    assert_eq!(cfg.settings.grid_size, 25.0);
    assert_eq!(cfg.settings.scale, PlanSettings::default().scale);
}

#[test]
fn scale_moves_default_grid_with_it() {
    let cfg = PlanConfig::from_lookup(lookup_from(&[(SCALE_VAR, "80")])).unwrap();
    assert_eq!(cfg.settings.scale, 80.0);
    assert_eq!(cfg.settings.grid_size, 80.0);
}

#[test]
fn explicit_grid_wins_over_scale() {
    let cfg = PlanConfig::from_lookup(lookup_from(&[(SCALE_VAR, "80"), (GRID_SIZE_VAR, "20")])).unwrap();
    assert_eq!(cfg.settings.grid_size, 20.0);
}

#[test]
fn blank_value_is_treated_as_unset() {
    let cfg = PlanConfig::from_lookup(lookup_from(&[(LAYOUT_GAP_VAR, "  ")])).unwrap();
    assert_eq!(cfg.settings.layout_gap, PlanSettings::default().layout_gap);
}

#[test]
fn unparsable_value_is_rejected() {
    let err = PlanConfig::from_lookup(lookup_from(&[(SCALE_VAR, "fifty")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: SCALE_VAR, value: "fifty".into() });
    assert_eq!(err.to_string(), "FLOORPLAN_SCALE is not a number: \"fifty\"");
}

#[test]
fn non_positive_values_are_rejected() {
    for raw in ["0", "-3", "inf", "NaN"] {
        let err = PlanConfig::from_lookup(lookup_from(&[(WALL_THICKNESS_VAR, raw)])).unwrap_err();
        assert_eq!(err, ConfigError::NonPositive { var: WALL_THICKNESS_VAR, value: raw.into() }, "{raw}");
    }
}
