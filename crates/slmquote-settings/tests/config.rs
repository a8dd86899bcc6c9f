use slmquote_core::{init_standard_library, ParameterSet, VolumeUnit};
use slmquote_settings::{Config, SettingsError};
use tempfile::TempDir;

fn customized() -> Config {
    let mut config = Config::new();
    config.material_preset = Some("316L".to_string());
    config.powder_bed.machine.bed_x = 250.0;
    config.powder_bed.time.heat_treat = 6.5;
    config.powder_bed.labor.engineers = 1;
    config.powder_bed.pricing.quantity = 12;
    config.simple.manual_time = Some(1.75);
    config.batch.tariff = 85.0;
    config.batch.volume_unit = VolumeUnit::Mm3;
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let config = customized();
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let config = customized();
    config.save_to_file(&path).unwrap();
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    assert!(matches!(
        Config::new().save_to_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[powder_bed.material]\ndensity_solid = 2.67\n\n[batch]\ntariff = 40\n",
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.powder_bed.material.density_solid, 2.67);
    assert_eq!(config.powder_bed.material.density_powder, 2.2);
    assert_eq!(config.powder_bed.machine.bed_x, 350.0);
    assert_eq!(config.batch.tariff, 40.0);
    assert_eq!(config.simple, Default::default());
}

#[test]
fn test_out_of_range_file_values_are_sanitized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"powder_bed": {"machine": {"productivity": 0, "bed_y": -5},
            "pricing": {"quantity": 0, "overhead": 0}},
            "batch": {"tariff": -1}}"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.powder_bed.machine.productivity, 6.5);
    assert_eq!(config.powder_bed.machine.bed_y, 350.0);
    assert_eq!(config.powder_bed.pricing.quantity, 1);
    assert_eq!(config.powder_bed.pricing.overhead, 0.0);
    assert_eq!(config.batch.tariff, 0.0);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "powder_bed = [").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlDe(_))
    ));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::LoadError(_))
    ));
}

#[test]
fn test_material_preset_applied() {
    let library = init_standard_library();
    let mut config = Config::new();
    config.material_preset = Some("ti6al4v".to_string());
    config.resolve_material(&library).unwrap();
    assert_eq!(config.powder_bed.material.density_solid, 4.43);
    assert_eq!(config.powder_bed.material.density_powder, 2.2);
    assert_eq!(config.powder_bed.material.price_per_kg, 15000.0);

    config.material_preset = Some("AlSi10Mg".to_string());
    config.resolve_material(&library).unwrap();
    assert_eq!(config.powder_bed.material.density_solid, 2.67);
    assert_eq!(config.simple.density, 2.67);
    assert_eq!(config.simple.price_per_kg, 8000.0);
}

#[test]
fn test_unknown_preset() {
    let mut config = Config::new();
    config.material_preset = Some("unobtainium".to_string());
    assert!(matches!(
        config.resolve_material(&init_standard_library()),
        Err(SettingsError::UnknownMaterial(name)) if name == "unobtainium"
    ));
}

#[test]
fn test_overrides_win_over_file_values() {
    let config = customized();
    let overrides = ParameterSet::from_pairs([
        "bed_y=100",
        "margin_percent=35",
        "time_heat_treat=0",
        "quantity=abc",
    ]);
    let powder_bed = config.powder_bed_with(&overrides);
    assert_eq!(powder_bed.machine.bed_x, 250.0);
    assert_eq!(powder_bed.machine.bed_y, 100.0);
    assert_eq!(powder_bed.pricing.margin_percent, 35.0);
    assert_eq!(powder_bed.time.heat_treat, 0.0);
    // an unparseable override falls back to the default, not the file value
    assert_eq!(powder_bed.pricing.quantity, 1);

    let simple = config.simple_with(&ParameterSet::new());
    assert_eq!(simple, config.simple);
}
