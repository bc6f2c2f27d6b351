use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLINICS: &str = r#"[
  {
    "id": "a1",
    "slug": "detroit-dental",
    "name": "Detroit Dental Clinic",
    "address": "1726 Howard St, Detroit, MI",
    "coords": [42.33, -83.05],
    "services": "Dental, Vision",
    "verified": true,
    "summary": "Free cleanings on Saturdays",
    "summary_es": "Limpiezas gratis los sábados",
    "hours": {"mon": "9-5", "sat": "10-2"}
  },
  {
    "id": "b2",
    "legacyId": 17,
    "name": "Ann Arbor Community Health",
    "address": "2 State St, Ann Arbor, MI",
    "coordinates": "[-83.74, 42.28]",
    "services": ["Medical"],
    "verified": "false"
  },
  {
    "id": "c3",
    "name": "Nowhere Clinic",
    "coords": [51.5, -0.12],
    "services": ["Dental"]
  }
]"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("clinics.json"), CLINICS).unwrap();
    dir
}

fn clinicfinder(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("clinicfinder").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join("config"))
        .env("RUST_LOG", "warn")
        .env_remove("CLINICFINDER_CONFIG")
        .env_remove("CLINICFINDER_GEOCODER_URL");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = workspace();
    clinicfinder(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("map"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("geocode"));
}

#[test]
fn test_search_without_reference_keeps_everything_in_region() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "search", "--json", "--radius", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 2"))
        .stdout(predicate::str::contains("\"id\": \"a1\""))
        .stdout(predicate::str::contains("\"id\": \"b2\""))
        .stdout(predicate::str::contains("c3").not())
        .stderr(predicate::str::contains("Skipped 1 record"));
}

#[test]
fn test_search_radius_excludes_far_clinics() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "search", "--json"])
        .args(["--lat", "42.33", "--lng=-83.05", "--radius", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"a1\""))
        .stdout(predicate::str::contains("\"id\": \"b2\"").not());

    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "search", "--json"])
        .args(["--lat", "42.33", "--lng=-83.05", "--radius", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 2"));
}

#[test]
fn test_search_service_filter_table() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "search", "--service", "VISION"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detroit Dental Clinic"))
        .stdout(predicate::str::contains("Ann Arbor").not());
}

#[test]
fn test_search_verified_only() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "search", "--verified", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 1"));
}

#[test]
fn test_search_rejects_non_positive_radius() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "search", "--radius", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("radius"));
}

#[test]
fn test_search_without_data_is_a_config_error() {
    let dir = workspace();
    clinicfinder(dir.path())
        .arg("search")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--data"));
}

#[test]
fn test_missing_data_file_is_a_data_error() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "missing.json", "search"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn test_data_path_from_config_file() {
    let dir = workspace();
    fs::write(
        dir.path().join("finder.toml"),
        "[general]\ndata_path = \"clinics.json\"\n\n[search]\nverified_only = true\n",
    )
    .unwrap();

    clinicfinder(dir.path())
        .args(["--config", "finder.toml", "search", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 1"));
}

#[test]
fn test_missing_config_file() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--config", "nope.toml", "locale"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn test_map_writes_geojson() {
    let dir = workspace();
    let out = dir.path().join("markers.geojson");

    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "map", "--lat", "42.33", "--lng=-83.05", "--radius", "50", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("3 markers"));

    let geojson: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(geojson["type"], "FeatureCollection");
    let ids: Vec<&str> = geojson["features"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["clinic:a1", "clinic:b2", "reference"]);
}

#[test]
fn test_show_by_slug_and_legacy_id() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "show", "detroit-dental", "--locale", "en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Detroit Dental Clinic"))
        .stdout(predicate::str::contains("Free cleanings on Saturdays"));

    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "show", "17", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ann Arbor Community Health"));
}

#[test]
fn test_show_spanish_summary() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "show", "a1", "--locale", "es"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Limpiezas gratis"));
}

#[test]
fn test_show_unknown_clinic() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "show", "zzz"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No clinic found for 'zzz'"));
}

#[test]
fn test_services_lists_options() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "services"])
        .assert()
        .success()
        .stdout("Dental\nMedical\nVision\n");
}

#[test]
fn test_locale_round_trip() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["locale", "get"])
        .assert()
        .success()
        .stdout("en\n");

    clinicfinder(dir.path())
        .args(["locale", "set", "es"])
        .assert()
        .success();

    clinicfinder(dir.path())
        .arg("locale")
        .assert()
        .success()
        .stdout("es\n");

    // Saved locale picks the Spanish summary
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "show", "a1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Limpiezas gratis"));
}

#[test]
fn test_locale_set_rejects_unknown() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["locale", "set", "fr"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported locale"));
}

#[test]
fn test_geocode_short_query_skips_lookup() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["geocode", "ab"])
        .assert()
        .success()
        .stderr(predicate::str::contains("at least 3 characters"));
}

#[test]
fn test_metrics_export() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--data", "clinics.json", "--metrics", "search", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"records.dropped\": 1"))
        .stderr(predicate::str::contains("search.duration_ms"));
}

#[test]
fn test_verbose_beats_rust_log() {
    let dir = workspace();
    clinicfinder(dir.path())
        .args(["--verbose", "--data", "clinics.json", "services"])
        .assert()
        .success()
        .stderr(predicate::str::contains("clinicfinder starting"));
}

#[test]
fn test_antipodal_reference_excludes_clinic() {
    let dir = workspace();
    fs::write(
        dir.path().join("coast.json"),
        r#"[{"id": "w1", "name": "Coast Clinic", "coords": [24.5615, -124.3145], "services": ["Dental"]}]"#,
    )
    .unwrap();
    clinicfinder(dir.path())
        .args(["--data", "coast.json", "search", "--json", "--lat=-24.5615", "--lng", "55.6855"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\": 0"));
}
