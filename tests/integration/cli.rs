//! CLI tests against the compiled binary.

use predicates::prelude::*;

use crate::common::{SAMPLE_CATALOG, TestProject};

#[test]
fn validate_reports_counts_for_a_clean_catalog() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    project
        .pagegen()
        .args(["--quiet", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ catalog loaded"))
        .stdout(predicate::str::contains(
            "2 families, 2 brands, 2 products, 18 possible pages",
        ));
}

#[test]
fn validate_emits_machine_readable_json() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    let output = project
        .pagegen()
        .args(["--quiet", "validate", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let results: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(results["valid"], true);
    assert_eq!(results["page_extent"], 18);
    assert_eq!(results["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn validate_strict_fails_on_warnings() {
    let project = TestProject::new();
    project.write_catalog(
        r#"
[[families]]
name = "Empty"
slug = "empty"
"#,
    );

    project
        .pagegen()
        .args(["--quiet", "validate", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("⚠"));
}

#[test]
fn validate_rejects_malformed_catalogs() {
    let project = TestProject::new();
    project.write_catalog("[[families]\nname = broken");

    project.pagegen().args(["--quiet", "validate"]).assert().failure();
}

#[test]
fn validate_rejects_cross_family_slug_collisions() {
    let project = TestProject::new();
    project.write_catalog(
        r#"
[[families]]
name = "A"
slug = "a"

[[families]]
name = "B"
slug = "b"

[[products]]
name = "First Mixer"
slug = "mixer"
family = "a"

[[products]]
name = "Second Mixer"
slug = "mixer"
family = "b"
"#,
    );

    project.pagegen().args(["--quiet", "validate"]).assert().failure();
}

#[test]
fn generate_covers_the_whole_catalog() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    let output = project
        .pagegen()
        .args(["--quiet", "generate", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["limit_reached"], false);
    let families = report["families"].as_array().unwrap();
    assert_eq!(families.len(), 2);
    let generated: u64 =
        families.iter().map(|f| f["generated"].as_u64().unwrap()).sum();
    assert_eq!(generated, 18);
}

#[test]
fn generate_honors_the_limit() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    let output = project
        .pagegen()
        .args(["--quiet", "generate", "--limit", "5", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["limit_reached"], true);
    let generated: u64 = report["families"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["generated"].as_u64().unwrap())
        .sum();
    assert_eq!(generated, 5);
}

#[test]
fn generate_rejects_unknown_families() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    project
        .pagegen()
        .args(["--quiet", "generate", "--family", "electronics"])
        .assert()
        .failure();
}

#[test]
fn page_prints_a_summary_for_a_valid_triple() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    project
        .pagegen()
        .args(["--quiet", "page", "lg", "washing-machine", "maintenance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/lg/washing-machine/maintenance"))
        .stdout(predicate::str::contains("sections:  8"))
        .stdout(predicate::str::contains("schema:    5 records"));
}

#[test]
fn page_json_contains_the_applied_override() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    let output = project
        .pagegen()
        .args(["--quiet", "page", "lg", "washing-machine", "maintenance", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let page: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(page["identity"]["brand_slug"], "lg");
    let intro = &page["content"]["body_sections"][0];
    assert!(intro["body"].as_str().unwrap().contains("نص مخصص"));
}

#[test]
fn page_respects_a_custom_site_config() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);
    project.write_config("base_url = \"https://staging.example.com\"\n");

    let output = project
        .pagegen()
        .args(["--quiet", "page", "lg", "refrigerator", "agency", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let page: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        page["seo"]["canonical_url"],
        "https://staging.example.com/lg/refrigerator/agency"
    );
}

#[test]
fn explicit_config_flag_pointing_at_nothing_is_an_error() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    // An implicit location may be absent; a typoed flag must not silently
    // generate pages with the default site identity.
    project
        .pagegen()
        .args([
            "--quiet",
            "--config",
            "/nonexistent/pagegen.toml",
            "page",
            "lg",
            "refrigerator",
            "agency",
        ])
        .assert()
        .failure();
}

#[test]
fn page_fails_for_identities_outside_the_catalog() {
    let project = TestProject::new();
    project.write_catalog(SAMPLE_CATALOG);

    // Unknown keyword.
    project
        .pagegen()
        .args(["--quiet", "page", "lg", "washing-machine", "repair"])
        .assert()
        .failure();

    // Existing slugs, missing relation.
    project
        .pagegen()
        .args(["--quiet", "page", "tornado", "washing-machine", "agency"])
        .assert()
        .failure();
}

#[test]
fn missing_catalog_file_is_a_clear_error() {
    let project = TestProject::new();
    project.pagegen().args(["--quiet", "validate"]).assert().failure();
}

#[test]
fn explicit_catalog_flag_overrides_the_working_directory() {
    let project = TestProject::new();
    let other = TestProject::new();
    let path = other.write_catalog(SAMPLE_CATALOG);

    project
        .pagegen()
        .args(["--quiet", "--catalog"])
        .arg(&path)
        .args(["validate"])
        .assert()
        .success();
}
