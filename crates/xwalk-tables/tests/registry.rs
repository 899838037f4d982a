//! Tests for manifest verification and table loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use xwalk_tables::{TableRegistry, TablesError, hash::sha256_hex, tables_root};

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.push(format!("xwalk_tables_{stamp}_{seq}"));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

const CROSSWALKS: &str = "table,field,ontterm_id,sdsection,sdsubsection\n\
                          models,name,9999,methodology,model\n";
const ONTTERMS: &str = "id,url,nspace_id\n9999,test:test_9999,19\n";
const NAMESPACES: &str = "id,ns,path\n19,sdo,https://stuchalk.github.io/scidata/ontology/scidata.owl#\n";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write table");
}

fn entry(path: &str, kind: &str, role: &str, sha: Option<&str>) -> String {
    let sha = sha.map(|sha| format!("sha256 = \"{sha}\"\n")).unwrap_or_default();
    format!("[[files]]\npath = \"{path}\"\nkind = \"{kind}\"\nrole = \"{role}\"\n{sha}\n")
}

fn write_manifest(dir: &Path, schema: &str, files: &[String]) {
    let mut manifest = format!("[manifest]\nschema = \"{schema}\"\nschema_version = 1\n\n");
    for file in files {
        manifest.push_str(file);
    }
    write(dir, "manifest.toml", &manifest);
}

fn minimal_dir() -> PathBuf {
    let dir = temp_dir();
    write(&dir, "crosswalks.csv", CROSSWALKS);
    write(&dir, "ontterms.csv", ONTTERMS);
    write(&dir, "namespaces.csv", NAMESPACES);
    dir
}

#[test]
fn bundled_tables_verify_and_load() {
    let (registry, summary) = TableRegistry::verify_and_load(&tables_root()).expect("load tables");
    assert_eq!(summary.file_count, 4);
    assert_eq!(summary.verified_count, 4);
    assert_eq!(summary.crosswalk_count, 5);
    assert_eq!(summary.ontterm_count, 3);
    assert_eq!(summary.namespace_count, 2);
    assert_eq!(summary.override_count, 2);
    assert_eq!(summary.link_count, 1);
    assert_eq!(summary.group_count, 1);

    let tables = registry.tables;
    let smiles = tables
        .crosswalks
        .iter()
        .find(|entry| entry.field == "smiles")
        .expect("smiles crosswalk");
    assert_eq!(smiles.table.as_deref(), Some("compounds"));
    assert_eq!(smiles.section, "system");
    assert_eq!(smiles.unit, None);
    assert_eq!(
        tables.term(80).and_then(|term| term.url.as_deref()),
        Some("obo:MI_2039")
    );
    assert_eq!(tables.namespace(19).map(|ns| ns.ns.as_str()), Some("sdo"));
}

#[test]
fn rules_are_optional() {
    let dir = minimal_dir();
    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", None),
            entry("ontterms.csv", "csv", "ontterms", None),
            entry("namespaces.csv", "csv", "namespaces", None),
        ],
    );
    let (registry, summary) = TableRegistry::verify_and_load(&dir).expect("load tables");
    assert_eq!(summary.verified_count, 0);
    assert!(registry.tables.rules.is_empty());
    assert_eq!(registry.tables.crosswalks[0].datatype, "string");
}

#[test]
fn unknown_schema_is_rejected() {
    let dir = minimal_dir();
    write_manifest(
        &dir,
        "legacy.standards-manifest",
        &[entry("crosswalks.csv", "csv", "crosswalks", None)],
    );
    let error = TableRegistry::verify_and_load(&dir).expect_err("schema");
    insta::assert_snapshot!(error.to_string(), @"invalid manifest: unsupported schema: legacy.standards-manifest");
}

#[test]
fn missing_role_is_rejected() {
    let dir = minimal_dir();
    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", None),
            entry("namespaces.csv", "csv", "namespaces", None),
        ],
    );
    let error = TableRegistry::verify_and_load(&dir).expect_err("missing role");
    assert!(matches!(error, TablesError::MissingRole { ref role } if role == "ontterms"));
}

#[test]
fn duplicate_role_is_rejected() {
    let dir = minimal_dir();
    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", None),
            entry("crosswalks.csv", "csv", "crosswalks", None),
        ],
    );
    let error = TableRegistry::verify_and_load(&dir).expect_err("duplicate role");
    assert!(matches!(error, TablesError::DuplicateRole { .. }));
}

#[test]
fn checksum_mismatch_is_rejected() {
    let dir = minimal_dir();
    let wrong = sha256_hex(b"something else");
    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", Some(&wrong)),
            entry("ontterms.csv", "csv", "ontterms", None),
            entry("namespaces.csv", "csv", "namespaces", None),
        ],
    );
    let error = TableRegistry::verify_and_load(&dir).expect_err("mismatch");
    assert!(matches!(error, TablesError::Sha256Mismatch { ref expected, .. } if *expected == wrong));
}

#[test]
fn matching_checksum_is_counted() {
    let dir = minimal_dir();
    let sha = sha256_hex(CROSSWALKS.as_bytes());
    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", Some(&sha)),
            entry("ontterms.csv", "csv", "ontterms", None),
            entry("namespaces.csv", "csv", "namespaces", None),
        ],
    );
    let (_, summary) = TableRegistry::verify_and_load(&dir).expect("load tables");
    assert_eq!(summary.verified_count, 1);
}

#[test]
fn missing_file_and_escaping_path_are_rejected() {
    let dir = minimal_dir();
    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", None),
            entry("ontterms.csv", "csv", "ontterms", None),
            entry("absent.csv", "csv", "namespaces", None),
        ],
    );
    let error = TableRegistry::verify_and_load(&dir).expect_err("missing file");
    assert!(matches!(error, TablesError::MissingFile { .. }));

    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", None),
            entry("ontterms.csv", "csv", "ontterms", None),
            entry("../namespaces.csv", "csv", "namespaces", None),
        ],
    );
    let error = TableRegistry::verify_and_load(&dir).expect_err("escaping path");
    assert!(matches!(error, TablesError::InvalidPath { .. }));
}

#[test]
fn rules_must_be_toml() {
    let dir = minimal_dir();
    write(&dir, "rules.csv", "pattern,replacement\n");
    write_manifest(
        &dir,
        "scidata-xwalk.tables-manifest",
        &[
            entry("crosswalks.csv", "csv", "crosswalks", None),
            entry("ontterms.csv", "csv", "ontterms", None),
            entry("namespaces.csv", "csv", "namespaces", None),
            entry("rules.csv", "csv", "rules", None),
        ],
    );
    let error = TableRegistry::verify_and_load(&dir).expect_err("rules kind");
    assert!(matches!(error, TablesError::InvalidManifest { .. }));
}
