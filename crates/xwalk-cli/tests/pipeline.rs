//! Integration tests for the CLI pipeline helpers, run against the bundled
//! demo record and tables.

use std::path::PathBuf;

use xwalk_cli::pipeline::{
    flatten_rows, load_input, load_tables, render_output, run_crosswalk, write_output,
};
use xwalk_model::{PipelineOptions, Section};

fn demo_input() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/compounds.json")
}

fn options() -> PipelineOptions {
    PipelineOptions::new().with_root_table("compounds")
}

#[test]
fn demo_record_runs_against_bundled_tables() {
    let loaded = load_tables(None).expect("load tables");
    let input = load_input(&demo_input()).expect("load input");
    let output = run_crosswalk(&input, &loaded.tables, &options()).expect("run");

    assert_eq!(output.record_count(Section::Methodology), 2);
    assert_eq!(output.record_count(Section::System), 1);
    assert_eq!(output.record_count(Section::Dataset), 2);
    assert!(output.warnings.is_empty());

    let json: serde_json::Value =
        serde_json::from_str(&render_output(&output, false).expect("render")).expect("reparse");
    assert_eq!(json["dataset"]["datapoint"][0]["model"], "model/1/");
    assert_eq!(json["dataset"]["datapoint"][1]["compound"], "compound/1/");
    assert_eq!(json["system"]["facets"][0]["smiles"], "CCC1=CC=CC=C1");
    assert_eq!(json["namespaces"]["obo"], "http://purl.obolibrary.org/obo/");
}

#[test]
fn flatten_rows_show_overridden_links() {
    let loaded = load_tables(None).expect("load tables");
    let input = load_input(&demo_input()).expect("load input");
    let rows = flatten_rows(&input, &loaded.tables, &options()).expect("flatten");

    let rendered = rows
        .iter()
        .map(|row| format!("{} {}/{} {}", row.local_key, row.section, row.subsection, row.group_link))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    dsstox_compound_id system/compound compounds/compound
    smiles system/compound compounds/compound
    result_value dataset/exptdata compounds;qsar_predicted_properties;0/data
    report_filename dataset/suppdata compounds;qsar_predicted_properties;0/data
    name methodology/model compounds;qsar_predicted_properties;0/model
    result_value dataset/exptdata compounds;qsar_predicted_properties;1/data
    report_filename dataset/suppdata compounds;qsar_predicted_properties;1/data
    name methodology/model compounds;qsar_predicted_properties;1/model
    ");
    assert_eq!(rows[2].value, "130.52");
}

#[test]
fn output_file_is_written_as_json() {
    let loaded = load_tables(None).expect("load tables");
    let input = load_input(&demo_input()).expect("load input");
    let output = run_crosswalk(&input, &loaded.tables, &options()).expect("run");

    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("xwalk_cli_{stamp}.json"));
    write_output(&output, &path, true).expect("write output");
    let text = std::fs::read_to_string(&path).expect("read output");
    assert!(text.contains("\"@id\": \"datapoint/1/datum/1/value/1/\""));
    assert!(!text.contains("\"#\""));
}

#[test]
fn missing_input_reports_path() {
    let error = load_input(&PathBuf::from("does/not/exist.json")).expect_err("missing input");
    assert!(error.to_string().contains("does/not/exist.json"));
}
