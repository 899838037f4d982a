use xwalk_core::{CrosswalkOutput, Crosswalker, run_pipeline};
use xwalk_model::{
    CrosswalkEntry, DatasetGrouping, LinkRule, LookupTables, Namespace, NodeValue, OntologyTerm,
    OverrideRule, PipelineError, PipelineOptions, RuleSet, Section, Tree,
};

const SAMPLE: &str = r#"{"compounds": {
    "id": 596,
    "dsstox_compound_id": "DTXCID10596",
    "smiles": "CCC1=CC=CC=C1",
    "jchem_inchi_key": "YNQLUTRBYVCPMQ-UHFFFAOYSA-N",
    "acd_iupac_name": "Ethylbenzene",
    "mol_formula": "C8H10",
    "mol_weight": 106.168,
    "qsar_predicted_properties": [
        {"id": 5909, "efk_dsstox_compound_id": 596, "efk_qsar_model_id": 14,
         "result_value": 130.52,
         "report_filename": "DTXCID10596-TEST_Thermal_Conductivity.html",
         "models": {"id": 14, "efk_chemprop_endpoint_id": 15, "name": "TEST_Thermal_Conductivity"}},
        {"id": 5982, "efk_dsstox_compound_id": 596, "efk_qsar_model_id": 4,
         "result_value": 0.89,
         "report_filename": "DTXCID10596-TEST_Density.html",
         "models": {"id": 4, "efk_chemprop_endpoint_id": 5, "name": "TEST_Density"}}
    ]}}"#;

fn sample_input() -> Tree {
    serde_json::from_str(SAMPLE).expect("parse sample")
}

fn term(id: u32, url: &str, nspace_id: u32) -> OntologyTerm {
    OntologyTerm {
        id,
        title: None,
        definition: None,
        code: None,
        url: Some(url.to_string()),
        nspace_id,
    }
}

fn namespace(id: u32, ns: &str, path: &str) -> Namespace {
    Namespace {
        id,
        name: None,
        ns: ns.to_string(),
        path: path.to_string(),
        homepage: None,
    }
}

fn sample_rules() -> RuleSet {
    RuleSet {
        overrides: vec![
            OverrideRule::new(
                r"(compounds;qsar_predicted_properties;)(\d{1,})(\/exptdata)",
                "compounds;qsar_predicted_properties;$!@%/data",
            ),
            OverrideRule::new(
                r"(compounds;qsar_predicted_properties;)(\d{1,})(\/suppdata)",
                "compounds;qsar_predicted_properties;$!@%/data",
            ),
        ],
        links: vec![
            LinkRule::new(r"(compounds;qsar_predicted_properties;)(\d{1,})(\/data)")
                .with_target("model", "compounds;qsar_predicted_properties;$!@%/model")
                .with_target("compound", "compounds/compound"),
        ],
        groups: Vec::new(),
    }
}

fn sample_tables() -> LookupTables {
    LookupTables {
        crosswalks: vec![
            CrosswalkEntry::new("dsstox_compound_id", 323, "system", "compound")
                .with_table("compounds"),
            CrosswalkEntry::new("smiles", 80, "system", "compound").with_table("compounds"),
            CrosswalkEntry::new("result_value", 9999, "dataset", "exptdata")
                .with_table("qsar_predicted_properties"),
            CrosswalkEntry::new("name", 9999, "methodology", "model").with_table("models"),
            CrosswalkEntry::new("report_filename", 9999, "dataset", "suppdata")
                .with_table("qsar_predicted_properties"),
        ],
        ontology_terms: vec![
            term(323, "obo:NCIT_C25364", 2),
            term(80, "obo:MI_2039", 2),
            term(9999, "test:test_9999", 19),
        ],
        namespaces: vec![
            namespace(2, "obo", "http://purl.obolibrary.org/obo/"),
            namespace(19, "sdo", "https://stuchalk.github.io/scidata/ontology/scidata.owl#"),
        ],
        rules: sample_rules(),
    }
}

fn sample_options() -> PipelineOptions {
    PipelineOptions::new().with_root_table("compounds")
}

fn run(tables: &LookupTables, options: &PipelineOptions) -> CrosswalkOutput {
    run_pipeline(&sample_input(), tables, options).expect("run pipeline")
}

fn text<'a>(output: &'a CrosswalkOutput, section: Section, index: usize, field: &str) -> Option<&'a str> {
    output.document.nodes(section)[index]
        .get(field)
        .and_then(NodeValue::as_text)
}

#[test]
fn sample_compound_crosswalks_into_document() {
    let output = run(&sample_tables(), &sample_options());

    // the group key keeps the path up to its last digit run, so each QSAR entry
    // (index 0 and 1) forms its own model aspect and datapoint
    assert_eq!(output.record_count(Section::System), 1);
    assert_eq!(output.record_count(Section::Methodology), 2);
    assert_eq!(output.record_count(Section::Dataset), 2);
    assert!(output.document.dataset.datagroup.is_empty());
    assert!(output.warnings.is_empty());
    assert!(output.references.is_empty());

    let namespaces: Vec<_> = output.namespaces.keys().map(String::as_str).collect();
    assert_eq!(namespaces, vec!["obo", "sdo"]);

    let facet = &output.document.system.facets[0];
    assert_eq!(facet.id, "compound/1/");
    assert_eq!(facet.kind, "sdo:compound");
    assert_eq!(text(&output, Section::System, 0, "dsstox_compound_id"), Some("DTXCID10596"));
    assert_eq!(text(&output, Section::System, 0, "smiles"), Some("CCC1=CC=CC=C1"));

    let aspects: Vec<_> = output
        .document
        .methodology
        .aspects
        .iter()
        .map(|node| (node.id.as_str(), node.get("name").and_then(NodeValue::as_text)))
        .collect();
    assert_eq!(
        aspects,
        vec![
            ("model/1/", Some("TEST_Thermal_Conductivity")),
            ("model/2/", Some("TEST_Density")),
        ]
    );

    assert_eq!(text(&output, Section::Dataset, 1, "model"), Some("model/2/"));
    assert_eq!(text(&output, Section::Dataset, 1, "compound"), Some("compound/1/"));

    let rendered = serde_json::to_string(&output.document.dataset.datapoint[0]).expect("serialize");
    insta::assert_snapshot!(rendered, @r###"{"@id":"datapoint/1/","@type":"sdo:datapoint","data":[{"@id":"datapoint/1/datum/1/","@type":"sdo:exptdata","value":{"@id":"datapoint/1/datum/1/value/1/","@type":"sdo:value","result_value":130.52}},{"@id":"datapoint/1/datum/2/","@type":"sdo:suppdata","value":{"@id":"datapoint/1/datum/2/value/1/","@type":"sdo:value","report_filename":"DTXCID10596-TEST_Thermal_Conductivity.html"}}],"model":"model/1/","compound":"compound/1/"}"###);

    let json = serde_json::to_string(&output).expect("serialize output");
    assert!(!json.contains("\"#\""));
    assert!(!json.contains("\"##\""));
}

#[test]
fn kept_references_expose_group_links() {
    let options = sample_options().with_keep_references(true);
    let output = run(&sample_tables(), &options);

    let facet = &output.document.system.facets[0];
    assert_eq!(facet.refs.link.as_deref(), Some("compounds/compound"));
    assert_eq!(facet.refs.original, None);

    let value = output.document.dataset.datapoint[0]
        .data()
        .next()
        .and_then(|datum| datum.get("value"))
        .and_then(NodeValue::as_node)
        .expect("value wrapper");
    assert_eq!(
        value.refs.link.as_deref(),
        Some("compounds;qsar_predicted_properties;0/data")
    );
}

#[test]
fn trace_fields_survive_finalize() {
    let options = sample_options().with_trace_fields(true);
    let output = run(&sample_tables(), &options);

    let aspect = &output.document.methodology.aspects[0];
    assert!(aspect.refs.is_empty());
    assert_eq!(
        aspect.get("name#").and_then(NodeValue::as_text),
        Some("compounds;qsar_predicted_properties;0/model")
    );
    assert_eq!(
        aspect.get("name##").and_then(NodeValue::as_text),
        Some("compounds;qsar_predicted_properties;0;models;name")
    );
}

#[test]
fn without_overrides_each_subsection_is_its_own_datapoint() {
    let mut tables = sample_tables();
    tables.rules.overrides.clear();
    let output = run(&tables, &sample_options());

    assert_eq!(output.record_count(Section::Dataset), 4);
    for point in &output.document.dataset.datapoint {
        assert_eq!(point.data().count(), 1);
        assert!(point.get("model").is_none());
    }
}

#[test]
fn grouping_by_position_merges_subsections_without_overrides() {
    let mut tables = sample_tables();
    tables.rules.overrides.clear();
    let options = sample_options()
        .with_dataset_grouping(DatasetGrouping::ByPosition)
        .with_keep_references(true);
    let output = run(&tables, &options);

    assert_eq!(output.record_count(Section::Dataset), 2);
    let kinds: Vec<_> = output.document.dataset.datapoint[1]
        .data()
        .map(|datum| datum.kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["sdo:exptdata", "sdo:suppdata"]);
    let value = output.document.dataset.datapoint[1]
        .data()
        .next()
        .and_then(|datum| datum.get("value"))
        .and_then(NodeValue::as_node)
        .expect("value wrapper");
    assert_eq!(
        value.refs.link.as_deref(),
        Some("compounds;qsar_predicted_properties;1/")
    );
}

#[test]
fn identifiers_follow_input_field_order_for_json_values() {
    let text = r#"{"root": {"zeta": {"name": "Z"}, "alpha": {"name": "A"}}}"#;
    let deserialized: Tree = serde_json::from_str(text).expect("parse tree");
    let value: serde_json::Value = serde_json::from_str(text).expect("parse value");
    let tables = sample_tables();
    let options = PipelineOptions::new();

    let aspects = |input: &Tree| -> Vec<String> {
        run_pipeline(input, &tables, &options)
            .expect("run pipeline")
            .document
            .methodology
            .aspects
            .iter()
            .map(|node| {
                let name = node.get("name").and_then(NodeValue::as_text).unwrap_or_default();
                format!("{}={name}", node.id)
            })
            .collect()
    };
    let expected = vec!["model/1/=Z".to_string(), "model/2/=A".to_string()];
    assert_eq!(aspects(&deserialized), expected);
    assert_eq!(aspects(&Tree::from(value)), expected);
}

#[test]
fn unknown_section_fails_the_run() {
    let mut tables = sample_tables();
    tables.crosswalks.push(
        CrosswalkEntry::new("mol_formula", 9999, "metadata", "formula").with_table("compounds"),
    );
    let error = run_pipeline(&sample_input(), &tables, &sample_options()).expect_err("invalid section");
    assert!(matches!(
        error,
        PipelineError::InvalidSection { ref section, ref path, .. }
            if section == "metadata" && path == "compounds;mol_formula"
    ));
}

#[test]
fn unknown_ontology_term_fails_the_run() {
    let mut tables = sample_tables();
    tables.ontology_terms.retain(|term| term.id != 80);
    let error = run_pipeline(&sample_input(), &tables, &sample_options()).expect_err("lookup");
    assert!(matches!(error, PipelineError::Lookup(_)));
}

#[test]
fn invalid_override_pattern_is_rejected_up_front() {
    let mut tables = sample_tables();
    tables.rules.overrides.push(OverrideRule::new("(unclosed", "x"));
    let options = sample_options();
    let error = Crosswalker::new(&tables, &options).err().expect("invalid pattern");
    assert!(matches!(error, PipelineError::InvalidPattern { .. }));
}

#[test]
fn extraction_stops_before_binning() {
    let tables = sample_tables();
    let options = sample_options();
    let crosswalker = Crosswalker::new(&tables, &options).expect("compile");
    let extraction = crosswalker.extract(&sample_input());
    assert_eq!(extraction.leaves.len(), 8);
    assert_eq!(
        extraction.leaves.iter().filter(|leaf| leaf.is_overridden()).count(),
        4
    );
}
