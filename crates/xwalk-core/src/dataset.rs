//! Reshapes grouped dataset records into datapoint / datum / value wrappers.

use xwalk_model::{ExtractedLeaf, Record, Value};

pub const DATAPOINT: &str = "datapoint";
pub const DATUM: &str = "datum";
pub const VALUE: &str = "value";

/// Builds one datapoint per grouped record.
///
/// Each subsection present in the record becomes a datum typed
/// `sdo:<subsection>`, whose `value` wrapper holds that subsection's leaves.
/// Subsections appear in the order their first leaf does.
pub fn reshape_dataset(records: Vec<Record>) -> Vec<Record> {
    records.into_iter().map(reshape_record).collect()
}

fn reshape_record(record: Record) -> Record {
    let mut values: Vec<(String, Record)> = Vec::new();

    for (name, value) in record.fields {
        for leaf in annotated_leaves(value) {
            let subsection = leaf.entry.subsection.clone();
            let slot = match values.iter().position(|(known, _)| *known == subsection) {
                Some(slot) => slot,
                None => {
                    values.push((subsection, Record::new(VALUE).with_kind("sdo:value")));
                    values.len() - 1
                }
            };
            push_field(&mut values[slot].1, &name, leaf);
        }
    }

    let data = values
        .into_iter()
        .map(|(subsection, value)| {
            Value::Record(
                Record::new(DATUM)
                    .with_kind(format!("sdo:{subsection}"))
                    .with_field(VALUE, value),
            )
        })
        .collect();
    Record::new(DATAPOINT).with_field("data", Value::List(data))
}

fn annotated_leaves(value: Value) -> Vec<ExtractedLeaf> {
    match value {
        Value::Annotated(leaf) => vec![*leaf],
        Value::List(items) => items.into_iter().flat_map(annotated_leaves).collect(),
        Value::Scalar(_) | Value::Record(_) => Vec::new(),
    }
}

fn push_field(record: &mut Record, name: &str, leaf: ExtractedLeaf) {
    match record.get_mut(name) {
        Some(Value::List(items)) => items.push(Value::from(leaf)),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::List(Vec::new()));
            *existing = Value::List(vec![first, Value::from(leaf)]);
        }
        None => record.insert(name, leaf),
    }
}

#[cfg(test)]
mod tests {
    use xwalk_model::{CrosswalkEntry, Scalar};

    use super::*;

    fn leaf(local: &str, subsection: &str, value: f64) -> ExtractedLeaf {
        ExtractedLeaf {
            path_key: format!("c;p;0;{local}"),
            local_key: local.to_string(),
            group_key: "c;p;0".to_string(),
            group_link: "c;p;0/data".to_string(),
            original_link: format!("c;p;0/{subsection}"),
            value: Scalar::Float(value),
            entry: CrosswalkEntry::new(local, 1, "dataset", subsection),
        }
    }

    #[test]
    fn one_datum_per_subsection_in_first_seen_order() {
        let grouped = Record::new("datum")
            .with_field("result_value", leaf("result_value", "exptdata", 1.5))
            .with_field("report", leaf("report", "suppdata", 0.0))
            .with_field("error", leaf("error", "exptdata", 0.1));

        let reshaped = reshape_dataset(vec![grouped]);
        assert_eq!(reshaped.len(), 1);
        let point = &reshaped[0];
        assert_eq!(point.id.as_deref(), Some(DATAPOINT));
        let Some(Value::List(data)) = point.get("data") else {
            panic!("expected data list");
        };
        let kinds: Vec<_> = data
            .iter()
            .filter_map(|value| match value {
                Value::Record(datum) => datum.kind.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec!["sdo:exptdata", "sdo:suppdata"]);

        let Value::Record(first) = &data[0] else {
            panic!("expected datum record");
        };
        let Some(Value::Record(value)) = first.get(VALUE) else {
            panic!("expected value wrapper");
        };
        let names: Vec<_> = value.fields.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["result_value", "error"]);
    }
}
