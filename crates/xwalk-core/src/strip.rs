//! Replaces annotated leaves with bare values and hoists their group links.

use xwalk_model::{ExtractedLeaf, Record, References, Scalar, Value};

/// Strips every record in `records`, descending into nested records.
pub fn strip_records(records: &mut [Record], trace_fields: bool) {
    for record in records {
        strip_record(record, trace_fields);
    }
}

/// Replaces the annotated values of `record` with their scalars.
///
/// The record takes the group link of the last annotated leaf it held as its
/// reference. A list of leaves collapses to its distinct values, and to a
/// single scalar when only one remains. With `trace_fields`, each stripped
/// field `k` adds `k#` (group link) and `k##` (path key) after the record's
/// own fields.
pub fn strip_record(record: &mut Record, trace_fields: bool) {
    let mut traces: Vec<(String, Value)> = Vec::new();

    for (name, value) in &mut record.fields {
        let last = match value {
            Value::Annotated(leaf) => {
                let leaf = leaf.as_ref().clone();
                *value = Value::Scalar(leaf.value.clone());
                Some(leaf)
            }
            Value::List(items) if items.iter().any(|item| item.as_annotated().is_some()) => {
                let (bare, last) = collapse(std::mem::take(items), trace_fields);
                *value = bare;
                last
            }
            Value::List(items) => {
                for item in items.iter_mut() {
                    if let Value::Record(inner) = item {
                        strip_record(inner, trace_fields);
                    }
                }
                None
            }
            Value::Record(inner) => {
                strip_record(inner, trace_fields);
                None
            }
            Value::Scalar(_) => None,
        };

        if let Some(leaf) = last {
            hoist(&mut record.refs, &leaf, trace_fields);
            if trace_fields {
                push_trace(&mut traces, format!("{name}#"), &leaf.group_link);
                push_trace(&mut traces, format!("{name}##"), &leaf.path_key);
            }
        }
    }

    for (name, value) in traces {
        record.insert(name, value);
    }
}

fn hoist(refs: &mut References, leaf: &ExtractedLeaf, trace_fields: bool) {
    refs.link = Some(leaf.group_link.clone());
    if trace_fields {
        refs.original = Some(leaf.original_link.clone());
    }
}

fn push_trace(traces: &mut Vec<(String, Value)>, name: String, text: &str) {
    let value = Value::Scalar(Scalar::from(text));
    match traces.iter_mut().find(|(known, _)| *known == name) {
        Some((_, slot)) => *slot = value,
        None => traces.push((name, value)),
    }
}

/// Distinct bare values of a list, in first-seen order, and its last leaf.
fn collapse(items: Vec<Value>, trace_fields: bool) -> (Value, Option<ExtractedLeaf>) {
    let mut bare: Vec<Value> = Vec::new();
    let mut last = None;
    for item in items {
        let value = match item {
            Value::Annotated(leaf) => {
                let value = Value::Scalar(leaf.value.clone());
                last = Some(*leaf);
                value
            }
            Value::Record(mut inner) => {
                strip_record(&mut inner, trace_fields);
                Value::Record(inner)
            }
            other => other,
        };
        if !bare.contains(&value) {
            bare.push(value);
        }
    }
    let value = if bare.len() == 1 {
        bare.remove(0)
    } else {
        Value::List(bare)
    };
    (value, last)
}
