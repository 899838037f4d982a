//! Partitions leaves by section and merges leaves sharing a group link.

use std::collections::HashMap;

use xwalk_model::{ExtractedLeaf, PipelineError, Record, Result, Section, Value};

/// Record id used for every grouped dataset record.
pub const DATUM_MARKER: &str = "datum";

/// One list per section.
#[derive(Debug, Clone, PartialEq)]
pub struct Bins<T> {
    pub methodology: Vec<T>,
    pub system: Vec<T>,
    pub dataset: Vec<T>,
}

impl<T> Default for Bins<T> {
    fn default() -> Self {
        Self {
            methodology: Vec::new(),
            system: Vec::new(),
            dataset: Vec::new(),
        }
    }
}

impl<T> Bins<T> {
    pub fn get(&self, section: Section) -> &[T] {
        match section {
            Section::Methodology => &self.methodology,
            Section::System => &self.system,
            Section::Dataset => &self.dataset,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut Vec<T> {
        match section {
            Section::Methodology => &mut self.methodology,
            Section::System => &mut self.system,
            Section::Dataset => &mut self.dataset,
        }
    }

    pub fn len(&self) -> usize {
        self.methodology.len() + self.system.len() + self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Routes each leaf to the bin named by its crosswalk section.
pub fn bin_leaves(leaves: Vec<ExtractedLeaf>) -> Result<Bins<ExtractedLeaf>> {
    let mut bins = Bins::default();
    for leaf in leaves {
        let Some(section) = leaf.entry.section() else {
            return Err(PipelineError::InvalidSection {
                section: leaf.entry.section.clone(),
                field: leaf.entry.field.clone(),
                path: leaf.path_key.clone(),
            });
        };
        bins.get_mut(section).push(leaf);
    }
    Ok(bins)
}

/// Merges the leaves of one bin into one record per distinct group link.
///
/// Groups keep the order in which their link first appears. A local key seen
/// twice in a group becomes a list of leaves.
pub fn group_bin(section: Section, leaves: &[ExtractedLeaf]) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for leaf in leaves {
        let slot = *index.entry(leaf.group_link.as_str()).or_insert_with(|| {
            records.push(Record::default());
            records.len() - 1
        });
        let record = &mut records[slot];
        match record.get_mut(&leaf.local_key) {
            Some(Value::List(items)) => items.push(Value::from(leaf.clone())),
            Some(existing) => {
                let first = std::mem::replace(existing, Value::List(Vec::new()));
                *existing = Value::List(vec![first, Value::from(leaf.clone())]);
            }
            None => {
                record.id = Some(match section {
                    Section::Dataset => DATUM_MARKER.to_string(),
                    _ => leaf.entry.subsection.clone(),
                });
                record.insert(leaf.local_key.clone(), leaf.clone());
            }
        }
    }
    records
}

pub fn group_bins(bins: &Bins<ExtractedLeaf>) -> Bins<Record> {
    let mut grouped = Bins::default();
    for section in Section::ALL {
        *grouped.get_mut(section) = group_bin(section, bins.get(section));
    }
    grouped
}
