//! Attaches crosswalk entries to the scalar leaves of an input tree.

use std::collections::HashMap;

use tracing::debug;
use xwalk_model::{
    AmbiguityPolicy, AnnotatedLeaf, CrosswalkEntry, Leaf, PipelineOptions, PipelineWarning, Tree,
};

/// Crosswalk entries indexed by field name, in table order.
#[derive(Debug, Clone)]
pub struct Crosswalk<'a> {
    by_field: HashMap<&'a str, Vec<&'a CrosswalkEntry>>,
}

impl<'a> Crosswalk<'a> {
    pub fn new(entries: &'a [CrosswalkEntry]) -> Self {
        let mut by_field: HashMap<&str, Vec<&CrosswalkEntry>> = HashMap::new();
        for entry in entries {
            by_field.entry(entry.field.as_str()).or_default().push(entry);
        }
        Self { by_field }
    }

    /// Every entry for `field`, whatever its table.
    pub fn candidates(&self, field: &str) -> Vec<&'a CrosswalkEntry> {
        self.by_field.get(field).cloned().unwrap_or_default()
    }

    /// Entries for `field` whose table equals `table`; with no enclosing
    /// table only entries without a table qualify.
    pub fn candidates_in(&self, field: &str, table: Option<&str>) -> Vec<&'a CrosswalkEntry> {
        self.candidates(field)
            .into_iter()
            .filter(|entry| entry.table.as_deref() == table)
            .collect()
    }
}

/// The annotated tree and the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub tree: Tree,
    pub warnings: Vec<PipelineWarning>,
}

pub struct Annotator<'a> {
    crosswalk: Crosswalk<'a>,
    root_table: Option<&'a str>,
    match_table: bool,
    ambiguity: AmbiguityPolicy,
}

impl<'a> Annotator<'a> {
    pub fn new(entries: &'a [CrosswalkEntry], options: &'a PipelineOptions) -> Self {
        Self {
            crosswalk: Crosswalk::new(entries),
            root_table: options.root_table.as_deref(),
            match_table: options.match_table,
            ambiguity: options.ambiguity,
        }
    }

    /// Returns an annotated copy of `tree`; the input is left untouched.
    ///
    /// A scalar leaf's enclosing table is the name of the field holding its
    /// mapping (or the sequence that mapping sits in); top-level scalars use
    /// the root table.
    pub fn annotate(&self, tree: &Tree) -> Annotation {
        let mut warnings = Vec::new();
        let tree = self.annotate_node(tree, self.root_table, &mut warnings);
        Annotation { tree, warnings }
    }

    fn annotate_node(
        &self,
        tree: &Tree,
        table: Option<&str>,
        warnings: &mut Vec<PipelineWarning>,
    ) -> Tree {
        match tree {
            Tree::Leaf(leaf) => Tree::Leaf(leaf.clone()),
            Tree::Sequence(items) => Tree::Sequence(
                items
                    .iter()
                    .map(|item| self.annotate_node(item, table, warnings))
                    .collect(),
            ),
            Tree::Mapping(fields) => Tree::Mapping(
                fields
                    .iter()
                    .map(|(name, child)| {
                        let child = match child {
                            Tree::Leaf(Leaf::Scalar(value)) if value.is_annotatable() => {
                                match self.lookup(name, table, warnings) {
                                    Some(entry) => Tree::Leaf(Leaf::Annotated(AnnotatedLeaf {
                                        value: value.clone(),
                                        entry: entry.clone(),
                                    })),
                                    None => child.clone(),
                                }
                            }
                            Tree::Leaf(_) => child.clone(),
                            nested => self.annotate_node(nested, Some(name), warnings),
                        };
                        (name.clone(), child)
                    })
                    .collect(),
            ),
        }
    }

    fn lookup(
        &self,
        field: &str,
        table: Option<&str>,
        warnings: &mut Vec<PipelineWarning>,
    ) -> Option<&'a CrosswalkEntry> {
        let candidates = if self.match_table {
            self.crosswalk.candidates_in(field, table)
        } else {
            self.crosswalk.candidates(field)
        };
        match candidates.as_slice() {
            [] => None,
            [entry] => Some(*entry),
            [first, ..] => {
                let skipped = self.ambiguity == AmbiguityPolicy::Skip;
                debug!(
                    field,
                    table = table.unwrap_or_default(),
                    candidates = candidates.len(),
                    skipped,
                    "ambiguous crosswalk match"
                );
                warnings.push(PipelineWarning::AmbiguousCrosswalk {
                    field: field.to_string(),
                    table: table.unwrap_or_default().to_string(),
                    candidates: candidates.len(),
                    skipped,
                });
                (!skipped).then_some(*first)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use xwalk_model::Scalar;

    use super::*;

    fn entries() -> Vec<CrosswalkEntry> {
        vec![
            CrosswalkEntry::new("name", 1, "methodology", "model").with_table("models"),
            CrosswalkEntry::new("name", 2, "system", "compound").with_table("compounds"),
            CrosswalkEntry::new("smiles", 3, "system", "compound").with_table("compounds"),
        ]
    }

    fn tree() -> Tree {
        serde_json::from_str::<Tree>(
            r#"{"compounds": {"name": "benzene", "smiles": "c1ccccc1", "flag": true,
                "models": [{"name": "TEST_Density", "smiles": 4}]}}"#,
        )
        .expect("parse")
    }

    fn entry_of(tree: &Tree, path: &[&str]) -> Option<CrosswalkEntry> {
        let mut node = tree;
        for step in path {
            node = match step.parse::<usize>() {
                Ok(index) => match node {
                    Tree::Sequence(items) => &items[index],
                    _ => return None,
                },
                Err(_) => node.get(step)?,
            };
        }
        match node {
            Tree::Leaf(leaf) => leaf.annotation().cloned(),
            _ => None,
        }
    }

    #[test]
    fn table_matching_uses_enclosing_field_name() {
        let entries = entries();
        let options = PipelineOptions::new().with_match_table(true);
        let annotation = Annotator::new(&entries, &options).annotate(&tree());

        let model = entry_of(&annotation.tree, &["compounds", "models", "0", "name"]);
        assert_eq!(model.map(|entry| entry.ontterm_id), Some(1));
        let compound = entry_of(&annotation.tree, &["compounds", "name"]);
        assert_eq!(compound.map(|entry| entry.ontterm_id), Some(2));
        // smiles inside models has no crosswalk row for that table
        assert!(entry_of(&annotation.tree, &["compounds", "models", "0", "smiles"]).is_none());
        assert!(annotation.warnings.is_empty());
    }

    #[test]
    fn ambiguous_field_takes_first_entry_by_default() {
        let entries = entries();
        let options = PipelineOptions::new();
        let annotation = Annotator::new(&entries, &options).annotate(&tree());

        let compound = entry_of(&annotation.tree, &["compounds", "name"]);
        assert_eq!(compound.map(|entry| entry.ontterm_id), Some(1));
        assert_eq!(annotation.warnings.len(), 2);
    }

    #[test]
    fn skip_policy_leaves_ambiguous_leaf_plain() {
        let entries = entries();
        let options = PipelineOptions::new().with_ambiguity(AmbiguityPolicy::Skip);
        let annotation = Annotator::new(&entries, &options).annotate(&tree());

        assert!(entry_of(&annotation.tree, &["compounds", "name"]).is_none());
        assert!(entry_of(&annotation.tree, &["compounds", "smiles"]).is_some());
        assert!(annotation.warnings.iter().all(|warning| matches!(
            warning,
            PipelineWarning::AmbiguousCrosswalk { skipped: true, .. }
        )));
    }

    #[test]
    fn booleans_and_unmatched_fields_pass_through() {
        let entries = vec![CrosswalkEntry::new("flag", 1, "system", "compound")];
        let options = PipelineOptions::new();
        let input = tree();
        let annotation = Annotator::new(&entries, &options).annotate(&input);
        assert_eq!(annotation.tree, input);
        assert_eq!(annotation.tree.annotated_count(), 0);
    }

    #[test]
    fn top_level_scalars_use_root_table() {
        let entries = vec![CrosswalkEntry::new("id", 7, "system", "compound").with_table("root")];
        let input = Tree::Mapping(vec![("id".to_string(), Tree::scalar(Scalar::Int(5)))]);

        let without_root = PipelineOptions::new().with_match_table(true);
        let plain = Annotator::new(&entries, &without_root).annotate(&input);
        assert_eq!(plain.tree.annotated_count(), 0);

        let with_root = PipelineOptions::new()
            .with_match_table(true)
            .with_root_table("root");
        let annotated = Annotator::new(&entries, &with_root).annotate(&input);
        assert_eq!(annotated.tree.annotated_count(), 1);
    }

    #[test]
    fn without_root_table_only_untabled_rows_match_top_level_scalars() {
        let entries = vec![
            CrosswalkEntry::new("id", 7, "system", "compound").with_table("root"),
            CrosswalkEntry::new("id", 8, "system", "compound"),
        ];
        let input = Tree::Mapping(vec![("id".to_string(), Tree::scalar(Scalar::Int(5)))]);
        let options = PipelineOptions::new().with_match_table(true);
        let annotation = Annotator::new(&entries, &options).annotate(&input);

        assert_eq!(
            entry_of(&annotation.tree, &["id"]).map(|entry| entry.ontterm_id),
            Some(8)
        );
        assert!(annotation.warnings.is_empty());
    }
}
