//! Collapses a nested tree into a single-level mapping keyed by path.

use xwalk_model::{Leaf, Tree};

pub const PATH_SEPARATOR: char = ';';

/// Path key to leaf, in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTree {
    entries: Vec<(String, Leaf)>,
}

impl FlatTree {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Leaf> {
        self.entries
            .iter()
            .find(|(key, _)| key == path)
            .map(|(_, leaf)| leaf)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Leaf)> {
        self.entries.iter().map(|(key, leaf)| (key.as_str(), leaf))
    }

    pub fn into_entries(self) -> Vec<(String, Leaf)> {
        self.entries
    }

    /// Rebuilds a single-level mapping tree from the entries.
    pub fn to_tree(&self) -> Tree {
        Tree::Mapping(
            self.entries
                .iter()
                .map(|(key, leaf)| (key.clone(), Tree::Leaf(leaf.clone())))
                .collect(),
        )
    }
}

fn join(parent: &str, child: &str) -> String {
    format!("{parent}{PATH_SEPARATOR}{child}")
}

/// Unpacks one level of nesting for a single entry.
fn unpack(path: String, tree: Tree, out: &mut Vec<(String, Tree)>) {
    match tree {
        Tree::Mapping(fields) => {
            out.extend(
                fields
                    .into_iter()
                    .map(|(name, child)| (join(&path, &name), child)),
            );
        }
        Tree::Sequence(items) => {
            out.extend(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, child)| (join(&path, &index.to_string()), child)),
            );
        }
        leaf @ Tree::Leaf(_) => out.push((path, leaf)),
    }
}

/// Flattens `tree`, one level of nesting for every entry per pass.
///
/// Empty mappings and sequences contribute no entries. Top-level field names
/// are used as-is; a scalar root flattens to a single entry with an empty key.
pub fn flatten(tree: Tree) -> FlatTree {
    let mut entries: Vec<(String, Tree)> = match tree {
        Tree::Mapping(fields) => fields,
        Tree::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, child)| (index.to_string(), child))
            .collect(),
        leaf @ Tree::Leaf(_) => vec![(String::new(), leaf)],
    };

    while entries.iter().any(|(_, child)| !child.is_leaf()) {
        let mut next = Vec::with_capacity(entries.len());
        for (path, child) in entries {
            unpack(path, child, &mut next);
        }
        entries = next;
    }

    FlatTree {
        entries: entries
            .into_iter()
            .filter_map(|(path, child)| match child {
                Tree::Leaf(leaf) => Some((path, leaf)),
                _ => None,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use xwalk_model::Scalar;

    use super::*;

    #[test]
    fn nested_paths_join_names_and_indices() {
        let tree: Tree = serde_json::from_str(
            r#"{"compounds": {"id": 596, "props": [{"value": 1.5}, {"value": 2}], "empty": []}}"#,
        )
        .expect("parse");
        let flat = flatten(tree);
        let keys: Vec<&str> = flat.iter().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec![
                "compounds;id",
                "compounds;props;0;value",
                "compounds;props;1;value"
            ]
        );
        assert_eq!(
            flat.get("compounds;props;1;value").map(Leaf::value),
            Some(&Scalar::Int(2))
        );
    }

    #[test]
    fn scalar_root_has_empty_key() {
        let flat = flatten(Tree::scalar("x"));
        assert_eq!(flat.len(), 1);
        assert!(flat.get("").is_some());
    }
}
