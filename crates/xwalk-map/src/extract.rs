//! Selects annotated leaves from a flattened tree and derives their grouping keys.

use xwalk_model::{CrosswalkEntry, DatasetGrouping, ExtractedLeaf, Leaf};

use crate::flatten::{FlatTree, PATH_SEPARATOR};

/// Last path segment.
pub fn local_key(path: &str) -> &str {
    path.rsplit(PATH_SEPARATOR).next().unwrap_or(path)
}

/// The path up to and including its last run of digits.
///
/// `compounds;props;0;models;name` groups as `compounds;props;0`, so every
/// leaf below one repetition shares a key. Without digits the key is the
/// path minus its last segment.
pub fn group_key(path: &str) -> &str {
    match path.rfind(|c: char| c.is_ascii_digit()) {
        Some(index) => &path[..=index],
        None => path
            .rsplit_once(PATH_SEPARATOR)
            .map_or(path, |(parent, _)| parent),
    }
}

pub fn group_link(group_key: &str, entry: &CrosswalkEntry, grouping: DatasetGrouping) -> String {
    if entry.is_dataset() && grouping == DatasetGrouping::ByPosition {
        format!("{group_key}/")
    } else {
        format!("{group_key}/{}", entry.subsection)
    }
}

/// Keeps the annotated entries of `flat`, in path order.
pub fn extract_leaves(flat: &FlatTree, grouping: DatasetGrouping) -> Vec<ExtractedLeaf> {
    flat.iter()
        .filter_map(|(path, leaf)| match leaf {
            Leaf::Annotated(annotated) => {
                let group_key = group_key(path);
                let link = group_link(group_key, &annotated.entry, grouping);
                Some(ExtractedLeaf {
                    path_key: path.to_string(),
                    local_key: local_key(path).to_string(),
                    group_key: group_key.to_string(),
                    group_link: link.clone(),
                    original_link: link,
                    value: annotated.value.clone(),
                    entry: annotated.entry.clone(),
                })
            }
            Leaf::Scalar(_) => None,
        })
        .collect()
}
