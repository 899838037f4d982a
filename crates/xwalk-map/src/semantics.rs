//! Resolves the ontology namespaces used by a set of annotated leaves.

use std::collections::BTreeMap;

use xwalk_model::{ExtractedLeaf, LookupError, LookupTables};

/// Namespace prefix to URI.
pub type NamespaceMap = BTreeMap<String, String>;

pub fn resolve_namespaces(
    leaves: &[ExtractedLeaf],
    tables: &LookupTables,
) -> Result<NamespaceMap, LookupError> {
    let mut namespaces = NamespaceMap::new();
    for leaf in leaves {
        let ontterm_id = leaf.entry.ontterm_id;
        let term = tables
            .term(ontterm_id)
            .ok_or_else(|| LookupError::UnknownTerm {
                ontterm_id,
                field: leaf.entry.field.clone(),
            })?;
        let namespace =
            tables
                .namespace(term.nspace_id)
                .ok_or(LookupError::UnknownNamespace {
                    nspace_id: term.nspace_id,
                    ontterm_id,
                })?;
        namespaces.insert(namespace.ns.clone(), namespace.path.clone());
    }
    Ok(namespaces)
}
