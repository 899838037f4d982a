use serde::{Deserialize, Serialize};

use crate::crosswalk::{CrosswalkEntry, Namespace, OntologyTerm};
use crate::rules::RuleSet;

/// The read-only tables a crosswalk run consults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupTables {
    pub crosswalks: Vec<CrosswalkEntry>,
    pub ontology_terms: Vec<OntologyTerm>,
    pub namespaces: Vec<Namespace>,
    #[serde(default)]
    pub rules: RuleSet,
}

impl LookupTables {
    pub fn term(&self, id: u32) -> Option<&OntologyTerm> {
        self.ontology_terms.iter().find(|term| term.id == id)
    }

    pub fn namespace(&self, id: u32) -> Option<&Namespace> {
        self.namespaces.iter().find(|namespace| namespace.id == id)
    }
}
