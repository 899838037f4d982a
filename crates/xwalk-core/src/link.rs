//! Resolves link rules into relation fields between document records.

use std::collections::HashMap;

use regex::Regex;
use tracing::debug;
use xwalk_map::{compile, substitute};
use xwalk_model::{Document, LinkRule, Node, NodeValue, PipelineWarning, Result, Scalar, Section};

struct CompiledLink {
    source: Regex,
    targets: Vec<(String, String)>,
}

/// Compiled link rules.
pub struct CrossLinker {
    rules: Vec<CompiledLink>,
}

/// A relation to attach once every rule has been evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingLink {
    section: Section,
    index: usize,
    relation: String,
    target: String,
}

/// References a record exposes for linking: its own `#`, then the `#` of
/// each value wrapper in its `data` list.
pub fn record_references(node: &Node) -> Vec<&str> {
    let mut references: Vec<&str> = node.refs.link.as_deref().into_iter().collect();
    references.extend(
        node.data()
            .filter_map(|datum| datum.get("value").and_then(NodeValue::as_node))
            .filter_map(|value| value.refs.link.as_deref()),
    );
    references
}

impl CrossLinker {
    pub fn new(rules: &[LinkRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| -> Result<CompiledLink> {
                Ok(CompiledLink {
                    source: compile("link", &rule.source)?,
                    targets: rule
                        .targets
                        .iter()
                        .map(|target| (target.relation.clone(), target.pattern.clone()))
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Ids of records (in link order) with a reference matching `pattern`.
    fn matching_ids(
        cache: &mut HashMap<String, Regex>,
        document: &Document,
        pattern: &str,
    ) -> Result<Vec<String>> {
        if !cache.contains_key(pattern) {
            cache.insert(pattern.to_string(), compile("link target", pattern)?);
        }
        let regex = &cache[pattern];
        Ok(document
            .records()
            .filter(|node| {
                record_references(node)
                    .iter()
                    .any(|reference| regex.is_match(reference))
            })
            .map(|node| node.id.clone())
            .collect())
    }

    /// Attaches relation fields to every record whose reference matches a
    /// rule's source pattern. A record without references gains nothing.
    pub fn link(&self, document: &mut Document) -> Result<Vec<PipelineWarning>> {
        let mut warnings = Vec::new();
        let mut pending = Vec::new();
        let mut cache = HashMap::new();

        for section in Document::LINK_ORDER {
            for (index, node) in document.nodes(section).iter().enumerate() {
                for reference in record_references(node) {
                    for rule in &self.rules {
                        for (relation, template) in &rule.targets {
                            let Some(substitution) = substitute(&rule.source, reference, template)
                            else {
                                continue;
                            };
                            warnings.extend(substitution.warning);
                            for target in Self::matching_ids(&mut cache, document, &substitution.text)? {
                                pending.push(PendingLink {
                                    section,
                                    index,
                                    relation: relation.clone(),
                                    target,
                                });
                            }
                        }
                    }
                }
            }
        }

        debug!(relations = pending.len(), "links resolved");
        for link in pending {
            if let Some(node) = document.nodes_mut(link.section).get_mut(link.index) {
                attach(node, &link.relation, link.target);
            }
        }
        Ok(warnings)
    }
}

/// Adds `target` under `relation`, keeping distinct ids in first-seen order;
/// a single id stays a scalar.
fn attach(node: &mut Node, relation: &str, target: String) {
    let mut ids: Vec<NodeValue> = match node.remove(relation) {
        Some(NodeValue::List(items)) => items,
        Some(existing) => vec![existing],
        None => Vec::new(),
    };
    let target = NodeValue::Scalar(Scalar::Text(target));
    if !ids.contains(&target) {
        ids.push(target);
    }
    let value = if ids.len() == 1 {
        ids.remove(0)
    } else {
        NodeValue::List(ids)
    };
    node.insert(relation, value);
}
