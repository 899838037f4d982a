//! Group-link overrides: move leaves between grouping buckets.

use regex::Regex;
use tracing::debug;
use xwalk_model::{ExtractedLeaf, OverrideRule, PipelineWarning, Result};

use crate::pattern::{compile, substitute};

/// Compiled override rules, applied in table order.
#[derive(Debug, Clone)]
pub struct GroupLinkRewriter {
    rules: Vec<(Regex, String)>,
}

impl GroupLinkRewriter {
    pub fn new(rules: &[OverrideRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| -> Result<(Regex, String)> {
                Ok((compile("override", &rule.pattern)?, rule.replacement.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule against the current link; each match overwrites it,
    /// so the last matching rule decides the result.
    pub fn rewrite(&self, link: &str, warnings: &mut Vec<PipelineWarning>) -> String {
        let mut current = link.to_string();
        for (regex, replacement) in &self.rules {
            if let Some(substitution) = substitute(regex, &current, replacement) {
                debug!(
                    pattern = regex.as_str(),
                    from = %current,
                    to = %substitution.text,
                    "group link override"
                );
                warnings.extend(substitution.warning);
                current = substitution.text;
            }
        }
        current
    }

    pub fn apply(&self, leaves: &mut [ExtractedLeaf]) -> Vec<PipelineWarning> {
        let mut warnings = Vec::new();
        for leaf in leaves.iter_mut() {
            leaf.group_link = self.rewrite(&leaf.group_link, &mut warnings);
        }
        warnings
    }
}
