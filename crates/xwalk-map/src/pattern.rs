//! Regex rules with placeholder templates.
//!
//! Override and link rules share one convention: the rule pattern is searched
//! in a group link, and its second capture group (the repetition index in the
//! usual `(prefix)(\d+)(suffix)` shape) replaces [`PLACEHOLDER`] in the
//! rule's template. Without a second group the template is used as written.

use regex::Regex;
use xwalk_model::{PLACEHOLDER, PipelineError, PipelineWarning, Result};

pub fn compile(rule: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| PipelineError::InvalidPattern {
        rule,
        pattern: pattern.to_string(),
        source,
    })
}

/// Result of instantiating a template against a matching subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub warning: Option<PipelineWarning>,
}

/// Instantiates `template` if `regex` matches `subject`; `None` when it does not.
pub fn substitute(regex: &Regex, subject: &str, template: &str) -> Option<Substitution> {
    let captures = regex.captures(subject)?;
    let substitution = match captures.get(2) {
        Some(group) => Substitution {
            text: template.replace(PLACEHOLDER, group.as_str()),
            warning: None,
        },
        None => Substitution {
            text: template.to_string(),
            warning: template
                .contains(PLACEHOLDER)
                .then(|| PipelineWarning::PatternSubstitution {
                    pattern: regex.as_str().to_string(),
                    subject: subject.to_string(),
                }),
        },
    };
    Some(substitution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_group_fills_placeholder() {
        let regex = compile("override", r"(a;b;)(\d+)(/x)").expect("compile");
        let out = substitute(&regex, "a;b;12/x", "a;b;$!@%/y").expect("match");
        assert_eq!(out.text, "a;b;12/y");
        assert!(out.warning.is_none());
    }

    #[test]
    fn missing_group_falls_back_to_template() {
        let regex = compile("link", r"compounds/compound").expect("compile");
        let literal = substitute(&regex, "compounds/compound", "model/$!@%").expect("match");
        assert_eq!(literal.text, "model/$!@%");
        assert!(matches!(
            literal.warning,
            Some(PipelineWarning::PatternSubstitution { .. })
        ));

        let plain = substitute(&regex, "compounds/compound", "compounds/compound").expect("match");
        assert!(plain.warning.is_none());
    }

    #[test]
    fn no_match_yields_none() {
        let regex = compile("override", r"(x)(\d+)").expect("compile");
        assert!(substitute(&regex, "nothing here", "$!@%").is_none());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let error = compile("group", "(unclosed").expect_err("should fail");
        assert!(error.to_string().contains("invalid group pattern"));
    }
}
