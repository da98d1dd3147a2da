//! Ordered, case-insensitive find/replace rules for outbound text

use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;

use crate::config::RedactionRuleConfig;
use crate::error::{Result, StudioError};

/// A literal pattern matched case-insensitively and its replacement
#[derive(Debug, Clone)]
pub struct RedactionRule {
    pattern: String,
    replacement: String,
    matcher: Regex,
}

impl RedactionRule {
    /// Compile a rule. Empty patterns are rejected.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(StudioError::Config(
                "Redaction rule pattern must not be empty".to_string(),
            ));
        }

        let matcher = RegexBuilder::new(&regex::escape(&pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| StudioError::Config(format!("Invalid redaction pattern '{pattern}': {e}")))?;

        Ok(Self {
            pattern,
            replacement: replacement.into(),
            matcher,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match in a single pass; `$` in the replacement is literal
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.matcher.replace_all(text, NoExpand(&self.replacement))
    }
}

/// The configured rule list, applied in declaration order
#[derive(Debug, Clone, Default)]
pub struct RedactionSet {
    rules: Vec<RedactionRule>,
}

impl RedactionSet {
    pub fn new(rules: Vec<RedactionRule>) -> Self {
        Self { rules }
    }

    /// Compile every configured rule, failing on the first invalid one
    pub fn from_config(rules: &[RedactionRuleConfig]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| RedactionRule::new(rule.pattern.clone(), rule.replacement.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Apply all rules in order; each rule sees the previous rule's output
    ///
    /// Rules are not re-applied after substitution.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut result = Cow::Borrowed(text);
        for rule in &self.rules {
            let replaced = match rule.apply(&result) {
                Cow::Owned(replaced) => replaced,
                Cow::Borrowed(_) => continue,
            };
            result = Cow::Owned(replaced);
        }
        result
    }
}
