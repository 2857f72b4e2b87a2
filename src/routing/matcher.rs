//! Route pattern matching.
//!
//! # Responsibilities
//! - Compile a URI pattern once at registration
//! - Test a URI against it
//! - Bind capture groups to named route parameters
//!
//! # Design Decisions
//! - Patterns are anchored (`^(?:pattern)$`): a rule matches the whole URI
//! - Parameter names are an explicit ordered list; group 0 (the whole
//!   match) is never bound
//! - Named groups supply their own names; unnamed groups can be named
//!   positionally with [`RoutePattern::with_params`]

use std::collections::HashMap;

use regex::Regex;

use crate::error::PatternError;

/// A compiled, anchored URI pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    /// Name for each capture group, index 0 being group 1.
    params: Vec<Option<String>>,
}

impl RoutePattern {
    /// Compile a pattern whose parameters are its named capture groups.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = compile(pattern)?;
        let params = regex
            .capture_names()
            .skip(1)
            .map(|name| name.map(str::to_string))
            .collect();
        Ok(Self {
            source: pattern.to_string(),
            regex,
            params,
        })
    }

    /// Compile a pattern and name its capture groups in order.
    ///
    /// Groups beyond `names` keep their own name (if any).
    pub fn with_params(pattern: &str, names: &[&str]) -> Result<Self, PatternError> {
        let mut compiled = Self::new(pattern)?;
        for (slot, name) in compiled.params.iter_mut().zip(names) {
            *slot = Some((*name).to_string());
        }
        Ok(compiled)
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Ordered parameter names (unnamed groups omitted).
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().filter_map(|p| p.as_deref())
    }

    pub fn is_match(&self, uri: &str) -> bool {
        self.regex.is_match(uri)
    }

    /// Match `uri` and bind parameters. Groups that did not participate in
    /// the match bind to an empty string.
    pub fn captures(&self, uri: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(uri)?;
        let bound = self
            .params
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let name = name.as_ref()?;
                let value = caps.get(i + 1).map(|m| m.as_str()).unwrap_or_default();
                Some((name.clone(), value.to_string()))
            })
            .collect();
        Some(bound)
    }
}

fn compile(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| PatternError {
        pattern: pattern.to_string(),
        source,
    })
}
