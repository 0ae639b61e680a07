//! Ordered header table.

use super::types::{HeaderKind, HeaderRule, LineClass, Scope};

/// Ordered table of header rules.
///
/// Rules are tried in registration order; the first rule admitted by the
/// scope that matches decides the line's class. New header dialects are
/// supported by registering more rules.
#[derive(Debug, Clone, Default)]
pub struct HeaderRegistry {
    rules: Vec<HeaderRule>,
}

impl HeaderRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule to the table.
    pub fn register(&mut self, rule: HeaderRule) {
        self.rules.push(rule);
    }

    /// Classify a line under `scope`.
    ///
    /// The line is trimmed before matching.
    pub fn classify<'a>(&self, line: &'a str, scope: Scope) -> LineClass<'a> {
        let line = line.trim();
        if line.is_empty() {
            return LineClass::NotAHeader;
        }

        self.rules
            .iter()
            .filter(|rule| scope.admits(rule.kind))
            .find_map(|rule| rule.apply(line))
            .unwrap_or(LineClass::NotAHeader)
    }

    /// True when the line is a header of any kind admitted by `scope`.
    #[must_use]
    pub fn is_header(&self, line: &str, scope: Scope) -> bool {
        self.classify(line, scope).is_header()
    }

    /// Number of rules registered for `kind`.
    #[must_use]
    pub fn rule_count(&self, kind: HeaderKind) -> usize {
        self.rules.iter().filter(|r| r.kind == kind).count()
    }

    /// Total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
