//! Types for the header classification table.

use std::fmt;

use regex::{Captures, Regex};

/// Numbering style of the items in one transitorios block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitoryDialect {
    /// "Primero", "Segundo", "Décimo Primero", "Único".
    Ordinal,
    /// "1", "2º".
    Arabic,
    /// "I", "II".
    Roman,
}

/// Structural role a header rule recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    /// Line naming the statute (LEY, CÓDIGO, CONSTITUCIÓN, REGLAMENTO).
    LawTitle,
    /// TÍTULO, CAPÍTULO, SECCIÓN or LIBRO header.
    Chapter,
    /// Permanent article header.
    Article,
    /// Fracción or inciso marker.
    SubItem,
    /// Start of a transitorios block.
    TransitoryBlock,
    /// Transitory article header in the given numbering style.
    TransitoryItem(TransitoryDialect),
}

/// Classification of a single line.
///
/// Borrowed parts point into the classified line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    NotAHeader,
    LawTitle,
    /// The whole header line, e.g. "CAPÍTULO II De las obligaciones".
    Chapter {
        label: &'a str,
    },
    Article {
        token: &'a str,
        rest: &'a str,
    },
    SubItem {
        marker: &'a str,
        rest: &'a str,
    },
    TransitoryBlock,
    TransitoryItem {
        key: &'a str,
        dialect: TransitoryDialect,
        rest: &'a str,
    },
}

impl LineClass<'_> {
    #[must_use]
    pub fn is_header(&self) -> bool {
        !matches!(self, Self::NotAHeader)
    }
}

/// Which header kinds a pass is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Headers that end a decree preamble: law title, chapter, transitorios.
    Preamble,
    /// Any structural start, articles included.
    Structure,
    /// Law title lines.
    Title,
    /// Chapter headers.
    Chapters,
    /// Article headers, plus chapter headers that end the range.
    Articles,
    /// Fracción markers.
    SubItems,
    /// Transitorios block headers.
    TransitoryBoundary,
    /// Transitory article headers.
    TransitoryItems,
}

impl Scope {
    /// Whether rules of `kind` take part in classification under this scope.
    #[must_use]
    pub fn admits(self, kind: HeaderKind) -> bool {
        match self {
            Self::Preamble => matches!(
                kind,
                HeaderKind::LawTitle | HeaderKind::Chapter | HeaderKind::TransitoryBlock
            ),
            Self::Structure => Self::Preamble.admits(kind) || kind == HeaderKind::Article,
            Self::Title => kind == HeaderKind::LawTitle,
            Self::Chapters => kind == HeaderKind::Chapter,
            Self::Articles => matches!(kind, HeaderKind::Chapter | HeaderKind::Article),
            Self::SubItems => kind == HeaderKind::SubItem,
            Self::TransitoryBoundary => kind == HeaderKind::TransitoryBlock,
            Self::TransitoryItems => matches!(kind, HeaderKind::TransitoryItem(_)),
        }
    }
}

/// Extra acceptance test run on the captured `token` group.
pub type TokenCheck = fn(&str) -> bool;

/// Extra acceptance test run on the whole line and its captures.
pub type LineCheck = fn(&str, &Captures<'_>) -> bool;

/// One entry of the classification table.
///
/// Patterns may define a `token` group (number, marker or key) and a `rest`
/// group (inline text after the header).
#[derive(Clone)]
pub struct HeaderRule {
    pub kind: HeaderKind,
    pub pattern: Regex,
    pub token_check: Option<TokenCheck>,
    pub line_check: Option<LineCheck>,
}

impl HeaderRule {
    /// Create a rule without extra checks.
    #[must_use]
    pub fn new(kind: HeaderKind, pattern: Regex) -> Self {
        Self {
            kind,
            pattern,
            token_check: None,
            line_check: None,
        }
    }

    /// Require the `token` group to pass `check`.
    #[must_use]
    pub fn with_token_check(mut self, check: TokenCheck) -> Self {
        self.token_check = Some(check);
        self
    }

    /// Require the line to pass `check`.
    #[must_use]
    pub fn with_line_check(mut self, check: LineCheck) -> Self {
        self.line_check = Some(check);
        self
    }

    /// Try this rule on a trimmed line.
    pub fn apply<'a>(&self, line: &'a str) -> Option<LineClass<'a>> {
        let caps = self.pattern.captures(line)?;
        let token = caps.name("token").map_or("", |m| m.as_str());

        if let Some(check) = self.token_check {
            if !check(token) {
                return None;
            }
        }
        if let Some(check) = self.line_check {
            if !check(line, &caps) {
                return None;
            }
        }

        let rest = caps.name("rest").map_or("", |m| m.as_str().trim());

        Some(match self.kind {
            HeaderKind::LawTitle => LineClass::LawTitle,
            HeaderKind::Chapter => LineClass::Chapter { label: line },
            HeaderKind::Article => LineClass::Article { token, rest },
            HeaderKind::SubItem => LineClass::SubItem {
                marker: token,
                rest,
            },
            HeaderKind::TransitoryBlock => LineClass::TransitoryBlock,
            HeaderKind::TransitoryItem(dialect) => LineClass::TransitoryItem {
                key: token,
                dialect,
                rest,
            },
        })
    }
}

impl fmt::Debug for HeaderRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderRule")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .field("has_token_check", &self.token_check.is_some())
            .field("has_line_check", &self.line_check.is_some())
            .finish()
    }
}
