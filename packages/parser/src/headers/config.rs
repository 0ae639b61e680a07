//! Header table for Mexican statutory texts.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::core::HeaderRegistry;
use super::numerals::{is_roman_numeral, is_roman_numeral_any_case};
use super::types::{HeaderKind, HeaderRule, TransitoryDialect};
use crate::text::is_upper_line;

/// Statute name: LEY, CÓDIGO, CONSTITUCIÓN, REGLAMENTO.
const LAW_TITLE: &str = r"(?i)^(?:LEY|C[ÓO]DIGO|CONSTITUCI[ÓO]N|REGLAMENTO)\b";

/// TÍTULO / CAPÍTULO / SECCIÓN / LIBRO followed by a numbering token.
const CHAPTER: &str = concat!(
    r"(?i)^(?:T[ÍI]TULO|CAP[ÍI]TULO|SECCI[ÓO]N|LIBRO)\s+",
    r"(?P<token>\d+[º°o]?|[IVXLCDM]+|",
    r"(?:PRIMER|SEGUND|TERCER|CUART|QUINT|SEXT|S[ÉE]PTIM|OCTAV|NOVEN|D[ÉE]CIM|",
    r"UND[ÉE]CIM|DUOD[ÉE]CIM|VIG[ÉE]SIM|TRIG[ÉE]SIM)[OA]|[ÚU]NIC[OA]|PRELIMINAR)",
    r"(?:[\s.:,\-–—]|$)",
);

/// Artículo / ARTÍCULO / Art. with a number, optional separator and inline text.
const ARTICLE: &str = concat!(
    r"(?i)^(?:ART[ÍI]CULO\s+|ART\.\s*)",
    r"(?P<token>\d+(?:[º°o]|\s[º°])?|[ÚU]NICO|",
    r"(?:PRIMER|SEGUND|TERCER|CUART|QUINT|SEXT|S[ÉE]PTIM|OCTAV|NOVEN|D[ÉE]CIM)O)",
    r"(?:(?:\s*[.:\-–—])+\s*|\s+|$)(?P<rest>.*)$",
);

/// Roman fracción closed by a period and/or dash: "I.", "II.-", "III —", "iv.".
const SUB_ITEM_ROMAN: &str =
    r"^(?P<token>[IVXLCDM]+|[ivx]+)(?:\.\s*[-–—]?|\s*[-–—])\s*(?P<rest>.*)$";

/// Inciso closed by a parenthesis: "a)", "II)", "3)".
const SUB_ITEM_PAREN: &str = concat!(
    r"^(?P<token>(?:[IVXLCDM]+|[ivxlcdm]+|[a-zñ]|\d{1,3})\))",
    r"(?:\s*[.\-–—])*\s*(?P<rest>.*)$",
);

/// TRANSITORIOS, ARTÍCULOS TRANSITORIOS, DE LOS ARTÍCULOS TRANSITORIOS.
const TRANSITORY_BLOCK: &str =
    r"(?i)^(?:DE\s+LOS\s+)?(?:ART[ÍI]CULOS?\s+)?TRANSITORIOS?\b(?P<rest>.*)$";

/// Letter-spaced "T R A N S I T O R I O S".
const TRANSITORY_BLOCK_SPACED: &str =
    r"(?i)^T\s+R\s+A\s+N\s+S\s+I\s+T\s+O\s+R\s+I\s+O(?:\s+S)?\b(?P<rest>.*)$";

/// Ordinal transitory key, optionally prefixed by "Artículo".
const TRANSITORY_ORDINAL: &str = concat!(
    r"(?i)^(?:ART[ÍI]CULO\s+)?",
    r"(?P<token>(?:D[ÉE]CIMO|VIG[ÉE]SIMO|TRIG[ÉE]SIMO)",
    r"(?:\s*(?:PRIMERO|SEGUNDO|TERCERO|CUARTO|QUINTO|SEXTO|S[ÉE]PTIMO|OCTAVO|NOVENO))?|",
    r"UND[ÉE]CIMO|DUOD[ÉE]CIMO|PRIMERO|SEGUNDO|TERCERO|CUARTO|QUINTO|SEXTO|",
    r"S[ÉE]PTIMO|OCTAVO|NOVENO|[ÚU]NICO)",
    r"(?:(?P<sep>(?:\s*[.:\-–—])+)\s*|\s+|$)(?P<rest>.*)$",
);

/// Arabic transitory key; a separator is required.
const TRANSITORY_ARABIC: &str =
    r"^(?:(?i:ART[ÍI]CULO)\s+)?(?P<token>\d+[º°o]?)(?:\s*[.:\-–—])+\s*(?P<rest>.*)$";

/// Uppercase Roman transitory key; a separator is required.
const TRANSITORY_ROMAN: &str =
    r"^(?:(?i:ART[ÍI]CULO)\s+)?(?P<token>[IVXLCDM]+)(?:\s*[.:\-–—])+\s*(?P<rest>.*)$";

#[allow(clippy::expect_used)] // Patterns are compile-time constants covered by tests
fn rule(kind: HeaderKind, pattern: &str) -> HeaderRule {
    HeaderRule::new(kind, Regex::new(pattern).expect("valid header pattern"))
}

/// Chapter tokens made only of Roman letters must be real numerals.
fn is_chapter_token(token: &str) -> bool {
    let roman_letters = token
        .chars()
        .all(|c| matches!(c.to_ascii_uppercase(), 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M'));
    !roman_letters || is_roman_numeral(&token.to_ascii_uppercase())
}

fn is_paren_marker(token: &str) -> bool {
    let inner = token.trim_end_matches(')');
    inner.chars().count() == 1
        || inner.chars().all(|c| c.is_ascii_digit())
        || is_roman_numeral_any_case(inner)
}

/// A transitorios header stands on its own line: nothing but punctuation
/// follows the keyword, or the whole line is uppercase.
fn is_standalone_block_header(line: &str, caps: &Captures<'_>) -> bool {
    let rest = caps.name("rest").map_or("", |m| m.as_str());
    !rest.chars().any(char::is_alphanumeric) || is_upper_line(line)
}

/// Ordinal keys written in mixed case need a separator ("Primero.-") unless
/// they stand alone, so prose such as "Primero se..." stays body text.
fn is_ordinal_item(_line: &str, caps: &Captures<'_>) -> bool {
    let token = caps.name("token").map_or("", |m| m.as_str());
    let rest = caps.name("rest").map_or("", |m| m.as_str().trim());
    caps.name("sep").is_some() || rest.is_empty() || is_upper_line(token)
}

/// Create the header registry for Mexican federal and state statutes.
///
/// Rule order matters only within a scope; kinds never compete for the same
/// line outside the scopes that admit them together.
#[must_use]
pub fn create_mexican_law_registry() -> HeaderRegistry {
    let mut registry = HeaderRegistry::new();

    registry.register(rule(HeaderKind::LawTitle, LAW_TITLE));

    registry.register(rule(HeaderKind::Chapter, CHAPTER).with_token_check(is_chapter_token));

    registry.register(rule(HeaderKind::Article, ARTICLE));

    registry.register(rule(HeaderKind::SubItem, SUB_ITEM_ROMAN).with_token_check(is_roman_numeral_any_case));
    registry.register(rule(HeaderKind::SubItem, SUB_ITEM_PAREN).with_token_check(is_paren_marker));

    registry.register(
        rule(HeaderKind::TransitoryBlock, TRANSITORY_BLOCK)
            .with_line_check(is_standalone_block_header),
    );
    registry.register(
        rule(HeaderKind::TransitoryBlock, TRANSITORY_BLOCK_SPACED)
            .with_line_check(is_standalone_block_header),
    );

    registry.register(
        rule(
            HeaderKind::TransitoryItem(TransitoryDialect::Ordinal),
            TRANSITORY_ORDINAL,
        )
        .with_line_check(is_ordinal_item),
    );
    registry.register(rule(
        HeaderKind::TransitoryItem(TransitoryDialect::Arabic),
        TRANSITORY_ARABIC,
    ));
    registry.register(
        rule(
            HeaderKind::TransitoryItem(TransitoryDialect::Roman),
            TRANSITORY_ROMAN,
        )
        .with_token_check(is_roman_numeral),
    );

    registry
}

/// Process-wide registry used by [`crate::parse_document`].
pub static MEXICAN_LAW_REGISTRY: LazyLock<HeaderRegistry> =
    LazyLock::new(create_mexican_law_registry);
