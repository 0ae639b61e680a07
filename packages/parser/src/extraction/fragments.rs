//! Fragmentation of a document into prompt-sized pieces.

use crate::config::EXTRACTION_CHUNK_LIMIT;
use crate::headers::{HeaderRegistry, LineClass, Scope};
use crate::text::prepare_input;

/// Role of a fragment in the assembled document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// Text before the first chapter or article header.
    Preamble,
    /// Part of the permanent body.
    Normative,
    /// Everything from the first transitorios header.
    Transitory,
}

impl FragmentKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preamble => "preamble",
            Self::Normative => "normative",
            Self::Transitory => "transitory",
        }
    }
}

/// One piece of text sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub text: String,
}

/// Split `text` into a preamble, normative chunks and the transitorios.
///
/// Normative text is cut at chapter headers; a chunk longer than
/// [`EXTRACTION_CHUNK_LIMIT`] characters is cut again at article headers.
/// Empty pieces are omitted, so the result may hold no preamble or no
/// transitory fragment.
pub fn split_for_extraction(text: &str, registry: &HeaderRegistry) -> Vec<Fragment> {
    let prepared = prepare_input(text);
    let lines: Vec<&str> = prepared.trim().lines().collect();

    let is_structural = |line: &str| {
        matches!(
            registry.classify(line, Scope::Articles),
            LineClass::Chapter { .. } | LineClass::Article { .. }
        )
    };
    let is_chapter = |line: &str| registry.is_header(line, Scope::Chapters);
    let is_article = |line: &str| {
        matches!(registry.classify(line, Scope::Articles), LineClass::Article { .. })
    };

    let Some(normative_start) = lines.iter().position(|&l| is_structural(l)) else {
        return fragment(FragmentKind::Preamble, &lines).into_iter().collect();
    };
    let transitory_start = lines[normative_start..]
        .iter()
        .position(|&l| registry.is_header(l, Scope::TransitoryBoundary))
        .map(|offset| normative_start + offset)
        .unwrap_or(lines.len());

    let mut fragments = Vec::new();
    fragments.extend(fragment(FragmentKind::Preamble, &lines[..normative_start]));

    for chunk in split_before(&lines[normative_start..transitory_start], is_chapter) {
        if char_len(chunk) > EXTRACTION_CHUNK_LIMIT {
            let mut pieces = split_before(chunk, is_article).into_iter();
            // The chapter header travels with its first article.
            let mut head: Vec<&str> = Vec::new();
            if let Some(first) = pieces.next() {
                head.extend_from_slice(first);
                if first.first().is_some_and(|&l| !is_article(l)) {
                    head.extend_from_slice(pieces.next().unwrap_or_default());
                }
            }
            fragments.extend(fragment(FragmentKind::Normative, &head));
            for piece in pieces {
                fragments.extend(fragment(FragmentKind::Normative, piece));
            }
        } else {
            fragments.extend(fragment(FragmentKind::Normative, chunk));
        }
    }

    fragments.extend(fragment(FragmentKind::Transitory, &lines[transitory_start..]));

    tracing::debug!(
        fragments = fragments.len(),
        normative_start,
        transitory_start,
        "Split document for extraction"
    );
    fragments
}

/// Cut `lines` before every line matching `is_boundary`, except the first.
fn split_before<'l, 'a>(lines: &'l [&'a str], is_boundary: impl Fn(&str) -> bool) -> Vec<&'l [&'a str]> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, &line) in lines.iter().enumerate() {
        if i > start && is_boundary(line) {
            pieces.push(&lines[start..i]);
            start = i;
        }
    }
    if start < lines.len() {
        pieces.push(&lines[start..]);
    }
    pieces
}

fn char_len(lines: &[&str]) -> usize {
    lines.iter().map(|l| l.chars().count() + 1).sum::<usize>().saturating_sub(1)
}

fn fragment(kind: FragmentKind, lines: &[&str]) -> Option<Fragment> {
    let text = lines.join("\n").trim().to_string();
    (!text.is_empty()).then_some(Fragment { kind, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::MEXICAN_LAW_REGISTRY;
    use pretty_assertions::assert_eq;

    fn kinds(fragments: &[Fragment]) -> Vec<FragmentKind> {
        fragments.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_three_parts() {
        let text = "DECRETO\nLEY DE PRUEBA\nCAPÍTULO I\nArtículo 1. Uno.\nCAPÍTULO II\nArtículo 2. Dos.\nTRANSITORIOS\nÚnico. Vigor.";
        let fragments = split_for_extraction(text, &MEXICAN_LAW_REGISTRY);

        assert_eq!(
            kinds(&fragments),
            vec![
                FragmentKind::Preamble,
                FragmentKind::Normative,
                FragmentKind::Normative,
                FragmentKind::Transitory
            ]
        );
        assert_eq!(fragments[0].text, "DECRETO\nLEY DE PRUEBA");
        assert_eq!(fragments[2].text, "CAPÍTULO II\nArtículo 2. Dos.");
        assert_eq!(fragments[3].text, "TRANSITORIOS\nÚnico. Vigor.");
    }

    #[test]
    fn test_no_structure_is_all_preamble() {
        let fragments = split_for_extraction("Aviso\nsin artículos", &MEXICAN_LAW_REGISTRY);
        assert_eq!(kinds(&fragments), vec![FragmentKind::Preamble]);
    }

    #[test]
    fn test_no_preamble() {
        let fragments = split_for_extraction("Artículo 1. Uno.\nArtículo 2. Dos.", &MEXICAN_LAW_REGISTRY);
        assert_eq!(kinds(&fragments), vec![FragmentKind::Normative]);
    }

    #[test]
    fn test_large_chapter_split_at_articles() {
        let long = "x".repeat(EXTRACTION_CHUNK_LIMIT);
        let text = format!("CAPÍTULO I\nArtículo 1. {long}\nArtículo 2. Corto.");
        let fragments = split_for_extraction(&text, &MEXICAN_LAW_REGISTRY);

        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].text.starts_with("CAPÍTULO I\nArtículo 1."));
        assert_eq!(fragments[1].text, "Artículo 2. Corto.");
    }

    #[test]
    fn test_split_before() {
        let lines = ["a", "B", "c", "B"];
        let pieces = split_before(&lines, |l| l == "B");
        assert_eq!(pieces, vec![&lines[0..1], &lines[1..3], &lines[3..4]]);
    }
}
