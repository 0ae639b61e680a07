//! Permanent article segmentation within one chapter range.

use super::fold::{fold_units, Line, LineEvent};
use super::subitems::split_sub_items;
use super::types::{SegmentedArticle, Span};
use crate::headers::{HeaderRegistry, LineClass, Scope};
use crate::types::{ArticleNumber, ParseWarning};

/// Map an article token to its number.
///
/// Digits (with an optional ordinal mark) parse as integers and "Único"
/// counts as 1. Anything else also becomes 1 and is reported back as
/// ambiguous through the `false` flag.
pub fn article_number(token: &str) -> (u32, bool) {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    if !digits.is_empty() {
        return match digits.parse() {
            Ok(n) => (n, true),
            Err(_) => (1, false),
        };
    }

    let word = token.to_uppercase();
    if word == "ÚNICO" || word == "UNICO" {
        (1, true)
    } else {
        (1, false)
    }
}

/// Segment the articles of one chapter.
///
/// Lines before the first article header are ignored. A chapter header ends
/// the range immediately. Articles are kept even when their text is empty.
pub fn segment_articles(
    lines: &[Line<'_>],
    range_end: usize,
    registry: &HeaderRegistry,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<SegmentedArticle> {
    let segmented = fold_units(lines, range_end, |line| {
        match registry.classify(line.text, Scope::Articles) {
            LineClass::Chapter { .. } => LineEvent::Stop,
            LineClass::Article { token, rest } => LineEvent::Header {
                header: token,
                rest,
            },
            _ => LineEvent::Body,
        }
    });

    if let Some(at) = segmented.stopped_at {
        tracing::debug!(line = at + 1, "Chapter header ends article range");
    }

    segmented
        .units
        .into_iter()
        .map(|unit| {
            let (number, exact) = article_number(unit.header);
            if !exact {
                warnings.push(ParseWarning::AmbiguousArticleNumber {
                    line: unit.start + 1,
                    token: unit.header.to_string(),
                });
            }

            let split = split_sub_items(&unit.lines, unit.end, registry);
            SegmentedArticle {
                number: ArticleNumber::Permanent(number),
                body: split.body,
                sub_items: split.sub_items,
                span: Span::new(unit.start, unit.end),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::MEXICAN_LAW_REGISTRY;
    use crate::segmentation::fold::split_lines;
    use pretty_assertions::assert_eq;

    fn segment(text: &str) -> (Vec<SegmentedArticle>, Vec<ParseWarning>) {
        let lines = split_lines(text);
        let mut warnings = Vec::new();
        let articles = segment_articles(&lines, lines.len(), &MEXICAN_LAW_REGISTRY, &mut warnings);
        (articles, warnings)
    }

    #[test]
    fn test_article_number() {
        assert_eq!(article_number("5"), (5, true));
        assert_eq!(article_number("1o"), (1, true));
        assert_eq!(article_number("2º"), (2, true));
        assert_eq!(article_number("Único"), (1, true));
        assert_eq!(article_number("Primero"), (1, false));
        assert_eq!(article_number("99999999999"), (1, false));
    }

    #[test]
    fn test_articles_with_sub_items() {
        let (articles, warnings) =
            segment("Artículo 5. Las obligaciones son:\nI. Pagar.\nII. Declarar.");
        assert!(warnings.is_empty());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].number, ArticleNumber::Permanent(5));
        assert_eq!(articles[0].body, "Las obligaciones son:");
        assert_eq!(articles[0].sub_items.len(), 2);
        assert_eq!(articles[0].span, Span::new(0, 3));
    }

    #[test]
    fn test_multiline_bodies() {
        let (articles, _) = segment(
            "Artículo 1. Esta ley es de orden\npúblico.\n\nArtículo 2.- Para efectos\nde esta ley.",
        );
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].body, "Esta ley es de orden público.");
        assert_eq!(articles[1].body, "Para efectos de esta ley.");
        assert_eq!(articles[0].span, Span::new(0, 3));
    }

    #[test]
    fn test_chapter_header_stops() {
        let (articles, _) = segment("Artículo 1. Uno\nCAPÍTULO II\nArtículo 2. Dos");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].span, Span::new(0, 1));
    }

    #[test]
    fn test_empty_article_kept() {
        let (articles, _) = segment("Artículo 7\nArtículo 8. Texto");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].body, "");
        assert!(articles[0].sub_items.is_empty());
    }

    #[test]
    fn test_ordinal_number_warns() {
        let (articles, warnings) = segment("Texto suelto\nArtículo Primero. Objeto");
        assert_eq!(articles[0].number, ArticleNumber::Permanent(1));
        assert_eq!(
            warnings,
            vec![ParseWarning::AmbiguousArticleNumber {
                line: 2,
                token: "Primero".into()
            }]
        );
    }
}
