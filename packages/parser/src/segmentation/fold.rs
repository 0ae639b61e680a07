//! Generic header/body state machine shared by all passes.
//!
//! A pass describes each line as a header, body text, or a stop signal; the
//! fold turns that stream into completed units. State is either
//! `BeforeHeader` (lines go to the prelude) or `InBody` (lines go to the open
//! unit). Blank lines are skipped.

use std::ops::ControlFlow;

/// A source line, trimmed, with its 0-based index in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub index: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    #[must_use]
    pub fn new(index: usize, text: &'a str) -> Self {
        Self {
            index,
            text: text.trim(),
        }
    }
}

/// Split text into indexed, trimmed lines.
pub fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(index, text)| Line::new(index, text))
        .collect()
}

/// What a pass sees in one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<'a, H> {
    /// Opens a new unit. `rest` is inline text following the header.
    Header { header: H, rest: &'a str },
    /// Belongs to the open unit, or to the prelude before the first header.
    Body,
    /// Ends the pass; this line and everything after it are left unconsumed.
    Stop,
}

/// A unit closed by the fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUnit<'a, H> {
    pub header: H,
    /// Index of the header line.
    pub start: usize,
    /// Index one past the unit's last line.
    pub end: usize,
    /// Inline header text (if any) followed by the body lines.
    pub lines: Vec<Line<'a>>,
}

/// Output of [`fold_units`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmented<'a, H> {
    /// Body lines seen before the first header.
    pub prelude: Vec<Line<'a>>,
    pub units: Vec<RawUnit<'a, H>>,
    /// Index of the line that stopped the pass, if one did.
    pub stopped_at: Option<usize>,
}

enum State<'a, H> {
    BeforeHeader,
    InBody(RawUnit<'a, H>),
}

struct Fold<'a, H> {
    state: State<'a, H>,
    prelude: Vec<Line<'a>>,
    units: Vec<RawUnit<'a, H>>,
}

impl<'a, H> Fold<'a, H> {
    fn close(&mut self, end: usize) {
        if let State::InBody(mut unit) = std::mem::replace(&mut self.state, State::BeforeHeader) {
            unit.end = end;
            self.units.push(unit);
        }
    }

    fn step(mut self, line: Line<'a>, event: LineEvent<'a, H>) -> ControlFlow<(Self, usize), Self> {
        match event {
            LineEvent::Stop => {
                self.close(line.index);
                ControlFlow::Break((self, line.index))
            }
            LineEvent::Header { header, rest } => {
                self.close(line.index);
                let lines = if rest.is_empty() {
                    Vec::new()
                } else {
                    vec![Line::new(line.index, rest)]
                };
                self.state = State::InBody(RawUnit {
                    header,
                    start: line.index,
                    end: line.index + 1,
                    lines,
                });
                ControlFlow::Continue(self)
            }
            LineEvent::Body => {
                match &mut self.state {
                    State::BeforeHeader => self.prelude.push(line),
                    State::InBody(unit) => unit.lines.push(line),
                }
                ControlFlow::Continue(self)
            }
        }
    }
}

/// Fold `lines` into units.
///
/// `range_end` closes the last open unit when the lines run out without a
/// stop. `classify` is called once per non-blank line, in order.
pub fn fold_units<'a, H>(
    lines: &[Line<'a>],
    range_end: usize,
    mut classify: impl FnMut(Line<'a>) -> LineEvent<'a, H>,
) -> Segmented<'a, H> {
    let start = Fold {
        state: State::BeforeHeader,
        prelude: Vec::new(),
        units: Vec::new(),
    };

    let outcome = lines
        .iter()
        .filter(|line| !line.text.is_empty())
        .try_fold(start, |fold, &line| {
            let event = classify(line);
            fold.step(line, event)
        });

    let (fold, stopped_at) = match outcome {
        ControlFlow::Continue(mut fold) => {
            fold.close(range_end);
            (fold, None)
        }
        ControlFlow::Break((fold, at)) => (fold, Some(at)),
    };

    Segmented {
        prelude: fold.prelude,
        units: fold.units,
        stopped_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered(line: Line<'_>) -> LineEvent<'_, u32> {
        match line.text.strip_prefix('#') {
            Some(n) => LineEvent::Header {
                header: n.trim().parse().unwrap_or(0),
                rest: "",
            },
            None if line.text == "STOP" => LineEvent::Stop,
            None => LineEvent::Body,
        }
    }

    #[test]
    fn test_split_lines_trims_and_indexes() {
        let lines = split_lines("  a \r\n\nb");
        assert_eq!(
            lines,
            vec![Line::new(0, "a"), Line::new(1, ""), Line::new(2, "b")]
        );
    }

    #[test]
    fn test_fold_units_basic() {
        let lines = split_lines("intro\n#1\nuno\n\n#2\ndos\ntres");
        let segmented = fold_units(&lines, lines.len(), numbered);

        assert_eq!(segmented.prelude, vec![Line::new(0, "intro")]);
        assert_eq!(segmented.units.len(), 2);
        assert_eq!(segmented.units[0].header, 1);
        assert_eq!((segmented.units[0].start, segmented.units[0].end), (1, 4));
        assert_eq!(segmented.units[1].lines.len(), 2);
        assert_eq!((segmented.units[1].start, segmented.units[1].end), (4, 7));
        assert_eq!(segmented.stopped_at, None);
    }

    #[test]
    fn test_fold_units_stop() {
        let lines = split_lines("#1\nuno\nSTOP\n#2");
        let segmented = fold_units(&lines, lines.len(), numbered);

        assert_eq!(segmented.units.len(), 1);
        assert_eq!(segmented.units[0].end, 2);
        assert_eq!(segmented.stopped_at, Some(2));
    }

    #[test]
    fn test_fold_units_inline_rest() {
        let lines = split_lines("H texto");
        let segmented = fold_units(&lines, 1, |line| LineEvent::Header {
            header: (),
            rest: &line.text[1..],
        });
        assert_eq!(segmented.units[0].lines, vec![Line::new(0, "texto")]);
    }

    #[test]
    fn test_fold_units_empty() {
        let segmented = fold_units::<()>(&[], 0, |_| LineEvent::Body);
        assert!(segmented.prelude.is_empty());
        assert!(segmented.units.is_empty());
    }
}
