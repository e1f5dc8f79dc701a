//! Pairing the lines of two documents.

use std::borrow::Cow;

use ocr_diff::{normalize, SequenceMatcher, Step, Token};

use crate::line::LineRecord;

/// One aligned row: two real lines, or a real line and a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePair<'a> {
    pub lhs: Cow<'a, LineRecord>,
    pub rhs: Cow<'a, LineRecord>,
}

impl<'a> LinePair<'a> {
    fn new(lhs: Cow<'a, LineRecord>, rhs: Cow<'a, LineRecord>) -> Self {
        Self { lhs, rhs }
    }

    pub fn tokenize(&self) -> (Vec<Token>, Vec<Token>) {
        (self.lhs.tokens(), self.rhs.tokens())
    }

    /// True when both sides are real lines with the same normalized text.
    pub fn is_unchanged(&self) -> bool {
        !self.lhs.is_placeholder()
            && !self.rhs.is_placeholder()
            && normalize(&self.lhs.text) == normalize(&self.rhs.text)
    }
}

/// Align two line sequences on their normalized text.
///
/// Equal and replaced lines pair positionally. When a replaced run is longer
/// on one side, the excess lines are paired with placeholders, as are deleted
/// and inserted lines. Every input line appears in exactly one pair.
pub fn align_lines<'a>(left: &'a [LineRecord], right: &'a [LineRecord]) -> Vec<LinePair<'a>> {
    let left_keys: Vec<String> = left.iter().map(|l| normalize(&l.text)).collect();
    let right_keys: Vec<String> = right.iter().map(|l| normalize(&l.text)).collect();

    SequenceMatcher::new(&left_keys, &right_keys)
        .steps()
        .into_iter()
        .map(|step| match step {
            Step::Equal(i, j) | Step::Replace(i, j) => {
                LinePair::new(Cow::Borrowed(&left[i]), Cow::Borrowed(&right[j]))
            }
            Step::Delete(i) => {
                LinePair::new(Cow::Borrowed(&left[i]), Cow::Owned(LineRecord::placeholder()))
            }
            Step::Insert(j) => {
                LinePair::new(Cow::Owned(LineRecord::placeholder()), Cow::Borrowed(&right[j]))
            }
        })
        .collect()
}
