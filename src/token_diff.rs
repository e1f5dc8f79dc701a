//! Token-level comparison of one aligned line pair.
//!
//! [`TokenAlignment`] is a queryable structure rather than rendering output:
//! the report assembler walks [`TokenAlignment::changes`], tests and the
//! display layer use the other accessors.
//!
//! # Example
//!
//! ```
//! use ocr_diff::{align_tokens, tokenize, OpKind, Provenance};
//!
//! let left = tokenize("Payment is due", &Provenance::default());
//! let right = tokenize("Payment is not due", &Provenance::default());
//! let alignment = align_tokens(&left, &right);
//!
//! let changes: Vec<_> = alignment.changes().collect();
//! assert_eq!(changes.len(), 1);
//! assert_eq!(changes[0].kind(), OpKind::Insert);
//! assert_eq!(changes[0].rhs().map(|t| t.text.as_str()), Some("not"));
//! ```

use serde::{Deserialize, Serialize};

use crate::sequence_matcher::{SequenceMatcher, Step};
use crate::token::Token;

/// The four outcomes of comparing two token sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    #[serde(rename = "match")]
    Match,
    #[serde(rename = "sub")]
    Substitute,
    #[serde(rename = "ins")]
    Insert,
    #[serde(rename = "del")]
    Delete,
}

impl OpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Match => "match",
            OpKind::Substitute => "sub",
            OpKind::Insert => "ins",
            OpKind::Delete => "del",
        }
    }
}

/// One aligned position. Tokens are borrowed from the sequences that were
/// aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignmentOp<'t> {
    Match(&'t Token, &'t Token),
    Substitute(&'t Token, &'t Token),
    /// Token exists only on the right.
    Insert(&'t Token),
    /// Token exists only on the left.
    Delete(&'t Token),
}

impl<'t> AlignmentOp<'t> {
    pub fn kind(&self) -> OpKind {
        match self {
            AlignmentOp::Match(..) => OpKind::Match,
            AlignmentOp::Substitute(..) => OpKind::Substitute,
            AlignmentOp::Insert(_) => OpKind::Insert,
            AlignmentOp::Delete(_) => OpKind::Delete,
        }
    }

    pub fn lhs(&self) -> Option<&'t Token> {
        match *self {
            AlignmentOp::Match(l, _) | AlignmentOp::Substitute(l, _) | AlignmentOp::Delete(l) => {
                Some(l)
            }
            AlignmentOp::Insert(_) => None,
        }
    }

    pub fn rhs(&self) -> Option<&'t Token> {
        match *self {
            AlignmentOp::Match(_, r) | AlignmentOp::Substitute(_, r) | AlignmentOp::Insert(r) => {
                Some(r)
            }
            AlignmentOp::Delete(_) => None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, AlignmentOp::Match(..))
    }

    /// The same operation seen from the other side.
    pub fn mirror(&self) -> AlignmentOp<'t> {
        match *self {
            AlignmentOp::Match(l, r) => AlignmentOp::Match(r, l),
            AlignmentOp::Substitute(l, r) => AlignmentOp::Substitute(r, l),
            AlignmentOp::Insert(r) => AlignmentOp::Delete(r),
            AlignmentOp::Delete(l) => AlignmentOp::Insert(l),
        }
    }
}

/// Counts per operation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignmentStats {
    pub total_left: usize,
    pub total_right: usize,
    pub matched: usize,
    pub substituted: usize,
    pub inserted: usize,
    pub deleted: usize,
}

/// Queryable token alignment between two token sequences.
#[derive(Debug, Clone)]
pub struct TokenAlignment<'t> {
    /// Operations in left-to-right order.
    pub ops: Vec<AlignmentOp<'t>>,
    pub stats: AlignmentStats,
}

impl<'t> TokenAlignment<'t> {
    /// Every non-match operation, in order.
    pub fn changes(&self) -> impl Iterator<Item = &AlignmentOp<'t>> {
        self.ops.iter().filter(|op| op.is_change())
    }

    pub fn inserted(&self) -> impl Iterator<Item = &'t Token> + '_ {
        self.ops.iter().filter_map(|op| match op {
            AlignmentOp::Insert(r) => Some(*r),
            _ => None,
        })
    }

    pub fn deleted(&self) -> impl Iterator<Item = &'t Token> + '_ {
        self.ops.iter().filter_map(|op| match op {
            AlignmentOp::Delete(l) => Some(*l),
            _ => None,
        })
    }

    pub fn substituted(&self) -> impl Iterator<Item = (&'t Token, &'t Token)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            AlignmentOp::Substitute(l, r) => Some((*l, *r)),
            _ => None,
        })
    }

    /// Share of matched tokens over the longer side (1.0 for two empty lines).
    pub fn similarity(&self) -> f64 {
        let total = self.stats.total_left.max(self.stats.total_right);
        if total == 0 {
            return 1.0;
        }
        self.stats.matched as f64 / total as f64
    }

    /// The alignment seen from the other side.
    pub fn mirror(&self) -> TokenAlignment<'t> {
        let stats = AlignmentStats {
            total_left: self.stats.total_right,
            total_right: self.stats.total_left,
            matched: self.stats.matched,
            substituted: self.stats.substituted,
            inserted: self.stats.deleted,
            deleted: self.stats.inserted,
        };
        TokenAlignment {
            ops: self.ops.iter().map(AlignmentOp::mirror).collect(),
            stats,
        }
    }
}

/// Align two token sequences on their normalized text.
pub fn align_tokens<'t>(left: &'t [Token], right: &'t [Token]) -> TokenAlignment<'t> {
    let left_keys: Vec<&str> = left.iter().map(|t| t.normalized.as_str()).collect();
    let right_keys: Vec<&str> = right.iter().map(|t| t.normalized.as_str()).collect();

    let mut stats = AlignmentStats {
        total_left: left.len(),
        total_right: right.len(),
        ..Default::default()
    };
    let mut ops = Vec::with_capacity(left.len().max(right.len()));

    for step in SequenceMatcher::new(&left_keys, &right_keys).steps() {
        let op = match step {
            Step::Equal(i, j) => {
                stats.matched += 1;
                AlignmentOp::Match(&left[i], &right[j])
            }
            Step::Replace(i, j) => {
                stats.substituted += 1;
                AlignmentOp::Substitute(&left[i], &right[j])
            }
            Step::Delete(i) => {
                stats.deleted += 1;
                AlignmentOp::Delete(&left[i])
            }
            Step::Insert(j) => {
                stats.inserted += 1;
                AlignmentOp::Insert(&right[j])
            }
        };
        ops.push(op);
    }

    TokenAlignment { ops, stats }
}
