//! Ratcliff-Obershelp sequence alignment.
//!
//! Finds the longest contiguous matching block, then repeats on the
//! unmatched regions on either side of it. The result is turned into an edit
//! script of equal/replace/delete/insert opcodes. No junk heuristic is
//! applied: every element takes part in matching, however frequent.
//!
//! The matcher is generic over the element type; the token aligner feeds it
//! normalized token text and the line aligner feeds it normalized line text.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

/// A contiguous run where `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One block of the edit script turning `a` into `b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

/// Per-element expansion of the edit script.
///
/// Replace blocks of unequal length pair their overlapping prefix and spill
/// the remainder into deletes (left longer) or inserts (right longer). This
/// is a positional approximation, not an optimal inner alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Equal(usize, usize),
    Replace(usize, usize),
    Delete(usize),
    Insert(usize),
}

pub struct SequenceMatcher<'a, T> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of each element of `b`, ascending.
    b2j: HashMap<&'a T, Vec<usize>>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, item) in b.iter().enumerate() {
            b2j.entry(item).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let mut best = Match {
            a: alo,
            b: blo,
            size: 0,
        };
        // j2len[j] = length of the match ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = prev + 1;
                    next_j2len.insert(j, k);
                    if k > best.size {
                        best = Match {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            j2len = next_j2len;
        }

        best
    }

    /// All matching blocks in ascending order, adjacent blocks merged,
    /// terminated by a zero-size sentinel at `(a.len(), b.len())`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut pending = vec![(0, la, 0, lb)];
        let mut found = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            found.push(m);
            if alo < m.a && blo < m.b {
                pending.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                pending.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        found.sort_by_key(|m| (m.a, m.b, m.size));

        let mut merged: Vec<Match> = Vec::with_capacity(found.len() + 1);
        for m in found {
            match merged.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                    last.size += m.size;
                }
                _ => merged.push(m),
            }
        }
        merged.push(Match {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }

    /// Edit script turning `a` into `b`.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut opcodes = Vec::new();
        let (mut i, mut j) = (0, 0);

        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode {
                    tag,
                    a: i..m.a,
                    b: j..m.b,
                });
            }
            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                opcodes.push(Opcode {
                    tag: OpTag::Equal,
                    a: m.a..i,
                    b: m.b..j,
                });
            }
        }

        opcodes
    }

    /// The edit script expanded to one [`Step`] per aligned element.
    pub fn steps(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.a.len().max(self.b.len()));

        for Opcode { tag, a, b } in self.opcodes() {
            match tag {
                OpTag::Equal => steps.extend(a.zip(b).map(|(i, j)| Step::Equal(i, j))),
                OpTag::Replace => {
                    let overlap = a.len().min(b.len());
                    steps.extend((0..overlap).map(|k| Step::Replace(a.start + k, b.start + k)));
                    steps.extend((a.start + overlap..a.end).map(Step::Delete));
                    steps.extend((b.start + overlap..b.end).map(Step::Insert));
                }
                OpTag::Delete => steps.extend(a.map(Step::Delete)),
                OpTag::Insert => steps.extend(b.map(Step::Insert)),
            }
        }

        steps
    }

    /// Similarity in `[0, 1]`: twice the matched elements over the total.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn longest_match_prefers_earliest() {
        let a = chars(" abcd");
        let b = chars("abcd abcd");
        let matcher = SequenceMatcher::new(&a, &b);
        assert_eq!(
            matcher.find_longest_match(0, 5, 0, 9),
            Match { a: 0, b: 4, size: 5 }
        );
    }

    #[test]
    fn matching_blocks_are_merged_and_terminated() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let matcher = SequenceMatcher::new(&a, &b);
        assert_eq!(
            matcher.matching_blocks(),
            vec![
                Match { a: 0, b: 0, size: 2 },
                Match { a: 3, b: 2, size: 2 },
                Match { a: 5, b: 4, size: 0 },
            ]
        );
    }

    #[test]
    fn opcodes_cover_both_sequences() {
        let a = chars("qabxcd");
        let b = chars("abycdf");
        let matcher = SequenceMatcher::new(&a, &b);
        let tags: Vec<_> = matcher
            .opcodes()
            .into_iter()
            .map(|op| (op.tag, op.a, op.b))
            .collect();
        assert_eq!(
            tags,
            vec![
                (OpTag::Delete, 0..1, 0..0),
                (OpTag::Equal, 1..3, 0..2),
                (OpTag::Replace, 3..4, 2..3),
                (OpTag::Equal, 4..6, 3..5),
                (OpTag::Insert, 6..6, 5..6),
            ]
        );
    }

    #[test]
    fn uneven_replace_spills_into_deletes_and_inserts() {
        let a = vec!["x", "p", "q", "r", "y"];
        let b = vec!["x", "s", "y"];
        let steps = SequenceMatcher::new(&a, &b).steps();
        assert_eq!(
            steps,
            vec![
                Step::Equal(0, 0),
                Step::Replace(1, 1),
                Step::Delete(2),
                Step::Delete(3),
                Step::Equal(4, 2),
            ]
        );

        let steps = SequenceMatcher::new(&b, &a).steps();
        assert_eq!(
            steps,
            vec![
                Step::Equal(0, 0),
                Step::Replace(1, 1),
                Step::Insert(2),
                Step::Insert(3),
                Step::Equal(2, 4),
            ]
        );
    }

    #[test]
    fn empty_sequences() {
        let empty: Vec<&str> = vec![];
        let one = vec!["a"];
        assert!(SequenceMatcher::new(&empty, &empty).opcodes().is_empty());
        assert_eq!(SequenceMatcher::new(&empty, &empty).ratio(), 1.0);
        assert_eq!(
            SequenceMatcher::new(&one, &empty).steps(),
            vec![Step::Delete(0)]
        );
        assert_eq!(
            SequenceMatcher::new(&empty, &one).steps(),
            vec![Step::Insert(0)]
        );
    }

    #[test]
    fn ratio_counts_matched_elements() {
        let a = chars("abcd");
        let b = chars("bcde");
        assert!((SequenceMatcher::new(&a, &b).ratio() - 0.75).abs() < 1e-12);
    }
}
