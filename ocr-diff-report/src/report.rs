//! The structured output of one document-pair comparison.

use serde::{Deserialize, Serialize};

use ocr_diff::{BoundingBox, Category, OpKind};

use crate::severity::SeverityBucket;

/// Kind shown for the missing side of an insert or delete.
pub const ABSENT_KIND: &str = "∅";

/// Granularity of a diff. Only token-level diffs are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLevel {
    #[default]
    Token,
}

/// One reported discrepancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// `d_00000`, `d_00001`, ... in emission order.
    pub id: String,
    pub op: OpKind,
    pub level: DiffLevel,
    pub page: Option<u32>,
    pub block_label: String,
    pub line_index: Option<i64>,
    pub bbox: Option<BoundingBox>,
    pub lhs: String,
    pub rhs: String,
    #[serde(with = "kind_or_absent")]
    pub lhs_kind: Option<Category>,
    #[serde(with = "kind_or_absent")]
    pub rhs_kind: Option<Category>,
    /// Rounded to three decimals.
    pub severity: f64,
    pub severity_bucket: SeverityBucket,
    pub why_it_matters: String,
    pub suggested_action: String,
}

impl DiffRecord {
    pub fn format_id(seq: usize) -> String {
        format!("d_{:05}", seq)
    }
}

/// Diff counts per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub critical: usize,
    pub medium: usize,
    pub low: usize,
}

impl Summary {
    pub fn record(&mut self, bucket: SeverityBucket) {
        match bucket {
            SeverityBucket::Critical => self.critical += 1,
            SeverityBucket::Medium => self.medium += 1,
            SeverityBucket::Low => self.low += 1,
        }
    }

    pub fn count(&self, bucket: SeverityBucket) -> usize {
        match bucket {
            SeverityBucket::Critical => self.critical,
            SeverityBucket::Medium => self.medium,
            SeverityBucket::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.medium + self.low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub diffs: usize,
}

/// Full comparison result for one pair of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub document_pair_id: String,
    pub summary: Summary,
    pub totals: Totals,
    pub diffs: Vec<DiffRecord>,
}

impl Report {
    pub fn new(document_pair_id: impl Into<String>) -> Self {
        Self {
            document_pair_id: document_pair_id.into(),
            summary: Summary::default(),
            totals: Totals::default(),
            diffs: Vec::new(),
        }
    }

    /// Append a record, keeping summary and totals in step.
    pub fn push(&mut self, record: DiffRecord) {
        self.summary.record(record.severity_bucket);
        self.diffs.push(record);
        self.totals.diffs = self.diffs.len();
    }

    /// True when the documents had no token-level differences.
    pub fn is_clean(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn diffs_in(&self, bucket: SeverityBucket) -> impl Iterator<Item = &DiffRecord> {
        self.diffs
            .iter()
            .filter(move |d| d.severity_bucket == bucket)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}

/// Serializes an absent kind as [`ABSENT_KIND`].
mod kind_or_absent {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ABSENT_KIND;
    use ocr_diff::Category;

    pub fn serialize<S: Serializer>(kind: &Option<Category>, s: S) -> Result<S::Ok, S::Error> {
        match kind {
            Some(kind) => kind.serialize(s),
            None => s.serialize_str(ABSENT_KIND),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Category>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw == ABSENT_KIND {
            return Ok(None);
        }
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown token kind `{}`", raw)))
    }
}
