//! Alias resolution for line metadata.
//!
//! OCR tools disagree on key names (`conf` vs `confidence`, `line_idx` vs
//! `index`, ...). Each field has an ordered alias list; the first alias whose
//! value is usable wins. Values that are present but unusable are skipped,
//! not treated as errors.

use ocr_diff::{BoundingBox, Provenance};

use crate::document::{Node, Scalar};

pub const TEXT_KEYS: &[&str] = &["text", "line", "content"];
pub const CONFIDENCE_KEYS: &[&str] = &["confidence", "conf"];
pub const BBOX_KEYS: &[&str] = &["bbox", "bounding_box", "box"];
pub const PAGE_KEYS: &[&str] = &["page", "page_number"];
pub const BLOCK_KEYS: &[&str] = &["block_id", "block_label", "block"];
pub const LINE_INDEX_KEYS: &[&str] = &["line_idx", "line_index", "line", "index"];

/// Metadata entries of one line, text key excluded.
pub type Metadata = Vec<(String, Node)>;

fn resolve<'m, T>(
    metadata: &'m Metadata,
    aliases: &[&str],
    usable: impl Fn(&'m Node) -> Option<T>,
) -> Option<T> {
    aliases.iter().find_map(|alias| {
        metadata
            .iter()
            .find(|(key, _)| key == alias)
            .and_then(|(_, value)| usable(value))
    })
}

fn number(node: &Node) -> Option<f64> {
    match node {
        Node::Scalar(Scalar::Number(n)) if n.is_finite() => Some(*n),
        Node::Scalar(Scalar::String(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn non_negative_integer(node: &Node) -> Option<u64> {
    match node {
        Node::Scalar(Scalar::Number(n)) if n.is_finite() && *n >= 0.0 && n.fract() == 0.0 => {
            Some(*n as u64)
        }
        Node::Scalar(Scalar::String(s)) => {
            let s = s.trim();
            if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

pub fn confidence(metadata: &Metadata) -> f64 {
    resolve(metadata, CONFIDENCE_KEYS, number)
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(1.0)
}

pub fn bbox(metadata: &Metadata) -> Option<BoundingBox> {
    resolve(metadata, BBOX_KEYS, |node| match node {
        Node::Sequence(items) if items.len() == 4 => {
            let mut coords = [0.0; 4];
            for (slot, item) in coords.iter_mut().zip(items) {
                *slot = item.as_f64().filter(|n| n.is_finite())?;
            }
            Some(BoundingBox::from(coords))
        }
        _ => None,
    })
}

pub fn page(metadata: &Metadata) -> Option<u32> {
    resolve(metadata, PAGE_KEYS, non_negative_integer).and_then(|p| u32::try_from(p).ok())
}

pub fn block_label(metadata: &Metadata) -> String {
    resolve(metadata, BLOCK_KEYS, |node| match node {
        Node::Scalar(Scalar::String(s)) => Some(s.clone()),
        Node::Scalar(Scalar::Number(n)) if n.fract() == 0.0 && n.abs() < 1e15 => {
            Some(format!("{}", *n as i64))
        }
        Node::Scalar(Scalar::Number(n)) => Some(n.to_string()),
        _ => None,
    })
    .unwrap_or_default()
}

pub fn line_index(metadata: &Metadata) -> Option<i64> {
    resolve(metadata, LINE_INDEX_KEYS, non_negative_integer).and_then(|i| i64::try_from(i).ok())
}

/// Typed provenance for a line. `fallback_index` is used when no alias
/// carries a usable line index.
pub fn provenance(metadata: &Metadata, fallback_index: i64) -> Provenance {
    Provenance {
        confidence: confidence(metadata),
        bbox: bbox(metadata),
        page: page(metadata),
        block_label: block_label(metadata),
        line_index: line_index(metadata).unwrap_or(fallback_index),
    }
}
