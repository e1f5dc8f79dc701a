//! Line records and the line extractor.

use std::fmt;

use ocr_diff::{tokenize, Provenance, Token};

use crate::document::{Node, Scalar};
use crate::metadata::{self, Metadata, TEXT_KEYS};

/// One step from the root of the export to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// One extracted text unit plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub text: String,
    pub path: Vec<PathSegment>,
    /// Sibling keys of the text key, verbatim and in source order.
    pub metadata: Metadata,
    /// Position in the document, `-1` for placeholders.
    pub line_index: i64,
    pub provenance: Provenance,
}

impl LineRecord {
    /// Synthetic empty line standing in for a missing counterpart.
    pub fn placeholder() -> Self {
        Self {
            text: String::new(),
            path: Vec::new(),
            metadata: Vec::new(),
            line_index: -1,
            provenance: Provenance {
                line_index: -1,
                ..Provenance::default()
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.line_index < 0 && self.path.is_empty() && self.text.is_empty()
    }

    /// Path segments joined with `/`, e.g. `pages/0/lines/3`.
    pub fn path_string(&self) -> String {
        let mut out = String::new();
        for (idx, segment) in self.path.iter().enumerate() {
            if idx > 0 {
                out.push('/');
            }
            out.push_str(&segment.to_string());
        }
        out
    }

    pub fn meta(&self, key: &str) -> Option<&Node> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn tokens(&self) -> Vec<Token> {
        tokenize(&self.text, &self.provenance)
    }
}

/// Tokenize a line, each token inheriting the line's provenance.
pub fn tokenize_line(line: &LineRecord) -> Vec<Token> {
    line.tokens()
}

/// The text of a line-producing mapping, plus the key it came from.
///
/// The first text alias present decides: if its value is not a string the
/// mapping produces no line.
fn line_text(entries: &[(String, Node)]) -> Option<(&str, &str)> {
    let (key, value) = TEXT_KEYS
        .iter()
        .find_map(|alias| entries.iter().find(|(k, _)| k == alias))?;
    value.as_str().map(|text| (key.as_str(), text))
}

/// Every line-producing mapping of the tree, in pre-order.
///
/// A mapping produces a line when its first present text key holds a string.
/// Traversal continues below a producing mapping, so nested text nodes yield
/// lines of their own. A document that is a bare string is a single line.
pub fn extract_lines(root: &Node) -> Vec<LineRecord> {
    let mut lines = Vec::new();
    let mut stack: Vec<(&Node, Vec<PathSegment>)> = vec![(root, Vec::new())];

    while let Some((node, path)) = stack.pop() {
        match node {
            Node::Mapping(entries) => {
                if let Some((text_key, text)) = line_text(entries) {
                    let metadata: Metadata = entries
                        .iter()
                        .filter(|(k, _)| k != text_key)
                        .cloned()
                        .collect();
                    let fallback = lines.len() as i64;
                    let provenance = metadata::provenance(&metadata, fallback);
                    lines.push(LineRecord {
                        text: text.to_string(),
                        path: path.clone(),
                        line_index: provenance.line_index,
                        metadata,
                        provenance,
                    });
                }
                for (key, child) in entries.iter().rev() {
                    let mut child_path = path.clone();
                    child_path.push(PathSegment::Key(key.clone()));
                    stack.push((child, child_path));
                }
            }
            Node::Sequence(items) => {
                for (idx, child) in items.iter().enumerate().rev() {
                    let mut child_path = path.clone();
                    child_path.push(PathSegment::Index(idx));
                    stack.push((child, child_path));
                }
            }
            Node::Scalar(_) => {}
        }
    }

    if lines.is_empty() {
        if let Node::Scalar(Scalar::String(text)) = root {
            lines.push(LineRecord {
                text: text.clone(),
                path: Vec::new(),
                metadata: Vec::new(),
                line_index: 0,
                provenance: Provenance::default(),
            });
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn texts(lines: &[LineRecord]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn collects_nested_lines_in_order() {
        let doc = Document::parse(
            r#"{
                "pages": [
                    {"lines": [{"text": "Invoice"}, {"content": "Total: $5"}]},
                    {"lines": [{"line": "Thanks", "conf": 0.5}]}
                ]
            }"#,
        )
        .unwrap();
        let lines = doc.lines();
        assert_eq!(texts(&lines), vec!["Invoice", "Total: $5", "Thanks"]);
        assert_eq!(lines[1].path_string(), "pages/0/lines/1");
        assert_eq!(lines[2].provenance.confidence, 0.5);
        let indices: Vec<_> = lines.iter().map(|l| l.line_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        let listing = lines
            .iter()
            .map(|l| format!("{}={:?}", l.path_string(), l.text))
            .collect::<Vec<_>>()
            .join("; ");
        insta::assert_snapshot!(
            listing,
            @r###"pages/0/lines/0="Invoice"; pages/0/lines/1="Total: $5"; pages/1/lines/0="Thanks""###
        );
    }

    #[test]
    fn descends_below_line_producing_nodes() {
        let doc = Document::parse(
            r#"{"text": "outer", "children": [{"text": "inner"}]}"#,
        )
        .unwrap();
        let lines = doc.lines();
        assert_eq!(texts(&lines), vec!["outer", "inner"]);
        assert_eq!(lines[1].path_string(), "children/0");
    }

    #[test]
    fn first_text_key_decides() {
        let doc = Document::parse(r#"[{"text": 5, "line": "ignored"}, {"line": "kept"}]"#).unwrap();
        assert_eq!(texts(&doc.lines()), vec!["kept"]);
    }

    #[test]
    fn metadata_keeps_sibling_keys() {
        let doc = Document::parse(
            r#"{"text": "Total", "line": 7, "page": 2, "block_id": "totals", "font": "mono"}"#,
        )
        .unwrap();
        let lines = doc.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        let keys: Vec<_> = line.metadata.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["line", "page", "block_id", "font"]);
        assert_eq!(line.line_index, 7);
        assert_eq!(line.provenance.page, Some(2));
        assert_eq!(line.provenance.block_label, "totals");
        assert_eq!(line.meta("font").and_then(Node::as_str), Some("mono"));
    }

    #[test]
    fn explicit_index_is_not_overwritten() {
        let doc = Document::parse(r#"[{"text": "a", "line_idx": 40}, {"text": "b"}]"#).unwrap();
        let indices: Vec<_> = doc.lines().iter().map(|l| l.line_index).collect();
        assert_eq!(indices, vec![40, 1]);
    }

    #[test]
    fn bare_string_is_one_line() {
        let doc = Document::parse(r#""Payment is due""#).unwrap();
        let lines = doc.lines();
        assert_eq!(texts(&lines), vec!["Payment is due"]);
        assert_eq!(lines[0].line_index, 0);
    }

    #[test]
    fn empty_documents_have_no_lines() {
        for source in [r#"{}"#, r#"[]"#, r#"{"pages": []}"#, "null", "3"] {
            assert!(Document::parse(source).unwrap().lines().is_empty(), "{source}");
        }
    }

    #[test]
    fn empty_text_is_still_a_line() {
        let doc = Document::parse(r#"{"text": ""}"#).unwrap();
        let lines = doc.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].tokens().is_empty());
    }

    #[test]
    fn tokens_inherit_line_provenance() {
        let doc = Document::parse(
            r#"{"text": "Total 500", "confidence": 0.7, "bbox": [0, 0, 10, 2], "page": 1}"#,
        )
        .unwrap();
        let tokens = tokenize_line(&doc.lines()[0]);
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.confidence == 0.7 && t.page == Some(1)));
        assert!(tokens.iter().all(|t| t.bbox.is_some()));
        assert_eq!(tokens[1].column_index, 1);
    }

    #[test]
    fn placeholder_shape() {
        let p = LineRecord::placeholder();
        assert!(p.is_placeholder());
        assert_eq!(p.line_index, -1);
        assert_eq!(p.provenance.line_index, -1);
        assert_eq!(p.path_string(), "");
        assert!(p.tokens().is_empty());
    }
}
