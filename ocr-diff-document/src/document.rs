//! OCR export trees.
//!
//! Exports have no fixed schema: any mapping or list may nest any other. The
//! tree is kept as a plain tagged union and every walk over it uses an
//! explicit stack, so adversarially deep input never exhausts the call stack.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{InputError, InputResult};
use crate::line::{extract_lines, LineRecord};

/// Leaf value of an export tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// One node of an export tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Keys in source order.
    Mapping(Vec<(String, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    pub fn string(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(text.into()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// First value stored under `key`, if this is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Box<dyn DoubleEndedIterator<Item = &Node> + '_> {
        match self {
            Node::Mapping(entries) => Box::new(entries.iter().map(|(_, v)| v)),
            Node::Sequence(items) => Box::new(items.iter()),
            Node::Scalar(_) => Box::new(std::iter::empty()),
        }
    }
}

enum Build<'v> {
    Visit(&'v Value),
    Sequence(usize),
    Mapping(Vec<String>),
}

impl From<&Value> for Node {
    fn from(root: &Value) -> Self {
        let mut work = vec![Build::Visit(root)];
        let mut built: Vec<Node> = Vec::new();

        while let Some(item) = work.pop() {
            match item {
                Build::Visit(Value::Array(items)) => {
                    work.push(Build::Sequence(items.len()));
                    work.extend(items.iter().rev().map(Build::Visit));
                }
                Build::Visit(Value::Object(map)) => {
                    let entries: Vec<(&String, &Value)> = map.iter().collect();
                    work.push(Build::Mapping(
                        entries.iter().map(|(k, _)| (*k).clone()).collect(),
                    ));
                    work.extend(entries.iter().rev().map(|(_, v)| Build::Visit(v)));
                }
                Build::Visit(Value::Null) => built.push(Node::Scalar(Scalar::Null)),
                Build::Visit(Value::Bool(b)) => built.push(Node::Scalar(Scalar::Bool(*b))),
                Build::Visit(Value::Number(n)) => {
                    let n = n.as_f64().unwrap_or(f64::NAN);
                    built.push(Node::Scalar(Scalar::Number(n)))
                }
                Build::Visit(Value::String(s)) => built.push(Node::string(s.as_str())),
                Build::Sequence(len) => {
                    let items = built.split_off(built.len() - len);
                    built.push(Node::Sequence(items));
                }
                Build::Mapping(keys) => {
                    let values = built.split_off(built.len() - keys.len());
                    built.push(Node::Mapping(keys.into_iter().zip(values).collect()));
                }
            }
        }

        built.pop().unwrap_or(Node::Scalar(Scalar::Null))
    }
}

/// A parsed OCR export.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Parse a JSON export.
    pub fn parse(source: &str) -> InputResult<Self> {
        let value: Value = serde_json::from_str(source)?;
        Ok(Self::from(&value))
    }

    pub fn from_slice(bytes: &[u8]) -> InputResult<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from(&value))
    }

    /// Read and parse a JSON export from disk.
    pub fn load(path: impl AsRef<Path>) -> InputResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| InputError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Every text-bearing line, in traversal order.
    pub fn lines(&self) -> Vec<LineRecord> {
        extract_lines(&self.root)
    }
}

impl From<&Value> for Document {
    fn from(value: &Value) -> Self {
        Self::new(Node::from(value))
    }
}

impl From<Node> for Document {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}
