// 🌳 Payload Tree - Closed variant type for decoded responses
// The structured extractor walks this instead of raw serde_json values

use anyhow::{Context, Result};
use serde_json::Value;

// ============================================================================
// NODE
// ============================================================================

/// Node - One level of a decoded response body
///
/// Maps keep their keys in document order so "first match wins" traversal
/// visits children in the order the site emitted them.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Map(Vec<(String, Node)>),
    Seq(Vec<Node>),
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl Node {
    /// Decode a raw response body
    pub fn parse_str(body: &str) -> Result<Node> {
        let value: Value =
            serde_json::from_str(body).context("Failed to decode structured payload")?;
        Ok(Node::from(value))
    }

    /// Key lookup on a map node (None for every other variant)
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Interpret a scalar as a number
    ///
    /// Numbers and numeric strings qualify; anything non-finite does not.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Node::Number(n) => *n,
            Node::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        n.is_finite().then_some(n)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render a scalar the way it would print (maps and sequences yield None)
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Node::Text(s) => Some(s.clone()),
            Node::Number(n) => Some(n.to_string()),
            Node::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Empty containers, empty strings, zero, false and null
    pub fn is_falsy(&self) -> bool {
        match self {
            Node::Map(entries) => entries.is_empty(),
            Node::Seq(items) => items.is_empty(),
            Node::Text(s) => s.is_empty(),
            Node::Number(n) => *n == 0.0,
            Node::Bool(b) => !b,
            Node::Null => true,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect()),
            Value::Array(items) => Node::Seq(items.into_iter().map(Node::from).collect()),
            Value::String(s) => Node::Text(s),
            Value::Number(n) => n.as_f64().map(Node::Number).unwrap_or(Node::Null),
            Value::Bool(b) => Node::Bool(b),
            Value::Null => Node::Null,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
