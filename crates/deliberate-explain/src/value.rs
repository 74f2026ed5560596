//! Values produced by evaluating adjectives.

use std::fmt;

use deliberate_core::NodeId;

/// The value of an adjective on a node.
///
/// Nodes are referred to by id; the search registry resolves them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Node(NodeId),
    Group(Vec<NodeId>),
    Text(String),
    /// The adjective points to nothing on this node.
    Absent,
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeId> {
        match self {
            Value::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&[NodeId]> {
        match self {
            Value::Group(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Node(id)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Number(value) => write!(f, "{value}"),
            Value::Node(id) => write!(f, "{id}"),
            Value::Group(ids) if ids.is_empty() => f.write_str("?"),
            Value::Group(ids) => {
                for (i, id) in ids.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{id}")?;
                }
                Ok(())
            }
            Value::Text(text) => f.write_str(text),
            Value::Absent => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Value::Number(5.0).to_string(), "5");
        assert_eq!(Value::Number(-0.5).to_string(), "-0.5");
        assert_eq!(Value::Absent.to_string(), "?");
        assert_eq!(Value::Group(vec![]).to_string(), "?");
        let group = Value::Group(vec![NodeId::from("0_0"), NodeId::from("0_2")]);
        assert_eq!(group.to_string(), "0_0, 0_2");
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Number(1.0).as_bool(), None);
        assert_eq!(Value::from(NodeId::from("0_1")).as_node().map(NodeId::as_str), Some("0_1"));
        assert!(Value::Absent.is_absent());
    }
}
