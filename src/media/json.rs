//! Read-only views over JSON documents.
//!
//! The extractor walks any [`JsonNode`]. A plain `serde_json::Value` is a
//! tree, so it is walked directly by reference. [`JsonGraph`] is an arena in
//! which containers refer to other arena slots, which lets a document share
//! sub-objects or even contain cycles.

use serde_json::Value;

/// A cheap, copyable handle to one node of a JSON document.
pub trait JsonNode<'a>: Copy + 'a {
    /// Identity of the node. Two handles to the same container are equal here
    /// even when other containers hold structurally identical content.
    fn identity(self) -> usize;

    /// Whether the node is an object or an array.
    fn is_container(self) -> bool;

    /// Field lookup on objects; `None` for anything else.
    fn field(self, key: &str) -> Option<Self>;

    /// Elements of an array; `None` for anything else.
    fn elements(self) -> Option<Vec<Self>>;

    /// Array elements or object field values, in document order.
    fn children(self) -> Vec<Self>;

    fn as_str(self) -> Option<&'a str>;

    fn as_f64(self) -> Option<f64>;

    /// Follow a chain of object fields.
    fn path(self, keys: &[&str]) -> Option<Self> {
        keys.iter().try_fold(self, |node, key| node.field(key))
    }
}

impl<'a> JsonNode<'a> for &'a Value {
    fn identity(self) -> usize {
        self as *const Value as usize
    }

    fn is_container(self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }

    fn field(self, key: &str) -> Option<Self> {
        self.as_object().and_then(|map| map.get(key))
    }

    fn elements(self) -> Option<Vec<Self>> {
        self.as_array().map(|items| items.iter().collect())
    }

    fn children(self) -> Vec<Self> {
        match self {
            Value::Object(map) => map.values().collect(),
            Value::Array(items) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    fn as_str(self) -> Option<&'a str> {
        Value::as_str(self)
    }

    fn as_f64(self) -> Option<f64> {
        Value::as_f64(self)
    }
}

/// Index of a slot in a [`JsonGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One arena slot. Containers hold ids rather than owned children.
#[derive(Debug, Clone)]
pub enum GraphValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<NodeId>),
    Object(Vec<(String, NodeId)>),
}

/// Arena-backed JSON document supporting shared and cyclic references.
#[derive(Debug, Clone)]
pub struct JsonGraph {
    nodes: Vec<GraphValue>,
    root: NodeId,
}

impl JsonGraph {
    /// Build an arena from a tree-shaped value. The result has no sharing
    /// until slots are linked with [`link_field`](Self::link_field) or
    /// [`push_element`](Self::push_element).
    pub fn from_value(value: &Value) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        graph.root = graph.add(value);
        graph
    }

    /// Copy a value into the arena and return its slot.
    pub fn add(&mut self, value: &Value) -> NodeId {
        let slot = match value {
            Value::Null => GraphValue::Null,
            Value::Bool(b) => GraphValue::Bool(*b),
            Value::Number(n) => GraphValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => GraphValue::String(s.clone()),
            Value::Array(items) => {
                let ids = items.iter().map(|item| self.add(item)).collect();
                GraphValue::Array(ids)
            }
            Value::Object(map) => {
                let fields = map
                    .iter()
                    .map(|(key, item)| (key.clone(), self.add(item)))
                    .collect();
                GraphValue::Object(fields)
            }
        };
        self.nodes.push(slot);
        NodeId(self.nodes.len() - 1)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Handle to the root node, for walking.
    pub fn root_ref(&self) -> GraphRef<'_> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> GraphRef<'_> {
        GraphRef { graph: self, id }
    }

    /// Follow a chain of object fields from `from`.
    pub fn lookup(&self, from: NodeId, keys: &[&str]) -> Option<NodeId> {
        self.node(from).path(keys).map(|node| node.id)
    }

    /// Point `key` of `object` at `target`, replacing an existing field.
    /// Returns `false` when `object` is not an object slot.
    pub fn link_field(&mut self, object: NodeId, key: &str, target: NodeId) -> bool {
        match self.nodes.get_mut(object.0) {
            Some(GraphValue::Object(fields)) => {
                match fields.iter_mut().find(|(name, _)| name == key) {
                    Some(field) => field.1 = target,
                    None => fields.push((key.to_string(), target)),
                }
                true
            }
            _ => false,
        }
    }

    /// Append `target` to the array at `array`.
    /// Returns `false` when `array` is not an array slot.
    pub fn push_element(&mut self, array: NodeId, target: NodeId) -> bool {
        match self.nodes.get_mut(array.0) {
            Some(GraphValue::Array(items)) => {
                items.push(target);
                true
            }
            _ => false,
        }
    }

    fn slot(&self, id: NodeId) -> &GraphValue {
        &self.nodes[id.0]
    }
}

/// Copyable handle into a [`JsonGraph`].
#[derive(Debug, Clone, Copy)]
pub struct GraphRef<'a> {
    graph: &'a JsonGraph,
    id: NodeId,
}

impl<'a> GraphRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl<'a> JsonNode<'a> for GraphRef<'a> {
    fn identity(self) -> usize {
        self.id.0
    }

    fn is_container(self) -> bool {
        matches!(
            self.graph.slot(self.id),
            GraphValue::Object(_) | GraphValue::Array(_)
        )
    }

    fn field(self, key: &str) -> Option<Self> {
        match self.graph.slot(self.id) {
            GraphValue::Object(fields) => fields
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, id)| self.graph.node(*id)),
            _ => None,
        }
    }

    fn elements(self) -> Option<Vec<Self>> {
        match self.graph.slot(self.id) {
            GraphValue::Array(items) => Some(items.iter().map(|id| self.graph.node(*id)).collect()),
            _ => None,
        }
    }

    fn children(self) -> Vec<Self> {
        match self.graph.slot(self.id) {
            GraphValue::Array(items) => items.iter().map(|id| self.graph.node(*id)).collect(),
            GraphValue::Object(fields) => {
                fields.iter().map(|(_, id)| self.graph.node(*id)).collect()
            }
            _ => Vec::new(),
        }
    }

    fn as_str(self) -> Option<&'a str> {
        match self.graph.slot(self.id) {
            GraphValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    fn as_f64(self) -> Option<f64> {
        match self.graph.slot(self.id) {
            GraphValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}
