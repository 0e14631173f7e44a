//! Form document model
//!
//! A form definition is an arbitrarily nested tree of elements. Each node
//! carries a type tag (serialized as `"type"`), an ordered list of child
//! elements, and any number of named properties. Properties hold mixed
//! values: primitives, lists, or nested sub-structures (which are themselves
//! nodes, e.g. the `optionsSource` of a select element).
//!
//! Documents are parsed by the storage layer (JSON or YAML) and are
//! read-only inputs to the analysis engine; nothing here mutates a node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A property value on a form node
///
/// Untagged: the wire shape is plain JSON/YAML. Any nested mapping
/// deserializes as a [`FormNode`], which is what gives sub-structures like
/// `optionsSource` a uniform property/children interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<PropertyValue>),
    Node(Box<FormNode>),
}

impl PropertyValue {
    /// Returns the string value, if this is a string property
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested node, if this is a sub-structure property
    pub fn as_node(&self) -> Option<&FormNode> {
        match self {
            PropertyValue::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// One element in a form definition tree
///
/// The root node of a file is the form itself; every nested element is the
/// same shape. Unknown properties are preserved verbatim; the engine only
/// inspects the handful of properties that encode references.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FormNode {
    /// Element type tag (`"form"`, `"select"`, `"subform"`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Ordered child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FormNode>,

    /// All remaining named properties, sorted by name
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl FormNode {
    /// Creates a node with the given type tag and no properties or children
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Looks up a property by name
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Looks up a string property by name
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(PropertyValue::as_str)
    }

    /// Looks up a sub-structure property by name
    pub fn property_node(&self, name: &str) -> Option<&FormNode> {
        self.property(name).and_then(PropertyValue::as_node)
    }

    /// Sets a property (builder-style helper, used mostly by tests)
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Sets a string property
    pub fn with_str(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_property(name, PropertyValue::String(value.into()))
    }

    /// Appends a child element
    pub fn with_child(mut self, child: FormNode) -> Self {
        self.children.push(child);
        self
    }

    /// Total node count of this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(FormNode::node_count).sum::<usize>()
    }
}
