//! Particle runtime
//!
//! The containers generated data types delegate to: `Sequence`, `Choice`
//! and `Collection` accept insertions in any order and reproduce
//! schema-ordered output. Container shapes are immutable, `Arc`-shared
//! specs; live state comes only from `instantiate()`.
//!
//! Items move through the closed `Node` union. Generated leaf types
//! implement `XmlValue` and enter as `Node::Value`.

pub mod choice;
pub mod collection;
pub mod sequence;
pub mod sink;

use std::fmt;

use crate::error::{Error, Result};

pub use choice::{Choice, ChoiceSpec};
pub use collection::{Collection, CollectionSpec, ItemTemplate};
pub use sequence::{Sequence, SequenceSpec};
pub use sink::{OutputSink, StringSink};

/// A leaf value a generated type contributes to a container
pub trait XmlValue {
    /// The declared type name, used as the slot witness
    fn type_name(&self) -> &str;

    /// Serialize the value wrapped in the given tag
    fn write_out(&self, sink: &mut dyn OutputSink, tag: &str) -> Result<()>;
}

/// A simple text leaf
///
/// Covers scalar element content without a generated type of its own.
pub struct SimpleValue {
    type_name: String,
    value: String,
}

impl SimpleValue {
    /// Create a leaf with the given type witness and text
    pub fn new(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            value: value.into(),
        }
    }

    /// The text content
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl XmlValue for SimpleValue {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn write_out(&self, sink: &mut dyn OutputSink, tag: &str) -> Result<()> {
        if tag.is_empty() {
            return sink.write(&self.value);
        }
        sink.write("<")?;
        sink.write(tag)?;
        sink.write(">")?;
        sink.write(&self.value)?;
        sink.write("</")?;
        sink.write(tag)?;
        sink.write(">")
    }
}

/// The closed union of things a container can hold
pub enum Node {
    /// A generated leaf value
    Value(Box<dyn XmlValue>),
    /// A sequence container
    Sequence(Sequence),
    /// A choice container
    Choice(Choice),
    /// A collection container
    Collection(Collection),
}

impl Node {
    /// Wrap a leaf value
    pub fn value(value: impl XmlValue + 'static) -> Self {
        Node::Value(Box::new(value))
    }

    /// A simple text leaf with the given type witness
    pub fn text(type_name: impl Into<String>, value: impl Into<String>) -> Self {
        Node::value(SimpleValue::new(type_name, value))
    }

    /// The type witness used for slot matching
    pub fn type_name(&self) -> &str {
        match self {
            Node::Value(value) => value.type_name(),
            Node::Sequence(sequence) => sequence.type_name(),
            Node::Choice(choice) => choice.type_name(),
            Node::Collection(collection) => collection.type_name(),
        }
    }

    /// Insert an item
    ///
    /// Leaves take nothing; containers dispatch to their own `add`.
    pub fn add(&mut self, item: Node) -> Result<()> {
        match self {
            Node::Value(_) => Err(Error::NoPlaceForItem(item.type_name().to_string())),
            Node::Sequence(sequence) => sequence.add(item),
            Node::Choice(choice) => choice.add(item),
            Node::Collection(collection) => collection.add(item),
        }
    }

    /// Number of items held directly
    pub fn count(&self) -> usize {
        match self {
            Node::Value(_) => 1,
            Node::Sequence(sequence) => sequence.count(),
            Node::Choice(choice) => choice.count(),
            Node::Collection(collection) => collection.count(),
        }
    }

    /// Whether the node currently satisfies its own constraints
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check this node's constraints, reporting the first violation
    pub fn validate(&self) -> Result<()> {
        match self {
            Node::Value(_) => Ok(()),
            Node::Sequence(sequence) => sequence.validate(),
            Node::Choice(choice) => choice.validate(),
            Node::Collection(collection) => collection.validate(),
        }
    }

    /// Serialize the node
    ///
    /// Leaves wrap themselves in the given tag; containers know their own
    /// slot tags and ignore it.
    pub fn write_out(&self, sink: &mut dyn OutputSink, tag: &str) -> Result<()> {
        match self {
            Node::Value(value) => value.write_out(sink, tag),
            Node::Sequence(sequence) => sequence.write_out(sink),
            Node::Choice(choice) => choice.write_out(sink),
            Node::Collection(collection) => collection.write_out(sink),
        }
    }

    /// Try to place an item somewhere in this subtree
    ///
    /// Returns the item back when no slot exists, so the search can move on
    /// without cloning.
    pub(crate) fn offer(&mut self, item: Node) -> std::result::Result<(), Node> {
        match self {
            Node::Value(_) => Err(item),
            Node::Sequence(sequence) => sequence.offer(item),
            Node::Choice(choice) => choice.offer(item),
            Node::Collection(collection) => collection.offer(item),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value(value) => write!(f, "Value({})", value.type_name()),
            Node::Sequence(sequence) => write!(f, "Sequence({})", sequence.type_name()),
            Node::Choice(choice) => write!(f, "Choice({})", choice.type_name()),
            Node::Collection(collection) => write!(f, "Collection({})", collection.type_name()),
        }
    }
}

/// A named slot in a container spec
#[derive(Debug, Clone)]
pub struct SlotSpec {
    /// Tag written for the slot's value
    pub tag: String,
    /// Type witness the slot accepts
    pub type_name: String,
    /// Whether the slot must be filled for the container to validate
    pub required: bool,
}

impl SlotSpec {
    /// Create a required slot whose tag doubles as the type witness
    pub fn required(tag: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            type_name: type_name.into(),
            required: true,
        }
    }

    /// Create an optional slot
    pub fn optional(tag: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            type_name: type_name.into(),
            required: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_value_writes_tagged() {
        let mut sink = StringSink::new();
        let value = SimpleValue::new("Price", "9.99");
        value.write_out(&mut sink, "price").unwrap();
        assert_eq!(sink.as_str(), "<price>9.99</price>");
    }

    #[test]
    fn test_simple_value_raw_without_tag() {
        let mut sink = StringSink::new();
        SimpleValue::new("Text", "hello").write_out(&mut sink, "").unwrap();
        assert_eq!(sink.as_str(), "hello");
    }

    #[test]
    fn test_leaf_node_contract() {
        let mut node = Node::text("Price", "9.99");
        assert_eq!(node.type_name(), "Price");
        assert_eq!(node.count(), 1);
        assert!(node.is_valid());
        assert!(node.add(Node::text("Other", "x")).is_err());
    }
}
