//! Collection container
//!
//! Repeated content gathered through `add`. An item that is itself an
//! instance of the template appends directly; anything else goes through
//! the slot search: a fresh template instance while the collection has
//! room, then the existing items in insertion order (same-typed
//! collections with room, unselected choices, sequences with an empty
//! matching slot, recursing into children). Exhausting the search is
//! `NoPlaceForItem`.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::choice::ChoiceSpec;
use super::sequence::SequenceSpec;
use super::sink::OutputSink;
use super::Node;

/// The shape items of a collection take
#[derive(Debug, Clone)]
pub enum ItemTemplate {
    /// Leaf values of one type, each written under the given tag
    Value {
        /// Type witness items must carry
        type_name: String,
        /// Tag written for each item
        tag: String,
    },
    /// Sequence instances
    Sequence(Arc<SequenceSpec>),
    /// Choice instances
    Choice(Arc<ChoiceSpec>),
}

impl ItemTemplate {
    /// A leaf template
    pub fn value(type_name: impl Into<String>, tag: impl Into<String>) -> Self {
        ItemTemplate::Value {
            type_name: type_name.into(),
            tag: tag.into(),
        }
    }

    /// Type witness of a direct item
    pub fn witness(&self) -> &str {
        match self {
            ItemTemplate::Value { type_name, .. } => type_name,
            ItemTemplate::Sequence(spec) => &spec.name,
            ItemTemplate::Choice(spec) => &spec.name,
        }
    }

    /// Tag items are written under (composites tag their own slots)
    pub fn tag(&self) -> &str {
        match self {
            ItemTemplate::Value { tag, .. } => tag,
            ItemTemplate::Sequence(_) | ItemTemplate::Choice(_) => "",
        }
    }

    /// Whether a fresh instance could host a value of this type
    pub fn accepts(&self, type_name: &str) -> bool {
        match self {
            ItemTemplate::Value { .. } => false,
            ItemTemplate::Sequence(spec) => spec.accepts(type_name),
            ItemTemplate::Choice(spec) => spec.accepts(type_name),
        }
    }

    fn instantiate(&self) -> Option<Node> {
        match self {
            ItemTemplate::Value { .. } => None,
            ItemTemplate::Sequence(spec) => Some(Node::Sequence(spec.instantiate())),
            ItemTemplate::Choice(spec) => Some(Node::Choice(spec.instantiate())),
        }
    }
}

/// Immutable shape of a collection
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    /// Type name instances of this collection carry
    pub name: String,
    /// Minimum number of items
    pub min: u32,
    /// Maximum number of items (None = unbounded)
    pub max: Option<u32>,
    /// Shape of the items
    pub template: ItemTemplate,
}

impl CollectionSpec {
    /// Create a spec
    pub fn new(name: impl Into<String>, min: u32, max: Option<u32>, template: ItemTemplate) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            template,
        }
    }

    /// Create an empty instance sharing this spec
    pub fn instantiate(self: &Arc<Self>) -> Collection {
        Collection {
            spec: Arc::clone(self),
            items: Vec::new(),
        }
    }
}

/// A live collection instance
#[derive(Debug)]
pub struct Collection {
    spec: Arc<CollectionSpec>,
    items: Vec<Node>,
}

impl Collection {
    /// The shared spec
    pub fn spec(&self) -> &Arc<CollectionSpec> {
        &self.spec
    }

    /// The instance's type witness
    pub fn type_name(&self) -> &str {
        &self.spec.name
    }

    /// Whether another item fits under the maximum
    pub fn has_room(&self) -> bool {
        match self.spec.max {
            Some(max) => (self.items.len() as u32) < max,
            None => true,
        }
    }

    /// Insert an item, searching for a slot when it is not a direct item
    pub fn add(&mut self, item: Node) -> Result<()> {
        let witness = item.type_name().to_string();
        self.offer(item)
            .map_err(|_| Error::NoPlaceForItem(witness))
    }

    pub(crate) fn offer(&mut self, item: Node) -> std::result::Result<(), Node> {
        // direct item of the template's type
        if item.type_name() == self.spec.template.witness() && self.has_room() {
            self.items.push(item);
            return Ok(());
        }

        // a fresh template instance with room takes the item
        let mut item = item;
        if self.has_room() && self.spec.template.accepts(item.type_name()) {
            if let Some(mut instance) = self.spec.template.instantiate() {
                match instance.offer(item) {
                    Ok(()) => {
                        self.items.push(instance);
                        return Ok(());
                    }
                    Err(back) => item = back,
                }
            }
        }

        // search the existing items in insertion order
        for existing in self.items.iter_mut() {
            match existing.offer(item) {
                Ok(()) => return Ok(()),
                Err(back) => item = back,
            }
        }

        Err(item)
    }

    /// Items in insertion order
    pub fn items(&self) -> &[Node] {
        &self.items
    }

    /// Number of items
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check the occurrence bounds and every item's own constraints
    pub fn validate(&self) -> Result<()> {
        let count = self.items.len() as u32;
        if count < self.spec.min {
            return Err(Error::Value(format!(
                "collection '{}' holds {} items, at least {} required",
                self.spec.name, count, self.spec.min
            )));
        }
        if let Some(max) = self.spec.max {
            if count > max {
                return Err(Error::Value(format!(
                    "collection '{}' holds {} items, at most {} allowed",
                    self.spec.name, count, max
                )));
            }
        }
        for item in &self.items {
            item.validate()?;
        }
        Ok(())
    }

    /// Whether the bounds and every item hold
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Write items in insertion order
    pub fn write_out(&self, sink: &mut dyn OutputSink) -> Result<()> {
        let tag = self.spec.template.tag();
        for item in &self.items {
            item.write_out(sink, tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{SlotSpec, StringSink};

    fn leaf_collection(min: u32, max: Option<u32>) -> Collection {
        Arc::new(CollectionSpec::new(
            "Lines",
            min,
            max,
            ItemTemplate::value("Line", "line"),
        ))
        .instantiate()
    }

    #[test]
    fn test_leaf_items_append_in_insertion_order() {
        let mut lines = leaf_collection(0, None);
        lines.add(Node::text("Line", "first")).unwrap();
        lines.add(Node::text("Line", "second")).unwrap();

        let mut sink = StringSink::new();
        lines.write_out(&mut sink).unwrap();
        assert_eq!(sink.as_str(), "<line>first</line><line>second</line>");
    }

    #[test]
    fn test_full_collection_rejects() {
        let mut lines = leaf_collection(0, Some(2));
        lines.add(Node::text("Line", "a")).unwrap();
        lines.add(Node::text("Line", "b")).unwrap();

        let err = lines.add(Node::text("Line", "c")).unwrap_err();
        match err {
            Error::NoPlaceForItem(witness) => assert_eq!(witness, "Line"),
            other => panic!("expected NoPlaceForItem, got {:?}", other),
        }
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_wrong_leaf_type_has_no_place() {
        let mut lines = leaf_collection(0, None);
        let err = lines.add(Node::text("Header", "x")).unwrap_err();
        assert!(matches!(err, Error::NoPlaceForItem(_)));
    }

    #[test]
    fn test_minimum_bound() {
        let mut lines = leaf_collection(2, None);
        lines.add(Node::text("Line", "only")).unwrap();
        assert!(!lines.is_valid());
        lines.add(Node::text("Line", "second")).unwrap();
        assert!(lines.is_valid());
    }

    #[test]
    fn test_member_spawns_template_instance() {
        let choice = Arc::new(ChoiceSpec::new(
            "Payment",
            vec![
                SlotSpec::required("card", "Card"),
                SlotSpec::required("transfer", "Transfer"),
            ],
        ));
        let spec = Arc::new(CollectionSpec::new(
            "Payments",
            0,
            None,
            ItemTemplate::Choice(choice),
        ));
        let mut payments = spec.instantiate();

        payments.add(Node::text("Card", "1234")).unwrap();
        payments.add(Node::text("Transfer", "IBAN")).unwrap();
        assert_eq!(payments.count(), 2);

        let mut sink = StringSink::new();
        payments.write_out(&mut sink).unwrap();
        assert_eq!(sink.as_str(), "<card>1234</card><transfer>IBAN</transfer>");
    }

    #[test]
    fn test_full_collection_fills_sequence_slots() {
        let sequence = Arc::new(SequenceSpec::new(
            "Address",
            vec![
                SlotSpec::required("street", "Street"),
                SlotSpec::required("city", "City"),
            ],
        ));
        let spec = Arc::new(CollectionSpec::new(
            "Addresses",
            1,
            Some(1),
            ItemTemplate::Sequence(sequence),
        ));
        let mut addresses = spec.instantiate();

        // out of declared order; the second add lands in the existing
        // instance because the collection is already full
        addresses.add(Node::text("City", "Lyon")).unwrap();
        addresses.add(Node::text("Street", "1 rue X")).unwrap();
        assert_eq!(addresses.count(), 1);
        assert!(addresses.is_valid());

        let mut sink = StringSink::new();
        addresses.write_out(&mut sink).unwrap();
        assert_eq!(sink.as_str(), "<street>1 rue X</street><city>Lyon</city>");
    }

    #[test]
    fn test_search_recurses_into_children() {
        let payment = Arc::new(ChoiceSpec::new(
            "Payment",
            vec![
                SlotSpec::required("card", "Card"),
                SlotSpec::required("transfer", "Transfer"),
            ],
        ));
        let order = Arc::new(SequenceSpec::new(
            "Order",
            vec![SlotSpec::required("payment", "Payment")],
        ));
        let spec = Arc::new(CollectionSpec::new(
            "Orders",
            0,
            Some(1),
            ItemTemplate::Sequence(Arc::clone(&order)),
        ));
        let mut orders = spec.instantiate();

        orders.add(Node::Choice(payment.instantiate())).unwrap();
        // Card is not a slot of Order; the search recurses into the
        // unselected Payment choice inside the existing instance
        orders.add(Node::text("Card", "1234")).unwrap();

        let mut sink = StringSink::new();
        orders.write_out(&mut sink).unwrap();
        assert_eq!(sink.as_str(), "<card>1234</card>");
    }

    #[test]
    fn test_exhausted_search_reports_no_place() {
        let sequence = Arc::new(SequenceSpec::new(
            "Address",
            vec![SlotSpec::required("street", "Street")],
        ));
        let spec = Arc::new(CollectionSpec::new(
            "Addresses",
            0,
            Some(1),
            ItemTemplate::Sequence(sequence),
        ));
        let mut addresses = spec.instantiate();
        addresses.add(Node::text("Street", "1 rue X")).unwrap();

        // slot already taken and the collection is full
        let err = addresses.add(Node::text("Street", "2 rue Y")).unwrap_err();
        assert!(matches!(err, Error::NoPlaceForItem(_)));
    }
}
