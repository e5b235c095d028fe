//! Sequence container
//!
//! One keyed slot per declared type; insertions may arrive in any order
//! and output follows the declared order. Re-adding a type overwrites its
//! slot.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, Result};

use super::sink::OutputSink;
use super::{Node, SlotSpec};

/// Immutable shape of a sequence: its declared slots in schema order
#[derive(Debug, Clone)]
pub struct SequenceSpec {
    /// Type name instances of this sequence carry
    pub name: String,
    /// Slots in declared order
    pub slots: Vec<SlotSpec>,
}

impl SequenceSpec {
    /// Create a spec
    pub fn new(name: impl Into<String>, slots: Vec<SlotSpec>) -> Self {
        Self {
            name: name.into(),
            slots,
        }
    }

    /// Whether a type has a slot here
    pub fn accepts(&self, type_name: &str) -> bool {
        self.slots.iter().any(|slot| slot.type_name == type_name)
    }

    fn slot_for(&self, type_name: &str) -> Option<&SlotSpec> {
        self.slots.iter().find(|slot| slot.type_name == type_name)
    }

    /// Create an empty instance sharing this spec
    pub fn instantiate(self: &Arc<Self>) -> Sequence {
        Sequence {
            spec: Arc::clone(self),
            slots: IndexMap::new(),
        }
    }
}

/// A live sequence instance
#[derive(Debug)]
pub struct Sequence {
    spec: Arc<SequenceSpec>,
    slots: IndexMap<String, Node>,
}

impl Sequence {
    /// The shared spec
    pub fn spec(&self) -> &Arc<SequenceSpec> {
        &self.spec
    }

    /// The instance's type witness
    pub fn type_name(&self) -> &str {
        &self.spec.name
    }

    /// Insert an item into its declared slot
    ///
    /// Items outside the declared set are `WrongType`. An already-filled
    /// slot is overwritten.
    pub fn add(&mut self, item: Node) -> Result<()> {
        let witness = item.type_name().to_string();
        if !self.spec.accepts(&witness) {
            return Err(Error::wrong_type(
                self.spec.slots.iter().map(|slot| slot.type_name.as_str()),
                &witness,
            ));
        }
        self.slots.insert(witness, item);
        Ok(())
    }

    pub(crate) fn offer(&mut self, item: Node) -> std::result::Result<(), Node> {
        let witness = item.type_name().to_string();
        if self.has_empty_slot_for(&witness) {
            self.slots.insert(witness, item);
            return Ok(());
        }
        let mut item = item;
        for child in self.slots.values_mut() {
            match child.offer(item) {
                Ok(()) => return Ok(()),
                Err(back) => item = back,
            }
        }
        Err(item)
    }

    /// The item filling a type's slot, if any
    pub fn get(&self, type_name: &str) -> Option<&Node> {
        self.slots.get(type_name)
    }

    /// Whether a type's slot exists and is still empty
    pub fn has_empty_slot_for(&self, type_name: &str) -> bool {
        self.spec.accepts(type_name) && !self.slots.contains_key(type_name)
    }

    /// Number of filled slots
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Check that every required slot is filled
    pub fn validate(&self) -> Result<()> {
        for slot in &self.spec.slots {
            if slot.required && !self.slots.contains_key(&slot.type_name) {
                return Err(Error::MissingRequiredElement(slot.tag.clone()));
            }
        }
        for item in self.slots.values() {
            item.validate()?;
        }
        Ok(())
    }

    /// Whether every required slot is filled
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Write filled slots in declared order, each under its declared tag
    pub fn write_out(&self, sink: &mut dyn OutputSink) -> Result<()> {
        for slot in &self.spec.slots {
            if let Some(item) = self.slots.get(&slot.type_name) {
                item.write_out(sink, &slot.tag)?;
            }
        }
        Ok(())
    }
}
