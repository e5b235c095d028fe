//! Choice container
//!
//! Holds at most one selection out of the declared alternatives. Adding a
//! second member replaces the first; instances always start unselected.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::sink::OutputSink;
use super::{Node, SlotSpec};

/// Immutable shape of a choice: its alternatives in declared order
#[derive(Debug, Clone)]
pub struct ChoiceSpec {
    /// Type name instances of this choice carry
    pub name: String,
    /// Whether a selection must be present for the instance to validate
    pub required: bool,
    /// Alternatives in declared order
    pub alternatives: Vec<SlotSpec>,
}

impl ChoiceSpec {
    /// Create a required choice spec
    pub fn new(name: impl Into<String>, alternatives: Vec<SlotSpec>) -> Self {
        Self {
            name: name.into(),
            required: true,
            alternatives,
        }
    }

    /// Create an optional choice spec
    pub fn optional(name: impl Into<String>, alternatives: Vec<SlotSpec>) -> Self {
        Self {
            required: false,
            ..Self::new(name, alternatives)
        }
    }

    /// Whether a type is one of the alternatives
    pub fn accepts(&self, type_name: &str) -> bool {
        self.alternatives
            .iter()
            .any(|alt| alt.type_name == type_name)
    }

    fn index_of(&self, type_name: &str) -> Option<usize> {
        self.alternatives
            .iter()
            .position(|alt| alt.type_name == type_name)
    }

    /// Create an unselected instance sharing this spec
    pub fn instantiate(self: &Arc<Self>) -> Choice {
        Choice {
            spec: Arc::clone(self),
            selection: None,
        }
    }
}

/// A live choice instance
#[derive(Debug)]
pub struct Choice {
    spec: Arc<ChoiceSpec>,
    selection: Option<(usize, Box<Node>)>,
}

impl Choice {
    /// The shared spec
    pub fn spec(&self) -> &Arc<ChoiceSpec> {
        &self.spec
    }

    /// The instance's type witness
    pub fn type_name(&self) -> &str {
        &self.spec.name
    }

    /// Select an alternative, replacing any previous selection
    ///
    /// Membership is validated first: an item outside the alternatives is
    /// `WrongType` and leaves the current selection untouched.
    pub fn add(&mut self, item: Node) -> Result<()> {
        let witness = item.type_name().to_string();
        match self.spec.index_of(&witness) {
            Some(index) => {
                self.selection = Some((index, Box::new(item)));
                Ok(())
            }
            None => Err(Error::wrong_type(
                self.spec
                    .alternatives
                    .iter()
                    .map(|alt| alt.type_name.as_str()),
                &witness,
            )),
        }
    }

    pub(crate) fn offer(&mut self, item: Node) -> std::result::Result<(), Node> {
        if let Some((_, selected)) = &mut self.selection {
            return selected.offer(item);
        }
        match self.spec.index_of(item.type_name()) {
            Some(index) => {
                self.selection = Some((index, Box::new(item)));
                Ok(())
            }
            None => Err(item),
        }
    }

    /// The current selection, if any
    pub fn selected(&self) -> Option<&Node> {
        self.selection.as_ref().map(|(_, node)| node.as_ref())
    }

    /// Tag of the current selection's alternative
    pub fn selected_tag(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .map(|(index, _)| self.spec.alternatives[*index].tag.as_str())
    }

    /// 1 when selected, 0 otherwise
    pub fn count(&self) -> usize {
        usize::from(self.selection.is_some())
    }

    /// Check the required-selection constraint
    pub fn validate(&self) -> Result<()> {
        match &self.selection {
            Some((_, node)) => node.validate(),
            None if self.spec.required => {
                Err(Error::MissingRequiredElement(self.spec.name.clone()))
            }
            None => Ok(()),
        }
    }

    /// Whether the required-selection constraint holds
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Write the selection under its alternative's tag, nothing otherwise
    pub fn write_out(&self, sink: &mut dyn OutputSink) -> Result<()> {
        if let Some((index, node)) = &self.selection {
            node.write_out(sink, &self.spec.alternatives[*index].tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::StringSink;

    fn payment_spec() -> Arc<ChoiceSpec> {
        Arc::new(ChoiceSpec::new(
            "Payment",
            vec![
                SlotSpec::required("card", "Card"),
                SlotSpec::required("transfer", "Transfer"),
            ],
        ))
    }

    #[test]
    fn test_selection_and_replacement() {
        let spec = payment_spec();
        let mut choice = spec.instantiate();

        choice.add(Node::text("Card", "1234")).unwrap();
        assert_eq!(choice.selected_tag(), Some("card"));

        // re-adding replaces the selection
        choice.add(Node::text("Transfer", "IBAN")).unwrap();
        assert_eq!(choice.count(), 1);
        assert_eq!(choice.selected_tag(), Some("transfer"));

        let mut sink = StringSink::new();
        choice.write_out(&mut sink).unwrap();
        assert_eq!(sink.as_str(), "<transfer>IBAN</transfer>");
    }

    #[test]
    fn test_non_member_rejected_and_selection_kept() {
        let spec = payment_spec();
        let mut choice = spec.instantiate();
        choice.add(Node::text("Card", "1234")).unwrap();

        let err = choice.add(Node::text("Cash", "50")).unwrap_err();
        assert!(matches!(err, Error::WrongType { .. }));
        assert_eq!(choice.selected_tag(), Some("card"));
    }

    #[test]
    fn test_required_choice_invalid_until_selected() {
        let spec = payment_spec();
        let mut choice = spec.instantiate();
        assert!(!choice.is_valid());

        choice.add(Node::text("Card", "1234")).unwrap();
        assert!(choice.is_valid());
    }

    #[test]
    fn test_optional_choice_valid_unselected() {
        let spec = Arc::new(ChoiceSpec::optional(
            "Extras",
            vec![SlotSpec::optional("note", "Note")],
        ));
        let choice = spec.instantiate();
        assert!(choice.is_valid());

        let mut sink = StringSink::new();
        choice.write_out(&mut sink).unwrap();
        assert_eq!(sink.as_str(), "");
    }

    #[test]
    fn test_selection_can_hold_a_nested_choice() {
        let inner_spec = Arc::new(ChoiceSpec::new(
            "Card",
            vec![SlotSpec::required("debit", "Debit")],
        ));
        let mut inner = inner_spec.instantiate();
        inner.add(Node::text("Debit", "4321")).unwrap();

        let spec = payment_spec();
        let mut choice = spec.instantiate();
        choice.add(Node::Choice(inner)).unwrap();
        assert_eq!(choice.selected_tag(), Some("card"));

        let mut sink = StringSink::new();
        choice.write_out(&mut sink).unwrap();
        assert_eq!(sink.as_str(), "<debit>4321</debit>");
    }

    #[test]
    fn test_instantiate_always_unselected() {
        let spec = payment_spec();
        let mut first = spec.instantiate();
        first.add(Node::text("Card", "1234")).unwrap();
        assert!(spec.instantiate().selected().is_none());
    }
}
