//! Compiled content model plans
//!
//! A `CompiledPlan` is everything an emitter needs to generate a data type
//! for one structural type: its attribute and particle properties, the
//! validation obligations its mutators must enforce, and the ordered
//! serialization steps reproducing schema order on output. Plans serialize
//! with serde so emitters outside this crate can consume them.

use std::sync::Arc;

use serde::Serialize;

use crate::schema::graph::TypeId;

/// The value space of a scalar property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValueType {
    /// A built-in XSD type, by local name
    Builtin(String),
    /// A declared simple type, by qualified display name
    Declared(String),
    /// An anonymous inline simple type
    Anonymous,
}

/// Reference from a plan to the plan of a nested complex type
///
/// Named references carry only the interned id and display name; the
/// compiler owns the finished plan. This is what makes self-referential
/// types compile to a single shared plan instead of recursing forever.
#[derive(Debug, Clone, Serialize)]
pub enum PlanRef {
    /// A named complex type, resolved through the compiler's memo table
    Named {
        /// Interned type id
        id: TypeId,
        /// Qualified display name
        name: String,
    },
    /// An anonymous inline complex type, compiled in place
    Inline(Arc<CompiledPlan>),
}

/// What a particle property holds
#[derive(Debug, Clone, Serialize)]
pub enum PropertyValue {
    /// Character data of a simple type
    Simple(ValueType),
    /// A nested complex type
    Complex(PlanRef),
    /// A compositor container materialized as a field
    Container(ContainerPlan),
}

/// Shape of a particle property
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PropertyKind {
    /// At most one value
    Singular {
        /// Whether the property may be absent (minOccurs 0)
        nullable: bool,
    },
    /// Repeated values gathered through an `add` mutator
    Collection {
        /// Minimum number of items
        min: u32,
        /// Maximum number of items (None = unbounded)
        max: Option<u32>,
    },
    /// A container field delegating to the particle runtime
    Container,
}

/// Compositor kind of a container property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContainerKind {
    /// Ordered slots, one per entry
    Sequence,
    /// Exactly one of the entries
    Choice,
    /// Element wildcard
    Any,
}

/// An allowed entry of a container, folded flat
///
/// Compositors nested below a container do not become fields of their own;
/// their element leaves fold into the enclosing container's entry list in
/// declared order.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerEntry {
    /// XML tag of the entry
    pub tag: String,
    /// Whether the entry may repeat within the container
    pub multiple: bool,
    /// Whether the entry is required where the container demands it
    pub required: bool,
    /// The entry's value
    pub value: PropertyValue,
}

/// A container property's compiled shape
#[derive(Debug, Clone, Serialize)]
pub struct ContainerPlan {
    /// Compositor kind
    pub kind: ContainerKind,
    /// Minimum occurrences of the container itself
    pub min: u32,
    /// Maximum occurrences of the container itself (None = unbounded)
    pub max: Option<u32>,
    /// Allowed entries in declared order
    pub entries: Vec<ContainerEntry>,
}

/// An attribute property of the generated type
#[derive(Debug, Clone, Serialize)]
pub struct AttributeProperty {
    /// Attribute name as written in instances
    pub name: String,
    /// Whether the attribute must be present
    pub required: bool,
    /// Default value
    pub default: Option<String>,
    /// Fixed value
    pub fixed: Option<String>,
    /// Value space of the attribute
    pub value: ValueType,
}

/// A particle property of the generated type
#[derive(Debug, Clone, Serialize)]
pub struct ParticleProperty {
    /// Property identifier (pluralized for collections)
    pub name: String,
    /// XML tag written for each value
    pub tag: String,
    /// Shape of the property
    pub kind: PropertyKind,
    /// What the property holds
    pub value: PropertyValue,
}

impl ParticleProperty {
    /// Whether the property is a collection
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, PropertyKind::Collection { .. })
    }
}

/// A validation obligation the generated type must enforce
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationObligation {
    /// Item count of a collection property must fall inside its bounds
    CountInBounds {
        /// Property name
        property: String,
        /// Minimum count
        min: u32,
        /// Maximum count (None = unbounded)
        max: Option<u32>,
    },
    /// A choice container holds at most one selection
    ExclusiveChoice {
        /// Property name
        property: String,
        /// Whether a selection must be present
        required: bool,
    },
}

/// A piece of a literal serialization step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TagPiece {
    /// Raw text written as-is
    Raw(String),
    /// Placeholder for the element tag supplied at write time
    Tag,
}

/// One step of the serialization recipe
///
/// Steps are emitted in execution order: opening literal, attributes in
/// declared order, then the particle properties in schema order, then the
/// closing literal. An empty type closes its opening tag in place.
#[derive(Debug, Clone, Serialize)]
pub enum SerializationStep {
    /// Write literal pieces
    WriteLiteral(Vec<TagPiece>),
    /// Write one attribute from a property
    WriteAttribute {
        /// Attribute name in the output
        name: String,
        /// Property the value comes from
        property: String,
        /// Unconditional when required, guarded on presence otherwise
        required: bool,
    },
    /// Write one singular property as a tagged child
    WriteProperty {
        /// Property the value comes from
        property: String,
        /// Tag to wrap the value in
        tag: String,
        /// Whether to skip the step when the property is absent
        guarded: bool,
    },
    /// Write every item of a collection property in insertion order
    IterateCollection {
        /// Property the items come from
        property: String,
        /// Tag written for each item
        tag: String,
    },
    /// Delegate to a container property's own writer
    DelegateContainer {
        /// Property holding the container
        property: String,
    },
}

/// The compiled plan for one structural type
#[derive(Debug, Clone, Serialize)]
pub struct CompiledPlan {
    /// Qualified display name of the type (None when anonymous)
    pub name: Option<String>,
    /// Attribute properties in declared order, base attributes first
    pub attributes: Vec<AttributeProperty>,
    /// Particle properties in schema order, base particles first
    pub properties: Vec<ParticleProperty>,
    /// Obligations the generated mutators and `is_valid` must enforce
    pub obligations: Vec<ValidationObligation>,
    /// Serialization recipe
    pub steps: Vec<SerializationStep>,
    /// Whether the element closes its opening tag in place
    pub self_closing: bool,
    /// Whether character data may interleave with children
    pub mixed: bool,
    /// Whether instances may carry attributes beyond the declared set
    pub any_attribute: bool,
}

impl CompiledPlan {
    /// Look up a particle property by name
    pub fn property(&self, name: &str) -> Option<&ParticleProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Look up an attribute property by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeProperty> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
