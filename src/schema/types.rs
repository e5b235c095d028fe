//! Schema type and declaration components
//!
//! The immutable declaration model built from parsed schema documents:
//! structural (complex) types with their content and attributes, simple
//! types, element and attribute declarations, and named groups. Entities
//! are built once by `schema::build` and shared read-only via `Arc`
//! afterwards.

use std::sync::Arc;

use crate::namespaces::QName;

use super::facets::Facet;
use super::particles::{Occurs, Particle};

/// How a derived type relates to its base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationMethod {
    /// Extension: base content plus additions
    Extension,
    /// Restriction: subset of the base content
    Restriction,
}

/// Attribute use constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    /// May be absent (default)
    #[default]
    Optional,
    /// Must be present
    Required,
    /// Must not be present
    Prohibited,
}

impl AttributeUse {
    /// Parse from the `use` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "optional" => Some(Self::Optional),
            "required" => Some(Self::Required),
            "prohibited" => Some(Self::Prohibited),
            _ => None,
        }
    }
}

/// An attribute declaration or reference
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Attribute name (None for a pure reference)
    pub name: Option<String>,
    /// Reference to a top-level attribute declaration
    pub reference: Option<QName>,
    /// Named simple type of the value
    pub type_ref: Option<QName>,
    /// Inline anonymous simple type
    pub inline_type: Option<Arc<SimpleType>>,
    /// Use constraint
    pub use_constraint: AttributeUse,
    /// Default value
    pub default: Option<String>,
    /// Fixed value
    pub fixed: Option<String>,
}

impl AttributeDecl {
    /// Whether this declaration is required
    pub fn is_required(&self) -> bool {
        self.use_constraint == AttributeUse::Required
    }
}

/// A named attribute group: attributes plus nested group references
#[derive(Debug, Clone)]
pub struct AttributeGroupDecl {
    /// Group name
    pub name: String,
    /// Own attribute declarations
    pub attributes: Vec<AttributeDecl>,
    /// Nested attribute-group references
    pub group_refs: Vec<QName>,
}

/// A named model group wrapping one compositor particle
#[derive(Debug, Clone)]
pub struct GroupDecl {
    /// Group name
    pub name: String,
    /// The group's sequence, choice or all particle
    pub particle: Particle,
}

/// An element declaration or reference
///
/// `name` and `reference` are mutually exclusive, as are `type_ref` and the
/// inline types; `schema::build` enforces both.
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Element name (None for a pure reference)
    pub name: Option<String>,
    /// Reference to a top-level element declaration
    pub reference: Option<QName>,
    /// Named type of the content
    pub type_ref: Option<QName>,
    /// Inline anonymous simple type
    pub inline_simple: Option<Arc<SimpleType>>,
    /// Inline anonymous complex type
    pub inline_complex: Option<Arc<StructuralType>>,
    /// Substitution-group head (top-level declarations only)
    pub substitution_group: Option<QName>,
    /// Default value (simple content only)
    pub default: Option<String>,
    /// Fixed value (simple content only)
    pub fixed: Option<String>,
    /// Whether the element may carry xsi:nil
    pub nillable: bool,
    /// Whether the declaration is abstract
    pub is_abstract: bool,
    /// Occurrence bounds at the declaration site
    pub occurs: Occurs,
}

impl ElementDecl {
    /// Merge a referenced or substituted declaration with an override site
    ///
    /// Produces the referenced declaration's fields with the site's own
    /// minOccurs/maxOccurs/name winning when present. The result drops the
    /// head's substitution group only when the site carried none of its own,
    /// so chains terminate at the true head.
    pub fn merged_with(&self, site: &OccursOverride) -> ElementDecl {
        let mut merged = self.clone();
        if let Some(min) = site.min_occurs {
            merged.occurs.min = min;
        }
        if let Some(max) = site.max_occurs {
            merged.occurs.max = max;
        }
        if let Some(ref name) = site.name {
            merged.name = Some(name.clone());
        }
        merged
    }
}

/// The override-capable fields of a ref site or substitution member
#[derive(Debug, Clone, Default)]
pub struct OccursOverride {
    /// Overriding name
    pub name: Option<String>,
    /// Overriding minOccurs
    pub min_occurs: Option<u32>,
    /// Overriding maxOccurs (Some(None) = unbounded)
    pub max_occurs: Option<Option<u32>>,
}

/// Simple type definition: restriction, list or union
#[derive(Debug, Clone)]
pub struct SimpleType {
    /// Type name (None when anonymous)
    pub name: Option<String>,
    /// The variety of the definition
    pub variety: SimpleVariety,
}

/// The three varieties a simple type can take
#[derive(Debug, Clone)]
pub enum SimpleVariety {
    /// Restriction of a base type by ordered facets
    Restriction {
        /// Base type reference
        base: QName,
        /// Facets in declared order
        facets: Vec<Facet>,
    },
    /// Whitespace-separated list of an item type
    List {
        /// Item type reference
        item_type: QName,
    },
    /// Union of member types
    Union {
        /// Member type references
        member_types: Vec<QName>,
    },
}

impl SimpleType {
    /// Apply this definition's own facets to a lexical value
    ///
    /// Base-chain facets are applied by the resolver, which can follow the
    /// base reference; list and union varieties carry no facets of their own.
    pub fn check_facets(&self, value: &str) -> crate::error::Result<()> {
        if let SimpleVariety::Restriction { facets, .. } = &self.variety {
            for facet in facets {
                facet.check(value)?;
            }
        }
        Ok(())
    }
}

/// Content of a structural type
#[derive(Debug, Clone)]
pub enum Content {
    /// No children and no text
    Empty,
    /// A particle tree without derivation
    ElementOnly(Particle),
    /// simpleContent: character data derived from a simple base
    Simple(SimpleContentDef),
    /// complexContent: structural derivation from a complex base
    Complex(ComplexContentDef),
}

/// simpleContent definition: derivation over a simple base
#[derive(Debug, Clone)]
pub struct SimpleContentDef {
    /// Extension or restriction
    pub method: DerivationMethod,
    /// Base type reference
    pub base: QName,
    /// Facets (restriction only)
    pub facets: Vec<Facet>,
    /// Attributes added by the derivation
    pub attributes: Vec<AttributeDecl>,
    /// Attribute-group references added by the derivation
    pub attribute_group_refs: Vec<QName>,
}

/// complexContent definition: structural derivation from a complex base
#[derive(Debug, Clone)]
pub struct ComplexContentDef {
    /// Extension or restriction
    pub method: DerivationMethod,
    /// Base type reference
    pub base: QName,
    /// Particle contributed by the derivation, if any
    pub particle: Option<Particle>,
    /// Attributes added by the derivation
    pub attributes: Vec<AttributeDecl>,
    /// Attribute-group references added by the derivation
    pub attribute_group_refs: Vec<QName>,
    /// Whether the derivation carries an anyAttribute wildcard
    pub any_attribute: bool,
}

/// A complex type declaration
#[derive(Debug, Clone)]
pub struct StructuralType {
    /// Type name (None when anonymous)
    pub name: Option<String>,
    /// Target namespace of the defining schema
    pub namespace: Option<String>,
    /// Whether the type is abstract
    pub is_abstract: bool,
    /// Whether character data may be interleaved with children
    pub mixed: bool,
    /// The type's content
    pub content: Content,
    /// Own attribute declarations in declared order
    pub attributes: Vec<AttributeDecl>,
    /// Attribute-group references in declared order
    pub attribute_group_refs: Vec<QName>,
    /// Whether the type carries an anyAttribute wildcard
    pub any_attribute: bool,
}

impl StructuralType {
    /// The particle tree of this type's own content, if any
    pub fn particle(&self) -> Option<&Particle> {
        match &self.content {
            Content::ElementOnly(particle) => Some(particle),
            Content::Complex(def) => def.particle.as_ref(),
            Content::Empty | Content::Simple(_) => None,
        }
    }

    /// Whether this type's own declaration carries any content at all
    ///
    /// Complex derivations count even without a local particle because the
    /// base may contribute one; the compiler makes the final self-closing
    /// decision from the spliced plan.
    pub fn has_content(&self) -> bool {
        !matches!(self.content, Content::Empty)
    }
}
