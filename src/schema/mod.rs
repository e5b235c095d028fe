//! Schema document model
//!
//! One `Schema` per schema document, holding its target namespace, import
//! and alias tables and the declaration tables for every top-level construct.
//! Schemas are built by `build`, registered into a `graph::SchemaGraph` and
//! immutable from then on.

pub mod build;
pub mod facets;
pub mod graph;
pub mod particles;
pub mod types;

use indexmap::IndexMap;
use std::sync::Arc;

use crate::error::{InvalidSchema, Result};
use crate::namespaces::AliasTable;

use types::{AttributeDecl, AttributeGroupDecl, ElementDecl, GroupDecl, SimpleType, StructuralType};

/// An import declaration: target namespace plus optional location hint
#[derive(Debug, Clone)]
pub struct Import {
    /// Namespace being imported
    pub namespace: String,
    /// Schema location hint, if given
    pub location: Option<String>,
}

/// A parsed schema document
///
/// Declaration tables are keyed by local name in declared order. The
/// one-declaration-per-(kind, name) invariant is enforced at insertion.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Target namespace of this document
    pub target_namespace: Option<String>,
    /// Prefix to namespace alias table
    pub aliases: AliasTable,
    /// Imports in declared order
    pub imports: Vec<Import>,
    /// Top-level complex types
    pub complex_types: IndexMap<String, Arc<StructuralType>>,
    /// Top-level simple types
    pub simple_types: IndexMap<String, Arc<SimpleType>>,
    /// Named model groups
    pub groups: IndexMap<String, Arc<GroupDecl>>,
    /// Named attribute groups
    pub attribute_groups: IndexMap<String, Arc<AttributeGroupDecl>>,
    /// Top-level element declarations
    pub elements: IndexMap<String, Arc<ElementDecl>>,
    /// Top-level attribute declarations
    pub attributes: IndexMap<String, Arc<AttributeDecl>>,
}

impl Schema {
    /// Create an empty schema for the given target namespace
    pub fn new(target_namespace: Option<String>) -> Self {
        Self {
            target_namespace,
            ..Default::default()
        }
    }

    fn duplicate(kind: &str, name: &str) -> InvalidSchema {
        InvalidSchema::new(format!("duplicate {} declaration '{}'", kind, name))
    }

    /// Register a complex type, rejecting duplicates
    pub fn add_complex_type(&mut self, name: String, decl: StructuralType) -> Result<()> {
        if self.complex_types.contains_key(&name) {
            return Err(Self::duplicate("complexType", &name).into());
        }
        self.complex_types.insert(name, Arc::new(decl));
        Ok(())
    }

    /// Register a simple type, rejecting duplicates
    pub fn add_simple_type(&mut self, name: String, decl: SimpleType) -> Result<()> {
        if self.simple_types.contains_key(&name) {
            return Err(Self::duplicate("simpleType", &name).into());
        }
        self.simple_types.insert(name, Arc::new(decl));
        Ok(())
    }

    /// Register a model group, rejecting duplicates
    pub fn add_group(&mut self, decl: GroupDecl) -> Result<()> {
        if self.groups.contains_key(&decl.name) {
            return Err(Self::duplicate("group", &decl.name).into());
        }
        self.groups.insert(decl.name.clone(), Arc::new(decl));
        Ok(())
    }

    /// Register an attribute group, rejecting duplicates
    pub fn add_attribute_group(&mut self, decl: AttributeGroupDecl) -> Result<()> {
        if self.attribute_groups.contains_key(&decl.name) {
            return Err(Self::duplicate("attributeGroup", &decl.name).into());
        }
        self.attribute_groups.insert(decl.name.clone(), Arc::new(decl));
        Ok(())
    }

    /// Register a top-level element, rejecting duplicates
    pub fn add_element(&mut self, name: String, decl: ElementDecl) -> Result<()> {
        if self.elements.contains_key(&name) {
            return Err(Self::duplicate("element", &name).into());
        }
        self.elements.insert(name, Arc::new(decl));
        Ok(())
    }

    /// Register a top-level attribute, rejecting duplicates
    pub fn add_attribute(&mut self, name: String, decl: AttributeDecl) -> Result<()> {
        if self.attributes.contains_key(&name) {
            return Err(Self::duplicate("attribute", &name).into());
        }
        self.attributes.insert(name, Arc::new(decl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::SimpleVariety;

    #[test]
    fn test_duplicate_declaration_rejected() {
        let mut schema = Schema::new(Some("http://example.com/ns".to_string()));
        let st = SimpleType {
            name: Some("Code".to_string()),
            variety: SimpleVariety::Restriction {
                base: crate::namespaces::QName::parse("xs:string"),
                facets: vec![],
            },
        };
        schema.add_simple_type("Code".to_string(), st.clone()).unwrap();
        assert!(schema.add_simple_type("Code".to_string(), st).is_err());
    }
}
