//! Schema construction from parsed document trees
//!
//! Converts a `documents::Element` tree (one schema document root) into an
//! immutable `Schema`. Each construct has its own builder with a strict
//! child dispatch: unknown children and contradictory attribute combinations
//! are `InvalidSchema` with the offending construct's location.

use std::sync::Arc;

use crate::documents::Element;
use crate::error::{InvalidSchema, Result};
use crate::namespaces::QName;

use super::facets::{parse_facet, Facet};
use super::particles::{validate_all_occurs, Occurs, Particle};
use super::types::{
    AttributeDecl, AttributeGroupDecl, AttributeUse, ComplexContentDef, Content, DerivationMethod,
    ElementDecl, GroupDecl, SimpleContentDef, SimpleType, SimpleVariety, StructuralType,
};
use super::{Import, Schema};

/// XSD construct local names
mod tags {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const GROUP: &str = "group";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANY: &str = "any";
    pub const ANY_ATTRIBUTE: &str = "anyAttribute";
    pub const ANNOTATION: &str = "annotation";
    pub const IMPORT: &str = "import";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const ENUMERATION: &str = "enumeration";
}

fn bad_child(parent: &Element, child: &Element) -> InvalidSchema {
    InvalidSchema::new(format!("bad element in {}: {}", parent.name, child.name))
        .with_location(parent.location())
}

fn occurs_of(el: &Element) -> Result<Occurs> {
    Occurs::parse(el.attribute("minOccurs"), el.attribute("maxOccurs"))
        .map_err(|e| locate(e, el))
}

fn locate(err: crate::error::Error, el: &Element) -> crate::error::Error {
    match err {
        crate::error::Error::InvalidSchema(inner) if inner.location.is_none() => {
            inner.with_location(el.location()).into()
        }
        other => other,
    }
}

/// Build a `Schema` from a parsed schema document root
pub fn build_schema(root: &Element) -> Result<Schema> {
    if root.name != tags::SCHEMA {
        return Err(InvalidSchema::new(format!(
            "expected a schema document root, got '{}'",
            root.name
        ))
        .into());
    }

    let mut schema = Schema::new(root.attribute("targetNamespace").map(str::to_string));
    schema.aliases = root.namespaces.clone();

    for child in &root.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::IMPORT => {
                let namespace = child.attribute("namespace").ok_or_else(|| {
                    InvalidSchema::new("import requires a namespace").with_location(root.location())
                })?;
                schema.imports.push(Import {
                    namespace: namespace.to_string(),
                    location: child.attribute("schemaLocation").map(str::to_string),
                });
            }
            tags::SIMPLE_TYPE => {
                let decl = build_simple_type(child)?;
                let name = named(child, "simpleType")?;
                schema.add_simple_type(name, decl)?;
            }
            tags::COMPLEX_TYPE => {
                let decl = build_complex_type(child, schema.target_namespace.as_deref())?;
                let name = named(child, "complexType")?;
                schema.add_complex_type(name, decl)?;
            }
            tags::ELEMENT => {
                let decl = build_element(child, true)?;
                let name = named(child, "element")?;
                schema.add_element(name, decl)?;
            }
            tags::ATTRIBUTE => {
                let decl = build_attribute(child, true)?;
                let name = named(child, "attribute")?;
                schema.add_attribute(name, decl)?;
            }
            tags::GROUP => {
                schema.add_group(build_group_decl(child)?)?;
            }
            tags::ATTRIBUTE_GROUP => {
                schema.add_attribute_group(build_attribute_group_decl(child)?)?;
            }
            _ => return Err(bad_child(root, child).into()),
        }
    }

    Ok(schema)
}

fn named(el: &Element, kind: &str) -> Result<String> {
    let name = el.attribute("name").ok_or_else(|| {
        InvalidSchema::new(format!("name is required on a top-level {}", kind))
            .with_location(el.location())
    })?;
    crate::names::validate_ncname(name)?;
    Ok(name.to_string())
}

fn qname_attr(el: &Element, attr: &str) -> Result<Option<QName>> {
    let Some(value) = el.attribute(attr) else {
        return Ok(None);
    };
    crate::names::validate_qname(value).map_err(|_| {
        InvalidSchema::new(format!("'{}' is not a valid QName for {}", value, attr))
            .with_location(el.location())
    })?;
    Ok(Some(QName::parse(value)))
}

/// Build a complex type declaration
pub fn build_complex_type(el: &Element, namespace: Option<&str>) -> Result<StructuralType> {
    let mut decl = StructuralType {
        name: el.attribute("name").map(str::to_string),
        namespace: namespace.map(str::to_string),
        is_abstract: el.attribute("abstract") == Some("true"),
        mixed: el.attribute("mixed") == Some("true"),
        content: Content::Empty,
        attributes: Vec::new(),
        attribute_group_refs: Vec::new(),
        any_attribute: false,
    };

    let mut particle: Option<Particle> = None;

    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::SIMPLE_CONTENT => {
                decl.content = Content::Simple(build_simple_content(child)?);
            }
            tags::COMPLEX_CONTENT => {
                decl.content = Content::Complex(build_complex_content(child)?);
            }
            tags::SEQUENCE | tags::CHOICE | tags::ALL | tags::GROUP => {
                if particle.is_some() {
                    return Err(InvalidSchema::new(
                        "complexType allows at most one content particle",
                    )
                    .with_location(el.location())
                    .into());
                }
                particle = Some(build_particle(child)?);
            }
            tags::ATTRIBUTE => decl.attributes.push(build_attribute(child, false)?),
            tags::ATTRIBUTE_GROUP => decl.attribute_group_refs.push(group_ref(child)?),
            tags::ANY_ATTRIBUTE => decl.any_attribute = true,
            _ => return Err(bad_child(el, child).into()),
        }
    }

    if let Some(p) = particle {
        if matches!(decl.content, Content::Simple(_) | Content::Complex(_)) {
            return Err(InvalidSchema::new(
                "complexType cannot mix a content derivation with a direct particle",
            )
            .with_location(el.location())
            .into());
        }
        decl.content = Content::ElementOnly(p);
    }

    Ok(decl)
}

fn group_ref(el: &Element) -> Result<QName> {
    qname_attr(el, "ref")?.ok_or_else(|| {
        InvalidSchema::new(format!("{} here requires a ref", el.name))
            .with_location(el.location())
            .into()
    })
}

/// Build a particle from a compositor, group reference or wildcard element
pub fn build_particle(el: &Element) -> Result<Particle> {
    let occurs = occurs_of(el)?;
    match el.name.as_str() {
        tags::SEQUENCE => Ok(Particle::Sequence {
            occurs,
            children: build_particle_children(el, false)?,
        }),
        tags::CHOICE => Ok(Particle::Choice {
            occurs,
            children: build_particle_children(el, false)?,
        }),
        tags::ALL => {
            validate_all_occurs(occurs).map_err(|e| locate(e, el))?;
            Ok(Particle::All {
                occurs,
                children: build_particle_children(el, true)?,
            })
        }
        tags::GROUP => Ok(Particle::GroupRef {
            occurs,
            reference: group_ref(el)?,
        }),
        tags::ANY => Ok(Particle::Any { occurs }),
        tags::ELEMENT => Ok(Particle::Element(build_element(el, false)?)),
        _ => Err(InvalidSchema::new(format!("'{}' is not a particle", el.name))
            .with_location(el.location())
            .into()),
    }
}

fn build_particle_children(el: &Element, elements_only: bool) -> Result<Vec<Particle>> {
    let mut children = Vec::new();
    for child in &el.children {
        if child.name == tags::ANNOTATION {
            continue;
        }
        if elements_only && child.name != tags::ELEMENT {
            return Err(InvalidSchema::new(format!(
                "all group only allows element children, got '{}'",
                child.name
            ))
            .with_location(el.location())
            .into());
        }
        children.push(build_particle(child)?);
    }
    Ok(children)
}

/// Build an element declaration
pub fn build_element(el: &Element, top_level: bool) -> Result<ElementDecl> {
    let mut decl = ElementDecl {
        name: el.attribute("name").map(str::to_string),
        reference: qname_attr(el, "ref")?,
        type_ref: qname_attr(el, "type")?,
        inline_simple: None,
        inline_complex: None,
        substitution_group: qname_attr(el, "substitutionGroup")?,
        default: el.attribute("default").map(str::to_string),
        fixed: el.attribute("fixed").map(str::to_string),
        nillable: el.attribute("nillable") == Some("true"),
        is_abstract: el.attribute("abstract") == Some("true"),
        occurs: if top_level { Occurs::once() } else { occurs_of(el)? },
    };

    if top_level {
        if decl.name.is_none() {
            return Err(InvalidSchema::new(
                "name is required on an element whose parent is a schema",
            )
            .with_location(el.location())
            .into());
        }
        if decl.reference.is_some() {
            return Err(InvalidSchema::new(
                "ref cannot be used on an element whose parent is a schema",
            )
            .with_location(el.location())
            .into());
        }
        if el.attribute("minOccurs").is_some() || el.attribute("maxOccurs").is_some() {
            return Err(InvalidSchema::new(
                "occurrence bounds cannot be used on an element whose parent is a schema",
            )
            .with_location(el.location())
            .into());
        }
    } else {
        if decl.name.is_some() && decl.reference.is_some() {
            return Err(InvalidSchema::new("element cannot carry both name and ref")
                .with_location(el.location())
                .into());
        }
        if decl.substitution_group.is_some() {
            return Err(InvalidSchema::new(
                "substitutionGroup cannot be used if element is not the child of a schema",
            )
            .with_location(el.location())
            .into());
        }
    }

    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::SIMPLE_TYPE => {
                decl.inline_simple = Some(Arc::new(build_simple_type(child)?));
            }
            tags::COMPLEX_TYPE => {
                decl.inline_complex = Some(Arc::new(build_complex_type(child, None)?));
            }
            _ => return Err(bad_child(el, child).into()),
        }
    }

    if decl.type_ref.is_some() && (decl.inline_simple.is_some() || decl.inline_complex.is_some()) {
        return Err(
            InvalidSchema::new("element cannot carry both a type attribute and an inline type")
                .with_location(el.location())
                .into(),
        );
    }

    let has_complex_content = decl.inline_complex.is_some();
    if has_complex_content && (decl.default.is_some() || decl.fixed.is_some()) {
        return Err(InvalidSchema::new(
            "default and fixed can only be used on an element whose content is simple",
        )
        .with_location(el.location())
        .into());
    }

    Ok(decl)
}

/// Build an attribute declaration
pub fn build_attribute(el: &Element, top_level: bool) -> Result<AttributeDecl> {
    let use_constraint = match el.attribute("use") {
        None => AttributeUse::Optional,
        Some(value) => AttributeUse::parse(value).ok_or_else(|| {
            InvalidSchema::new(format!("invalid attribute use '{}'", value))
                .with_location(el.location())
        })?,
    };

    let mut decl = AttributeDecl {
        name: el.attribute("name").map(str::to_string),
        reference: qname_attr(el, "ref")?,
        type_ref: qname_attr(el, "type")?,
        inline_type: None,
        use_constraint,
        default: el.attribute("default").map(str::to_string),
        fixed: el.attribute("fixed").map(str::to_string),
    };

    if top_level && decl.reference.is_some() {
        return Err(InvalidSchema::new(
            "ref cannot be used on an attribute whose parent is a schema",
        )
        .with_location(el.location())
        .into());
    }
    if decl.name.is_some() && decl.reference.is_some() {
        return Err(InvalidSchema::new("attribute cannot carry both name and ref")
            .with_location(el.location())
            .into());
    }
    if decl.default.is_some() && decl.fixed.is_some() {
        return Err(InvalidSchema::new("attribute cannot carry both default and fixed")
            .with_location(el.location())
            .into());
    }

    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::SIMPLE_TYPE => {
                decl.inline_type = Some(Arc::new(build_simple_type(child)?));
            }
            _ => return Err(bad_child(el, child).into()),
        }
    }

    if decl.type_ref.is_some() && decl.inline_type.is_some() {
        return Err(
            InvalidSchema::new("attribute cannot carry both a type attribute and an inline type")
                .with_location(el.location())
                .into(),
        );
    }

    Ok(decl)
}

fn build_attribute_group_decl(el: &Element) -> Result<AttributeGroupDecl> {
    let mut decl = AttributeGroupDecl {
        name: named(el, "attributeGroup")?,
        attributes: Vec::new(),
        group_refs: Vec::new(),
    };

    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::ATTRIBUTE => decl.attributes.push(build_attribute(child, false)?),
            tags::ATTRIBUTE_GROUP => decl.group_refs.push(group_ref(child)?),
            tags::ANY_ATTRIBUTE => {}
            _ => return Err(bad_child(el, child).into()),
        }
    }

    Ok(decl)
}

fn build_group_decl(el: &Element) -> Result<GroupDecl> {
    let name = named(el, "group")?;
    let mut particle = None;

    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::SEQUENCE | tags::CHOICE | tags::ALL => {
                if particle.is_some() {
                    return Err(InvalidSchema::new("group allows exactly one compositor")
                        .with_location(el.location())
                        .into());
                }
                particle = Some(build_particle(child)?);
            }
            _ => return Err(bad_child(el, child).into()),
        }
    }

    let particle = particle.ok_or_else(|| {
        InvalidSchema::new("group requires a compositor").with_location(el.location())
    })?;

    Ok(GroupDecl { name, particle })
}

/// Build a simple type definition
pub fn build_simple_type(el: &Element) -> Result<SimpleType> {
    let name = el.attribute("name").map(str::to_string);

    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::RESTRICTION => {
                let base = base_of(child)?;
                let facets = build_facets(child)?;
                return Ok(SimpleType {
                    name,
                    variety: SimpleVariety::Restriction { base, facets },
                });
            }
            tags::LIST => {
                let item_type = qname_attr(child, "itemType")?.ok_or_else(|| {
                    InvalidSchema::new("list requires an itemType").with_location(el.location())
                })?;
                return Ok(SimpleType {
                    name,
                    variety: SimpleVariety::List { item_type },
                });
            }
            tags::UNION => {
                let member_types = child
                    .attribute("memberTypes")
                    .map(|m| m.split_whitespace().map(QName::parse).collect())
                    .unwrap_or_default();
                return Ok(SimpleType {
                    name,
                    variety: SimpleVariety::Union { member_types },
                });
            }
            _ => return Err(bad_child(el, child).into()),
        }
    }

    Err(InvalidSchema::new("simpleType requires a restriction, list or union")
        .with_location(el.location())
        .into())
}

fn base_of(el: &Element) -> Result<QName> {
    qname_attr(el, "base")?.ok_or_else(|| {
        InvalidSchema::new(format!("{} requires a base", el.name))
            .with_location(el.location())
            .into()
    })
}

/// Collect facets from a restriction's children in declared order
///
/// Repeated enumeration facets collapse into a single enumeration entry.
pub fn build_facets(restriction: &Element) -> Result<Vec<Facet>> {
    let mut facets = Vec::new();
    let mut enumeration: Vec<String> = Vec::new();

    for child in &restriction.children {
        match child.name.as_str() {
            tags::ANNOTATION | tags::SIMPLE_TYPE => {}
            tags::ENUMERATION => {
                let value = child.attribute("value").ok_or_else(|| {
                    InvalidSchema::new("enumeration requires a value")
                        .with_location(restriction.location())
                })?;
                enumeration.push(value.to_string());
            }
            tag => {
                let value = child.attribute("value").ok_or_else(|| {
                    InvalidSchema::new(format!("facet '{}' requires a value", tag))
                        .with_location(restriction.location())
                })?;
                facets.push(parse_facet(tag, value).map_err(|e| locate(e, restriction))?);
            }
        }
    }

    if !enumeration.is_empty() {
        facets.push(Facet::Enumeration(enumeration));
    }

    Ok(facets)
}

fn build_simple_content(el: &Element) -> Result<SimpleContentDef> {
    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::RESTRICTION | tags::EXTENSION => {
                let method = if child.name == tags::EXTENSION {
                    DerivationMethod::Extension
                } else {
                    DerivationMethod::Restriction
                };
                let base = base_of(child)?;
                let facets = if method == DerivationMethod::Restriction {
                    build_facets_skipping_attributes(child)?
                } else {
                    Vec::new()
                };

                let mut attributes = Vec::new();
                let mut attribute_group_refs = Vec::new();
                for inner in &child.children {
                    match inner.name.as_str() {
                        tags::ATTRIBUTE => attributes.push(build_attribute(inner, false)?),
                        tags::ATTRIBUTE_GROUP => attribute_group_refs.push(group_ref(inner)?),
                        _ => {}
                    }
                }

                return Ok(SimpleContentDef {
                    method,
                    base,
                    facets,
                    attributes,
                    attribute_group_refs,
                });
            }
            _ => return Err(bad_child(el, child).into()),
        }
    }

    Err(InvalidSchema::new("simpleContent requires a restriction or extension")
        .with_location(el.location())
        .into())
}

fn build_facets_skipping_attributes(restriction: &Element) -> Result<Vec<Facet>> {
    // simpleContent restrictions interleave facets with attribute declarations
    let mut pruned = restriction.clone();
    pruned
        .children
        .retain(|c| c.name != tags::ATTRIBUTE && c.name != tags::ATTRIBUTE_GROUP);
    build_facets(&pruned)
}

fn build_complex_content(el: &Element) -> Result<ComplexContentDef> {
    for child in &el.children {
        match child.name.as_str() {
            tags::ANNOTATION => {}
            tags::RESTRICTION | tags::EXTENSION => {
                let method = if child.name == tags::EXTENSION {
                    DerivationMethod::Extension
                } else {
                    DerivationMethod::Restriction
                };
                let base = base_of(child)?;

                let mut particle = None;
                let mut attributes = Vec::new();
                let mut attribute_group_refs = Vec::new();
                let mut any_attribute = false;

                for inner in &child.children {
                    match inner.name.as_str() {
                        tags::ANNOTATION => {}
                        tags::SEQUENCE | tags::CHOICE | tags::ALL | tags::GROUP => {
                            if particle.is_some() {
                                return Err(InvalidSchema::new(
                                    "derivation allows at most one content particle",
                                )
                                .with_location(el.location())
                                .into());
                            }
                            particle = Some(build_particle(inner)?);
                        }
                        tags::ATTRIBUTE => attributes.push(build_attribute(inner, false)?),
                        tags::ATTRIBUTE_GROUP => attribute_group_refs.push(group_ref(inner)?),
                        tags::ANY_ATTRIBUTE => any_attribute = true,
                        _ => return Err(bad_child(child, inner).into()),
                    }
                }

                return Ok(ComplexContentDef {
                    method,
                    base,
                    particle,
                    attributes,
                    attribute_group_refs,
                    any_attribute,
                });
            }
            _ => return Err(bad_child(el, child).into()),
        }
    }

    Err(InvalidSchema::new("complexContent requires a restriction or extension")
        .with_location(el.location())
        .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;

    fn schema_from(xml: &str) -> Result<Schema> {
        let doc = Document::from_str(xml)?;
        build_schema(doc.root().expect("document has a root"))
    }

    #[test]
    fn test_build_minimal_schema() {
        let schema = schema_from(
            r#"<schema xmlns="http://www.w3.org/2001/XMLSchema"
                       targetNamespace="http://example.com/ns">
                 <complexType name="Invoice">
                   <sequence>
                     <element name="total" type="xs:decimal"/>
                   </sequence>
                 </complexType>
               </schema>"#,
        )
        .unwrap();

        assert_eq!(schema.target_namespace.as_deref(), Some("http://example.com/ns"));
        let invoice = schema.complex_types.get("Invoice").unwrap();
        assert!(matches!(invoice.content, Content::ElementOnly(_)));
    }

    #[test]
    fn test_element_type_and_inline_type_conflict() {
        let err = schema_from(
            r#"<schema>
                 <element name="price" type="xs:decimal">
                   <simpleType>
                     <restriction base="xs:decimal"/>
                   </simpleType>
                 </element>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("inline type"));
    }

    #[test]
    fn test_malformed_qname_attribute_rejected() {
        let err = schema_from(
            r#"<schema>
                 <element name="price" type="1bad:decimal"/>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not a valid QName"));
    }

    #[test]
    fn test_name_and_ref_conflict() {
        let err = schema_from(
            r#"<schema>
                 <complexType name="T">
                   <sequence>
                     <element name="a" ref="tns:b"/>
                   </sequence>
                 </complexType>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("both name and ref"));
    }

    #[test]
    fn test_substitution_group_only_top_level() {
        let err = schema_from(
            r#"<schema>
                 <complexType name="T">
                   <sequence>
                     <element name="a" substitutionGroup="tns:head"/>
                   </sequence>
                 </complexType>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("substitutionGroup"));
    }

    #[test]
    fn test_missing_base_is_invalid() {
        let err = schema_from(
            r#"<schema>
                 <complexType name="T">
                   <complexContent>
                     <extension/>
                   </complexContent>
                 </complexType>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("requires a base"));
    }

    #[test]
    fn test_all_group_occurs_invariant() {
        let err = schema_from(
            r#"<schema>
                 <complexType name="T">
                   <all maxOccurs="2">
                     <element name="a" type="xs:string"/>
                   </all>
                 </complexType>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("all group"));
    }

    #[test]
    fn test_all_rejects_compositor_children() {
        let err = schema_from(
            r#"<schema>
                 <complexType name="T">
                   <all>
                     <sequence/>
                   </all>
                 </complexType>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("element children"));
    }

    #[test]
    fn test_unknown_child_rejected() {
        let err = schema_from(
            r#"<schema>
                 <complexType name="T">
                   <bogus/>
                 </complexType>
               </schema>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad element"));
    }

    #[test]
    fn test_simple_type_facets_collected_in_order() {
        let schema = schema_from(
            r#"<schema>
                 <simpleType name="Score">
                   <restriction base="xs:integer">
                     <minInclusive value="0"/>
                     <maxInclusive value="100"/>
                   </restriction>
                 </simpleType>
               </schema>"#,
        )
        .unwrap();

        let score = schema.simple_types.get("Score").unwrap();
        match &score.variety {
            SimpleVariety::Restriction { base, facets } => {
                assert_eq!(base.local, "integer");
                assert_eq!(facets.len(), 2);
                assert_eq!(facets[0].tag(), "minInclusive");
                assert_eq!(facets[1].tag(), "maxInclusive");
            }
            _ => panic!("expected a restriction"),
        }
    }

    #[test]
    fn test_enumeration_facets_collapse() {
        let schema = schema_from(
            r#"<schema>
                 <simpleType name="Color">
                   <restriction base="xs:string">
                     <enumeration value="red"/>
                     <enumeration value="green"/>
                   </restriction>
                 </simpleType>
               </schema>"#,
        )
        .unwrap();

        let color = schema.simple_types.get("Color").unwrap();
        match &color.variety {
            SimpleVariety::Restriction { facets, .. } => {
                assert_eq!(facets.len(), 1);
                assert!(color.check_facets("red").is_ok());
                assert!(color.check_facets("blue").is_err());
            }
            _ => panic!("expected a restriction"),
        }
    }

    #[test]
    fn test_imports_collected() {
        let schema = schema_from(
            r#"<schema targetNamespace="http://example.com/a"
                       xmlns:b="http://example.com/b">
                 <import namespace="http://example.com/b" schemaLocation="b.xsd"/>
               </schema>"#,
        )
        .unwrap();

        assert_eq!(schema.imports.len(), 1);
        assert_eq!(schema.imports[0].namespace, "http://example.com/b");
        assert_eq!(schema.imports[0].location.as_deref(), Some("b.xsd"));
        assert_eq!(
            schema.aliases.namespace_for("b"),
            Some("http://example.com/b")
        );
    }
}
