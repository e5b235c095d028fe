//! Schema graph and reference resolution
//!
//! A `SchemaGraph` holds every registered schema document keyed by target
//! namespace and resolves qualified references across them. Each reference
//! is resolved against the alias table of the schema it appears in, then
//! looked up in the declaration tables of the owning document. Named types
//! are interned to `TypeId`s at registration so the compiler can key its
//! memo table and cycle guard on cheap ids instead of qualified names.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::documents::Document;
use crate::error::{Error, InvalidSchema, Result, UnresolvedReference};
use crate::namespaces::QName;

use super::build::build_schema;
use super::types::{
    AttributeDecl, AttributeGroupDecl, ElementDecl, GroupDecl, OccursOverride, SimpleType,
    SimpleVariety, StructuralType,
};
use super::Schema;

/// The XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Interned identity of a named type
///
/// Two ids are equal exactly when they name the same (namespace, local name)
/// pair. Ids are only meaningful within the graph that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TypeId(u32);

/// Source of imported schema documents
///
/// The graph calls this when an import names a namespace it has not seen.
/// Returning `Ok(None)` means the source has no document for the namespace,
/// which fails the load.
pub trait DocumentSource {
    /// Fetch the schema text for a namespace, using the location hint if any
    fn load(&self, namespace: &str, location: Option<&str>) -> Result<Option<String>>;
}

/// Document source backed by an in-memory namespace map
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    documents: HashMap<String, String>,
}

impl MapSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the schema text for a namespace
    pub fn insert(&mut self, namespace: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(namespace.into(), text.into());
    }
}

impl DocumentSource for MapSource {
    fn load(&self, namespace: &str, _location: Option<&str>) -> Result<Option<String>> {
        Ok(self.documents.get(namespace).cloned())
    }
}

/// A resolved reference
///
/// `resolve` searches the declaration tables in a fixed priority order:
/// complex types, simple types, top-level attributes, model groups,
/// attribute groups.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A built-in XSD type, by local name
    Builtin(String),
    /// A named complex type
    Complex(TypeId, Arc<StructuralType>),
    /// A named simple type
    Simple(TypeId, Arc<SimpleType>),
    /// A top-level attribute declaration
    Attribute(Arc<AttributeDecl>),
    /// A named model group
    Group(Arc<GroupDecl>),
    /// A named attribute group
    AttributeGroup(Arc<AttributeGroupDecl>),
}

/// A resolved type reference, narrowed to type space
#[derive(Debug, Clone)]
pub enum ResolvedType {
    /// A built-in XSD type, by local name
    Builtin(String),
    /// A named complex type
    Complex(TypeId, Arc<StructuralType>),
    /// A named simple type
    Simple(TypeId, Arc<SimpleType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TypeKey {
    namespace: Option<String>,
    name: String,
}

/// Registry of schemas plus the cross-document reference resolver
#[derive(Debug, Default)]
pub struct SchemaGraph {
    schemas: IndexMap<Option<String>, Schema>,
    ids: HashMap<TypeKey, TypeId>,
    keys: Vec<TypeKey>,
}

impl SchemaGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema document
    ///
    /// Returns false without touching the graph when a schema for the same
    /// target namespace is already registered. Registering the same namespace
    /// twice is how import cycles terminate, so this is not an error.
    pub fn register(&mut self, schema: Schema) -> Result<bool> {
        if self.schemas.contains_key(&schema.target_namespace) {
            return Ok(false);
        }

        for name in schema.complex_types.keys() {
            self.intern(schema.target_namespace.clone(), name.clone());
        }
        for name in schema.simple_types.keys() {
            self.intern(schema.target_namespace.clone(), name.clone());
        }

        self.schemas.insert(schema.target_namespace.clone(), schema);
        Ok(true)
    }

    fn intern(&mut self, namespace: Option<String>, name: String) -> TypeId {
        let key = TypeKey { namespace, name };
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = TypeId(self.keys.len() as u32);
        self.keys.push(key.clone());
        self.ids.insert(key, id);
        id
    }

    /// Parse, build and register a schema document, following its imports
    ///
    /// Imports are resolved breadth-first through `source`. A namespace that
    /// is already registered is skipped, so mutually importing documents
    /// load exactly once each.
    pub fn load_str(&mut self, text: &str, source: &dyn DocumentSource) -> Result<()> {
        let mut pending = vec![self.parse_document(text)?];

        while let Some(schema) = pending.pop() {
            let imports = schema.imports.clone();
            if !self.register(schema)? {
                continue;
            }
            for import in imports {
                if import.namespace == XSD_NAMESPACE
                    || self.schemas.contains_key(&Some(import.namespace.clone()))
                {
                    continue;
                }
                let text = source
                    .load(&import.namespace, import.location.as_deref())?
                    .ok_or_else(|| {
                        Error::Resource(format!(
                            "no schema document available for namespace '{}'",
                            import.namespace
                        ))
                    })?;
                pending.push(self.parse_document(&text)?);
            }
        }

        Ok(())
    }

    fn parse_document(&self, text: &str) -> Result<Schema> {
        let doc = Document::from_str(text)?;
        let root = doc
            .root()
            .ok_or_else(|| Error::Xml("schema document is empty".to_string()))?;
        build_schema(root)
    }

    /// The schema registered for a target namespace
    pub fn schema_for(&self, namespace: Option<&str>) -> Option<&Schema> {
        self.schemas.get(&namespace.map(str::to_string))
    }

    /// Registered schemas in registration order
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// The interned id of a named type, if the graph knows it
    pub fn type_id(&self, namespace: Option<&str>, name: &str) -> Option<TypeId> {
        self.ids
            .get(&TypeKey {
                namespace: namespace.map(str::to_string),
                name: name.to_string(),
            })
            .copied()
    }

    /// Qualified display name for an interned id, for diagnostics
    pub fn type_name(&self, id: TypeId) -> String {
        let key = &self.keys[id.0 as usize];
        match &key.namespace {
            Some(ns) => format!("{{{}}}{}", ns, key.name),
            None => key.name.clone(),
        }
    }

    /// Local name of an interned id
    pub fn local_name(&self, id: TypeId) -> &str {
        &self.keys[id.0 as usize].name
    }

    /// The schema that declares an interned type
    pub fn schema_of(&self, id: TypeId) -> Option<&Schema> {
        let key = &self.keys[id.0 as usize];
        self.schema_for(key.namespace.as_deref())
    }

    /// Determine which namespace a reference points into
    ///
    /// Prefixed references go through the alias table of the referring
    /// schema. Unprefixed references fall back to the schema's default
    /// namespace, then to its own target namespace.
    pub fn target_of(&self, reference: &QName, from: &Schema) -> Result<Option<String>> {
        match &reference.prefix {
            Some(prefix) => match from.aliases.namespace_for(prefix) {
                Some(ns) => Ok(Some(ns.to_string())),
                None => Err(self.unresolved(reference, from).into()),
            },
            None => Ok(from
                .aliases
                .default_namespace()
                .map(str::to_string)
                .or_else(|| from.target_namespace.clone())),
        }
    }

    fn unresolved(&self, reference: &QName, from: &Schema) -> UnresolvedReference {
        let err = UnresolvedReference::new(reference.to_string());
        match &from.target_namespace {
            Some(ns) => err.from_namespace(ns),
            None => err,
        }
    }

    fn owner(&self, reference: &QName, from: &Schema) -> Result<(&Schema, Option<String>)> {
        let namespace = self.target_of(reference, from)?;
        let schema = self
            .schema_for(namespace.as_deref())
            .ok_or_else(|| self.unresolved(reference, from))?;
        Ok((schema, namespace))
    }

    /// Resolve any qualified reference in fixed priority order
    pub fn resolve(&self, reference: &QName, from: &Schema) -> Result<Resolved> {
        let namespace = self.target_of(reference, from)?;
        if namespace.as_deref() == Some(XSD_NAMESPACE) {
            return Ok(Resolved::Builtin(reference.local.clone()));
        }

        let schema = self
            .schema_for(namespace.as_deref())
            .ok_or_else(|| self.unresolved(reference, from))?;
        let name = &reference.local;

        if let Some(decl) = schema.complex_types.get(name) {
            let id = self
                .type_id(namespace.as_deref(), name)
                .ok_or_else(|| self.unresolved(reference, from))?;
            return Ok(Resolved::Complex(id, Arc::clone(decl)));
        }
        if let Some(decl) = schema.simple_types.get(name) {
            let id = self
                .type_id(namespace.as_deref(), name)
                .ok_or_else(|| self.unresolved(reference, from))?;
            return Ok(Resolved::Simple(id, Arc::clone(decl)));
        }
        if let Some(decl) = schema.attributes.get(name) {
            return Ok(Resolved::Attribute(Arc::clone(decl)));
        }
        if let Some(decl) = schema.groups.get(name) {
            return Ok(Resolved::Group(Arc::clone(decl)));
        }
        if let Some(decl) = schema.attribute_groups.get(name) {
            return Ok(Resolved::AttributeGroup(Arc::clone(decl)));
        }

        Err(self.unresolved(reference, from).into())
    }

    /// Resolve a reference that must name a type
    pub fn resolve_type(&self, reference: &QName, from: &Schema) -> Result<ResolvedType> {
        match self.resolve(reference, from)? {
            Resolved::Builtin(name) => Ok(ResolvedType::Builtin(name)),
            Resolved::Complex(id, decl) => Ok(ResolvedType::Complex(id, decl)),
            Resolved::Simple(id, decl) => Ok(ResolvedType::Simple(id, decl)),
            _ => Err(self.unresolved(reference, from).into()),
        }
    }

    /// Resolve a reference that must name a model group
    pub fn resolve_group(&self, reference: &QName, from: &Schema) -> Result<Arc<GroupDecl>> {
        match self.resolve(reference, from)? {
            Resolved::Group(decl) => Ok(decl),
            _ => Err(self.unresolved(reference, from).into()),
        }
    }

    /// Resolve a reference that must name an attribute group
    pub fn resolve_attribute_group(
        &self,
        reference: &QName,
        from: &Schema,
    ) -> Result<Arc<AttributeGroupDecl>> {
        match self.resolve(reference, from)? {
            Resolved::AttributeGroup(decl) => Ok(decl),
            _ => Err(self.unresolved(reference, from).into()),
        }
    }

    /// Resolve a reference to a top-level element declaration
    ///
    /// Returns the declaration plus the schema that owns it, so substitution
    /// chains keep resolving in the right alias scope.
    pub fn resolve_element<'a>(
        &'a self,
        reference: &QName,
        from: &Schema,
    ) -> Result<(Arc<ElementDecl>, &'a Schema)> {
        let (schema, _) = self.owner(reference, from)?;
        let decl = schema
            .elements
            .get(&reference.local)
            .ok_or_else(|| self.unresolved(reference, from))?;
        Ok((Arc::clone(decl), schema))
    }

    /// Resolve an element particle at its use site
    ///
    /// For a ref site the referenced declaration is cloned and the site's
    /// occurrence bounds take over. A referenced declaration naming a
    /// substitution head is merged against it, following the chain to its
    /// root: the root head's type wins over anything declared along the
    /// way, while the referenced name and the site's bounds are kept.
    pub fn resolve_element_site(&self, site: &ElementDecl, from: &Schema) -> Result<ElementDecl> {
        let Some(reference) = &site.reference else {
            return Ok(site.clone());
        };

        let (head, mut owner) = self.resolve_element(reference, from)?;
        let mut merged = head.merged_with(&OccursOverride {
            name: None,
            min_occurs: Some(site.occurs.min),
            max_occurs: Some(site.occurs.max),
        });

        let mut current = head;
        let mut seen: HashSet<String> = HashSet::new();
        while let Some(group) = current.substitution_group.clone() {
            if !seen.insert(group.to_string()) {
                return Err(InvalidSchema::new(format!(
                    "substitution group cycle through '{}'",
                    group
                ))
                .into());
            }
            let (next, next_owner) = self.resolve_element(&group, owner)?;
            current = next;
            owner = next_owner;
        }

        merged.type_ref = current.type_ref.clone();
        merged.inline_simple = current.inline_simple.clone();
        merged.inline_complex = current.inline_complex.clone();
        Ok(merged)
    }

    /// Resolve an attribute use at its site
    ///
    /// Ref sites take the referenced declaration's name and type; the site's
    /// own use constraint, default and fixed values win.
    pub fn resolve_attribute_site(
        &self,
        site: &AttributeDecl,
        from: &Schema,
    ) -> Result<AttributeDecl> {
        let Some(reference) = &site.reference else {
            return Ok(site.clone());
        };

        let target = match self.resolve(reference, from)? {
            Resolved::Attribute(decl) => decl,
            _ => return Err(self.unresolved(reference, from).into()),
        };

        let mut merged = (*target).clone();
        merged.use_constraint = site.use_constraint;
        if site.default.is_some() {
            merged.default = site.default.clone();
        }
        if site.fixed.is_some() {
            merged.fixed = site.fixed.clone();
        }
        Ok(merged)
    }

    /// Check a lexical value against a simple type, following base chains
    ///
    /// Each restriction's own facets apply first, then the base type's, up
    /// to the built-in root. List values check each item; union values pass
    /// when any member type accepts them.
    pub fn check_simple_value(&self, reference: &QName, from: &Schema, value: &str) -> Result<()> {
        let mut seen = HashSet::new();
        self.check_simple_value_inner(reference, from, value, &mut seen)
    }

    fn check_simple_value_inner(
        &self,
        reference: &QName,
        from: &Schema,
        value: &str,
        seen: &mut HashSet<String>,
    ) -> Result<()> {
        if !seen.insert(reference.to_string()) {
            return Err(InvalidSchema::new(format!(
                "simple type base chain cycle through '{}'",
                reference
            ))
            .into());
        }

        match self.resolve_type(reference, from)? {
            ResolvedType::Builtin(_) => Ok(()),
            ResolvedType::Complex(_, _) => Err(Error::Value(format!(
                "'{}' is a complex type, a simple value was expected",
                reference
            ))),
            ResolvedType::Simple(_, decl) => {
                self.check_simple_decl(&decl, from, value, seen)
            }
        }
    }

    fn check_simple_decl(
        &self,
        decl: &SimpleType,
        from: &Schema,
        value: &str,
        seen: &mut HashSet<String>,
    ) -> Result<()> {
        match &decl.variety {
            SimpleVariety::Restriction { base, facets } => {
                for facet in facets {
                    facet.check(value)?;
                }
                self.check_simple_value_inner(base, from, value, seen)
            }
            SimpleVariety::List { item_type } => {
                for item in value.split_whitespace() {
                    let mut item_seen = HashSet::new();
                    self.check_simple_value_inner(item_type, from, item, &mut item_seen)?;
                }
                Ok(())
            }
            SimpleVariety::Union { member_types } => {
                for member in member_types {
                    let mut member_seen = HashSet::new();
                    if self
                        .check_simple_value_inner(member, from, value, &mut member_seen)
                        .is_ok()
                    {
                        return Ok(());
                    }
                }
                Err(Error::Value(format!(
                    "value '{}' is not accepted by any member type of the union",
                    value
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XS: &str = r#"xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    fn graph_from(documents: &[(&str, &str)]) -> SchemaGraph {
        let mut source = MapSource::new();
        for (namespace, text) in documents.iter().skip(1) {
            source.insert(*namespace, *text);
        }
        let mut graph = SchemaGraph::new();
        graph.load_str(documents[0].1, &source).unwrap();
        graph
    }

    #[test]
    fn test_register_short_circuits_on_namespace() {
        let mut graph = SchemaGraph::new();
        let first = Schema::new(Some("http://example.com/ns".to_string()));
        let second = Schema::new(Some("http://example.com/ns".to_string()));

        assert!(graph.register(first).unwrap());
        assert!(!graph.register(second).unwrap());
        assert_eq!(graph.schemas().count(), 1);
    }

    #[test]
    fn test_resolve_across_import() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a"
                     xmlns:b="http://example.com/b">
                 <import namespace="http://example.com/b" schemaLocation="b.xsd"/>
                 <complexType name="Order">
                   <sequence>
                     <element name="item" type="b:Item"/>
                   </sequence>
                 </complexType>
               </schema>"#
        );
        let b = format!(
            r#"<schema {XS} targetNamespace="http://example.com/b">
                 <complexType name="Item">
                   <sequence>
                     <element name="sku" type="xs:string"/>
                   </sequence>
                 </complexType>
               </schema>"#
        );

        let graph = graph_from(&[
            ("http://example.com/a", a.as_str()),
            ("http://example.com/b", b.as_str()),
        ]);

        let from = graph.schema_for(Some("http://example.com/a")).unwrap();
        let resolved = graph.resolve(&QName::parse("b:Item"), from).unwrap();
        assert!(matches!(resolved, Resolved::Complex(_, _)));
    }

    #[test]
    fn test_import_cycle_terminates() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a"
                     xmlns:b="http://example.com/b">
                 <import namespace="http://example.com/b"/>
                 <simpleType name="A">
                   <restriction base="xs:string"/>
                 </simpleType>
               </schema>"#
        );
        let b = format!(
            r#"<schema {XS} targetNamespace="http://example.com/b"
                     xmlns:a="http://example.com/a">
                 <import namespace="http://example.com/a"/>
                 <simpleType name="B">
                   <restriction base="xs:string"/>
                 </simpleType>
               </schema>"#
        );

        let graph = graph_from(&[
            ("http://example.com/a", a.as_str()),
            ("http://example.com/b", b.as_str()),
        ]);

        assert!(graph.schema_for(Some("http://example.com/a")).is_some());
        assert!(graph.schema_for(Some("http://example.com/b")).is_some());
    }

    #[test]
    fn test_missing_import_is_an_error() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a">
                 <import namespace="http://example.com/missing"/>
               </schema>"#
        );

        let mut graph = SchemaGraph::new();
        let err = graph.load_str(&a, &MapSource::new()).unwrap_err();
        assert!(err.to_string().contains("http://example.com/missing"));
    }

    #[test]
    fn test_unknown_prefix_is_unresolved() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a">
                 <simpleType name="A">
                   <restriction base="xs:string"/>
                 </simpleType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();
        let err = graph.resolve(&QName::parse("nope:Thing"), from).unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));
    }

    #[test]
    fn test_builtin_resolution() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a">
                 <simpleType name="A">
                   <restriction base="xs:string"/>
                 </simpleType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();
        match graph.resolve(&QName::parse("xs:decimal"), from).unwrap() {
            Resolved::Builtin(name) => assert_eq!(name, "decimal"),
            other => panic!("expected a builtin, got {:?}", other),
        }
    }

    #[test]
    fn test_type_ids_are_stable_identity() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a">
                 <complexType name="T">
                   <sequence/>
                 </complexType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();

        let first = graph.resolve(&QName::parse("T"), from).unwrap();
        let second = graph.resolve(&QName::parse("T"), from).unwrap();
        match (first, second) {
            (Resolved::Complex(a, _), Resolved::Complex(b, _)) => assert_eq!(a, b),
            other => panic!("expected complex types, got {:?}", other),
        }
        assert_eq!(
            graph.type_name(graph.type_id(Some("http://example.com/a"), "T").unwrap()),
            "{http://example.com/a}T"
        );
    }

    #[test]
    fn test_element_ref_site_takes_site_occurs() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a"
                     xmlns:tns="http://example.com/a">
                 <element name="note" type="xs:string"/>
                 <complexType name="T">
                   <sequence>
                     <element ref="tns:note" minOccurs="0" maxOccurs="unbounded"/>
                   </sequence>
                 </complexType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();

        let ty = from.complex_types.get("T").unwrap();
        let particle = ty.particle().unwrap();
        let site = match particle {
            crate::schema::particles::Particle::Sequence { children, .. } => match &children[0] {
                crate::schema::particles::Particle::Element(decl) => decl,
                other => panic!("expected an element, got {:?}", other.kind()),
            },
            other => panic!("expected a sequence, got {:?}", other.kind()),
        };

        let resolved = graph.resolve_element_site(site, from).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("note"));
        assert_eq!(resolved.occurs.min, 0);
        assert_eq!(resolved.occurs.max, None);
        assert_eq!(resolved.type_ref.as_ref().unwrap().local, "string");
    }

    #[test]
    fn test_substitution_chain_supplies_type() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a"
                     xmlns:tns="http://example.com/a">
                 <element name="base" type="xs:string"/>
                 <element name="middle" substitutionGroup="tns:base"/>
                 <complexType name="T">
                   <sequence>
                     <element ref="tns:middle"/>
                   </sequence>
                 </complexType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();

        let ty = from.complex_types.get("T").unwrap();
        let site = match ty.particle().unwrap() {
            crate::schema::particles::Particle::Sequence { children, .. } => match &children[0] {
                crate::schema::particles::Particle::Element(decl) => decl,
                other => panic!("expected an element, got {:?}", other.kind()),
            },
            other => panic!("expected a sequence, got {:?}", other.kind()),
        };

        let resolved = graph.resolve_element_site(site, from).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("middle"));
        assert_eq!(resolved.type_ref.as_ref().unwrap().local, "string");
    }

    #[test]
    fn test_substitution_root_type_wins_over_member_type() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a"
                     xmlns:tns="http://example.com/a">
                 <element name="base" type="xs:decimal"/>
                 <element name="middle" type="xs:string" substitutionGroup="tns:base"/>
                 <complexType name="T">
                   <sequence>
                     <element ref="tns:middle"/>
                   </sequence>
                 </complexType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();

        let ty = from.complex_types.get("T").unwrap();
        let site = match ty.particle().unwrap() {
            crate::schema::particles::Particle::Sequence { children, .. } => match &children[0] {
                crate::schema::particles::Particle::Element(decl) => decl,
                other => panic!("expected an element, got {:?}", other.kind()),
            },
            other => panic!("expected a sequence, got {:?}", other.kind()),
        };

        // the chain root's type replaces the member's own declaration
        let resolved = graph.resolve_element_site(site, from).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("middle"));
        assert_eq!(resolved.type_ref.as_ref().unwrap().local, "decimal");
    }

    #[test]
    fn test_check_simple_value_follows_base_chain() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a"
                     xmlns:tns="http://example.com/a">
                 <simpleType name="Score">
                   <restriction base="xs:integer">
                     <minInclusive value="0"/>
                     <maxInclusive value="100"/>
                   </restriction>
                 </simpleType>
                 <simpleType name="PassingScore">
                   <restriction base="tns:Score">
                     <minInclusive value="60"/>
                   </restriction>
                 </simpleType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();

        let passing = QName::parse("tns:PassingScore");
        assert!(graph.check_simple_value(&passing, from, "75").is_ok());
        // rejected by the derived type's own facet
        assert!(graph.check_simple_value(&passing, from, "50").is_err());
        // rejected by the base type's facet
        assert!(graph.check_simple_value(&passing, from, "150").is_err());
    }

    #[test]
    fn test_union_accepts_any_member() {
        let a = format!(
            r#"<schema {XS} targetNamespace="http://example.com/a"
                     xmlns:tns="http://example.com/a">
                 <simpleType name="Small">
                   <restriction base="xs:integer">
                     <maxInclusive value="9"/>
                   </restriction>
                 </simpleType>
                 <simpleType name="Keyword">
                   <restriction base="xs:string">
                     <enumeration value="auto"/>
                   </restriction>
                 </simpleType>
                 <simpleType name="SmallOrAuto">
                   <union memberTypes="tns:Small tns:Keyword"/>
                 </simpleType>
               </schema>"#
        );

        let graph = graph_from(&[("http://example.com/a", a.as_str())]);
        let from = graph.schema_for(Some("http://example.com/a")).unwrap();

        let union = QName::parse("tns:SmallOrAuto");
        assert!(graph.check_simple_value(&union, from, "5").is_ok());
        assert!(graph.check_simple_value(&union, from, "auto").is_ok());
        assert!(graph.check_simple_value(&union, from, "manual").is_err());
    }
}
