//! Content model compiler
//!
//! Turns resolved structural types into `CompiledPlan`s: the property list,
//! validation obligations and serialization recipe an emitter needs to
//! generate one data type. Plans are memoized by `TypeId`; a nested compile
//! of a type that is still being compiled yields a named `PlanRef`
//! placeholder instead of recursing, so self-referential content models
//! terminate and share a single plan.

pub mod plan;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{InvalidSchema, Result};
use crate::namespaces::QName;
use crate::schema::graph::{ResolvedType, SchemaGraph, TypeId};
use crate::schema::particles::{Occurs, Particle};
use crate::schema::types::{
    AttributeDecl, AttributeUse, Content, DerivationMethod, ElementDecl, StructuralType,
};
use crate::schema::Schema;

use plan::{
    AttributeProperty, CompiledPlan, ContainerEntry, ContainerKind, ContainerPlan,
    ParticleProperty, PlanRef, PropertyKind, PropertyValue, SerializationStep, TagPiece,
    ValidationObligation, ValueType,
};

/// Walk context threaded explicitly through the particle tree
///
/// A leaf inherits collection shape from any ancestor that repeats, so the
/// flag is carried down instead of being shared mutable state.
#[derive(Debug, Clone, Copy, Default)]
struct ParticleContext {
    in_collection: bool,
}

impl ParticleContext {
    fn entering(self, occurs: Occurs) -> Self {
        Self {
            in_collection: self.in_collection || occurs.is_multiple(),
        }
    }
}

/// Compiles structural types against a loaded schema graph
pub struct Compiler<'g> {
    graph: &'g SchemaGraph,
    plans: RefCell<HashMap<TypeId, Arc<CompiledPlan>>>,
    in_flight: RefCell<HashSet<TypeId>>,
}

impl<'g> Compiler<'g> {
    /// Create a compiler over a loaded graph
    pub fn new(graph: &'g SchemaGraph) -> Self {
        Self {
            graph,
            plans: RefCell::new(HashMap::new()),
            in_flight: RefCell::new(HashSet::new()),
        }
    }

    /// Compile the named complex type behind an interned id
    ///
    /// Memoized: compiling the same id twice returns the same `Arc`.
    pub fn compile(&self, id: TypeId) -> Result<Arc<CompiledPlan>> {
        if let Some(plan) = self.plans.borrow().get(&id) {
            return Ok(Arc::clone(plan));
        }
        if self.in_flight.borrow().contains(&id) {
            return Err(InvalidSchema::new(format!(
                "circular type derivation through '{}'",
                self.graph.type_name(id)
            ))
            .into());
        }

        let schema = self.graph.schema_of(id).ok_or_else(|| {
            InvalidSchema::new(format!("unknown type id for '{}'", self.graph.type_name(id)))
        })?;
        let decl = schema
            .complex_types
            .get(self.graph.local_name(id))
            .ok_or_else(|| {
                InvalidSchema::new(format!(
                    "'{}' is not a complex type, nothing to compile",
                    self.graph.type_name(id)
                ))
            })?;
        let decl = Arc::clone(decl);

        self.in_flight.borrow_mut().insert(id);
        let built = self.build_plan(Some(id), &decl, schema);
        self.in_flight.borrow_mut().remove(&id);

        let plan = Arc::new(built?);
        self.plans
            .borrow_mut()
            .insert(id, Arc::clone(&plan));
        Ok(plan)
    }

    /// Compile the complex type a reference points at
    pub fn compile_ref(&self, reference: &QName, from: &Schema) -> Result<Arc<CompiledPlan>> {
        match self.graph.resolve_type(reference, from)? {
            ResolvedType::Complex(id, _) => self.compile(id),
            ResolvedType::Builtin(_) | ResolvedType::Simple(_, _) => {
                Err(InvalidSchema::new(format!(
                    "'{}' is not a complex type, nothing to compile",
                    reference
                ))
                .into())
            }
        }
    }

    /// Look up the finished plan behind a `PlanRef`
    ///
    /// Named references resolve against the memo table; None means the plan
    /// has not been compiled through this compiler.
    pub fn plan_of(&self, reference: &PlanRef) -> Option<Arc<CompiledPlan>> {
        match reference {
            PlanRef::Named { id, .. } => self.plans.borrow().get(id).map(Arc::clone),
            PlanRef::Inline(plan) => Some(Arc::clone(plan)),
        }
    }

    fn plan_ref_named(&self, id: TypeId) -> Result<PlanRef> {
        let compiled = self.plans.borrow().contains_key(&id);
        if !compiled && !self.in_flight.borrow().contains(&id) {
            self.compile(id)?;
        }
        Ok(PlanRef::Named {
            id,
            name: self.graph.type_name(id),
        })
    }

    fn compile_base(&self, id: TypeId) -> Result<Arc<CompiledPlan>> {
        if self.in_flight.borrow().contains(&id) {
            return Err(InvalidSchema::new(format!(
                "circular type derivation through '{}'",
                self.graph.type_name(id)
            ))
            .into());
        }
        self.compile(id)
    }

    fn build_plan(
        &self,
        id: Option<TypeId>,
        decl: &StructuralType,
        schema: &Schema,
    ) -> Result<CompiledPlan> {
        let name = id.map(|id| self.graph.type_name(id));
        let mut attributes = Vec::new();
        let mut properties = Vec::new();
        let mut any_attribute = decl.any_attribute;
        let mut groups_on_path = HashSet::new();

        match &decl.content {
            Content::Empty => {}
            Content::Simple(def) => {
                let value = match self.graph.resolve_type(&def.base, schema)? {
                    ResolvedType::Builtin(builtin) => ValueType::Builtin(builtin),
                    ResolvedType::Simple(base_id, _) => {
                        ValueType::Declared(self.graph.type_name(base_id))
                    }
                    ResolvedType::Complex(base_id, _) => {
                        // derivation over a complex base with simple content:
                        // its attributes splice in ahead of our own
                        let base_plan = self.compile_base(base_id)?;
                        attributes.extend(base_plan.attributes.iter().cloned());
                        any_attribute |= base_plan.any_attribute;
                        match base_plan.property("content").map(|p| &p.value) {
                            Some(PropertyValue::Simple(value)) => value.clone(),
                            _ => {
                                return Err(InvalidSchema::new(format!(
                                    "simpleContent base '{}' has no simple content",
                                    def.base
                                ))
                                .into())
                            }
                        }
                    }
                };
                properties.push(ParticleProperty {
                    name: "content".to_string(),
                    tag: String::new(),
                    kind: PropertyKind::Singular { nullable: false },
                    value: PropertyValue::Simple(value),
                });
                self.flatten_attributes(
                    &def.attributes,
                    &def.attribute_group_refs,
                    schema,
                    &mut attributes,
                )?;
            }
            Content::Complex(def) => {
                let base_plan = match self.graph.resolve_type(&def.base, schema)? {
                    ResolvedType::Complex(base_id, _) => self.compile_base(base_id)?,
                    _ => {
                        return Err(InvalidSchema::new(format!(
                            "complexContent base '{}' must be a complex type",
                            def.base
                        ))
                        .into())
                    }
                };
                attributes.extend(base_plan.attributes.iter().cloned());
                any_attribute |= base_plan.any_attribute | def.any_attribute;

                match def.method {
                    DerivationMethod::Extension => {
                        properties.extend(base_plan.properties.iter().cloned());
                        if let Some(particle) = &def.particle {
                            self.walk_top(
                                particle,
                                schema,
                                ParticleContext::default(),
                                &mut properties,
                                &mut groups_on_path,
                            )?;
                        }
                    }
                    DerivationMethod::Restriction => {
                        // a restriction redeclares its content model; the
                        // base's particles carry over only when it declares
                        // none of its own
                        if let Some(particle) = &def.particle {
                            self.walk_top(
                                particle,
                                schema,
                                ParticleContext::default(),
                                &mut properties,
                                &mut groups_on_path,
                            )?;
                        } else {
                            properties.extend(base_plan.properties.iter().cloned());
                        }
                    }
                }
                self.flatten_attributes(
                    &def.attributes,
                    &def.attribute_group_refs,
                    schema,
                    &mut attributes,
                )?;
            }
            Content::ElementOnly(particle) => {
                self.walk_top(
                    particle,
                    schema,
                    ParticleContext::default(),
                    &mut properties,
                    &mut groups_on_path,
                )?;
            }
        }

        self.flatten_attributes(
            &decl.attributes,
            &decl.attribute_group_refs,
            schema,
            &mut attributes,
        )?;

        let obligations = build_obligations(&properties);
        let self_closing = properties.is_empty();
        let steps = build_steps(&attributes, &properties, self_closing);

        Ok(CompiledPlan {
            name,
            attributes,
            properties,
            obligations,
            steps,
            self_closing,
            mixed: decl.mixed,
            any_attribute,
        })
    }

    fn flatten_attributes(
        &self,
        attrs: &[AttributeDecl],
        group_refs: &[QName],
        schema: &Schema,
        out: &mut Vec<AttributeProperty>,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        self.flatten_attributes_inner(attrs, group_refs, schema, out, &mut seen)
    }

    fn flatten_attributes_inner(
        &self,
        attrs: &[AttributeDecl],
        group_refs: &[QName],
        schema: &Schema,
        out: &mut Vec<AttributeProperty>,
        seen: &mut HashSet<String>,
    ) -> Result<()> {
        for site in attrs {
            let resolved = self.graph.resolve_attribute_site(site, schema)?;
            if resolved.use_constraint == AttributeUse::Prohibited {
                continue;
            }
            let name = resolved.name.clone().ok_or_else(|| {
                InvalidSchema::new("attribute declaration carries neither name nor ref")
            })?;
            let value = match (&resolved.type_ref, &resolved.inline_type) {
                (Some(type_ref), _) => match self.graph.resolve_type(type_ref, schema)? {
                    ResolvedType::Builtin(builtin) => ValueType::Builtin(builtin),
                    ResolvedType::Simple(type_id, _) => {
                        ValueType::Declared(self.graph.type_name(type_id))
                    }
                    ResolvedType::Complex(_, _) => {
                        return Err(InvalidSchema::new(format!(
                            "attribute '{}' cannot have a complex type",
                            name
                        ))
                        .into())
                    }
                },
                (None, Some(_)) => ValueType::Anonymous,
                (None, None) => ValueType::Builtin("string".to_string()),
            };
            out.push(AttributeProperty {
                name,
                required: resolved.is_required(),
                default: resolved.default.clone(),
                fixed: resolved.fixed.clone(),
                value,
            });
        }

        for group_ref in group_refs {
            if !seen.insert(group_ref.to_string()) {
                continue;
            }
            let group = self.graph.resolve_attribute_group(group_ref, schema)?;
            self.flatten_attributes_inner(
                &group.attributes,
                &group.group_refs,
                schema,
                out,
                seen,
            )?;
        }
        Ok(())
    }

    /// Walk a type's top-level particle into properties
    ///
    /// A single-occurrence sequence or all group at the top is the usual
    /// content wrapper; its children become the type's own members. Every
    /// other shape is a member in its own right.
    fn walk_top(
        &self,
        particle: &Particle,
        schema: &Schema,
        ctx: ParticleContext,
        properties: &mut Vec<ParticleProperty>,
        groups_on_path: &mut HashSet<String>,
    ) -> Result<()> {
        match particle {
            Particle::Sequence { occurs, children } | Particle::All { occurs, children } => {
                let ctx = ctx.entering(*occurs);
                for child in children {
                    self.walk_member(child, schema, ctx, properties, groups_on_path)?;
                }
                Ok(())
            }
            other => self.walk_member(other, schema, ctx, properties, groups_on_path),
        }
    }

    fn walk_member(
        &self,
        particle: &Particle,
        schema: &Schema,
        ctx: ParticleContext,
        properties: &mut Vec<ParticleProperty>,
        groups_on_path: &mut HashSet<String>,
    ) -> Result<()> {
        match particle {
            Particle::Element(site) => {
                let resolved = self.graph.resolve_element_site(site, schema)?;
                let property = self.element_property(&resolved, schema, ctx)?;
                properties.push(property);
                Ok(())
            }
            Particle::Choice { occurs, children } => {
                let mut entries = Vec::new();
                self.collect_entries(
                    children,
                    schema,
                    ctx.entering(*occurs),
                    false,
                    &mut entries,
                    groups_on_path,
                )?;
                properties.push(ParticleProperty {
                    name: unique_name(properties, "choice"),
                    tag: String::new(),
                    kind: PropertyKind::Container,
                    value: PropertyValue::Container(ContainerPlan {
                        kind: ContainerKind::Choice,
                        min: occurs.min,
                        max: occurs.max,
                        entries,
                    }),
                });
                Ok(())
            }
            Particle::Sequence { occurs, children } | Particle::All { occurs, children } => {
                let mut entries = Vec::new();
                self.collect_entries(
                    children,
                    schema,
                    ctx.entering(*occurs),
                    occurs.min > 0,
                    &mut entries,
                    groups_on_path,
                )?;
                properties.push(ParticleProperty {
                    name: unique_name(properties, "sequence"),
                    tag: String::new(),
                    kind: PropertyKind::Container,
                    value: PropertyValue::Container(ContainerPlan {
                        kind: ContainerKind::Sequence,
                        min: occurs.min,
                        max: occurs.max,
                        entries,
                    }),
                });
                Ok(())
            }
            Particle::GroupRef { occurs, reference } => {
                if !groups_on_path.insert(reference.to_string()) {
                    return Err(InvalidSchema::new(format!(
                        "model group cycle through '{}'",
                        reference
                    ))
                    .into());
                }
                let group = self.graph.resolve_group(reference, schema)?;
                let (kind, children) = match &group.particle {
                    Particle::Choice { children, .. } => (ContainerKind::Choice, children),
                    Particle::Sequence { children, .. } | Particle::All { children, .. } => {
                        (ContainerKind::Sequence, children)
                    }
                    other => {
                        return Err(InvalidSchema::new(format!(
                            "group '{}' wraps a {}, expected a compositor",
                            reference,
                            other.kind()
                        ))
                        .into())
                    }
                };
                let mut entries = Vec::new();
                self.collect_entries(
                    children,
                    schema,
                    ctx.entering(*occurs),
                    kind == ContainerKind::Sequence && occurs.min > 0,
                    &mut entries,
                    groups_on_path,
                )?;
                groups_on_path.remove(&reference.to_string());

                properties.push(ParticleProperty {
                    name: unique_name(properties, &camel(&reference.local)),
                    tag: String::new(),
                    kind: PropertyKind::Container,
                    value: PropertyValue::Container(ContainerPlan {
                        kind,
                        min: occurs.min,
                        max: occurs.max,
                        entries,
                    }),
                });
                Ok(())
            }
            Particle::Any { occurs } => {
                properties.push(ParticleProperty {
                    name: unique_name(properties, "any"),
                    tag: String::new(),
                    kind: PropertyKind::Container,
                    value: PropertyValue::Container(ContainerPlan {
                        kind: ContainerKind::Any,
                        min: occurs.min,
                        max: occurs.max,
                        entries: Vec::new(),
                    }),
                });
                Ok(())
            }
        }
    }

    /// Fold a compositor subtree into a container's flat entry list
    ///
    /// Choice members are individually optional; sequence members keep
    /// their required flag only while every enclosing compositor demands
    /// presence.
    fn collect_entries(
        &self,
        children: &[Particle],
        schema: &Schema,
        ctx: ParticleContext,
        required: bool,
        entries: &mut Vec<ContainerEntry>,
        groups_on_path: &mut HashSet<String>,
    ) -> Result<()> {
        for child in children {
            match child {
                Particle::Element(site) => {
                    let resolved = self.graph.resolve_element_site(site, schema)?;
                    let tag = resolved.name.clone().ok_or_else(|| {
                        InvalidSchema::new("element particle resolved without a name")
                    })?;
                    entries.push(ContainerEntry {
                        tag,
                        multiple: resolved.occurs.is_multiple() || ctx.in_collection,
                        required: required && !resolved.occurs.is_emptiable(),
                        value: self.element_value(&resolved, schema)?,
                    });
                }
                Particle::Choice { occurs, children } => {
                    self.collect_entries(
                        children,
                        schema,
                        ctx.entering(*occurs),
                        false,
                        entries,
                        groups_on_path,
                    )?;
                }
                Particle::Sequence { occurs, children } | Particle::All { occurs, children } => {
                    self.collect_entries(
                        children,
                        schema,
                        ctx.entering(*occurs),
                        required && occurs.min > 0,
                        entries,
                        groups_on_path,
                    )?;
                }
                Particle::GroupRef { occurs, reference } => {
                    if !groups_on_path.insert(reference.to_string()) {
                        return Err(InvalidSchema::new(format!(
                            "model group cycle through '{}'",
                            reference
                        ))
                        .into());
                    }
                    let group = self.graph.resolve_group(reference, schema)?;
                    self.collect_entries(
                        std::slice::from_ref(&group.particle),
                        schema,
                        ctx.entering(*occurs),
                        required && occurs.min > 0,
                        entries,
                        groups_on_path,
                    )?;
                    groups_on_path.remove(&reference.to_string());
                }
                Particle::Any { .. } => {
                    // wildcards have no nameable entry; the container's own
                    // bounds still apply
                }
            }
        }
        Ok(())
    }

    fn element_property(
        &self,
        resolved: &ElementDecl,
        schema: &Schema,
        ctx: ParticleContext,
    ) -> Result<ParticleProperty> {
        let tag = resolved
            .name
            .clone()
            .ok_or_else(|| InvalidSchema::new("element particle resolved without a name"))?;
        let value = self.element_value(resolved, schema)?;

        if resolved.occurs.is_multiple() || ctx.in_collection {
            Ok(ParticleProperty {
                name: pluralize(&tag),
                tag,
                kind: PropertyKind::Collection {
                    min: resolved.occurs.min,
                    max: resolved.occurs.max,
                },
                value,
            })
        } else {
            Ok(ParticleProperty {
                name: tag.clone(),
                tag,
                kind: PropertyKind::Singular {
                    nullable: resolved.occurs.is_emptiable(),
                },
                value,
            })
        }
    }

    fn element_value(&self, resolved: &ElementDecl, schema: &Schema) -> Result<PropertyValue> {
        if let Some(inline) = &resolved.inline_complex {
            let plan = self.build_plan(None, inline, schema)?;
            return Ok(PropertyValue::Complex(PlanRef::Inline(Arc::new(plan))));
        }
        if resolved.inline_simple.is_some() {
            return Ok(PropertyValue::Simple(ValueType::Anonymous));
        }
        match &resolved.type_ref {
            Some(type_ref) => match self.graph.resolve_type(type_ref, schema)? {
                ResolvedType::Builtin(builtin) => {
                    Ok(PropertyValue::Simple(ValueType::Builtin(builtin)))
                }
                ResolvedType::Simple(type_id, _) => Ok(PropertyValue::Simple(
                    ValueType::Declared(self.graph.type_name(type_id)),
                )),
                ResolvedType::Complex(type_id, _) => {
                    Ok(PropertyValue::Complex(self.plan_ref_named(type_id)?))
                }
            },
            None => Ok(PropertyValue::Simple(ValueType::Builtin(
                "anyType".to_string(),
            ))),
        }
    }
}

fn build_obligations(properties: &[ParticleProperty]) -> Vec<ValidationObligation> {
    let mut obligations = Vec::new();
    for property in properties {
        match (&property.kind, &property.value) {
            (PropertyKind::Collection { min, max }, _) => {
                obligations.push(ValidationObligation::CountInBounds {
                    property: property.name.clone(),
                    min: *min,
                    max: *max,
                });
            }
            (PropertyKind::Container, PropertyValue::Container(container)) => {
                match container.kind {
                    ContainerKind::Choice => {
                        obligations.push(ValidationObligation::ExclusiveChoice {
                            property: property.name.clone(),
                            required: container.min > 0,
                        });
                    }
                    ContainerKind::Any => {
                        obligations.push(ValidationObligation::CountInBounds {
                            property: property.name.clone(),
                            min: container.min,
                            max: container.max,
                        });
                    }
                    ContainerKind::Sequence => {
                        // the sequence container validates its own slots
                    }
                }
            }
            _ => {}
        }
    }
    obligations
}

/// Assemble the serialization recipe for a plan
///
/// Attributes come first in declared order, optional ones guarded on
/// presence; particle steps follow in schema order. A `WriteProperty` step
/// with an empty tag writes character data without a wrapper (simple
/// content).
fn build_steps(
    attributes: &[AttributeProperty],
    properties: &[ParticleProperty],
    self_closing: bool,
) -> Vec<SerializationStep> {
    let mut steps = vec![SerializationStep::WriteLiteral(vec![
        TagPiece::Raw("<".to_string()),
        TagPiece::Tag,
    ])];

    for attribute in attributes {
        steps.push(SerializationStep::WriteAttribute {
            name: attribute.name.clone(),
            property: attribute.name.clone(),
            required: attribute.required,
        });
    }

    if self_closing {
        steps.push(SerializationStep::WriteLiteral(vec![TagPiece::Raw(
            "/>".to_string(),
        )]));
        return steps;
    }
    steps.push(SerializationStep::WriteLiteral(vec![TagPiece::Raw(
        ">".to_string(),
    )]));

    for property in properties {
        match &property.kind {
            PropertyKind::Singular { nullable } => {
                steps.push(SerializationStep::WriteProperty {
                    property: property.name.clone(),
                    tag: property.tag.clone(),
                    guarded: *nullable,
                });
            }
            PropertyKind::Collection { .. } => {
                steps.push(SerializationStep::IterateCollection {
                    property: property.name.clone(),
                    tag: property.tag.clone(),
                });
            }
            PropertyKind::Container => {
                steps.push(SerializationStep::DelegateContainer {
                    property: property.name.clone(),
                });
            }
        }
    }

    steps.push(SerializationStep::WriteLiteral(vec![
        TagPiece::Raw("</".to_string()),
        TagPiece::Tag,
        TagPiece::Raw(">".to_string()),
    ]));
    steps
}

/// English-ish plural for collection property names
fn pluralize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix('y') {
        if stem
            .chars()
            .last()
            .map_or(false, |c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        {
            return format!("{}ies", stem);
        }
    }
    if name.ends_with('s')
        || name.ends_with('x')
        || name.ends_with('z')
        || name.ends_with("ch")
        || name.ends_with("sh")
    {
        return format!("{}es", name);
    }
    format!("{}s", name)
}

fn camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn unique_name(properties: &[ParticleProperty], base: &str) -> String {
    if !properties.iter().any(|p| p.name == base) {
        return base.to_string();
    }
    let mut index = 2;
    loop {
        let candidate = format!("{}{}", base, index);
        if !properties.iter().any(|p| p.name == candidate) {
            return candidate;
        }
        index += 1;
    }
}
