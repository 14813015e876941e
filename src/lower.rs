//! Lower a [`SchemaNode`] tree into named type definitions.
//!
//! One walk serves every target; the [`Language`] only spells things.
//! All state for a run lives in [`Collector`], so each run starts clean.
use std::borrow::Cow;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::codegen::{FALLBACK_TYPE_NAME, Language, enum_variant_ident, escape_reserved};
use crate::error::ResolveError;
use crate::ir::{Collected, EnumDef, EnumVariant, Field, Primitive, StructDef};
use crate::resolver::{Resolver, decode_segment};
use crate::schema::{Items, SchemaNode, SchemaType};

/// Reference under which the document root is registered.
const ROOT_REF: &str = "#";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Identity of a schema node: its address. Every node walked in a run is
/// either part of the root document or held in [`Collector::promoted`], so
/// addresses stay unique for the collector's lifetime.
type NodeId = *const SchemaNode;

pub struct Collector<'a, L> {
    lang: &'a L,
    resolver: Resolver<'a>,
    /// Every type name handed out so far (structs and enums).
    names: IndexSet<String>,
    /// Schema node → type expression already produced for it.
    nodes: IndexMap<NodeId, String>,
    /// `$ref` string → type expression; shortcut that also covers nodes
    /// promoted from raw JSON, which get a fresh address per resolution.
    refs: IndexMap<String, String>,
    /// References currently being followed (guards pure `$ref` chains).
    following: Vec<(NodeId, String)>,
    /// Struct names whose properties are being walked.
    collecting: Vec<String>,
    /// Owned nodes produced by resolution, kept alive for the whole run.
    promoted: Vec<Rc<SchemaNode>>,
    structs: Vec<StructDef>,
    enums: Vec<EnumDef>,
}

/// Result of mapping one schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedType {
    /// Type expression without optional/indirection wrappers.
    pub ty: String,
    /// Refers to a struct that is still on the collecting stack.
    pub indirect: bool,
    /// Index into the collected enums when `ty` names one.
    pub enumeration: Option<usize>,
}

impl MappedType {
    fn plain(ty: String) -> Self {
        Self { ty, indirect: false, enumeration: None }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FRONT API
// ————————————————————————————————————————————————————————————————————————————

/// Collect every type reachable from `root`, root type last.
pub fn collect<L: Language>(root: &SchemaNode, lang: &L) -> Result<Collected, ResolveError> {
    let mut cx = Collector::new(root, lang);
    let name = cx.collect_type(root, FALLBACK_TYPE_NAME, Some(ROOT_REF))?;
    Ok(cx.into_collected(name))
}

impl<'a, L: Language> Collector<'a, L> {
    pub fn new(root: &'a SchemaNode, lang: &'a L) -> Self {
        Self {
            lang,
            resolver: Resolver::new(root),
            names: IndexSet::new(),
            nodes: IndexMap::new(),
            refs: IndexMap::new(),
            following: Vec::new(),
            collecting: Vec::new(),
            promoted: Vec::new(),
            structs: Vec::new(),
            enums: Vec::new(),
        }
    }

    pub fn into_collected(self, root: String) -> Collected {
        Collected { root, structs: self.structs, enums: self.enums }
    }

    /// Type expression for `node`; `context` names any type created for it
    /// when the node has no title of its own.
    pub fn map_type(&mut self, node: &'a SchemaNode, context: &str) -> Result<MappedType, ResolveError> {
        self.map_node(node, context, None)
    }

    /// Collect `node` as a struct and return its (unique) name.
    ///
    /// The name comes from the node's `title`, else from `context`. The node
    /// (and `reference`, when given) maps to the chosen name before any
    /// property is walked, so back-references find it.
    pub fn collect_type(
        &mut self,
        node: &'a SchemaNode,
        context: &str,
        reference: Option<&str>,
    ) -> Result<String, ResolveError> {
        self.collect_struct(node, context, reference)
    }

    // ------------------------------- Mapping ---------------------------------- //

    fn map_node(
        &mut self,
        node: &SchemaNode,
        context: &str,
        reference: Option<&str>,
    ) -> Result<MappedType, ResolveError> {
        if let Some(target) = &node.reference {
            return self.map_reference(target);
        }
        if node.has_enum() {
            return Ok(self.collect_enum(node, context));
        }

        let lang = self.lang;
        let mapped = match &node.ty {
            Some(SchemaType::String) => MappedType::plain(lang.primitive(Primitive::Text)),
            Some(SchemaType::Integer) => MappedType::plain(lang.primitive(Primitive::Integer)),
            Some(SchemaType::Number) => MappedType::plain(lang.primitive(Primitive::Number)),
            Some(SchemaType::Boolean) => MappedType::plain(lang.primitive(Primitive::Boolean)),
            Some(SchemaType::Array) => match &node.items {
                Some(Items::Single(item)) => {
                    let item_context = item
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("{context}Item"));
                    let inner = self.map_node(item, &item_context, None)?;
                    let inner_ty = if inner.indirect { lang.indirect(&inner.ty) } else { inner.ty };
                    MappedType::plain(lang.sequence(&inner_ty))
                }
                // tuple or missing items: untyped elements
                _ => MappedType::plain(lang.sequence(&lang.primitive(Primitive::Any))),
            },
            Some(SchemaType::Object) if node.has_properties() => {
                MappedType::plain(self.collect_struct(node, context, reference)?)
            }
            // definitions often leave out `"type": "object"`
            None if reference.is_some() && node.has_properties() => {
                MappedType::plain(self.collect_struct(node, context, reference)?)
            }
            Some(SchemaType::Object) => MappedType::plain(lang.primitive(Primitive::Map)),
            Some(SchemaType::Other(_)) | None => MappedType::plain(lang.primitive(Primitive::Any)),
        };
        Ok(mapped)
    }

    fn map_reference(&mut self, reference: &str) -> Result<MappedType, ResolveError> {
        if let Some(ty) = self.refs.get(reference).cloned() {
            tracing::trace!(reference, ty = %ty, "reference already collected");
            return Ok(self.known(ty));
        }

        let resolver = self.resolver;
        let promoted;
        let node: &SchemaNode = match resolver.resolve(reference)? {
            Cow::Borrowed(node) => node,
            Cow::Owned(node) => {
                promoted = Rc::new(node);
                self.promoted.push(Rc::clone(&promoted));
                &*promoted
            }
        };
        let id: NodeId = node;

        // same node under another spelling (`#/` vs `#`, `defs` vs `$defs`, ...)
        if let Some(ty) = self.nodes.get(&id).cloned() {
            tracing::trace!(reference, ty = %ty, "node already collected");
            self.refs.insert(reference.to_string(), ty.clone());
            return Ok(self.known(ty));
        }
        if self.following.iter().any(|(n, r)| *n == id || r == reference) {
            tracing::debug!(reference, "reference cycle without a type; mapping as untyped");
            return Ok(MappedType::plain(self.lang.primitive(Primitive::Any)));
        }

        let context = match &node.title {
            Some(title) => title.clone(),
            None => reference.rsplit('/').next().map(decode_segment).unwrap_or_default(),
        };

        self.following.push((id, reference.to_string()));
        let mapped = self.map_node(node, &context, Some(reference));
        self.following.pop();
        let mapped = mapped?;

        self.nodes.entry(id).or_insert_with(|| mapped.ty.clone());
        self.refs
            .entry(reference.to_string())
            .or_insert_with(|| mapped.ty.clone());
        Ok(mapped)
    }

    /// A type expression produced earlier; indirect while its struct is
    /// still being walked.
    fn known(&self, ty: String) -> MappedType {
        MappedType {
            indirect: self.collecting.iter().any(|n| *n == ty),
            enumeration: self.enums.iter().position(|e| e.name == ty),
            ty,
        }
    }

    // ------------------------------ Collecting -------------------------------- //

    fn collect_struct(
        &mut self,
        node: &SchemaNode,
        context: &str,
        reference: Option<&str>,
    ) -> Result<String, ResolveError> {
        let base = self.lang.type_name(node.title.as_deref().unwrap_or(context));
        let name = self.claim_name(&base);
        let id: NodeId = node;
        self.nodes.entry(id).or_insert_with(|| name.clone());
        if let Some(reference) = reference {
            self.refs.insert(reference.to_string(), name.clone());
        }

        self.collecting.push(name.clone());
        let mut fields: Vec<Field> = Vec::new();
        if let Some(properties) = &node.properties {
            for (prop_name, prop) in properties {
                let mut field = self.collect_field(node, prop_name, prop)?;
                field.ident = first_free(&field.ident, |s| fields.iter().any(|f| f.ident == s));
                fields.push(field);
            }
        }
        self.collecting.pop();

        tracing::debug!(name = %name, fields = fields.len(), "collected struct");
        self.structs.push(StructDef {
            name: name.clone(),
            description: node.description.clone(),
            fields,
        });
        Ok(name)
    }

    fn collect_field(
        &mut self,
        owner: &SchemaNode,
        prop_name: &str,
        prop: &SchemaNode,
    ) -> Result<Field, ResolveError> {
        let mapped = self.map_node(prop, prop_name, None)?;
        let required = owner.is_required(prop_name);
        let ty = if mapped.indirect {
            self.lang.indirect(&mapped.ty)
        } else if required {
            mapped.ty.clone()
        } else {
            self.lang.optional(&mapped.ty)
        };
        let default = match (&prop.default, mapped.indirect) {
            (Some(value), false) => self.default_literal(value, &mapped),
            _ => None,
        };
        Ok(Field {
            name: prop_name.to_string(),
            ident: self.lang.field_ident(prop_name),
            ty,
            required,
            indirect: mapped.indirect,
            default,
            description: prop.description.clone(),
        })
    }

    fn collect_enum(&mut self, node: &SchemaNode, context: &str) -> MappedType {
        let base = self.lang.type_name(context);
        let name = self.claim_name(&base);

        let mut variants: Vec<EnumVariant> = Vec::new();
        for value in node.enum_values.iter().flatten() {
            let ident = escape_reserved(enum_variant_ident(value), self.lang.reserved());
            let ident = first_free(&ident, |s| variants.iter().any(|v| v.ident == s));
            variants.push(EnumVariant { ident, value: value.clone() });
        }

        tracing::debug!(name = %name, variants = variants.len(), "collected enum");
        self.enums.push(EnumDef {
            name: name.clone(),
            description: node.description.clone(),
            variants,
        });
        MappedType {
            ty: name,
            indirect: false,
            enumeration: Some(self.enums.len() - 1),
        }
    }

    fn default_literal(&self, value: &Value, mapped: &MappedType) -> Option<String> {
        match mapped.enumeration.and_then(|i| self.enums.get(i)) {
            Some(def) => def
                .variants
                .iter()
                .find(|v| &v.value == value)
                .map(|v| self.lang.enum_member(&def.name, &v.ident)),
            None => self.lang.literal(value),
        }
    }

    fn claim_name(&mut self, base: &str) -> String {
        let name = first_free(base, |n| self.names.contains(n));
        self.names.insert(name.clone());
        name
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// `base`, or `base_1`, `base_2`, ... whichever is free first.
fn first_free(base: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = base.to_string();
    let mut counter = 1;
    while taken(&candidate) {
        candidate = format!("{base}_{counter}");
        counter += 1;
    }
    candidate
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Cpp, Python, TypeScript};
    use crate::parser::parse_schema_str;

    fn collect_cpp(src: &str) -> Collected {
        let schema = parse_schema_str(src).unwrap();
        collect(&schema, &Cpp).unwrap()
    }

    #[test]
    fn simple_primitives_collects_one_struct() {
        let c = collect_cpp(
            r#"{"title":"SimplePrimitives","type":"object","properties":{"count":{"type":"integer"}},"required":["count"]}"#,
        );
        assert_eq!(c.root, "SimplePrimitives");
        assert_eq!(c.structs.len(), 1);
        assert!(c.enums.is_empty());
        let s = &c.structs[0];
        assert_eq!(s.name, "SimplePrimitives");
        assert_eq!(s.fields.len(), 1);
        let count = &s.fields[0];
        assert_eq!(count.name, "count");
        assert_eq!(count.ty, "int64_t");
        assert!(count.required);
        assert!(!count.indirect);
    }

    #[test]
    fn required_vs_optional() {
        let c = collect_cpp(
            r#"{
                "title": "SimpleObject",
                "type": "object",
                "properties": {
                    "isAvailable": { "type": "boolean" },
                    "itemCount": { "type": "integer" },
                    "priceValue": { "type": "number", "default": 1.0 },
                    "itemName": { "type": "string" }
                },
                "required": ["isAvailable", "itemCount", "itemName"]
            }"#,
        );
        let s = c.find_struct("SimpleObject").unwrap();
        assert_eq!(s.field("isAvailable").unwrap().ty, "bool");
        assert_eq!(s.field("itemCount").unwrap().ty, "int64_t");
        assert_eq!(s.field("itemName").unwrap().ty, "std::string");
        let price = s.field("priceValue").unwrap();
        assert_eq!(price.ty, "std::optional<double>");
        assert!(!price.required);
        assert_eq!(price.default.as_deref(), Some("1.0"));
        assert_eq!(price.ident, "price_value");
    }

    #[test]
    fn naming_collision_gets_numeric_suffix() {
        let c = collect_cpp(
            r#"{
                "title": "ConflictObject",
                "type": "object",
                "properties": {
                    "part1": { "title": "SharedName", "type": "object", "properties": { "a": { "type": "string" } } },
                    "part2": { "title": "SharedName", "type": "object", "properties": { "b": { "type": "integer" } } }
                }
            }"#,
        );
        let names: Vec<_> = c.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["SharedName", "SharedName_1", "ConflictObject"]);

        let first = c.find_struct("SharedName").unwrap();
        assert!(first.field("a").is_some() && first.field("b").is_none());
        let second = c.find_struct("SharedName_1").unwrap();
        assert!(second.field("b").is_some() && second.field("a").is_none());

        let root = c.find_struct("ConflictObject").unwrap();
        assert_eq!(root.field("part1").unwrap().ty, "std::optional<SharedName>");
        assert_eq!(root.field("part2").unwrap().ty, "std::optional<SharedName_1>");
    }

    #[test]
    fn shared_reference_emits_once() {
        let c = collect_cpp(
            r##"{
                "title": "People",
                "type": "object",
                "properties": {
                    "home": { "$ref": "#/$defs/address" },
                    "work": { "$ref": "#/$defs/address" }
                },
                "required": ["home"],
                "$defs": {
                    "address": { "title": "Address", "type": "object", "properties": { "street": { "type": "string" } } }
                }
            }"##,
        );
        assert_eq!(c.structs.iter().filter(|s| s.name.starts_with("Address")).count(), 1);
        let root = c.find_struct("People").unwrap();
        assert_eq!(root.field("home").unwrap().ty, "Address");
        assert_eq!(root.field("work").unwrap().ty, "std::optional<Address>");
    }

    #[test]
    fn untitled_reference_named_after_pointer() {
        let c = collect_cpp(
            r##"{
                "title": "Holder",
                "type": "object",
                "properties": { "loc": { "$ref": "#/$defs/geoPoint" } },
                "$defs": { "geoPoint": { "type": "object", "properties": { "lat": { "type": "number" } } } }
            }"##,
        );
        assert!(c.find_struct("GeoPoint").is_some());
    }

    #[test]
    fn direct_recursion_uses_indirection_not_optional() {
        let c = collect_cpp(
            r##"{
                "title": "List",
                "type": "object",
                "properties": { "head": { "$ref": "#/$defs/node" } },
                "$defs": {
                    "node": {
                        "title": "Node",
                        "type": "object",
                        "properties": {
                            "value": { "type": "integer" },
                            "next": { "$ref": "#/$defs/node" }
                        },
                        "required": ["value"]
                    }
                }
            }"##,
        );
        let node = c.find_struct("Node").unwrap();
        let next = node.field("next").unwrap();
        assert!(next.indirect);
        assert!(!next.required);
        assert_eq!(next.ty, "std::shared_ptr<Node>");
        assert!(!next.ty.contains("optional"));
        // the outer use is not a back-reference
        let head = c.find_struct("List").unwrap().field("head").unwrap();
        assert!(!head.indirect);
        assert_eq!(head.ty, "std::optional<Node>");
    }

    #[test]
    fn required_back_reference_is_still_indirect() {
        let c = collect_cpp(
            r##"{
                "title": "Tree",
                "type": "object",
                "properties": { "parent": { "$ref": "#" } },
                "required": ["parent"]
            }"##,
        );
        let parent = c.find_struct("Tree").unwrap().field("parent").unwrap();
        assert!(parent.indirect);
        assert!(parent.required);
        assert_eq!(parent.ty, "std::shared_ptr<Tree>");
        assert_eq!(c.structs.len(), 1);
    }

    #[test]
    fn transitive_recursion_terminates() {
        let c = collect_cpp(
            r##"{
                "title": "Doc",
                "type": "object",
                "properties": { "a": { "$ref": "#/$defs/a" } },
                "$defs": {
                    "a": { "title": "A", "type": "object", "properties": { "b": { "$ref": "#/$defs/b" } } },
                    "b": { "title": "B", "type": "object", "properties": { "a": { "$ref": "#/$defs/a" } } }
                }
            }"##,
        );
        let names: Vec<_> = c.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B", "A", "Doc"]);
        let back = c.find_struct("B").unwrap().field("a").unwrap();
        assert!(back.indirect);
        assert_eq!(back.ty, "std::shared_ptr<A>");
        let forward = c.find_struct("A").unwrap().field("b").unwrap();
        assert!(!forward.indirect);
        assert_eq!(forward.ty, "std::optional<B>");
    }

    #[test]
    fn recursive_array_items_are_wrapped_inside_the_sequence() {
        let c = collect_cpp(
            r##"{
                "title": "Tree",
                "type": "object",
                "properties": { "children": { "type": "array", "items": { "$ref": "#" } } }
            }"##,
        );
        let children = c.find_struct("Tree").unwrap().field("children").unwrap();
        assert!(!children.indirect);
        assert_eq!(children.ty, "std::optional<std::vector<std::shared_ptr<Tree>>>");
    }

    #[test]
    fn pure_reference_cycle_maps_to_untyped() {
        let c = collect_cpp(
            r##"{
                "title": "Loop",
                "type": "object",
                "properties": { "x": { "$ref": "#/$defs/a" } },
                "required": ["x"],
                "$defs": { "a": { "$ref": "#/$defs/b" }, "b": { "$ref": "#/$defs/a" } }
            }"##,
        );
        assert_eq!(c.find_struct("Loop").unwrap().field("x").unwrap().ty, "nlohmann::json");
    }

    #[test]
    fn enums_are_collected_and_named_after_context() {
        let c = collect_cpp(
            r#"{
                "title": "EnumObject",
                "type": "object",
                "properties": {
                    "status": { "type": "string", "enum": ["pending", "123abc", "in-progress"], "default": "pending" }
                },
                "required": ["status"]
            }"#,
        );
        assert_eq!(c.enums.len(), 1);
        let status = &c.enums[0];
        assert_eq!(status.name, "Status");
        let idents: Vec<_> = status.variants.iter().map(|v| v.ident.as_str()).collect();
        assert_eq!(idents, ["PENDING", "VALUE_123ABC", "IN_PROGRESS"]);
        let field = c.find_struct("EnumObject").unwrap().field("status").unwrap();
        assert_eq!(field.ty, "Status");
        assert_eq!(field.default.as_deref(), Some("Status::PENDING"));
    }

    #[test]
    fn referenced_enum_is_shared() {
        let c = collect_cpp(
            r##"{
                "title": "Order",
                "type": "object",
                "properties": {
                    "current": { "$ref": "#/$defs/state" },
                    "previous": { "$ref": "#/$defs/state" }
                },
                "$defs": { "state": { "type": "string", "enum": ["open", "closed"] } }
            }"##,
        );
        assert_eq!(c.enums.len(), 1);
        assert_eq!(c.enums[0].name, "State");
        let order = c.find_struct("Order").unwrap();
        assert_eq!(order.field("current").unwrap().ty, "std::optional<State>");
        assert_eq!(order.field("previous").unwrap().ty, "std::optional<State>");
    }

    #[test]
    fn duplicate_variant_identifiers_get_suffixes() {
        let c = collect_cpp(r#"{"title": "T", "type": "object", "properties": {"k": {"enum": ["a-b", "a_b"]}}}"#);
        let idents: Vec<_> = c.enums[0].variants.iter().map(|v| v.ident.as_str()).collect();
        assert_eq!(idents, ["A_B", "A_B_1"]);
    }

    #[test]
    fn arrays_and_untyped_fallbacks() {
        let c = collect_cpp(
            r#"{
                "title": "ArrayMessage",
                "type": "object",
                "properties": {
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "pairs": { "type": "array", "items": [{ "type": "string" }, { "type": "integer" }] },
                    "bare": { "type": "array" },
                    "points": { "type": "array", "items": { "type": "object", "properties": { "x": { "type": "number" } } } },
                    "bag": { "type": "object" },
                    "mixed": { "oneOf": [{ "type": "string" }, { "type": "integer" }] },
                    "nothing": { "type": "null" }
                },
                "required": ["tags", "pairs", "bare", "points", "bag", "mixed", "nothing"]
            }"#,
        );
        let s = c.find_struct("ArrayMessage").unwrap();
        assert_eq!(s.field("tags").unwrap().ty, "std::vector<std::string>");
        assert_eq!(s.field("pairs").unwrap().ty, "std::vector<nlohmann::json>");
        assert_eq!(s.field("bare").unwrap().ty, "std::vector<nlohmann::json>");
        assert_eq!(s.field("points").unwrap().ty, "std::vector<PointsItem>");
        assert!(c.find_struct("PointsItem").is_some());
        assert_eq!(s.field("bag").unwrap().ty, "nlohmann::json");
        assert_eq!(s.field("mixed").unwrap().ty, "nlohmann::json");
        assert_eq!(s.field("nothing").unwrap().ty, "nlohmann::json");
    }

    #[test]
    fn dependencies_precede_dependents() {
        let c = collect_cpp(
            r#"{
                "title": "RootObject",
                "type": "object",
                "properties": {
                    "child": { "type": "object", "title": "ChildObject", "properties": { "val": { "type": "integer" } } }
                }
            }"#,
        );
        let names: Vec<_> = c.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["ChildObject", "RootObject"]);
    }

    #[test]
    fn colliding_field_identifiers_are_disambiguated() {
        let c = collect_cpp(
            r#"{"title": "T", "type": "object", "properties": {"isOpen": {"type": "boolean"}, "is_open": {"type": "boolean"}}}"#,
        );
        let idents: Vec<_> = c.structs[0].fields.iter().map(|f| f.ident.as_str()).collect();
        assert_eq!(idents, ["is_open", "is_open_1"]);
    }

    #[test]
    fn same_walk_across_languages() {
        let src = r##"{
            "title": "Node",
            "type": "object",
            "properties": {
                "label": { "type": "string" },
                "next": { "$ref": "#" },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["label"]
        }"##;
        let schema = parse_schema_str(src).unwrap();

        let py = collect(&schema, &Python).unwrap();
        let s = py.find_struct("Node").unwrap();
        assert_eq!(s.field("label").unwrap().ty, "str");
        assert_eq!(s.field("next").unwrap().ty, "\"Node\"");
        assert_eq!(s.field("tags").unwrap().ty, "Optional[List[str]]");

        let ts = collect(&schema, &TypeScript).unwrap();
        let s = ts.find_struct("Node").unwrap();
        assert_eq!(s.field("label").unwrap().ty, "string");
        assert_eq!(s.field("next").unwrap().ty, "Node | null");
        assert_eq!(s.field("tags").unwrap().ty, "Array<string>");
    }

    #[test]
    fn fresh_collector_per_run() {
        let schema = parse_schema_str(r#"{"title": "Solo", "type": "object"}"#).unwrap();
        let a = collect(&schema, &Cpp).unwrap();
        let b = collect(&schema, &Cpp).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.root, "Solo");
    }

    #[test]
    fn public_contract_can_be_driven_directly() {
        let schema = parse_schema_str(
            r#"{"title": "Outer", "type": "object", "properties": {"inner": {"type": "object", "properties": {"n": {"type": "integer"}}}}}"#,
        )
        .unwrap();
        let mut cx = Collector::new(&schema, &Cpp);
        let inner = schema.property("inner").unwrap();
        let mapped = cx.map_type(inner, "inner").unwrap();
        assert_eq!(mapped, MappedType { ty: "Inner".into(), indirect: false, enumeration: None });
        // a second, unrelated collection under the same name is suffixed
        assert_eq!(cx.collect_type(inner, "inner", None).unwrap(), "Inner_1");
    }

    #[test]
    fn root_alias_is_the_same_type() {
        let c = collect_cpp(
            r##"{"title": "Tree", "type": "object", "properties": {"parent": {"$ref": "#/"}}}"##,
        );
        assert_eq!(c.structs.len(), 1);
        let parent = c.find_struct("Tree").unwrap().field("parent").unwrap();
        assert!(parent.indirect);
        assert_eq!(parent.ty, "std::shared_ptr<Tree>");
    }

    #[test]
    fn definition_spellings_share_one_type() {
        let c = collect_cpp(
            r##"{
                "title": "List",
                "type": "object",
                "properties": { "head": { "$ref": "#/$defs/node" } },
                "$defs": {
                    "node": {
                        "title": "Node",
                        "type": "object",
                        "properties": { "next": { "$ref": "#/defs/node" } }
                    }
                }
            }"##,
        );
        let names: Vec<_> = c.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Node", "List"]);
        let next = c.find_struct("Node").unwrap().field("next").unwrap();
        assert!(next.indirect);
        assert_eq!(next.ty, "std::shared_ptr<Node>");
    }

    #[test]
    fn reference_into_inline_properties() {
        let c = collect_cpp(
            r##"{
                "title": "Outer",
                "type": "object",
                "properties": {
                    "child": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "me": { "$ref": "#/properties/child" }
                        }
                    },
                    "again": { "$ref": "#/properties/child" }
                }
            }"##,
        );
        let names: Vec<_> = c.structs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Child", "Outer"]);
        let me = c.find_struct("Child").unwrap().field("me").unwrap();
        assert!(me.indirect);
        assert_eq!(me.ty, "std::shared_ptr<Child>");
        // finished by the time it is referenced again
        let again = c.find_struct("Outer").unwrap().field("again").unwrap();
        assert!(!again.indirect);
        assert_eq!(again.ty, "std::optional<Child>");
    }

    #[test]
    fn referenced_definition_without_type_is_a_struct() {
        let c = collect_cpp(
            r##"{
                "title": "Holder",
                "type": "object",
                "properties": {
                    "addr": { "$ref": "#/$defs/address" },
                    "loose": { "properties": { "x": { "type": "integer" } } }
                },
                "$defs": {
                    "address": { "title": "Address", "properties": { "street": { "type": "string" } } }
                }
            }"##,
        );
        let address = c.find_struct("Address").unwrap();
        assert_eq!(address.field("street").unwrap().ty, "std::optional<std::string>");
        let holder = c.find_struct("Holder").unwrap();
        assert_eq!(holder.field("addr").unwrap().ty, "std::optional<Address>");
        // inline nodes still need an explicit object type
        assert_eq!(holder.field("loose").unwrap().ty, "std::optional<nlohmann::json>");
    }
}
