//! schema type graph
//!
//! parses sdl with `graphql-parser` and flattens it into an owned, read-only
//! lookup of named types, their fields, and field arguments. the graph is
//! built once per run and never mutated afterwards.

use crate::error::{Error, Result};
use graphql_parser::schema::{
    parse_schema, Definition, Directive, Document, Field, Type, TypeDefinition, TypeExtension,
    Value,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// root operation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// all kinds, in output order
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Query,
        OperationKind::Mutation,
        OperationKind::Subscription,
    ];

    /// operation keyword used in documents
    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
            OperationKind::Subscription => "subscription",
        }
    }

    /// output directory name for documents of this kind
    pub fn directory(self) -> &'static str {
        match self {
            OperationKind::Query => "queries",
            OperationKind::Mutation => "mutations",
            OperationKind::Subscription => "subscriptions",
        }
    }

    /// root type name used when the schema has no `schema { ... }` definition
    fn conventional_root(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// declared type of a field or argument, wrappers preserved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// underlying named type with list and non-null wrappers stripped
    pub fn named(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named(),
        }
    }

    fn from_ast(ty: &Type<'_, String>) -> Self {
        match ty {
            Type::NamedType(name) => TypeRef::Named(name.clone()),
            Type::ListType(inner) => TypeRef::List(Box::new(Self::from_ast(inner))),
            Type::NonNullType(inner) => TypeRef::NonNull(Box::new(Self::from_ast(inner))),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// field argument as declared in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub ty: TypeRef,
}

impl ArgumentDefinition {
    /// canonical type text, e.g. `[ID!]!`
    pub fn type_text(&self) -> String {
        self.ty.to_string()
    }
}

/// field of an object or interface type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: String,
    pub ty: TypeRef,
    pub arguments: Vec<ArgumentDefinition>,
    /// `@deprecated` reason, if the field is deprecated
    pub deprecation: Option<String>,
}

impl FieldDefinition {
    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    fn from_ast(field: &Field<'_, String>) -> Self {
        Self {
            name: field.name.clone(),
            ty: TypeRef::from_ast(&field.field_type),
            arguments: field
                .arguments
                .iter()
                .map(|arg| ArgumentDefinition {
                    name: arg.name.clone(),
                    ty: TypeRef::from_ast(&arg.value_type),
                })
                .collect(),
            deprecation: deprecation_reason(&field.directives),
        }
    }
}

/// kind of a named type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeKind::Scalar => "scalar",
            TypeKind::Object => "object",
            TypeKind::Interface => "interface",
            TypeKind::Union => "union",
            TypeKind::Enum => "enum",
            TypeKind::InputObject => "input object",
        })
    }
}

/// named type definition, extensions merged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    pub name: String,
    pub kind: TypeKind,
    /// selectable fields (objects and interfaces only)
    pub fields: Vec<FieldDefinition>,
    /// possible types (unions only)
    pub members: Vec<String>,
}

impl NamedType {
    fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            fields: Vec::new(),
            members: Vec::new(),
        }
    }

    fn from_ast(ty: &TypeDefinition<'_, String>) -> Self {
        match ty {
            TypeDefinition::Scalar(scalar) => Self::new(&scalar.name, TypeKind::Scalar),
            TypeDefinition::Object(obj) => Self {
                fields: obj.fields.iter().map(FieldDefinition::from_ast).collect(),
                ..Self::new(&obj.name, TypeKind::Object)
            },
            TypeDefinition::Interface(iface) => Self {
                fields: iface.fields.iter().map(FieldDefinition::from_ast).collect(),
                ..Self::new(&iface.name, TypeKind::Interface)
            },
            TypeDefinition::Union(union_ty) => Self {
                members: union_ty.types.clone(),
                ..Self::new(&union_ty.name, TypeKind::Union)
            },
            TypeDefinition::Enum(enum_ty) => Self::new(&enum_ty.name, TypeKind::Enum),
            TypeDefinition::InputObject(input) => Self::new(&input.name, TypeKind::InputObject),
        }
    }
}

/// how a named type is walked during synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'g> {
    /// object or interface with sub-fields
    Composite(&'g [FieldDefinition]),
    /// union with possible member types
    Union(&'g [String]),
    /// scalar, enum, or anything unresolvable
    Leaf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RootTypes {
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl RootTypes {
    fn get(&self, kind: OperationKind) -> Option<&str> {
        match kind {
            OperationKind::Query => self.query.as_deref(),
            OperationKind::Mutation => self.mutation.as_deref(),
            OperationKind::Subscription => self.subscription.as_deref(),
        }
    }

    fn conventional(types: &IndexMap<String, NamedType>) -> Self {
        let slot = |kind: OperationKind| {
            let name = kind.conventional_root();
            types.contains_key(name).then(|| name.to_string())
        };
        Self {
            query: slot(OperationKind::Query),
            mutation: slot(OperationKind::Mutation),
            subscription: slot(OperationKind::Subscription),
        }
    }
}

/// immutable lookup over a parsed schema
#[derive(Debug, Clone)]
pub struct TypeGraph {
    types: IndexMap<String, NamedType>,
    roots: RootTypes,
}

impl TypeGraph {
    /// parse and validate sdl text
    pub fn parse(sdl: &str) -> Result<Self> {
        Self::build(sdl, false)
    }

    /// parse sdl text, validating it unless `assume_valid` is set
    ///
    /// with `assume_valid`, unresolvable named types are walked as leaves and
    /// duplicate definitions keep the first one.
    pub fn build(sdl: &str, assume_valid: bool) -> Result<Self> {
        let document = parse_schema::<String>(sdl).map_err(|err| Error::Parse(err.to_string()))?;
        let (graph, mut problems) = Self::from_document(&document);
        if assume_valid {
            return Ok(graph);
        }

        problems.extend(graph.problems());
        if problems.is_empty() {
            Ok(graph)
        } else {
            Err(Error::Validation(problems))
        }
    }

    fn from_document(document: &Document<'_, String>) -> (Self, Vec<String>) {
        let mut problems = Vec::new();
        let mut types: IndexMap<String, NamedType> = IndexMap::new();
        let mut roots = None;

        for def in &document.definitions {
            match def {
                Definition::SchemaDefinition(schema) => {
                    if roots.is_some() {
                        problems.push("schema definition declared more than once".to_string());
                        continue;
                    }
                    roots = Some(RootTypes {
                        query: schema.query.clone(),
                        mutation: schema.mutation.clone(),
                        subscription: schema.subscription.clone(),
                    });
                }
                Definition::TypeDefinition(ty) => {
                    let named = NamedType::from_ast(ty);
                    if types.contains_key(&named.name) {
                        problems.push(format!("type {} is defined more than once", named.name));
                        continue;
                    }
                    types.insert(named.name.clone(), named);
                }
                Definition::TypeExtension(_) | Definition::DirectiveDefinition(_) => {}
            }
        }

        // extensions may precede their base definition
        for def in &document.definitions {
            if let Definition::TypeExtension(ext) = def {
                if let Err(problem) = apply_extension(&mut types, ext) {
                    problems.push(problem);
                }
            }
        }

        let roots = roots.unwrap_or_else(|| RootTypes::conventional(&types));
        (Self { types, roots }, problems)
    }

    /// named type by name
    pub fn get(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    /// all defined types, in declaration order
    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    /// field of an object or interface type
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&FieldDefinition> {
        self.get(type_name)?
            .fields
            .iter()
            .find(|field| field.name == field_name)
    }

    /// name of the designated root type for an operation kind
    pub fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        self.roots.get(kind)
    }

    /// kind of a named type; builtin scalars need no definition
    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        if let Some(ty) = self.types.get(name) {
            return Some(ty.kind);
        }
        BUILTIN_SCALARS.contains(&name).then_some(TypeKind::Scalar)
    }

    /// how synthesis treats a named type
    pub fn shape(&self, name: &str) -> Shape<'_> {
        match self.types.get(name) {
            Some(ty) if matches!(ty.kind, TypeKind::Object | TypeKind::Interface) => {
                Shape::Composite(&ty.fields)
            }
            Some(ty) if ty.kind == TypeKind::Union => Shape::Union(&ty.members),
            _ => Shape::Leaf,
        }
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for ty in self.types.values() {
            for field in &ty.fields {
                let target = field.ty.named();
                match self.kind_of(target) {
                    None => problems.push(format!(
                        "field {}.{} has unknown type {target}",
                        ty.name, field.name
                    )),
                    Some(TypeKind::InputObject) => problems.push(format!(
                        "field {}.{} returns input object {target}",
                        ty.name, field.name
                    )),
                    Some(_) => {}
                }

                for arg in &field.arguments {
                    let arg_type = arg.ty.named();
                    match self.kind_of(arg_type) {
                        None => problems.push(format!(
                            "argument {}.{}({}) has unknown type {arg_type}",
                            ty.name, field.name, arg.name
                        )),
                        Some(TypeKind::Scalar | TypeKind::Enum | TypeKind::InputObject) => {}
                        Some(kind) => problems.push(format!(
                            "argument {}.{}({}) has non-input type {arg_type} ({kind})",
                            ty.name, field.name, arg.name
                        )),
                    }
                }
            }

            for member in &ty.members {
                if self.kind_of(member) != Some(TypeKind::Object) {
                    problems.push(format!(
                        "union {} member {member} is not an object type",
                        ty.name
                    ));
                }
            }
        }

        for kind in OperationKind::ALL {
            let Some(name) = self.roots.get(kind) else {
                continue;
            };
            match self.kind_of(name) {
                Some(TypeKind::Object) => {}
                None => problems.push(format!("{kind} root type {name} is not defined")),
                Some(other) => problems.push(format!(
                    "{kind} root type {name} must be an object type, found {other}"
                )),
            }
        }

        problems
    }
}

fn apply_extension(
    types: &mut IndexMap<String, NamedType>,
    ext: &TypeExtension<'_, String>,
) -> std::result::Result<(), String> {
    match ext {
        TypeExtension::Object(obj) => {
            let target = extension_target(types, &obj.name, TypeKind::Object)?;
            target
                .fields
                .extend(obj.fields.iter().map(FieldDefinition::from_ast));
        }
        TypeExtension::Interface(iface) => {
            let target = extension_target(types, &iface.name, TypeKind::Interface)?;
            target
                .fields
                .extend(iface.fields.iter().map(FieldDefinition::from_ast));
        }
        TypeExtension::Union(union_ty) => {
            let target = extension_target(types, &union_ty.name, TypeKind::Union)?;
            target.members.extend(union_ty.types.iter().cloned());
        }
        TypeExtension::Scalar(scalar) => {
            extension_target(types, &scalar.name, TypeKind::Scalar)?;
        }
        TypeExtension::Enum(enum_ty) => {
            extension_target(types, &enum_ty.name, TypeKind::Enum)?;
        }
        TypeExtension::InputObject(input) => {
            extension_target(types, &input.name, TypeKind::InputObject)?;
        }
    }
    Ok(())
}

fn extension_target<'t>(
    types: &'t mut IndexMap<String, NamedType>,
    name: &str,
    kind: TypeKind,
) -> std::result::Result<&'t mut NamedType, String> {
    match types.get_mut(name) {
        Some(target) if target.kind == kind => Ok(target),
        Some(target) => Err(format!(
            "cannot extend {} {name} as {kind}",
            target.kind
        )),
        None => Err(format!("extension of undefined type {name}")),
    }
}

fn deprecation_reason(directives: &[Directive<'_, String>]) -> Option<String> {
    let directive = directives.iter().find(|d| d.name == "deprecated")?;
    let reason = directive
        .arguments
        .iter()
        .find_map(|(name, value)| match value {
            Value::String(reason) if name == "reason" => Some(reason.clone()),
            _ => None,
        });
    Some(reason.unwrap_or_else(|| DEFAULT_DEPRECATION_REASON.to_string()))
}
