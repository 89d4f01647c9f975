//! Pre-computed type shapes and the [`TypeCatalog`] abstraction.
//!
//! The introspector never looks at a live runtime. Instead every type it
//! may visit is described once by a [`TypeShape`]: its kind, supertypes,
//! members and metadata markers. A [`TypeCatalog`] answers lookups by
//! [`TypeName`]; [`InMemoryCatalog`] is the standard implementation and can
//! be loaded from a JSON document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::name::{TypeName, TypeRef};

/// Kind of a catalogued type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enumeration,
    /// An anonymous class; it has no name a companion class could use.
    Anonymous,
    /// A class declared inside a method body.
    Local,
}

impl TypeKind {
    /// Whether a companion class name can be derived for this kind.
    pub fn is_nameable(self) -> bool {
        !matches!(self, TypeKind::Anonymous | TypeKind::Local)
    }
}

/// Member and type visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// A method declared on a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodShape {
    pub name: String,
    /// Declared return type; `None` for void methods.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Checked failure kinds, in declaration order.
    #[serde(default)]
    pub throws: Vec<TypeName>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    /// Metadata markers (annotation names) attached to the method.
    #[serde(default)]
    pub markers: Vec<String>,
}

impl MethodShape {
    /// A public, non-static, zero-argument method returning `return_type`.
    pub fn accessor(name: impl Into<String>, return_type: TypeRef) -> Self {
        MethodShape {
            name: name.into(),
            return_type: Some(return_type),
            parameters: Vec::new(),
            throws: Vec::new(),
            visibility: Visibility::Public,
            is_static: false,
            markers: Vec::new(),
        }
    }

    pub fn throwing(mut self, failure: TypeName) -> Self {
        self.throws.push(failure);
        self
    }

    pub fn marked(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_parameter(mut self, parameter: TypeRef) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }
}

/// A field declared on a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldShape {
    pub name: String,
    pub field_type: TypeRef,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
}

impl FieldShape {
    /// A public instance field.
    pub fn public(name: impl Into<String>, field_type: TypeRef) -> Self {
        FieldShape {
            name: name.into(),
            field_type,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// The structural description of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeShape {
    pub name: TypeName,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub visibility: Visibility,
    /// Declared type parameters in order (`K`, `V`).
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Direct superclass; `None` for interfaces and root classes.
    #[serde(default)]
    pub supertype: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub methods: Vec<MethodShape>,
    #[serde(default)]
    pub fields: Vec<FieldShape>,
    /// Metadata markers attached to the type itself.
    #[serde(default)]
    pub markers: Vec<String>,
}

impl TypeShape {
    pub fn new(name: TypeName, kind: TypeKind) -> Self {
        TypeShape {
            name,
            kind,
            visibility: Visibility::Public,
            type_parameters: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn class(name: TypeName) -> Self {
        TypeShape::new(name, TypeKind::Class)
    }

    pub fn with_type_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn extending(mut self, supertype: TypeRef) -> Self {
        self.supertype = Some(supertype);
        self
    }

    pub fn implementing(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_method(mut self, method: MethodShape) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_field(mut self, field: FieldShape) -> Self {
        self.fields.push(field);
        self
    }

    pub fn marked(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }

    /// Direct supertypes: the superclass first, then interfaces in
    /// declaration order.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.supertype.iter().chain(self.interfaces.iter())
    }
}

/// Types that are enumerable even when absent from the catalog.
const ENUMERABLE_BUILT_INS: [(&str, &str); 12] = [
    ("java.lang", "Iterable"),
    ("java.util", "Collection"),
    ("java.util", "List"),
    ("java.util", "ArrayList"),
    ("java.util", "LinkedList"),
    ("java.util", "Set"),
    ("java.util", "HashSet"),
    ("java.util", "LinkedHashSet"),
    ("java.util", "SortedSet"),
    ("java.util", "TreeSet"),
    ("java.util", "Queue"),
    ("java.util", "Deque"),
];

/// Enumerable types that must not be treated as containers.
const ENUMERABLE_DENY_LIST: [(&str, &str); 1] = [("java.nio.file", "Path")];

/// The capability every enumerable type has.
pub fn iterable_name() -> TypeName {
    TypeName::new("java.lang", "Iterable")
}

/// The natural-ordering capability.
pub fn comparable_name() -> TypeName {
    TypeName::new("java.lang", "Comparable")
}

fn matches_any(name: &TypeName, table: &[(&str, &str)]) -> bool {
    !name.is_nested()
        && table
            .iter()
            .any(|(package, simple)| name.package() == *package && name.simple() == *simple)
}

/// Lookup capability over type shapes.
///
/// Only [`shape`](Self::shape) is required; the provided methods derive the
/// hierarchy queries the classifier and introspector need from it.
pub trait TypeCatalog {
    /// Returns the shape registered for `name`, if any.
    fn shape(&self, name: &TypeName) -> Option<&TypeShape>;

    /// All transitive supertype usages of `name`, nearest first, each
    /// visited once. Types absent from the catalog end the walk on their
    /// branch.
    fn supertypes(&self, name: &TypeName) -> Vec<TypeRef> {
        let mut seen: Vec<TypeName> = vec![name.clone()];
        let mut out = Vec::new();
        let mut queue: std::collections::VecDeque<TypeName> = [name.clone()].into();

        while let Some(current) = queue.pop_front() {
            let Some(shape) = self.shape(&current) else {
                continue;
            };
            for sup in shape.direct_supertypes() {
                let Some(sup_name) = sup.name() else {
                    continue;
                };
                if seen.contains(sup_name) {
                    continue;
                }
                seen.push(sup_name.clone());
                queue.push_back(sup_name.clone());
                out.push(sup.clone());
            }
        }
        out
    }

    /// The superclass chain of `name`, nearest first (interfaces excluded).
    fn superclass_chain(&self, name: &TypeName) -> Vec<TypeName> {
        let mut chain = Vec::new();
        let mut current = name.clone();
        while let Some(next) = self
            .shape(&current)
            .and_then(|s| s.supertype.as_ref())
            .and_then(TypeRef::name)
        {
            if next == name || chain.contains(next) {
                break;
            }
            chain.push(next.clone());
            current = next.clone();
        }
        chain
    }

    /// Whether `name` is, or transitively extends, `target`.
    fn is_subtype_of(&self, name: &TypeName, target: &TypeName) -> bool {
        name == target
            || self
                .supertypes(name)
                .iter()
                .filter_map(TypeRef::name)
                .any(|n| n == target)
    }

    /// Whether values of `name` enumerate elements (excluding the deny-list).
    fn is_enumerable(&self, name: &TypeName) -> bool {
        if matches_any(name, &ENUMERABLE_DENY_LIST) {
            return false;
        }
        if matches_any(name, &ENUMERABLE_BUILT_INS) {
            return true;
        }
        self.supertypes(name)
            .iter()
            .filter_map(TypeRef::name)
            .any(|n| matches_any(n, &ENUMERABLE_BUILT_INS))
    }

    /// The argument `usage` binds to the element parameter of `Iterable`.
    ///
    /// Supertypes are walked with the container's type parameters replaced
    /// by the arguments given at the use site, so `Keyed<String, Player>`
    /// with `Keyed<K, V> implements Iterable<V>` yields `Player`. Built-in
    /// collections outside the catalog bind their first argument. A raw
    /// usage may leave a type variable in the result.
    fn iterable_argument(&self, usage: &TypeRef) -> Option<TypeRef> {
        let mut visited = Vec::new();
        iterable_argument_in(self, usage, &mut visited)
    }

    /// Whether `name` declares a natural ordering.
    fn implements_comparable(&self, name: &TypeName) -> bool {
        self.is_subtype_of(name, &comparable_name())
    }
}

fn iterable_argument_in<C: TypeCatalog + ?Sized>(
    catalog: &C,
    usage: &TypeRef,
    visited: &mut Vec<TypeName>,
) -> Option<TypeRef> {
    let TypeRef::Named { name, args } = usage else {
        return None;
    };
    if *name == iterable_name() {
        return args.first().cloned();
    }

    let from_catalog = match catalog.shape(name) {
        Some(shape) if !visited.contains(name) => {
            visited.push(name.clone());
            let bindings: Vec<(&str, &TypeRef)> = shape
                .type_parameters
                .iter()
                .map(String::as_str)
                .zip(args.iter())
                .collect();
            shape
                .direct_supertypes()
                .find_map(|sup| iterable_argument_in(catalog, &sup.substitute(&bindings), visited))
        }
        _ => None,
    };
    from_catalog.or_else(|| {
        if matches_any(name, &ENUMERABLE_BUILT_INS) {
            args.first().cloned()
        } else {
            None
        }
    })
}

/// An insertion-ordered catalog held in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    types: IndexMap<TypeName, TypeShape>,
}

/// On-disk document layout: `{ "types": [ ... ] }`.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    types: Vec<TypeShape>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape, replacing any shape previously registered under its name.
    pub fn insert(&mut self, shape: TypeShape) -> Option<TypeShape> {
        self.types.insert(shape.name.clone(), shape)
    }

    pub fn with(mut self, shape: TypeShape) -> Self {
        self.insert(shape);
        self
    }

    /// Loads a catalog from its JSON document form.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        let mut catalog = InMemoryCatalog::new();
        for shape in doc.types {
            catalog.insert(shape);
        }
        Ok(catalog)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        let doc = CatalogDocument {
            types: self.types.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &TypeShape> {
        self.types.values()
    }

    /// Resolves qualified type names or package names to the shapes to
    /// generate for.
    ///
    /// A package name selects every public, nameable type directly in that
    /// package. A type name must resolve to a public, nameable type. Unknown
    /// names fail with [`CoreError::ClassNotFound`]. The result is sorted by
    /// qualified name and free of duplicates.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&TypeShape>, CoreError> {
        let mut selected: Vec<&TypeShape> = Vec::new();
        for requested in names {
            let requested = requested.as_ref().trim();
            let by_type = TypeName::from_qualified(requested)
                .and_then(|name| self.types.get(&name))
                .filter(|shape| is_generatable(shape));

            let matches: Vec<&TypeShape> = match by_type {
                Some(shape) => vec![shape],
                None => self
                    .types
                    .values()
                    .filter(|shape| shape.name.package() == requested && is_generatable(shape))
                    .collect(),
            };
            if matches.is_empty() {
                return Err(CoreError::ClassNotFound {
                    name: requested.to_string(),
                });
            }
            selected.extend(matches);
        }
        selected.sort_by(|a, b| a.name.cmp(&b.name));
        selected.dedup_by(|a, b| a.name == b.name);
        Ok(selected)
    }

    /// Every public, nameable type in the catalog, sorted like [`select`](Self::select).
    pub fn select_all(&self) -> Vec<&TypeShape> {
        let mut selected: Vec<&TypeShape> =
            self.types.values().filter(|s| is_generatable(s)).collect();
        selected.sort_by(|a, b| a.name.cmp(&b.name));
        selected
    }
}

fn is_generatable(shape: &TypeShape) -> bool {
    shape.kind.is_nameable() && shape.visibility.is_public()
}

impl TypeCatalog for InMemoryCatalog {
    fn shape(&self, name: &TypeName) -> Option<&TypeShape> {
        self.types.get(name)
    }
}
