//! Canonical type names and declared type references.
//!
//! [`TypeName`] identifies one nominal type (package, enclosing chain, simple
//! name). [`TypeRef`] is a *usage* of a type as it appears on a member
//! declaration: a named type with generic arguments, an array, a type
//! variable, or a wildcard.
//!
//! Both serialize to the compact signature syntax used by catalog files:
//! `java.util.List<com.acme.Player>`, `int[]`, `com.acme.Outer$Inner`,
//! `java.util.Map<K, ? extends java.lang.Number>`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The eight primitive type keywords.
pub const PRIMITIVES: [&str; 8] = [
    "boolean", "byte", "short", "int", "long", "float", "double", "char",
];

/// `java.lang` wrapper types paired with the primitive they box.
const BOXED: [(&str, &str); 8] = [
    ("Boolean", "boolean"),
    ("Byte", "byte"),
    ("Short", "short"),
    ("Integer", "int"),
    ("Long", "long"),
    ("Float", "float"),
    ("Double", "double"),
    ("Character", "char"),
];

/// Package whose top-level types never need an import.
pub const BUILT_IN_PACKAGE: &str = "java.lang";

/// A nominal type name.
///
/// Equality compares package, enclosing chain and simple name. Ordering is
/// lexicographic on the qualified form, package segment first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName {
    package: String,
    enclosing: Vec<String>,
    simple: String,
}

impl TypeName {
    /// A top-level type in `package` (empty for primitives and the default package).
    pub fn new(package: impl Into<String>, simple: impl Into<String>) -> Self {
        TypeName {
            package: package.into(),
            enclosing: Vec::new(),
            simple: simple.into(),
        }
    }

    /// A nested type; `enclosing` lists outer types outermost first.
    pub fn nested(
        package: impl Into<String>,
        enclosing: impl IntoIterator<Item = impl Into<String>>,
        simple: impl Into<String>,
    ) -> Self {
        TypeName {
            package: package.into(),
            enclosing: enclosing.into_iter().map(Into::into).collect(),
            simple: simple.into(),
        }
    }

    /// A primitive type such as `int`.
    pub fn primitive(keyword: &str) -> Self {
        TypeName::new("", keyword)
    }

    /// The universal top type, `java.lang.Object`.
    pub fn object() -> Self {
        TypeName::new(BUILT_IN_PACKAGE, "Object")
    }

    /// Parses a binary or canonical qualified name.
    ///
    /// The package is every leading segment that starts with a lower-case
    /// letter; the remaining segments (split on `.` or `$`) form the
    /// enclosing chain and the simple name. Returns `None` for an empty or
    /// syntactically broken name.
    pub fn from_qualified(qualified: &str) -> Option<Self> {
        let qualified = qualified.trim();
        if qualified.is_empty() {
            return None;
        }
        let segments: Vec<&str> = qualified.split('.').collect();
        if segments.iter().any(|s| s.is_empty() || !is_identifier_path(s)) {
            return None;
        }

        let class_start = segments
            .iter()
            .position(|s| s.starts_with(|c: char| c.is_uppercase()))
            .unwrap_or(segments.len() - 1);

        let package = segments[..class_start].join(".");
        let mut chain: Vec<String> = segments[class_start..]
            .iter()
            .flat_map(|s| s.split('$'))
            .map(str::to_string)
            .collect();
        if chain.iter().any(String::is_empty) {
            return None;
        }
        let simple = chain.pop()?;
        Some(TypeName {
            package,
            enclosing: chain,
            simple,
        })
    }

    /// Owning package; empty for primitives and default-package types.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Outer types, outermost first.
    pub fn enclosing(&self) -> &[String] {
        &self.enclosing
    }

    /// Simple name without the enclosing chain.
    pub fn simple(&self) -> &str {
        &self.simple
    }

    pub fn is_nested(&self) -> bool {
        !self.enclosing.is_empty()
    }

    /// `Outer.Inner` form, used to reference the type from its own package.
    pub fn outer_qualified(&self) -> String {
        let mut out = String::new();
        for outer in &self.enclosing {
            out.push_str(outer);
            out.push('.');
        }
        out.push_str(&self.simple);
        out
    }

    /// `OuterInner` form, used to derive companion class names.
    pub fn simple_without_dots(&self) -> String {
        let mut out = self.enclosing.concat();
        out.push_str(&self.simple);
        out
    }

    /// Canonical `package.Outer.Inner` form.
    pub fn qualified(&self) -> String {
        if self.package.is_empty() {
            self.outer_qualified()
        } else {
            format!("{}.{}", self.package, self.outer_qualified())
        }
    }

    /// Binary `package.Outer$Inner` form, used by catalog files.
    pub fn binary(&self) -> String {
        let mut chain = self.enclosing.join("$");
        if !chain.is_empty() {
            chain.push('$');
        }
        chain.push_str(&self.simple);
        if self.package.is_empty() {
            chain
        } else {
            format!("{}.{}", self.package, chain)
        }
    }

    /// The top-level type this name is nested in (or itself).
    pub fn top_level(&self) -> TypeName {
        match self.enclosing.first() {
            Some(outermost) => TypeName::new(self.package.clone(), outermost.clone()),
            None => self.clone(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.package.is_empty() && !self.is_nested() && PRIMITIVES.contains(&self.simple.as_str())
    }

    /// Whether this is one of the `java.lang` primitive wrappers.
    pub fn is_boxed(&self) -> bool {
        self.unboxed().is_some()
    }

    /// The primitive keyword a wrapper boxes, or the keyword itself for a primitive.
    pub fn primitive_keyword(&self) -> Option<&str> {
        if self.is_primitive() {
            Some(self.simple.as_str())
        } else {
            self.unboxed()
        }
    }

    /// The `java.lang` wrapper of a primitive; other names are returned as is.
    pub fn boxed(&self) -> TypeName {
        if !self.is_primitive() {
            return self.clone();
        }
        BOXED
            .iter()
            .find(|(_, primitive)| *primitive == self.simple)
            .map(|(wrapper, _)| TypeName::new(BUILT_IN_PACKAGE, *wrapper))
            .unwrap_or_else(|| self.clone())
    }

    fn unboxed(&self) -> Option<&'static str> {
        if self.package != BUILT_IN_PACKAGE || self.is_nested() {
            return None;
        }
        BOXED
            .iter()
            .find(|(wrapper, _)| *wrapper == self.simple)
            .map(|(_, primitive)| *primitive)
    }

    /// Primitives and top-level `java.lang` types are always in scope.
    pub fn is_built_in(&self) -> bool {
        self.is_primitive() || self.package == BUILT_IN_PACKAGE
    }

    /// How generated code placed in `context_package` refers to this type.
    pub fn reference_from(&self, context_package: &str) -> String {
        if self.is_built_in() || self.package == context_package {
            self.outer_qualified()
        } else {
            self.qualified()
        }
    }
}

fn is_identifier_path(segment: &str) -> bool {
    segment
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

impl Ord for TypeName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.package
            .cmp(&other.package)
            .then_with(|| self.outer_qualified().cmp(&other.outer_qualified()))
    }
}

impl PartialOrd for TypeName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

impl TryFrom<String> for TypeName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeName::from_qualified(&value).ok_or_else(|| format!("invalid type name '{}'", value))
    }
}

impl From<TypeName> for String {
    fn from(name: TypeName) -> Self {
        name.binary()
    }
}

/// A declared type usage on a member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// A nominal type with its (possibly empty) generic arguments.
    Named { name: TypeName, args: Vec<TypeRef> },
    /// An array of the component type.
    Array(Box<TypeRef>),
    /// An unresolved type parameter such as `T`.
    Variable(String),
    /// `?` or `? extends Bound`.
    Wildcard(Option<Box<TypeRef>>),
}

impl TypeRef {
    /// A non-generic usage of `name`.
    pub fn named(name: TypeName) -> Self {
        TypeRef::Named {
            name,
            args: Vec::new(),
        }
    }

    pub fn generic(name: TypeName, args: Vec<TypeRef>) -> Self {
        TypeRef::Named { name, args }
    }

    pub fn primitive(keyword: &str) -> Self {
        TypeRef::named(TypeName::primitive(keyword))
    }

    pub fn array_of(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    /// `java.lang.Object`.
    pub fn object() -> Self {
        TypeRef::named(TypeName::object())
    }

    /// Parses the signature syntax.
    ///
    /// A bare single upper-case letter optionally followed by digits (`T`,
    /// `E`, `K2`) is read as a type variable.
    pub fn parse(signature: &str) -> Result<Self, CoreError> {
        let malformed = |reason: String| CoreError::MalformedSignature {
            signature: signature.to_string(),
            reason,
        };
        let mut parser = SignatureParser::new(signature);
        let parsed = parser.type_ref().map_err(malformed)?;
        parser.skip_ws();
        if !parser.at_end() {
            return Err(malformed(format!(
                "unexpected trailing input at offset {}",
                parser.pos
            )));
        }
        Ok(parsed)
    }

    /// Like [`parse`](Self::parse), but a malformed generic argument list
    /// degrades to the raw type instead of failing.
    ///
    /// Element types of such raw usages later resolve to the top type.
    pub fn parse_lenient(signature: &str) -> Result<Self, CoreError> {
        match TypeRef::parse(signature) {
            Ok(parsed) => Ok(parsed),
            Err(err) => {
                let trimmed = signature.trim();
                let (base, dims) = strip_array_suffix(trimmed);
                let raw = base.split('<').next().unwrap_or(base);
                let name = TypeName::from_qualified(raw).ok_or(err)?;
                tracing::debug!(signature, "malformed generic signature, using raw type");
                let mut ty = TypeRef::named(name);
                for _ in 0..dims {
                    ty = TypeRef::array_of(ty);
                }
                Ok(ty)
            }
        }
    }

    /// The nominal type a usage erases to. Arrays, variables and wildcards
    /// have no single nominal type and return `None`.
    pub fn name(&self) -> Option<&TypeName> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Replaces the type variables bound in `bindings`; unbound ones stay.
    pub fn substitute(&self, bindings: &[(&str, &TypeRef)]) -> TypeRef {
        match self {
            TypeRef::Variable(variable) => bindings
                .iter()
                .find(|(parameter, _)| *parameter == variable.as_str())
                .map(|(_, arg)| (*arg).clone())
                .unwrap_or_else(|| self.clone()),
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(|arg| arg.substitute(bindings)).collect(),
            },
            TypeRef::Array(component) => TypeRef::array_of(component.substitute(bindings)),
            TypeRef::Wildcard(bound) => {
                TypeRef::Wildcard(bound.as_ref().map(|b| Box::new(b.substitute(bindings))))
            }
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array(_))
    }

    /// Component type of an array usage.
    pub fn component(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(component) => Some(component),
            _ => None,
        }
    }

    /// Whether the usage names a concrete type (no variables or wildcards).
    pub fn is_concrete(&self) -> bool {
        match self {
            TypeRef::Named { args, .. } => args.iter().all(TypeRef::is_concrete),
            TypeRef::Array(component) => component.is_concrete(),
            TypeRef::Variable(_) | TypeRef::Wildcard(_) => false,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.name().is_some_and(TypeName::is_primitive)
    }

    /// Renders the usage for generated code placed in `context_package`.
    pub fn render(&self, context_package: &str) -> String {
        match self {
            TypeRef::Named { name, args } => {
                let mut out = name.reference_from(context_package);
                if !args.is_empty() {
                    let rendered: Vec<String> =
                        args.iter().map(|a| a.render(context_package)).collect();
                    out.push('<');
                    out.push_str(&rendered.join(", "));
                    out.push('>');
                }
                out
            }
            TypeRef::Array(component) => format!("{}[]", component.render(context_package)),
            TypeRef::Variable(var) => var.clone(),
            TypeRef::Wildcard(None) => "?".to_string(),
            TypeRef::Wildcard(Some(bound)) => {
                format!("? extends {}", bound.render(context_package))
            }
        }
    }

    /// Renders without generic arguments, as needed for class literals.
    pub fn render_raw(&self, context_package: &str) -> String {
        match self {
            TypeRef::Named { name, .. } => name.reference_from(context_package),
            TypeRef::Array(component) => format!("{}[]", component.render_raw(context_package)),
            TypeRef::Variable(_) | TypeRef::Wildcard(_) => {
                TypeName::object().reference_from(context_package)
            }
        }
    }

    /// Simple form: outer-qualified names with no package, raw.
    pub fn simple_name(&self) -> String {
        match self {
            TypeRef::Named { name, .. } => name.outer_qualified(),
            TypeRef::Array(component) => format!("{}[]", component.simple_name()),
            TypeRef::Variable(var) => var.clone(),
            TypeRef::Wildcard(_) => TypeName::object().simple().to_string(),
        }
    }

    /// Signature syntax accepted by [`parse`](Self::parse).
    pub fn signature(&self) -> String {
        match self {
            TypeRef::Named { name, args } => {
                let mut out = name.binary();
                if !args.is_empty() {
                    let rendered: Vec<String> = args.iter().map(TypeRef::signature).collect();
                    out.push('<');
                    out.push_str(&rendered.join(", "));
                    out.push('>');
                }
                out
            }
            TypeRef::Array(component) => format!("{}[]", component.signature()),
            TypeRef::Variable(var) => var.clone(),
            TypeRef::Wildcard(None) => "?".to_string(),
            TypeRef::Wildcard(Some(bound)) => format!("? extends {}", bound.signature()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

impl TryFrom<String> for TypeRef {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse_lenient(&value)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.signature()
    }
}

fn strip_array_suffix(mut s: &str) -> (&str, usize) {
    let mut dims = 0;
    while let Some(rest) = s.strip_suffix("[]") {
        s = rest.trim_end();
        dims += 1;
    }
    (s, dims)
}

fn is_type_variable(ident: &str) -> bool {
    let mut chars = ident.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_digit())
}

/// Recursive-descent parser over the signature syntax.
struct SignatureParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SignatureParser<'a> {
    fn new(input: &'a str) -> Self {
        SignatureParser { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn type_ref(&mut self) -> Result<TypeRef, String> {
        self.skip_ws();
        let mut ty = if self.eat("?") {
            if self.eat("extends ") {
                TypeRef::Wildcard(Some(Box::new(self.type_ref()?)))
            } else if self.eat("super ") {
                // Lower bounds say nothing about the element type.
                self.type_ref()?;
                TypeRef::Wildcard(None)
            } else {
                TypeRef::Wildcard(None)
            }
        } else {
            let ident = self.qualified_ident()?;
            if is_type_variable(&ident) {
                TypeRef::Variable(ident)
            } else {
                let name = TypeName::from_qualified(&ident)
                    .ok_or_else(|| format!("invalid type name '{}'", ident))?;
                let mut args = Vec::new();
                if self.eat("<") {
                    loop {
                        args.push(self.type_ref()?);
                        if self.eat(",") {
                            continue;
                        }
                        if self.eat(">") {
                            break;
                        }
                        return Err("unterminated generic arguments".to_string());
                    }
                }
                TypeRef::Named { name, args }
            }
        };
        while self.eat("[]") {
            ty = TypeRef::array_of(ty);
        }
        Ok(ty)
    }

    fn qualified_ident(&mut self) -> Result<String, String> {
        self.skip_ws();
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(format!("expected a type name at offset {}", self.pos));
        }
        let ident = self.rest()[..len].to_string();
        self.pos += len;
        Ok(ident)
    }
}
