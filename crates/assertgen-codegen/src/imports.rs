//! Import collection for generated source units.

use std::collections::BTreeSet;

use assertgen_core::name::BUILT_IN_PACKAGE;
use assertgen_core::TypeName;

/// Framework names detected in rendered bodies, with the type each needs.
const HELPERS: [(&str, &str); 8] = [
    ("AbstractObjectAssert", "org.assertj.core.api.AbstractObjectAssert"),
    ("AbstractComparableAssert", "org.assertj.core.api.AbstractComparableAssert"),
    ("Assertions.", "org.assertj.core.api.Assertions"),
    ("Objects.", "org.assertj.core.util.Objects"),
    ("Iterables.", "org.assertj.core.internal.Iterables"),
    ("ObjectArrays.", "org.assertj.core.internal.ObjectArrays"),
    ("FieldSupport.", "org.assertj.core.util.introspection.FieldSupport"),
    ("Offset", "org.assertj.core.data.Offset"),
];

/// Sorted, de-duplicated imports of one source unit placed in `package`.
#[derive(Debug, Clone)]
pub struct ImportSet {
    package: String,
    names: BTreeSet<String>,
}

impl ImportSet {
    pub fn new(package: impl Into<String>) -> Self {
        ImportSet {
            package: package.into(),
            names: BTreeSet::new(),
        }
    }

    /// Adds the import `name` needs, if any. Returns whether one was added.
    ///
    /// Nested types are imported through their top-level type.
    pub fn add_type(&mut self, name: &TypeName) -> bool {
        if name.is_built_in() || name.package().is_empty() || name.package() == self.package {
            return false;
        }
        self.names.insert(name.top_level().qualified())
    }

    /// Adds a qualified top-level name such as `org.acme.Helper`.
    pub fn add_qualified(&mut self, qualified: &str) -> bool {
        let Some((package, _)) = qualified.rsplit_once('.') else {
            // default-package types cannot be imported
            return false;
        };
        if package == BUILT_IN_PACKAGE || package == self.package {
            return false;
        }
        self.names.insert(qualified.to_string())
    }

    /// Adds every framework helper `body` refers to.
    pub fn add_helpers_in(&mut self, body: &str) {
        for (marker, qualified) in HELPERS {
            if mentions(body, marker) {
                self.add_qualified(qualified);
            }
        }
    }

    pub fn contains(&self, qualified: &str) -> bool {
        self.names.contains(qualified)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// One `import a.b.C;` line per name, followed by a blank line when non-empty.
    pub fn render(&self) -> String {
        if self.names.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for name in &self.names {
            out.push_str("import ");
            out.push_str(name);
            out.push_str(";\n");
        }
        out.push('\n');
        out
    }
}

/// Whether `marker` occurs in `body` at the start of an identifier.
/// Whether `body` uses `marker` as a whole, unqualified name.
fn mentions(body: &str, marker: &str) -> bool {
    let open_ended = marker.chars().next_back().is_some_and(is_identifier_char);
    body.match_indices(marker).any(|(at, _)| {
        let before = body[..at].chars().next_back();
        let after = body[at + marker.len()..].chars().next();
        !before.is_some_and(|c| is_identifier_char(c) || c == '.')
            && !(open_ended && after.is_some_and(is_identifier_char))
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
