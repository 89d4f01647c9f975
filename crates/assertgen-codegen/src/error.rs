//! Error types for template handling and source synthesis.

use std::path::PathBuf;

use assertgen_core::CoreError;

use crate::template::TemplateRole;

/// Errors raised while registering or loading templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A role name that is blank or matches no known role.
    #[error("invalid template role: {name:?}")]
    InvalidRole { name: String },

    /// Template path points at a directory.
    #[error("template path {} is a directory", path.display())]
    IsDirectory { path: PathBuf },

    /// Template path does not exist.
    #[error("template file {} not found", path.display())]
    NotFound { path: PathBuf },

    /// Template file exists but could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by synthesis and by the generator facade.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Type introspection or catalog lookup failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The registry holds no template for a role synthesis needs.
    #[error("no template registered for role {role}")]
    MissingTemplate { role: TemplateRole },

    /// Writing a generated source file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    /// Whether the failure came from the file system rather than the input.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            GenError::Write { .. } | GenError::Template(TemplateError::Io { .. })
        )
    }
}
