//! Package and library manifests (package.toml, library.toml)

use crate::dependency::{Dependency, PackageId};
use crate::PackageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File name of a package manifest
pub const PACKAGE_MANIFEST_FILE: &str = "package.toml";

/// File name of a library manifest
pub const LIBRARY_MANIFEST_FILE: &str = "library.toml";

/// Package manifest (package.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackageManifest {
    pub name: String,
    pub namespace: String,
    pub version: semver::Version,
    #[serde(default)]
    pub depends: Vec<Dependency>,
}

impl PackageManifest {
    /// Parse manifest from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load and validate a manifest from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PackageError::io(path, e))?;
        let manifest = Self::from_str(&content).map_err(|error| PackageError::ParseError {
            path: path.to_path_buf(),
            error,
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate required fields
    pub fn validate(&self) -> crate::Result<()> {
        validate_identifier("name", &self.name)?;
        validate_identifier("namespace", &self.namespace)?;
        Ok(())
    }

    /// The sdist identity of this package
    pub fn id(&self) -> PackageId {
        PackageId::new(self.name.clone(), self.version.clone())
    }
}

/// Library manifest (library.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LibraryManifest {
    pub name: String,
    /// Usage requirements, applied when compiling and linking
    #[serde(default)]
    pub uses: Vec<Usage>,
    /// Link-only requirements
    #[serde(default)]
    pub links: Vec<Usage>,
}

impl LibraryManifest {
    /// A manifest for a library that does not have a library.toml
    pub fn generated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uses: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Load and validate a manifest from file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PackageError::io(path, e))?;
        let manifest: Self = toml::from_str(&content).map_err(|error| PackageError::ParseError {
            path: path.to_path_buf(),
            error,
        })?;
        validate_identifier("name", &manifest.name)?;
        Ok(manifest)
    }
}

fn validate_identifier(field: &str, value: &str) -> crate::Result<()> {
    if value.is_empty() {
        return Err(PackageError::InvalidField {
            field: field.to_string(),
            reason: "cannot be empty".to_string(),
        });
    }
    if value.contains(['/', '\\', '@']) || value.chars().any(char::is_whitespace) {
        return Err(PackageError::InvalidField {
            field: field.to_string(),
            reason: format!("'{}' contains a reserved character", value),
        });
    }
    Ok(())
}

/// A usage requirement: `<namespace>/<name>` of a library another library builds against
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Usage {
    pub namespace: String,
    pub name: String,
}

impl Usage {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for Usage {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((ns, name)) if !ns.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(ns, name))
            }
            _ => Err(PackageError::InvalidUsage(s.to_string())),
        }
    }
}

impl TryFrom<String> for Usage {
    type Error = PackageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Usage> for String {
    fn from(usage: Usage) -> Self {
        usage.to_string()
    }
}
