//! Dependency requirements and version compatibility

use crate::PackageError;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How far a candidate version may drift from the requested one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStrength {
    /// Only the requested version itself
    Exact,
    /// Same major and minor, patch at least the requested one
    Patch,
    /// Same major, (minor, patch) at least the requested one
    #[default]
    Minor,
    /// Same major, anything else goes
    Major,
}

impl VersionStrength {
    /// Whether `candidate` satisfies `requested` under this strength.
    ///
    /// Pre-release and build metadata only matter for `Exact`.
    pub fn allows(&self, requested: &Version, candidate: &Version) -> bool {
        match self {
            Self::Exact => candidate == requested,
            Self::Patch => {
                candidate.major == requested.major
                    && candidate.minor == requested.minor
                    && candidate.patch >= requested.patch
            }
            Self::Minor => {
                candidate.major == requested.major
                    && (candidate.minor, candidate.patch) >= (requested.minor, requested.patch)
            }
            Self::Major => candidate.major == requested.major,
        }
    }

    /// Operator character used in dependency strings
    pub fn operator(&self) -> char {
        match self {
            Self::Exact => '=',
            Self::Patch => '~',
            Self::Minor => '^',
            Self::Major => '+',
        }
    }

    fn from_operator(op: char) -> Option<Self> {
        match op {
            '=' => Some(Self::Exact),
            '~' => Some(Self::Patch),
            '^' => Some(Self::Minor),
            '+' => Some(Self::Major),
            _ => None,
        }
    }
}

impl fmt::Display for VersionStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// A requirement on another package: `name@^1.2.3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dependency {
    pub name: String,
    pub version: Version,
    pub strength: VersionStrength,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: Version, strength: VersionStrength) -> Self {
        Self {
            name: name.into(),
            version,
            strength,
        }
    }

    /// Parse a dependency string of the form `name@<op><version>`.
    ///
    /// `<op>` is one of `=` (exact), `~` (patch), `^` (minor) or `+` (major).
    /// Without an operator the strength is `minor`.
    pub fn parse(input: &str) -> crate::Result<Self> {
        let invalid = |reason: &str| PackageError::InvalidDependency {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (name, spec) = input
            .trim()
            .split_once('@')
            .ok_or_else(|| invalid("expected '<name>@<version>'"))?;
        if name.is_empty() {
            return Err(invalid("package name is empty"));
        }

        let mut chars = spec.chars();
        let (strength, version_str) = match chars.next().and_then(VersionStrength::from_operator) {
            Some(strength) => (strength, chars.as_str()),
            None => (VersionStrength::default(), spec),
        };

        let version = Version::parse(version_str)
            .map_err(|e| invalid(&format!("bad version '{}': {}", version_str, e)))?;

        Ok(Self::new(name, version, strength))
    }

    /// Whether the given version satisfies this requirement
    pub fn matches(&self, candidate: &Version) -> bool {
        self.strength.allows(&self.version, candidate)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}{}",
            self.name,
            self.strength.operator(),
            self.version
        )
    }
}

impl FromStr for Dependency {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Dependency {
    type Error = PackageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Dependency> for String {
    fn from(dep: Dependency) -> Self {
        dep.to_string()
    }
}

/// Identity of a source distribution
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId {
    pub name: String,
    pub version: Version,
}

impl PackageId {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
