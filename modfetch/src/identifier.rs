//! Module identifiers.
//!
//! A module is named by a dot-segmented `name` and a `slot` that tells
//! variants of the same module apart. The pair is the only key used for
//! path composition and lookups.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Slot used when an identifier string does not name one.
pub const DEFAULT_SLOT: &str = "main";

/// Name of the in-process bootstrap module.
pub const SYSTEM_MODULE_NAME: &str = "system";

/// Errors produced when parsing an identifier string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// The name part was empty.
    #[error("module name is empty in '{0}'")]
    EmptyName(String),

    /// A slot separator was present but nothing followed it.
    #[error("module slot is empty in '{0}'")]
    EmptySlot(String),

    /// The name contained an empty segment (e.g. `org..foo`).
    #[error("module name '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// Composite `{name, slot}` key identifying a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleIdentifier {
    name: String,
    slot: String,
}

impl ModuleIdentifier {
    /// Create an identifier from a name and a slot.
    pub fn new(name: impl Into<String>, slot: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: slot.into(),
        }
    }

    /// Create an identifier in the default slot.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_SLOT)
    }

    /// The well-known bootstrap identifier.
    ///
    /// Resolution of this identifier is handled in-process and never
    /// reaches the remote repository.
    pub fn system() -> Self {
        Self::new(SYSTEM_MODULE_NAME, DEFAULT_SLOT)
    }

    /// Whether this is the bootstrap identifier.
    pub fn is_system(&self) -> bool {
        self.name == SYSTEM_MODULE_NAME && self.slot == DEFAULT_SLOT
    }

    /// Dot-segmented module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot discriminator.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Name segments in order (`org.example.foo` -> `org`, `example`, `foo`).
    pub fn name_segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('.')
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.slot)
    }
}

impl FromStr for ModuleIdentifier {
    type Err = IdentifierError;

    /// Parse `name` or `name:slot`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, slot) = match s.split_once(':') {
            Some((name, slot)) => (name, slot),
            None => (s, DEFAULT_SLOT),
        };

        if name.is_empty() {
            return Err(IdentifierError::EmptyName(s.to_string()));
        }
        if slot.is_empty() {
            return Err(IdentifierError::EmptySlot(s.to_string()));
        }
        if name.split('.').any(str::is_empty) {
            return Err(IdentifierError::EmptySegment(name.to_string()));
        }

        Ok(Self::new(name, slot))
    }
}
