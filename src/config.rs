//! Configuration for API surface classification and output.
//!
//! This module provides the explicit configuration value that the model consults when it maps
//! annotation names, classifies annotation targets, compares modifiers and writes them out.
//! A [`Config`] is created once per tool run and shared (as `Arc<Config>`) by the codebase;
//! nothing in the crate reads configuration from global state.

use std::collections::HashSet;

use crate::model::VisibilityLevel;

/// How typedef annotations (`@IntDef`, `@StringDef`, `@LongDef`) are surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypedefMode {
    /// Typedef annotations are not surfaced on their usages
    #[default]
    None,
    /// Usages of a typedef annotation are replaced with the typedef declaration itself
    Inline,
    /// Usages of a typedef annotation are written as a bare `@Name` reference
    Reference,
}

/// The lowest visibility that is considered part of the documented API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocLevel {
    /// Only public elements
    Public,
    /// Public and protected elements
    #[default]
    Protected,
    /// Everything down to package private
    Package,
    /// Everything, including private elements
    Private,
    /// Everything, including hidden elements
    Hidden,
}

impl DocLevel {
    /// The minimum visibility an element must have to be included at this level
    #[must_use]
    pub fn min_visibility(self) -> VisibilityLevel {
        match self {
            DocLevel::Public => VisibilityLevel::Public,
            DocLevel::Protected => VisibilityLevel::Protected,
            DocLevel::Package => VisibilityLevel::PackagePrivate,
            DocLevel::Private | DocLevel::Hidden => VisibilityLevel::Private,
        }
    }
}

/// Switches that reproduce the output of older signature file generations
///
/// Each flag only changes token order or the presence of implied tokens; none of them change
/// which elements are part of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CompatibilityConfig {
    /// Write modifiers in the legacy (non-JLS) order
    pub legacy_modifier_order: bool,

    /// Write `static` on nested enums, where it is implied
    pub static_in_enums: bool,

    /// Write `abstract` on interface methods, where it is implied
    pub abstract_in_interfaces: bool,

    /// Treat `synchronized` as API significant: it takes part in modifier equivalence and is
    /// written to signature files
    pub include_synchronized: bool,

    /// Write `deprecated` as a modifier token rather than as an annotation
    pub deprecated_as_modifier: bool,

    /// How typedef annotations appear in signature files
    pub typedefs_in_signatures: TypedefMode,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            legacy_modifier_order: false,
            static_in_enums: false,
            abstract_in_interfaces: false,
            include_synchronized: false,
            deprecated_as_modifier: false,
            typedefs_in_signatures: TypedefMode::None,
        }
    }
}

impl CompatibilityConfig {
    /// Settings matching signature files produced by the legacy doc tool
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            legacy_modifier_order: true,
            static_in_enums: true,
            abstract_in_interfaces: true,
            include_synchronized: true,
            deprecated_as_modifier: true,
            typedefs_in_signatures: TypedefMode::None,
        }
    }
}

/// Configuration for one run over an API surface
///
/// All fields are public so that an options parser can fill them directly; the `with_*`
/// helpers exist for the common programmatic cases.
///
/// # Examples
///
/// ```rust
/// use apiscope::{Config, TypedefMode};
///
/// let config = Config::default()
///     .with_pass_through_annotation("com.example.Keep")
///     .with_typedef_mode(TypedefMode::Reference);
/// assert!(config.pass_through_annotations.contains("com.example.Keep"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Annotations that are copied to every stub output unchanged
    pub pass_through_annotations: HashSet<String>,

    /// Annotations whose annotated elements are shown even if otherwise hidden
    pub show_annotations: HashSet<String>,

    /// Like `show_annotations`, but not inherited by members of annotated classes
    pub show_single_annotations: HashSet<String>,

    /// Annotations whose annotated elements are hidden
    pub hide_annotations: HashSet<String>,

    /// Meta-annotations: an annotation type carrying one of these is itself a hide annotation
    pub hide_meta_annotations: HashSet<String>,

    /// How typedef annotations appear in stub outputs
    pub typedef_mode: TypedefMode,

    /// Keep source-retention androidx annotations in every stub output
    pub include_source_retention_annotations: bool,

    /// Lowest visibility considered part of the documented API
    pub doc_level: DocLevel,

    /// Output compatibility switches
    pub compatibility: CompatibilityConfig,
}

impl Config {
    /// Configuration matching the output of the legacy doc tool
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            compatibility: CompatibilityConfig::legacy(),
            ..Self::default()
        }
    }

    /// Adds an annotation that is passed through unchanged
    #[must_use]
    pub fn with_pass_through_annotation(mut self, name: impl Into<String>) -> Self {
        self.pass_through_annotations.insert(name.into());
        self
    }

    /// Adds a show annotation
    #[must_use]
    pub fn with_show_annotation(mut self, name: impl Into<String>) -> Self {
        self.show_annotations.insert(name.into());
        self
    }

    /// Adds a hide annotation
    #[must_use]
    pub fn with_hide_annotation(mut self, name: impl Into<String>) -> Self {
        self.hide_annotations.insert(name.into());
        self
    }

    /// Adds a hide meta-annotation
    #[must_use]
    pub fn with_hide_meta_annotation(mut self, name: impl Into<String>) -> Self {
        self.hide_meta_annotations.insert(name.into());
        self
    }

    /// Sets the typedef mode for stub outputs
    #[must_use]
    pub fn with_typedef_mode(mut self, mode: TypedefMode) -> Self {
        self.typedef_mode = mode;
        self
    }

    /// Keeps source-retention androidx annotations in all stubs
    #[must_use]
    pub fn with_source_retention_annotations(mut self, include: bool) -> Self {
        self.include_source_retention_annotations = include;
        self
    }

    /// Sets the compatibility switches
    #[must_use]
    pub fn with_compatibility(mut self, compatibility: CompatibilityConfig) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Returns true if `name` was listed as a show annotation of either kind
    #[must_use]
    pub fn is_show_annotation_name(&self, name: &str) -> bool {
        self.show_annotations.contains(name) || self.show_single_annotations.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_modern() {
        let config = Config::default();
        assert!(!config.compatibility.legacy_modifier_order);
        assert_eq!(config.typedef_mode, TypedefMode::None);
        assert_eq!(
            config.compatibility.typedefs_in_signatures,
            TypedefMode::None
        );
        assert_eq!(config.doc_level, DocLevel::Protected);
    }

    #[test]
    fn legacy_preset() {
        let config = Config::legacy();
        assert!(config.compatibility.legacy_modifier_order);
        assert!(config.compatibility.include_synchronized);
    }

    #[test]
    fn show_annotation_lookup() {
        let mut config = Config::default().with_show_annotation("a.Show");
        config.show_single_annotations.insert("a.Single".to_string());
        assert!(config.is_show_annotation_name("a.Show"));
        assert!(config.is_show_annotation_name("a.Single"));
        assert!(!config.is_show_annotation_name("a.Other"));
    }

    #[test]
    fn doc_level_visibility() {
        assert_eq!(
            DocLevel::Package.min_visibility(),
            VisibilityLevel::PackagePrivate
        );
        assert_eq!(DocLevel::Hidden.min_visibility(), VisibilityLevel::Private);
    }
}
