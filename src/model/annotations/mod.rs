//! Annotation occurrences and their classification.
//!
//! An [`AnnotationModel`] is one annotation as found on an API element: the name it was
//! written with, the canonical name it maps to and its attributes. Where the annotation ends
//! up in the generated outputs is decided by [`AnnotationModel::targets`], which is computed
//! once per occurrence and cached.
//!
//! # Key Components
//!
//! - [`NameMapper`]: canonical naming of legacy, platform and third party annotations
//! - [`compute_targets`]: routing of an annotation to the outputs
//! - [`parse_attributes`]: scanner for attribute lists
//!
//! # Examples
//!
//! ```rust
//! use apiscope::model::{AnnotationModel, AnnotationTargets, TextCodebase};
//!
//! let codebase = TextCodebase::new("api.txt");
//! let annotation = AnnotationModel::parse(
//!     "@android.support.annotation.IntRange(from=0, to=255)",
//!     &codebase.name_mapper(),
//! );
//!
//! assert_eq!(annotation.qualified_name.as_deref(), Some("androidx.annotation.IntRange"));
//! assert_eq!(annotation.attributes.len(), 2);
//! assert_eq!(annotation.targets(&codebase), AnnotationTargets::SIGNATURE_AND_EXTERNAL);
//! ```

pub mod names;
mod parser;
mod targets;
mod types;

use std::{fmt::Write, sync::OnceLock};

pub use names::{ClassFilter, NameMapper, NameRule, Nullness};
pub use parser::{classify_value, parse_attributes, split_annotation_source};
pub use targets::{compute_targets, fixed_targets, typedef_targets};
pub use types::{
    AnnotationAttribute, AnnotationTarget, AnnotationTargets, AnnotationValue, Retention,
};

use crate::{model::Codebase, Config};

/// One annotation occurrence
#[derive(Debug, Clone)]
pub struct AnnotationModel {
    /// The name as written in the source
    pub original_name: String,
    /// The canonical name; `None` if the annotation is dropped
    pub qualified_name: Option<String>,
    /// Attributes in source order
    pub attributes: Vec<AnnotationAttribute>,
    targets: OnceLock<AnnotationTargets>,
}

impl AnnotationModel {
    /// Parses annotation source text, mapping its name through `mapper`.
    ///
    /// The name is mapped for the signature file; writers re-map it for their own output.
    #[must_use]
    pub fn parse(source: &str, mapper: &NameMapper<'_>) -> Self {
        let (name, attributes) = split_annotation_source(source);
        let qualified_name = mapper.map(name, AnnotationTarget::SignatureFile);
        Self::with_parts(name, qualified_name, attributes)
    }

    /// Parses annotation source text keeping the name as written
    #[must_use]
    pub fn parse_unmapped(source: &str) -> Self {
        let (name, attributes) = split_annotation_source(source);
        Self::with_parts(name, Some(name.to_string()), attributes)
    }

    /// An annotation without attributes whose canonical name is `qualified_name`
    #[must_use]
    pub fn unmapped(qualified_name: &str) -> Self {
        Self::with_parts(qualified_name, Some(qualified_name.to_string()), None)
    }

    fn with_parts(name: &str, qualified_name: Option<String>, attributes: Option<&str>) -> Self {
        Self {
            original_name: name.to_string(),
            qualified_name,
            attributes: attributes.map(parse_attributes).unwrap_or_default(),
            targets: OnceLock::new(),
        }
    }

    /// The canonical name, or the original one for dropped annotations
    #[must_use]
    pub fn name(&self) -> &str {
        self.qualified_name.as_deref().unwrap_or(&self.original_name)
    }

    /// The simple name of the annotation class
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let name = self.name();
        name.rsplit('.').next().unwrap_or(name)
    }

    /// The outputs this annotation is written to.
    ///
    /// Computed on first use and cached; later changes to `codebase` are not observed.
    pub fn targets(&self, codebase: &dyn Codebase) -> AnnotationTargets {
        *self
            .targets
            .get_or_init(|| compute_targets(self, codebase))
    }

    /// Returns true if the targets were already computed
    #[must_use]
    pub fn has_cached_targets(&self) -> bool {
        self.targets.get().is_some()
    }

    /// Looks up an attribute by name
    #[must_use]
    pub fn find_attribute(&self, name: &str) -> Option<&AnnotationAttribute> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// The nullness this annotation expresses, if any
    #[must_use]
    pub fn nullness(&self) -> Option<Nullness> {
        let name = self.qualified_name.as_deref()?;
        names::known_nullness(name).or_else(|| names::nullness_by_suffix(name))
    }

    /// Returns true for nullable annotations
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullness() == Some(Nullness::Nullable)
    }

    /// Returns true for non-null annotations
    #[must_use]
    pub fn is_non_null(&self) -> bool {
        self.nullness() == Some(Nullness::NonNull)
    }

    /// Returns true for any nullness annotation
    #[must_use]
    pub fn is_nullness(&self) -> bool {
        self.nullness().is_some()
    }

    /// Returns true for `@IntDef`, `@StringDef` and `@LongDef`
    #[must_use]
    pub fn is_typedef(&self) -> bool {
        self.qualified_name
            .as_deref()
            .is_some_and(names::is_typedef_name)
    }

    /// Returns true for the Java and Kotlin deprecation annotations
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        matches!(
            self.qualified_name.as_deref(),
            Some("java.lang.Deprecated" | "kotlin.Deprecated")
        )
    }

    /// Returns true for the Java and Kotlin retention meta-annotations
    #[must_use]
    pub fn is_retention(&self) -> bool {
        matches!(
            self.qualified_name.as_deref(),
            Some("java.lang.annotation.Retention" | "kotlin.annotation.Retention")
        )
    }

    /// Returns true if this annotation shows the annotated element
    #[must_use]
    pub fn is_show_annotation(&self, config: &Config) -> bool {
        config.is_show_annotation_name(self.name())
    }

    /// Returns true if this annotation hides the annotated element
    #[must_use]
    pub fn is_hide_annotation(&self, config: &Config) -> bool {
        config.hide_annotations.contains(self.name())
    }

    /// Returns true if this is a meta-annotation marking hide annotations
    #[must_use]
    pub fn is_hide_meta_annotation(&self, config: &Config) -> bool {
        config.hide_meta_annotations.contains(self.name())
    }

    /// The retention named by a `@Retention` annotation's value
    #[must_use]
    pub fn retention_value(&self) -> Option<Retention> {
        if !self.is_retention() {
            return None;
        }
        self.find_attribute("value")
            .and_then(|attribute| Retention::parse(&attribute.raw_value))
    }

    /// Renders the annotation for `target`, re-mapping its name.
    ///
    /// Returns `None` if the name maps to nothing for `target`. A lone `value` attribute is
    /// written without its name.
    #[must_use]
    pub fn to_source(&self, target: AnnotationTarget, mapper: &NameMapper<'_>) -> Option<String> {
        let name = mapper.map(self.name(), target)?;
        let mut source = format!("@{name}");
        self.write_attributes(&mut source);
        Some(source)
    }

    /// Renders the annotation with its current name
    #[must_use]
    pub fn source(&self) -> String {
        let mut source = format!("@{}", self.name());
        self.write_attributes(&mut source);
        source
    }

    fn write_attributes(&self, source: &mut String) {
        match self.attributes.as_slice() {
            [] => {}
            [single] if single.is_default_name() => {
                let _ = write!(source, "({})", single.raw_value);
            }
            attributes => {
                source.push('(');
                for (index, attribute) in attributes.iter().enumerate() {
                    if index > 0 {
                        source.push_str(", ");
                    }
                    let _ = write!(source, "{}={}", attribute.name, attribute.raw_value);
                }
                source.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_name_and_keeps_original() {
        let config = Config::default();
        let mapper = NameMapper::new(&config);
        let annotation = AnnotationModel::parse(
            "@android.support.annotation.Size(min = 1, max = 4)",
            &mapper,
        );
        assert_eq!(annotation.original_name, "android.support.annotation.Size");
        assert_eq!(annotation.name(), "androidx.annotation.Size");
        assert_eq!(annotation.simple_name(), "Size");
        assert_eq!(annotation.find_attribute("max").unwrap().raw_value, "4");
        assert!(annotation.find_attribute("value").is_none());
    }

    #[test]
    fn dropped_annotation_keeps_original_name() {
        let config = Config::default();
        let mapper = NameMapper::new(&config);
        let annotation = AnnotationModel::parse("@android.annotation.Internal", &mapper);
        assert!(annotation.qualified_name.is_none());
        assert_eq!(annotation.name(), "android.annotation.Internal");
        assert!(annotation
            .to_source(AnnotationTarget::SignatureFile, &mapper)
            .is_none());
    }

    #[test]
    fn predicates() {
        let config = Config::default()
            .with_show_annotation("android.annotation.SystemApi")
            .with_hide_annotation("com.example.Hide")
            .with_hide_meta_annotation("com.example.HideMeta");

        assert!(AnnotationModel::unmapped(names::RECENTLY_NULLABLE).is_nullable());
        assert!(AnnotationModel::unmapped("androidx.annotation.NonNull").is_non_null());
        assert!(!AnnotationModel::unmapped("androidx.annotation.Px").is_nullness());
        assert!(AnnotationModel::unmapped("android.annotation.LongDef").is_typedef());
        assert!(AnnotationModel::unmapped("kotlin.Deprecated").is_deprecated());
        assert!(AnnotationModel::unmapped("android.annotation.SystemApi").is_show_annotation(&config));
        assert!(AnnotationModel::unmapped("com.example.Hide").is_hide_annotation(&config));
        assert!(AnnotationModel::unmapped("com.example.HideMeta").is_hide_meta_annotation(&config));
    }

    #[test]
    fn retention_value() {
        let annotation = AnnotationModel::parse_unmapped(
            "@java.lang.annotation.Retention(java.lang.annotation.RetentionPolicy.SOURCE)",
        );
        assert_eq!(annotation.retention_value(), Some(Retention::Source));
        assert_eq!(
            AnnotationModel::parse_unmapped("@com.example.Retention(RUNTIME)").retention_value(),
            None
        );
    }

    #[test]
    fn source_rendering() {
        let config = Config::default();
        let mapper = NameMapper::new(&config);

        let single = AnnotationModel::parse("@android.annotation.RequiresPermission(value=\"a\")", &mapper);
        assert_eq!(
            single
                .to_source(AnnotationTarget::SignatureFile, &mapper)
                .as_deref(),
            Some("@androidx.annotation.RequiresPermission(\"a\")")
        );

        let range = AnnotationModel::parse("@androidx.annotation.IntRange(from=1,to=2)", &mapper);
        assert_eq!(range.source(), "@androidx.annotation.IntRange(from=1, to=2)");

        let nullable = AnnotationModel::parse("@androidx.annotation.Nullable", &mapper);
        assert_eq!(
            nullable
                .to_source(AnnotationTarget::SdkStubsFile, &mapper)
                .as_deref(),
            Some("@android.annotation.Nullable")
        );
    }
}
