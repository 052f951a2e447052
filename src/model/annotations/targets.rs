//! Classification of annotations into output targets.
//!
//! Every annotation written by the tool is routed to a subset of the outputs: the signature
//! file, the two stub source trees and the external annotations file. Well-known names are
//! classified from fixed tables; anything else is resolved through the codebase and routed by
//! the retention of its declaring annotation class.

use crate::{
    model::{
        annotations::{
            names::{
                self, ANDROIDX_ANNOTATION_PREFIX, ANDROIDX_NONNULL, ANDROIDX_NULLABLE,
                ANDROID_ANNOTATION_PREFIX, ANDROID_NONNULL, ANDROID_NULLABLE, RECENTLY_NONNULL,
                RECENTLY_NULLABLE,
            },
            types::{AnnotationTargets, Retention},
            AnnotationModel,
        },
        Codebase,
    },
    Config, TypedefMode,
};

/// Annotations that are never written anywhere
pub const DROPPED_ANNOTATIONS: &[&str] = &[
    "java.lang.annotation.Native",
    "java.lang.SuppressWarnings",
    "java.lang.Override",
    "kotlin.Suppress",
    "android.view.ViewDebug.ExportedProperty",
    "android.view.ViewDebug.CapturedViewProperty",
];

/// Annotations written to the signature file and to both stub trees
pub const ALL_STUB_ANNOTATIONS: &[&str] = &[
    "java.lang.Deprecated",
    "java.lang.FunctionalInterface",
    "java.lang.SafeVarargs",
    "java.lang.annotation.Documented",
    "java.lang.annotation.Inherited",
    "java.lang.annotation.Repeatable",
    "java.lang.annotation.Retention",
    "java.lang.annotation.Target",
    "kotlin.Deprecated",
    "kotlin.annotation.MustBeDocumented",
    "kotlin.annotation.Repeatable",
    "kotlin.annotation.Retention",
    "kotlin.annotation.Target",
    "android.annotation.Widget",
];

/// The canonical nullness spellings
const NULLNESS_ANNOTATIONS: [&str; 4] = [
    ANDROIDX_NULLABLE,
    ANDROIDX_NONNULL,
    ANDROID_NULLABLE,
    ANDROID_NONNULL,
];

/// Targets of a typedef annotation itself, depending on how typedefs appear in signatures
#[must_use]
pub fn typedef_targets(config: &Config) -> AnnotationTargets {
    match config.compatibility.typedefs_in_signatures {
        TypedefMode::None => AnnotationTargets::EXTERNAL_ANNOTATIONS_FILE,
        TypedefMode::Inline | TypedefMode::Reference => AnnotationTargets::SIGNATURE_AND_EXTERNAL,
    }
}

/// Classifies a name from the fixed tables alone.
///
/// Returns `None` if the name needs the codebase to be classified.
#[must_use]
pub fn fixed_targets(qualified_name: &str, config: &Config) -> Option<AnnotationTargets> {
    if config.pass_through_annotations.contains(qualified_name) {
        return Some(AnnotationTargets::ALL_STUBS);
    }
    if names::is_typedef_name(qualified_name) {
        return Some(typedef_targets(config));
    }
    if DROPPED_ANNOTATIONS.contains(&qualified_name) {
        return Some(AnnotationTargets::NONE);
    }
    if ALL_STUB_ANNOTATIONS.contains(&qualified_name)
        || NULLNESS_ANNOTATIONS.contains(&qualified_name)
    {
        return Some(AnnotationTargets::ALL_STUBS);
    }
    if qualified_name.starts_with(ANDROID_ANNOTATION_PREFIX) {
        return Some(AnnotationTargets::NONE);
    }
    if qualified_name == RECENTLY_NULLABLE || qualified_name == RECENTLY_NONNULL {
        return Some(AnnotationTargets::ALL_STUBS);
    }
    if qualified_name.starts_with(ANDROIDX_ANNOTATION_PREFIX) {
        if config.include_source_retention_annotations {
            return Some(AnnotationTargets::ALL_STUBS);
        }
        if names::known_nullness(qualified_name).is_some() {
            return Some(AnnotationTargets::DOC_STUBS_AND_EXTERNAL);
        }
        return Some(AnnotationTargets::SIGNATURE_AND_EXTERNAL);
    }
    None
}

/// Computes the outputs `annotation` is written to.
///
/// Dropped annotations (those without a mapped name) go nowhere. Names outside the fixed
/// tables are looked up in `codebase`: an annotation class that is missing or not part of the
/// API is not written, except that typedef carriers still reach the signature file when
/// typedefs are surfaced. Class and runtime retained annotations go to the signature file and
/// the SDK stubs; source retained ones to the signature file and external annotations.
#[must_use]
pub fn compute_targets(annotation: &AnnotationModel, codebase: &dyn Codebase) -> AnnotationTargets {
    let Some(qualified_name) = annotation.qualified_name.as_deref() else {
        return AnnotationTargets::NONE;
    };

    let config = codebase.config();
    if let Some(targets) = fixed_targets(qualified_name, config) {
        return targets;
    }

    let Some(class) = codebase.find_class(qualified_name) else {
        log::debug!("annotation class {qualified_name} not found, not writing @{qualified_name}");
        return AnnotationTargets::NONE;
    };

    if !class.is_api(codebase) {
        if config.typedef_mode != TypedefMode::None && class.typedef_annotation().is_some() {
            return AnnotationTargets::SIGNATURE_FILE;
        }
        return AnnotationTargets::NONE;
    }

    match class.retention() {
        Retention::Runtime | Retention::Class => AnnotationTargets::SIGNATURE_AND_SDK_STUBS,
        Retention::Source => AnnotationTargets::SIGNATURE_AND_EXTERNAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ClassKind, ClassModel, ModifierSet, TextCodebase, VisibilityLevel},
        CompatibilityConfig,
    };
    use std::sync::Arc;

    fn annotation_class(name: &str, annotations: &[&str], visibility: VisibilityLevel) -> ClassModel {
        let mut modifiers = ModifierSet::new(visibility);
        for source in annotations {
            modifiers.add_annotation_source(source);
        }
        ClassModel::builder(name)
            .kind(ClassKind::AnnotationType)
            .modifiers(modifiers)
            .build()
    }

    fn targets_of(codebase: &TextCodebase, source: &str) -> AnnotationTargets {
        AnnotationModel::parse(source, &codebase.name_mapper()).targets(codebase)
    }

    #[test]
    fn typedefs_go_to_external_annotations_only() {
        let codebase = TextCodebase::new("test");
        for name in names::INT_DEFS
            .iter()
            .chain(&names::STRING_DEFS)
            .chain(&names::LONG_DEFS)
        {
            let annotation = AnnotationModel::unmapped(*name);
            assert_eq!(
                annotation.targets(&codebase),
                AnnotationTargets::EXTERNAL_ANNOTATIONS_FILE,
                "{name}"
            );
        }
    }

    #[test]
    fn typedefs_in_signatures() {
        let config = Config::default().with_compatibility(CompatibilityConfig {
            typedefs_in_signatures: TypedefMode::Reference,
            ..CompatibilityConfig::default()
        });
        let codebase = TextCodebase::with_config("test", Arc::new(config));
        assert_eq!(
            targets_of(&codebase, "@androidx.annotation.IntDef({1, 2})"),
            AnnotationTargets::SIGNATURE_AND_EXTERNAL
        );
    }

    #[test]
    fn fixed_tables() {
        let codebase = TextCodebase::new("test");
        assert_eq!(targets_of(&codebase, "@java.lang.Override"), AnnotationTargets::NONE);
        assert_eq!(
            targets_of(&codebase, "@java.lang.annotation.Retention(RUNTIME)"),
            AnnotationTargets::ALL_STUBS
        );
        assert_eq!(
            targets_of(&codebase, "@android.annotation.NonNull"),
            AnnotationTargets::ALL_STUBS
        );
        assert_eq!(
            targets_of(&codebase, "@android.annotation.SystemApi"),
            AnnotationTargets::NONE
        );
        assert_eq!(
            AnnotationModel::unmapped(RECENTLY_NONNULL).targets(&codebase),
            AnnotationTargets::ALL_STUBS
        );
        assert_eq!(
            targets_of(&codebase, "@androidx.annotation.IntRange(from=0)"),
            AnnotationTargets::SIGNATURE_AND_EXTERNAL
        );
    }

    #[test]
    fn androidx_nullness_and_source_retention() {
        let config = Config::default();
        assert_eq!(
            fixed_targets("androidx.annotation.RecentlyNullable", &config),
            Some(AnnotationTargets::ALL_STUBS)
        );

        let config = Config::default().with_source_retention_annotations(true);
        assert_eq!(
            fixed_targets("androidx.annotation.Px", &config),
            Some(AnnotationTargets::ALL_STUBS)
        );
        assert_eq!(fixed_targets("com.example.Foo", &config), None);
    }

    #[test]
    fn pass_through_wins() {
        let config = Config::default().with_pass_through_annotation("java.lang.Override");
        assert_eq!(
            fixed_targets("java.lang.Override", &config),
            Some(AnnotationTargets::ALL_STUBS)
        );
    }

    #[test]
    fn resolved_through_retention() {
        let codebase = TextCodebase::new("test");
        codebase
            .add_class(annotation_class(
                "com.example.Runtime",
                &["@java.lang.annotation.Retention(java.lang.annotation.RetentionPolicy.RUNTIME)"],
                VisibilityLevel::Public,
            ))
            .unwrap();
        codebase
            .add_class(annotation_class(
                "com.example.Source",
                &["@kotlin.annotation.Retention(AnnotationRetention.SOURCE)"],
                VisibilityLevel::Public,
            ))
            .unwrap();
        codebase
            .add_class(annotation_class("com.example.Hidden", &[], VisibilityLevel::Private))
            .unwrap();

        assert_eq!(
            targets_of(&codebase, "@com.example.Runtime"),
            AnnotationTargets::SIGNATURE_AND_SDK_STUBS
        );
        assert_eq!(
            targets_of(&codebase, "@com.example.Source"),
            AnnotationTargets::SIGNATURE_AND_EXTERNAL
        );
        assert_eq!(targets_of(&codebase, "@com.example.Hidden"), AnnotationTargets::NONE);
        assert_eq!(targets_of(&codebase, "@com.example.Missing"), AnnotationTargets::NONE);
    }

    #[test]
    fn hidden_typedef_carrier_reaches_signature() {
        let config = Config::default().with_typedef_mode(TypedefMode::Inline);
        let codebase = TextCodebase::with_config("test", Arc::new(config));
        codebase
            .add_class(annotation_class(
                "com.example.Mode",
                &["@androidx.annotation.IntDef({1, 2})"],
                VisibilityLevel::PackagePrivate,
            ))
            .unwrap();
        assert_eq!(
            targets_of(&codebase, "@com.example.Mode"),
            AnnotationTargets::SIGNATURE_FILE
        );
    }

    #[test]
    fn targets_are_memoized() {
        let codebase = TextCodebase::new("test");
        let annotation = AnnotationModel::parse("@com.example.Late", &codebase.name_mapper());
        assert_eq!(annotation.targets(&codebase), AnnotationTargets::NONE);

        codebase
            .add_class(annotation_class("com.example.Late", &[], VisibilityLevel::Public))
            .unwrap();
        assert_eq!(annotation.targets(&codebase), AnnotationTargets::NONE);
    }
}
