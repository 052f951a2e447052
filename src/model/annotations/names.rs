//! Canonical naming of annotations.
//!
//! The same annotation has been published under several namespaces over time: the legacy
//! support library (`android.support.annotation`), the platform (`android.annotation`) and
//! AndroidX (`androidx.annotation`). Third party nullness annotations add more spellings.
//! [`NameMapper`] resolves any of them to the one name that should be written to an output,
//! or drops the annotation altogether.
//!
//! # Rules
//!
//! The fixed part of the rules is a static table from qualified name to a [`NameRule`]; names
//! not in the table fall through to prefix and suffix based rules. Mapping is idempotent:
//! mapping the result of a mapping with the same context and target yields the same name.
//!
//! # Examples
//!
//! ```rust
//! use apiscope::{
//!     model::{AnnotationTarget, NameMapper},
//!     Config,
//! };
//!
//! let config = Config::default();
//! let mapper = NameMapper::new(&config);
//!
//! assert_eq!(
//!     mapper.map("android.support.annotation.IntRange", AnnotationTarget::SignatureFile),
//!     Some("androidx.annotation.IntRange".to_string())
//! );
//! assert_eq!(
//!     mapper.map("org.jetbrains.annotations.NotNull", AnnotationTarget::SignatureFile),
//!     Some("androidx.annotation.NonNull".to_string())
//! );
//! assert_eq!(
//!     mapper.map("android.annotation.SomethingInternal", AnnotationTarget::SignatureFile),
//!     None
//! );
//! ```

use crate::{
    model::{annotations::types::AnnotationTarget, ClassModel, Codebase},
    Config,
};

/// Prefix of the AndroidX annotation namespace
pub const ANDROIDX_ANNOTATION_PREFIX: &str = "androidx.annotation.";
/// Prefix of the platform annotation namespace
pub const ANDROID_ANNOTATION_PREFIX: &str = "android.annotation.";
/// Prefix of the legacy support library annotation namespace
pub const ANDROID_SUPPORT_ANNOTATION_PREFIX: &str = "android.support.annotation.";
/// Prefix of `java.lang`
pub const JAVA_LANG_PREFIX: &str = "java.lang.";
/// Prefix of Kotlin's meta-annotations, e.g. `kotlin.annotation.Retention`
pub const KOTLIN_ANNOTATION_PREFIX: &str = "kotlin.annotation.";
/// Package Kotlin's synthetic parameter annotations are mapped into
pub const KOTLIN_INTERNAL_PREFIX: &str = "kotlin.annotations.jvm.internal.";

/// AndroidX nullable
pub const ANDROIDX_NULLABLE: &str = androidx_name!("Nullable");
/// AndroidX non-null
pub const ANDROIDX_NONNULL: &str = androidx_name!("NonNull");
/// Platform nullable
pub const ANDROID_NULLABLE: &str = platform_name!("Nullable");
/// Platform non-null
pub const ANDROID_NONNULL: &str = platform_name!("NonNull");
/// Synthetic nullable for APIs whose nullness was annotated recently
pub const RECENTLY_NULLABLE: &str = androidx_name!("RecentlyNullable");
/// Synthetic non-null for APIs whose nullness was annotated recently
pub const RECENTLY_NONNULL: &str = androidx_name!("RecentlyNonNull");

const SUPPORT_NULLABLE: &str = support_name!("Nullable");
const SUPPORT_NONNULL: &str = support_name!("NonNull");
const LIBCORE_NULLABLE: &str = "libcore.util.Nullable";
const LIBCORE_NONNULL: &str = "libcore.util.NonNull";
const JETBRAINS_NULLABLE: &str = "org.jetbrains.annotations.Nullable";
const JETBRAINS_NOTNULL: &str = "org.jetbrains.annotations.NotNull";

/// Typedef annotations under every historical namespace
pub const INT_DEFS: [&str; 3] = all_namespaces!("IntDef");
/// `@StringDef` under every historical namespace
pub const STRING_DEFS: [&str; 3] = all_namespaces!("StringDef");
/// `@LongDef` under every historical namespace
pub const LONG_DEFS: [&str; 3] = all_namespaces!("LongDef");

/// Simple names which moved 1:1 from the support and platform namespaces to AndroidX
pub const RENAMED_ANNOTATIONS: &[&str] = &[
    // Resources
    "AnimRes",
    "AnimatorRes",
    "AnyRes",
    "ArrayRes",
    "AttrRes",
    "BoolRes",
    "ColorRes",
    "DimenRes",
    "DrawableRes",
    "FontRes",
    "FractionRes",
    "IdRes",
    "IntegerRes",
    "InterpolatorRes",
    "LayoutRes",
    "MenuRes",
    "NavigationRes",
    "PluralsRes",
    "RawRes",
    "StringRes",
    "StyleRes",
    "StyleableRes",
    "TransitionRes",
    "XmlRes",
    // Threading
    "AnyThread",
    "BinderThread",
    "MainThread",
    "UiThread",
    "WorkerThread",
    // Colors
    "ColorInt",
    "ColorLong",
    "HalfFloat",
    // Ranges and sizes
    "FloatRange",
    "IntRange",
    "Size",
    "Px",
    "Dimension",
    // Typedefs
    "IntDef",
    "StringDef",
    "LongDef",
    // Misc
    "CallSuper",
    "CheckResult",
    "RequiresPermission",
    "RequiresPermission.Read",
    "RequiresPermission.Write",
];

/// Platform annotations that keep their platform name
pub const KEPT_PLATFORM_ANNOTATIONS: &[&str] = &[
    // Typedef carriers not (yet) published in AndroidX
    "CurrentTimeMillisLong",
    "CurrentTimeSecondsLong",
    "DurationMillisLong",
    "ElapsedRealtimeLong",
    "UserIdInt",
    "AppIdInt",
    "BytesLong",
    // Platform API markers
    "SuppressAutoDoc",
    "SystemApi",
    "TestApi",
    "CallbackExecutor",
    "Condemned",
    "Hide",
    "Widget",
    // Used for analysis only
    "BroadcastBehavior",
    "SdkConstant",
    "RequiresFeature",
    "SystemService",
    // Must not be moved to another package
    "TargetApi",
    "SuppressLint",
];

/// Implementation details of the runtime that never appear in any output
pub const DROPPED_NAMES: &[&str] = &[
    "dalvik.annotation.optimization.CriticalNative",
    "dalvik.annotation.optimization.FastNative",
    "libcore.api.CorePlatformApi",
    "libcore.api.IntraCoreApi",
];

/// Nullness of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullness {
    /// The annotated element may be null
    Nullable,
    /// The annotated element is never null
    NonNull,
}

/// The outcome of looking a qualified name up in the fixed table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Replace with the given name
    Rename(&'static str),
    /// Keep the name unchanged
    PassThrough,
    /// Drop the annotation
    Drop,
    /// Resolve through the nullness resolver for the output target
    Nullness(Nullness),
    /// A recently annotated nullness: platform spelling in SDK stubs, AndroidX elsewhere
    RecentNullness(Nullness),
    /// Keep only if the filter accepts the annotation class or it is a show annotation
    ConditionalKeep,
}

/// Looks up the fixed rule for a qualified annotation name
///
/// Returns `None` for names the table does not know; those are handled by the fallback rules
/// of [`NameMapper::map`].
#[must_use]
pub fn fixed_rule(qualified_name: &str) -> Option<NameRule> {
    match qualified_name {
        RECENTLY_NULLABLE => return Some(NameRule::RecentNullness(Nullness::Nullable)),
        RECENTLY_NONNULL => return Some(NameRule::RecentNullness(Nullness::NonNull)),
        ANDROIDX_NULLABLE | ANDROID_NULLABLE | SUPPORT_NULLABLE | LIBCORE_NULLABLE
        | JETBRAINS_NULLABLE => return Some(NameRule::Nullness(Nullness::Nullable)),
        ANDROIDX_NONNULL | ANDROID_NONNULL | SUPPORT_NONNULL | LIBCORE_NONNULL
        | JETBRAINS_NOTNULL => return Some(NameRule::Nullness(Nullness::NonNull)),
        _ => {}
    }

    if DROPPED_NAMES.contains(&qualified_name) {
        return Some(NameRule::Drop);
    }

    let legacy = qualified_name
        .strip_prefix(ANDROID_SUPPORT_ANNOTATION_PREFIX)
        .or_else(|| qualified_name.strip_prefix(ANDROID_ANNOTATION_PREFIX))?;

    if let Some(index) = RENAMED_ANNOTATIONS.iter().position(|name| *name == legacy) {
        return Some(NameRule::Rename(ANDROIDX_RENAMES[index]));
    }

    if qualified_name.starts_with(ANDROID_ANNOTATION_PREFIX)
        && KEPT_PLATFORM_ANNOTATIONS.contains(&legacy)
    {
        return Some(NameRule::PassThrough);
    }

    None
}

// AndroidX names for RENAMED_ANNOTATIONS, index for index
const ANDROIDX_RENAMES: &[&str] = &[
    androidx_name!("AnimRes"),
    androidx_name!("AnimatorRes"),
    androidx_name!("AnyRes"),
    androidx_name!("ArrayRes"),
    androidx_name!("AttrRes"),
    androidx_name!("BoolRes"),
    androidx_name!("ColorRes"),
    androidx_name!("DimenRes"),
    androidx_name!("DrawableRes"),
    androidx_name!("FontRes"),
    androidx_name!("FractionRes"),
    androidx_name!("IdRes"),
    androidx_name!("IntegerRes"),
    androidx_name!("InterpolatorRes"),
    androidx_name!("LayoutRes"),
    androidx_name!("MenuRes"),
    androidx_name!("NavigationRes"),
    androidx_name!("PluralsRes"),
    androidx_name!("RawRes"),
    androidx_name!("StringRes"),
    androidx_name!("StyleRes"),
    androidx_name!("StyleableRes"),
    androidx_name!("TransitionRes"),
    androidx_name!("XmlRes"),
    androidx_name!("AnyThread"),
    androidx_name!("BinderThread"),
    androidx_name!("MainThread"),
    androidx_name!("UiThread"),
    androidx_name!("WorkerThread"),
    androidx_name!("ColorInt"),
    androidx_name!("ColorLong"),
    androidx_name!("HalfFloat"),
    androidx_name!("FloatRange"),
    androidx_name!("IntRange"),
    androidx_name!("Size"),
    androidx_name!("Px"),
    androidx_name!("Dimension"),
    androidx_name!("IntDef"),
    androidx_name!("StringDef"),
    androidx_name!("LongDef"),
    androidx_name!("CallSuper"),
    androidx_name!("CheckResult"),
    androidx_name!("RequiresPermission"),
    androidx_name!("RequiresPermission.Read"),
    androidx_name!("RequiresPermission.Write"),
];

const _: () = assert!(ANDROIDX_RENAMES.len() == RENAMED_ANNOTATIONS.len());

/// Resolves a nullness to the spelling used by `target`
///
/// SDK stubs use the platform annotations, every other output the AndroidX ones.
#[must_use]
pub fn nullness_name(nullness: Nullness, target: AnnotationTarget) -> &'static str {
    match (nullness, target) {
        (Nullness::Nullable, AnnotationTarget::SdkStubsFile) => ANDROID_NULLABLE,
        (Nullness::NonNull, AnnotationTarget::SdkStubsFile) => ANDROID_NONNULL,
        (Nullness::Nullable, _) => ANDROIDX_NULLABLE,
        (Nullness::NonNull, _) => ANDROIDX_NONNULL,
    }
}

/// Guesses the nullness of an unknown annotation from its simple name
#[must_use]
pub fn nullness_by_suffix(qualified_name: &str) -> Option<Nullness> {
    if qualified_name.ends_with("Nullable") {
        Some(Nullness::Nullable)
    } else if qualified_name.ends_with("NonNull")
        || qualified_name.ends_with("NotNull")
        || qualified_name.ends_with("Nonnull")
    {
        Some(Nullness::NonNull)
    } else {
        None
    }
}

/// Returns the nullness of one of the known nullness spellings, including the synthetic ones
#[must_use]
pub fn known_nullness(qualified_name: &str) -> Option<Nullness> {
    match fixed_rule(qualified_name)? {
        NameRule::Nullness(nullness) | NameRule::RecentNullness(nullness) => Some(nullness),
        _ => None,
    }
}

/// Returns true if `qualified_name` is one of the typedef annotations
#[must_use]
pub fn is_typedef_name(qualified_name: &str) -> bool {
    INT_DEFS.contains(&qualified_name)
        || STRING_DEFS.contains(&qualified_name)
        || LONG_DEFS.contains(&qualified_name)
}

/// Predicate deciding whether an annotation class is exported
pub type ClassFilter<'a> = dyn Fn(&ClassModel) -> bool + 'a;

/// Maps annotation names to their canonical output names
///
/// A mapper borrows the configuration and, optionally, a codebase and a class filter. Without
/// a filter, unknown annotations outside the platform namespace are kept; with a filter they
/// are kept only if their class is found in the codebase and accepted.
pub struct NameMapper<'a> {
    config: &'a Config,
    codebase: Option<&'a dyn Codebase>,
    filter: Option<&'a ClassFilter<'a>>,
}

impl<'a> NameMapper<'a> {
    /// Creates a mapper without codebase access or filtering
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            codebase: None,
            filter: None,
        }
    }

    /// Creates a mapper consulting `codebase` and its configuration
    #[must_use]
    pub fn for_codebase(codebase: &'a dyn Codebase) -> Self {
        Self {
            config: codebase.config(),
            codebase: Some(codebase),
            filter: None,
        }
    }

    /// Restricts unknown annotations to classes accepted by `filter`
    #[must_use]
    pub fn with_filter(mut self, filter: &'a ClassFilter<'a>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// The configuration consulted by this mapper
    #[must_use]
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Maps `qualified_name` for output to `target`.
    ///
    /// Returns `None` if the annotation should be dropped.
    #[must_use]
    pub fn map(&self, qualified_name: &str, target: AnnotationTarget) -> Option<String> {
        if self.config.pass_through_annotations.contains(qualified_name) {
            return Some(qualified_name.to_string());
        }

        match fixed_rule(qualified_name) {
            Some(rule) => self.apply(rule, qualified_name, target),
            None => self.map_unknown(qualified_name, target),
        }
    }

    fn apply(&self, rule: NameRule, qualified_name: &str, target: AnnotationTarget) -> Option<String> {
        match rule {
            NameRule::Rename(name) => Some(name.to_string()),
            NameRule::PassThrough => Some(qualified_name.to_string()),
            NameRule::Drop => None,
            NameRule::Nullness(nullness) | NameRule::RecentNullness(nullness) => {
                Some(nullness_name(nullness, target).to_string())
            }
            NameRule::ConditionalKeep => self.keep_if_accepted(qualified_name),
        }
    }

    fn map_unknown(&self, qualified_name: &str, target: AnnotationTarget) -> Option<String> {
        // Kotlin compiler annotations
        if qualified_name.ends_with(".ParameterName") || qualified_name.ends_with(".DefaultValue")
        {
            let simple = qualified_name.rsplit('.').next().unwrap_or_default();
            return Some(format!("{KOTLIN_INTERNAL_PREFIX}{simple}"));
        }

        if let Some(nullness) = nullness_by_suffix(qualified_name) {
            return self.apply(NameRule::Nullness(nullness), qualified_name, target);
        }

        if qualified_name.starts_with(ANDROIDX_ANNOTATION_PREFIX)
            || qualified_name.starts_with(JAVA_LANG_PREFIX)
            || qualified_name.starts_with(KOTLIN_ANNOTATION_PREFIX)
        {
            return Some(qualified_name.to_string());
        }

        if qualified_name.starts_with(ANDROID_ANNOTATION_PREFIX) {
            if self.config.is_show_annotation_name(qualified_name) {
                return Some(qualified_name.to_string());
            }
            let accepted = self.filter.is_some() && self.accepted_by_filter(qualified_name);
            if !accepted {
                log::trace!("dropping unknown platform annotation {qualified_name}");
            }
            return accepted.then(|| qualified_name.to_string());
        }

        if let Some(simple) = qualified_name.strip_prefix(ANDROID_SUPPORT_ANNOTATION_PREFIX) {
            return self.map(&format!("{ANDROIDX_ANNOTATION_PREFIX}{simple}"), target);
        }

        self.apply(NameRule::ConditionalKeep, qualified_name, target)
    }

    fn keep_if_accepted(&self, qualified_name: &str) -> Option<String> {
        if self.config.is_show_annotation_name(qualified_name)
            || self.filter.is_none()
            || self.accepted_by_filter(qualified_name)
        {
            Some(qualified_name.to_string())
        } else {
            log::trace!("dropping annotation {qualified_name} rejected by filter");
            None
        }
    }

    fn accepted_by_filter(&self, qualified_name: &str) -> bool {
        match (self.filter, self.codebase) {
            (Some(filter), Some(codebase)) => codebase
                .find_class(qualified_name)
                .is_some_and(|class| filter(&class)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AnnotationTarget as Target, ClassKind, ClassModel, ModifierSet, Retention, TextCodebase,
        VisibilityLevel,
    };
    use strum::IntoEnumIterator;

    fn sample_names() -> Vec<String> {
        let mut names: Vec<String> = RENAMED_ANNOTATIONS
            .iter()
            .flat_map(|simple| {
                [
                    format!("{ANDROID_SUPPORT_ANNOTATION_PREFIX}{simple}"),
                    format!("{ANDROID_ANNOTATION_PREFIX}{simple}"),
                    format!("{ANDROIDX_ANNOTATION_PREFIX}{simple}"),
                ]
            })
            .collect();
        names.extend(
            [
                RECENTLY_NULLABLE,
                RECENTLY_NONNULL,
                ANDROIDX_NULLABLE,
                ANDROID_NONNULL,
                SUPPORT_NULLABLE,
                LIBCORE_NONNULL,
                JETBRAINS_NOTNULL,
                "javax.annotation.Nonnull",
                "edu.umd.cs.findbugs.annotations.Nullable",
                "kotlin.ParameterName",
                "kotlin.internal.DefaultValue",
                "android.annotation.SystemApi",
                "android.annotation.Unknown",
                "android.support.annotation.Keep",
                "android.support.annotation.RestrictTo.Scope",
                "java.lang.Deprecated",
                "com.example.Custom",
                "dalvik.annotation.optimization.FastNative",
            ]
            .iter()
            .map(|name| (*name).to_string()),
        );
        names
    }

    #[test]
    fn legacy_names_move_to_androidx() {
        let config = Config::default();
        let mapper = NameMapper::new(&config);
        for simple in RENAMED_ANNOTATIONS {
            let expected = format!("{ANDROIDX_ANNOTATION_PREFIX}{simple}");
            let support = format!("{ANDROID_SUPPORT_ANNOTATION_PREFIX}{simple}");
            let platform = format!("{ANDROID_ANNOTATION_PREFIX}{simple}");
            assert_eq!(mapper.map(&support, Target::SignatureFile), Some(expected.clone()));
            assert_eq!(mapper.map(&platform, Target::SignatureFile), Some(expected));
        }
    }

    #[test]
    fn mapping_is_idempotent() {
        let config = Config::default();
        let mapper = NameMapper::new(&config);
        for target in Target::iter() {
            for name in sample_names() {
                let once = mapper.map(&name, target);
                let twice = once.as_deref().and_then(|mapped| mapper.map(mapped, target));
                if once.is_some() {
                    assert_eq!(twice, once, "{name} for {target:?}");
                }
            }
        }
    }

    #[test]
    fn nullness_spellings() {
        let config = Config::default();
        let mapper = NameMapper::new(&config);
        assert_eq!(
            mapper.map(RECENTLY_NULLABLE, Target::SdkStubsFile).as_deref(),
            Some(ANDROID_NULLABLE)
        );
        assert_eq!(
            mapper.map(RECENTLY_NONNULL, Target::DocStubsFile).as_deref(),
            Some(ANDROIDX_NONNULL)
        );
        assert_eq!(
            mapper.map(LIBCORE_NULLABLE, Target::SignatureFile).as_deref(),
            Some(ANDROIDX_NULLABLE)
        );
        assert_eq!(
            mapper.map("javax.annotation.Nonnull", Target::SignatureFile).as_deref(),
            Some(ANDROIDX_NONNULL)
        );
        assert_eq!(
            mapper.map("com.example.NotNull", Target::SdkStubsFile).as_deref(),
            Some(ANDROID_NONNULL)
        );
    }

    #[test]
    fn platform_and_fallback_rules() {
        let config = Config::default().with_show_annotation("android.annotation.Shown");
        let mapper = NameMapper::new(&config);
        assert_eq!(
            mapper.map("android.annotation.SystemApi", Target::SignatureFile).as_deref(),
            Some("android.annotation.SystemApi")
        );
        assert_eq!(mapper.map("android.annotation.Unknown", Target::SignatureFile), None);
        assert_eq!(
            mapper.map("dalvik.annotation.optimization.FastNative", Target::SignatureFile),
            None
        );
        assert_eq!(
            mapper.map("android.annotation.Shown", Target::SignatureFile).as_deref(),
            Some("android.annotation.Shown")
        );
        assert_eq!(
            mapper.map("android.support.annotation.Keep", Target::SignatureFile).as_deref(),
            Some("androidx.annotation.Keep")
        );
        assert_eq!(
            mapper.map("kotlin.ParameterName", Target::SignatureFile).as_deref(),
            Some("kotlin.annotations.jvm.internal.ParameterName")
        );
        assert_eq!(
            mapper.map("com.example.Custom", Target::SignatureFile).as_deref(),
            Some("com.example.Custom")
        );
    }

    #[test]
    fn pass_through_wins() {
        let config = Config::default().with_pass_through_annotation("android.annotation.Unknown");
        let mapper = NameMapper::new(&config);
        assert_eq!(
            mapper.map("android.annotation.Unknown", Target::SignatureFile).as_deref(),
            Some("android.annotation.Unknown")
        );
    }

    #[test]
    fn filter_consults_codebase() {
        let codebase = TextCodebase::new("test");
        codebase
            .add_class(
                ClassModel::builder("com.example.Exported")
                    .kind(ClassKind::AnnotationType)
                    .build(),
            )
            .unwrap();
        codebase
            .add_class(ClassModel::builder("android.annotation.Exported").build())
            .unwrap();

        let filter = |class: &ClassModel| class.qualified_name.ends_with("Exported");
        let mapper = NameMapper::for_codebase(&codebase).with_filter(&filter);

        assert_eq!(
            mapper.map("com.example.Exported", Target::SignatureFile).as_deref(),
            Some("com.example.Exported")
        );
        assert_eq!(mapper.map("com.example.Missing", Target::SignatureFile), None);
        assert_eq!(
            mapper.map("android.annotation.Exported", Target::SignatureFile).as_deref(),
            Some("android.annotation.Exported")
        );
    }

    #[test]
    fn meta_annotations_survive_a_filter() {
        let codebase = TextCodebase::new("test");
        let filter = |_: &ClassModel| false;
        let mapper = NameMapper::for_codebase(&codebase).with_filter(&filter);

        for name in [
            "kotlin.annotation.Retention",
            "kotlin.annotation.Target",
            "java.lang.annotation.Retention",
        ] {
            assert_eq!(mapper.map(name, Target::SignatureFile).as_deref(), Some(name));
        }
        assert_eq!(mapper.map("com.example.Anything", Target::SignatureFile), None);

        let mut modifiers = ModifierSet::new(VisibilityLevel::Public);
        modifiers.add_annotations(
            ["@kotlin.annotation.Retention(kotlin.annotation.AnnotationRetention.SOURCE)"],
            &mapper,
        );
        let class = ClassModel::builder("com.example.Flavor")
            .kind(ClassKind::AnnotationType)
            .modifiers(modifiers)
            .build();
        assert_eq!(class.retention(), Retention::Source);
    }

    #[test]
    fn typedef_names() {
        for name in INT_DEFS.iter().chain(&STRING_DEFS).chain(&LONG_DEFS) {
            assert!(is_typedef_name(name));
        }
        assert!(!is_typedef_name("androidx.annotation.IntRange"));
        assert_eq!(known_nullness(RECENTLY_NONNULL), Some(Nullness::NonNull));
        assert_eq!(known_nullness("androidx.annotation.Keep"), None);
    }
}
