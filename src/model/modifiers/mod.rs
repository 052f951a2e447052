//! Modifiers and annotations attached to API elements.
//!
//! A [`ModifierSet`] packs the visibility and all boolean modifiers of one element into a
//! single [`ModifierFlags`] value, and keeps the element's annotations in the order they were
//! added. The flags drive two operations: [`ModifierSet::equivalent_to`], which decides whether
//! an override changes anything API significant, and the writer in [`writer`], which renders
//! the set in either of the two supported token orders.
//!
//! # Layout
//!
//! The low bits (`VISIBILITY_MASK`) hold a [`VisibilityLevel`] value, every other bit is one
//! modifier. The visibility bits are not a flag set: they hold exactly one of five values and
//! are only ever read through [`ModifierSet::visibility`].

pub mod writer;

use bitflags::bitflags;

pub use writer::{ElementKind, WriteContext};

use crate::{
    model::{
        annotations::{AnnotationModel, NameMapper},
        visibility::{VisibilityLevel, VISIBILITY_MASK},
    },
    Config,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Visibility and modifier bits of an API element
    pub struct ModifierFlags: u32 {
        /// Visibility value bits; see [`VisibilityLevel::flag_value`]
        const VISIBILITY = VISIBILITY_MASK;
        /// `static`
        const STATIC = 1 << 3;
        /// `abstract`
        const ABSTRACT = 1 << 4;
        /// `final`
        const FINAL = 1 << 5;
        /// `native`
        const NATIVE = 1 << 6;
        /// `synchronized`
        const SYNCHRONIZED = 1 << 7;
        /// `strictfp`
        const STRICT_FP = 1 << 8;
        /// `transient`
        const TRANSIENT = 1 << 9;
        /// `volatile`
        const VOLATILE = 1 << 10;
        /// `default` interface method
        const DEFAULT = 1 << 11;
        /// Deprecated, by annotation or documentation
        const DEPRECATED = 1 << 12;
        /// Last parameter is a vararg
        const VARARG = 1 << 13;
        /// Kotlin `sealed`
        const SEALED = 1 << 14;
        /// Kotlin `fun` interface
        const FUN = 1 << 15;
        /// Kotlin `infix`
        const INFIX = 1 << 16;
        /// Kotlin `operator`
        const OPERATOR = 1 << 17;
        /// Kotlin `inline`
        const INLINE = 1 << 18;
        /// Kotlin `value` class
        const VALUE = 1 << 19;
        /// Kotlin `suspend`
        const SUSPEND = 1 << 20;
        /// Kotlin `companion` object
        const COMPANION = 1 << 21;
        /// Kotlin `const`
        const CONST = 1 << 22;
        /// Kotlin `data` class
        const DATA = 1 << 23;
        /// Kotlin `expect`
        const EXPECT = 1 << 24;
        /// Kotlin `actual`
        const ACTUAL = 1 << 25;
    }
}

/// Modifier bits that are significant when comparing an override with the overridden member
pub const EQUIVALENCE_MASK: ModifierFlags = ModifierFlags::VISIBILITY
    .union(ModifierFlags::STATIC)
    .union(ModifierFlags::ABSTRACT)
    .union(ModifierFlags::FINAL)
    .union(ModifierFlags::TRANSIENT)
    .union(ModifierFlags::VOLATILE)
    .union(ModifierFlags::DEPRECATED)
    .union(ModifierFlags::VARARG)
    .union(ModifierFlags::SEALED)
    .union(ModifierFlags::INFIX)
    .union(ModifierFlags::OPERATOR)
    .union(ModifierFlags::SUSPEND)
    .union(ModifierFlags::COMPANION);

/// [`EQUIVALENCE_MASK`] plus `synchronized`, for legacy compatible comparisons
pub const COMPAT_EQUIVALENCE_MASK: ModifierFlags =
    EQUIVALENCE_MASK.union(ModifierFlags::SYNCHRONIZED);

/// Modifier keywords and the flag each one sets
const KEYWORDS: &[(&str, ModifierFlags)] = &[
    ("static", ModifierFlags::STATIC),
    ("abstract", ModifierFlags::ABSTRACT),
    ("final", ModifierFlags::FINAL),
    ("native", ModifierFlags::NATIVE),
    ("synchronized", ModifierFlags::SYNCHRONIZED),
    ("strictfp", ModifierFlags::STRICT_FP),
    ("transient", ModifierFlags::TRANSIENT),
    ("volatile", ModifierFlags::VOLATILE),
    ("default", ModifierFlags::DEFAULT),
    ("deprecated", ModifierFlags::DEPRECATED),
    ("sealed", ModifierFlags::SEALED),
    ("fun", ModifierFlags::FUN),
    ("infix", ModifierFlags::INFIX),
    ("operator", ModifierFlags::OPERATOR),
    ("inline", ModifierFlags::INLINE),
    ("value", ModifierFlags::VALUE),
    ("suspend", ModifierFlags::SUSPEND),
    ("companion", ModifierFlags::COMPANION),
    ("const", ModifierFlags::CONST),
    ("data", ModifierFlags::DATA),
    ("expect", ModifierFlags::EXPECT),
    ("actual", ModifierFlags::ACTUAL),
];

impl ModifierFlags {
    /// Looks up the flag for a modifier keyword; visibility keywords are not flags
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(name, _)| *name == keyword)
            .map(|(_, flag)| *flag)
    }
}

/// Where the element owning a modifier set sits, for the implied-modifier rules of
/// [`ModifierSet::equivalent_to`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EquivalenceContext {
    /// Compare with [`COMPAT_EQUIVALENCE_MASK`] instead of [`EQUIVALENCE_MASK`]
    pub include_synchronized: bool,
    /// The owner is a method whose containing class is final
    pub method_in_final_class: bool,
    /// The owner is a method whose containing class is deprecated
    pub method_in_deprecated_class: bool,
}

impl EquivalenceContext {
    /// A context for an owner without a containing class
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            include_synchronized: config.compatibility.include_synchronized,
            ..Self::default()
        }
    }

    /// The mask selecting the significant bits
    #[must_use]
    pub fn mask(&self) -> ModifierFlags {
        if self.include_synchronized {
            COMPAT_EQUIVALENCE_MASK
        } else {
            EQUIVALENCE_MASK
        }
    }
}

/// The visibility, modifiers and annotations of one API element
#[derive(Debug, Clone, Default)]
pub struct ModifierSet {
    flags: ModifierFlags,
    annotations: Vec<AnnotationModel>,
}

impl ModifierSet {
    /// Creates an empty set with the given visibility
    #[must_use]
    pub fn new(visibility: VisibilityLevel) -> Self {
        let mut set = Self::default();
        set.set_visibility(visibility);
        set
    }

    /// Creates a set from raw flags.
    ///
    /// # Panics
    ///
    /// Panics if the visibility bits of `flags` hold no valid visibility.
    #[must_use]
    pub fn from_flags(flags: ModifierFlags) -> Self {
        let _ = VisibilityLevel::from_flag_value(flags.bits());
        Self {
            flags,
            annotations: Vec::new(),
        }
    }

    /// Parses space separated modifier keywords, such as `public static final`.
    ///
    /// Unknown words are ignored; a missing visibility keyword means package private.
    #[must_use]
    pub fn from_keywords(keywords: &str) -> Self {
        let mut set = Self::default();
        for word in keywords.split_whitespace() {
            if let Some(visibility) = VisibilityLevel::from_modifier(word) {
                set.set_visibility(visibility);
            } else if let Some(flag) = ModifierFlags::from_keyword(word) {
                set.flags.insert(flag);
            }
        }
        set
    }

    /// The raw flags
    #[must_use]
    pub fn flags(&self) -> ModifierFlags {
        self.flags
    }

    /// The visibility stored in the flags
    #[must_use]
    pub fn visibility(&self) -> VisibilityLevel {
        VisibilityLevel::from_flag_value(self.flags.bits())
    }

    /// Replaces the visibility
    pub fn set_visibility(&mut self, visibility: VisibilityLevel) {
        self.flags = ModifierFlags::from_bits_retain(
            (self.flags.bits() & !VISIBILITY_MASK) | visibility.flag_value(),
        );
    }

    /// Returns true if all of `flags` are set
    #[must_use]
    pub fn has(&self, flags: ModifierFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Sets or clears `flags`
    pub fn set(&mut self, flags: ModifierFlags, value: bool) {
        self.flags.set(flags.difference(ModifierFlags::VISIBILITY), value);
    }

    /// Returns true for public elements
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility() == VisibilityLevel::Public
    }

    /// Returns true for protected elements
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.visibility() == VisibilityLevel::Protected
    }

    /// Returns true for package private elements
    #[must_use]
    pub fn is_package_private(&self) -> bool {
        self.visibility() == VisibilityLevel::PackagePrivate
    }

    /// Returns true for private elements
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.visibility() == VisibilityLevel::Private
    }

    /// Returns true for `static` elements
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.has(ModifierFlags::STATIC)
    }

    /// Returns true for `abstract` elements
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.has(ModifierFlags::ABSTRACT)
    }

    /// Returns true for `final` elements
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.has(ModifierFlags::FINAL)
    }

    /// Returns true if the element is deprecated
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.has(ModifierFlags::DEPRECATED)
    }

    /// The annotations in the order they were added
    #[must_use]
    pub fn annotations(&self) -> &[AnnotationModel] {
        &self.annotations
    }

    /// Attaches an annotation; a deprecation annotation also sets [`ModifierFlags::DEPRECATED`]
    pub fn add_annotation(&mut self, annotation: AnnotationModel) {
        if annotation.is_deprecated() {
            self.flags.insert(ModifierFlags::DEPRECATED);
        }
        self.annotations.push(annotation);
    }

    /// Parses and attaches an annotation, keeping its name as written
    pub fn add_annotation_source(&mut self, source: &str) {
        self.add_annotation(AnnotationModel::parse_unmapped(source));
    }

    /// Parses and attaches annotations, mapping their names through `mapper`
    pub fn add_annotations<'s>(
        &mut self,
        sources: impl IntoIterator<Item = &'s str>,
        mapper: &NameMapper<'_>,
    ) {
        for source in sources {
            self.add_annotation(AnnotationModel::parse(source, mapper));
        }
    }

    /// Removes every annotation matching `predicate`, returning how many were removed
    pub fn remove_annotations(&mut self, predicate: impl Fn(&AnnotationModel) -> bool) -> usize {
        let before = self.annotations.len();
        self.annotations.retain(|annotation| !predicate(annotation));
        before - self.annotations.len()
    }

    /// Finds an annotation by its canonical name
    #[must_use]
    pub fn find_annotation(&self, qualified_name: &str) -> Option<&AnnotationModel> {
        self.annotations
            .iter()
            .find(|annotation| annotation.qualified_name.as_deref() == Some(qualified_name))
    }

    /// Returns true if any annotation satisfies `predicate`
    pub fn has_annotation(&self, predicate: impl Fn(&AnnotationModel) -> bool) -> bool {
        self.annotations.iter().any(predicate)
    }

    /// Returns true if a nullness annotation is attached
    #[must_use]
    pub fn has_nullness_annotation(&self) -> bool {
        self.has_annotation(AnnotationModel::is_nullness)
    }

    /// Compares the API significant modifiers of two sets.
    ///
    /// Bits outside the context's mask are ignored. A difference in `final` alone is not
    /// significant if this set is final and the owner is a method of a final class; the same
    /// holds for `deprecated` and a deprecated class.
    #[must_use]
    pub fn equivalent_to(&self, other: &ModifierSet, context: &EquivalenceContext) -> bool {
        let mask = context.mask();
        let difference = (self.flags & mask) ^ (other.flags & mask);

        if difference.is_empty() {
            return true;
        }
        if difference == ModifierFlags::FINAL {
            return self.is_final() && context.method_in_final_class;
        }
        if difference == ModifierFlags::DEPRECATED {
            return self.is_deprecated() && context.method_in_deprecated_class;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn visibility_bits() {
        for level in VisibilityLevel::iter() {
            let mut set = ModifierSet::from_keywords("static final");
            set.set_visibility(level);
            assert_eq!(set.visibility(), level);
            assert!(set.is_static() && set.is_final());
        }
        assert!(ModifierSet::default().is_package_private());
    }

    #[test]
    fn set_does_not_touch_visibility() {
        let mut set = ModifierSet::new(VisibilityLevel::Protected);
        set.set(ModifierFlags::all(), true);
        assert!(set.is_protected());
        set.set(ModifierFlags::all(), false);
        assert!(set.is_protected());
        assert_eq!(set.flags(), ModifierFlags::from_bits_retain(2));
    }

    #[test]
    fn keywords() {
        let set = ModifierSet::from_keywords("protected abstract synchronized bogus");
        assert!(set.is_protected());
        assert!(set.is_abstract());
        assert!(set.has(ModifierFlags::SYNCHRONIZED));
        assert_eq!(ModifierFlags::from_keyword("public"), None);
    }

    #[test]
    #[should_panic(expected = "unknown value")]
    fn corrupted_visibility_panics() {
        let _ = ModifierSet::from_flags(ModifierFlags::from_bits_retain(6));
    }

    #[test]
    fn equivalence_is_reflexive() {
        let context = EquivalenceContext::default();
        for keywords in ["", "public static final", "private native", "protected deprecated"] {
            let set = ModifierSet::from_keywords(keywords);
            assert!(set.equivalent_to(&set, &context), "{keywords}");
        }
        let all = ModifierSet::from_flags(ModifierFlags::all().difference(ModifierFlags::VISIBILITY));
        assert!(all.equivalent_to(&all, &context));
    }

    #[test]
    fn equivalence_masks() {
        let context = EquivalenceContext::default();
        let plain = ModifierSet::from_keywords("public");
        let native = ModifierSet::from_keywords("public native");
        let synchronized = ModifierSet::from_keywords("public synchronized");
        assert!(plain.equivalent_to(&native, &context));
        assert!(plain.equivalent_to(&synchronized, &context));

        let legacy = EquivalenceContext::new(&Config::legacy());
        assert!(!plain.equivalent_to(&synchronized, &legacy));
        assert!(!plain.equivalent_to(&ModifierSet::from_keywords("protected"), &context));
        assert!(COMPAT_EQUIVALENCE_MASK.contains(EQUIVALENCE_MASK));
    }

    #[test]
    fn implied_final_and_deprecated() {
        let plain = ModifierSet::from_keywords("public");
        let final_method = ModifierSet::from_keywords("public final");
        let deprecated = ModifierSet::from_keywords("public deprecated");

        let in_final_class = EquivalenceContext {
            method_in_final_class: true,
            ..EquivalenceContext::default()
        };
        assert!(final_method.equivalent_to(&plain, &in_final_class));
        assert!(!plain.equivalent_to(&final_method, &in_final_class));
        assert!(!final_method.equivalent_to(&plain, &EquivalenceContext::default()));

        let in_deprecated_class = EquivalenceContext {
            method_in_deprecated_class: true,
            ..EquivalenceContext::default()
        };
        assert!(deprecated.equivalent_to(&plain, &in_deprecated_class));
        assert!(!deprecated.equivalent_to(&final_method, &in_deprecated_class));
    }

    #[test]
    fn annotations_keep_insertion_order() {
        let config = Config::default();
        let mapper = NameMapper::new(&config);
        let mut set = ModifierSet::new(VisibilityLevel::Public);
        set.add_annotations(
            ["@java.lang.Deprecated", "@android.support.annotation.UiThread", "@a.B"],
            &mapper,
        );

        let names: Vec<_> = set.annotations().iter().map(AnnotationModel::name).collect();
        assert_eq!(names, ["java.lang.Deprecated", "androidx.annotation.UiThread", "a.B"]);
        assert!(set.is_deprecated());
        assert!(set.find_annotation("androidx.annotation.UiThread").is_some());
        assert!(!set.has_nullness_annotation());

        assert_eq!(set.remove_annotations(|annotation| annotation.name() == "a.B"), 1);
        assert_eq!(set.annotations().len(), 2);
    }
}
