//! Rendering of modifier sets as source text.
//!
//! Two token orders are supported. The default one follows the Java language specification
//! (visibility, `abstract`, `default`, `static`, `final`, ...). The legacy order reproduces
//! signature files of the old doc tool (visibility, `static`, `final`, `abstract`, ...) and is
//! selected by `CompatibilityConfig::legacy_modifier_order`. Both orders emit the same tokens
//! for the same set; only their sequence differs.
//!
//! # Example
//!
//! ```rust
//! use apiscope::model::{
//!     AnnotationTarget, ElementKind, ModifierSet, TextCodebase, WriteContext,
//! };
//!
//! let codebase = TextCodebase::new("api.txt");
//! let modifiers = ModifierSet::from_keywords("final public static");
//! let context = WriteContext::new(&codebase, AnnotationTarget::SignatureFile, ElementKind::Field);
//!
//! assert_eq!(modifiers.write(&context), "public static final ");
//! ```

use crate::{
    model::{
        annotations::{AnnotationModel, AnnotationTarget, AnnotationTargets, NameMapper},
        modifiers::{ModifierFlags, ModifierSet},
        visibility::VisibilityLevel,
        ClassKind, Codebase,
    },
    TypedefMode,
};

/// The kind of element a modifier set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A package; only annotations are written
    Package,
    /// A class of the given kind
    Class(ClassKind),
    /// A constructor
    Constructor,
    /// A method, possibly declared in an interface
    Method {
        /// The containing class is an interface or annotation type
        in_interface: bool,
    },
    /// A field or enum constant
    Field,
    /// A Kotlin property
    Property,
    /// A method parameter
    Parameter,
}

impl ElementKind {
    fn is_enum_class(self) -> bool {
        matches!(self, ElementKind::Class(ClassKind::Enum))
    }

    fn is_interface_like(self) -> bool {
        matches!(
            self,
            ElementKind::Class(ClassKind::Interface | ClassKind::AnnotationType)
                | ElementKind::Method { in_interface: true }
        )
    }
}

/// What to write, and for which output
#[derive(Clone, Copy)]
pub struct WriteContext<'a> {
    /// Codebase used to resolve annotation targets and typedefs
    pub codebase: &'a dyn Codebase,
    /// The output being written
    pub target: AnnotationTarget,
    /// The element owning the modifiers
    pub element: ElementKind,
    /// Write annotations before the modifiers
    pub include_annotations: bool,
    /// Write deprecation, as `@Deprecated` or as the legacy `deprecated` token
    pub include_deprecated: bool,
    /// Leave out nullness annotations
    pub skip_nullness: bool,
    /// Put every annotation on its own line instead of separating with spaces
    pub separate_lines: bool,
}

impl<'a> WriteContext<'a> {
    /// Creates a context writing annotations and deprecation, separated by spaces
    #[must_use]
    pub fn new(codebase: &'a dyn Codebase, target: AnnotationTarget, element: ElementKind) -> Self {
        Self {
            codebase,
            target,
            element,
            include_annotations: true,
            include_deprecated: true,
            skip_nullness: false,
            separate_lines: false,
        }
    }

    /// Disables annotation output
    #[must_use]
    pub fn without_annotations(mut self) -> Self {
        self.include_annotations = false;
        self
    }

    /// Disables nullness annotation output
    #[must_use]
    pub fn without_nullness(mut self) -> Self {
        self.skip_nullness = true;
        self
    }

    /// Writes every annotation on its own line
    #[must_use]
    pub fn with_separate_lines(mut self) -> Self {
        self.separate_lines = true;
        self
    }

    fn separator(&self) -> &'static str {
        if self.separate_lines {
            "\n"
        } else {
            " "
        }
    }

    fn typedef_mode(&self) -> TypedefMode {
        let config = self.codebase.config();
        if self.target == AnnotationTarget::SignatureFile {
            config.compatibility.typedefs_in_signatures
        } else {
            config.typedef_mode
        }
    }
}

impl ModifierSet {
    /// Renders annotations and modifiers; every token is followed by a separator
    #[must_use]
    pub fn write(&self, context: &WriteContext<'_>) -> String {
        let mut out = String::new();
        self.write_to(&mut out, context);
        out
    }

    /// Appends the rendering of [`ModifierSet::write`] to `out`
    pub fn write_to(&self, out: &mut String, context: &WriteContext<'_>) {
        if context.include_annotations {
            self.write_annotations(out, context);
        }
        if context.element == ElementKind::Package {
            return;
        }
        for token in self.modifier_tokens(context) {
            out.push_str(token);
            out.push(' ');
        }
    }

    /// The modifier keywords written for this set, in output order
    #[must_use]
    pub fn modifier_tokens(&self, context: &WriteContext<'_>) -> Vec<&'static str> {
        let compatibility = &context.codebase.config().compatibility;
        let element = context.element;
        let mut tokens = Vec::with_capacity(8);

        let visibility = self.visibility();
        if visibility != VisibilityLevel::PackagePrivate {
            tokens.push(visibility.java_modifier());
        }

        let write_static = self.is_static() && (compatibility.static_in_enums || !element.is_enum_class());
        let write_abstract = self.is_abstract()
            && !element.is_enum_class()
            && (compatibility.abstract_in_interfaces || !element.is_interface_like());
        let write_final = self.is_final() && !element.is_enum_class();
        let write_synchronized = self.has(ModifierFlags::SYNCHRONIZED)
            && (context.target.is_stubs_file()
                || (context.target == AnnotationTarget::SignatureFile
                    && compatibility.include_synchronized));
        let write_native = self.has(ModifierFlags::NATIVE) && context.target.is_stubs_file();
        let write_default = self.has(ModifierFlags::DEFAULT)
            && matches!(element, ElementKind::Method { .. });

        let mut push = |condition: bool, token: &'static str| {
            if condition {
                tokens.push(token);
            }
        };

        if compatibility.legacy_modifier_order {
            push(write_static, "static");
            push(write_final, "final");
            push(write_abstract, "abstract");
            push(write_default, "default");
            push(self.has(ModifierFlags::TRANSIENT), "transient");
            push(self.has(ModifierFlags::VOLATILE), "volatile");
            push(write_synchronized, "synchronized");
            push(write_native, "native");
            push(
                context.include_deprecated
                    && compatibility.deprecated_as_modifier
                    && self.is_deprecated(),
                "deprecated",
            );
            push(self.has(ModifierFlags::SEALED), "sealed");
            push(self.has(ModifierFlags::FUN), "fun");
            push(self.has(ModifierFlags::INFIX), "infix");
            push(self.has(ModifierFlags::OPERATOR), "operator");
            push(self.has(ModifierFlags::INLINE), "inline");
            push(self.has(ModifierFlags::VALUE), "value");
            push(self.has(ModifierFlags::SUSPEND), "suspend");
        } else {
            push(write_abstract, "abstract");
            push(write_default, "default");
            push(write_static, "static");
            push(write_final, "final");
            push(self.has(ModifierFlags::SEALED), "sealed");
            push(self.has(ModifierFlags::SUSPEND), "suspend");
            push(self.has(ModifierFlags::INLINE), "inline");
            push(self.has(ModifierFlags::VALUE), "value");
            push(self.has(ModifierFlags::INFIX), "infix");
            push(self.has(ModifierFlags::OPERATOR), "operator");
            push(self.has(ModifierFlags::TRANSIENT), "transient");
            push(self.has(ModifierFlags::VOLATILE), "volatile");
            push(write_synchronized, "synchronized");
            push(write_native, "native");
            push(self.has(ModifierFlags::FUN), "fun");
        }

        push(self.has(ModifierFlags::COMPANION), "companion");
        push(self.has(ModifierFlags::CONST), "const");
        push(self.has(ModifierFlags::DATA), "data");
        push(self.has(ModifierFlags::EXPECT), "expect");
        push(self.has(ModifierFlags::ACTUAL), "actual");

        tokens
    }

    /// Appends the annotations written for `context.target` to `out`.
    ///
    /// Deprecation comes first, as a single `@Deprecated`. The remaining annotations are
    /// sorted by name; those not targeting the output are skipped, as are nullness
    /// annotations when the context asks for it. Usages of typedef carriers are replaced by
    /// the typedef itself or shortened to a bare reference, depending on the typedef mode.
    pub fn write_annotations(&self, out: &mut String, context: &WriteContext<'_>) {
        let separator = context.separator();
        let compatibility = &context.codebase.config().compatibility;
        let deprecated_as_token =
            compatibility.legacy_modifier_order && compatibility.deprecated_as_modifier;

        if context.include_deprecated && self.is_deprecated() && !deprecated_as_token {
            out.push_str("@Deprecated");
            out.push_str(separator);
        }

        let mapper = NameMapper::for_codebase(context.codebase);
        let mut sorted: Vec<&AnnotationModel> = self.annotations().iter().collect();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));

        for annotation in sorted {
            if annotation.qualified_name.is_none() || annotation.is_deprecated() {
                continue;
            }
            let targets = annotation.targets(context.codebase);
            if !targets.includes(context.target) {
                continue;
            }
            if context.skip_nullness && annotation.is_nullness() {
                continue;
            }

            if let Some(source) = self.typedef_substitute(annotation, targets, context, &mapper) {
                out.push_str(&source);
                out.push_str(separator);
                continue;
            }

            if let Some(source) = annotation.to_source(context.target, &mapper) {
                out.push_str(&source);
                out.push_str(separator);
            }
        }
    }

    fn typedef_substitute(
        &self,
        annotation: &AnnotationModel,
        targets: AnnotationTargets,
        context: &WriteContext<'_>,
        mapper: &NameMapper<'_>,
    ) -> Option<String> {
        let mode = context.typedef_mode();
        if mode == TypedefMode::None {
            return None;
        }

        let class = context.codebase.find_class(annotation.name())?;
        let typedef = class.typedef_annotation()?;
        match mode {
            TypedefMode::Inline => typedef.to_source(context.target, mapper),
            TypedefMode::Reference if targets == AnnotationTargets::SIGNATURE_FILE => {
                Some(format!("@{}", class.simple_name))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ClassModel, TextCodebase},
        CompatibilityConfig, Config,
    };
    use std::sync::Arc;

    fn count(haystack: &str, token: &str) -> usize {
        haystack
            .split_whitespace()
            .filter(|word| *word == token)
            .count()
    }

    #[test]
    fn both_orders_write_each_token_once() {
        let modern = TextCodebase::new("modern");
        let legacy = TextCodebase::with_config("legacy", Arc::new(Config::legacy()));
        let set = ModifierSet::from_keywords("public static final");

        for codebase in [&modern, &legacy] {
            for element in [ElementKind::Field, ElementKind::Method { in_interface: false }] {
                let context = WriteContext::new(codebase, AnnotationTarget::SignatureFile, element);
                let written = set.write(&context);
                for token in ["public", "static", "final"] {
                    assert_eq!(count(&written, token), 1, "{token} in {written:?}");
                }
            }
        }
    }

    #[test]
    fn token_orders_differ() {
        let modern = TextCodebase::new("modern");
        let legacy = TextCodebase::with_config("legacy", Arc::new(Config::legacy()));
        let set = ModifierSet::from_keywords("protected abstract static");
        let element = ElementKind::Method { in_interface: false };

        assert_eq!(
            set.write(&WriteContext::new(&modern, AnnotationTarget::SignatureFile, element)),
            "protected abstract static "
        );
        assert_eq!(
            set.write(&WriteContext::new(&legacy, AnnotationTarget::SignatureFile, element)),
            "protected static abstract "
        );
    }

    #[test]
    fn implied_modifiers_are_gated() {
        let modern = TextCodebase::new("modern");
        let legacy = TextCodebase::with_config("legacy", Arc::new(Config::legacy()));

        let nested_enum = ModifierSet::from_keywords("public static final");
        let enum_kind = ElementKind::Class(ClassKind::Enum);
        assert_eq!(
            nested_enum.write(&WriteContext::new(&modern, AnnotationTarget::SignatureFile, enum_kind)),
            "public "
        );
        assert_eq!(
            nested_enum.write(&WriteContext::new(&legacy, AnnotationTarget::SignatureFile, enum_kind)),
            "public static "
        );

        let interface_method = ModifierSet::from_keywords("public abstract");
        let in_interface = ElementKind::Method { in_interface: true };
        assert_eq!(
            interface_method
                .write(&WriteContext::new(&modern, AnnotationTarget::SignatureFile, in_interface)),
            "public "
        );
        assert_eq!(
            interface_method
                .write(&WriteContext::new(&legacy, AnnotationTarget::SignatureFile, in_interface)),
            "public abstract "
        );
    }

    #[test]
    fn synchronized_and_native_by_target() {
        let modern = TextCodebase::new("modern");
        let legacy = TextCodebase::with_config("legacy", Arc::new(Config::legacy()));
        let set = ModifierSet::from_keywords("synchronized native");
        let method = ElementKind::Method { in_interface: false };

        assert_eq!(
            set.write(&WriteContext::new(&modern, AnnotationTarget::SignatureFile, method)),
            ""
        );
        assert_eq!(
            set.write(&WriteContext::new(&modern, AnnotationTarget::SdkStubsFile, method)),
            "synchronized native "
        );
        assert_eq!(
            set.write(&WriteContext::new(&legacy, AnnotationTarget::SignatureFile, method)),
            "synchronized "
        );
    }

    #[test]
    fn annotations_sorted_with_deprecation_first() {
        let codebase = TextCodebase::new("test");
        let mapper = codebase.name_mapper();
        let mut set = ModifierSet::new(VisibilityLevel::Public);
        set.add_annotations(
            [
                "@androidx.annotation.UiThread",
                "@java.lang.Deprecated",
                "@androidx.annotation.IntRange(from=0)",
                "@java.lang.Override",
            ],
            &mapper,
        );

        let context = WriteContext::new(&codebase, AnnotationTarget::SignatureFile, ElementKind::Field);
        assert_eq!(
            set.write(&context),
            "@Deprecated @androidx.annotation.IntRange(from=0) @androidx.annotation.UiThread public "
        );

        let stubs = WriteContext::new(&codebase, AnnotationTarget::SdkStubsFile, ElementKind::Field)
            .with_separate_lines();
        assert_eq!(set.write(&stubs), "@Deprecated\npublic ");
    }

    #[test]
    fn legacy_deprecated_token() {
        let codebase = TextCodebase::with_config("legacy", Arc::new(Config::legacy()));
        let mut set = ModifierSet::new(VisibilityLevel::Public);
        set.add_annotation_source("@java.lang.Deprecated");
        let context = WriteContext::new(&codebase, AnnotationTarget::SignatureFile, ElementKind::Field);
        assert_eq!(set.write(&context), "public deprecated ");
    }

    #[test]
    fn nullness_can_be_skipped() {
        let codebase = TextCodebase::new("test");
        let mut set = ModifierSet::new(VisibilityLevel::PackagePrivate);
        set.add_annotations(["@androidx.annotation.Nullable"], &codebase.name_mapper());

        let context = WriteContext::new(&codebase, AnnotationTarget::SdkStubsFile, ElementKind::Parameter);
        assert_eq!(set.write(&context), "@android.annotation.Nullable ");
        assert_eq!(set.write(&context.without_nullness()), "");
        assert_eq!(set.write(&context.without_annotations()), "");
    }

    #[test]
    fn package_writes_annotations_only() {
        let codebase = TextCodebase::new("test");
        let mut set = ModifierSet::new(VisibilityLevel::Public);
        set.add_annotation_source("@java.lang.Deprecated");
        let context = WriteContext::new(&codebase, AnnotationTarget::SignatureFile, ElementKind::Package);
        assert_eq!(set.write(&context), "@Deprecated ");
    }

    fn typedef_codebase(config: Config) -> TextCodebase {
        let codebase = TextCodebase::with_config("typedefs", Arc::new(config));
        let mut modifiers = ModifierSet::new(VisibilityLevel::PackagePrivate);
        modifiers.add_annotation_source("@androidx.annotation.IntDef({1, 2})");
        codebase
            .add_class(
                ClassModel::builder("com.example.Mode")
                    .kind(ClassKind::AnnotationType)
                    .modifiers(modifiers)
                    .build(),
            )
            .unwrap();
        codebase
    }

    #[test]
    fn typedef_usages() {
        let compatibility = CompatibilityConfig {
            typedefs_in_signatures: TypedefMode::Reference,
            ..CompatibilityConfig::default()
        };
        let codebase = typedef_codebase(
            Config::default()
                .with_typedef_mode(TypedefMode::Inline)
                .with_compatibility(compatibility),
        );
        let mut set = ModifierSet::new(VisibilityLevel::PackagePrivate);
        set.add_annotations(["@com.example.Mode"], &codebase.name_mapper());

        let signature = WriteContext::new(&codebase, AnnotationTarget::SignatureFile, ElementKind::Parameter);
        assert_eq!(set.write(&signature), "@Mode ");

        // The carrier is hidden, so it never reaches the stubs
        let stubs = WriteContext::new(&codebase, AnnotationTarget::SdkStubsFile, ElementKind::Parameter);
        assert_eq!(set.write(&stubs), "");
    }

    #[test]
    fn typedef_inline_in_signature() {
        let compatibility = CompatibilityConfig {
            typedefs_in_signatures: TypedefMode::Inline,
            ..CompatibilityConfig::default()
        };
        let codebase = typedef_codebase(
            Config::default()
                .with_typedef_mode(TypedefMode::Inline)
                .with_compatibility(compatibility),
        );
        let mut set = ModifierSet::new(VisibilityLevel::PackagePrivate);
        set.add_annotations(["@com.example.Mode"], &codebase.name_mapper());

        let signature = WriteContext::new(&codebase, AnnotationTarget::SignatureFile, ElementKind::Parameter);
        assert_eq!(set.write(&signature), "@androidx.annotation.IntDef({1, 2}) ");
    }
}
