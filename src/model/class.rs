//! Classes of an API surface.
//!
//! A [`ClassModel`] is created once, either from a declaration or as a stub for a type that is
//! referenced but not declared, and is shared as [`ClassRc`]. Members and nested classes are
//! owned by their class; back references (a member's class, a nested class's outer class) are
//! weak [`ClassRef`]s, so dropping the codebase frees the whole graph.
//!
//! The few values derived from a class's declaration (type parameter list, retention) are
//! computed on first use and cached in `OnceLock` cells.

use std::{
    fmt,
    sync::{Arc, OnceLock, Weak},
};

use crate::model::{
    annotations::{AnnotationModel, Retention},
    members::{FieldRc, MethodRc, PropertyRc},
    modifiers::ModifierSet,
    type_parameters::{erased_name, TypeParameterList},
    Codebase,
};

/// A shared class
pub type ClassRc = Arc<ClassModel>;
/// A list of shared classes
pub type ClassList = Arc<boxcar::Vec<ClassRc>>;

/// A weak reference to a class
#[derive(Clone)]
pub struct ClassRef {
    weak_ref: Weak<ClassModel>,
}

impl ClassRef {
    /// Create a new `ClassRef` from a strong reference
    #[must_use]
    pub fn new(strong_ref: &ClassRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the class, returning None if the class has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<ClassRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced class is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the qualified name of the referenced class (if still alive)
    #[must_use]
    pub fn qualified_name(&self) -> Option<String> {
        self.upgrade().map(|class| class.qualified_name.clone())
    }
}

impl From<&ClassRc> for ClassRef {
    fn from(strong_ref: &ClassRc) -> Self {
        ClassRef::new(strong_ref)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(class) => write!(f, "ClassRef({})", class.qualified_name),
            None => f.write_str("ClassRef(<dropped>)"),
        }
    }
}

/// The kind of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    /// A plain class
    #[default]
    Class,
    /// An interface
    Interface,
    /// An enum
    Enum,
    /// An annotation type (`@interface`)
    AnnotationType,
}

impl ClassKind {
    /// The declaration keyword
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::AnnotationType => "@interface",
        }
    }

    /// Parses a declaration keyword
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "enum" => Some(ClassKind::Enum),
            "@interface" => Some(ClassKind::AnnotationType),
            _ => None,
        }
    }
}

/// Splits a qualified name into package and nested class name.
///
/// Without further information the first segment starting with an uppercase letter is taken
/// as the outermost class, e.g. `android.app.Notification.Builder` yields
/// `("android.app", "Notification.Builder")`.
#[must_use]
pub fn split_qualified_name(qualified_name: &str) -> (&str, &str) {
    let mut offset = 0;
    for segment in qualified_name.split('.') {
        if segment.chars().next().is_some_and(char::is_uppercase) {
            return match offset {
                0 => ("", qualified_name),
                _ => (&qualified_name[..offset - 1], &qualified_name[offset..]),
            };
        }
        offset += segment.len() + 1;
    }

    match qualified_name.rfind('.') {
        Some(dot) => (&qualified_name[..dot], &qualified_name[dot + 1..]),
        None => ("", qualified_name),
    }
}

/// A class, interface, enum or annotation type
#[derive(Debug)]
pub struct ClassModel {
    /// Unique key, e.g. `android.app.Notification.Builder`
    pub qualified_name: String,
    /// Innermost name, e.g. `Builder`
    pub simple_name: String,
    /// Dotted nested name without the package, e.g. `Notification.Builder`
    pub full_name: String,
    /// The containing package, e.g. `android.app`
    pub package_name: String,
    /// Class, interface, enum or annotation type
    pub kind: ClassKind,
    /// Visibility, modifiers and annotations
    pub modifiers: ModifierSet,
    /// False for stubs created for referenced but undeclared types
    pub emit: bool,
    /// The `extends` type as written, with type arguments
    pub super_class_type: Option<String>,
    /// The `implements` types as written, in order
    pub interface_types: Vec<String>,
    /// Constructors, in declaration order
    pub constructors: boxcar::Vec<MethodRc>,
    /// Methods, in declaration order
    pub methods: boxcar::Vec<MethodRc>,
    /// Fields and enum constants, in declaration order
    pub fields: boxcar::Vec<FieldRc>,
    /// Kotlin properties, in declaration order
    pub properties: boxcar::Vec<PropertyRc>,
    /// Classes declared inside this one
    pub nested_classes: ClassList,
    containing_class: Option<ClassRef>,
    type_parameters: Option<String>,
    type_parameter_list: OnceLock<TypeParameterList>,
    retention: OnceLock<Retention>,
}

impl ClassModel {
    /// Starts building a class with the given qualified name
    #[must_use]
    pub fn builder(qualified_name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(qualified_name.into())
    }

    /// Creates the placeholder for a referenced but undeclared class
    #[must_use]
    pub fn stub(qualified_name: &str) -> Self {
        ClassModel::builder(qualified_name).stub().build()
    }

    /// Returns true for interfaces (annotation types included)
    #[must_use]
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::AnnotationType)
    }

    /// Returns true for enums
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    /// Returns true for annotation types
    #[must_use]
    pub fn is_annotation_type(&self) -> bool {
        self.kind == ClassKind::AnnotationType
    }

    /// Returns true if the class is declared inside another class
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.containing_class.is_some()
    }

    /// The class this one is declared in
    #[must_use]
    pub fn containing_class(&self) -> Option<ClassRc> {
        self.containing_class.as_ref().and_then(ClassRef::upgrade)
    }

    /// The outermost class containing this one, or this class's name if it is top-level
    #[must_use]
    pub fn top_level_name(&self) -> String {
        match self.containing_class() {
            Some(outer) => outer.top_level_name(),
            None => self.qualified_name.clone(),
        }
    }

    /// Returns true if the class is deprecated
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.modifiers.is_deprecated()
    }

    /// The superclass, resolved in `codebase`; stubbed if not declared there
    pub fn super_class(&self, codebase: &dyn Codebase) -> Option<ClassRc> {
        self.super_class_type
            .as_deref()
            .map(|name| codebase.find_or_create_class(erased_name(name)))
    }

    /// The implemented interfaces in order, resolved in `codebase`
    pub fn interfaces(&self, codebase: &dyn Codebase) -> Vec<ClassRc> {
        self.interface_types
            .iter()
            .map(|name| codebase.find_or_create_class(erased_name(name)))
            .collect()
    }

    /// The type parameter list, parsed on first use
    pub fn type_parameter_list(&self) -> &TypeParameterList {
        self.type_parameter_list.get_or_init(|| {
            self.type_parameters
                .as_deref()
                .map(TypeParameterList::parse)
                .unwrap_or_default()
        })
    }

    /// Finds a method by name and erased parameter types
    #[must_use]
    pub fn find_method(&self, name: &str, parameter_types: &[&str]) -> Option<MethodRc> {
        let candidates = if name == self.simple_name {
            &self.constructors
        } else {
            &self.methods
        };
        candidates
            .iter()
            .map(|(_, method)| method)
            .find(|method| method.name == name && method.matches_parameters(parameter_types))
            .cloned()
    }

    /// Finds a field by name
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<FieldRc> {
        self.fields
            .iter()
            .map(|(_, field)| field)
            .find(|field| field.name == name)
            .cloned()
    }

    /// Finds a property by name
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<PropertyRc> {
        self.properties
            .iter()
            .map(|(_, property)| property)
            .find(|property| property.name == name)
            .cloned()
    }

    /// The nested classes, in declaration order
    #[must_use]
    pub fn nested(&self) -> Vec<ClassRc> {
        self.nested_classes.iter().map(|(_, class)| class.clone()).collect()
    }

    /// Returns true if the class is part of the API of `codebase`.
    ///
    /// Stubs never are. A show annotation includes the class, a hide annotation excludes
    /// it; otherwise its visibility must reach the documentation level and its containing
    /// class must be part of the API. An annotation whose own class carries a hide
    /// meta-annotation counts as a hide annotation.
    #[must_use]
    pub fn is_api(&self, codebase: &dyn Codebase) -> bool {
        if !self.emit {
            return false;
        }
        let config = codebase.config();
        if self
            .modifiers
            .has_annotation(|annotation| annotation.is_show_annotation(config))
        {
            return true;
        }
        if self
            .modifiers
            .has_annotation(|annotation| hides(annotation, codebase))
        {
            return false;
        }
        if !self
            .modifiers
            .visibility()
            .as_accessible_as(config.doc_level.min_visibility())
        {
            return false;
        }
        self.containing_class()
            .map_or(true, |outer| outer.is_api(codebase))
    }

    /// The retention of an annotation type, from its `@Retention` meta-annotation.
    ///
    /// Defaults to class retention, like the Java compiler. Resolved on first use.
    pub fn retention(&self) -> Retention {
        *self.retention.get_or_init(|| {
            let retention = self
                .modifiers
                .annotations()
                .iter()
                .find_map(AnnotationModel::retention_value)
                .unwrap_or(Retention::Class);
            log::debug!("retention of {} is {retention:?}", self.qualified_name);
            retention
        })
    }

    /// The `@IntDef`, `@StringDef` or `@LongDef` annotation of a typedef annotation type
    #[must_use]
    pub fn typedef_annotation(&self) -> Option<&AnnotationModel> {
        self.modifiers
            .annotations()
            .iter()
            .find(|annotation| annotation.is_typedef())
    }

    /// Number of constructors, methods, fields and properties
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.constructors.count()
            + self.methods.count()
            + self.fields.count()
            + self.properties.count()
    }

    /// All annotations on the class and its members
    pub fn all_annotations(&self) -> Vec<&AnnotationModel> {
        let mut annotations: Vec<&AnnotationModel> =
            self.modifiers.annotations().iter().collect();
        for (_, method) in self.constructors.iter().chain(self.methods.iter()) {
            annotations.extend(method.modifiers.annotations());
            for parameter in &method.parameters {
                annotations.extend(parameter.modifiers.annotations());
            }
        }
        for (_, field) in self.fields.iter() {
            annotations.extend(field.modifiers.annotations());
        }
        for (_, property) in self.properties.iter() {
            annotations.extend(property.modifiers.annotations());
        }
        annotations
    }
}

impl fmt::Display for ClassModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.kind.keyword(),
            self.qualified_name,
            self.type_parameter_list()
        )
    }
}

/// Builder for [`ClassModel`]
#[derive(Debug)]
pub struct ClassBuilder {
    qualified_name: String,
    package_name: Option<String>,
    kind: ClassKind,
    modifiers: ModifierSet,
    emit: bool,
    super_class_type: Option<String>,
    interface_types: Vec<String>,
    type_parameters: Option<String>,
    containing_class: Option<ClassRc>,
}

impl ClassBuilder {
    fn new(qualified_name: String) -> Self {
        Self {
            qualified_name,
            package_name: None,
            kind: ClassKind::Class,
            modifiers: ModifierSet::default(),
            emit: true,
            super_class_type: None,
            interface_types: Vec::new(),
            type_parameters: None,
            containing_class: None,
        }
    }

    /// Sets the kind
    #[must_use]
    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the modifiers
    #[must_use]
    pub fn modifiers(mut self, modifiers: ModifierSet) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the package explicitly instead of guessing it from the name
    #[must_use]
    pub fn package(mut self, package_name: impl Into<String>) -> Self {
        self.package_name = Some(package_name.into());
        self
    }

    /// Sets the `extends` type
    #[must_use]
    pub fn extends(mut self, super_class_type: impl Into<String>) -> Self {
        self.super_class_type = Some(super_class_type.into());
        self
    }

    /// Adds an `implements` type
    #[must_use]
    pub fn implements(mut self, interface_type: impl Into<String>) -> Self {
        self.interface_types.push(interface_type.into());
        self
    }

    /// Sets the raw type parameter list, e.g. `<T extends Foo>`
    #[must_use]
    pub fn type_parameters(mut self, source: impl Into<String>) -> Self {
        self.type_parameters = Some(source.into());
        self
    }

    /// Declares the class inside `outer`
    #[must_use]
    pub fn containing_class(mut self, outer: &ClassRc) -> Self {
        self.containing_class = Some(outer.clone());
        self
    }

    /// Marks the class as a stub that is not written out
    #[must_use]
    pub fn stub(mut self) -> Self {
        self.emit = false;
        self
    }

    /// Builds the class
    #[must_use]
    pub fn build(self) -> ClassModel {
        let qualified_name = self.qualified_name;
        let simple_name = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&qualified_name)
            .to_string();

        let (package_name, full_name) = match (&self.containing_class, self.package_name) {
            (Some(outer), _) => (
                outer.package_name.clone(),
                format!("{}.{simple_name}", outer.full_name),
            ),
            (None, Some(package)) => {
                let full_name = qualified_name
                    .strip_prefix(package.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
                    .unwrap_or(&qualified_name)
                    .to_string();
                (package, full_name)
            }
            (None, None) => {
                let (package, full_name) = split_qualified_name(&qualified_name);
                (package.to_string(), full_name.to_string())
            }
        };

        ClassModel {
            simple_name,
            full_name,
            package_name,
            kind: self.kind,
            modifiers: self.modifiers,
            emit: self.emit,
            super_class_type: self.super_class_type,
            interface_types: self.interface_types,
            constructors: boxcar::Vec::new(),
            methods: boxcar::Vec::new(),
            fields: boxcar::Vec::new(),
            properties: boxcar::Vec::new(),
            nested_classes: Arc::new(boxcar::Vec::new()),
            containing_class: self.containing_class.as_ref().map(ClassRef::new),
            type_parameters: self.type_parameters,
            type_parameter_list: OnceLock::new(),
            retention: OnceLock::new(),
            qualified_name,
        }
    }
}

fn hides(annotation: &AnnotationModel, codebase: &dyn Codebase) -> bool {
    let config = codebase.config();
    if annotation.is_hide_annotation(config) {
        return true;
    }
    if config.hide_meta_annotations.is_empty() {
        return false;
    }
    annotation
        .qualified_name
        .as_deref()
        .and_then(|name| codebase.find_class(name))
        .is_some_and(|class| {
            class
                .modifiers
                .has_annotation(|meta| meta.is_hide_meta_annotation(config))
        })
}
