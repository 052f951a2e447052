//! Constructors, methods, fields, properties and parameters.
//!
//! Members are owned by their class and hold a weak reference back to it. Method equality is
//! structural (name, containing class and parameter types), field and property equality is by
//! name and containing class, so a member duplicated into a subclass compares unequal to its
//! origin while [`MethodModel::inherited_from`] still leads back to it.

use std::{
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock},
};

use crate::model::{
    annotations::NameMapper,
    class::{ClassRc, ClassRef},
    modifiers::{EquivalenceContext, ModifierFlags, ModifierSet},
    type_parameters::{erased_name, TypeParameterList},
    VisibilityLevel,
};
use crate::Config;

/// A shared method or constructor
pub type MethodRc = Arc<MethodModel>;
/// A shared field
pub type FieldRc = Arc<FieldModel>;
/// A shared property
pub type PropertyRc = Arc<PropertyModel>;

/// Splits `source` into whitespace separated tokens, keeping bracketed and quoted text together
fn split_tokens(source: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut start: Option<usize> = None;

    for (index, c) in source.char_indices() {
        if in_string {
            if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                start.get_or_insert(index);
            }
            '<' | '(' | '{' => {
                depth += 1;
                start.get_or_insert(index);
            }
            '>' | ')' | '}' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(index);
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(begin) = start.take() {
                    tokens.push(&source[begin..index]);
                }
            }
            _ => {
                start.get_or_insert(index);
            }
        }
    }
    if let Some(begin) = start {
        tokens.push(&source[begin..]);
    }
    tokens
}

/// Splits a parenthesized parameter list at top-level commas
fn split_parameters(source: &str) -> Vec<&str> {
    let source = source.trim();
    let inner = source
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(source);

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut start = 0;
    for (index, c) in inner.char_indices() {
        if in_string {
            in_string = c != '"';
            continue;
        }
        match c {
            '"' => in_string = true,
            '<' | '(' | '{' => depth += 1,
            '>' | ')' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&inner[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&inner[start..]);
    parts.into_iter().filter(|part| !part.trim().is_empty()).collect()
}

/// One method or constructor parameter
#[derive(Debug, Clone)]
pub struct ParameterModel {
    /// Zero based position
    pub index: usize,
    /// The name, if the signature carries one
    pub name: Option<String>,
    /// The type as written, e.g. `java.lang.String...`
    pub type_name: String,
    /// Annotations and modifiers of the parameter
    pub modifiers: ModifierSet,
}

impl ParameterModel {
    /// Parses one parameter such as `@Nullable java.util.List<T> items`
    #[must_use]
    pub fn parse(index: usize, source: &str, mapper: &NameMapper<'_>) -> Self {
        let mut modifiers = ModifierSet::default();
        let mut words = Vec::new();
        for token in split_tokens(source) {
            if token.starts_with('@') {
                modifiers.add_annotations([token], mapper);
                continue;
            }
            // Keywords only lead the type; `data` or `value` after it is a name
            if words.is_empty() {
                if let Some(flag) = ModifierFlags::from_keyword(token) {
                    modifiers.set(flag, true);
                    continue;
                }
            }
            words.push(token);
        }

        let (type_name, name) = match words.as_slice() {
            [] => (String::new(), None),
            [type_name] => ((*type_name).to_string(), None),
            [type_words @ .., name] => (type_words.join(" "), Some((*name).to_string())),
        };

        Self {
            index,
            name,
            type_name,
            modifiers,
        }
    }

    /// Returns true for a trailing `...` parameter
    #[must_use]
    pub fn is_varargs(&self) -> bool {
        self.type_name.ends_with("...")
    }
}

/// A method or constructor
#[derive(Debug)]
pub struct MethodModel {
    /// The method name; the simple class name for constructors
    pub name: String,
    /// Visibility, modifiers and annotations
    pub modifiers: ModifierSet,
    /// True for constructors
    pub is_constructor: bool,
    /// The return type; `None` for constructors
    pub return_type: Option<String>,
    /// Parameters in order
    pub parameters: Vec<ParameterModel>,
    /// Thrown exception types, in order
    pub throws_types: Vec<String>,
    containing_class: ClassRef,
    inherited_from: Option<ClassRef>,
    type_parameters: Option<String>,
    type_parameter_list: OnceLock<TypeParameterList>,
}

impl MethodModel {
    /// Starts building a method
    #[must_use]
    pub fn builder(name: impl Into<String>) -> MethodBuilder {
        MethodBuilder::new(name.into(), false)
    }

    /// Starts building a constructor of the class with simple name `name`
    #[must_use]
    pub fn constructor_builder(name: impl Into<String>) -> MethodBuilder {
        MethodBuilder::new(name.into(), true)
    }

    /// The class declaring this method (or the subclass it was duplicated into)
    #[must_use]
    pub fn containing_class(&self) -> Option<ClassRc> {
        self.containing_class.upgrade()
    }

    /// The class this method was duplicated from, if it is an inherited copy
    #[must_use]
    pub fn inherited_from(&self) -> Option<ClassRc> {
        self.inherited_from.as_ref().and_then(ClassRef::upgrade)
    }

    /// Returns true if the last parameter is a vararg
    #[must_use]
    pub fn is_varargs(&self) -> bool {
        self.modifiers.has(ModifierFlags::VARARG)
    }

    /// The method's own type parameter list, parsed on first use
    pub fn type_parameter_list(&self) -> &TypeParameterList {
        self.type_parameter_list.get_or_init(|| {
            self.type_parameters
                .as_deref()
                .map(TypeParameterList::parse)
                .unwrap_or_default()
        })
    }

    /// Parameter types with type arguments removed
    #[must_use]
    pub fn erased_parameter_types(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .map(|parameter| erased_name(&parameter.type_name))
            .collect()
    }

    /// Returns true if the erased parameter types equal `parameter_types`
    #[must_use]
    pub fn matches_parameters(&self, parameter_types: &[&str]) -> bool {
        self.parameters.len() == parameter_types.len()
            && self
                .parameters
                .iter()
                .zip(parameter_types)
                .all(|(parameter, expected)| {
                    parameter.type_name == *expected
                        || erased_name(&parameter.type_name) == erased_name(expected)
                })
    }

    /// The context for comparing this method's modifiers with an overridden declaration
    #[must_use]
    pub fn equivalence_context(&self, config: &Config) -> EquivalenceContext {
        let class = self.containing_class();
        EquivalenceContext {
            include_synchronized: config.compatibility.include_synchronized,
            method_in_final_class: class
                .as_ref()
                .is_some_and(|class| class.modifiers.is_final()),
            method_in_deprecated_class: class
                .as_ref()
                .is_some_and(|class| class.is_deprecated()),
        }
    }

    /// Returns true if this method's modifiers are equivalent to those of `other`
    #[must_use]
    pub fn modifiers_equivalent(&self, other: &MethodModel, config: &Config) -> bool {
        self.modifiers
            .equivalent_to(&other.modifiers, &self.equivalence_context(config))
    }

    /// Copies this method into `into`, recording where it came from.
    ///
    /// The copy is appended to `into`'s methods (or constructors).
    pub fn duplicate(&self, into: &ClassRc) -> MethodRc {
        let copy = Arc::new(MethodModel {
            name: self.name.clone(),
            modifiers: self.modifiers.clone(),
            is_constructor: self.is_constructor,
            return_type: self.return_type.clone(),
            parameters: self.parameters.clone(),
            throws_types: self.throws_types.clone(),
            containing_class: ClassRef::new(into),
            inherited_from: Some(self.containing_class.clone()),
            type_parameters: self.type_parameters.clone(),
            type_parameter_list: OnceLock::new(),
        });
        if copy.is_constructor {
            into.constructors.push(copy.clone());
        } else {
            into.methods.push(copy.clone());
        }
        copy
    }
}

impl PartialEq for MethodModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.containing_class.qualified_name() == other.containing_class.qualified_name()
            && self.erased_parameter_types() == other.erased_parameter_types()
    }
}

impl Eq for MethodModel {}

impl Hash for MethodModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.containing_class.qualified_name().hash(state);
        self.erased_parameter_types().hash(state);
    }
}

/// Builder for [`MethodModel`]
#[derive(Debug)]
pub struct MethodBuilder {
    name: String,
    is_constructor: bool,
    modifiers: ModifierSet,
    return_type: Option<String>,
    parameters: Option<String>,
    throws_types: Vec<String>,
    type_parameters: Option<String>,
}

impl MethodBuilder {
    fn new(name: String, is_constructor: bool) -> Self {
        Self {
            name,
            is_constructor,
            modifiers: ModifierSet::new(VisibilityLevel::Public),
            return_type: None,
            parameters: None,
            throws_types: Vec::new(),
            type_parameters: None,
        }
    }

    /// Sets the modifiers
    #[must_use]
    pub fn modifiers(mut self, modifiers: ModifierSet) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the return type
    #[must_use]
    pub fn return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// Sets the parameter list as written, e.g. `(java.lang.String, int...)`
    #[must_use]
    pub fn parameters(mut self, source: impl Into<String>) -> Self {
        self.parameters = Some(source.into());
        self
    }

    /// Adds a thrown exception type
    #[must_use]
    pub fn throws(mut self, exception: impl Into<String>) -> Self {
        self.throws_types.push(exception.into());
        self
    }

    /// Sets the raw type parameter list, e.g. `<T extends Foo>`
    #[must_use]
    pub fn type_parameters(mut self, source: impl Into<String>) -> Self {
        self.type_parameters = Some(source.into());
        self
    }

    /// Builds the method and appends it to `owner`.
    ///
    /// Parameter annotations are mapped through `mapper`. A trailing `...` parameter sets
    /// [`ModifierFlags::VARARG`].
    pub fn build(self, owner: &ClassRc, mapper: &NameMapper<'_>) -> MethodRc {
        let parameters: Vec<ParameterModel> = self
            .parameters
            .as_deref()
            .map(split_parameters)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, source)| ParameterModel::parse(index, source, mapper))
            .collect();

        let mut modifiers = self.modifiers;
        if parameters.last().is_some_and(ParameterModel::is_varargs) {
            modifiers.set(ModifierFlags::VARARG, true);
        }

        let method = Arc::new(MethodModel {
            name: self.name,
            modifiers,
            is_constructor: self.is_constructor,
            return_type: if self.is_constructor {
                None
            } else {
                self.return_type
            },
            parameters,
            throws_types: self.throws_types,
            containing_class: ClassRef::new(owner),
            inherited_from: None,
            type_parameters: self.type_parameters,
            type_parameter_list: OnceLock::new(),
        });

        if method.is_constructor {
            owner.constructors.push(method.clone());
        } else {
            owner.methods.push(method.clone());
        }
        method
    }
}

/// A field or enum constant
#[derive(Debug)]
pub struct FieldModel {
    /// The field name
    pub name: String,
    /// The field type as written
    pub type_name: String,
    /// Visibility, modifiers and annotations
    pub modifiers: ModifierSet,
    /// The constant value as written, for constants
    pub constant_value: Option<String>,
    /// True for enum constants
    pub is_enum_constant: bool,
    containing_class: ClassRef,
}

impl FieldModel {
    /// Creates a field and appends it to `owner`
    pub fn create(
        owner: &ClassRc,
        name: impl Into<String>,
        type_name: impl Into<String>,
        modifiers: ModifierSet,
        constant_value: Option<String>,
    ) -> FieldRc {
        let field = Arc::new(FieldModel {
            name: name.into(),
            type_name: type_name.into(),
            modifiers,
            constant_value,
            is_enum_constant: false,
            containing_class: ClassRef::new(owner),
        });
        owner.fields.push(field.clone());
        field
    }

    /// Creates an enum constant of `owner` and appends it
    pub fn create_enum_constant(owner: &ClassRc, name: impl Into<String>) -> FieldRc {
        let mut modifiers = ModifierSet::new(VisibilityLevel::Public);
        modifiers.set(ModifierFlags::STATIC | ModifierFlags::FINAL, true);
        let field = Arc::new(FieldModel {
            name: name.into(),
            type_name: owner.qualified_name.clone(),
            modifiers,
            constant_value: None,
            is_enum_constant: true,
            containing_class: ClassRef::new(owner),
        });
        owner.fields.push(field.clone());
        field
    }

    /// The class declaring this field
    #[must_use]
    pub fn containing_class(&self) -> Option<ClassRc> {
        self.containing_class.upgrade()
    }
}

impl PartialEq for FieldModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.containing_class.qualified_name() == other.containing_class.qualified_name()
    }
}

impl Eq for FieldModel {}

impl Hash for FieldModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.containing_class.qualified_name().hash(state);
    }
}

/// A Kotlin property
#[derive(Debug)]
pub struct PropertyModel {
    /// The property name
    pub name: String,
    /// The property type as written
    pub type_name: String,
    /// Visibility, modifiers and annotations
    pub modifiers: ModifierSet,
    containing_class: ClassRef,
}

impl PropertyModel {
    /// Creates a property and appends it to `owner`
    pub fn create(
        owner: &ClassRc,
        name: impl Into<String>,
        type_name: impl Into<String>,
        modifiers: ModifierSet,
    ) -> PropertyRc {
        let property = Arc::new(PropertyModel {
            name: name.into(),
            type_name: type_name.into(),
            modifiers,
            containing_class: ClassRef::new(owner),
        });
        owner.properties.push(property.clone());
        property
    }

    /// The class declaring this property
    #[must_use]
    pub fn containing_class(&self) -> Option<ClassRc> {
        self.containing_class.upgrade()
    }
}

impl PartialEq for PropertyModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.containing_class.qualified_name() == other.containing_class.qualified_name()
    }
}

impl Eq for PropertyModel {}
