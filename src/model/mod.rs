//! The API surface model.
//!
//! This module holds the element graph of an API surface as read from a signature file:
//! packages, classes, members, their modifiers and annotations. Classes are shared as
//! [`ClassRc`] and reference their containing class weakly; member lists are append-only so a
//! codebase can be populated and queried concurrently.
//!
//! # Key Components
//!
//! - [`Codebase`] / [`TextCodebase`] - Class and package storage with stub creation
//! - [`ClassModel`] / [`ClassBuilder`] - Classes, interfaces, enums and annotation types
//! - [`MethodModel`], [`FieldModel`], [`PropertyModel`], [`ParameterModel`] - Members
//! - [`ModifierSet`] - Visibility, modifier flags and annotations of an element
//! - [`AnnotationModel`] - Annotation instances and their output targets
//! - [`TypeParameterList`] - Generic type parameters and bounds
//!
//! # Examples
//!
//! ```rust
//! use apiscope::model::{
//!     ClassModel, MethodModel, ModifierSet, TextCodebase, VisibilityLevel,
//! };
//!
//! let codebase = TextCodebase::new("api.txt");
//! let class = codebase.add_class(
//!     ClassModel::builder("android.widget.Toast")
//!         .modifiers(ModifierSet::new(VisibilityLevel::Public))
//!         .build(),
//! )?;
//!
//! let mapper = codebase.name_mapper();
//! MethodModel::builder("show")
//!     .return_type("void")
//!     .build(&class, &mapper);
//!
//! assert!(class.find_method("show", &[]).is_some());
//! assert_eq!(class.modifiers.visibility(), VisibilityLevel::Public);
//! # Ok::<(), apiscope::Error>(())
//! ```

/// Annotation instances, name mapping and output targets
pub mod annotations;
/// Classes and the containing-class relation
mod class;
/// The codebase trait and the signature-file codebase
mod codebase;
/// Methods, constructors, parameters, fields and properties
mod members;
/// Modifier flags, equivalence and rendering
pub mod modifiers;
/// Generic type parameters
mod type_parameters;
/// The visibility lattice
mod visibility;

pub use annotations::{
    classify_value, compute_targets, fixed_targets, parse_attributes, split_annotation_source,
    typedef_targets, AnnotationAttribute, AnnotationModel, AnnotationTarget, AnnotationTargets,
    AnnotationValue, NameMapper, Nullness, Retention,
};
pub use class::{
    split_qualified_name, ClassBuilder, ClassKind, ClassList, ClassModel, ClassRc, ClassRef,
};
pub use codebase::{Codebase, PackageModel, PackageRc, TextCodebase};
pub use members::{
    FieldModel, FieldRc, MethodBuilder, MethodModel, MethodRc, ParameterModel, PropertyModel,
    PropertyRc,
};
pub use modifiers::{
    ElementKind, EquivalenceContext, ModifierFlags, ModifierSet, WriteContext,
    COMPAT_EQUIVALENCE_MASK, EQUIVALENCE_MASK,
};
pub use type_parameters::{
    erased_name, parse_bounds, type_bounds, TypeParameterList, TypeParameterModel,
};
pub use visibility::{VisibilityLevel, VISIBILITY_MASK};
