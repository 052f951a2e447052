//! # apiscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the apiscope library. Import this module to get quick access to the essential
//! types for modelling and classifying an API surface.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all apiscope operations
pub use crate::Error;

/// The result type used throughout apiscope
pub use crate::Result;

/// Options read by every classification routine
pub use crate::{CompatibilityConfig, Config, DocLevel, TypedefMode};

// ================================================================================================
// Codebase
// ================================================================================================

/// Codebase storage and the signature-file codebase
pub use crate::model::{Codebase, PackageModel, PackageRc, TextCodebase};

/// Classes
pub use crate::model::{ClassBuilder, ClassKind, ClassModel, ClassRc, ClassRef};

/// Members
pub use crate::model::{
    FieldModel, FieldRc, MethodBuilder, MethodModel, MethodRc, ParameterModel, PropertyModel,
    PropertyRc,
};

/// Generic type parameters
pub use crate::model::{TypeParameterList, TypeParameterModel};

// ================================================================================================
// Modifiers and Annotations
// ================================================================================================

/// Visibility, modifier flags and rendering
pub use crate::model::{
    ElementKind, EquivalenceContext, ModifierFlags, ModifierSet, VisibilityLevel, WriteContext,
};

/// Annotation instances, names and targets
pub use crate::model::{
    AnnotationAttribute, AnnotationModel, AnnotationTarget, AnnotationTargets, AnnotationValue,
    NameMapper, Nullness, Retention,
};

// ================================================================================================
// Diagnostics and Manifest
// ================================================================================================

/// Issue reporting
pub use crate::diagnostics::{Diagnostic, Issue, IssueConfiguration, Reporter, Severity};

/// Manifest facts
pub use crate::manifest::{ManifestFacts, ManifestSource, MinSdkVersion};
