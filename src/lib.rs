// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]

//! # apiscope
//!
//! An in-memory model of an Android API surface and the annotation rules that decide how the
//! surface is written out. `apiscope` reads nothing but already-trusted signature fragments:
//! classes, members, modifiers and annotations are built from their source text and kept in a
//! concurrent codebase that can be queried from many threads at once.
//!
//! ## Features
//!
//! - **Annotation name mapping** - Canonicalizes annotation names across the platform,
//!   support-library and AndroidX namespaces, and drops annotations that must not be written
//! - **Target classification** - Decides for every annotation whether it belongs in signature
//!   files, SDK stubs, or external annotation files
//! - **Modifier model** - Visibility lattice, modifier flags, equivalence rules and the two
//!   historical modifier orders
//! - **Lenient scanners** - Annotation attribute lists and generic bounds never fail to parse
//! - **Manifest facts** - Permission protection levels and `minSdkVersion`, read lazily
//!
//! ## Quick Start
//!
//! ```rust
//! use apiscope::prelude::*;
//!
//! let codebase = TextCodebase::new("current.txt");
//! let mapper = codebase.name_mapper();
//!
//! // Support-library names are moved to AndroidX
//! assert_eq!(
//!     mapper.map("android.support.annotation.IntRange", AnnotationTarget::SignatureFile),
//!     Some("androidx.annotation.IntRange".to_string())
//! );
//!
//! // Nullness is written in the namespace of the output
//! let nullable = AnnotationModel::parse("@android.annotation.Nullable", &mapper);
//! assert_eq!(nullable.name(), "androidx.annotation.Nullable");
//! assert!(nullable.targets(&codebase).contains(AnnotationTargets::SIGNATURE_FILE));
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`model`] - Codebase, classes, members, modifiers and annotations
//! - [`manifest`] - Facts read from an Android manifest
//! - [`diagnostics`] - Issue reporting with configurable severities
//! - [`Config`] - The options every classification routine reads
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result<T, Error>`](Result). Scanning never fails: damaged
//! attribute lists or bounds produce partial results instead.
//!
//! ```rust
//! use apiscope::{Error, model::{ClassModel, TextCodebase}};
//!
//! let codebase = TextCodebase::new("api.txt");
//! codebase.add_class(ClassModel::builder("android.app.Activity").build())?;
//!
//! match codebase.add_class(ClassModel::builder("android.app.Activity").build()) {
//!     Err(Error::DuplicateClass(name)) => assert_eq!(name, "android.app.Activity"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok::<(), apiscope::Error>(())
//! ```
//!
//! ## Logging
//!
//! Lazy computations are logged through the [`log`](https://docs.rs/log) facade; the library
//! installs no logger.
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Options shared by a codebase and read by all classification routines.
///
/// [`Config`] replaces global option state: a codebase holds it as `Arc<Config>` and every
/// routine that needs an option takes it from there or from an explicit reference.
mod config;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the apiscope library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust
/// use apiscope::prelude::*;
///
/// let codebase = TextCodebase::new("api.txt");
/// let class = codebase.find_or_create_class("java.lang.Object");
/// assert!(!class.emit);
/// ```
pub mod prelude;

/// Issue reporting.
///
/// Problems found while building or classifying a codebase are reported to a
/// [`diagnostics::Reporter`] as [`diagnostics::Issue`]s. Each issue has a default
/// [`diagnostics::Severity`] which an [`diagnostics::IssueConfiguration`] may override; hidden
/// issues are dropped.
///
/// # Examples
///
/// ```rust
/// use apiscope::diagnostics::{Issue, Reporter, Severity};
///
/// let reporter = Reporter::new();
/// reporter.configuration().set_severity(Issue::UnresolvedClass, Severity::Error);
/// reporter.report(Issue::UnresolvedClass, Some("api.txt"), "class Foo is missing");
/// assert!(reporter.has_errors());
/// ```
pub mod diagnostics;

/// Facts read from an Android manifest, see [`manifest::ManifestFacts`]
pub mod manifest;

/// The API surface model.
///
/// # Key Components
///
/// - [`model::Codebase`] - Storage and lookup of classes and packages
/// - [`model::ClassModel`] - Classes with their members and nested classes
/// - [`model::ModifierSet`] - Modifiers and annotations of every element
/// - [`model::AnnotationModel`] - Annotations and their output targets
/// - [`model::NameMapper`] - Canonical annotation names per output target
pub mod model;

/// `apiscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `apiscope` Error type
///
/// The main error type for all operations in this crate. Scanning never produces one; errors
/// come from building a codebase, reading a manifest, or unsupported codebase operations.
pub use error::Error;

/// Configuration types
pub use config::{CompatibilityConfig, Config, DocLevel, TypedefMode};
