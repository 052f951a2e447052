//! The codebase: every package and class of one API surface.
//!
//! [`Codebase`] is the seam between the model and its producers. Classification and writing
//! only ever talk to the trait; [`TextCodebase`] is the implementation backed by signature
//! files, where everything the model knows was handed to it as text.
//!
//! # Storage
//!
//! Classes live in a `SkipMap` keyed by qualified name, so iteration is always in name order
//! and at most one class exists per name. A `DashMap` indexes simple names. Classes that are
//! referenced but never declared are created on demand as stubs (`emit == false`); a later
//! declaration replaces the stub.
//!
//! # Examples
//!
//! ```rust
//! use apiscope::model::{ClassModel, Codebase, TextCodebase};
//!
//! let codebase = TextCodebase::new("api.txt").with_api_level(34);
//! codebase.add_class(ClassModel::builder("android.app.Activity").build())?;
//!
//! let activity = codebase.find_class("android.app.Activity").unwrap();
//! assert!(activity.emit);
//! assert_eq!(codebase.api_level(), Some(34));
//!
//! let context = codebase.find_or_create_class("android.content.Context");
//! assert!(!context.emit);
//! assert_eq!(codebase.size(), 2);
//! # Ok::<(), apiscope::Error>(())
//! ```

use std::sync::Arc;

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use rayon::prelude::*;

use crate::{
    diagnostics::{Issue, Reporter},
    manifest::{ManifestFacts, ManifestSource},
    model::{
        annotations::NameMapper,
        class::{ClassList, ClassModel, ClassRc},
        modifiers::ModifierSet,
    },
    Config, Error, Result,
};

/// A shared package
pub type PackageRc = Arc<PackageModel>;

/// A package and its top-level classes
#[derive(Debug)]
pub struct PackageModel {
    /// Dotted package name; empty for the default package
    pub name: String,
    /// Package annotations
    pub modifiers: ModifierSet,
    /// Top-level classes in declaration order
    pub classes: ClassList,
}

impl PackageModel {
    /// Creates an empty package
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: ModifierSet::default(),
            classes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Number of top-level classes
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.count()
    }
}

/// Access to the classes of an API surface
///
/// Implementations must be shareable across threads; memoized values in the model are
/// single-writer cells and may be warmed in parallel.
pub trait Codebase: Send + Sync {
    /// Human readable description, e.g. the signature file name
    fn description(&self) -> &str;

    /// The run configuration
    fn config(&self) -> &Config;

    /// The diagnostics collector
    fn reporter(&self) -> &Reporter;

    /// The API level this surface describes, if known
    fn api_level(&self) -> Option<u32>;

    /// Facts from the manifest configured for this codebase
    fn manifest(&self) -> &ManifestFacts;

    /// Finds a class by qualified name
    fn find_class(&self, qualified_name: &str) -> Option<ClassRc>;

    /// Finds a class, creating a stub if it is not declared
    fn find_or_create_class(&self, qualified_name: &str) -> ClassRc;

    /// Finds a package by name
    fn find_package(&self, name: &str) -> Option<PackageRc>;

    /// All packages in name order
    fn packages(&self) -> Vec<PackageRc>;

    /// All classes, stubs included, in name order
    fn classes(&self) -> Vec<ClassRc>;

    /// Number of classes, stubs included
    fn size(&self) -> usize;

    /// Finds the class declared in a source file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] for codebases without source files.
    fn find_source_class(&self, file: &str) -> Result<ClassRc> {
        Err(unsupported_error!(
            "{} has no source files to look up {}",
            self.description(),
            file
        ))
    }

    /// The documentation comment of a class.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] for codebases without documentation.
    fn documentation(&self, qualified_name: &str) -> Result<String> {
        Err(unsupported_error!(
            "{} carries no documentation for {}",
            self.description(),
            qualified_name
        ))
    }
}

/// A codebase built from signature files
pub struct TextCodebase {
    description: String,
    config: Arc<Config>,
    reporter: Arc<Reporter>,
    api_level: Option<u32>,
    manifest: ManifestFacts,
    classes: SkipMap<String, ClassRc>,
    packages: SkipMap<String, PackageRc>,
    classes_by_simple_name: DashMap<String, Vec<String>>,
}

impl TextCodebase {
    /// Creates an empty codebase with the default configuration
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_config(description, Arc::new(Config::default()))
    }

    /// Creates an empty codebase sharing `config`
    #[must_use]
    pub fn with_config(description: impl Into<String>, config: Arc<Config>) -> Self {
        Self::with_reporter(description, config, Arc::new(Reporter::new()))
    }

    /// Creates an empty codebase reporting to `reporter`
    #[must_use]
    pub fn with_reporter(
        description: impl Into<String>,
        config: Arc<Config>,
        reporter: Arc<Reporter>,
    ) -> Self {
        Self {
            description: description.into(),
            config,
            manifest: ManifestFacts::new(ManifestSource::None, reporter.clone()),
            reporter,
            api_level: None,
            classes: SkipMap::new(),
            packages: SkipMap::new(),
            classes_by_simple_name: DashMap::new(),
        }
    }

    /// Sets the API level
    #[must_use]
    pub fn with_api_level(mut self, api_level: u32) -> Self {
        self.api_level = Some(api_level);
        self
    }

    /// Configures the manifest; it is read on first lookup
    #[must_use]
    pub fn with_manifest(mut self, source: ManifestSource) -> Self {
        self.manifest = ManifestFacts::new(source, self.reporter.clone());
        self
    }

    /// A name mapper consulting this codebase and its configuration
    #[must_use]
    pub fn name_mapper(&self) -> NameMapper<'_> {
        NameMapper::for_codebase(self)
    }

    /// Adds a declared class.
    ///
    /// A stub of the same name is replaced. Nested classes are attached to their containing
    /// class, top-level classes to their package.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateClass`] if a declared class of the same name exists; the
    /// duplicate is also reported as [`Issue::DuplicateClass`].
    pub fn add_class(&self, class: ClassModel) -> Result<ClassRc> {
        let name = class.qualified_name.clone();
        if let Some(existing) = self.classes.get(&name) {
            if existing.value().emit {
                self.reporter.report(
                    Issue::DuplicateClass,
                    Some(&self.description),
                    format!("class {name} is declared more than once"),
                );
                return Err(Error::DuplicateClass(name));
            }
            log::debug!("replacing stub of {name} with its declaration");
        }

        let class = Arc::new(class);
        self.classes.insert(name, class.clone());
        self.register(&class);
        Ok(class)
    }

    fn register(&self, class: &ClassRc) {
        let mut names = self
            .classes_by_simple_name
            .entry(class.simple_name.clone())
            .or_default();
        if !names.contains(&class.qualified_name) {
            names.push(class.qualified_name.clone());
        }
        drop(names);

        if !class.emit {
            return;
        }
        match class.containing_class() {
            Some(outer) => {
                outer.nested_classes.push(class.clone());
            }
            None => {
                let package = self
                    .packages
                    .get_or_insert_with(class.package_name.clone(), || {
                        Arc::new(PackageModel::new(class.package_name.clone()))
                    });
                package.value().classes.push(class.clone());
            }
        }
    }

    /// Classes with the given simple name, in name order
    #[must_use]
    pub fn find_classes_by_simple_name(&self, simple_name: &str) -> Vec<ClassRc> {
        let Some(names) = self.classes_by_simple_name.get(simple_name) else {
            return Vec::new();
        };
        let mut classes: Vec<ClassRc> = names
            .iter()
            .filter_map(|name| self.find_class(name))
            .collect();
        classes.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        classes
    }

    /// Computes the targets of every annotation in the codebase, in parallel.
    ///
    /// Returns the number of annotations visited. Later calls to
    /// [`AnnotationModel::targets`](crate::model::AnnotationModel::targets) hit the cache.
    pub fn precompute_annotation_targets(&self) -> usize {
        let classes = self.classes();
        let visited: usize = classes
            .par_iter()
            .map(|class| {
                let annotations = class.all_annotations();
                for annotation in &annotations {
                    annotation.targets(self);
                }
                annotations.len()
            })
            .sum();
        log::debug!("precomputed targets of {visited} annotations in {}", self.description);
        visited
    }
}

impl Codebase for TextCodebase {
    fn description(&self) -> &str {
        &self.description
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    fn api_level(&self) -> Option<u32> {
        self.api_level
    }

    fn manifest(&self) -> &ManifestFacts {
        &self.manifest
    }

    fn find_class(&self, qualified_name: &str) -> Option<ClassRc> {
        self.classes
            .get(qualified_name)
            .map(|entry| entry.value().clone())
    }

    fn find_or_create_class(&self, qualified_name: &str) -> ClassRc {
        if let Some(class) = self.find_class(qualified_name) {
            return class;
        }

        let stub = Arc::new(ClassModel::stub(qualified_name));
        let class = self
            .classes
            .get_or_insert(qualified_name.to_string(), stub.clone())
            .value()
            .clone();
        if Arc::ptr_eq(&class, &stub) {
            log::debug!("created stub for undeclared class {qualified_name}");
            self.reporter.report(
                Issue::UnresolvedClass,
                Some(&self.description),
                format!("{qualified_name} is referenced but not declared"),
            );
            self.register(&class);
        }
        class
    }

    fn find_package(&self, name: &str) -> Option<PackageRc> {
        self.packages.get(name).map(|entry| entry.value().clone())
    }

    fn packages(&self) -> Vec<PackageRc> {
        self.packages
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn classes(&self) -> Vec<ClassRc> {
        self.classes
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn size(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationModel, ClassKind, ModifierSet, VisibilityLevel};

    #[test]
    fn duplicates_are_rejected_and_reported() {
        let codebase = TextCodebase::new("api.txt");
        codebase.add_class(ClassModel::builder("a.B").build()).unwrap();
        let result = codebase.add_class(ClassModel::builder("a.B").build());
        assert!(matches!(result, Err(Error::DuplicateClass(name)) if name == "a.B"));
        assert_eq!(codebase.reporter().by_issue(Issue::DuplicateClass).len(), 1);
        assert_eq!(codebase.size(), 1);
    }

    #[test]
    fn declarations_replace_stubs() {
        let codebase = TextCodebase::new("api.txt");
        let stub = codebase.find_or_create_class("a.Late");
        assert!(!stub.emit);
        assert!(codebase.find_package("a").is_none());

        let declared = codebase.add_class(ClassModel::builder("a.Late").build()).unwrap();
        assert!(declared.emit);
        assert!(codebase.find_class("a.Late").unwrap().emit);
        assert_eq!(codebase.find_package("a").unwrap().class_count(), 1);
        assert_eq!(codebase.find_classes_by_simple_name("Late").len(), 1);
        assert_eq!(codebase.size(), 1);
    }

    #[test]
    fn iteration_is_in_name_order() {
        let codebase = TextCodebase::new("api.txt");
        for name in ["b.Z", "a.Y", "b.A", "a.X"] {
            codebase.add_class(ClassModel::builder(name).build()).unwrap();
        }
        let classes: Vec<_> = codebase
            .classes()
            .iter()
            .map(|class| class.qualified_name.clone())
            .collect();
        assert_eq!(classes, ["a.X", "a.Y", "b.A", "b.Z"]);

        let packages: Vec<_> = codebase
            .packages()
            .iter()
            .map(|package| package.name.clone())
            .collect();
        assert_eq!(packages, ["a", "b"]);
    }

    #[test]
    fn unsupported_capabilities() {
        let codebase = TextCodebase::new("api.txt");
        assert!(matches!(
            codebase.find_source_class("Foo.java"),
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(
            codebase.documentation("a.B"),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn targets_precompute_in_parallel() {
        let codebase = TextCodebase::new("api.txt");
        let mapper_codebase = TextCodebase::new("mapper");
        let mapper = mapper_codebase.name_mapper();

        let mut modifiers = ModifierSet::new(VisibilityLevel::Public);
        modifiers.add_annotations(
            ["@androidx.annotation.UiThread", "@java.lang.Override"],
            &mapper,
        );
        let class = codebase
            .add_class(
                ClassModel::builder("a.Widget")
                    .kind(ClassKind::Class)
                    .modifiers(modifiers)
                    .build(),
            )
            .unwrap();

        assert!(!class.modifiers.annotations().iter().any(AnnotationModel::has_cached_targets));
        assert_eq!(codebase.precompute_annotation_targets(), 2);
        assert!(class.modifiers.annotations().iter().all(AnnotationModel::has_cached_targets));
    }
}
