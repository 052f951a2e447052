use thiserror::Error;

macro_rules! malformed_error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        crate::Error::Malformed {
            message: format!($fmt $(, $arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! unsupported_error {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {
        crate::Error::NotSupported(format!($fmt $(, $arg)*))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most of the model is deliberately lenient: attribute lists and generic bounds are scanned
/// from already-trusted signature files and never fail. Errors are reserved for structural
/// problems while building a codebase, for I/O and XML failures while reading a manifest, and
/// for requests a codebase kind cannot serve.
///
/// # Error Categories
///
/// ## Model construction
/// - [`Error::Malformed`] - An input document is structurally unusable
/// - [`Error::DuplicateClass`] - A class was declared twice
/// - [`Error::ClassNotFound`] - A class required for an operation is missing
///
/// ## Capabilities
/// - [`Error::NotSupported`] - The codebase kind does not provide the requested operation
/// - [`Error::ManifestNotConfigured`] - A manifest lookup was made without a manifest
///
/// ## I/O and external errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Xml`] - Errors reported by the XML reader
/// - [`Error::XmlAttribute`] - Malformed XML attributes
///
/// # Examples
///
/// ```rust
/// use apiscope::{Error, model::{Codebase, TextCodebase}};
///
/// let codebase = TextCodebase::new("api.txt");
/// match codebase.find_source_class("Foo.java") {
///     Err(Error::NotSupported(what)) => println!("not available: {what}"),
///     Err(e) => println!("other error: {e}"),
///     Ok(_) => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An input document is well-formed XML but structurally unusable, such as a manifest
    /// `<permission>` without a name.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// What was wrong with the input
        message: String,
        /// The crate source file that rejected it
        file: &'static str,
        /// The crate source line that rejected it
        line: u32,
    },

    /// The codebase kind does not support the requested operation.
    ///
    /// Text-based codebases only know what a signature file tells them; operations which
    /// need source-level information fail with this error. It is never a user-facing problem
    /// with the input.
    #[error("Operation not supported by this codebase - {0}")]
    NotSupported(String),

    /// A class with the same qualified name was already declared.
    #[error("Class {0} is declared more than once")]
    DuplicateClass(String),

    /// A class could not be found in the codebase.
    #[error("Class {0} not found in codebase")]
    ClassNotFound(String),

    /// A permission lookup was made on a codebase without a configured manifest.
    #[error("No manifest has been configured for this codebase")]
    ManifestNotConfigured,

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// The XML reader failed while reading a manifest.
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    /// An XML attribute could not be decoded.
    #[error("{0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),
}
