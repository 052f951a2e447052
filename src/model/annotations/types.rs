//! Annotation-specific types: output targets, attribute values and retention.

use std::fmt;

use bitflags::bitflags;
use strum::EnumIter;

/// An output artifact an annotation may be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum AnnotationTarget {
    /// The public signature file
    SignatureFile,
    /// SDK stub sources
    SdkStubsFile,
    /// Documentation stub sources
    DocStubsFile,
    /// The external annotations file
    ExternalAnnotationsFile,
    /// Nowhere
    None,
}

impl AnnotationTarget {
    /// The set holding only this target; empty for [`AnnotationTarget::None`]
    #[must_use]
    pub fn as_set(self) -> AnnotationTargets {
        match self {
            AnnotationTarget::SignatureFile => AnnotationTargets::SIGNATURE_FILE,
            AnnotationTarget::SdkStubsFile => AnnotationTargets::SDK_STUBS_FILE,
            AnnotationTarget::DocStubsFile => AnnotationTargets::DOC_STUBS_FILE,
            AnnotationTarget::ExternalAnnotationsFile => {
                AnnotationTargets::EXTERNAL_ANNOTATIONS_FILE
            }
            AnnotationTarget::None => AnnotationTargets::empty(),
        }
    }

    /// Returns true for the two stub source outputs
    #[must_use]
    pub fn is_stubs_file(self) -> bool {
        matches!(
            self,
            AnnotationTarget::SdkStubsFile | AnnotationTarget::DocStubsFile
        )
    }
}

bitflags! {
    /// The set of outputs an annotation is written to. The empty set means nowhere.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnnotationTargets: u8 {
        /// The public signature file
        const SIGNATURE_FILE = 0x01;
        /// SDK stub sources
        const SDK_STUBS_FILE = 0x02;
        /// Documentation stub sources
        const DOC_STUBS_FILE = 0x04;
        /// The external annotations file
        const EXTERNAL_ANNOTATIONS_FILE = 0x08;

        /// Signature file and both stub outputs
        const ALL_STUBS = Self::SIGNATURE_FILE.bits()
            | Self::SDK_STUBS_FILE.bits()
            | Self::DOC_STUBS_FILE.bits();
        /// Both stub outputs, but not the signature file
        const STUBS_ONLY = Self::SDK_STUBS_FILE.bits() | Self::DOC_STUBS_FILE.bits();
        /// Signature file and external annotations
        const SIGNATURE_AND_EXTERNAL = Self::SIGNATURE_FILE.bits()
            | Self::EXTERNAL_ANNOTATIONS_FILE.bits();
        /// Signature file, documentation stubs and external annotations
        const DOC_STUBS_AND_EXTERNAL = Self::SIGNATURE_FILE.bits()
            | Self::DOC_STUBS_FILE.bits()
            | Self::EXTERNAL_ANNOTATIONS_FILE.bits();
        /// Signature file and SDK stubs
        const SIGNATURE_AND_SDK_STUBS = Self::SIGNATURE_FILE.bits()
            | Self::SDK_STUBS_FILE.bits();
    }
}

impl AnnotationTargets {
    /// No output at all
    pub const NONE: AnnotationTargets = AnnotationTargets::empty();

    /// Returns true if `target` is part of this set
    #[must_use]
    pub fn includes(self, target: AnnotationTarget) -> bool {
        let bit = target.as_set();
        !bit.is_empty() && self.contains(bit)
    }
}

/// How long an annotation is retained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Retention {
    /// Discarded by the compiler
    Source,
    /// Recorded in the class file but not visible at runtime
    Class,
    /// Visible at runtime through reflection
    Runtime,
}

impl Retention {
    /// Parses a retention value as written in `@Retention(...)`.
    ///
    /// Accepts Java `RetentionPolicy` and Kotlin `AnnotationRetention` spellings, qualified or
    /// not. Kotlin's `BINARY` is class retention.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let simple = value.trim().rsplit('.').next().unwrap_or_default();
        match simple {
            "SOURCE" => Some(Retention::Source),
            "CLASS" | "BINARY" => Some(Retention::Class),
            "RUNTIME" => Some(Retention::Runtime),
            _ => None,
        }
    }

    /// Returns true if the annotation survives compilation
    #[must_use]
    pub fn is_retained(self) -> bool {
        matches!(self, Retention::Class | Retention::Runtime)
    }
}

/// A classified annotation attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// `true` or `false`
    Bool(bool),
    /// Integer literal fitting 32 bits
    Int(i32),
    /// Integer literal needing 64 bits, or with an `L` suffix
    Long(i64),
    /// Floating point literal
    Double(f64),
    /// Character literal, quotes removed
    Char(char),
    /// String literal, quotes removed and escapes resolved
    String(String),
    /// Array literal `{a, b}`
    Array(Vec<AnnotationValue>),
    /// Anything else (field references, class literals, expressions), kept as source
    Source(String),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Bool(value) => write!(f, "{value}"),
            AnnotationValue::Int(value) => write!(f, "{value}"),
            AnnotationValue::Long(value) => write!(f, "{value}L"),
            AnnotationValue::Double(value) => write!(f, "{value:?}"),
            AnnotationValue::Char(value) => write!(f, "'{}'", value.escape_default()),
            AnnotationValue::String(value) => write!(f, "\"{}\"", value.escape_default()),
            AnnotationValue::Array(values) => {
                f.write_str("{")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("}")
            }
            AnnotationValue::Source(source) => f.write_str(source),
        }
    }
}

/// One `name=value` entry of an annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationAttribute {
    /// Attribute name; `value` when the source omitted it
    pub name: String,
    /// The value exactly as written (trimmed)
    pub raw_value: String,
    /// The classified value
    pub value: AnnotationValue,
}

impl AnnotationAttribute {
    /// Creates an attribute, classifying `raw_value`
    #[must_use]
    pub fn new(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        let raw_value = raw_value.into();
        let value = super::parser::classify_value(&raw_value);
        Self {
            name: name.into(),
            raw_value,
            value,
        }
    }

    /// Returns true if this is the implicit `value` attribute
    #[must_use]
    pub fn is_default_name(&self) -> bool {
        self.name == "value"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_sets() {
        assert!(AnnotationTargets::ALL_STUBS.includes(AnnotationTarget::DocStubsFile));
        assert!(!AnnotationTargets::ALL_STUBS.includes(AnnotationTarget::ExternalAnnotationsFile));
        assert!(!AnnotationTargets::ALL_STUBS.includes(AnnotationTarget::None));
        assert!(AnnotationTargets::NONE.is_empty());
        assert_eq!(
            AnnotationTargets::STUBS_ONLY | AnnotationTargets::SIGNATURE_FILE,
            AnnotationTargets::ALL_STUBS
        );
    }

    #[test]
    fn retention_spellings() {
        assert_eq!(
            Retention::parse("java.lang.annotation.RetentionPolicy.SOURCE"),
            Some(Retention::Source)
        );
        assert_eq!(
            Retention::parse("kotlin.annotation.AnnotationRetention.BINARY"),
            Some(Retention::Class)
        );
        assert_eq!(Retention::parse("RUNTIME"), Some(Retention::Runtime));
        assert_eq!(Retention::parse("SOMETIMES"), None);
        assert!(Retention::Runtime.is_retained());
        assert!(!Retention::Source.is_retained());
    }

    #[test]
    fn value_display() {
        let array = AnnotationValue::Array(vec![
            AnnotationValue::String("a".to_string()),
            AnnotationValue::Long(3),
        ]);
        assert_eq!(array.to_string(), "{\"a\", 3L}");
        assert_eq!(AnnotationValue::Char('x').to_string(), "'x'");
    }
}
