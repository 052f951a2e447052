//! Visibility levels of API elements.

use std::fmt;

use strum::{EnumCount, EnumIter};

/// Bit pattern of a [`VisibilityLevel`] inside [`crate::model::ModifierFlags`]
pub const VISIBILITY_MASK: u32 = 0b0000_0111;

/// Visibility of a class or member.
///
/// Levels are totally ordered by accessibility, `Private` being the least accessible. The
/// order is not the whole story though: `Internal` (module-wide) and `PackagePrivate` are not
/// comparable in practice, see [`VisibilityLevel::as_accessible_as`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum VisibilityLevel {
    /// Visible only inside the declaring class
    Private,
    /// Visible inside the declaring module
    Internal,
    /// Visible inside the declaring package
    PackagePrivate,
    /// Visible to subclasses and the declaring package
    Protected,
    /// Visible everywhere
    Public,
}

// The mask must hold every visibility value and not a bit more.
const _: () = assert!(VisibilityLevel::COUNT <= (VISIBILITY_MASK as usize) + 1);
const _: () = assert!(VisibilityLevel::COUNT > (VISIBILITY_MASK as usize + 1) / 2);

impl VisibilityLevel {
    /// The value this level occupies in the visibility bits of a modifier set
    #[must_use]
    pub const fn flag_value(self) -> u32 {
        match self {
            VisibilityLevel::PackagePrivate => 0,
            VisibilityLevel::Public => 1,
            VisibilityLevel::Protected => 2,
            VisibilityLevel::Internal => 3,
            VisibilityLevel::Private => 4,
        }
    }

    /// Decodes the visibility bits of a modifier set.
    ///
    /// # Panics
    ///
    /// Panics if `bits` holds a value no visibility level uses. Modifier sets only ever store
    /// values produced by [`VisibilityLevel::flag_value`], so this indicates corrupted state.
    #[must_use]
    pub fn from_flag_value(bits: u32) -> Self {
        match bits & VISIBILITY_MASK {
            0 => VisibilityLevel::PackagePrivate,
            1 => VisibilityLevel::Public,
            2 => VisibilityLevel::Protected,
            3 => VisibilityLevel::Internal,
            4 => VisibilityLevel::Private,
            other => panic!("visibility bits hold unknown value {other}"),
        }
    }

    /// The Java source token; empty for package private
    #[must_use]
    pub fn java_modifier(self) -> &'static str {
        match self {
            VisibilityLevel::Private => "private",
            VisibilityLevel::Internal => "internal",
            VisibilityLevel::PackagePrivate => "",
            VisibilityLevel::Protected => "protected",
            VisibilityLevel::Public => "public",
        }
    }

    /// The Kotlin source token
    #[must_use]
    pub fn kotlin_modifier(self) -> &'static str {
        match self {
            VisibilityLevel::Private => "private",
            VisibilityLevel::Internal | VisibilityLevel::PackagePrivate => "internal",
            VisibilityLevel::Protected => "protected",
            VisibilityLevel::Public => "public",
        }
    }

    /// Description used in user facing messages
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            VisibilityLevel::Private => "private",
            VisibilityLevel::Internal => "internal",
            VisibilityLevel::PackagePrivate => "package private",
            VisibilityLevel::Protected => "protected",
            VisibilityLevel::Public => "public",
        }
    }

    /// Parses a Java/Kotlin visibility token
    #[must_use]
    pub fn from_modifier(token: &str) -> Option<Self> {
        match token {
            "private" => Some(VisibilityLevel::Private),
            "internal" => Some(VisibilityLevel::Internal),
            "protected" => Some(VisibilityLevel::Protected),
            "public" => Some(VisibilityLevel::Public),
            _ => None,
        }
    }

    /// Returns true if something at this level is at least as accessible as `other`.
    ///
    /// `Internal` and `PackagePrivate` grant access to different sets of callers, so neither
    /// is as accessible as the other even though the total order ranks them.
    ///
    /// ```rust
    /// use apiscope::model::VisibilityLevel;
    ///
    /// assert!(VisibilityLevel::Public.as_accessible_as(VisibilityLevel::Protected));
    /// assert!(!VisibilityLevel::Internal.as_accessible_as(VisibilityLevel::PackagePrivate));
    /// assert!(!VisibilityLevel::PackagePrivate.as_accessible_as(VisibilityLevel::Internal));
    /// ```
    #[must_use]
    pub fn as_accessible_as(self, other: VisibilityLevel) -> bool {
        let result = self >= other;
        match other {
            VisibilityLevel::PackagePrivate => result && self != VisibilityLevel::Internal,
            VisibilityLevel::Internal => result && self != VisibilityLevel::PackagePrivate,
            _ => result,
        }
    }
}

impl fmt::Display for VisibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
