#![allow(unused_macros)]

/// Builds a qualified name in the `androidx.annotation` namespace at compile time
///
/// ```rust, ignore
///  const NULLABLE: &str = androidx_name!("Nullable");
/// ```
macro_rules! androidx_name {
    ($simple:literal) => {
        concat!("androidx.annotation.", $simple)
    };
}

/// Builds a qualified name in the platform `android.annotation` namespace at compile time
///
/// ```rust, ignore
///  const NON_NULL: &str = platform_name!("NonNull");
/// ```
macro_rules! platform_name {
    ($simple:literal) => {
        concat!("android.annotation.", $simple)
    };
}

/// Builds a qualified name in the legacy `android.support.annotation` namespace at compile time
///
/// ```rust, ignore
///  const INT_DEF: &str = support_name!("IntDef");
/// ```
macro_rules! support_name {
    ($simple:literal) => {
        concat!("android.support.annotation.", $simple)
    };
}

/// Expands one simple annotation name into the same name under all three historical namespaces
///
/// ```rust, ignore
///  const INT_DEFS: [&str; 3] = all_namespaces!("IntDef");
/// ```
macro_rules! all_namespaces {
    ($simple:literal) => {
        [
            androidx_name!($simple),
            platform_name!($simple),
            support_name!($simple),
        ]
    };
}
