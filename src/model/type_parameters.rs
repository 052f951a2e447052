//! Generic type parameters and their bounds.
//!
//! Signature files write type parameter lists as source, e.g.
//! `<K extends java.lang.Comparable<K>, V>`. [`TypeParameterList::parse`] splits such a list
//! at top-level commas; each [`TypeParameterModel`] scans its bounds lazily on first use.
//!
//! Bound scanning follows the same lenient rules as the annotation attribute scanner: angle
//! brackets are counted, top-level `&` separates bounds, empty spans are dropped and
//! unbalanced input never fails. The implicit `java.lang.Object` bound is removed.

use std::{fmt, sync::OnceLock};

use crate::model::{ClassModel, ClassRc, ClassRef, Codebase};

const OBJECT: &str = "java.lang.Object";

/// Splits `source` at `separator` where angle brackets are balanced
fn split_generic(source: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in source.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&source[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

/// Finds the `extends` keyword, returning the offset of the text after it
fn extends_offset(declaration: &str) -> Option<usize> {
    let mut search = 0;
    while let Some(found) = declaration[search..].find("extends") {
        let start = search + found;
        let end = start + "extends".len();
        let before = declaration[..start].chars().next_back();
        let after = declaration[end..].chars().next();
        if before.is_some_and(char::is_whitespace) && after.map_or(true, char::is_whitespace) {
            return Some(end);
        }
        search = end;
    }
    None
}

/// Scans the bounds of a type parameter declaration such as `T extends Foo & Bar<Baz>`.
///
/// Returns `None` if the declaration has no `extends` clause.
///
/// ```rust
/// use apiscope::model::parse_bounds;
///
/// assert_eq!(
///     parse_bounds("T extends Foo & Bar<Baz>"),
///     Some(vec!["Foo".to_string(), "Bar<Baz>".to_string()])
/// );
/// assert_eq!(parse_bounds("T extends java.lang.Object"), Some(vec![]));
/// assert_eq!(parse_bounds("T"), None);
/// ```
#[must_use]
pub fn parse_bounds(declaration: &str) -> Option<Vec<String>> {
    let offset = extends_offset(declaration)?;
    Some(
        split_generic(&declaration[offset..], '&')
            .into_iter()
            .map(str::trim)
            .filter(|bound| !bound.is_empty() && *bound != OBJECT)
            .map(str::to_string)
            .collect(),
    )
}

/// Resolves the bounds of a type parameter declaration.
///
/// A declaration with an `extends` clause is scanned directly. A bare variable name refers to
/// a type parameter of the containing class, whose bounds are returned instead; unknown names
/// have no bounds.
#[must_use]
pub fn type_bounds(declaration: &str, class_parameters: Option<&TypeParameterList>) -> Vec<String> {
    if let Some(bounds) = parse_bounds(declaration) {
        return bounds;
    }

    let name = declaration.trim();
    class_parameters
        .and_then(|list| list.find(name))
        .map(|parameter| parameter.bounds().to_vec())
        .unwrap_or_default()
}

/// Strips type arguments and array suffixes, leaving the class name
#[must_use]
pub fn erased_name(type_name: &str) -> &str {
    let name = type_name.split('<').next().unwrap_or(type_name);
    name.trim_end_matches("[]").trim_end_matches("...").trim()
}

/// A generic type parameter: a type variable standing in for a class
#[derive(Debug)]
pub struct TypeParameterModel {
    /// The variable name
    pub name: String,
    /// The declaration as written, without `reified`
    pub declaration: String,
    /// Kotlin `reified` parameter
    pub reified: bool,
    bounds: OnceLock<Vec<String>>,
    bound_classes: OnceLock<Vec<ClassRef>>,
}

impl TypeParameterModel {
    /// Parses one declaration such as `reified T extends Foo`
    #[must_use]
    pub fn parse(declaration: &str) -> Self {
        let declaration = declaration.trim();
        let (reified, declaration) = match declaration.strip_prefix("reified ") {
            Some(rest) => (true, rest.trim_start()),
            None => (false, declaration),
        };
        let name = declaration
            .split(|c: char| c.is_whitespace() || c == '<')
            .next()
            .unwrap_or(declaration)
            .to_string();

        Self {
            name,
            declaration: declaration.to_string(),
            reified,
            bounds: OnceLock::new(),
            bound_classes: OnceLock::new(),
        }
    }

    /// Bounds declared on this parameter, `java.lang.Object` removed
    pub fn bounds(&self) -> &[String] {
        self.bounds
            .get_or_init(|| parse_bounds(&self.declaration).unwrap_or_default())
    }

    /// Bounds of this parameter, falling back to the same-named parameter of `class` when
    /// nothing is declared here
    #[must_use]
    pub fn resolved_bounds(&self, class: Option<&ClassModel>) -> Vec<String> {
        let list = class.map(ClassModel::type_parameter_list);
        if self.bounds().is_empty() && extends_offset(&self.declaration).is_none() {
            return type_bounds(&self.name, list);
        }
        self.bounds().to_vec()
    }

    /// The classes of the bounds, stubbed in `codebase` where not declared.
    ///
    /// Resolved once and held weakly; a bound class dropped since then is looked up again.
    pub fn bound_classes(&self, codebase: &dyn Codebase) -> Vec<ClassRc> {
        let resolved = self.bound_classes.get_or_init(|| {
            self.bounds()
                .iter()
                .map(|bound| ClassRef::new(&codebase.find_or_create_class(erased_name(bound))))
                .collect()
        });
        resolved
            .iter()
            .zip(self.bounds())
            .map(|(class, bound)| {
                class
                    .upgrade()
                    .unwrap_or_else(|| codebase.find_or_create_class(erased_name(bound)))
            })
            .collect()
    }
}

impl fmt::Display for TypeParameterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reified {
            f.write_str("reified ")?;
        }
        f.write_str(&self.declaration)
    }
}

/// An ordered type parameter list
#[derive(Debug, Default)]
pub struct TypeParameterList {
    parameters: Vec<TypeParameterModel>,
}

impl TypeParameterList {
    /// The empty list
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses `<T extends A, U>`; the angle brackets are optional
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        let inner = source
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(source);

        let parameters = split_generic(inner, ',')
            .into_iter()
            .filter(|part| !part.trim().is_empty())
            .map(TypeParameterModel::parse)
            .collect();
        Self { parameters }
    }

    /// Looks up a parameter by variable name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TypeParameterModel> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    /// Iterates the parameters in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &TypeParameterModel> {
        self.parameters.iter()
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true if there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl fmt::Display for TypeParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parameters.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextCodebase;
    use std::sync::Arc;

    #[test]
    fn bounds_split_at_top_level() {
        assert_eq!(
            parse_bounds("T extends Foo & Bar<Baz>").unwrap(),
            vec!["Foo", "Bar<Baz>"]
        );
        assert_eq!(
            parse_bounds("T extends java.util.Map<K & L, V> & java.io.Serializable").unwrap(),
            vec!["java.util.Map<K & L, V>", "java.io.Serializable"]
        );
        assert!(parse_bounds("T extends java.lang.Object").unwrap().is_empty());
    }

    #[test]
    fn bounds_are_lenient() {
        assert_eq!(parse_bounds("T extends  & Foo &").unwrap(), vec!["Foo"]);
        assert_eq!(parse_bounds("T extends Foo<Bar & Baz").unwrap(), vec!["Foo<Bar & Baz"]);
        assert_eq!(parse_bounds("Textends"), None);
        assert_eq!(parse_bounds("Extendsible"), None);
    }

    #[test]
    fn bare_name_resolves_through_class_parameters() {
        let class_parameters = TypeParameterList::parse("<T extends java.lang.Number, U>");
        assert_eq!(
            type_bounds("T", Some(&class_parameters)),
            vec!["java.lang.Number"]
        );
        assert!(type_bounds("U", Some(&class_parameters)).is_empty());
        assert!(type_bounds("V", Some(&class_parameters)).is_empty());
        assert!(type_bounds("T", None).is_empty());
    }

    #[test]
    fn list_parsing() {
        let list = TypeParameterList::parse(
            "<K extends java.lang.Comparable<K>, V extends java.util.List<java.util.Map<K, V>>, reified R>",
        );
        assert_eq!(list.len(), 3);
        assert_eq!(list.find("K").unwrap().bounds(), ["java.lang.Comparable<K>"]);
        assert_eq!(
            list.find("V").unwrap().bounds(),
            ["java.util.List<java.util.Map<K, V>>"]
        );
        let reified = list.find("R").unwrap();
        assert!(reified.reified);
        assert!(reified.bounds().is_empty());
        assert_eq!(
            list.to_string(),
            "<K extends java.lang.Comparable<K>, V extends java.util.List<java.util.Map<K, V>>, reified R>"
        );
        assert!(TypeParameterList::parse("").is_empty());
        assert_eq!(TypeParameterList::empty().to_string(), "");
    }

    #[test]
    fn erasure() {
        assert_eq!(erased_name("java.util.List<T>"), "java.util.List");
        assert_eq!(erased_name("int[]"), "int");
        assert_eq!(erased_name("java.lang.String..."), "java.lang.String");
    }

    #[test]
    fn bound_classes_are_stubbed() {
        let codebase = TextCodebase::new("test");
        let parameter = TypeParameterModel::parse("T extends java.lang.Comparable<T> & java.io.Closeable");
        let classes = parameter.bound_classes(&codebase);
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].qualified_name, "java.lang.Comparable");
        assert!(!classes[1].emit);
        assert!(codebase.find_class("java.io.Closeable").is_some());

        let size = codebase.size();
        let again = parameter.bound_classes(&codebase);
        assert!(Arc::ptr_eq(&again[0], &classes[0]));
        assert!(Arc::ptr_eq(&again[1], &classes[1]));
        assert_eq!(codebase.size(), size);
    }
}
