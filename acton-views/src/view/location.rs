//! View location formats and path classification
//!
//! A location format is a path template with positional placeholders:
//! `{0}` is the view name, `{1}` the controller and `{2}` the area.

use std::ops::Range;

use crate::error::ViewEngineError;

/// Default template file extension
pub const DEFAULT_VIEW_EXTENSION: &str = ".cshtml";

/// Location formats searched when the request has no area
pub const DEFAULT_VIEW_LOCATION_FORMATS: &[&str] =
    &["/Views/{1}/{0}.cshtml", "/Views/Shared/{0}.cshtml"];

/// Location formats searched when the request has an area
///
/// Area-specific locations come first, the shared fallback last.
pub const DEFAULT_AREA_VIEW_LOCATION_FORMATS: &[&str] = &[
    "/Areas/{2}/Views/{1}/{0}.cshtml",
    "/Areas/{2}/Views/Shared/{0}.cshtml",
    "/Views/Shared/{0}.cshtml",
];

/// Whether a view name is a direct path rather than a logical name
///
/// Only the first character is inspected: `~` or `/` marks a path.
///
/// # Examples
///
/// ```rust
/// use acton_views::view::is_specific_path;
///
/// assert!(is_specific_path("~/Views/Home/Index.cshtml"));
/// assert!(is_specific_path("/Views/Home/Index.cshtml"));
/// assert!(!is_specific_path("Index"));
/// ```
#[must_use]
pub fn is_specific_path(name: &str) -> bool {
    matches!(name.chars().next(), Some('~' | '/'))
}

/// Whether `path` ends with `extension`, ignoring ASCII case
#[must_use]
pub fn has_extension(path: &str, extension: &str) -> bool {
    path.len() >= extension.len()
        && path
            .get(path.len() - extension.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(extension))
}

/// Substitute view, controller and area into a location format
///
/// `{{` and `}}` produce literal braces. Values are inserted verbatim, with
/// no case or locale transformation.
///
/// # Errors
///
/// Returns [`ViewEngineError::InvalidLocationFormat`] if the format contains
/// an unknown placeholder or an unbalanced brace.
///
/// # Examples
///
/// ```rust
/// use acton_views::view::format_location;
///
/// let path = format_location("/Areas/{2}/Views/{1}/{0}.cshtml", "Index", "Home", "Admin").unwrap();
/// assert_eq!(path, "/Areas/Admin/Views/Home/Index.cshtml");
/// ```
pub fn format_location(
    format: &str,
    view_name: &str,
    controller_name: &str,
    area_name: &str,
) -> Result<String, ViewEngineError> {
    let mut out = String::with_capacity(format.len() + view_name.len() + controller_name.len());
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut index = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(d) => index.push(d),
                        None => {
                            return Err(ViewEngineError::invalid_format(
                                format,
                                "unclosed placeholder",
                            ))
                        }
                    }
                }
                match index.trim() {
                    "0" => out.push_str(view_name),
                    "1" => out.push_str(controller_name),
                    "2" => out.push_str(area_name),
                    other => {
                        return Err(ViewEngineError::invalid_format(
                            format,
                            format!("unknown placeholder {{{other}}}"),
                        ))
                    }
                }
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(ViewEngineError::invalid_format(format, "unbalanced '}'"));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Byte range of the first unescaped `{index}` placeholder in `format`
///
/// Braces are read with the same rules as [`format_location`], so `{{0}}` is
/// a literal and never matches.
pub(crate) fn find_placeholder(format: &str, index: &str) -> Option<Range<usize>> {
    let mut chars = format.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                chars.next();
            }
            '{' => {
                let end = chars.find(|&(_, c)| c == '}').map(|(i, _)| i)?;
                if format[start + 1..end].trim() == index {
                    return Some(start..end + 1);
                }
            }
            '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                chars.next();
            }
            _ => {}
        }
    }

    None
}

/// Escape braces so `value` is copied literally by [`format_location`]
pub(crate) fn escape_braces(value: &str) -> String {
    value.replace('{', "{{").replace('}', "}}")
}

/// Validate a list of formats without substituting anything
///
/// # Errors
///
/// Returns the first format error encountered.
pub fn validate_formats<S: AsRef<str>>(formats: &[S]) -> Result<(), ViewEngineError> {
    for format in formats {
        format_location(format.as_ref(), "", "", "")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_find_placeholder_skips_escaped_braces() {
        assert_eq!(find_placeholder("/Views/{1}/{0}.cshtml", "0"), Some(11..14));
        assert_eq!(find_placeholder("/{{0}}/{0}.cshtml", "0"), Some(7..10));
        assert_eq!(find_placeholder("/{{0}}/Index.cshtml", "0"), None);
        assert_eq!(find_placeholder("/Views/{ 0 }.cshtml", "0"), Some(7..12));
    }

    #[test]
    fn test_escaped_language_is_literal() {
        let format = format!("/{}/{{0}}", escape_braces("x{y}"));
        assert_eq!(format_location(&format, "Index", "", "").unwrap(), "/x{y}/Index");
    }

    #[test]
    fn test_specific_path_classification() {
        assert!(is_specific_path("~/Views/Home/Index.cshtml"));
        assert!(is_specific_path("/Foo/Bar.txt"));
        assert!(is_specific_path("/"));
        assert!(!is_specific_path("Index"));
        assert!(!is_specific_path("Views/Home/Index.cshtml"));
        assert!(!is_specific_path(" /Index"));
        assert!(!is_specific_path(""));
    }

    #[test]
    fn test_has_extension_ignores_case() {
        assert!(has_extension("/Views/Home/Index.cshtml", ".cshtml"));
        assert!(has_extension("/Views/Home/Index.CSHTML", ".cshtml"));
        assert!(!has_extension("/Foo/Bar.txt", ".cshtml"));
        assert!(!has_extension("html", ".cshtml"));
    }

    #[test]
    fn test_format_default_locations() {
        let paths: Vec<String> = DEFAULT_AREA_VIEW_LOCATION_FORMATS
            .iter()
            .map(|f| format_location(f, "Index", "Home", "Admin").unwrap())
            .collect();

        assert_eq!(
            paths,
            vec![
                "/Areas/Admin/Views/Home/Index.cshtml",
                "/Areas/Admin/Views/Shared/Index.cshtml",
                "/Views/Shared/Index.cshtml",
            ]
        );
    }

    #[test]
    fn test_format_escaped_braces() {
        let path = format_location("/{{literal}}/{0}", "Index", "", "").unwrap();
        assert_eq!(path, "/{literal}/Index");
    }

    #[test]
    fn test_format_rejects_unknown_placeholder() {
        let err = format_location("/Views/{3}.cshtml", "Index", "Home", "").unwrap_err();
        assert!(matches!(err, ViewEngineError::InvalidLocationFormat { .. }));
    }

    #[test]
    fn test_format_rejects_unbalanced_braces() {
        assert!(format_location("/Views/{0", "Index", "", "").is_err());
        assert!(format_location("/Views/0}", "Index", "", "").is_err());
    }

    #[test]
    fn test_validate_formats() {
        assert!(validate_formats(DEFAULT_VIEW_LOCATION_FORMATS).is_ok());
        assert!(validate_formats(&["/ok/{0}", "/bad/{x}"]).is_err());
    }

    proptest! {
        #[test]
        fn prop_paths_start_with_slash_or_tilde(name in "[~/][A-Za-z0-9/._-]{0,20}") {
            prop_assert!(is_specific_path(&name));
        }

        #[test]
        fn prop_logical_names_are_not_paths(name in "[A-Za-z][A-Za-z0-9/._-]{0,20}") {
            prop_assert!(!is_specific_path(&name));
        }

        #[test]
        fn prop_substitution_is_verbatim(
            view in "[A-Za-z0-9İı_]{1,12}",
            controller in "[A-Za-z0-9İı_]{0,12}",
        ) {
            let path = format_location("/Views/{1}/{0}.cshtml", &view, &controller, "").unwrap();
            prop_assert_eq!(path, format!("/Views/{controller}/{view}.cshtml"));
        }
    }
}
