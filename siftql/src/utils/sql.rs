//! SQL text helpers shared by the SQL dialects

/// Escape LIKE metacharacters (%, _, \) so a literal matches only itself
///
/// The result is meant for patterns written with `ESCAPE '\'`.
///
/// # Example
///
/// ```
/// use siftql::utils::sql::escape_like_pattern;
///
/// let pattern = format!("{}%", escape_like_pattern("50%_off"));
/// assert_eq!(pattern, "50\\%\\_off%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Quote a storage key as an identifier, one segment per dot
///
/// `address.zip` becomes `"address"."zip"`; embedded quotes are doubled.
pub fn quote_identifier(key: &str) -> String {
    key.split('.')
        .map(|segment| format!("\"{}\"", segment.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}
