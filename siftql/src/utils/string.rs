//! String utility functions

use std::sync::OnceLock;

use regex::Regex;

/// Convert a camel-case attribute name to lower snake case
///
/// Every run of upper-case letters that follows a lower-case letter is
/// prefixed with `_`, then the whole name is lower-cased:
/// `createdAt` → `created_at`, `userID` → `user_id`, `URL` → `url`.
pub fn camel_to_snake(name: &str) -> String {
    static RE_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let re = RE_BOUNDARY.get_or_init(|| Regex::new(r"([a-z])([A-Z]+)").expect("Invalid regex"));
    re.replace_all(name, "${1}_${2}").to_lowercase()
}
