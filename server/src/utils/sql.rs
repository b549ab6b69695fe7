//! SQL identifier helpers
//!
//! Values never pass through here: they are always bound as parameters.
//! Only column and table names that are already known to exist are quoted.

/// Quote an identifier with backticks, doubling any embedded backtick.
///
/// ```
/// use rowgate_server::utils::sql::quote_identifier;
///
/// assert_eq!(quote_identifier("Range_Km"), "`Range_Km`");
/// assert_eq!(quote_identifier("odd`name"), "`odd``name`");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Plain identifier: `[A-Za-z_][A-Za-z0-9_]*`
///
/// Used for names that come from configuration rather than from the data,
/// such as the dataset table.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
