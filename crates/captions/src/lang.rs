/// Source language sentinel asking the backend to detect the language.
pub const AUTO_SOURCE: &str = "auto";

/// Returns the primary subtag of a BCP 47 language code
/// ("kn-IN" -> "kn", "pt_BR" -> "pt"). Empty or malformed codes fall
/// back to "en".
pub fn primary_subtag(code: &str) -> String {
    let first = code.trim().split(['-', '_']).next().unwrap_or("");
    if first.is_empty() {
        "en".to_string()
    } else {
        first.to_ascii_lowercase()
    }
}
