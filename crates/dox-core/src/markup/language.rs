//! Code fence language tags.

/// Language used when a fence carries no tag.
pub const DEFAULT_LANGUAGE: &str = "javascript";

/// Lowercase aliases mapped to canonical language ids.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("jsx", "jsx"),
    ("tsx", "tsx"),
    ("py", "python"),
    ("rb", "ruby"),
    ("go", "go"),
    ("java", "java"),
    ("c", "c"),
    ("cpp", "cpp"),
    ("cs", "csharp"),
    ("php", "php"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("shell", "bash"),
    ("sql", "sql"),
    ("text", "text"),
    ("plaintext", "text"),
    ("txt", "text"),
];

/// Maps a fence tag to its canonical language id.
///
/// Empty tags become `fallback`; known aliases are matched case-insensitively;
/// anything else passes through verbatim.
pub fn normalize_language(tag: &str, fallback: &str) -> String {
    let tag = tag.trim();
    if tag.is_empty() {
        return fallback.to_string();
    }

    let lowered = tag.to_lowercase();
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| tag.to_string())
}
