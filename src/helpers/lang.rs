//! Language and MIME lookups keyed by file extension or fence token

/// Normalize a fence token or file extension to a token the bundled
/// syntax set understands. Unknown tokens pass through unchanged so the
/// highlighter can still try extension and first-line lookup.
pub fn language_token(token: &str) -> &str {
    match token.to_ascii_lowercase().as_str() {
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        // No TypeScript grammar in the bundled set; JavaScript is the
        // closest match
        "ts" | "tsx" | "typescript" => "javascript",
        "py" | "pyw" => "python",
        "rb" => "ruby",
        "rs" => "rust",
        "kt" | "kts" => "kotlin",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "c++",
        "cs" => "c#",
        "golang" => "go",
        "htm" | "xhtml" => "html",
        "yml" => "yaml",
        "md" | "mdx" => "markdown",
        "sh" | "zsh" | "ksh" => "bash",
        "pl" | "pm" => "perl",
        "hs" => "haskell",
        "erl" | "hrl" => "erlang",
        "ex" | "exs" => "elixir",
        "svg" => "xml",
        "text" | "txt" | "log" => "plain",
        other if other.is_empty() => "plain",
        _ => token,
    }
}

/// Map a content file extension to a MIME type, for raw delivery
pub fn ext_to_mime(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "json" => "application/json",
        "yaml" | "yml" => "application/x-yaml",
        "md" | "mdx" => "text/markdown",
        "html" => "text/html",
        _ => "text/plain",
    }
}
