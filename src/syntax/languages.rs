//! Language identification and lexer lookup
//!
//! Maps file extensions to language IDs, and language IDs to lexer
//! factories. The registry is built explicitly and shared by `Arc`; there is
//! no process-wide instance.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::lexer::{Lexer, PlainTextLexer};
use super::lexers::{self, CStyleLexer, MarkupLexer};

/// Language ID used when nothing else matches
pub const PLAIN_TEXT: &str = "plaintext";

/// Builds a fresh lexer for a language
pub type LexerFactory = Arc<dyn Fn() -> Arc<dyn Lexer> + Send + Sync>;

/// Detect a language ID from a file extension
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "java" => "java",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "mts" | "cts" | "tsx" => "typescript",
        "go" => "go",
        "rs" => "rust",
        "json" => "json",
        "py" | "pyw" => "python",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "sh" | "bash" | "zsh" => "shell",
        "html" | "htm" => "html",
        "xml" | "svg" | "xsd" | "xsl" => "xml",
        _ => PLAIN_TEXT,
    }
}

/// Detect a language ID from a file path
pub fn language_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(language_for_extension)
        .unwrap_or(PLAIN_TEXT)
}

/// Display name for a built-in language ID
pub fn display_name(language_id: &str) -> &'static str {
    match language_id {
        "c" => "C",
        "cpp" => "C++",
        "java" => "Java",
        "javascript" => "JavaScript",
        "typescript" => "TypeScript",
        "go" => "Go",
        "rust" => "Rust",
        "json" => "JSON",
        "python" => "Python",
        "yaml" => "YAML",
        "toml" => "TOML",
        "shell" => "Shell",
        "html" => "HTML",
        "xml" => "XML",
        _ => "Plain Text",
    }
}

/// Language ID → lexer factory
#[derive(Clone, Default)]
pub struct LanguageRegistry {
    factories: HashMap<String, LexerFactory>,
}

impl LanguageRegistry {
    /// An empty registry; every lookup resolves to plain text
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in lexer registered
    pub fn with_builtin_languages() -> Self {
        let mut registry = Self::new();
        let c_style: [(&str, &'static lexers::CStyleSyntax); 12] = [
            ("c", &lexers::C),
            ("cpp", &lexers::CPP),
            ("java", &lexers::JAVA),
            ("javascript", &lexers::JAVASCRIPT),
            ("typescript", &lexers::TYPESCRIPT),
            ("go", &lexers::GO),
            ("rust", &lexers::RUST),
            ("json", &lexers::JSON),
            ("python", &lexers::PYTHON),
            ("yaml", &lexers::YAML),
            ("toml", &lexers::TOML),
            ("shell", &lexers::SHELL),
        ];
        for (id, syntax) in c_style {
            registry.register(id, move || Arc::new(CStyleLexer::new(syntax)) as Arc<dyn Lexer>);
        }
        registry.register("html", || Arc::new(MarkupLexer) as Arc<dyn Lexer>);
        registry.register("xml", || Arc::new(MarkupLexer) as Arc<dyn Lexer>);
        registry
    }

    /// Register (or replace) the factory for `language_id`
    pub fn register<F>(&mut self, language_id: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Lexer> + Send + Sync + 'static,
    {
        self.factories.insert(language_id.into(), Arc::new(factory));
    }

    pub fn contains(&self, language_id: &str) -> bool {
        self.factories.contains_key(language_id)
    }

    /// Build a lexer for `language_id`, falling back to plain text
    pub fn resolve(&self, language_id: &str) -> Arc<dyn Lexer> {
        match self.factories.get(language_id) {
            Some(factory) => factory(),
            None => {
                tracing::debug!("No lexer for '{}', using plain text", language_id);
                Arc::new(PlainTextLexer)
            }
        }
    }

    /// Registered IDs, sorted
    pub fn language_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageRegistry")
            .field("languages", &self.language_ids())
            .finish()
    }
}
