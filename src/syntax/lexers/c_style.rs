//! Keyword/string/comment/number lexer for C-family and similar languages.
//!
//! One lexer, configured per language through a static [`CStyleSyntax`].
//! Hash-comment languages (Python, YAML, TOML, shell) and JSON reuse it with
//! a different table.

use crate::syntax::lexer::{LexResult, LexState, Lexer};
use crate::syntax::scan::{is_ident_continue, is_ident_start, is_operator, is_punctuation, Scanner};
use crate::syntax::tokens::TokenKind;

/// Language table for [`CStyleLexer`]
#[derive(Debug)]
pub struct CStyleSyntax {
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    pub constants: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub block_comment: Option<(&'static str, &'static str)>,
    pub quotes: &'static [char],
    /// Quote whose strings may continue onto the next line
    pub multiline_quote: Option<char>,
    /// `'a` is a lifetime/label unless it forms a char literal
    pub lifetimes: bool,
    /// Capitalized identifiers are types
    pub capitalized_types: bool,
    /// `#name` as the first token of a line is a directive
    pub preprocessor: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CStyleLexer {
    syntax: &'static CStyleSyntax,
}

impl CStyleLexer {
    pub fn new(syntax: &'static CStyleSyntax) -> Self {
        Self { syntax }
    }

    fn classify(&self, word: &str, rest: &str) -> Option<TokenKind> {
        let syn = self.syntax;
        if syn.keywords.contains(&word) {
            Some(TokenKind::Keyword)
        } else if syn.constants.contains(&word) {
            Some(TokenKind::Constant)
        } else if syn.types.contains(&word)
            || (syn.capitalized_types && word.starts_with(|c: char| c.is_uppercase()))
        {
            Some(TokenKind::Type)
        } else if rest.trim_start().starts_with('(') {
            Some(TokenKind::Function)
        } else {
            None
        }
    }

    fn starts_comment(&self, s: &Scanner<'_>) -> bool {
        self.syntax.line_comment.is_some_and(|p| s.starts_with(p))
            || self.syntax.block_comment.is_some_and(|(open, _)| s.starts_with(open))
    }

    /// Finish a construct carried over from the previous line.
    /// Returns the state to exit with if the line ends inside it.
    fn resume(&self, s: &mut Scanner<'_>, entry: LexState) -> Option<LexState> {
        match entry {
            LexState::COMMENT => {
                let (_, close) = self.syntax.block_comment?;
                let closed = s.eat_through(close);
                s.push(0, TokenKind::Comment);
                (!closed).then_some(LexState::COMMENT)
            }
            LexState::STRING => {
                let quote = self.syntax.multiline_quote?;
                let closed = s.eat_quoted(quote);
                s.push(0, TokenKind::String);
                (!closed).then_some(LexState::STRING)
            }
            _ => None,
        }
    }
}

/// `'x'` or `'\n'` rather than a lifetime like `'a`
fn is_char_literal(rest: &str) -> bool {
    let mut chars = rest.chars().skip(1);
    match chars.next() {
        Some('\\') => true,
        Some(_) => chars.next() == Some('\''),
        None => false,
    }
}

impl Lexer for CStyleLexer {
    fn lex_line(&self, line: &str, entry: LexState) -> anyhow::Result<LexResult> {
        let syn = self.syntax;
        let mut s = Scanner::new(line);
        if let Some(open) = self.resume(&mut s, entry) {
            return Ok(LexResult::new(s.finish(), open));
        }

        let mut state = LexState::DEFAULT;
        while let Some(c) = s.peek() {
            let start = s.col();

            if c.is_whitespace() {
                s.bump();
            } else if syn.preprocessor && c == '#' && line[..s.pos()].trim().is_empty() {
                s.bump();
                s.eat_while(|c| c == ' ' || c == '\t');
                s.eat_while(is_ident_continue);
                s.push(start, TokenKind::Keyword);
            } else if syn.line_comment.is_some_and(|p| s.starts_with(p)) {
                s.eat_rest();
                s.push(start, TokenKind::Comment);
            } else if let Some((open, close)) =
                syn.block_comment.filter(|(open, _)| s.starts_with(open))
            {
                s.eat(open);
                if !s.eat_through(close) {
                    state = LexState::COMMENT;
                }
                s.push(start, TokenKind::Comment);
            } else if syn.quotes.contains(&c) {
                if c == '\'' && syn.lifetimes && !is_char_literal(s.remaining()) {
                    s.bump();
                    s.eat_while(is_ident_continue);
                    s.push(start, TokenKind::Label);
                    continue;
                }
                s.bump();
                if !s.eat_quoted(c) && syn.multiline_quote == Some(c) {
                    state = LexState::STRING;
                }
                s.push(start, TokenKind::String);
            } else if c.is_ascii_digit() {
                s.eat_number();
                s.push(start, TokenKind::Number);
            } else if is_ident_start(c) {
                let word = s.eat_while(is_ident_continue);
                if let Some(kind) = self.classify(word, s.remaining()) {
                    s.push(start, kind);
                }
            } else if is_operator(c) {
                s.bump();
                while s.peek().is_some_and(is_operator) && !self.starts_comment(&s) {
                    s.bump();
                }
                s.push(start, TokenKind::Operator);
            } else if is_punctuation(c) {
                s.bump();
                s.push(start, TokenKind::Punctuation);
            } else {
                s.bump();
            }
        }

        Ok(LexResult::new(s.finish(), state))
    }
}

// ============================================================================
// Language tables
// ============================================================================

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "const", "continue", "default", "do", "else", "enum", "extern", "for",
    "goto", "if", "inline", "register", "return", "sizeof", "static", "struct", "switch",
    "typedef", "union", "volatile", "while",
];

const C_TYPES: &[&str] = &[
    "char", "double", "float", "int", "long", "short", "signed", "unsigned", "void", "size_t",
    "bool",
];

pub static C: CStyleSyntax = CStyleSyntax {
    keywords: C_KEYWORDS,
    types: C_TYPES,
    constants: &["NULL", "true", "false"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quote: None,
    lifetimes: false,
    capitalized_types: false,
    preprocessor: true,
};

pub static CPP: CStyleSyntax = CStyleSyntax {
    keywords: &[
        "auto", "break", "case", "catch", "class", "const", "constexpr", "continue", "default",
        "delete", "do", "else", "enum", "explicit", "extern", "for", "friend", "if", "inline",
        "namespace", "new", "operator", "private", "protected", "public", "return", "sizeof",
        "static", "struct", "switch", "template", "this", "throw", "try", "typedef", "typename",
        "union", "using", "virtual", "while",
    ],
    types: C_TYPES,
    constants: &["nullptr", "NULL", "true", "false"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quote: None,
    lifetimes: false,
    capitalized_types: true,
    preprocessor: true,
};

pub static JAVA: CStyleSyntax = CStyleSyntax {
    keywords: &[
        "abstract", "break", "case", "catch", "class", "continue", "default", "do", "else",
        "enum", "extends", "final", "finally", "for", "if", "implements", "import", "instanceof",
        "interface", "new", "package", "private", "protected", "public", "return", "static",
        "super", "switch", "synchronized", "this", "throw", "throws", "try", "var", "while",
    ],
    types: &[
        "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
    ],
    constants: &["null", "true", "false"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quote: None,
    lifetimes: false,
    capitalized_types: true,
    preprocessor: false,
};

const JS_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "default", "delete",
    "do", "else", "export", "extends", "finally", "for", "from", "function", "if", "import", "in",
    "instanceof", "let", "new", "of", "return", "static", "super", "switch", "this", "throw",
    "try", "typeof", "var", "void", "while", "yield",
];

pub static JAVASCRIPT: CStyleSyntax = CStyleSyntax {
    keywords: JS_KEYWORDS,
    types: &[],
    constants: &["null", "undefined", "true", "false", "NaN", "Infinity"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\'', '`'],
    multiline_quote: Some('`'),
    lifetimes: false,
    capitalized_types: true,
    preprocessor: false,
};

pub static TYPESCRIPT: CStyleSyntax = CStyleSyntax {
    keywords: &[
        "abstract", "as", "async", "await", "break", "case", "catch", "class", "const",
        "continue", "declare", "default", "do", "else", "enum", "export", "extends", "finally",
        "for", "from", "function", "if", "implements", "import", "in", "interface", "keyof",
        "let", "namespace", "new", "private", "protected", "public", "readonly", "return",
        "static", "super", "switch", "this", "throw", "try", "type", "typeof", "var", "while",
        "yield",
    ],
    types: &[
        "any", "boolean", "never", "number", "object", "string", "symbol", "unknown", "void",
    ],
    constants: &["null", "undefined", "true", "false"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\'', '`'],
    multiline_quote: Some('`'),
    lifetimes: false,
    capitalized_types: true,
    preprocessor: false,
};

pub static GO: CStyleSyntax = CStyleSyntax {
    keywords: &[
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var",
    ],
    types: &[
        "bool", "byte", "error", "float32", "float64", "int", "int32", "int64", "rune", "string",
        "uint", "uint8", "uint32", "uint64",
    ],
    constants: &["nil", "true", "false", "iota"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\'', '`'],
    multiline_quote: Some('`'),
    lifetimes: false,
    capitalized_types: false,
    preprocessor: false,
};

pub static RUST: CStyleSyntax = CStyleSyntax {
    keywords: &[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
        "pub", "ref", "return", "self", "static", "struct", "super", "trait", "type", "unsafe",
        "use", "where", "while",
    ],
    types: &[
        "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "str", "u8",
        "u16", "u32", "u64", "u128", "usize",
    ],
    constants: &["true", "false", "None", "Some", "Ok", "Err"],
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    quotes: &['"', '\''],
    multiline_quote: Some('"'),
    lifetimes: true,
    capitalized_types: true,
    preprocessor: false,
};

pub static JSON: CStyleSyntax = CStyleSyntax {
    keywords: &[],
    types: &[],
    constants: &["true", "false", "null"],
    line_comment: None,
    block_comment: None,
    quotes: &['"'],
    multiline_quote: None,
    lifetimes: false,
    capitalized_types: false,
    preprocessor: false,
};

pub static PYTHON: CStyleSyntax = CStyleSyntax {
    keywords: &[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
        "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with",
        "yield",
    ],
    types: &["int", "float", "str", "bool", "list", "dict", "set", "tuple", "bytes"],
    constants: &["None", "True", "False"],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
    multiline_quote: None,
    lifetimes: false,
    capitalized_types: true,
    preprocessor: false,
};

pub static YAML: CStyleSyntax = CStyleSyntax {
    keywords: &[],
    types: &[],
    constants: &["true", "false", "null", "yes", "no", "on", "off"],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
    multiline_quote: None,
    lifetimes: false,
    capitalized_types: false,
    preprocessor: false,
};

pub static TOML: CStyleSyntax = CStyleSyntax {
    keywords: &[],
    types: &[],
    constants: &["true", "false"],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
    multiline_quote: None,
    lifetimes: false,
    capitalized_types: false,
    preprocessor: false,
};

pub static SHELL: CStyleSyntax = CStyleSyntax {
    keywords: &[
        "case", "do", "done", "elif", "else", "esac", "export", "fi", "for", "function", "if",
        "in", "local", "return", "then", "until", "while",
    ],
    types: &[],
    constants: &["true", "false"],
    line_comment: Some("#"),
    block_comment: None,
    quotes: &['"', '\''],
    multiline_quote: Some('"'),
    lifetimes: false,
    capitalized_types: false,
    preprocessor: false,
};
