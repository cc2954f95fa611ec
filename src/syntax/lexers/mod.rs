//! Built-in lexers

mod c_style;
mod markup;

pub use c_style::{
    CStyleLexer, CStyleSyntax, C, CPP, GO, JAVA, JAVASCRIPT, JSON, PYTHON, RUST, SHELL, TOML,
    TYPESCRIPT, YAML,
};
pub use markup::{MarkupLexer, MARKUP_COMMENT};
