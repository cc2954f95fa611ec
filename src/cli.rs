//! Command-line argument parsing for the token dump tool

use clap::Parser;
use std::path::PathBuf;

/// Tokenize a file and print its tokens line by line
#[derive(Parser, Debug)]
#[command(name = "textcore", version, about = "Tokenize a file and print its tokens")]
pub struct CliArgs {
    /// File to tokenize
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Language ID (detected from the extension if omitted)
    #[arg(short, long, value_name = "ID")]
    pub language: Option<String>,

    /// Print each line's exit state
    #[arg(long)]
    pub states: bool,
}

impl CliArgs {
    /// Language to lex with: the explicit flag, else detection via `detect`
    pub fn language_id<F>(&self, detect: F) -> String
    where
        F: FnOnce(&std::path::Path) -> String,
    {
        match &self.language {
            Some(id) => id.clone(),
            None => detect(&self.path),
        }
    }
}
