//! Token dump tool
//!
//! Loads a file into a [`Document`], runs it through a [`LexerPipeline`] on a
//! background thread and prints the first applied token map.

use std::sync::{mpsc, Arc};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use textcore::cli::CliArgs;
use textcore::config::CoreConfig;
use textcore::model::Document;
use textcore::syntax::{
    display_name, Executors, InlineExecutor, LanguageRegistry, LexerPipeline, PipelineConfig,
    ThreadExecutor, TokenMap,
};

/// How long to wait for the worker before giving up
const APPLY_TIMEOUT: Duration = Duration::from_secs(30);

fn format_line(index: usize, map: &TokenMap, show_states: bool) -> String {
    let mut out = format!("{:>5}", index + 1);
    if let Some(line) = map.line(index) {
        if show_states {
            out.push_str(&format!(" [{:>3}]", line.exit_state.0));
        }
        for token in &line.tokens {
            out.push_str(&format!(
                " {}@{}+{}",
                token.kind.name(),
                token.start_col,
                token.len
            ));
        }
    }
    out
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    textcore::tracing::init();
    let config = CoreConfig::load();

    let text = std::fs::read_to_string(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let mut document = Document::with_config(&text, &config);

    let language_id = args.language_id(|path| config.language_for_path(path));
    tracing::info!(
        "Tokenizing {} as {}",
        args.path.display(),
        display_name(&language_id)
    );

    let registry = Arc::new(LanguageRegistry::with_builtin_languages());
    let executors = Executors::new(
        Arc::new(ThreadExecutor::default()),
        Arc::new(InlineExecutor),
    );
    let pipeline_config = PipelineConfig::from(&config).with_language(language_id);

    let (tx, rx) = mpsc::channel();
    let mut pipeline = LexerPipeline::attach(
        &mut document,
        registry,
        executors,
        pipeline_config,
        move |map| {
            let _ = tx.send(map);
        },
    );
    pipeline.request_full_relex();

    let map = rx
        .recv_timeout(APPLY_TIMEOUT)
        .context("Timed out waiting for tokens")?;
    pipeline.dispose(&mut document);

    for index in 0..map.line_count() {
        println!("{}", format_line(index, &map, args.states));
    }

    Ok(())
}
