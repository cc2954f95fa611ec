//! Background relex scheduling
//!
//! `LexerPipeline` listens to a [`Document`], turns each change into a dirty
//! line and a new revision, and runs [`engine::relex`] on the worker
//! executor. Finished maps are handed to the apply executor and delivered to
//! the callback only if no newer revision was issued in the meantime.
//!
//! ```text
//! Document edit → listener: revision += 1, dirty = min(dirty, line)
//!              → worker: (debounce) → stale? → relex
//!              → apply: stale? → callback(Arc<TokenMap>)
//! ```
//!
//! Cancellation is result-based: jobs are never interrupted, their output
//! is dropped if a newer revision exists when they finish.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use ropey::Rope;

use super::engine;
use super::executor::{Executor, InlineExecutor};
use super::languages::{LanguageRegistry, PLAIN_TEXT};
use super::lexer::{LexState, Lexer};
use super::tokens::TokenMap;
use crate::model::{ChangeEvent, Document, ListenerId};

/// Default delay before a job starts lexing
pub const DEFAULT_DEBOUNCE_MS: u64 = 30;

type ApplyFn = Box<dyn FnMut(Arc<TokenMap>) + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// How long a job waits on its worker before checking staleness.
    /// Ignored for inline workers.
    pub debounce: Duration,
    /// Initial language
    pub language_id: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            language_id: PLAIN_TEXT.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn with_language(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Where lex jobs and apply callbacks run
#[derive(Clone)]
pub struct Executors {
    pub worker: Arc<dyn Executor>,
    pub apply: Arc<dyn Executor>,
}

impl Executors {
    pub fn new(worker: Arc<dyn Executor>, apply: Arc<dyn Executor>) -> Self {
        Self { worker, apply }
    }

    /// Everything on the mutating thread
    pub fn inline() -> Self {
        Self::new(Arc::new(InlineExecutor), Arc::new(InlineExecutor))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    /// The latest revision has been applied
    Idle,
    /// A newer revision than the last applied one is in flight
    Pending,
    /// Terminal
    Disposed,
}

struct PipelineState {
    /// Latest revision issued
    revision: u64,
    /// Revision of the last map handed to the callback
    applied_revision: u64,
    /// Earliest line changed since the last apply
    dirty_line: Option<usize>,
    snapshot: Rope,
    language_id: String,
    lexer: Arc<dyn Lexer>,
    /// Map the next relex compares against. `None` after a fallback or a
    /// language switch.
    baseline: Option<Arc<TokenMap>>,
    current: Option<Arc<TokenMap>>,
    disposed: bool,
}

struct Shared {
    state: Mutex<PipelineState>,
    /// Locked for the whole callback so it never runs concurrently with itself
    on_apply: Mutex<Option<ApplyFn>>,
    registry: Arc<LanguageRegistry>,
    executors: Executors,
    debounce: Duration,
}

impl Shared {
    /// Bump the revision, merge `line` into the dirty hint and schedule a job
    fn invalidate<F>(self: &Arc<Self>, line: usize, update: F)
    where
        F: FnOnce(&mut PipelineState),
    {
        let revision = {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            update(&mut state);
            state.revision += 1;
            state.dirty_line = Some(state.dirty_line.map_or(line, |dirty| dirty.min(line)));
            tracing::trace!(
                "Scheduling relex: revision {}, dirty line {:?}",
                state.revision,
                state.dirty_line
            );
            state.revision
        };

        let shared = Arc::clone(self);
        self.executors
            .worker
            .execute(Box::new(move || shared.run_job(revision)));
    }

    fn on_change(self: &Arc<Self>, event: &ChangeEvent, rope: &Rope) {
        let line = rope.char_to_line(event.offset.min(rope.len_chars()));
        let snapshot = rope.clone();
        self.invalidate(line, move |state| state.snapshot = snapshot);
    }

    fn is_latest(&self, revision: u64) -> bool {
        let state = self.state.lock();
        !state.disposed && state.revision == revision
    }

    fn run_job(self: Arc<Self>, revision: u64) {
        if !self.debounce.is_zero() {
            // Only the newest job is worth waiting for
            if !self.is_latest(revision) {
                tracing::trace!("Dropping superseded relex {} before debounce", revision);
                return;
            }
            std::thread::sleep(self.debounce);
        }

        let (snapshot, baseline, dirty_line, lexer) = {
            let state = self.state.lock();
            if state.disposed {
                return;
            }
            if state.revision != revision {
                tracing::debug!(
                    "Skipping stale relex: revision {} != latest {}",
                    revision,
                    state.revision
                );
                return;
            }
            (
                state.snapshot.clone(),
                state.baseline.clone(),
                state.dirty_line.unwrap_or(0),
                Arc::clone(&state.lexer),
            )
        };

        let text = snapshot.to_string();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            engine::relex(baseline.as_deref(), &text, dirty_line, lexer.as_ref())
        }));

        let (map, fallback) = match outcome {
            Ok(Ok(map)) => (map, false),
            Ok(Err(e)) => {
                tracing::warn!("{}: {:#}; falling back to plain text", e, e.source);
                (TokenMap::plain(&text, LexState::DEFAULT), true)
            }
            Err(_) => {
                tracing::warn!(
                    "Lexer panicked at revision {}; falling back to plain text",
                    revision
                );
                (TokenMap::plain(&text, LexState::DEFAULT), true)
            }
        };

        let map = Arc::new(map.with_revision(revision));
        let shared = Arc::clone(&self);
        self.executors
            .apply
            .execute(Box::new(move || shared.apply(revision, map, fallback)));
    }

    fn apply(&self, revision: u64, map: Arc<TokenMap>, fallback: bool) {
        let mut on_apply = self.on_apply.lock();
        {
            let mut state = self.state.lock();
            if state.disposed {
                return;
            }
            if state.revision != revision {
                tracing::debug!(
                    "Discarding stale tokens: revision {} != latest {}",
                    revision,
                    state.revision
                );
                return;
            }
            state.applied_revision = revision;
            state.dirty_line = None;
            state.baseline = (!fallback).then(|| Arc::clone(&map));
            state.current = Some(Arc::clone(&map));
        }

        tracing::debug!(
            "Applied tokens for revision {} ({} lines)",
            revision,
            map.line_count()
        );
        if let Some(callback) = on_apply.as_mut() {
            callback(map);
        }
    }

    fn dispose(&self) {
        self.state.lock().disposed = true;
        // Waits for a callback in progress to return
        self.on_apply.lock().take();
    }
}

/// Keeps a [`TokenMap`] for a document current as it is edited.
///
/// The apply callback runs while the pipeline holds its callback lock, so it
/// must never call [`dispose`](Self::dispose), whatever the executors:
/// dispose waits for that lock and would deadlock. With an inline apply
/// executor the callback also runs inside the document's listener dispatch.
///
/// Debounce only applies to workers that run jobs on another thread. An
/// inline worker lexes immediately, so edits never sleep on the mutating
/// thread.
///
/// Dropping a pipeline without calling `dispose` stops every callback, but
/// its listener stays registered on the document as a no-op until the
/// document is dropped. Call `dispose` to remove it.
pub struct LexerPipeline {
    shared: Arc<Shared>,
    listener: Option<ListenerId>,
}

impl LexerPipeline {
    /// Subscribe to `document`. Starts idle; call
    /// [`request_full_relex`](Self::request_full_relex) for the initial map.
    pub fn attach<F>(
        document: &mut Document,
        registry: Arc<LanguageRegistry>,
        executors: Executors,
        config: PipelineConfig,
        on_apply: F,
    ) -> Self
    where
        F: FnMut(Arc<TokenMap>) + Send + 'static,
    {
        let lexer = registry.resolve(&config.language_id);
        let shared = Arc::new(Shared {
            state: Mutex::new(PipelineState {
                revision: 0,
                applied_revision: 0,
                dirty_line: None,
                snapshot: document.rope().clone(),
                language_id: config.language_id,
                lexer,
                baseline: None,
                current: None,
                disposed: false,
            }),
            on_apply: Mutex::new(Some(Box::new(on_apply))),
            debounce: if executors.worker.runs_inline() {
                Duration::ZERO
            } else {
                config.debounce
            },
            registry,
            executors,
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let listener = document.add_listener(move |event, rope| {
            if let Some(shared) = weak.upgrade() {
                shared.on_change(event, rope);
            }
            Ok(())
        });

        Self {
            shared,
            listener: Some(listener),
        }
    }

    /// Switch lexers and relex the whole document.
    ///
    /// Unknown IDs fall back to plain text.
    pub fn set_language_id(&self, language_id: &str) {
        let lexer = self.shared.registry.resolve(language_id);
        let language_id = language_id.to_string();
        tracing::debug!("Switching language to '{}'", language_id);
        self.shared.invalidate(0, move |state| {
            state.language_id = language_id;
            state.lexer = lexer;
            state.baseline = None;
        });
    }

    /// Relex from line 0 without changing language
    pub fn request_full_relex(&self) {
        self.shared.invalidate(0, |_| {});
    }

    /// Stop listening and suppress every later callback, including for jobs
    /// already in flight. Blocks while a callback is running.
    pub fn dispose(&mut self, document: &mut Document) {
        if let Some(id) = self.listener.take() {
            document.remove_listener(id);
        }
        self.shared.dispose();
    }

    pub fn status(&self) -> PipelineStatus {
        let state = self.shared.state.lock();
        if state.disposed {
            PipelineStatus::Disposed
        } else if state.revision != state.applied_revision {
            PipelineStatus::Pending
        } else {
            PipelineStatus::Idle
        }
    }

    /// Latest revision issued
    pub fn revision(&self) -> u64 {
        self.shared.state.lock().revision
    }

    /// Earliest line waiting to be relexed
    pub fn dirty_line(&self) -> Option<usize> {
        self.shared.state.lock().dirty_line
    }

    pub fn language_id(&self) -> String {
        self.shared.state.lock().language_id.clone()
    }

    /// Last map delivered to the callback
    pub fn current(&self) -> Option<Arc<TokenMap>> {
        self.shared.state.lock().current.clone()
    }
}

impl Drop for LexerPipeline {
    fn drop(&mut self) {
        // The document may outlive us; its listener holds only a Weak and
        // turns into a no-op once `shared` is gone
        self.shared.state.lock().disposed = true;
    }
}

impl std::fmt::Debug for LexerPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("LexerPipeline")
            .field("language_id", &state.language_id)
            .field("revision", &state.revision)
            .field("applied_revision", &state.applied_revision)
            .field("dirty_line", &state.dirty_line)
            .field("disposed", &state.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::executor::QueuedExecutor;
    use crate::syntax::lexer::LexResult;
    use crate::syntax::tokens::{Token, TokenKind};
    use std::sync::atomic::{AtomicBool, Ordering};

    type Applied = Arc<Mutex<Vec<Arc<TokenMap>>>>;

    fn no_debounce(language_id: &str) -> PipelineConfig {
        PipelineConfig::default()
            .with_debounce(Duration::ZERO)
            .with_language(language_id)
    }

    fn recorder() -> (Applied, impl FnMut(Arc<TokenMap>) + Send + 'static) {
        let applied: Applied = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&applied);
        (applied, move |map| sink.lock().push(map))
    }

    struct Queued {
        worker: Arc<QueuedExecutor>,
        apply: Arc<QueuedExecutor>,
    }

    impl Queued {
        fn new() -> Self {
            Self {
                worker: Arc::new(QueuedExecutor::new()),
                apply: Arc::new(QueuedExecutor::new()),
            }
        }

        fn executors(&self) -> Executors {
            Executors::new(self.worker.clone(), self.apply.clone())
        }

        fn drain(&self) {
            self.worker.run_pending();
            self.apply.run_pending();
        }
    }

    /// Fails (or panics) while the flag is set
    struct Faulty {
        faulting: Arc<AtomicBool>,
        panic: bool,
    }

    impl Lexer for Faulty {
        fn lex_line(&self, line: &str, entry: LexState) -> anyhow::Result<LexResult> {
            if self.faulting.load(Ordering::SeqCst) {
                if self.panic {
                    panic!("lexer bug");
                }
                anyhow::bail!("lexer fault");
            }
            let token = Token::new(0, line.chars().count(), TokenKind::String);
            Ok(LexResult::new(vec![token], entry))
        }
    }

    fn registry_with_faulty(faulting: &Arc<AtomicBool>, panic: bool) -> Arc<LanguageRegistry> {
        let mut registry = LanguageRegistry::with_builtin_languages();
        let flag = Arc::clone(faulting);
        registry.register("faulty", move || {
            Arc::new(Faulty {
                faulting: Arc::clone(&flag),
                panic,
            }) as Arc<dyn Lexer>
        });
        Arc::new(registry)
    }

    #[test]
    fn test_attach_starts_idle() {
        let mut doc = Document::with_text("fn main() {}");
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            no_debounce("rust"),
            sink,
        );

        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        assert_eq!(pipeline.language_id(), "rust");
        assert!(pipeline.current().is_none());
        assert!(applied.lock().is_empty());
        assert_eq!(doc.listener_count(), 1);
    }

    #[test]
    fn test_inline_edit_applies_immediately() {
        let mut doc = Document::with_text("fn main() {}");
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            no_debounce("rust"),
            sink,
        );

        doc.insert(0, "pub ").unwrap();

        let applied = applied.lock();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].lines[0].text, "pub fn main() {}");
        assert_eq!(applied[0].tokens(0)[0].kind, TokenKind::Keyword);
        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        assert_eq!(pipeline.dirty_line(), None);
    }

    #[test]
    fn test_rapid_edits_coalesce_into_one_apply() {
        let mut doc = Document::with_text("a = 1\nb = 2\nc = 3\nd = 4");
        let queued = Queued::new();
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            no_debounce("python"),
            sink,
        );

        let line_start = |doc: &Document, line| doc.position_to_offset(line, 0).unwrap();
        let at = line_start(&doc, 2);
        doc.insert(at, "x").unwrap();
        let at = line_start(&doc, 1);
        doc.insert(at, "y").unwrap();
        let at = line_start(&doc, 3);
        doc.insert(at, "z").unwrap();

        assert_eq!(pipeline.status(), PipelineStatus::Pending);
        assert_eq!(pipeline.dirty_line(), Some(1));
        assert_eq!(pipeline.revision(), 3);

        queued.drain();

        let applied = applied.lock();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].revision, 3);
        let texts: Vec<&str> = applied[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a = 1", "yb = 2", "xc = 3", "zd = 4"]);
        assert_eq!(pipeline.status(), PipelineStatus::Idle);
    }

    #[test]
    fn test_result_superseded_before_apply_is_discarded() {
        let mut doc = Document::with_text("one");
        let queued = Queued::new();
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            no_debounce("rust"),
            sink,
        );

        doc.insert(3, " two").unwrap();
        queued.worker.run_pending();
        assert_eq!(queued.apply.pending(), 1);

        doc.insert(7, " three").unwrap();
        queued.apply.run_pending();
        assert!(applied.lock().is_empty());
        assert_eq!(pipeline.status(), PipelineStatus::Pending);

        queued.drain();
        let applied = applied.lock();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].lines[0].text, "one two three");
    }

    #[test]
    fn test_applied_revisions_are_monotonic() {
        let mut doc = Document::with_text("");
        let queued = Queued::new();
        let (applied, sink) = recorder();
        let _pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            no_debounce("c"),
            sink,
        );

        for i in 0..10 {
            doc.insert(doc.len_chars(), "x").unwrap();
            if i % 3 == 0 {
                queued.drain();
            }
        }
        queued.drain();

        let revisions: Vec<u64> = applied.lock().iter().map(|m| m.revision).collect();
        assert!(revisions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(revisions.last(), Some(&10));
    }

    #[test]
    fn test_unchanged_lines_are_shared_between_applies() {
        let mut doc = Document::with_text("int a;\nint b;\nint c;");
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            no_debounce("c"),
            sink,
        );
        pipeline.request_full_relex();

        let at = doc.position_to_offset(1, 5).unwrap();
        doc.insert(at, "b").unwrap();

        let applied = applied.lock();
        assert_eq!(applied.len(), 2);
        let (before, after) = (&applied[0], &applied[1]);
        assert!(Arc::ptr_eq(&before.lines[0], &after.lines[0]));
        assert!(!Arc::ptr_eq(&before.lines[1], &after.lines[1]));
        assert!(Arc::ptr_eq(&before.lines[2], &after.lines[2]));
    }

    #[test]
    fn test_language_switch_forces_full_relex() {
        let mut doc = Document::with_text("a\nb\nc\nd");
        let queued = Queued::new();
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            no_debounce(PLAIN_TEXT),
            sink,
        );

        doc.insert(doc.len_chars(), "x").unwrap();
        assert_eq!(pipeline.dirty_line(), Some(3));

        pipeline.set_language_id("rust");
        assert_eq!(pipeline.dirty_line(), Some(0));
        assert_eq!(pipeline.revision(), 2);
        assert_eq!(pipeline.language_id(), "rust");

        queued.drain();
        assert_eq!(applied.lock().len(), 1);
    }

    #[test]
    fn test_unknown_language_is_plain_text() {
        let mut doc = Document::with_text("fn main() {}");
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            no_debounce("rust"),
            sink,
        );

        pipeline.set_language_id("klingon");
        let map = pipeline.current().unwrap();
        assert_eq!(map.token_count(), 0);
        assert_eq!(applied.lock().len(), 1);
    }

    fn check_fault_recovery(panic: bool) {
        let faulting = Arc::new(AtomicBool::new(true));
        let mut doc = Document::with_text("let x = 1;\nlet y = 2;");
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            registry_with_faulty(&faulting, panic),
            Executors::inline(),
            no_debounce("faulty"),
            sink,
        );

        pipeline.request_full_relex();
        let fallback = pipeline.current().unwrap();
        assert!(fallback.tokens(0).is_empty());
        assert_eq!(fallback.lines[0].text, "let x = 1;");
        assert_eq!(fallback.line_count(), 2);
        assert_eq!(pipeline.status(), PipelineStatus::Idle);

        // Still usable while faulting
        doc.insert(0, "// ").unwrap();
        assert!(pipeline.current().unwrap().tokens(0).is_empty());

        faulting.store(false, Ordering::SeqCst);
        pipeline.set_language_id("rust");
        let map = pipeline.current().unwrap();
        assert_eq!(map.tokens(0), &[Token::new(0, 13, TokenKind::Comment)]);
        assert_eq!(map.tokens(1)[0].kind, TokenKind::Keyword);
        assert_eq!(applied.lock().len(), 3);
    }

    #[test]
    fn test_lexer_error_falls_back_and_recovers() {
        check_fault_recovery(false);
    }

    #[test]
    fn test_lexer_panic_falls_back_and_recovers() {
        check_fault_recovery(true);
    }

    #[test]
    fn test_fault_clears_without_language_switch() {
        let faulting = Arc::new(AtomicBool::new(true));
        let mut doc = Document::with_text("abc");
        let (_applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            registry_with_faulty(&faulting, false),
            Executors::inline(),
            no_debounce("faulty"),
            sink,
        );

        pipeline.request_full_relex();
        assert_eq!(pipeline.current().unwrap().token_count(), 0);

        faulting.store(false, Ordering::SeqCst);
        doc.insert(3, "d").unwrap();
        assert_eq!(pipeline.current().unwrap().token_count(), 1);
    }

    #[test]
    fn test_dispose_stops_callbacks() {
        let mut doc = Document::with_text("x");
        let (applied, sink) = recorder();
        let mut pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            no_debounce("rust"),
            sink,
        );

        doc.insert(1, "y").unwrap();
        assert_eq!(applied.lock().len(), 1);

        pipeline.dispose(&mut doc);
        assert_eq!(pipeline.status(), PipelineStatus::Disposed);
        assert_eq!(doc.listener_count(), 0);

        doc.insert(2, "z").unwrap();
        pipeline.set_language_id("c");
        pipeline.request_full_relex();
        assert_eq!(applied.lock().len(), 1);
    }

    #[test]
    fn test_dispose_suppresses_in_flight_results() {
        let mut doc = Document::with_text("x");
        let queued = Queued::new();
        let (applied, sink) = recorder();
        let mut pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            no_debounce("rust"),
            sink,
        );

        doc.insert(1, "y").unwrap();
        queued.worker.run_pending();
        doc.insert(2, "z").unwrap();

        pipeline.dispose(&mut doc);
        queued.drain();
        assert!(applied.lock().is_empty());
    }

    #[test]
    fn test_dropped_pipeline_leaves_document_usable() {
        let mut doc = Document::with_text("x");
        let (applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            no_debounce("rust"),
            sink,
        );
        drop(pipeline);

        doc.insert(1, "y").unwrap();
        assert_eq!(doc.text(), "xy");
        assert!(applied.lock().is_empty());
        // Inert until the document goes away; only dispose unregisters it
        assert_eq!(doc.listener_count(), 1);
    }

    #[test]
    fn test_dirty_line_ignores_unicode_separators() {
        let mut doc = Document::with_text("a\u{2028}b\nc\nd");
        let queued = Queued::new();
        let (_applied, sink) = recorder();
        let pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            no_debounce("rust"),
            sink,
        );

        let at = doc.position_to_offset(1, 0).unwrap();
        doc.insert(at, "x").unwrap();
        assert_eq!(pipeline.dirty_line(), Some(1));

        queued.drain();
        let current = pipeline.current().unwrap();
        assert_eq!(current.lines[0].text, "a\u{2028}b");
        assert_eq!(current.lines[1].text, "xc");
    }

    #[test]
    fn test_inline_worker_ignores_debounce() {
        let mut doc = Document::new();
        let (applied, sink) = recorder();
        let _pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            PipelineConfig::default()
                .with_debounce(Duration::from_secs(10))
                .with_language("rust"),
            sink,
        );

        let started = std::time::Instant::now();
        for i in 0..10 {
            doc.insert(i, "x").unwrap();
        }
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(applied.lock().len(), 10);
    }

    #[test]
    fn test_default_config_on_inline_executors_does_not_block_edits() {
        let mut doc = Document::new();
        let (applied, sink) = recorder();
        let _pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            Executors::inline(),
            PipelineConfig::default().with_language("rust"),
            sink,
        );

        let started = std::time::Instant::now();
        for i in 0..10 {
            doc.insert(i, "x").unwrap();
        }
        assert!(started.elapsed() < Duration::from_millis(DEFAULT_DEBOUNCE_MS * 5));
        assert_eq!(applied.lock().last().unwrap().lines[0].text, "xxxxxxxxxx");
    }

    #[test]
    fn test_queued_worker_debounces_newest_job_only() {
        let mut doc = Document::with_text("x");
        let queued = Queued::new();
        let (applied, sink) = recorder();
        let _pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            PipelineConfig::default()
                .with_debounce(Duration::from_millis(200))
                .with_language("rust"),
            sink,
        );

        for i in 1..4 {
            doc.insert(i, "y").unwrap();
        }

        let started = std::time::Instant::now();
        assert_eq!(queued.worker.run_pending(), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(500));

        queued.apply.run_pending();
        assert_eq!(applied.lock().len(), 1);
    }

    #[test]
    fn test_dispose_waits_for_running_callback() {
        use std::sync::mpsc;

        let mut doc = Document::with_text("x");
        let queued = Queued::new();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let finished = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&finished);
        let mut pipeline = LexerPipeline::attach(
            &mut doc,
            Arc::new(LanguageRegistry::with_builtin_languages()),
            queued.executors(),
            no_debounce("rust"),
            move |_map| {
                let _ = entered_tx.send(());
                let _ = release_rx.recv();
                done.store(true, Ordering::SeqCst);
            },
        );

        doc.insert(1, "y").unwrap();
        queued.worker.run_pending();
        let apply = Arc::clone(&queued.apply);
        let runner = std::thread::spawn(move || apply.run_pending());
        entered_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let releaser = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            let _ = release_tx.send(());
        });
        pipeline.dispose(&mut doc);

        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(pipeline.status(), PipelineStatus::Disposed);
        runner.join().unwrap();
        releaser.join().unwrap();
    }
}
