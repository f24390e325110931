//! Delivery of warnings that survive filtering and deduplication.
//!
//! Exactly one handler is active at a time, held behind a shared slot so
//! scope snapshots keep a reference to the previous handler rather than a
//! copy. Dispatch is an enum, not a trait object, except for the
//! user-supplied `Custom` variant.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::category::CategoryId;
use crate::filter::Action;
use crate::location::SourceLocation;

/// One warning on its way to presentation. Ephemeral: consumed by the
/// handler or appended to a capture buffer, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningEvent {
    /// The warning text.
    pub message: String,
    /// Category the warning was emitted with.
    pub category: CategoryId,
    /// Category name, resolved at emission time.
    pub category_name: String,
    /// Where the warning was attributed.
    pub location: SourceLocation,
    /// The filter action that let it through.
    pub action: Action,
}

/// Renders an event into the single line the stream handler writes.
pub type Formatter = fn(&WarningEvent) -> String;

/// Default presentation: `module:line: CategoryName: message`.
pub fn default_format(event: &WarningEvent) -> String {
    format!(
        "{}:{}: {}: {}",
        event.location.module, event.location.line, event.category_name, event.message
    )
}

/// Writes formatted warnings to an output stream (stderr by default).
pub struct StreamHandler {
    stream: Box<dyn Write + Send>,
}

impl StreamHandler {
    /// Handler writing to the process's stderr.
    pub fn stderr() -> Self {
        StreamHandler {
            stream: Box::new(std::io::stderr()),
        }
    }

    /// Handler writing to an arbitrary stream.
    pub fn new(stream: Box<dyn Write + Send>) -> Self {
        StreamHandler { stream }
    }

    fn handle(&mut self, event: &WarningEvent, formatter: Formatter) {
        // A broken stream is the stream's concern; the engine carries on.
        let _ = writeln!(self.stream, "{}", formatter(event));
        let _ = self.stream.flush();
    }
}

/// Buffer collecting events instead of presenting them.
///
/// Handed out by [`Engine::scoped_capture`](crate::Engine::scoped_capture);
/// stays readable after the scope is released.
#[derive(Debug, Clone, Default)]
pub struct CapturedWarnings {
    events: Arc<Mutex<Vec<WarningEvent>>>,
}

impl CapturedWarnings {
    /// Create an empty capture buffer.
    pub fn new() -> Self {
        CapturedWarnings {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(&self, event: WarningEvent) {
        self.events.lock().push(event);
    }

    /// Snapshot of the events captured so far.
    pub fn events(&self) -> Vec<WarningEvent> {
        self.events.lock().clone()
    }

    /// Number of captured events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

/// The active delivery mechanism.
pub enum HandlerImpl {
    /// Format and write to a stream.
    Stream(StreamHandler),
    /// Append to a capture buffer.
    Capture(CapturedWarnings),
    /// User-supplied callback installed via
    /// [`Engine::set_handler`](crate::Engine::set_handler).
    Custom(Box<dyn FnMut(&WarningEvent) + Send>),
}

impl HandlerImpl {
    fn handle(&mut self, event: &WarningEvent, formatter: Formatter) {
        match self {
            HandlerImpl::Stream(handler) => handler.handle(event, formatter),
            HandlerImpl::Capture(buffer) => buffer.push(event.clone()),
            HandlerImpl::Custom(callback) => callback(event),
        }
    }
}

/// Shared slot holding the active handler.
///
/// Cloning shares the slot: a scope snapshot keeps the previous handler
/// alive through this handle and restores it by swapping the slot back in.
#[derive(Clone)]
pub(crate) struct SharedHandler(Arc<Mutex<HandlerImpl>>);

impl SharedHandler {
    pub(crate) fn stderr() -> Self {
        SharedHandler::from_impl(HandlerImpl::Stream(StreamHandler::stderr()))
    }

    pub(crate) fn from_impl(handler: HandlerImpl) -> Self {
        SharedHandler(Arc::new(Mutex::new(handler)))
    }

    pub(crate) fn capture(buffer: CapturedWarnings) -> Self {
        SharedHandler::from_impl(HandlerImpl::Capture(buffer))
    }

    pub(crate) fn deliver(&self, event: &WarningEvent, formatter: Formatter) {
        self.0.lock().handle(event, formatter);
    }
}
