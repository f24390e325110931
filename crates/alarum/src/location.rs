//! Caller attribution for emitted warnings.
//!
//! A warning should point at the code that triggered it, not at the
//! `emit` call inside some helper. Depth 1 is the immediate caller of the
//! emission entry point, captured precisely via `#[track_caller]`. Deeper
//! requests walk the live call stack with the `backtrace` crate; when that
//! fails (stripped symbols, stack shorter than requested) the resolver
//! falls back to the depth-1 location rather than surfacing an error.

use std::fmt;

/// Immutable attribution for one emitted warning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Module identifier, e.g. `myapp::config`.
    pub module: String,
    /// 1-based line number; 0 when unknown.
    pub line: u32,
}

impl SourceLocation {
    /// Create a location from a module identifier and line number.
    pub fn new(module: impl Into<String>, line: u32) -> Self {
        SourceLocation {
            module: module.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.line)
    }
}

/// Symbol prefix identifying this crate's own frames in a backtrace.
const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// Derive a module identifier from a source file path.
///
/// Everything after the last `src` path component, joined with `::`, with
/// the `.rs` suffix stripped; falls back to the file stem for paths without
/// a `src` component.
pub(crate) fn module_from_file(file: &str) -> String {
    let normalized = file.replace('\\', "/");
    let trimmed = normalized.strip_suffix(".rs").unwrap_or(&normalized);
    let parts: Vec<&str> = trimmed.split('/').filter(|p| !p.is_empty()).collect();
    let tail: &[&str] = match parts.iter().rposition(|p| *p == "src") {
        Some(idx) => parts.get(idx + 1..).unwrap_or(&[]),
        None => parts.last().map_or(&[], std::slice::from_ref),
    };
    if tail.is_empty() {
        "<unknown>".to_owned()
    } else {
        tail.join("::")
    }
}

/// Location of the immediate caller of the (also `#[track_caller]`)
/// emission entry point.
#[track_caller]
pub(crate) fn caller() -> SourceLocation {
    let loc = std::panic::Location::caller();
    SourceLocation {
        module: module_from_file(loc.file()),
        line: loc.line(),
    }
}

/// Resolve the location `depth` frames out from the emission entry point.
///
/// Depth 1 is `fallback` (the `#[track_caller]` capture). Deeper depths
/// walk the stack; any resolution failure recovers by returning `fallback`.
pub(crate) fn resolve(depth: u32, fallback: SourceLocation) -> SourceLocation {
    if depth <= 1 {
        return fallback;
    }
    match resolve_via_backtrace(depth) {
        Some(location) => location,
        None => {
            tracing::trace!(depth, "stack depth unavailable, attributing to immediate caller");
            fallback
        }
    }
}

/// Walk the live stack and pick the frame `depth` levels outside this
/// crate. Returns `None` when frames cannot be symbolized or the stack is
/// shorter than requested.
fn resolve_via_backtrace(depth: u32) -> Option<SourceLocation> {
    let mut frames: Vec<(bool, Option<SourceLocation>)> = Vec::new();

    backtrace::trace(|frame| {
        let mut internal = false;
        let mut resolved = None;
        backtrace::resolve_frame(frame, |symbol| {
            if let Some(name) = symbol.name() {
                if name.to_string().contains(CRATE_PREFIX) {
                    internal = true;
                }
            }
            if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                resolved = Some(SourceLocation::new(
                    module_from_file(&file.to_string_lossy()),
                    line,
                ));
            }
        });
        frames.push((internal, resolved));
        true
    });

    // The frame after the last crate-internal one is depth 1.
    let last_internal = frames.iter().rposition(|(internal, _)| *internal)?;
    let target = last_internal.checked_add(depth as usize)?;
    frames.get(target)?.1.clone()
}
