//! Logging facilities for Trellis.
//!
//! Trellis instruments itself with the `tracing` crate and never installs a
//! subscriber. To see logs, install one in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis=debug,trellis_core=info")
//!     .init();
//! ```
//!
//! The constants in [`targets`] and [`span_names`] are the strings used in
//! `target:` and span names, so filters can be written against them.

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// A full layout pass over a subtree.
    pub const LAYOUT: &str = "trellis::layout";
    /// Delivery of one backend input event.
    pub const DISPATCH: &str = "trellis::dispatch";
    /// A frame: popup placement, paint traversal and tooltip.
    pub const FRAME: &str = "trellis::frame";
    /// The refresh ticker thread.
    pub const TICKER: &str = "trellis::ticker";
}

/// Log targets used throughout Trellis.
pub mod targets {
    pub const CORE: &str = "trellis_core";
    pub const TICKER: &str = "trellis_core::ticker";
    pub const TREE: &str = "trellis::tree";
    pub const LAYOUT: &str = "trellis::layout";
    pub const DISPATCH: &str = "trellis::dispatch";
    pub const FOCUS: &str = "trellis::focus";
    pub const SCREEN: &str = "trellis::screen";
    pub const WIDGET: &str = "trellis::widget";
}

/// A guard that keeps a tracing span entered until it is dropped.
///
/// ```ignore
/// let _frame = PerfSpan::new(span_names::FRAME);
/// // ... draw ...
/// ```
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a trace-level span with the given name.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::trace_span!("perf", name = name).entered();
        Self { span }
    }
}
