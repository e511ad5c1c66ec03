/// Reactive layer: inputs, derived values and sinks with explicit
/// dependency tracking.
///
/// Architecture:
/// ```text
///   set(signal, value)
///        │
///        ▼
///   ┌──────────┐   Invalidate{target, source}   ┌──────────────┐
///   │  Input    │ ─────────────────────────────▶ │ Derived/Sink  │ ─▶ … (marked Stale)
///   └──────────┘                                 └──────────────┘
///        ▲                                              │
///        │        get(memo) / flush(): pull, re-record  │
///        └────────────── read-set, cache, Fresh ◀───────┘
/// ```
///
/// Invalidation is pushed eagerly; recomputation is pulled lazily. Sinks are
/// recomputed by [`ReactiveGraph::flush`].

mod graph;
mod node;

pub use graph::{ReactiveGraph, Scope};
pub use node::{Memo, NodeId, NodeKind, NodeState, Notification, Signal, Source};
