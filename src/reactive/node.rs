use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::graph::Scope;

// ---------------------------------------------------------------------------
// Node identity and lifecycle
// ---------------------------------------------------------------------------

/// Index of a node inside its [`ReactiveGraph`](super::ReactiveGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Value supplied from outside the graph (a control).
    Input,
    /// Cached computation consumed by other nodes.
    Derived,
    /// Terminal computation whose value is presented to the user.
    Sink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Needs recomputation before its value can be used.
    Stale,
    /// Cached value is valid.
    Fresh,
}

/// Message sent along a subscription edge when an upstream value changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Invalidate { target: NodeId, source: NodeId },
}

// ---------------------------------------------------------------------------
// Typed handles
// ---------------------------------------------------------------------------

/// Handle to an input node holding a `T`.
pub struct Signal<T> {
    id: NodeId,
    _marker: PhantomData<fn() -> T>,
}

/// Handle to a derived or sink node producing a `T`.
pub struct Memo<T> {
    id: NodeId,
    _marker: PhantomData<fn() -> T>,
}

/// Anything a computation can read from: inputs and other computations.
pub trait Source<T> {
    fn id(&self) -> NodeId;
}

macro_rules! handle_impls {
    ($handle:ident) => {
        impl<T> $handle<T> {
            pub(crate) fn new(id: NodeId) -> Self {
                Self {
                    id,
                    _marker: PhantomData,
                }
            }

            pub fn id(&self) -> NodeId {
                self.id
            }
        }

        impl<T> Clone for $handle<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $handle<T> {}

        impl<T> fmt::Debug for $handle<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($handle), self.id)
            }
        }

        impl<T> Source<T> for $handle<T> {
            fn id(&self) -> NodeId {
                self.id
            }
        }
    };
}

handle_impls!(Signal);
handle_impls!(Memo);

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

pub(crate) type Value = Rc<dyn Any>;
pub(crate) type Compute = Rc<dyn Fn(&mut Scope<'_>) -> Value>;

/// One arena slot. Edges are kept on both ends so invalidation can walk
/// downstream and re-evaluation can unsubscribe upstream.
pub(crate) struct Slot {
    pub label: &'static str,
    pub kind: NodeKind,
    pub state: NodeState,
    pub value: Option<Value>,
    pub compute: Option<Compute>,
    pub dependencies: BTreeSet<NodeId>,
    pub subscribers: BTreeSet<NodeId>,
    pub runs: u64,
}

impl Slot {
    pub fn input(label: &'static str, value: Value) -> Self {
        Slot {
            label,
            kind: NodeKind::Input,
            state: NodeState::Fresh,
            value: Some(value),
            compute: None,
            dependencies: BTreeSet::new(),
            subscribers: BTreeSet::new(),
            runs: 0,
        }
    }

    pub fn computed(label: &'static str, kind: NodeKind, compute: Compute) -> Self {
        Slot {
            label,
            kind,
            state: NodeState::Stale,
            value: None,
            compute: Some(compute),
            dependencies: BTreeSet::new(),
            subscribers: BTreeSet::new(),
            runs: 0,
        }
    }
}
