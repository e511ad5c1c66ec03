use std::any::type_name;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use super::node::{
    Compute, Memo, NodeId, NodeKind, NodeState, Notification, Signal, Slot, Source, Value,
};

// ---------------------------------------------------------------------------
// ReactiveGraph – arena of inputs, derived values and sinks
// ---------------------------------------------------------------------------

/// Single-threaded dependency graph.
///
/// Nodes can only capture handles that already exist, so creation order is a
/// topological order and the graph is acyclic by construction.
#[derive(Default)]
pub struct ReactiveGraph {
    slots: Vec<Slot>,
    evaluating: Vec<NodeId>,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input node holding `value`.
    pub fn input<T: 'static>(&mut self, label: &'static str, value: T) -> Signal<T> {
        Signal::new(self.push(Slot::input(label, Rc::new(value))))
    }

    /// Register a lazily evaluated derived node.
    pub fn memo<T, F>(&mut self, label: &'static str, compute: F) -> Memo<T>
    where
        T: 'static,
        F: Fn(&mut Scope<'_>) -> T + 'static,
    {
        self.computed(label, NodeKind::Derived, compute)
    }

    /// Register a terminal node; stale sinks are recomputed by [`flush`](Self::flush).
    pub fn sink<T, F>(&mut self, label: &'static str, compute: F) -> Memo<T>
    where
        T: 'static,
        F: Fn(&mut Scope<'_>) -> T + 'static,
    {
        self.computed(label, NodeKind::Sink, compute)
    }

    fn computed<T, F>(&mut self, label: &'static str, kind: NodeKind, compute: F) -> Memo<T>
    where
        T: 'static,
        F: Fn(&mut Scope<'_>) -> T + 'static,
    {
        let compute: Compute = Rc::new(move |scope: &mut Scope<'_>| Rc::new(compute(scope)) as Value);
        Memo::new(self.push(Slot::computed(label, kind, compute)))
    }

    fn push(&mut self, slot: Slot) -> NodeId {
        let id = NodeId(self.slots.len());
        log::trace!("registered {:?} node {id} '{}'", slot.kind, slot.label);
        self.slots.push(slot);
        id
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Current value of an input. Does not record a dependency.
    pub fn read<T: 'static>(&self, signal: Signal<T>) -> Rc<T> {
        self.value_of(signal.id())
    }

    /// Current value of a computation, re-evaluating it first if it is stale.
    ///
    /// Without an intervening change the same `Rc` is returned and the
    /// computation does not run.
    pub fn get<T: 'static>(&mut self, memo: Memo<T>) -> Rc<T> {
        self.ensure_fresh(memo.id());
        self.value_of(memo.id())
    }

    fn value_of<T: 'static>(&self, id: NodeId) -> Rc<T> {
        let slot = &self.slots[id.0];
        let value = slot
            .value
            .clone()
            .unwrap_or_else(|| panic!("node {id} '{}' read before evaluation", slot.label));
        value.downcast::<T>().unwrap_or_else(|_| {
            panic!("node {id} '{}' does not hold a {}", slot.label, type_name::<T>())
        })
    }

    fn ensure_fresh(&mut self, id: NodeId) {
        if self.slots[id.0].state == NodeState::Fresh {
            return;
        }
        let Some(compute) = self.slots[id.0].compute.clone() else {
            return;
        };
        debug_assert!(
            !self.evaluating.contains(&id),
            "cycle through node {id} '{}'",
            self.slots[id.0].label
        );

        // The read-set is re-recorded on every evaluation.
        let previous = std::mem::take(&mut self.slots[id.0].dependencies);
        for dep in previous {
            self.slots[dep.0].subscribers.remove(&id);
        }

        self.evaluating.push(id);
        let value = {
            let mut scope = Scope {
                graph: self,
                observer: id,
            };
            compute(&mut scope)
        };
        self.evaluating.pop();

        let slot = &mut self.slots[id.0];
        slot.value = Some(value);
        slot.state = NodeState::Fresh;
        slot.runs += 1;
        log::trace!(
            "recomputed {id} '{}' (run {}, reads {:?})",
            slot.label,
            slot.runs,
            slot.dependencies
        );
    }

    fn subscribe(&mut self, observer: NodeId, source: NodeId) {
        self.slots[observer.0].dependencies.insert(source);
        self.slots[source.0].subscribers.insert(observer);
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Replace an input's value. Returns `false` (and invalidates nothing)
    /// when the new value equals the current one.
    pub fn set<T: PartialEq + 'static>(&mut self, signal: Signal<T>, value: T) -> bool {
        let id = signal.id();
        if *self.value_of::<T>(id) == value {
            return false;
        }
        self.slots[id.0].value = Some(Rc::new(value));
        self.notify(id);
        true
    }

    /// Modify an input through a closure, with the same change semantics as
    /// [`set`](Self::set).
    pub fn update<T, F>(&mut self, signal: Signal<T>, f: F) -> bool
    where
        T: Clone + PartialEq + 'static,
        F: FnOnce(&mut T),
    {
        let mut next = (*self.read(signal)).clone();
        f(&mut next);
        self.set(signal, next)
    }

    fn notify(&mut self, source: NodeId) {
        let mut queue: VecDeque<Notification> = self.slots[source.0]
            .subscribers
            .iter()
            .map(|&target| Notification::Invalidate { target, source })
            .collect();

        while let Some(Notification::Invalidate { target, source }) = queue.pop_front() {
            let slot = &mut self.slots[target.0];
            // A stale node's subscribers are already stale.
            if slot.state == NodeState::Stale {
                continue;
            }
            slot.state = NodeState::Stale;
            log::trace!("invalidated {target} '{}' via {source}", slot.label);
            queue.extend(
                slot.subscribers
                    .iter()
                    .map(|&next| Notification::Invalidate {
                        target: next,
                        source: target,
                    }),
            );
        }
    }

    /// Recompute every stale sink in creation order. Returns the sinks that ran.
    pub fn flush(&mut self) -> Vec<NodeId> {
        let stale: Vec<NodeId> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.kind == NodeKind::Sink && slot.state == NodeState::Stale)
            .map(|(i, _)| NodeId(i))
            .collect();
        for &id in &stale {
            self.ensure_fresh(id);
        }
        stale
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn label(&self, id: NodeId) -> &'static str {
        self.slots[id.0].label
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.slots[id.0].kind
    }

    pub fn state(&self, id: NodeId) -> NodeState {
        self.slots[id.0].state
    }

    /// How many times the node's computation has executed.
    pub fn runs(&self, id: NodeId) -> u64 {
        self.slots[id.0].runs
    }

    /// Read-set recorded during the node's last evaluation.
    pub fn dependencies(&self, id: NodeId) -> &BTreeSet<NodeId> {
        &self.slots[id.0].dependencies
    }

    pub fn subscribers(&self, id: NodeId) -> &BTreeSet<NodeId> {
        &self.slots[id.0].subscribers
    }
}

impl fmt::Debug for ReactiveGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.slots
                    .iter()
                    .map(|slot| (slot.label, slot.kind, slot.state, slot.runs)),
            )
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Scope – tracked reads during evaluation
// ---------------------------------------------------------------------------

/// Handed to a computation while it runs. Every read through the scope is
/// added to the computation's read-set.
pub struct Scope<'g> {
    graph: &'g mut ReactiveGraph,
    observer: NodeId,
}

impl Scope<'_> {
    pub fn get<T: 'static>(&mut self, source: impl Source<T>) -> Rc<T> {
        let id = source.id();
        self.graph.ensure_fresh(id);
        self.graph.subscribe(self.observer, id);
        self.graph.value_of(id)
    }
}
