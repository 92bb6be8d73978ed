use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fxhash::FxHashSet;

use crate::time::SimTime;

///
/// A handle to a scheduled event, usable to cancel it before dispatch.
///
/// Handles are cheap copies of the event's insertion sequence number and
/// stay valid for the lifetime of the runtime that issued them. Cancelling
/// a handle whose event was already dispatched or cancelled is a no-op.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventHandle(u64);

pub(crate) struct EventNode<E> {
    pub(crate) time: SimTime,
    seq: u64,
    pub(crate) event: E,
}

// Total order by (time, seq), reversed so that the binary max-heap yields
// the earliest event first. Equal timestamps dispatch in insertion order.
impl<E> Ord for EventNode<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<E> PartialOrd for EventNode<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> PartialEq for EventNode<E> {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl<E> Eq for EventNode<E> {}

///
/// The future event set of a runtime.
///
/// Cancellation is tombstone-based: a cancelled event stays in the heap
/// and is skipped on fetch, so the heap structure is never invalidated.
/// The `live` set tracks not-yet-dispatched sequence numbers, which makes
/// cancelling an already-dispatched handle an exact no-op and guarantees
/// every tombstone is eventually collected.
///
pub(crate) struct EventQueue<E> {
    heap: BinaryHeap<EventNode<E>>,
    live: FxHashSet<u64>,
    cancelled: FxHashSet<u64>,
    next_seq: u64,
}

impl<E> EventQueue<E> {
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(64),
            live: FxHashSet::default(),
            cancelled: FxHashSet::default(),
            next_seq: 0,
        }
    }

    /// The number of live (scheduled and not cancelled) events.
    pub(crate) fn len(&self) -> usize {
        self.live.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub(crate) fn add(&mut self, time: SimTime, event: E) -> EventHandle {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.live.insert(seq);
        self.heap.push(EventNode { time, seq, event });
        EventHandle(seq)
    }

    pub(crate) fn cancel(&mut self, handle: EventHandle) {
        if self.live.remove(&handle.0) {
            self.cancelled.insert(handle.0);
        }
    }

    /// Fetches the earliest live event, skipping over tombstones.
    pub(crate) fn fetch_next(&mut self) -> Option<EventNode<E>> {
        while let Some(node) = self.heap.pop() {
            if self.cancelled.remove(&node.seq) {
                continue;
            }
            self.live.remove(&node.seq);
            return Some(node);
        }
        None
    }

    /// Puts a fetched event back, preserving its position in the total order.
    pub(crate) fn restore(&mut self, node: EventNode<E>) {
        self.live.insert(node.seq);
        self.heap.push(node);
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
        self.cancelled.clear();
    }
}
