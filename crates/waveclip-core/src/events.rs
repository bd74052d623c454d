//! Time-stamped input events and the block demultiplexer.
//!
//! A host hands the plugin one block of audio together with an ordered list of
//! events whose `time` is a sample offset into that block. [`EventDemux`]
//! walks both timelines at once and yields a flat sequence of work items:
//!
//! ```text
//! events at  [2, 2, 5]   frame_count = 10
//!
//! Run(0..2)  Apply(a)  Apply(b)  Run(2..5)  Apply(c)  Run(5..10)
//! ```
//!
//! The runs cover `0..frame_count` exactly once, in order, and every event is
//! yielded before the first sample at its time. Events sharing a time keep
//! their list order.
//!
//! # Out-of-contract input
//!
//! Hosts must deliver times in non-decreasing order and below the frame count.
//! When they do not, the demux stays total:
//!
//! - an event at `time >= frame_count` is dropped (see [`EventDemux::ignored`]);
//! - an event whose time lies before samples already rendered is applied at
//!   the current position, as if it had arrived at that frame.

use core::iter::FusedIterator;
use core::ops::Range;

use crate::param_info::ParamId;
use crate::params::ParameterStore;

/// A parameter-value change carried by an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamChange {
    /// Target parameter.
    pub id: ParamId,
    /// New value in the host's automation range.
    pub value: f64,
}

/// Event payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Parameter value change.
    ParamValue(ParamChange),
    /// Any other event (notes, MIDI, transport, ...). Skipped.
    Other,
}

/// A time-stamped input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Sample offset inside the current block.
    pub time: u32,
    /// Payload.
    pub kind: EventKind,
}

impl Event {
    /// Parameter-value event.
    pub const fn param_value(time: u32, id: ParamId, value: f64) -> Self {
        Self {
            time,
            kind: EventKind::ParamValue(ParamChange { id, value }),
        }
    }

    /// Event of a kind this plugin does not consume.
    pub const fn other(time: u32) -> Self {
        Self {
            time,
            kind: EventKind::Other,
        }
    }
}

/// An indexable, sized, ordered event collection.
///
/// Implemented for slices; plugin hosts implement it over their own event
/// queue so that no copy is made on the audio thread.
pub trait EventList {
    /// Number of events.
    fn len(&self) -> usize;

    /// Event at `index`, or `None` if it is out of bounds or unreadable.
    fn get(&self, index: usize) -> Option<Event>;

    /// Whether the list has no events.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventList for [Event] {
    #[inline]
    fn len(&self) -> usize {
        <[Event]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<Event> {
        <[Event]>::get(self, index).copied()
    }
}

#[cfg(feature = "std")]
impl EventList for std::vec::Vec<Event> {
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn get(&self, index: usize) -> Option<Event> {
        self.as_slice().get(index).copied()
    }
}

/// One unit of work produced by [`EventDemux`].
#[derive(Debug, Clone, PartialEq)]
pub enum WorkItem {
    /// Apply this change before rendering any further sample.
    Apply(ParamChange),
    /// Render these frames with the parameter values current right now.
    Run(Range<usize>),
}

/// Lazy splitter of one block into event applications and sample runs.
///
/// Finite and non-restartable: build a new one for every block.
#[derive(Debug)]
pub struct EventDemux<'a, L: EventList + ?Sized> {
    events: &'a L,
    next_event: usize,
    cursor: usize,
    frame_count: usize,
    ignored: usize,
}

impl<'a, L: EventList + ?Sized> EventDemux<'a, L> {
    /// Demultiplex `events` against a block of `frame_count` frames.
    pub fn new(events: &'a L, frame_count: usize) -> Self {
        Self {
            events,
            next_event: 0,
            cursor: 0,
            frame_count,
            ignored: 0,
        }
    }

    /// Events dropped so far because their time was past the block end.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// First frame not yet covered by a yielded run.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<L: EventList + ?Sized> Iterator for EventDemux<'_, L> {
    type Item = WorkItem;

    fn next(&mut self) -> Option<WorkItem> {
        while self.next_event < self.events.len() {
            let Some(event) = self.events.get(self.next_event) else {
                self.next_event += 1;
                continue;
            };

            let time = event.time as usize;
            if time >= self.frame_count {
                self.next_event += 1;
                self.ignored += 1;
                continue;
            }

            if time > self.cursor {
                let run = self.cursor..time;
                self.cursor = time;
                return Some(WorkItem::Run(run));
            }

            self.next_event += 1;
            if let EventKind::ParamValue(change) = event.kind {
                return Some(WorkItem::Apply(change));
            }
        }

        if self.cursor < self.frame_count {
            let run = self.cursor..self.frame_count;
            self.cursor = self.frame_count;
            return Some(WorkItem::Run(run));
        }

        None
    }
}

impl<L: EventList + ?Sized> FusedIterator for EventDemux<'_, L> {}

/// Apply every parameter event in list order, ignoring timestamps.
///
/// This is the flush step: automation arriving while no audio is rendered
/// still reaches the store. Returns the number of changes accepted.
pub fn apply_all<L: EventList + ?Sized>(store: &mut ParameterStore, events: &L) -> usize {
    let mut applied = 0;
    for index in 0..events.len() {
        if let Some(Event {
            kind: EventKind::ParamValue(change),
            ..
        }) = events.get(index)
            && store.apply(change)
        {
            applied += 1;
        }
    }
    applied
}
