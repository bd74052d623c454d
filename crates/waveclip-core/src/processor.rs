//! Sample-accurate audio block processing.
//!
//! [`BlockProcessor`] owns the [`ParameterStore`] and drives an
//! [`EventDemux`] over each block. For every run of frames it takes a
//! [`ShapeSettings`] snapshot of the store at the start of the run and hands
//! it, with the run's range, to a renderer. Parameter changes therefore land
//! on the exact sample the host asked for, independently of block size.
//!
//! Nothing here allocates, locks or fails.

use core::ops::Range;

use crate::events::{EventDemux, EventList, WorkItem, apply_all};
use crate::params::ParameterStore;
use crate::shaper::{ShapeSettings, shape_block, shape_block_in_place};

/// What the host should do after a `process()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Keep calling `process()`. The shaper has no tail, but it never asks the
    /// host to stop either.
    Continue,
}

/// Stereo waveshaping processor with sample-accurate automation.
///
/// # Example
///
/// ```rust
/// use waveclip_core::{BlockProcessor, Event, ProcessStatus, params};
///
/// let mut processor = BlockProcessor::new();
/// let events = [Event::param_value(0, params::MIX_ID, 1.0)];
///
/// let input = [0.5f32, 1.5, -2.0];
/// let mut left = [0.0f32; 3];
/// let mut right = [0.0f32; 3];
/// let status = processor.process(&events[..], [&input, &input], [&mut left, &mut right]);
///
/// assert_eq!(status, ProcessStatus::Continue);
/// assert_eq!(left, [0.5, 1.0, -1.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockProcessor {
    store: ParameterStore,
}

impl BlockProcessor {
    /// Processor with default parameter values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor starting from the given parameter values.
    pub fn with_store(store: ParameterStore) -> Self {
        Self { store }
    }

    /// Current parameter values.
    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// Mutable access to the parameter values, for callers that hold
    /// exclusive access outside `process()` (state load, initial sync).
    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    /// Walk one block: apply events to the store at their sample position
    /// and call `render` for every run of frames in between.
    ///
    /// `render` receives the settings captured at the start of the run; a
    /// change applied later in the block only affects later runs. The runs
    /// passed to `render` cover `0..frame_count` exactly once, in order.
    pub fn for_each_run<L, F>(&mut self, events: &L, frame_count: usize, mut render: F)
    where
        L: EventList + ?Sized,
        F: FnMut(&ShapeSettings, Range<usize>),
    {
        let mut demux = EventDemux::new(events, frame_count);
        for item in demux.by_ref() {
            match item {
                WorkItem::Apply(change) => {
                    self.store.apply(change);
                }
                WorkItem::Run(range) => {
                    let settings = self.store.settings();
                    render(&settings, range);
                }
            }
        }

        #[cfg(feature = "tracing")]
        if demux.ignored() > 0 {
            tracing::trace!(
                "process: ignored {} event(s) past block end ({frame_count} frames)",
                demux.ignored()
            );
        }
    }

    /// Render one stereo block from separate input and output buffers.
    ///
    /// The frame count is the length of the shortest buffer; the host
    /// contract is that all four have the same length. Always returns
    /// [`ProcessStatus::Continue`].
    pub fn process<L>(
        &mut self,
        events: &L,
        input: [&[f32]; 2],
        output: [&mut [f32]; 2],
    ) -> ProcessStatus
    where
        L: EventList + ?Sized,
    {
        let [in_left, in_right] = input;
        let [out_left, out_right] = output;
        let frames = in_left
            .len()
            .min(in_right.len())
            .min(out_left.len())
            .min(out_right.len());

        self.for_each_run(events, frames, |settings, range| {
            shape_block(settings, &in_left[range.clone()], &mut out_left[range.clone()]);
            shape_block(settings, &in_right[range.clone()], &mut out_right[range]);
        });

        ProcessStatus::Continue
    }

    /// Render one stereo block in place.
    pub fn process_in_place<L>(&mut self, events: &L, buffers: [&mut [f32]; 2]) -> ProcessStatus
    where
        L: EventList + ?Sized,
    {
        let [left, right] = buffers;
        let frames = left.len().min(right.len());

        self.for_each_run(events, frames, |settings, range| {
            shape_block_in_place(settings, &mut left[range.clone()]);
            shape_block_in_place(settings, &mut right[range]);
        });

        ProcessStatus::Continue
    }

    /// Apply queued events without producing audio.
    ///
    /// Returns the number of parameter changes accepted.
    pub fn flush<L>(&mut self, events: &L) -> usize
    where
        L: EventList + ?Sized,
    {
        apply_all(&mut self.store, events)
    }
}
