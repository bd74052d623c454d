//! Zero-copy view of the host's input event queue.

use clack_plugin::events::spaces::CoreEventSpace;
use clack_plugin::prelude::*;
use waveclip_core::{Event, EventKind, EventList, ParamChange, ParamId};

/// [`EventList`] over a CLAP input event queue.
///
/// Events are converted on access; nothing is copied or allocated up front.
pub struct HostEvents<'e, 'a> {
    input: &'e InputEvents<'a>,
}

impl<'e, 'a> HostEvents<'e, 'a> {
    /// Wrap the host's input events for one `process()` or `flush()` call.
    pub fn new(input: &'e InputEvents<'a>) -> Self {
        Self { input }
    }
}

impl EventList for HostEvents<'_, '_> {
    fn len(&self) -> usize {
        self.input.len() as usize
    }

    fn get(&self, index: usize) -> Option<Event> {
        let event = self.input.get(u32::try_from(index).ok()?)?;
        let time = event.header().time();

        let kind = match event.as_core_event() {
            Some(CoreEventSpace::ParamValue(ev)) => match ev.param_id() {
                Some(id) => EventKind::ParamValue(ParamChange {
                    id: ParamId(id.get()),
                    value: ev.value(),
                }),
                None => EventKind::Other,
            },
            _ => EventKind::Other,
        };

        Some(Event { time, kind })
    }
}
