//! Waveclip Core - real-time waveshaping distortion engine
//!
//! This crate holds everything the audio callback of the waveclip plugin
//! touches, plus the fixed-layout state codec used to persist it. It has no
//! knowledge of any plugin API; the CLAP façade and the offline renderer both
//! drive the same [`BlockProcessor`].
//!
//! # Components
//!
//! - [`ParameterStore`] - current drive / mix / mode values, validated writes
//! - [`shaper`] - memoryless transfer functions (hard clip, cubic soft clip, sine fold)
//! - [`EventDemux`] - splits a block into "apply event" / "render run" work items
//! - [`BlockProcessor`] - sample-accurate block rendering on top of the demux
//! - [`state`] - 16-byte state encode / decode (plus looping stream I/O with `std`)
//! - [`Lifecycle`] - plugin instance state machine and its preconditions
//!
//! # Example
//!
//! ```rust
//! use waveclip_core::{BlockProcessor, Event, ParamId, params};
//!
//! let mut processor = BlockProcessor::new();
//! let events = [Event::param_value(4, params::MIX_ID, 1.0)];
//!
//! let input = [0.25f32; 8];
//! let mut left = [0.0f32; 8];
//! let mut right = [0.0f32; 8];
//! processor.process(&events[..], [&input, &input], [&mut left, &mut right]);
//!
//! // Frames before the event use the default mix of 0.5, frames after are fully wet.
//! assert_eq!(left[7], 0.25);
//! assert_eq!(processor.store().get(ParamId(8675309)), Some(1.0));
//! ```
//!
//! # Real-time safety
//!
//! Nothing reachable from [`BlockProcessor::process`] allocates, locks or
//! blocks. Every operation on that path is total: unknown parameter ids,
//! out-of-range values and malformed event times are absorbed, never reported.
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build without the standard library.
//! Only the stream-based [`state::save`] / [`state::load`] helpers need `std`.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod events;
pub mod lifecycle;
pub mod param_info;
pub mod params;
pub mod processor;
pub mod shaper;
pub mod state;

pub use events::{Event, EventDemux, EventKind, EventList, ParamChange, WorkItem, apply_all};
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleState};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId};
pub use params::{ParameterStore, ShapeMode, ValueDisplay};
pub use processor::{BlockProcessor, ProcessStatus};
pub use shaper::ShapeSettings;
pub use state::{STATE_SIZE, STATE_VERSION, StateError};
