//! Thread-safe shared state for the waveclip CLAP plugin.
//!
//! `WaveclipShared` lives for the lifetime of the plugin instance and is
//! reachable from every CLAP thread. It never owns the authoritative
//! [`ParameterStore`]: that belongs to whichever side currently has exclusive
//! access (the audio processor while active, nobody while inactive). The
//! shared state only carries two lock-free mirrors:
//!
//! - `current`: what the instance is rendering with, for main-thread queries.
//!   The audio thread publishes into it after every block.
//! - `pending`: a store handed from the main thread (state load, flush while
//!   inactive) to the audio thread, guarded by the `reload_pending` flag.
//!
//! While a reload is pending, `pending` is authoritative: queries read it and
//! audio-thread publishes are dropped until the audio side adopts it.
//!
//! Each value is stored as an `AtomicU32` (f32 bit-cast, mode as its index).

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use waveclip_core::{ParamId, ParameterStore};

/// Host callbacks the plugin may invoke from any thread.
///
/// Injected at construction; `None` entries are no-ops (standalone and test
/// use).
#[derive(Default)]
pub struct HostCallbacks {
    request_process: Option<Box<dyn Fn() + Send + Sync>>,
}

impl HostCallbacks {
    /// Callbacks that do nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the callback asking the host to schedule a `process()` or
    /// `flush()` call.
    pub fn with_request_process(mut self, callback: Box<dyn Fn() + Send + Sync>) -> Self {
        self.request_process = Some(callback);
        self
    }

    /// Ask the host to schedule a `process()` or `flush()` call.
    pub fn request_process(&self) {
        if let Some(cb) = &self.request_process {
            cb();
        }
    }
}

/// Lock-free mirror of one [`ParameterStore`].
struct ParamBank {
    drive: AtomicU32,
    mix: AtomicU32,
    mode: AtomicU32,
}

impl ParamBank {
    fn new(store: &ParameterStore) -> Self {
        Self {
            drive: AtomicU32::new(store.drive().to_bits()),
            mix: AtomicU32::new(store.mix().to_bits()),
            mode: AtomicU32::new(store.mode().index() as u32),
        }
    }

    fn store(&self, store: &ParameterStore) {
        self.drive.store(store.drive().to_bits(), Ordering::Release);
        self.mix.store(store.mix().to_bits(), Ordering::Release);
        self.mode.store(store.mode().index() as u32, Ordering::Release);
    }

    fn load(&self) -> ParameterStore {
        ParameterStore::from_raw(
            f32::from_bits(self.drive.load(Ordering::Acquire)),
            f32::from_bits(self.mix.load(Ordering::Acquire)),
            self.mode.load(Ordering::Acquire) as i32,
        )
    }
}

/// Shared state accessible from all plugin threads.
pub struct WaveclipShared {
    current: ParamBank,
    pending: ParamBank,
    reload_pending: AtomicBool,
    callbacks: HostCallbacks,
}

impl WaveclipShared {
    /// Create shared state holding default parameter values.
    pub fn new(callbacks: HostCallbacks) -> Self {
        let defaults = ParameterStore::new();
        Self {
            current: ParamBank::new(&defaults),
            pending: ParamBank::new(&defaults),
            reload_pending: AtomicBool::new(false),
            callbacks,
        }
    }

    /// Values the instance is rendering with, or will render with once a
    /// pending reload is adopted.
    pub fn snapshot(&self) -> ParameterStore {
        if self.reload_pending.load(Ordering::Acquire) {
            self.pending.load()
        } else {
            self.current.load()
        }
    }

    /// Current value of one parameter, `None` for unknown ids.
    pub fn value(&self, id: ParamId) -> Option<f64> {
        self.snapshot().get(id)
    }

    /// Publish the audio thread's store after a block.
    ///
    /// Ignored while a reload is pending: the audio side has not seen the
    /// scheduled store yet, so its values are stale.
    pub fn publish(&self, store: &ParameterStore) {
        if !self.reload_pending.load(Ordering::Acquire) {
            self.current.store(store);
        }
    }

    /// Hand a complete store to the audio thread.
    ///
    /// The mirror is updated immediately so main-thread queries see the new
    /// values; the audio processor adopts them at its next `process()` or
    /// `flush()`.
    pub fn schedule_reload(&self, store: &ParameterStore) {
        self.pending.store(store);
        self.reload_pending.store(true, Ordering::Release);
        self.current.store(store);
    }

    /// Take a store scheduled by [`schedule_reload`](Self::schedule_reload),
    /// if any. Clears the flag and makes the taken store current.
    pub fn take_reload(&self) -> Option<ParameterStore> {
        if !self.reload_pending.swap(false, Ordering::AcqRel) {
            return None;
        }
        let store = self.pending.load();
        self.current.store(&store);
        Some(store)
    }

    /// Whether a reload is waiting for the audio thread.
    pub fn reload_pending(&self) -> bool {
        self.reload_pending.load(Ordering::Acquire)
    }

    /// Ask the host to schedule a `process()` or `flush()` call.
    pub fn request_process(&self) {
        self.callbacks.request_process();
    }
}

impl clack_plugin::prelude::PluginShared<'_> for WaveclipShared {}
