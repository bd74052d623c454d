//! Main-thread plugin implementation.
//!
//! Handles parameter metadata queries, main-thread flush, state save/restore,
//! latency and audio port configuration. All methods run on the host's main
//! thread, never on the audio thread.

use crate::events::HostEvents;
use crate::shared::WaveclipShared;
use clack_extensions::audio_ports::{
    AudioPortFlags, AudioPortInfo, AudioPortInfoWriter, AudioPortType, PluginAudioPortsImpl,
};
use clack_extensions::latency::PluginLatencyImpl;
use clack_extensions::params::{
    ParamDisplayWriter, ParamInfo, ParamInfoFlags, ParamInfoWriter, PluginMainThreadParams,
};
use clack_extensions::state::PluginStateImpl;
use clack_plugin::prelude::*;
use clack_plugin::stream::{InputStream, OutputStream};
use clack_plugin::utils::Cookie;
use waveclip_core::{Lifecycle, LifecycleError, ParamFlags, ParamId, apply_all, params, state};

/// Processing latency reported to the host.
pub const LATENCY_SAMPLES: u32 = 0;

/// Main-thread state for the waveclip plugin.
///
/// Owns the instance [`Lifecycle`] while no audio processor exists; the
/// audio processor takes a copy at activation and hands it back at
/// deactivation.
pub struct WaveclipMainThread<'a> {
    shared: &'a WaveclipShared,
    lifecycle: Lifecycle,
}

impl<'a> WaveclipMainThread<'a> {
    /// Create the main-thread handler. The instance starts `Initialized`.
    pub fn new(shared: &'a WaveclipShared) -> Result<Self, LifecycleError> {
        let mut lifecycle = Lifecycle::new();
        lifecycle.init()?;
        Ok(Self { shared, lifecycle })
    }

    /// Lifecycle as last seen by the main thread.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub(crate) fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }
}

impl<'a> PluginMainThread<'a, WaveclipShared> for WaveclipMainThread<'a> {}

impl Drop for WaveclipMainThread<'_> {
    fn drop(&mut self) {
        match self.lifecycle.destroy() {
            Ok(()) => tracing::info!("waveclip instance destroyed"),
            Err(err) => tracing::warn!("waveclip instance dropped while live: {err}"),
        }
    }
}

// ── Parameter Extension ─────────────────────────────────────────────────────

/// Map waveclip `ParamFlags` to CLAP `ParamInfoFlags`.
pub fn map_flags(flags: ParamFlags) -> ParamInfoFlags {
    let mut clap_flags = ParamInfoFlags::empty();

    if flags.contains(ParamFlags::AUTOMATABLE) {
        clap_flags |= ParamInfoFlags::IS_AUTOMATABLE;
    }
    if flags.contains(ParamFlags::STEPPED) {
        clap_flags |= ParamInfoFlags::IS_STEPPED;
    }

    clap_flags
}

impl PluginMainThreadParams for WaveclipMainThread<'_> {
    fn count(&mut self) -> u32 {
        params::PARAM_COUNT as u32
    }

    fn get_info(&mut self, param_index: u32, info: &mut ParamInfoWriter) {
        let Some(desc) = params::descriptor(param_index as usize) else {
            return;
        };

        info.set(&ParamInfo {
            id: ClapId::new(desc.id.0),
            name: desc.name.as_bytes(),
            module: b"",
            min_value: f64::from(desc.min),
            max_value: f64::from(desc.max),
            default_value: f64::from(desc.default),
            flags: map_flags(desc.flags),
            cookie: Cookie::default(),
        });
    }

    fn get_value(&mut self, param_id: ClapId) -> Option<f64> {
        self.shared.value(ParamId(param_id.get()))
    }

    fn value_to_text(
        &mut self,
        param_id: ClapId,
        value: f64,
        writer: &mut ParamDisplayWriter,
    ) -> core::fmt::Result {
        use core::fmt::Write;

        let Some(display) = params::display_value(ParamId(param_id.get()), value) else {
            return Err(core::fmt::Error);
        };
        write!(writer, "{display}")
    }

    fn text_to_value(&mut self, param_id: ClapId, text: &core::ffi::CStr) -> Option<f64> {
        params::parse_value(ParamId(param_id.get()), text.to_str().ok()?)
    }

    fn flush(&mut self, input: &InputEvents, _output: &mut OutputEvents) {
        if !self.lifecycle.can_flush() {
            tracing::warn!("main-thread flush ignored in {:?}", self.lifecycle.state());
            return;
        }

        let mut store = self.shared.snapshot();
        let applied = apply_all(&mut store, &HostEvents::new(input));
        if applied > 0 {
            tracing::debug!("main-thread flush applied {applied} change(s)");
            self.shared.schedule_reload(&store);
        }
    }
}

// ── State Extension ─────────────────────────────────────────────────────────

/// State format: the fixed 16-byte blob of [`waveclip_core::state`].
impl PluginStateImpl for WaveclipMainThread<'_> {
    fn save(&mut self, output: &mut OutputStream) -> Result<(), PluginError> {
        state::save(&self.shared.snapshot(), output).map_err(|err| {
            tracing::warn!("state save failed: {err}");
            PluginError::Message("Failed to write state")
        })?;
        tracing::debug!("state saved");
        Ok(())
    }

    fn load(&mut self, input: &mut InputStream) -> Result<(), PluginError> {
        let store = state::load(input).map_err(|err| {
            tracing::warn!("state load failed: {err}");
            PluginError::Message("Failed to read state")
        })?;

        self.shared.schedule_reload(&store);
        if self.lifecycle.is_active() {
            self.shared.request_process();
        }
        tracing::info!(
            "state loaded: drive={} mix={} mode={}",
            store.drive(),
            store.mix(),
            store.mode().label()
        );
        Ok(())
    }
}

// ── Latency Extension ───────────────────────────────────────────────────────

impl PluginLatencyImpl for WaveclipMainThread<'_> {
    fn get(&mut self) -> u32 {
        LATENCY_SAMPLES
    }
}

// ── Audio Ports Extension ───────────────────────────────────────────────────

impl PluginAudioPortsImpl for WaveclipMainThread<'_> {
    fn count(&mut self, _is_input: bool) -> u32 {
        1
    }

    fn get(&mut self, index: u32, is_input: bool, writer: &mut AudioPortInfoWriter) {
        if index == 0 {
            let name: &[u8] = if is_input { b"Stereo In" } else { b"Distorted Output" };
            writer.set(&AudioPortInfo {
                id: ClapId::new(0),
                name,
                channel_count: 2,
                flags: AudioPortFlags::IS_MAIN,
                port_type: Some(AudioPortType::STEREO),
                in_place_pair: None,
            });
        }
    }
}
