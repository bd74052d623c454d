//! CLAP plugin façade for waveclip.
//!
//! This crate wires the real-time core in `waveclip-core` to the CLAP plugin
//! format via the `clack-plugin` safe wrapper. Building it produces a single
//! `.clap` binary exporting one plugin.
//!
//! # Architecture
//!
//! ```text
//! Main thread                 Audio thread
//! ───────────                 ────────────
//! param queries               owns BlockProcessor + ParameterStore
//! state save/load  ──────►    adopts scheduled reloads per block
//! main-thread flush           publishes values after every block
//!          ╲                 ╱
//!           WaveclipShared (atomics, no locks)
//! ```
//!
//! | waveclip | CLAP |
//! |----------|------|
//! | `ParamId(u32)` | `clap_id` |
//! | `params::display_value()` | `value_to_text()` |
//! | `ParamFlags::STEPPED` | `CLAP_PARAM_IS_STEPPED` |
//! | `state::save/load` | `clap_plugin_state` |
//! | `Lifecycle` | activate / start_processing / stop_processing / deactivate |
//!
//! The plugin keeps the descriptor id and parameter ids of the plugin it
//! replaces so saved sessions and automation lanes still resolve.

pub mod audio;
pub mod events;
pub mod main_thread;
pub mod shared;

pub use audio::{AudioEngine, WaveclipAudioProcessor};
pub use main_thread::WaveclipMainThread;
pub use shared::{HostCallbacks, WaveclipShared};

use clack_extensions::audio_ports::PluginAudioPorts;
use clack_extensions::latency::PluginLatency;
use clack_extensions::params::PluginParams;
use clack_extensions::state::PluginState;
use clack_plugin::prelude::*;

/// Reverse-DNS plugin identifier.
pub const PLUGIN_ID: &str = "org.surge-synth-team.clap-c99-distortion";
/// Plugin display name.
pub const PLUGIN_NAME: &str = "Bad Distortion written in C99";
/// Plugin vendor.
pub const PLUGIN_VENDOR: &str = "Surge Synth Team";
/// Plugin version string.
pub const PLUGIN_VERSION: &str = "1.0.0";

/// The waveclip plugin type.
///
/// Ties together [`WaveclipShared`], [`WaveclipAudioProcessor`], and
/// [`WaveclipMainThread`].
pub struct WaveclipPlugin;

impl Plugin for WaveclipPlugin {
    type AudioProcessor<'a> = WaveclipAudioProcessor<'a>;
    type Shared<'a> = WaveclipShared;
    type MainThread<'a> = WaveclipMainThread<'a>;

    fn declare_extensions(builder: &mut PluginExtensions<Self>, _shared: Option<&WaveclipShared>) {
        builder.register::<PluginAudioPorts>();
        builder.register::<PluginLatency>();
        builder.register::<PluginParams>();
        builder.register::<PluginState>();
    }
}

impl DefaultPluginFactory for WaveclipPlugin {
    fn get_descriptor() -> PluginDescriptor {
        use clack_plugin::plugin::features::{AUDIO_EFFECT, STEREO};
        PluginDescriptor::new(PLUGIN_ID, PLUGIN_NAME)
            .with_vendor(PLUGIN_VENDOR)
            .with_version(PLUGIN_VERSION)
            .with_features([AUDIO_EFFECT, STEREO])
    }

    fn new_shared(host: HostSharedHandle<'_>) -> Result<WaveclipShared, PluginError> {
        // SAFETY: CLAP specification §plugin-instance guarantees the host outlives
        // the plugin. We extend the lifetime to 'static to store in closures.
        #[allow(unsafe_code)]
        let host: HostSharedHandle<'static> = unsafe { core::mem::transmute(host) };

        tracing::info!("waveclip instance created");

        let request_process: Box<dyn Fn() + Send + Sync> = Box::new(move || {
            host.request_process();
        });

        Ok(WaveclipShared::new(
            HostCallbacks::none().with_request_process(request_process),
        ))
    }

    fn new_main_thread<'a>(
        _host: HostMainThreadHandle<'a>,
        shared: &'a WaveclipShared,
    ) -> Result<WaveclipMainThread<'a>, PluginError> {
        WaveclipMainThread::new(shared).map_err(|err| {
            tracing::warn!("init rejected: {err}");
            PluginError::Message("Failed to initialize plugin instance")
        })
    }
}

clack_plugin::clack_export_entry!(SinglePluginEntry<WaveclipPlugin>);
