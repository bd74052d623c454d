//! Audio processor for the waveclip CLAP plugin.
//!
//! Handles the real-time audio callback: adopts state scheduled by the main
//! thread, walks the host's events and audio through the core
//! [`BlockProcessor`], and publishes the resulting parameter values.

use core::ops::Range;

use crate::events::HostEvents;
use crate::main_thread::WaveclipMainThread;
use crate::shared::WaveclipShared;
use clack_extensions::params::PluginAudioProcessorParams;
use clack_plugin::prelude::*;
use waveclip_core::shaper::{ShapeSettings, shape_block, shape_block_in_place};
use waveclip_core::{
    BlockProcessor, EventList, Lifecycle, LifecycleError, LifecycleState, ParameterStore,
};

/// Host-independent half of the audio processor.
///
/// Owns the authoritative parameter store and the lifecycle between
/// activation and deactivation. Every entry point adopts a pending reload
/// first and publishes the store back into the shared mirror last.
pub struct AudioEngine<'a> {
    shared: &'a WaveclipShared,
    processor: BlockProcessor,
    lifecycle: Lifecycle,
}

impl<'a> AudioEngine<'a> {
    /// Activate from the main thread's `lifecycle`, starting from a pending
    /// reload if there is one, else from the mirror.
    pub fn activate(
        shared: &'a WaveclipShared,
        mut lifecycle: Lifecycle,
    ) -> Result<Self, LifecycleError> {
        lifecycle.activate()?;
        let store = shared.take_reload().unwrap_or_else(|| shared.snapshot());
        Ok(Self {
            shared,
            processor: BlockProcessor::with_store(store),
            lifecycle,
        })
    }

    /// Current lifecycle.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Store the engine renders with.
    pub fn store(&self) -> &ParameterStore {
        self.processor.store()
    }

    pub fn start_processing(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.start_processing()
    }

    pub fn stop_processing(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.stop_processing()
    }

    /// Render one block.
    ///
    /// Rejected outside `Processing` with the buffers and store untouched.
    /// When no channel carries frames the events are applied as a flush.
    pub fn process<L: EventList + ?Sized>(
        &mut self,
        events: &L,
        mut io: [ChannelIo<'_>; 2],
    ) -> Result<(), LifecycleError> {
        if !self.lifecycle.can_process() {
            return Err(LifecycleError {
                from: self.lifecycle.state(),
                to: LifecycleState::Processing,
            });
        }

        self.adopt_reload();
        let frames = io.iter().filter_map(ChannelIo::frames).min().unwrap_or(0);
        if frames == 0 {
            self.processor.flush(events);
        } else {
            self.processor.for_each_run(events, frames, |settings, range| {
                for channel in &mut io {
                    channel.render(settings, range.clone());
                }
            });
        }
        self.shared.publish(self.processor.store());
        Ok(())
    }

    /// Apply events with no audio.
    pub fn flush<L: EventList + ?Sized>(&mut self, events: &L) {
        self.adopt_reload();
        self.processor.flush(events);
        self.shared.publish(self.processor.store());
    }

    /// Deactivate, leaving the final store in the mirror. Returns the
    /// lifecycle for the main thread.
    pub fn deactivate(mut self) -> Lifecycle {
        self.adopt_reload();
        self.shared.publish(self.processor.store());
        if let Err(err) = self.lifecycle.deactivate() {
            tracing::warn!("deactivate: {err}");
        }
        self.lifecycle
    }

    fn adopt_reload(&mut self) {
        if let Some(store) = self.shared.take_reload() {
            *self.processor.store_mut() = store;
        }
    }
}

/// Audio-thread processor.
///
/// Created during `activate()`, destroyed during `deactivate()`.
pub struct WaveclipAudioProcessor<'a> {
    engine: AudioEngine<'a>,
}

impl<'a> PluginAudioProcessor<'a, WaveclipShared, WaveclipMainThread<'a>>
    for WaveclipAudioProcessor<'a>
{
    fn activate(
        _host: HostAudioProcessorHandle<'a>,
        main_thread: &mut WaveclipMainThread<'a>,
        shared: &'a WaveclipShared,
        audio_config: PluginAudioConfiguration,
    ) -> Result<Self, PluginError> {
        let engine = AudioEngine::activate(shared, main_thread.lifecycle()).map_err(|err| {
            tracing::warn!("activate rejected: {err}");
            PluginError::Message("activate called in an invalid lifecycle state")
        })?;
        main_thread.set_lifecycle(engine.lifecycle());

        tracing::info!(
            "activated: sample_rate={} max_frames={}",
            audio_config.sample_rate,
            audio_config.max_frames_count
        );

        Ok(Self { engine })
    }

    fn process(
        &mut self,
        _process: Process,
        mut audio: Audio,
        events: Events,
    ) -> Result<ProcessStatus, PluginError> {
        let events = HostEvents::new(events.input);

        let result = match audio.port_pair(0) {
            Some(mut port_pair) => match port_pair.channels()?.into_f32() {
                Some(mut channels) => {
                    let mut pairs = channels.iter_mut();
                    let io = [ChannelIo::from_pair(pairs.next()), ChannelIo::from_pair(pairs.next())];
                    self.engine.process(&events, io)
                }
                None => self.engine.process(&events, [ChannelIo::Missing, ChannelIo::Missing]),
            },
            None => self.engine.process(&events, [ChannelIo::Missing, ChannelIo::Missing]),
        };

        result.map_err(|_| PluginError::Message("process() called outside start/stop_processing"))?;
        Ok(ProcessStatus::Continue)
    }

    fn deactivate(self, main_thread: &mut WaveclipMainThread<'_>) {
        main_thread.set_lifecycle(self.engine.deactivate());
        tracing::info!("deactivated");
    }

    fn start_processing(&mut self) -> Result<(), PluginError> {
        self.engine.start_processing().map_err(|err| {
            tracing::warn!("start_processing rejected: {err}");
            PluginError::Message("start_processing called in an invalid lifecycle state")
        })
    }

    fn stop_processing(&mut self) {
        if let Err(err) = self.engine.stop_processing() {
            tracing::warn!("stop_processing: {err}");
        }
    }

    // Memoryless shaper: nothing to clear.
    fn reset(&mut self) {}
}

impl PluginAudioProcessorParams for WaveclipAudioProcessor<'_> {
    fn flush(&mut self, input: &InputEvents, _output: &mut OutputEvents) {
        self.engine.flush(&HostEvents::new(input));
    }
}

/// Buffers of one channel, as laid out by the host.
///
/// Hosts may mix layouts across channels (one in place, one split), so each
/// channel is rendered on its own within every run.
pub enum ChannelIo<'b> {
    /// Separate input and output buffers.
    Split(&'b [f32], &'b mut [f32]),
    /// Input and output share one buffer.
    InPlace(&'b mut [f32]),
    /// No output for this channel.
    Missing,
}

impl<'b> ChannelIo<'b> {
    /// Classify a host channel pair. Output-only channels are silenced and
    /// shaped in place.
    pub fn from_pair(pair: Option<ChannelPair<'b, f32>>) -> Self {
        match pair {
            Some(ChannelPair::InputOutput(input, output)) => ChannelIo::Split(input, output),
            Some(ChannelPair::InPlace(buf)) => ChannelIo::InPlace(buf),
            Some(ChannelPair::OutputOnly(buf)) => {
                buf.fill(0.0);
                ChannelIo::InPlace(buf)
            }
            _ => ChannelIo::Missing,
        }
    }

    /// Renderable frames, `None` for a missing channel.
    pub fn frames(&self) -> Option<usize> {
        match self {
            ChannelIo::Split(input, output) => Some(input.len().min(output.len())),
            ChannelIo::InPlace(buf) => Some(buf.len()),
            ChannelIo::Missing => None,
        }
    }

    /// Shape `range` of this channel with `settings`.
    pub fn render(&mut self, settings: &ShapeSettings, range: Range<usize>) {
        match self {
            ChannelIo::Split(input, output) => {
                shape_block(settings, &input[range.clone()], &mut output[range]);
            }
            ChannelIo::InPlace(buf) => shape_block_in_place(settings, &mut buf[range]),
            ChannelIo::Missing => {}
        }
    }
}
