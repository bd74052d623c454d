//! Buffer size and layout robustness tests for the plugin audio path.
//!
//! Renders host channel pairs through the plugin's [`AudioEngine`] and checks
//! the result against the core processor at buffer sizes from 1 to 4096
//! samples, for split and in-place host buffers.

use clack_plugin::prelude::ChannelPair;
use waveclip_core::params::{DRIVE_ID, MIX_ID, MODE_ID};
use waveclip_core::{BlockProcessor, Event, Lifecycle};
use waveclip_plugin::audio::{AudioEngine, ChannelIo};
use waveclip_plugin::{HostCallbacks, WaveclipShared};

const BUFFER_SIZES: &[usize] = &[1, 2, 7, 32, 64, 128, 256, 512, 1024, 2048, 4096];

fn is_finite_buffer(buf: &[f32]) -> bool {
    buf.iter().all(|s| s.is_finite())
}

fn test_signal(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 * 0.1).sin() * 1.2).collect()
}

/// A drive sweep, a mode change and a mix change spread over the block.
fn automation(size: usize) -> Vec<Event> {
    let mut events = vec![Event::param_value(0, MIX_ID, 0.8)];
    events.push(Event::param_value((size / 3) as u32, MODE_ID, 1.0));
    events.push(Event::param_value((size / 2) as u32, DRIVE_ID, 5.0));
    events.push(Event::param_value((size * 3 / 4) as u32, MODE_ID, 2.0));
    events
}

fn render_via_channels(events: &[Event], left: ChannelPair<'_, f32>, right: ChannelPair<'_, f32>) {
    let shared = WaveclipShared::new(HostCallbacks::none());
    let mut lifecycle = Lifecycle::new();
    lifecycle.init().unwrap();
    let mut engine = AudioEngine::activate(&shared, lifecycle).unwrap();
    engine.start_processing().unwrap();

    let io = [ChannelIo::from_pair(Some(left)), ChannelIo::from_pair(Some(right))];
    engine.process(events, io).unwrap();
}

#[test]
fn split_buffers_match_core_at_all_sizes() {
    for &size in BUFFER_SIZES {
        let input = test_signal(size);
        let events = automation(size);

        let mut expected_left = vec![0.0f32; size];
        let mut expected_right = vec![0.0f32; size];
        BlockProcessor::new().process(
            &events,
            [&input, &input],
            [&mut expected_left, &mut expected_right],
        );

        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];
        render_via_channels(
            &events,
            ChannelPair::InputOutput(&input[..], &mut left[..]),
            ChannelPair::InputOutput(&input[..], &mut right[..]),
        );

        assert!(is_finite_buffer(&left), "non-finite left output at buffer size {size}");
        assert_eq!(left, expected_left, "left mismatch at buffer size {size}");
        assert_eq!(right, expected_right, "right mismatch at buffer size {size}");
    }
}

#[test]
fn in_place_buffers_match_core_at_all_sizes() {
    for &size in BUFFER_SIZES {
        let input = test_signal(size);
        let events = automation(size);

        let mut expected_left = input.clone();
        let mut expected_right = input.clone();
        BlockProcessor::new().process_in_place(&events, [&mut expected_left, &mut expected_right]);

        let mut left = input.clone();
        let mut right = input.clone();
        render_via_channels(
            &events,
            ChannelPair::InPlace(&mut left[..]),
            ChannelPair::InPlace(&mut right[..]),
        );

        assert!(is_finite_buffer(&right), "non-finite right output at buffer size {size}");
        assert_eq!(left, expected_left, "left mismatch at buffer size {size}");
        assert_eq!(right, expected_right, "right mismatch at buffer size {size}");
    }
}
