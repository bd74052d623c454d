//! Integration tests for waveclip-core.
//!
//! Exercises the processor, demux, lifecycle and state codec together the way
//! a host session does: automate, render, save, reload, render again.

use waveclip_core::params::{DRIVE_ID, MIX_ID, MODE_ID};
use waveclip_core::{
    BlockProcessor, Event, Lifecycle, LifecycleState, ParamId, ParameterStore, ProcessStatus, ShapeMode, state,
};

const SAMPLE_RATE: f32 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;

fn generate_sine(freq_hz: f32, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|n| amplitude * libm::sinf(TAU * freq_hz * n as f32 / SAMPLE_RATE))
        .collect()
}

fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

fn render(processor: &mut BlockProcessor, events: &[Event], input: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let mut left = vec![0.0f32; input.len()];
    let mut right = vec![0.0f32; input.len()];
    let status = processor.process(events, [input, input], [&mut left, &mut right]);
    assert_eq!(status, ProcessStatus::Continue);
    (left, right)
}

#[test]
fn hard_clip_limits_loud_sine() {
    let input = generate_sine(440.0, 0.9, 512);
    let mut processor = BlockProcessor::new();
    let events = [Event::param_value(0, DRIVE_ID, 4.0), Event::param_value(0, MIX_ID, 1.0)];
    let (left, right) = render(&mut processor, &events, &input);

    assert_eq!(peak(&left), 1.0);
    assert_eq!(left, right);
    // Squared off: a large share of samples sits on the rails.
    let clipped = left.iter().filter(|s| s.abs() == 1.0).count();
    assert!(clipped > 256, "only {clipped} samples clipped");
}

#[test]
fn soft_clip_is_gentler_than_hard_clip_below_unity() {
    let input = generate_sine(220.0, 0.5, 256);
    let mut hard = BlockProcessor::new();
    let mut soft = BlockProcessor::new();
    let hard_events = [Event::param_value(0, MIX_ID, 1.0)];
    let soft_events = [Event::param_value(0, MIX_ID, 1.0), Event::param_value(0, MODE_ID, 1.0)];
    let (hard_out, _) = render(&mut hard, &hard_events, &input);
    let (soft_out, _) = render(&mut soft, &soft_events, &input);

    // Below the clip threshold hard clip is transparent; the cubic adds gain.
    assert_eq!(hard_out, input);
    assert!(peak(&soft_out) > peak(&input));
    assert!(peak(&soft_out) <= 1.0);
}

#[test]
fn automation_across_blocks_is_sample_accurate() {
    let input = vec![0.5f32; 1024];

    // One 1024-frame block with a mode change at 700.
    let mut whole = BlockProcessor::new();
    let events = [Event::param_value(0, MIX_ID, 1.0), Event::param_value(700, MODE_ID, 2.0)];
    let (expected, _) = render(&mut whole, &events, &input);

    // Same automation delivered over 64-frame blocks.
    let mut blocked = BlockProcessor::new();
    let mut actual = Vec::new();
    for (index, chunk) in input.chunks(64).enumerate() {
        let start = index * 64;
        let mut block_events = Vec::new();
        if start == 0 {
            block_events.push(Event::param_value(0, MIX_ID, 1.0));
        }
        if (start..start + 64).contains(&700) {
            block_events.push(Event::param_value((700 - start) as u32, MODE_ID, 2.0));
        }
        let (left, _) = render(&mut blocked, &block_events, chunk);
        actual.extend_from_slice(&left);
    }

    assert_eq!(actual, expected);
    assert_eq!(expected[699], 0.5);
    assert!(expected[700].abs() < 1e-6, "sin(2π·0.5) should be ~0, got {}", expected[700]);
}

#[test]
fn session_save_and_restore() {
    let mut lifecycle = Lifecycle::new();
    lifecycle.init().unwrap();
    lifecycle.activate().unwrap();
    lifecycle.start_processing().unwrap();

    let mut processor = BlockProcessor::new();
    let events = [
        Event::param_value(3, DRIVE_ID, 1.25),
        Event::param_value(3, MODE_ID, 1.0),
        Event::param_value(9, MIX_ID, 0.75),
    ];
    assert!(lifecycle.can_process());
    render(&mut processor, &events, &[0.1; 16]);

    lifecycle.stop_processing().unwrap();
    lifecycle.deactivate().unwrap();

    let mut blob = Vec::new();
    state::save(processor.store(), &mut blob).unwrap();
    assert_eq!(blob.len(), state::STATE_SIZE);

    // New instance restores the session.
    let mut restored = BlockProcessor::new();
    *restored.store_mut() = state::load(&mut blob.as_slice()).unwrap();
    assert_eq!(restored.store(), processor.store());
    assert_eq!(restored.store().mode(), ShapeMode::Soft);

    let input = generate_sine(1000.0, 0.7, 128);
    let (a, _) = render(&mut processor, &[], &input);
    let (b, _) = render(&mut restored, &[], &input);
    assert_eq!(a, b);

    lifecycle.destroy().unwrap();
    assert_eq!(lifecycle.state(), LifecycleState::Destroyed);
}

#[test]
fn failed_load_keeps_previous_values() {
    let mut processor = BlockProcessor::new();
    processor.store_mut().set(DRIVE_ID, 3.0);
    let before = *processor.store();

    let truncated = [0u8; 12];
    match state::load(&mut &truncated[..]) {
        Ok(store) => *processor.store_mut() = store,
        Err(err) => assert_eq!(err, state::StateError::ShortRead { got: 12 }),
    }
    assert_eq!(*processor.store(), before);
}

#[test]
fn flush_while_stopped_reaches_the_store() {
    let mut lifecycle = Lifecycle::new();
    lifecycle.init().unwrap();
    assert!(lifecycle.can_flush());

    let mut processor = BlockProcessor::new();
    let events = [
        Event::param_value(0, MIX_ID, 0.0),
        Event::param_value(0, ParamId(1), 1.0),
        Event::other(0),
    ];
    assert_eq!(processor.flush(&events[..]), 1);
    assert_eq!(processor.store().mix(), 0.0);

    // With mix at zero the next block is a bypass.
    let input = generate_sine(330.0, 0.8, 64);
    let (left, _) = render(&mut processor, &[], &input);
    assert_eq!(left, input);
    assert_eq!(*processor.store(), ParameterStore::from_raw(0.0, 0.0, 0));
}
