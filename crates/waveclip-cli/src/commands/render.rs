//! Offline rendering through the block processor.

use crate::commands::common::{apply_overrides, linear_to_db, parse_key_val, peak};
use crate::config::{DEFAULT_BLOCK_SIZE, RenderConfig};
use crate::error::CliError;
use crate::wav::{self, StereoSamples};
use clap::Args;
use std::path::{Path, PathBuf};
use waveclip_core::{BlockProcessor, Event, EventKind, ParamChange, ParameterStore, state};

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (always stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Render configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parameter overrides (e.g., "drive=2", "mode=fold")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Initial state from a 16-byte state blob
    #[arg(long)]
    state: Option<PathBuf>,

    /// Processing block size [default: config value, else 512]
    #[arg(long)]
    block_size: Option<usize>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

/// Read a state blob into a store.
pub fn load_state_file(path: &Path) -> Result<ParameterStore, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(state::decode_slice(&bytes)?)
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    // Precedence: state blob, then config [params], then --param.
    let mut store = match &args.state {
        Some(path) => load_state_file(path)?,
        None => ParameterStore::new(),
    };
    config.apply_params(&mut store)?;
    apply_overrides(&mut store, &args.param)?;

    let block_size = args.block_size.or(config.block_size).unwrap_or(DEFAULT_BLOCK_SIZE);
    if block_size == 0 {
        anyhow::bail!("block size must be at least 1");
    }
    let automation = config.automation_events()?;

    println!("Reading {}...", args.input.display());
    let (input, sample_rate, channels) = wav::read_stereo(&args.input)?;
    println!(
        "  {} frames, {} Hz, {} channel(s), {:.2}s",
        input.len(),
        sample_rate,
        channels,
        input.len() as f32 / sample_rate as f32
    );
    if input.is_empty() {
        tracing::warn!("input has no frames; writing an empty file");
    }

    println!(
        "Rendering: drive {:.3}, mix {:.3}, mode {} ({} automation point(s), block {})",
        store.drive(),
        store.mix(),
        store.mode().label(),
        automation.len(),
        block_size
    );
    let output = render(&input, store, &automation, block_size);

    wav::write_stereo(&args.output, &output, sample_rate, args.bit_depth)?;

    let input_peak = peak(&input.left).max(peak(&input.right));
    let output_peak = peak(&output.left).max(peak(&output.right));
    println!("\nStats:");
    println!("  Input:  Peak {:.1} dB", linear_to_db(input_peak));
    println!("  Output: Peak {:.1} dB", linear_to_db(output_peak));
    println!("\nWritten to {}", args.output.display());

    Ok(())
}

/// Render `input` block by block, turning absolute automation frames into
/// block-relative event times.
///
/// `automation` must be sorted by frame. Points at or past the end of the
/// input are never applied.
pub fn render(
    input: &StereoSamples,
    store: ParameterStore,
    automation: &[(u64, ParamChange)],
    block_size: usize,
) -> StereoSamples {
    let frames = input.len();
    let mut processor = BlockProcessor::with_store(store);
    let mut output = StereoSamples {
        left: vec![0.0; frames],
        right: vec![0.0; frames],
    };

    let mut events = Vec::new();
    let mut next = 0;
    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);

        events.clear();
        while let Some(&(frame, change)) = automation.get(next) {
            if frame >= end as u64 {
                break;
            }
            let offset = frame.saturating_sub(start as u64);
            events.push(Event {
                time: u32::try_from(offset).unwrap_or(u32::MAX),
                kind: EventKind::ParamValue(change),
            });
            next += 1;
        }

        processor.process(
            &events,
            [&input.left[start..end], &input.right[start..end]],
            [&mut output.left[start..end], &mut output.right[start..end]],
        );
        start = end;
    }

    if next < automation.len() {
        tracing::debug!(
            "{} automation point(s) at or past frame {frames} not applied",
            automation.len() - next
        );
    }

    output
}
