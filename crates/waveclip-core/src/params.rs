//! The parameter store: drive, mix and waveshaping mode.
//!
//! [`ParameterStore`] is plain data. It is owned by whichever thread currently
//! has exclusive access to the instance (the audio thread while processing, a
//! main thread during state load) and is never shared behind a lock.
//!
//! The three parameters and their stable ids are fixed. The ids are part of
//! saved sessions and automation lanes and must never change:
//!
//! | Index | Id | Name | Range | Default |
//! |-------|----|------|-------|---------|
//! | 0 | 2112 | Drive | -1 ..= 6 | 0 |
//! | 1 | 8675309 | MIX | 0 ..= 1 | 0.5 |
//! | 2 | 5150 | Mode | 0 ..= 2 (stepped) | 0 (Hard Clip) |

use crate::events::ParamChange;
use crate::param_info::{ParamDescriptor, ParamFlags, ParamId};
use crate::shaper::ShapeSettings;

/// Stable id of the drive parameter.
pub const DRIVE_ID: ParamId = ParamId(2112);
/// Stable id of the dry/wet mix parameter.
pub const MIX_ID: ParamId = ParamId(8675309);
/// Stable id of the waveshaping mode parameter.
pub const MODE_ID: ParamId = ParamId(5150);

/// Display labels of [`ShapeMode`], indexed by its discriminant.
pub const MODE_LABELS: &[&str; ShapeMode::ALL.len()] =
    &["Hard Clip", "Soft Clip (Tanh)", "Simple Folder"];

/// Descriptor of the drive parameter (pre-shaping gain is `1 + drive`).
pub const DRIVE: ParamDescriptor =
    ParamDescriptor::new("Drive", "drive", -1.0, 6.0, 0.0).with_id(DRIVE_ID);

/// Descriptor of the dry/wet mix parameter.
pub const MIX: ParamDescriptor = ParamDescriptor::new("MIX", "mix", 0.0, 1.0, 0.5).with_id(MIX_ID);

/// Descriptor of the waveshaping mode parameter.
pub const MODE: ParamDescriptor = ParamDescriptor::new("Mode", "mode", 0.0, 2.0, 0.0)
    .with_id(MODE_ID)
    .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED))
    .with_step_labels(MODE_LABELS);

/// The full parameter table, in host index order.
pub const PARAMS: [ParamDescriptor; 3] = [DRIVE, MIX, MODE];

/// Number of parameters exposed to the host.
pub const PARAM_COUNT: usize = PARAMS.len();

/// Parameter descriptor by host index.
pub fn descriptor(index: usize) -> Option<&'static ParamDescriptor> {
    PARAMS.get(index)
}

/// Host index of a parameter id.
pub fn index_by_id(id: ParamId) -> Option<usize> {
    PARAMS.iter().position(|d| d.id == id)
}

/// Parameter descriptor by stable id.
pub fn descriptor_by_id(id: ParamId) -> Option<&'static ParamDescriptor> {
    index_by_id(id).and_then(descriptor)
}

/// Parameter descriptor by configuration key (case-insensitive).
pub fn descriptor_by_key(key: &str) -> Option<&'static ParamDescriptor> {
    PARAMS.iter().find(|d| d.key.eq_ignore_ascii_case(key))
}

/// Waveshaping transfer function selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ShapeMode {
    /// Clamp to ±1.
    #[default]
    Hard = 0,
    /// Clamp to ±1, then the cubic `1.5x - 0.5x³`.
    Soft = 1,
    /// `sin(2π·x)`, unbounded folding.
    Fold = 2,
}

impl ShapeMode {
    /// All modes in discriminant order.
    pub const ALL: [ShapeMode; 3] = [ShapeMode::Hard, ShapeMode::Soft, ShapeMode::Fold];

    /// Mode from its integer index, clamping out-of-range values to the
    /// nearest valid mode.
    pub const fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => ShapeMode::Hard,
            1 => ShapeMode::Soft,
            _ => ShapeMode::Fold,
        }
    }

    /// Mode from a host automation value: truncated toward zero, then clamped.
    pub fn from_value(value: f64) -> Self {
        Self::from_index(value as i32)
    }

    /// Integer index, as stored in the persisted state.
    pub const fn index(self) -> i32 {
        self as i32
    }

    /// Host display label.
    pub const fn label(self) -> &'static str {
        MODE_LABELS[self as usize]
    }
}

/// Current values of every automatable parameter.
///
/// Writes go through [`set`](Self::set) (host automation, validated and
/// clamped) or [`from_raw`](Self::from_raw) (state restore); both keep every
/// field inside its descriptor range and `mode` inside the enum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterStore {
    drive: f32,
    mix: f32,
    mode: ShapeMode,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            drive: DRIVE.default,
            mix: MIX.default,
            mode: ShapeMode::Hard,
        }
    }
}

impl ParameterStore {
    /// Store holding every parameter's default value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw persisted fields.
    ///
    /// Values inside their range pass through bit-for-bit. Out-of-range values
    /// are clamped, non-finite floats fall back to the default, and mode
    /// indices outside `0..=2` are clamped to the nearest mode.
    pub fn from_raw(drive: f32, mix: f32, mode: i32) -> Self {
        Self {
            drive: sanitize(&DRIVE, drive),
            mix: sanitize(&MIX, mix),
            mode: ShapeMode::from_index(mode),
        }
    }

    /// Pre-shaping drive amount.
    #[inline]
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Dry/wet blend factor.
    #[inline]
    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Waveshaping mode.
    #[inline]
    pub fn mode(&self) -> ShapeMode {
        self.mode
    }

    /// Snapshot of the values the shaper needs for one run of samples.
    #[inline]
    pub fn settings(&self) -> ShapeSettings {
        ShapeSettings {
            drive: self.drive,
            mix: self.mix,
            mode: self.mode,
        }
    }

    /// Current value of a parameter in the host's automation range.
    ///
    /// Returns `None` for unknown ids.
    pub fn get(&self, id: ParamId) -> Option<f64> {
        match id {
            DRIVE_ID => Some(f64::from(self.drive)),
            MIX_ID => Some(f64::from(self.mix)),
            MODE_ID => Some(f64::from(self.mode.index())),
            _ => None,
        }
    }

    /// Set a parameter from a host automation value.
    ///
    /// Returns `false` (and leaves the store unchanged) for unknown ids and
    /// non-finite values. Safe to call from the audio thread.
    pub fn set(&mut self, id: ParamId, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match id {
            DRIVE_ID => self.drive = DRIVE.clamp(value as f32),
            MIX_ID => self.mix = MIX.clamp(value as f32),
            MODE_ID => self.mode = ShapeMode::from_value(value),
            _ => return false,
        }
        true
    }

    /// Apply a parameter-value event. Same contract as [`set`](Self::set).
    #[inline]
    pub fn apply(&mut self, change: ParamChange) -> bool {
        self.set(change.id, change.value)
    }
}

fn sanitize(desc: &ParamDescriptor, value: f32) -> f32 {
    if value.is_finite() { desc.clamp(value) } else { desc.default }
}

/// Host display text of a parameter value.
///
/// Drive and mix render as a raw decimal with six fractional digits; mode
/// renders as its label.
///
/// ```rust
/// use waveclip_core::params::{display_value, DRIVE_ID, MODE_ID};
///
/// assert_eq!(display_value(DRIVE_ID, 1.5).unwrap().to_string(), "1.500000");
/// assert_eq!(display_value(MODE_ID, 1.0).unwrap().to_string(), "Soft Clip (Tanh)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueDisplay {
    /// Continuous value.
    Decimal(f64),
    /// Stepped value label.
    Label(&'static str),
}

impl core::fmt::Display for ValueDisplay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValueDisplay::Decimal(value) => write!(f, "{value:.6}"),
            ValueDisplay::Label(label) => f.write_str(label),
        }
    }
}

/// Format a value for display. Returns `None` for unknown ids.
pub fn display_value(id: ParamId, value: f64) -> Option<ValueDisplay> {
    let desc = descriptor_by_id(id)?;
    Some(match desc.step_label(value) {
        Some(label) => ValueDisplay::Label(label),
        None => ValueDisplay::Decimal(value),
    })
}

/// Parse display text back into a value.
///
/// Text entry is not supported by this plugin; always returns `None`.
pub fn parse_value(_id: ParamId, _text: &str) -> Option<f64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_descriptors() {
        let store = ParameterStore::new();
        for desc in &PARAMS {
            assert_eq!(store.get(desc.id), Some(f64::from(desc.default)), "{}", desc.name);
        }
        assert_eq!(store.mode(), ShapeMode::Hard);
    }

    #[test]
    fn table_is_stable() {
        assert_eq!(PARAM_COUNT, 3);
        assert_eq!(index_by_id(DRIVE_ID), Some(0));
        assert_eq!(index_by_id(MIX_ID), Some(1));
        assert_eq!(index_by_id(MODE_ID), Some(2));
        assert_eq!(index_by_id(ParamId(1)), None);
        assert!(MODE.is_stepped());
        assert!(!DRIVE.is_stepped());
        assert!(PARAMS.iter().all(|d| d.flags.contains(ParamFlags::AUTOMATABLE)));
        assert_eq!(descriptor_by_key("MIX").map(|d| d.id), Some(MIX_ID));
    }

    #[test]
    fn set_unknown_id_fails_silently() {
        let mut store = ParameterStore::new();
        assert!(!store.set(ParamId(999), 3.0));
        assert_eq!(store, ParameterStore::new());
        assert_eq!(store.get(ParamId(999)), None);
    }

    #[test]
    fn set_clamps_to_range() {
        let mut store = ParameterStore::new();
        assert!(store.set(DRIVE_ID, 100.0));
        assert_eq!(store.drive(), 6.0);
        assert!(store.set(MIX_ID, -0.5));
        assert_eq!(store.mix(), 0.0);
    }

    #[test]
    fn set_rejects_non_finite() {
        let mut store = ParameterStore::new();
        assert!(!store.set(DRIVE_ID, f64::NAN));
        assert!(!store.set(MODE_ID, f64::INFINITY));
        assert_eq!(store, ParameterStore::new());
    }

    #[test]
    fn mode_truncates_and_clamps() {
        let mut store = ParameterStore::new();
        store.set(MODE_ID, 1.9);
        assert_eq!(store.mode(), ShapeMode::Soft);
        store.set(MODE_ID, 7.0);
        assert_eq!(store.mode(), ShapeMode::Fold);
        store.set(MODE_ID, -3.0);
        assert_eq!(store.mode(), ShapeMode::Hard);
    }

    #[test]
    fn from_raw_sanitizes() {
        let store = ParameterStore::from_raw(f32::NAN, 4.0, 42);
        assert_eq!(store.drive(), 0.0);
        assert_eq!(store.mix(), 1.0);
        assert_eq!(store.mode(), ShapeMode::Fold);

        let store = ParameterStore::from_raw(-0.75, 0.125, 1);
        assert_eq!(store.drive(), -0.75);
        assert_eq!(store.mix(), 0.125);
        assert_eq!(store.mode(), ShapeMode::Soft);
    }

    #[test]
    fn display_formats() {
        assert_eq!(display_value(MIX_ID, 0.5).unwrap(), ValueDisplay::Decimal(0.5));
        assert_eq!(display_value(MODE_ID, 0.0).unwrap(), ValueDisplay::Label("Hard Clip"));
        assert_eq!(display_value(MODE_ID, 2.0).unwrap(), ValueDisplay::Label("Simple Folder"));
        assert_eq!(display_value(ParamId(3), 0.0), None);
        for mode in ShapeMode::ALL {
            let shown = display_value(MODE_ID, f64::from(mode.index())).unwrap();
            assert_eq!(shown, ValueDisplay::Label(mode.label()));
        }
        assert_eq!(ShapeMode::Soft.label(), "Soft Clip (Tanh)");
    }

    #[test]
    fn parse_is_unsupported() {
        assert_eq!(parse_value(DRIVE_ID, "1.0"), None);
        assert_eq!(parse_value(MODE_ID, "Hard Clip"), None);
    }
}
