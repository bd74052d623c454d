//! Parameter metadata for host introspection.
//!
//! Every automatable parameter is described by a [`ParamDescriptor`]: its
//! stable [`ParamId`], display name, range, default and [`ParamFlags`]. The
//! descriptors are `const`-constructible so the whole parameter table can live
//! in a `static` and be shared by the audio thread, the main thread and the
//! CLI without allocation.
//!
//! # Example
//!
//! ```rust
//! use waveclip_core::{ParamDescriptor, ParamFlags, ParamId};
//!
//! const WIDTH: ParamDescriptor = ParamDescriptor::new("Width", "width", 0.0, 2.0, 1.0)
//!     .with_id(ParamId(42))
//!     .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED))
//!     .with_step_labels(&["Mono", "Normal", "Wide"]);
//!
//! assert_eq!(WIDTH.clamp(5.0), 2.0);
//! assert_eq!(WIDTH.step_label(1.0), Some("Normal"));
//! ```

/// Stable parameter identifier that survives reordering.
///
/// Used by plugin hosts for automation recording and session restore. Once
/// assigned, a `ParamId` must never change for a given parameter.
///
/// Maps directly to CLAP `clap_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

impl core::fmt::Display for ParamId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameter capability flags for plugin host communication.
///
/// Bitflag type that maps to CLAP `clap_param_info_flags`. Use
/// [`union`](Self::union) to combine.
///
/// ```rust
/// use waveclip_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::AUTOMATABLE));
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete integer steps (enum-like).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Describes a single parameter's metadata for display and validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name reported to the host (e.g. "Drive").
    pub name: &'static str,

    /// Lower-case key used by configuration files and the CLI (e.g. "drive").
    pub key: &'static str,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value at instance creation.
    pub default: f32,

    /// Stable numeric ID. Default: `ParamId(0)` (unassigned).
    pub id: ParamId,

    /// Capability flags. Default: [`ParamFlags::AUTOMATABLE`].
    pub flags: ParamFlags,

    /// Display labels for stepped parameters, indexed by `value - min`.
    ///
    /// Empty for continuous parameters.
    pub step_labels: &'static [&'static str],
}

impl ParamDescriptor {
    /// Continuous, automatable parameter with no id assigned yet.
    pub const fn new(
        name: &'static str,
        key: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            key,
            min,
            max,
            default,
            id: ParamId(0),
            flags: ParamFlags::AUTOMATABLE,
            step_labels: &[],
        }
    }

    /// Sets the stable parameter ID.
    pub const fn with_id(mut self, id: ParamId) -> Self {
        self.id = id;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the display labels of a stepped parameter.
    pub const fn with_step_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.step_labels = labels;
        self
    }

    /// Whether the parameter takes discrete integer values.
    #[inline]
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// In-range values are returned untouched (bit-for-bit).
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Label of the step nearest to `value`, for stepped parameters.
    ///
    /// The value is truncated toward zero and clamped to the label table, so
    /// every finite input maps to some label. Returns `None` for continuous
    /// parameters.
    pub fn step_label(&self, value: f64) -> Option<&'static str> {
        let last = self.step_labels.len().checked_sub(1)?;
        let offset = (value - f64::from(self.min)) as i64;
        let index = offset.clamp(0, last as i64) as usize;
        self.step_labels.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: ParamDescriptor =
        ParamDescriptor::new("Level", "level", -1.0, 1.0, 0.0).with_id(ParamId(7));

    const PICK: ParamDescriptor = ParamDescriptor::new("Pick", "pick", 0.0, 2.0, 0.0)
        .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED))
        .with_step_labels(&["A", "B", "C"]);

    #[test]
    fn builder_sets_fields() {
        assert_eq!(LEVEL.id, ParamId(7));
        assert_eq!(LEVEL.flags, ParamFlags::AUTOMATABLE);
        assert!(!LEVEL.is_stepped());
        assert!(PICK.is_stepped());
    }

    #[test]
    fn clamp_limits_range() {
        assert_eq!(LEVEL.clamp(-3.0), -1.0);
        assert_eq!(LEVEL.clamp(3.0), 1.0);
        assert_eq!(LEVEL.clamp(0.3).to_bits(), 0.3f32.to_bits());
    }

    #[test]
    fn step_label_truncates_and_clamps() {
        assert_eq!(PICK.step_label(0.0), Some("A"));
        assert_eq!(PICK.step_label(1.9), Some("B"));
        assert_eq!(PICK.step_label(2.0), Some("C"));
        assert_eq!(PICK.step_label(17.0), Some("C"));
        assert_eq!(PICK.step_label(-4.0), Some("A"));
        assert_eq!(LEVEL.step_label(0.0), None);
    }

    #[test]
    fn flags_union_and_contains() {
        let flags = ParamFlags::NONE.union(ParamFlags::STEPPED);
        assert!(flags.contains(ParamFlags::STEPPED));
        assert!(!flags.contains(ParamFlags::AUTOMATABLE));
        assert_eq!(ParamFlags::default(), ParamFlags::AUTOMATABLE);
    }
}
