//! Persisted plugin state.
//!
//! The blob is exactly [`STATE_SIZE`] bytes, host-native byte order, no
//! padding:
//!
//! | Offset | Type | Field |
//! |--------|------|-------|
//! | 0 | i32 | version (always [`STATE_VERSION`] on write, ignored on read) |
//! | 4 | f32 | drive |
//! | 8 | f32 | mix |
//! | 12 | i32 | mode index |
//!
//! Native byte order means a session saved on a little-endian machine does not
//! load correctly on a big-endian one. The layout is kept as-is so existing
//! sessions keep loading.
//!
//! Decoding normalises through [`ParameterStore::from_raw`]: in-range values
//! come back bit-for-bit, anything else is clamped.

use crate::params::ParameterStore;

/// Size of the persisted state in bytes.
pub const STATE_SIZE: usize = 16;

/// Version tag written into every blob.
pub const STATE_VERSION: i32 = 1;

/// Failure to save or load state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The source ended before a full blob was read.
    ShortRead {
        /// Bytes available before the end.
        got: usize,
    },
    /// The sink stopped accepting bytes before the full blob was written.
    ShortWrite {
        /// Bytes accepted before the sink stalled.
        written: usize,
    },
    /// Underlying stream error (other than `Interrupted`, which is retried).
    #[cfg(feature = "std")]
    Io(std::io::ErrorKind),
}

impl core::fmt::Display for StateError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StateError::ShortRead { got } => {
                write!(f, "state truncated: got {got} of {STATE_SIZE} bytes")
            }
            StateError::ShortWrite { written } => {
                write!(f, "state stream closed after {written} of {STATE_SIZE} bytes")
            }
            #[cfg(feature = "std")]
            StateError::Io(kind) => write!(f, "state stream error: {kind}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateError {}

/// Serialize a store into a state blob.
pub fn encode(store: &ParameterStore) -> [u8; STATE_SIZE] {
    let mut bytes = [0u8; STATE_SIZE];
    bytes[0..4].copy_from_slice(&STATE_VERSION.to_ne_bytes());
    bytes[4..8].copy_from_slice(&store.drive().to_ne_bytes());
    bytes[8..12].copy_from_slice(&store.mix().to_ne_bytes());
    bytes[12..16].copy_from_slice(&store.mode().index().to_ne_bytes());
    bytes
}

/// Deserialize a state blob. The version field is read and ignored.
pub fn decode(bytes: &[u8; STATE_SIZE]) -> ParameterStore {
    let word = |offset: usize| {
        [bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]]
    };
    let drive = f32::from_ne_bytes(word(4));
    let mix = f32::from_ne_bytes(word(8));
    let mode = i32::from_ne_bytes(word(12));
    ParameterStore::from_raw(drive, mix, mode)
}

/// Deserialize the first [`STATE_SIZE`] bytes of `bytes`.
///
/// Trailing bytes are ignored.
pub fn decode_slice(bytes: &[u8]) -> Result<ParameterStore, StateError> {
    let Some(blob) = bytes.first_chunk::<STATE_SIZE>() else {
        return Err(StateError::ShortRead { got: bytes.len() });
    };
    Ok(decode(blob))
}

/// Write the blob for `store`, looping over partial writes.
///
/// `Interrupted` is retried; any other error, or a write that accepts zero
/// bytes, aborts.
#[cfg(feature = "std")]
pub fn save<W: std::io::Write + ?Sized>(
    store: &ParameterStore,
    writer: &mut W,
) -> Result<(), StateError> {
    let bytes = encode(store);
    let mut written = 0;
    while written < STATE_SIZE {
        match writer.write(&bytes[written..]) {
            Ok(0) => return Err(StateError::ShortWrite { written }),
            Ok(n) => written += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(StateError::Io(e.kind())),
        }
    }
    Ok(())
}

/// Read one blob, looping over partial reads.
///
/// All-or-nothing: on failure no store is produced, so callers that assign
/// the result keep their previous values. Bytes after the blob are left in
/// the stream.
#[cfg(feature = "std")]
pub fn load<R: std::io::Read + ?Sized>(reader: &mut R) -> Result<ParameterStore, StateError> {
    let mut bytes = [0u8; STATE_SIZE];
    let mut got = 0;
    while got < STATE_SIZE {
        match reader.read(&mut bytes[got..]) {
            Ok(0) => return Err(StateError::ShortRead { got }),
            Ok(n) => got += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(StateError::Io(e.kind())),
        }
    }
    Ok(decode(&bytes))
}
