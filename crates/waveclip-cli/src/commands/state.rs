//! State blob inspection and creation.

use crate::commands::common::{apply_overrides, parse_key_val};
use crate::commands::render::load_state_file;
use crate::error::CliError;
use clap::{Args, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use waveclip_core::{ParameterStore, STATE_SIZE, params, state};

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    action: StateAction,
}

#[derive(Subcommand)]
enum StateAction {
    /// Decode a state blob and print its values
    Show {
        /// State file to read
        file: PathBuf,
    },

    /// Write a state blob from defaults plus overrides
    Write {
        /// State file to create
        file: PathBuf,

        /// Parameter overrides (e.g., "drive=2", "mode=soft")
        #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
        param: Vec<(String, String)>,
    },
}

pub fn run(args: StateArgs) -> anyhow::Result<()> {
    match args.action {
        StateAction::Show { file } => show(&file),
        StateAction::Write { file, param } => {
            let mut store = ParameterStore::new();
            apply_overrides(&mut store, &param)?;
            write(&file, &store)?;
            println!("Wrote {} bytes to {}", STATE_SIZE, file.display());
            print_values(&store);
            Ok(())
        }
    }
}

fn show(path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.len() > STATE_SIZE {
        tracing::warn!("{} trailing byte(s) ignored", bytes.len() - STATE_SIZE);
    }
    let store = state::decode_slice(&bytes).map_err(CliError::from)?;

    println!("{}:", path.display());
    if let Some(version) = stored_version(&bytes) {
        println!("  version: {version}");
    }
    print_values(&store);
    Ok(())
}

/// Version field of a state blob (native-endian `i32`), `None` when short.
fn stored_version(bytes: &[u8]) -> Option<i32> {
    bytes.first_chunk::<4>().map(|word| i32::from_ne_bytes(*word))
}

fn print_values(store: &ParameterStore) {
    for desc in &params::PARAMS {
        let value = store.get(desc.id).unwrap_or(f64::from(desc.default));
        match params::display_value(desc.id, value) {
            Some(text) => println!("  {:<6} {}", desc.key, text),
            None => println!("  {:<6} {}", desc.key, value),
        }
    }
}

/// Save `store` as a state blob at `path`.
pub fn write(path: &Path, store: &ParameterStore) -> Result<(), CliError> {
    let write_err = |source| CliError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    state::save(store, &mut writer)?;
    writer.into_inner().map_err(|e| write_err(e.into_error()))?.sync_all().map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveclip_core::params::{DRIVE_ID, MODE_ID};

    #[test]
    fn written_blob_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.bin");

        let mut store = ParameterStore::new();
        store.set(DRIVE_ID, 2.5);
        store.set(MODE_ID, 2.0);
        write(&path, &store).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), STATE_SIZE as u64);
        assert_eq!(load_state_file(&path).unwrap(), store);
    }

    #[test]
    fn version_is_signed() {
        let mut blob = state::encode(&ParameterStore::new());
        assert_eq!(stored_version(&blob), Some(1));

        blob[..4].copy_from_slice(&(-2i32).to_ne_bytes());
        assert_eq!(stored_version(&blob), Some(-2));
        assert_eq!(stored_version(&blob[..3]), None);
    }

    #[test]
    fn short_file_is_a_state_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; 7]).unwrap();

        assert!(matches!(load_state_file(&path), Err(CliError::State(_))));
    }
}
