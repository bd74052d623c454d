//! Shared CLI helpers used across multiple commands.

use crate::config;
use waveclip_core::ParameterStore;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        ));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Apply `--param key=value` overrides to a store, in command-line order.
pub fn apply_overrides(
    store: &mut ParameterStore,
    overrides: &[(String, String)],
) -> anyhow::Result<()> {
    for (key, value) in overrides {
        let change = config::parse_override(key, value)?;
        store.apply(change);
        tracing::debug!("override {key} = {}", change.value);
    }
    Ok(())
}

/// Convert linear amplitude to dB.
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-10).log10()
}

/// Peak absolute amplitude.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveclip_core::ShapeMode;

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("drive=1.5"),
            Ok(("drive".to_string(), "1.5".to_string()))
        );
        assert_eq!(parse_key_val("a=b=c").unwrap().1, "b=c");
        assert!(parse_key_val("drive").is_err());
    }

    #[test]
    fn overrides_apply_in_order() {
        let mut store = ParameterStore::new();
        let overrides = vec![
            ("mode".to_string(), "fold".to_string()),
            ("drive".to_string(), "9".to_string()),
            ("mode".to_string(), "1".to_string()),
        ];
        apply_overrides(&mut store, &overrides).unwrap();
        assert_eq!(store.mode(), ShapeMode::Soft);
        assert_eq!(store.drive(), 6.0);

        let bad = vec![("gain".to_string(), "1".to_string())];
        assert!(apply_overrides(&mut store, &bad).is_err());
    }

    #[test]
    fn db_conversion() {
        assert_eq!(linear_to_db(1.0), 0.0);
        assert!((linear_to_db(0.5) + 6.0206).abs() < 1e-3);
        assert!((linear_to_db(0.0) + 200.0).abs() < 1e-3);
        assert_eq!(peak(&[0.1, -0.7, 0.3]), 0.7);
    }
}
