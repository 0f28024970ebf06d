use anyhow::{bail, Result};
use hoops_core::SimConfig;
use std::collections::HashMap;

const VALID_KEYS: &[&str] = &[
    "quarter_secs",
    "overtime_secs",
    "possession_min_secs",
    "possession_max_secs",
    "turnover_rate",
    "shooting_foul_rate",
    "free_throw_pct",
    "offensive_rebound_rate",
    "block_rate",
    "steal_share",
    "assisted_share_two",
    "assisted_share_three",
    "ambient_foul_rate",
    "foul_limit",
    "fatigue_interval_secs",
    "fatigue_decay_per_interval",
    "fatigue_floor",
    "recovery_multiplier",
    "stint_secs",
    "momentum_step",
    "momentum_cap",
    "clutch_margin",
    "clutch_usage_floor",
    "clutch_bonus",
    "blowout_margin",
    "max_overtimes",
];

#[allow(clippy::too_many_lines)]
pub fn apply_overrides(
    config: &mut SimConfig,
    overrides: &HashMap<String, serde_json::Value>,
) -> Result<()> {
    for (key, value) in overrides {
        match key.as_str() {
            "quarter_secs" => config.quarter_secs = as_u32(key, value)?,
            "overtime_secs" => config.overtime_secs = as_u32(key, value)?,
            "possession_min_secs" => config.possession_min_secs = as_u32(key, value)?,
            "possession_max_secs" => config.possession_max_secs = as_u32(key, value)?,
            "turnover_rate" => config.turnover_rate = as_f32(key, value)?,
            "shooting_foul_rate" => config.shooting_foul_rate = as_f32(key, value)?,
            "free_throw_pct" => config.free_throw_pct = as_f32(key, value)?,
            "offensive_rebound_rate" => config.offensive_rebound_rate = as_f32(key, value)?,
            "block_rate" => config.block_rate = as_f32(key, value)?,
            "steal_share" => config.steal_share = as_f32(key, value)?,
            "assisted_share_two" => config.assisted_share_two = as_f32(key, value)?,
            "assisted_share_three" => config.assisted_share_three = as_f32(key, value)?,
            "ambient_foul_rate" => config.ambient_foul_rate = as_f32(key, value)?,
            "foul_limit" => config.foul_limit = as_u8(key, value)?,
            "fatigue_interval_secs" => config.fatigue_interval_secs = as_u32(key, value)?,
            "fatigue_decay_per_interval" => {
                config.fatigue_decay_per_interval = as_f32(key, value)?;
            }
            "fatigue_floor" => config.fatigue_floor = as_f32(key, value)?,
            "recovery_multiplier" => config.recovery_multiplier = as_f32(key, value)?,
            "stint_secs" => config.stint_secs = as_u32(key, value)?,
            "momentum_step" => config.momentum_step = as_f32(key, value)?,
            "momentum_cap" => config.momentum_cap = as_f32(key, value)?,
            "clutch_margin" => config.clutch_margin = as_u32(key, value)?,
            "clutch_usage_floor" => config.clutch_usage_floor = as_f32(key, value)?,
            "clutch_bonus" => config.clutch_bonus = as_f32(key, value)?,
            "blowout_margin" => config.blowout_margin = as_u32(key, value)?,
            "max_overtimes" => config.max_overtimes = as_u8(key, value)?,
            _ => bail!(
                "unknown override key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)] // JSON f64→f32 is intentional
fn as_f32(key: &str, value: &serde_json::Value) -> Result<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| anyhow::anyhow!("override '{key}': expected a number, got {value}"))
}

fn as_u64(key: &str, value: &serde_json::Value) -> Result<u64> {
    value.as_u64().ok_or_else(|| {
        anyhow::anyhow!("override '{key}': expected a positive integer, got {value}")
    })
}

fn as_u32(key: &str, value: &serde_json::Value) -> Result<u32> {
    let val = as_u64(key, value)?;
    u32::try_from(val)
        .map_err(|_| anyhow::anyhow!("override '{key}': value {val} exceeds u32 range"))
}

fn as_u8(key: &str, value: &serde_json::Value) -> Result<u8> {
    let val = as_u64(key, value)?;
    u8::try_from(val)
        .map_err(|_| anyhow::anyhow!("override '{key}': value {val} exceeds u8 range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_f32_override() {
        let mut config = SimConfig::default();
        let overrides = HashMap::from([("turnover_rate".to_string(), serde_json::json!(0.25))]);
        apply_overrides(&mut config, &overrides).unwrap();
        assert!((config.turnover_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_apply_u32_override() {
        let mut config = SimConfig::default();
        let overrides = HashMap::from([("quarter_secs".to_string(), serde_json::json!(600))]);
        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.quarter_secs, 600);
    }

    #[test]
    fn test_apply_u8_override() {
        let mut config = SimConfig::default();
        let overrides = HashMap::from([("foul_limit".to_string(), serde_json::json!(5))]);
        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.foul_limit, 5);
    }

    #[test]
    fn test_untouched_fields_keep_defaults() {
        let mut config = SimConfig::default();
        let overrides = HashMap::from([("blowout_margin".to_string(), serde_json::json!(25))]);
        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.blowout_margin, 25);
        assert_eq!(config.quarter_secs, SimConfig::default().quarter_secs);
        assert!((config.free_throw_pct - 0.78).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_key_errors() {
        let mut config = SimConfig::default();
        let overrides = HashMap::from([("nonexistent_field".to_string(), serde_json::json!(1.0))]);
        let result = apply_overrides(&mut config, &overrides);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown override key"));
        assert!(err.contains("nonexistent_field"));
    }

    #[test]
    fn test_type_mismatch_errors() {
        let mut config = SimConfig::default();
        let overrides = HashMap::from([(
            "quarter_secs".to_string(),
            serde_json::json!("not_a_number"),
        )]);
        let result = apply_overrides(&mut config, &overrides);
        assert!(result.is_err());
    }

    #[test]
    fn test_u8_range_check() {
        let mut config = SimConfig::default();
        let overrides = HashMap::from([("foul_limit".to_string(), serde_json::json!(300))]);
        let result = apply_overrides(&mut config, &overrides);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("u8"));
    }

    #[test]
    fn test_checked_in_foul_heavy_overrides_apply() {
        let scenario: serde_json::Value =
            serde_json::from_str(include_str!("../../../scenarios/foul_heavy.json")).unwrap();
        let overrides: HashMap<String, serde_json::Value> =
            serde_json::from_value(scenario["overrides"].clone()).unwrap();

        let mut config = SimConfig::default();
        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.foul_limit, 5);
        assert!((config.shooting_foul_rate - 0.12).abs() < f32::EPSILON);
        assert!((config.ambient_foul_rate - 0.2).abs() < f32::EPSILON);
    }
}
