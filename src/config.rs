use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::detect::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::zone::{ViolationPolicy, Zone};

const DEFAULT_BACKEND: &str = "stub";

#[derive(Debug, Deserialize, Default)]
struct SentinelConfigFile {
    backend: Option<String>,
    confidence_threshold: Option<f32>,
    violation_policy: Option<ViolationPolicy>,
    profiling: Option<bool>,
    zone: Option<ZoneConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct ZoneConfigFile {
    x: Option<i32>,
    y: Option<i32>,
    width: Option<i32>,
    height: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SentinelConfig {
    pub backend: String,
    pub confidence_threshold: f32,
    pub violation_policy: ViolationPolicy,
    pub profiling: bool,
    /// As configured; zero fields defer to each frame's dimensions.
    pub zone: Zone,
}

impl SentinelConfig {
    /// Resolve the effective configuration: file (explicit path, else
    /// `SENTINELD_CONFIG`, else pure defaults), then environment overrides,
    /// then validation.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var("SENTINELD_CONFIG")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let path = explicit_path.map(Path::to_path_buf).or(env_path);
        let file_cfg = match path.as_deref() {
            Some(path) => Some(read_config_file(path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: SentinelConfigFile) -> Self {
        let backend = file.backend.unwrap_or_else(|| DEFAULT_BACKEND.to_string());
        let confidence_threshold = file
            .confidence_threshold
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
        let violation_policy = file.violation_policy.unwrap_or_default();
        let profiling = file.profiling.unwrap_or(false);
        let zone = file
            .zone
            .map(|zone| Zone {
                x: zone.x.unwrap_or(0),
                y: zone.y.unwrap_or(0),
                width: zone.width.unwrap_or(0),
                height: zone.height.unwrap_or(0),
            })
            .unwrap_or_default();
        Self {
            backend,
            confidence_threshold,
            violation_policy,
            profiling,
            zone,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(backend) = std::env::var("SENTINELD_BACKEND") {
            if !backend.trim().is_empty() {
                self.backend = backend;
            }
        }
        if let Ok(threshold) = std::env::var("SENTINELD_CONFIDENCE_THRESHOLD") {
            if !threshold.trim().is_empty() {
                self.confidence_threshold = threshold.trim().parse().map_err(|_| {
                    anyhow!("SENTINELD_CONFIDENCE_THRESHOLD must be a number in [0, 1]")
                })?;
            }
        }
        if let Ok(policy) = std::env::var("SENTINELD_VIOLATION_POLICY") {
            if !policy.trim().is_empty() {
                self.violation_policy = parse_policy(policy.trim())?;
            }
        }
        if let Ok(profiling) = std::env::var("SENTINELD_PROFILING") {
            if !profiling.trim().is_empty() {
                self.profiling = parse_bool(&profiling, "SENTINELD_PROFILING")?;
            }
        }
        if let Ok(zone) = std::env::var("SENTINELD_ZONE") {
            if !zone.trim().is_empty() {
                self.zone = parse_zone_csv(&zone)?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.backend.trim().is_empty() {
            return Err(anyhow!("backend must not be empty"));
        }
        if !self.confidence_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.confidence_threshold)
        {
            return Err(anyhow!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            ));
        }
        self.zone.validate()?;
        Ok(())
    }
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self::from_file(SentinelConfigFile::default())
    }
}

fn read_config_file(path: &Path) -> Result<SentinelConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn parse_policy(value: &str) -> Result<ViolationPolicy> {
    match value {
        "first-only" => Ok(ViolationPolicy::FirstOnly),
        "all-violators" => Ok(ViolationPolicy::AllViolators),
        other => Err(anyhow!(
            "unknown violation policy '{}' (expected first-only or all-violators)",
            other
        )),
    }
}

fn parse_bool(value: &str, var: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{} must be a boolean (true/false)", var)),
    }
}

fn parse_zone_csv(value: &str) -> Result<Zone> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(anyhow!("SENTINELD_ZONE must be 'x,y,width,height'"));
    }
    let mut fields = [0i32; 4];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| anyhow!("SENTINELD_ZONE must contain integers, got '{}'", part))?;
    }
    Ok(Zone {
        x: fields[0],
        y: fields[1],
        width: fields[2],
        height: fields[3],
    })
}
