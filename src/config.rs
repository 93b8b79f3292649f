use crate::types::Config;
use anyhow::{bail, Context, Result};
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.analyzer.sample_stride == 0 {
            bail!("analyzer.sample_stride must be at least 1");
        }
        if self.stabilizer.stability_frames < self.stabilizer.min_history {
            bail!(
                "stabilizer.stability_frames ({}) must not be below min_history ({})",
                self.stabilizer.stability_frames,
                self.stabilizer.min_history
            );
        }
        if !(0.0..=1.0).contains(&self.stabilizer.confidence_threshold) {
            bail!("stabilizer.confidence_threshold must be in [0, 1]");
        }
        if self.placement.target_occupancy <= 0.0 {
            bail!("placement.target_occupancy must be positive");
        }
        if self.motion.position_history == 0 {
            bail!("motion.position_history must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_stride() {
        let mut config = Config::default();
        config.analyzer.sample_stride = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_window_below_min_history() {
        let mut config = Config::default();
        config.stabilizer.stability_frames = 2;
        assert!(config.validate().is_err());
    }
}
