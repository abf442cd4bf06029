//! Alignment parameters.
//!
//! `AlignConfig` carries every tunable used by the aligners. It is passed
//! explicitly into each aligner; nothing in the crate reads process-wide
//! constants, so sweeps over many configurations can run side by side.

use serde::{Deserialize, Serialize};

use crate::error::{AlignError, Result};

/// Parameters shared by all aligners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Minimum similarity for a confident Body/Footnote match. Range: [0, 1].
    pub similarity_threshold: f64,

    /// Reward for leaving a line unmatched in the global aligners. Must be <= 0.
    pub gap_penalty: f64,

    /// Penalty applied to matches in the weak band. Must be <= 0; its
    /// magnitude is subtracted from the similarity.
    pub weak_match_penalty: f64,

    /// Lower bound of the weak-match band `[weak_match_floor, similarity_threshold)`.
    pub weak_match_floor: f64,

    /// Initial number of reference positions searched on each side of the
    /// anchor by the locality-windowed search.
    pub locality_window: usize,

    /// Half-width of the band kept around the proportional position along each
    /// reference axis by the banded DP aligner.
    pub band_width: usize,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.75,
            gap_penalty: -0.3,
            weak_match_penalty: -0.4,
            weak_match_floor: 0.5,
            locality_window: 10,
            band_width: 12,
        }
    }
}

impl AlignConfig {
    /// Returns a builder seeded with the default parameters.
    pub fn builder() -> AlignConfigBuilder {
        AlignConfigBuilder::default()
    }

    /// Checks every parameter for range and sign consistency.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        unit_interval("similarity_threshold", self.similarity_threshold)?;
        unit_interval("weak_match_floor", self.weak_match_floor)?;
        non_positive("gap_penalty", self.gap_penalty)?;
        non_positive("weak_match_penalty", self.weak_match_penalty)?;

        if self.weak_match_floor > self.similarity_threshold {
            return Err(AlignError::config(
                "weak_match_floor",
                self.weak_match_floor,
                "must not exceed similarity_threshold",
            ));
        }
        if self.locality_window == 0 {
            return Err(AlignError::config(
                "locality_window",
                self.locality_window,
                "must be at least 1",
            ));
        }
        if self.band_width == 0 {
            return Err(AlignError::config(
                "band_width",
                self.band_width,
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Returns a validated copy with a different similarity threshold.
    ///
    /// Every other parameter is kept as is, so a threshold below
    /// `weak_match_floor` is rejected.
    pub fn with_threshold(&self, threshold: f64) -> Result<Self> {
        let config = Self {
            similarity_threshold: threshold,
            ..*self
        };
        config.validate()?;
        Ok(config)
    }
}

fn unit_interval(param: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AlignError::config(param, value, "must be within [0, 1]"));
    }
    Ok(())
}

fn non_positive(param: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value > 0.0 {
        return Err(AlignError::config(param, value, "must be finite and <= 0"));
    }
    Ok(())
}

/// Fluent builder for [`AlignConfig`]; `build` validates.
#[derive(Debug, Clone, Default)]
pub struct AlignConfigBuilder {
    config: AlignConfig,
}

impl AlignConfigBuilder {
    pub fn similarity_threshold(mut self, value: f64) -> Self {
        self.config.similarity_threshold = value;
        self
    }

    pub fn gap_penalty(mut self, value: f64) -> Self {
        self.config.gap_penalty = value;
        self
    }

    pub fn weak_match_penalty(mut self, value: f64) -> Self {
        self.config.weak_match_penalty = value;
        self
    }

    pub fn weak_match_floor(mut self, value: f64) -> Self {
        self.config.weak_match_floor = value;
        self
    }

    pub fn locality_window(mut self, value: usize) -> Self {
        self.config.locality_window = value;
        self
    }

    pub fn band_width(mut self, value: usize) -> Self {
        self.config.band_width = value;
        self
    }

    pub fn build(self) -> Result<AlignConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Number of hidden states in the HMM aligner.
pub const HMM_STATES: usize = 3;

/// Start and transition probabilities for the HMM aligner.
///
/// Index order is Body, Footnote, Other. `transitions[from][to]`.
/// Similarity scores become emission probabilities as `score^emission_sharpness`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HmmParams {
    pub start: [f64; HMM_STATES],
    pub transitions: [[f64; HMM_STATES]; HMM_STATES],
    #[serde(default = "default_sharpness")]
    pub emission_sharpness: f64,
}

fn default_sharpness() -> f64 {
    8.0
}

impl Default for HmmParams {
    fn default() -> Self {
        Self {
            start: [0.6, 0.2, 0.2],
            transitions: [
                [0.85, 0.10, 0.05],
                [0.15, 0.80, 0.05],
                [0.45, 0.15, 0.40],
            ],
            emission_sharpness: default_sharpness(),
        }
    }
}

impl HmmParams {
    /// Creates validated HMM parameters with the default emission sharpness.
    pub fn new(
        start: [f64; HMM_STATES],
        transitions: [[f64; HMM_STATES]; HMM_STATES],
    ) -> Result<Self> {
        let params = Self {
            start,
            transitions,
            emission_sharpness: default_sharpness(),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_sharpness(mut self, sharpness: f64) -> Result<Self> {
        self.emission_sharpness = sharpness;
        self.validate()?;
        Ok(self)
    }

    /// Every probability must lie in (0, 1] and each distribution must sum
    /// to 1; the sharpness must be finite and positive.
    pub fn validate(&self) -> Result<()> {
        check_distribution("hmm.start", &self.start)?;
        for row in &self.transitions {
            check_distribution("hmm.transitions", row)?;
        }
        if !self.emission_sharpness.is_finite() || self.emission_sharpness <= 0.0 {
            return Err(AlignError::config(
                "hmm.emission_sharpness",
                self.emission_sharpness,
                "must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Maps a similarity in [0, 1] onto an emission probability.
    pub fn emission(&self, score: f64) -> f64 {
        score.clamp(0.0, 1.0).powf(self.emission_sharpness)
    }
}

fn check_distribution(param: &'static str, row: &[f64; HMM_STATES]) -> Result<()> {
    for &p in row {
        if !p.is_finite() || p <= 0.0 || p > 1.0 {
            return Err(AlignError::config(param, p, "probabilities must be within (0, 1]"));
        }
    }
    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > 1e-6 {
        return Err(AlignError::config(param, sum, "probabilities must sum to 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AlignConfig::default().validate().is_ok());
        assert!(HmmParams::default().validate().is_ok());
    }

    #[test]
    fn positive_gap_penalty_rejected() {
        let err = AlignConfig::builder().gap_penalty(0.5).build().unwrap_err();
        assert!(matches!(
            err,
            AlignError::InvalidConfig {
                param: "gap_penalty",
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        assert!(AlignConfig::builder().similarity_threshold(1.2).build().is_err());
        assert!(AlignConfig::builder().similarity_threshold(-0.1).build().is_err());
        assert!(
            AlignConfig::builder()
                .similarity_threshold(f64::NAN)
                .build()
                .is_err()
        );
    }

    #[test]
    fn floor_above_threshold_rejected() {
        let err = AlignConfig::builder()
            .similarity_threshold(0.6)
            .weak_match_floor(0.7)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            AlignError::InvalidConfig {
                param: "weak_match_floor",
                ..
            }
        ));
    }

    #[test]
    fn zero_windows_rejected() {
        assert!(AlignConfig::builder().locality_window(0).build().is_err());
        assert!(AlignConfig::builder().band_width(0).build().is_err());
    }

    #[test]
    fn with_threshold_keeps_floor() {
        let config = AlignConfig::default().with_threshold(0.6).unwrap();
        assert_eq!(config.similarity_threshold, 0.6);
        assert_eq!(config.weak_match_floor, 0.5);
        assert!(AlignConfig::default().with_threshold(1.5).is_err());

        let err = AlignConfig::default().with_threshold(0.4).unwrap_err();
        assert!(matches!(
            err,
            AlignError::InvalidConfig {
                param: "weak_match_floor",
                ..
            }
        ));
    }

    #[test]
    fn hmm_rows_must_sum_to_one() {
        let err = HmmParams::new([0.5, 0.3, 0.2], [[0.5, 0.5, 0.5]; 3]).unwrap_err();
        assert!(matches!(err, AlignError::InvalidConfig { .. }));
        assert!(HmmParams::new([1.0, 0.0, 0.0], [[0.4, 0.3, 0.3]; 3]).is_err());
    }

    #[test]
    fn sharpness_must_be_positive() {
        assert!(HmmParams::default().with_sharpness(0.0).is_err());
        assert!(HmmParams::default().with_sharpness(f64::INFINITY).is_err());
        let params = HmmParams::default().with_sharpness(2.0).unwrap();
        assert_eq!(params.emission(0.5), 0.25);
    }
}
