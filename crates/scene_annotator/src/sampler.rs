//! Random samplers for scene placement
//!
//! Small configuration-driven samplers used when scattering objects or
//! scaling them. All of them draw from a caller-supplied [`Rng`], so a seeded
//! generator reproduces a run exactly.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::{Vec2, Vec3};

/// Sampler configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    /// Sampling mode string outside `uniform` / `normal`
    #[error("Mode {0} doesn't exist")]
    UnknownMode(String),

    /// Lower bound above upper bound, or a negative deviation
    #[error("Invalid sampling range: {0}")]
    InvalidRange(String),
}

/// Distribution used by [`EqualUniform3d`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SamplingMode {
    /// Uniform over `[min, max]`
    Uniform,
    /// Gaussian with `mean` and `std_dev`
    Normal,
}

impl FromStr for SamplingMode {
    type Err = SamplerError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "uniform" => Ok(Self::Uniform),
            "normal" => Ok(Self::Normal),
            other => Err(SamplerError::UnknownMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for SamplingMode {
    type Error = SamplerError;

    fn try_from(mode: String) -> Result<Self, Self::Error> {
        mode.parse()
    }
}

impl From<SamplingMode> for String {
    fn from(mode: SamplingMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => f.write_str("uniform"),
            Self::Normal => f.write_str("normal"),
        }
    }
}

/// Uniform point in an axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Uniform2d {
    /// Lower corner
    pub min: [f32; 2],
    /// Upper corner
    pub max: [f32; 2],
}

impl Uniform2d {
    /// Create a sampler, checking `min <= max` on both axes
    pub fn new(min: [f32; 2], max: [f32; 2]) -> Result<Self, SamplerError> {
        let sampler = Self { min, max };
        sampler.validate()?;
        Ok(sampler)
    }

    /// Check the bounds
    pub fn validate(&self) -> Result<(), SamplerError> {
        check_bounds(&self.min, &self.max)
    }

    /// Draw one point
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec2, SamplerError> {
        self.validate()?;
        Ok(Vec2::new(
            rng.gen_range(self.min[0]..=self.max[0]),
            rng.gen_range(self.min[1]..=self.max[1]),
        ))
    }
}

/// Vector whose three components share one drawn value
///
/// Used for uniform scaling: `(s, s, s)` with `s` drawn from the configured
/// distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqualUniform3d {
    /// Distribution
    pub mode: SamplingMode,
    /// Lower bound in uniform mode
    #[serde(default)]
    pub min: f32,
    /// Upper bound in uniform mode
    #[serde(default = "default_max")]
    pub max: f32,
    /// Mean in normal mode
    #[serde(default)]
    pub mean: f32,
    /// Standard deviation in normal mode
    #[serde(default = "default_max")]
    pub std_dev: f32,
}

const fn default_max() -> f32 {
    1.0
}

impl EqualUniform3d {
    /// Uniform in `[min, max]`
    pub fn uniform(min: f32, max: f32) -> Result<Self, SamplerError> {
        let sampler = Self {
            mode: SamplingMode::Uniform,
            min,
            max,
            mean: 0.0,
            std_dev: 1.0,
        };
        sampler.validate()?;
        Ok(sampler)
    }

    /// Gaussian with `mean` and `std_dev`
    pub fn normal(mean: f32, std_dev: f32) -> Result<Self, SamplerError> {
        let sampler = Self {
            mode: SamplingMode::Normal,
            min: 0.0,
            max: 1.0,
            mean,
            std_dev,
        };
        sampler.validate()?;
        Ok(sampler)
    }

    /// Check the parameters of the active mode
    pub fn validate(&self) -> Result<(), SamplerError> {
        match self.mode {
            SamplingMode::Uniform => check_bounds(&[self.min], &[self.max]),
            SamplingMode::Normal if self.std_dev.is_nan() || self.std_dev < 0.0 => Err(
                SamplerError::InvalidRange(format!("std_dev must be non-negative, got {}", self.std_dev)),
            ),
            SamplingMode::Normal => Ok(()),
        }
    }

    /// Draw one vector
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec3, SamplerError> {
        self.validate()?;
        let value = match self.mode {
            SamplingMode::Uniform => rng.gen_range(self.min..=self.max),
            SamplingMode::Normal => self.mean + self.std_dev * standard_normal(rng) as f32,
        };
        Ok(Vec3::new(value, value, value))
    }
}

fn check_bounds(min: &[f32], max: &[f32]) -> Result<(), SamplerError> {
    match min.iter().zip(max).find(|(lo, hi)| lo.is_nan() || hi.is_nan() || lo > hi) {
        Some((lo, hi)) => Err(SamplerError::InvalidRange(format!("min {lo} exceeds max {hi}"))),
        None => Ok(()),
    }
}

/// Standard normal variate via the Box-Muller transform
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - [0, 1) keeps the logarithm finite
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("uniform".parse::<SamplingMode>().unwrap(), SamplingMode::Uniform);
        assert_eq!("normal".parse::<SamplingMode>().unwrap(), SamplingMode::Normal);
        assert_eq!(
            "gaussian".parse::<SamplingMode>(),
            Err(SamplerError::UnknownMode("gaussian".to_string()))
        );
    }

    #[test]
    fn test_uniform2d_stays_in_bounds() {
        let sampler = Uniform2d::new([-1.0, 2.0], [1.0, 3.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let point = sampler.sample(&mut rng).unwrap();
            assert!((-1.0..=1.0).contains(&point.x));
            assert!((2.0..=3.0).contains(&point.y));
        }
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        assert!(matches!(
            Uniform2d::new([1.0, 0.0], [0.0, 1.0]),
            Err(SamplerError::InvalidRange(_))
        ));
        assert!(matches!(EqualUniform3d::uniform(2.0, 1.0), Err(SamplerError::InvalidRange(_))));
        assert!(matches!(EqualUniform3d::normal(0.0, -1.0), Err(SamplerError::InvalidRange(_))));
    }

    #[test]
    fn test_equal_uniform_components_match() {
        let sampler = EqualUniform3d::uniform(0.5, 2.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let scale = sampler.sample(&mut rng).unwrap();
        assert_eq!(scale.x, scale.y);
        assert_eq!(scale.y, scale.z);
        assert!((0.5..=2.0).contains(&scale.x));
    }

    #[test]
    fn test_normal_mode_moments() {
        let sampler = EqualUniform3d::normal(3.0, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(1234);

        let draws: Vec<f64> = (0..20_000)
            .map(|_| f64::from(sampler.sample(&mut rng).unwrap().x))
            .collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        let variance = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / draws.len() as f64;

        assert_abs_diff_eq!(mean, 3.0, epsilon = 0.02);
        assert_abs_diff_eq!(variance.sqrt(), 0.5, epsilon = 0.02);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let sampler = Uniform2d::new([0.0, 0.0], [10.0, 10.0]).unwrap();
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);

        for _ in 0..10 {
            assert_eq!(sampler.sample(&mut a).unwrap(), sampler.sample(&mut b).unwrap());
        }
    }

    #[test]
    fn test_unknown_mode_in_config_is_fatal() {
        let result: Result<EqualUniform3d, _> = toml::from_str(r#"mode = "poisson""#);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Mode poisson doesn't exist"));

        let parsed: EqualUniform3d = toml::from_str("mode = \"normal\"\nmean = 1.0").unwrap();
        assert_eq!(parsed.mode, SamplingMode::Normal);
        assert_abs_diff_eq!(parsed.std_dev, 1.0);
    }
}
