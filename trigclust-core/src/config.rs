//! Algorithm configuration and strategy selectors.

use std::str::FromStr;

use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Seed-finding strategy over the energy histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SeedingStrategy {
    /// One seed per radial bin: the largest phi bin above threshold.
    #[default]
    MaxPerRBin,
    /// As `MaxPerRBin`, plus a second maximum separated in phi.
    SecondaryMax,
    /// Every bin above threshold is a seed.
    Threshold,
    /// Local maxima with sub-bin quadratic position refinement.
    InterpolatedMax,
}

impl FromStr for SeedingStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max-per-r-bin" => Ok(Self::MaxPerRBin),
            "secondary-max" => Ok(Self::SecondaryMax),
            "threshold" => Ok(Self::Threshold),
            "interpolated-max" => Ok(Self::InterpolatedMax),
            other => Err(ConfigError::UnknownStrategy {
                kind: "seeding",
                value: other.to_string(),
            }),
        }
    }
}

/// Cluster-to-seed association strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AssociationStrategy {
    /// Full weight to the nearest in-range seed.
    #[default]
    NearestNeighbour,
    /// Weight split across in-range seeds by inverse distance.
    EnergySplit,
}

impl FromStr for AssociationStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest-neighbour" => Ok(Self::NearestNeighbour),
            "energy-split" => Ok(Self::EnergySplit),
            other => Err(ConfigError::UnknownStrategy {
                kind: "association",
                value: other.to_string(),
            }),
        }
    }
}

/// Effective association radius policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RadiusStrategy {
    /// Constant radius.
    #[default]
    Fixed,
    /// Radius linear in the cluster's pseudorapidity magnitude.
    LinearWithEta,
}

impl FromStr for RadiusStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "linear-with-eta" => Ok(Self::LinearWithEta),
            other => Err(ConfigError::UnknownStrategy {
                kind: "radius",
                value: other.to_string(),
            }),
        }
    }
}

/// Configuration for the two clustering stages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlgoConfig {
    /// Minimum energy for a cell to start a new 2D cluster.
    pub seed_threshold: f64,
    /// Minimum energy for a cell to join any 2D cluster.
    pub member_threshold: f64,
    /// Maximum in-layer distance from a cluster seed for membership.
    pub max_distance: f64,

    /// Radial (r/z) bin count of the seeding histogram.
    pub n_bins_r: usize,
    /// Azimuthal bin count of the seeding histogram.
    pub n_bins_phi: usize,
    /// Minimum histogram bin energy for seeding.
    pub histo_threshold: f64,
    /// Per-r-bin circular sliding-sum window widths (odd), or no
    /// phi smoothing.
    pub phi_smoothing_bin_sums: Option<Vec<usize>>,
    /// Row-major 3x3 r-phi smoothing kernel, or no r-phi smoothing.
    pub rphi_smoothing_kernel: Option<[f64; 9]>,

    /// Seed-finding strategy.
    pub seeding_strategy: SeedingStrategy,
    /// Minimum phi-bin separation for `SecondaryMax` secondary seeds.
    pub secondary_phi_gap: usize,

    /// Cluster-to-seed association strategy.
    pub association_strategy: AssociationStrategy,
    /// Effective radius policy.
    pub radius_strategy: RadiusStrategy,
    /// `(A, B)` coefficients for `LinearWithEta`.
    pub radius_coefficients: (f64, f64),
    /// Effective radius under the `Fixed` policy, in the projected
    /// (x/z, y/z) plane.
    pub association_radius: f64,

    /// Minimum multicluster transverse energy to be emitted.
    pub pt_threshold: f64,
}

impl Default for AlgoConfig {
    fn default() -> Self {
        Self {
            seed_threshold: 5.0,
            member_threshold: 2.0,
            max_distance: 6.0,
            n_bins_r: 36,
            n_bins_phi: 216,
            histo_threshold: 20.0,
            phi_smoothing_bin_sums: None,
            rphi_smoothing_kernel: None,
            seeding_strategy: SeedingStrategy::MaxPerRBin,
            secondary_phi_gap: 2,
            association_strategy: AssociationStrategy::NearestNeighbour,
            radius_strategy: RadiusStrategy::Fixed,
            radius_coefficients: (0.03, 0.02),
            association_radius: 0.03,
            pt_threshold: 0.0,
        }
    }
}

impl AlgoConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the 2D seeding threshold.
    #[must_use]
    pub fn with_seed_threshold(mut self, threshold: f64) -> Self {
        self.seed_threshold = threshold;
        self
    }

    /// Sets the 2D membership threshold.
    #[must_use]
    pub fn with_member_threshold(mut self, threshold: f64) -> Self {
        self.member_threshold = threshold;
        self
    }

    /// Sets the maximum in-layer seed distance.
    #[must_use]
    pub fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Sets the histogram bin counts.
    #[must_use]
    pub fn with_bins(mut self, n_bins_r: usize, n_bins_phi: usize) -> Self {
        self.n_bins_r = n_bins_r;
        self.n_bins_phi = n_bins_phi;
        self
    }

    /// Sets the seeding histogram threshold.
    #[must_use]
    pub fn with_histo_threshold(mut self, threshold: f64) -> Self {
        self.histo_threshold = threshold;
        self
    }

    /// Enables phi smoothing with per-r-bin window widths.
    #[must_use]
    pub fn with_phi_smoothing(mut self, bin_sums: Vec<usize>) -> Self {
        self.phi_smoothing_bin_sums = Some(bin_sums);
        self
    }

    /// Enables r-phi smoothing with a row-major 3x3 kernel.
    #[must_use]
    pub fn with_rphi_smoothing(mut self, kernel: [f64; 9]) -> Self {
        self.rphi_smoothing_kernel = Some(kernel);
        self
    }

    /// Sets the seed-finding strategy.
    #[must_use]
    pub fn with_seeding_strategy(mut self, strategy: SeedingStrategy) -> Self {
        self.seeding_strategy = strategy;
        self
    }

    /// Sets the minimum phi-bin separation for secondary seeds.
    #[must_use]
    pub fn with_secondary_phi_gap(mut self, gap: usize) -> Self {
        self.secondary_phi_gap = gap;
        self
    }

    /// Sets the association strategy.
    #[must_use]
    pub fn with_association_strategy(mut self, strategy: AssociationStrategy) -> Self {
        self.association_strategy = strategy;
        self
    }

    /// Sets the radius policy.
    #[must_use]
    pub fn with_radius_strategy(mut self, strategy: RadiusStrategy) -> Self {
        self.radius_strategy = strategy;
        self
    }

    /// Sets the `LinearWithEta` coefficients.
    #[must_use]
    pub fn with_radius_coefficients(mut self, a: f64, b: f64) -> Self {
        self.radius_coefficients = (a, b);
        self
    }

    /// Sets the `Fixed` association radius.
    #[must_use]
    pub fn with_association_radius(mut self, radius: f64) -> Self {
        self.association_radius = radius;
        self
    }

    /// Sets the multicluster transverse-energy threshold.
    #[must_use]
    pub fn with_pt_threshold(mut self, threshold: f64) -> Self {
        self.pt_threshold = threshold;
        self
    }

    /// Validates the configuration; run once before any batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_bins_r == 0 {
            return Err(ConfigError::EmptyAxis { axis: "r" });
        }
        if self.n_bins_phi == 0 {
            return Err(ConfigError::EmptyAxis { axis: "phi" });
        }
        if let Some(bin_sums) = &self.phi_smoothing_bin_sums {
            if bin_sums.len() != self.n_bins_r {
                return Err(ConfigError::BinSumsLength {
                    expected: self.n_bins_r,
                    got: bin_sums.len(),
                });
            }
            if let Some(&window) = bin_sums.iter().find(|&&w| w % 2 == 0) {
                return Err(ConfigError::EvenWindow(window));
            }
        }
        if let Some(kernel) = &self.rphi_smoothing_kernel {
            if let Some(index) = kernel.iter().position(|w| !w.is_finite()) {
                return Err(ConfigError::NonFiniteKernelWeight { index });
            }
        }
        for (name, value) in [
            ("seed_threshold", self.seed_threshold),
            ("member_threshold", self.member_threshold),
            ("histo_threshold", self.histo_threshold),
            ("pt_threshold", self.pt_threshold),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeThreshold { name, value });
            }
        }
        for (name, value) in [
            ("max_distance", self.max_distance),
            ("association_radius", self.association_radius),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositiveDistance { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = AlgoConfig::new()
            .with_seed_threshold(4.0)
            .with_bins(12, 72)
            .with_seeding_strategy(SeedingStrategy::Threshold)
            .with_pt_threshold(1.5);

        assert!((config.seed_threshold - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.n_bins_r, 12);
        assert_eq!(config.n_bins_phi, 72);
        assert_eq!(config.seeding_strategy, SeedingStrategy::Threshold);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "interpolated-max".parse::<SeedingStrategy>().unwrap(),
            SeedingStrategy::InterpolatedMax
        );
        assert_eq!(
            "energy-split".parse::<AssociationStrategy>().unwrap(),
            AssociationStrategy::EnergySplit
        );
        assert_eq!(
            "linear-with-eta".parse::<RadiusStrategy>().unwrap(),
            RadiusStrategy::LinearWithEta
        );
        assert!(matches!(
            "histo-max".parse::<SeedingStrategy>(),
            Err(ConfigError::UnknownStrategy { kind: "seeding", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_bins() {
        let config = AlgoConfig::new().with_bins(0, 216);
        assert_eq!(config.validate(), Err(ConfigError::EmptyAxis { axis: "r" }));

        let config = AlgoConfig::new()
            .with_bins(4, 12)
            .with_phi_smoothing(vec![3, 3, 3]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BinSumsLength {
                expected: 4,
                got: 3
            })
        );

        let config = AlgoConfig::new()
            .with_bins(2, 12)
            .with_phi_smoothing(vec![3, 4]);
        assert_eq!(config.validate(), Err(ConfigError::EvenWindow(4)));
    }

    #[test]
    fn test_validate_rejects_bad_scalars() {
        let config = AlgoConfig::new().with_seed_threshold(-1.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeThreshold {
                name: "seed_threshold",
                ..
            })
        ));

        let config = AlgoConfig::new().with_max_distance(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveDistance {
                name: "max_distance",
                ..
            })
        ));

        let mut kernel = [1.0; 9];
        kernel[4] = f64::NAN;
        let config = AlgoConfig::new().with_rphi_smoothing(kernel);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonFiniteKernelWeight { index: 4 })
        );
    }
}
