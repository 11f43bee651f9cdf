//! Command-line driver for offline reprocessing of trigger-cell batches.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use trigclust_algorithms::Pipeline;
use trigclust_core::{
    AcceptAll, AlgoConfig, AssociationStrategy, CellRecord, MapGeometry, Multicluster,
    RadiusStrategy, SeedingStrategy, TriggerCell,
};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Core(#[from] trigclust_core::Error),

    #[error("--rphi-kernel expects 9 weights, got {0}")]
    KernelLength(usize),
}

/// Seed-finding strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeedingArg {
    /// Largest phi bin per radial window
    MaxPerRBin,
    /// Primary plus phi-separated secondary maximum
    SecondaryMax,
    /// Every bin above threshold
    Threshold,
    /// Local maxima with sub-bin interpolation
    InterpolatedMax,
}

impl From<SeedingArg> for SeedingStrategy {
    fn from(arg: SeedingArg) -> Self {
        match arg {
            SeedingArg::MaxPerRBin => Self::MaxPerRBin,
            SeedingArg::SecondaryMax => Self::SecondaryMax,
            SeedingArg::Threshold => Self::Threshold,
            SeedingArg::InterpolatedMax => Self::InterpolatedMax,
        }
    }
}

/// Association strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AssociationArg {
    /// Full weight to the nearest in-range seed
    NearestNeighbour,
    /// Inverse-distance weight split
    EnergySplit,
}

impl From<AssociationArg> for AssociationStrategy {
    fn from(arg: AssociationArg) -> Self {
        match arg {
            AssociationArg::NearestNeighbour => Self::NearestNeighbour,
            AssociationArg::EnergySplit => Self::EnergySplit,
        }
    }
}

/// Radius policy selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RadiusArg {
    /// Constant radius
    Fixed,
    /// Radius linear in |eta|
    LinearWithEta,
}

impl From<RadiusArg> for RadiusStrategy {
    fn from(arg: RadiusArg) -> Self {
        match arg {
            RadiusArg::Fixed => Self::Fixed,
            RadiusArg::LinearWithEta => Self::LinearWithEta,
        }
    }
}

/// Trigger-primitive clustering over JSON-dumped events.
#[derive(Parser)]
#[command(name = "trigclust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster trigger-cell batches into multiclusters
    Process {
        /// Input event file (geometry + cell batches, JSON)
        input: PathBuf,

        /// Output file path (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Seed-finding strategy
        #[arg(long, value_enum, default_value = "max-per-r-bin")]
        seeding: SeedingArg,

        /// Association strategy
        #[arg(long, value_enum, default_value = "nearest-neighbour")]
        association: AssociationArg,

        /// Radius policy
        #[arg(long, value_enum, default_value = "fixed")]
        radius: RadiusArg,

        /// 2D cluster seeding threshold
        #[arg(long, default_value_t = 5.0)]
        seed_threshold: f64,

        /// 2D cluster membership threshold
        #[arg(long, default_value_t = 2.0)]
        member_threshold: f64,

        /// Maximum in-layer seed distance
        #[arg(long, default_value_t = 6.0)]
        max_distance: f64,

        /// Histogram seeding threshold
        #[arg(long, default_value_t = 20.0)]
        histo_threshold: f64,

        /// Radial bin count of the seeding histogram
        #[arg(long, default_value_t = 36)]
        bins_r: usize,

        /// Azimuthal bin count of the seeding histogram
        #[arg(long, default_value_t = 216)]
        bins_phi: usize,

        /// Per-r-bin phi smoothing window widths (comma-separated, odd)
        #[arg(long, value_delimiter = ',')]
        phi_smoothing: Option<Vec<usize>>,

        /// Row-major 3x3 r-phi smoothing kernel (9 comma-separated weights)
        #[arg(long, value_delimiter = ',')]
        rphi_kernel: Option<Vec<f64>>,

        /// Minimum phi-bin separation for secondary-max seeds
        #[arg(long, default_value_t = 2)]
        secondary_phi_gap: usize,

        /// Association radius under the fixed policy
        #[arg(long, default_value_t = 0.03)]
        association_radius: f64,

        /// Coefficient A of the linear-with-eta radius
        #[arg(long, default_value_t = 0.03)]
        radius_a: f64,

        /// Coefficient B of the linear-with-eta radius
        #[arg(long, default_value_t = 0.02)]
        radius_b: f64,

        /// Multicluster transverse-energy threshold
        #[arg(long, default_value_t = 0.0)]
        pt_threshold: f64,
    },
}

/// Input file layout: a geometry dump plus per-event cell batches.
#[derive(Debug, Deserialize)]
struct EventFile {
    geometry: Vec<CellRecord>,
    events: Vec<Vec<TriggerCell>>,
}

/// Output record for one event.
#[derive(Debug, Serialize)]
struct EventOutput {
    event: usize,
    multiclusters: Vec<Multicluster>,
}

fn parse_kernel(weights: Vec<f64>) -> Result<[f64; 9]> {
    weights
        .try_into()
        .map_err(|bad: Vec<f64>| CliError::KernelLength(bad.len()))
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process {
            input,
            output,
            seeding,
            association,
            radius,
            seed_threshold,
            member_threshold,
            max_distance,
            histo_threshold,
            bins_r,
            bins_phi,
            phi_smoothing,
            rphi_kernel,
            secondary_phi_gap,
            association_radius,
            radius_a,
            radius_b,
            pt_threshold,
        } => {
            let start = Instant::now();
            let file: EventFile = serde_json::from_reader(BufReader::new(File::open(&input)?))?;
            let geometry = MapGeometry::from_records(file.geometry);
            println!(
                "loaded {} geometry cells, {} events from {}",
                geometry.len(),
                file.events.len(),
                input.display()
            );

            let mut config = AlgoConfig::new()
                .with_seeding_strategy(seeding.into())
                .with_association_strategy(association.into())
                .with_radius_strategy(radius.into())
                .with_seed_threshold(seed_threshold)
                .with_member_threshold(member_threshold)
                .with_max_distance(max_distance)
                .with_histo_threshold(histo_threshold)
                .with_bins(bins_r, bins_phi)
                .with_secondary_phi_gap(secondary_phi_gap)
                .with_association_radius(association_radius)
                .with_radius_coefficients(radius_a, radius_b)
                .with_pt_threshold(pt_threshold);
            if let Some(bin_sums) = phi_smoothing {
                config = config.with_phi_smoothing(bin_sums);
            }
            if let Some(weights) = rphi_kernel {
                config = config.with_rphi_smoothing(parse_kernel(weights)?);
            }

            let pipeline = Pipeline::new(&geometry, config, &AcceptAll)?;
            let results = pipeline.process_batches(&file.events)?;

            let outputs: Vec<EventOutput> = results
                .into_iter()
                .enumerate()
                .map(|(event, multiclusters)| EventOutput {
                    event,
                    multiclusters,
                })
                .collect();
            let total: usize = outputs.iter().map(|o| o.multiclusters.len()).sum();

            serde_json::to_writer_pretty(BufWriter::new(File::create(&output)?), &outputs)?;
            println!(
                "wrote {} multiclusters over {} events to {} in {:.2?}",
                total,
                outputs.len(),
                output.display(),
                start.elapsed()
            );
            Ok(())
        }
    }
}
