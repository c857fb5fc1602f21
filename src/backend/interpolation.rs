use log::{debug, warn};
use nalgebra::DMatrix;
use serde::Serialize;
use thiserror::Error;

use super::mathphysics::{
    meters_to_pixels, MapExtent, Meter, PixelsPerMeter
};
use super::signal::NetworkName;
use super::store::Sample;


pub use grid::*;
pub use rbf::*;


pub mod grid;
pub mod rbf;


// Below this many samples the interpolant is poorly conditioned, but still
// usable.
const WELL_CONDITIONED_SAMPLE_COUNT: usize = 3;


#[derive(Debug, Error, PartialEq)]
pub enum InterpolationError {
    #[error("No samples to interpolate")]
    NoSamples,
    #[error("All {0} samples share one location")]
    DegenerateSamples(usize),
    #[error("Grid step and kernel width must be positive, got `{0}` px")]
    DegenerateScale(f64),
    #[error("Grid step `{0}` px gives more than 4000000 lattice points")]
    LatticeTooLarge(f64),
    #[error("Sample kernel matrix is singular")]
    SingularSystem,
}


// Interpolated signal of one network over the map. Values are negated dBm:
// -40 dBm is stored as 40.0. Renderers rely on this sign convention.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Field {
    network_name: NetworkName,
    extent: MapExtent,
    lattice: Lattice,
    // Rows follow `y`, columns follow `x`.
    values: DMatrix<f64>,
}

impl Field {
    #[must_use]
    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    #[must_use]
    pub fn extent(&self) -> MapExtent {
        self.extent
    }

    #[must_use]
    pub fn grid_step(&self) -> f64 {
        self.lattice.step()
    }

    #[must_use]
    pub fn xs(&self) -> &[f64] {
        self.lattice.xs()
    }

    #[must_use]
    pub fn ys(&self) -> &[f64] {
        self.lattice.ys()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.values.ncols()
    }

    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get((row, column)).copied()
    }

    #[must_use]
    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    #[must_use]
    pub fn row_values(&self) -> Vec<Vec<f64>> {
        self.values
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    #[must_use]
    pub fn min_value(&self) -> f64 {
        self.values.min()
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values.max()
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldInterpolator {
    sampling_radius: Meter,
    pixels_per_meter: PixelsPerMeter,
}

impl FieldInterpolator {
    #[must_use]
    pub fn new(sampling_radius: Meter, pixels_per_meter: PixelsPerMeter) -> Self {
        Self { sampling_radius, pixels_per_meter }
    }

    // Both the lattice step and the kernel width equal the sampling radius
    // in pixels.
    #[must_use]
    pub fn grid_step(&self) -> f64 {
        meters_to_pixels(self.sampling_radius, self.pixels_per_meter)
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.grid_step()
    }

    /// # Errors
    ///
    /// Will return `Err` if `samples` is empty, the radius or scale give a
    /// non-positive grid step, or the samples are geometrically degenerate.
    pub fn fit(&self, samples: &[Sample]) -> Result<GaussianRbf, InterpolationError> {
        if samples.len() < WELL_CONDITIONED_SAMPLE_COUNT {
            warn!(
                "Interpolating {} sample(s), the field may be inaccurate",
                samples.len()
            );
        }

        GaussianRbf::fit(samples, self.epsilon())
    }

    /// # Errors
    ///
    /// Will return `Err` under the same conditions as `fit`.
    pub fn interpolate(
        &self,
        network_name: &str,
        samples: &[Sample],
        extent: MapExtent,
    ) -> Result<Field, InterpolationError> {
        let grid_step = self.grid_step();
        let lattice   = Lattice::new(extent.width(), extent.height(), grid_step)?;
        let rbf       = self.fit(samples)?;

        debug!(
            "Interpolating `{network_name}` on {}x{} lattice with {grid_step:.2} px step",
            lattice.columns(),
            lattice.rows()
        );

        let values = DMatrix::from_fn(
            lattice.rows(),
            lattice.columns(),
            |row, column| -rbf.evaluate(lattice.xs()[column], lattice.ys()[row])
        );

        Ok(Field {
            network_name: network_name.to_string(),
            extent,
            lattice,
            values,
        })
    }
}
