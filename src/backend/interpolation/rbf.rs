use nalgebra::{DMatrix, DVector};

use crate::backend::store::Sample;

use super::InterpolationError;


#[must_use]
pub fn gaussian(distance: f64, epsilon: f64) -> f64 {
    (-(distance / epsilon).powi(2)).exp()
}


// Gaussian radial basis function interpolant
//     f(p) = sum_j w_j * exp(-(|p - p_j| / epsilon)^2)
// with weights chosen so that `f` passes through every sample.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianRbf {
    centers: Vec<(f64, f64)>,
    weights: DVector<f64>,
    epsilon: f64,
}

impl GaussianRbf {
    /// # Errors
    ///
    /// Will return `Err` if there are no samples, `epsilon` is not a
    /// positive number, all samples share one location or the kernel
    /// matrix is singular.
    pub fn fit(samples: &[Sample], epsilon: f64) -> Result<Self, InterpolationError> {
        if samples.is_empty() {
            return Err(InterpolationError::NoSamples);
        }
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(InterpolationError::DegenerateScale(epsilon));
        }

        let first = samples[0].location;

        if samples.len() > 1
            && samples.iter().all(|sample| sample.location == first)
        {
            return Err(InterpolationError::DegenerateSamples(samples.len()));
        }

        let centers: Vec<(f64, f64)> = samples
            .iter()
            .map(|sample| (
                f64::from(sample.location.x),
                f64::from(sample.location.y)
            ))
            .collect();
        let values = DVector::from_iterator(
            samples.len(),
            samples.iter().map(|sample| sample.signal_strength.dbm())
        );
        let kernel = DMatrix::from_fn(
            centers.len(),
            centers.len(),
            |row, column| gaussian(
                distance(centers[row], centers[column]),
                epsilon
            )
        );

        let weights = kernel
            .lu()
            .solve(&values)
            .filter(|weights| weights.iter().all(|weight| weight.is_finite()))
            .ok_or(InterpolationError::SingularSystem)?;

        Ok(Self { centers, weights, epsilon })
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[must_use]
    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    #[must_use]
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.centers
            .iter()
            .zip(self.weights.iter())
            .map(|(center, weight)|
                weight * gaussian(distance(*center, (x, y)), self.epsilon)
            )
            .sum()
    }
}


fn distance(point1: (f64, f64), point2: (f64, f64)) -> f64 {
    (point2.0 - point1.0).hypot(point2.1 - point1.1)
}
