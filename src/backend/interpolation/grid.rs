use serde::{Deserialize, Serialize};

use super::InterpolationError;


// Upper bound on the number of lattice points of one field.
pub const MAX_LATTICE_POINTS: usize = 4_000_000;


// Number of coordinates `0, step, 2 * step, ...` strictly below `extent`.
// There is always at least the origin, even when `step` exceeds `extent`.
// `None` if the count does not fit under `MAX_LATTICE_POINTS`.
#[must_use]
pub fn axis_point_count(extent: u32, step: f64) -> Option<usize> {
    let count = (f64::from(extent) / step).ceil();

    if !count.is_finite() || count > MAX_LATTICE_POINTS as f64 {
        return None;
    }

    Some((count as usize).max(1))
}

#[must_use]
pub fn axis_coordinates(count: usize, step: f64) -> Vec<f64> {
    (0..count)
        .map(|index| index as f64 * step)
        .collect()
}


// Regular lattice over `[0, width) x [0, height)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    step: f64,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Lattice {
    /// # Errors
    ///
    /// Will return `Err` if `step` is not a positive number or the lattice
    /// would have more than `MAX_LATTICE_POINTS` points.
    pub fn new(width: u32, height: u32, step: f64) -> Result<Self, InterpolationError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(InterpolationError::DegenerateScale(step));
        }

        let too_large = || InterpolationError::LatticeTooLarge(step);

        let columns = axis_point_count(width, step).ok_or_else(too_large)?;
        let rows    = axis_point_count(height, step).ok_or_else(too_large)?;

        if columns
            .checked_mul(rows)
            .is_none_or(|points| points > MAX_LATTICE_POINTS)
        {
            return Err(too_large());
        }

        Ok(Self {
            step,
            xs: axis_coordinates(columns, step),
            ys: axis_coordinates(rows, step),
        })
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.ys.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    fn lattice(width: u32, height: u32, step: f64) -> Lattice {
        Lattice::new(width, height, step)
            .unwrap_or_else(|error| panic!("{}", error))
    }


    #[test]
    fn end_is_exclusive() {
        assert_eq!(vec![0.0, 50.0, 100.0], lattice(150, 10, 50.0).xs());
        assert_eq!(vec![0.0, 50.0, 100.0, 150.0], lattice(151, 10, 50.0).xs());
    }

    #[test]
    fn fractional_step() {
        assert_eq!(vec![0.0, 2.5, 5.0, 7.5], lattice(10, 1, 2.5).xs());
    }

    #[test]
    fn step_longer_than_extent_keeps_origin() {
        assert_eq!(Some(1), axis_point_count(30, 500.0));
        assert_eq!(vec![0.0], lattice(30, 30, 500.0).xs());
    }

    #[test]
    fn lattice_over_map() {
        let lattice = lattice(800, 600, 50.0);

        assert_eq!(16, lattice.columns());
        assert_eq!(12, lattice.rows());
        assert_eq!(Some(&750.0), lattice.xs().last());
        assert_eq!(Some(&550.0), lattice.ys().last());
    }

    #[test]
    fn tiny_step_is_rejected() {
        // 1 px over 1000 m with a 1 m radius.
        assert_eq!(
            Err(InterpolationError::LatticeTooLarge(0.001)),
            Lattice::new(800, 600, 0.001)
        );
        assert_eq!(None, axis_point_count(u32::MAX, 1e-300));
    }

    #[test]
    fn lattice_at_point_cap() {
        let lattice = lattice(2_000, 2_000, 1.0);

        assert_eq!(MAX_LATTICE_POINTS, lattice.columns() * lattice.rows());
        assert!(
            matches!(
                Lattice::new(2_001, 2_000, 1.0),
                Err(InterpolationError::LatticeTooLarge(_))
            )
        );
    }

    #[test]
    fn non_positive_step_is_rejected() {
        for step in [0.0, -5.0, f64::NAN] {
            assert!(
                matches!(
                    Lattice::new(800, 600, step),
                    Err(InterpolationError::DegenerateScale(_))
                )
            );
        }
    }
}
