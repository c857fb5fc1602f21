use std::cmp::Ordering;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::backend::mathphysics::{dbm_to_watts, watts_to_dbm, Dbm, Watt};


// Received signal strength in dBm. Values closer to 0 are stronger.
#[derive(
    Clone, Copy, Debug, Default, Display, PartialEq, PartialOrd,
    Serialize, Deserialize
)]
#[display("{_0:.2} dBm")]
#[serde(transparent)]
pub struct SignalStrength(Dbm);

impl SignalStrength {
    #[must_use]
    pub fn new(dbm: Dbm) -> Self {
        Self(dbm)
    }

    #[must_use]
    pub fn from_watts(watts: Watt) -> Self {
        Self(watts_to_dbm(watts))
    }

    #[must_use]
    pub fn dbm(&self) -> Dbm {
        self.0
    }

    #[must_use]
    pub fn watts(&self) -> Watt {
        dbm_to_watts(self.0)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    #[must_use]
    pub fn is_stronger_than(&self, other: &Self) -> bool {
        matches!(self.partial_cmp(other), Some(Ordering::Greater))
    }
}

impl From<Dbm> for SignalStrength {
    fn from(dbm: Dbm) -> Self {
        Self(dbm)
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn closer_to_zero_is_stronger() {
        let strong = SignalStrength::new(-40.0);
        let weak   = SignalStrength::new(-60.0);

        assert!(strong.is_stronger_than(&weak));
        assert!(!weak.is_stronger_than(&strong));
        assert!(!strong.is_stronger_than(&strong));
    }

    #[test]
    fn nan_is_never_stronger() {
        let nan = SignalStrength::new(f64::NAN);

        assert!(!nan.is_stronger_than(&SignalStrength::new(-90.0)));
    }

    #[test]
    fn watts_round_trip_keeps_order() {
        let strong = SignalStrength::new(-45.0);
        let weak   = SignalStrength::new(-70.0);

        assert!(strong.watts() > weak.watts());
        assert!(
            (SignalStrength::from_watts(strong.watts()).dbm() - -45.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn displayed_in_dbm() {
        assert_eq!("-63.95 dBm", SignalStrength::new(-63.9521).to_string());
    }
}
