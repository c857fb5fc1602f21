use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::mathphysics::{PixelCoord, PixelPoint};
use super::signal::{NetworkName, SignalStrength};


#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("No samples were stored for network `{0}`")]
    NoSamples(NetworkName),
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    location: PixelPoint,
    network_name: NetworkName,
    signal_strength: SignalStrength,
}

impl Measurement {
    #[must_use]
    pub fn new(
        location: PixelPoint,
        network_name: &str,
        signal_strength: SignalStrength
    ) -> Self {
        Self {
            location,
            network_name: network_name.to_string(),
            signal_strength,
        }
    }

    #[must_use]
    pub fn location(&self) -> PixelPoint {
        self.location
    }

    #[must_use]
    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    #[must_use]
    pub fn signal_strength(&self) -> SignalStrength {
        self.signal_strength
    }

    fn is_at(&self, location: PixelPoint, network_name: &str) -> bool {
        self.location == location && self.network_name == network_name
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced { previous: SignalStrength },
    Rejected { stored: SignalStrength },
    // NaN or infinite readings are never stored.
    Discarded,
}


// Sample of one network at one location, input of the field interpolator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub location: PixelPoint,
    pub signal_strength: SignalStrength,
}


// At most one measurement per location and network. A repeated measurement
// only replaces the stored one if it is strictly stronger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementStore {
    measurements: Vec<Measurement>,
}

impl MeasurementStore {
    #[must_use]
    pub fn new() -> Self {
        Self { measurements: Vec::new() }
    }

    #[must_use]
    pub fn from_measurements(measurements: Vec<Measurement>) -> Self {
        let mut store = Self::new();

        for measurement in measurements {
            let Measurement { location, network_name, signal_strength } =
                measurement;

            store.upsert(location.x, location.y, &network_name, signal_strength);
        }

        store
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    // Insertion order.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    #[must_use]
    pub fn get(
        &self,
        x: PixelCoord,
        y: PixelCoord,
        network_name: &str
    ) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|measurement|
                measurement.is_at(PixelPoint::new(x, y), network_name)
            )
    }

    pub fn upsert(
        &mut self,
        x: PixelCoord,
        y: PixelCoord,
        network_name: &str,
        signal_strength: SignalStrength,
    ) -> UpsertOutcome {
        if !signal_strength.is_finite() {
            return UpsertOutcome::Discarded;
        }

        let location = PixelPoint::new(x, y);

        let position = self.measurements
            .iter()
            .position(|measurement| measurement.is_at(location, network_name));

        let Some(index) = position else {
            self.measurements.push(
                Measurement::new(location, network_name, signal_strength)
            );

            return UpsertOutcome::Inserted;
        };

        let existing = &mut self.measurements[index];
        let stored   = existing.signal_strength;

        if signal_strength.is_stronger_than(&stored) || !stored.is_finite() {
            existing.signal_strength = signal_strength;

            UpsertOutcome::Replaced { previous: stored }
        } else {
            UpsertOutcome::Rejected { stored }
        }
    }

    #[must_use]
    pub fn network_names(&self) -> BTreeSet<NetworkName> {
        self.measurements
            .iter()
            .map(|measurement| measurement.network_name.clone())
            .collect()
    }

    /// Best sample of `network_name` at every location, ordered by rows.
    ///
    /// # Errors
    ///
    /// Will return `Err` if nothing was stored for the network.
    pub fn samples_for(
        &self,
        network_name: &str
    ) -> Result<Vec<Sample>, StoreError> {
        let mut best: BTreeMap<(PixelCoord, PixelCoord), Sample> =
            BTreeMap::new();

        let matching = self.measurements
            .iter()
            .filter(|measurement| measurement.network_name == network_name);

        for measurement in matching {
            let sample = Sample {
                location: measurement.location,
                signal_strength: measurement.signal_strength,
            };

            best.entry(measurement.location.raster_key())
                .and_modify(|current| {
                    if sample.signal_strength.is_stronger_than(
                        &current.signal_strength
                    ) {
                        *current = sample;
                    }
                })
                .or_insert(sample);
        }

        if best.is_empty() {
            return Err(StoreError::NoSamples(network_name.to_string()));
        }

        Ok(best.into_values().collect())
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    fn dbm(value: f64) -> SignalStrength {
        SignalStrength::new(value)
    }

    fn stored_dbm(store: &MeasurementStore, network_name: &str) -> f64 {
        store
            .get(10, 10, network_name)
            .map(|measurement| measurement.signal_strength().dbm())
            .unwrap_or_else(|| panic!("{network_name} is missing"))
    }


    #[test]
    fn replace_only_if_stronger() {
        let mut store = MeasurementStore::new();

        assert_eq!(UpsertOutcome::Inserted, store.upsert(10, 10, "A", dbm(-50.0)));
        assert_eq!(
            UpsertOutcome::Rejected { stored: dbm(-50.0) },
            store.upsert(10, 10, "A", dbm(-60.0))
        );
        assert_eq!(-50.0, stored_dbm(&store, "A"));

        assert_eq!(
            UpsertOutcome::Replaced { previous: dbm(-50.0) },
            store.upsert(10, 10, "A", dbm(-40.0))
        );
        assert_eq!(-40.0, stored_dbm(&store, "A"));
        assert_eq!(1, store.len());
    }

    #[test]
    fn non_finite_reading_is_discarded() {
        let mut store = MeasurementStore::new();

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(UpsertOutcome::Discarded, store.upsert(10, 10, "A", dbm(value)));
        }
        assert!(store.is_empty());

        store.upsert(10, 10, "A", dbm(-80.0));

        assert_eq!(UpsertOutcome::Discarded, store.upsert(10, 10, "A", dbm(f64::NAN)));
        assert_eq!(-80.0, stored_dbm(&store, "A"));
    }

    #[test]
    fn stored_nan_is_replaced() {
        let mut store = MeasurementStore::new();

        store.measurements.push(
            Measurement::new(PixelPoint::new(10, 10), "A", dbm(f64::NAN))
        );

        assert!(
            matches!(
                store.upsert(10, 10, "A", dbm(-90.0)),
                UpsertOutcome::Replaced { .. }
            )
        );
        assert_eq!(-90.0, stored_dbm(&store, "A"));
    }

    #[test]
    fn equal_reading_is_rejected() {
        let mut store = MeasurementStore::new();

        store.upsert(10, 10, "A", dbm(-50.0));

        assert_eq!(
            UpsertOutcome::Rejected { stored: dbm(-50.0) },
            store.upsert(10, 10, "A", dbm(-50.0))
        );
    }

    #[test]
    fn key_is_location_and_network() {
        let mut store = MeasurementStore::new();

        store.upsert(10, 10, "A", dbm(-50.0));
        store.upsert(10, 10, "B", dbm(-70.0));
        store.upsert(20, 10, "A", dbm(-80.0));

        assert_eq!(3, store.len());
        assert_eq!(-70.0, stored_dbm(&store, "B"));
    }

    #[test]
    fn network_names_are_distinct() {
        let mut store = MeasurementStore::new();

        store.upsert(0, 0, "B", dbm(-50.0));
        store.upsert(5, 0, "A", dbm(-50.0));
        store.upsert(9, 0, "B", dbm(-50.0));

        let names: Vec<NetworkName> = store.network_names().into_iter().collect();

        assert_eq!(vec!["A".to_string(), "B".to_string()], names);
    }

    #[test]
    fn samples_of_one_network_in_raster_order() {
        let mut store = MeasurementStore::new();

        store.upsert(50, 20, "A", dbm(-60.0));
        store.upsert(10, 20, "A", dbm(-50.0));
        store.upsert(30, 5, "A", dbm(-40.0));
        store.upsert(30, 5, "B", dbm(-30.0));

        let samples = store
            .samples_for("A")
            .unwrap_or_else(|error| panic!("{}", error));
        let locations: Vec<PixelPoint> = samples
            .iter()
            .map(|sample| sample.location)
            .collect();

        assert_eq!(
            vec![
                PixelPoint::new(30, 5),
                PixelPoint::new(10, 20),
                PixelPoint::new(50, 20)
            ],
            locations
        );
        assert_eq!(dbm(-40.0), samples[0].signal_strength);
    }

    #[test]
    fn duplicate_locations_keep_strongest_sample() {
        // Bypasses `upsert` to check the defensive deduplication.
        let store = MeasurementStore {
            measurements: vec![
                Measurement::new(PixelPoint::new(1, 1), "A", dbm(-70.0)),
                Measurement::new(PixelPoint::new(1, 1), "A", dbm(-45.0)),
                Measurement::new(PixelPoint::new(1, 1), "A", dbm(-60.0)),
            ],
        };

        let samples = store
            .samples_for("A")
            .unwrap_or_else(|error| panic!("{}", error));

        assert_eq!(1, samples.len());
        assert_eq!(dbm(-45.0), samples[0].signal_strength);
    }

    #[test]
    fn unknown_network_has_no_samples() {
        let mut store = MeasurementStore::new();

        store.upsert(0, 0, "A", dbm(-50.0));

        assert_eq!(
            Err(StoreError::NoSamples("B".to_string())),
            store.samples_for("B")
        );
    }

    #[test]
    fn building_from_list_applies_dedup() {
        let store = MeasurementStore::from_measurements(vec![
            Measurement::new(PixelPoint::new(10, 10), "A", dbm(-50.0)),
            Measurement::new(PixelPoint::new(10, 10), "A", dbm(-65.0)),
            Measurement::new(PixelPoint::new(10, 10), "A", dbm(-42.0)),
        ]);

        assert_eq!(1, store.len());
        assert_eq!(-42.0, stored_dbm(&store, "A"));
    }
}
