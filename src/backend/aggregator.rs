use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use log::{debug, info};

use super::mathphysics::Watt;
use super::scanner::{Interface, ScanError, ScanPoller, Scanner};
use super::signal::{NetworkName, NetworkToStrengthMap, RawReading, SignalStrength};


pub const DEFAULT_SCAN_PASSES: NonZeroUsize = match NonZeroUsize::new(3) {
    Some(passes) => passes,
    None         => NonZeroUsize::MIN,
};


type NetworkToReadingsMap = BTreeMap<NetworkName, Vec<SignalStrength>>;


// Strongest reading of each network within one pass, compared in watts.
fn strongest_in_pass(readings: &[RawReading]) -> BTreeMap<&str, SignalStrength> {
    let mut strongest: BTreeMap<&str, SignalStrength> = BTreeMap::new();

    for reading in readings {
        let signal_strength = reading.signal_strength();

        strongest
            .entry(reading.network_name())
            .and_modify(|current| {
                if signal_strength.watts() > current.watts() {
                    *current = signal_strength;
                }
            })
            .or_insert(signal_strength);
    }

    strongest
}

// Identical readings skip the dBm to watts round trip, which is not exact in
// floating point.
fn power_average(readings: &[SignalStrength]) -> Option<SignalStrength> {
    let first = readings.first()?;

    if readings.iter().all(|reading| reading == first) {
        return Some(*first);
    }

    let total_watts: Watt = readings
        .iter()
        .map(SignalStrength::watts)
        .sum();

    Some(SignalStrength::from_watts(total_watts / readings.len() as f64))
}

// Averages power over every pass in which a network was seen. A network
// missing from a pass gets no value for it instead of a zero.
#[must_use]
pub fn average_passes<P: AsRef<[RawReading]>>(
    passes: &[P]
) -> NetworkToStrengthMap {
    let mut network_readings = NetworkToReadingsMap::new();

    for pass in passes {
        for (network_name, signal_strength) in strongest_in_pass(pass.as_ref()) {
            network_readings
                .entry(network_name.to_string())
                .or_default()
                .push(signal_strength);
        }
    }

    network_readings
        .into_iter()
        .filter_map(|(network_name, readings)| {
            power_average(&readings)
                .map(|average| (network_name, average))
        })
        .collect()
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanAggregator {
    passes: NonZeroUsize,
    poller: ScanPoller,
}

impl Default for ScanAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_PASSES, ScanPoller::default())
    }
}

impl ScanAggregator {
    #[must_use]
    pub fn new(passes: NonZeroUsize, poller: ScanPoller) -> Self {
        Self { passes, poller }
    }

    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes.get()
    }

    #[must_use]
    pub fn poller(&self) -> &ScanPoller {
        &self.poller
    }

    /// # Errors
    ///
    /// Will return `Err` if no interface is selected or the interface does
    /// not finish a scan before the poller times out.
    pub fn aggregate<S: Scanner + ?Sized>(
        &self,
        scanner: &mut S,
        interface: Option<&Interface>,
    ) -> Result<NetworkToStrengthMap, ScanError> {
        let interface = interface.ok_or(ScanError::NoInterface)?;
        let pass_count = self.passes.get();
        let mut passes = Vec::with_capacity(pass_count);

        for pass in 1..=pass_count {
            info!("Scanning... Scan {pass}/{pass_count}");

            passes.push(self.scan_pass(scanner, interface)?);
        }

        self.poller.wait_until_idle(scanner, interface)?;

        let averaged = average_passes(&passes);

        for (network_name, signal_strength) in &averaged {
            debug!(
                "Averaged SSID: {network_name}, \
                Average Signal Strength: {signal_strength}"
            );
        }

        Ok(averaged)
    }

    fn scan_pass<S: Scanner + ?Sized>(
        &self,
        scanner: &mut S,
        interface: &Interface,
    ) -> Result<Vec<RawReading>, ScanError> {
        self.poller.wait_until_idle(scanner, interface)?;
        scanner.trigger_scan(interface);
        self.poller.wait_until_idle(scanner, interface)?;

        let readings = scanner
            .scan_results(interface)
            .iter()
            .map(RawReading::from)
            .collect();

        Ok(readings)
    }
}
