use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::backend::mathphysics::{Dbm, PixelPoint, Position};

use super::{Interface, InterfaceStatus, ScanResult, Scanner};


pub const DEFAULT_REFERENCE_DISTANCE: f64 = 10.0;
pub const DEFAULT_POLLS_PER_SCAN: usize   = 2;
pub const MAX_NOISE: Dbm                  = 30.0;


fn default_reference_distance() -> f64 {
    DEFAULT_REFERENCE_DISTANCE
}

fn default_broadcasts() -> usize {
    1
}


// Access point known to the simulated scanner. Distances are in map pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtualAccessPoint {
    ssid: String,
    position: PixelPoint,
    reference_signal: Dbm,
    #[serde(default = "default_reference_distance")]
    reference_distance: f64,
    // Several radios advertising the same SSID show up as separate records
    // in one scan.
    #[serde(default = "default_broadcasts")]
    broadcasts: usize,
}

impl VirtualAccessPoint {
    #[must_use]
    pub fn new(ssid: &str, position: PixelPoint, reference_signal: Dbm) -> Self {
        Self {
            ssid: ssid.to_string(),
            position,
            reference_signal,
            reference_distance: DEFAULT_REFERENCE_DISTANCE,
            broadcasts: default_broadcasts(),
        }
    }

    #[must_use]
    pub fn with_broadcasts(mut self, broadcasts: usize) -> Self {
        self.broadcasts = broadcasts;
        self
    }

    #[must_use]
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    // Signal does not grow when closer than the reference distance.
    #[must_use]
    pub fn signal_at(&self, point: &PixelPoint) -> Dbm {
        let distance = self.pixel_distance_to(point);

        if distance <= self.reference_distance {
            self.reference_signal
        } else {
            self.reference_signal
                + 20.0 * (self.reference_distance / distance).log10()
        }
    }
}

impl Position for VirtualAccessPoint {
    fn position(&self) -> PixelPoint {
        self.position
    }
}


// Stand-in for wireless hardware. Readings depend on the distance between
// the operator and each access point, plus uniform noise.
#[derive(Debug)]
pub struct SimulatedScanner {
    interfaces: Vec<Interface>,
    access_points: Vec<VirtualAccessPoint>,
    location: PixelPoint,
    noise: Dbm,
    polls_per_scan: usize,
    remaining_polls: usize,
    results: Vec<ScanResult>,
    rng: StdRng,
}

impl SimulatedScanner {
    #[must_use]
    pub fn new(
        interface_names: &[&str],
        access_points: Vec<VirtualAccessPoint>
    ) -> Self {
        Self {
            interfaces: interface_names
                .iter()
                .map(|name| Interface::new(name))
                .collect(),
            access_points,
            location: PixelPoint::default(),
            noise: 0.0,
            polls_per_scan: DEFAULT_POLLS_PER_SCAN,
            remaining_polls: 0,
            results: Vec::new(),
            rng: StdRng::seed_from_u64(rand::random()),
        }
    }

    // Noise is clamped to `MAX_NOISE`. A non-finite amplitude disables it.
    #[must_use]
    pub fn with_noise(mut self, noise: Dbm) -> Self {
        self.noise = if noise.is_finite() {
            noise.abs().min(MAX_NOISE)
        } else {
            warn!("Ignoring non-finite scanner noise `{noise}`");
            0.0
        };
        self
    }

    #[must_use]
    pub fn noise(&self) -> Dbm {
        self.noise
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_polls_per_scan(mut self, polls_per_scan: usize) -> Self {
        self.polls_per_scan = polls_per_scan;
        self
    }

    #[must_use]
    pub fn location(&self) -> PixelPoint {
        self.location
    }

    pub fn move_to(&mut self, location: PixelPoint) {
        self.location = location;
    }

    fn knows(&self, interface: &Interface) -> bool {
        self.interfaces.contains(interface)
    }

    fn noisy(&mut self, signal: Dbm) -> Dbm {
        if self.noise == 0.0 {
            return signal;
        }

        signal + self.rng.random_range(-self.noise..=self.noise)
    }

    fn scan(&mut self) -> Vec<ScanResult> {
        let readings: Vec<(String, Dbm, usize)> = self.access_points
            .iter()
            .map(|access_point| (
                access_point.ssid().to_string(),
                access_point.signal_at(&self.location),
                access_point.broadcasts,
            ))
            .collect();

        let mut results = Vec::new();

        for (ssid, signal, broadcasts) in readings {
            for _ in 0..broadcasts {
                let signal = self.noisy(signal);

                results.push(ScanResult::new(&ssid, signal));
            }
        }

        results
    }
}

impl Scanner for SimulatedScanner {
    fn interfaces(&self) -> Vec<Interface> {
        self.interfaces.clone()
    }

    fn status(&mut self, interface: &Interface) -> InterfaceStatus {
        if !self.knows(interface) || self.remaining_polls == 0 {
            return InterfaceStatus::Idle;
        }

        self.remaining_polls -= 1;

        InterfaceStatus::Scanning
    }

    fn trigger_scan(&mut self, interface: &Interface) {
        if !self.knows(interface) {
            return;
        }

        self.results = self.scan();
        self.remaining_polls = self.polls_per_scan;

        debug!(
            "Simulated scan at {} found {} records",
            self.location,
            self.results.len()
        );
    }

    fn scan_results(&mut self, interface: &Interface) -> Vec<ScanResult> {
        if !self.knows(interface) {
            return Vec::new();
        }

        self.results.clone()
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    fn office_access_point() -> VirtualAccessPoint {
        VirtualAccessPoint::new("Office", PixelPoint::new(0, 0), -30.0)
    }


    #[test]
    fn signal_weakens_with_distance() {
        let access_point = office_access_point();

        let next_to = access_point.signal_at(&PixelPoint::new(5, 0));
        let near    = access_point.signal_at(&PixelPoint::new(100, 0));
        let far     = access_point.signal_at(&PixelPoint::new(1_000, 0));

        assert_eq!(-30.0, next_to);
        assert!((near - -50.0).abs() < 1e-9);
        assert!((far - -70.0).abs() < 1e-9);
    }

    #[test]
    fn scan_reports_each_broadcast() {
        let interface = Interface::new("wlan0");
        let mut scanner = SimulatedScanner::new(
            &["wlan0"],
            vec![
                office_access_point().with_broadcasts(2),
                VirtualAccessPoint::new("", PixelPoint::new(50, 0), -40.0),
            ]
        );

        scanner.trigger_scan(&interface);

        let results = scanner.scan_results(&interface);

        assert_eq!(3, results.len());
        assert_eq!(2, results.iter().filter(|r| r.ssid == "Office").count());
        assert!(results.iter().any(|r| r.ssid.is_empty()));
    }

    #[test]
    fn noise_stays_within_bounds() {
        let interface = Interface::new("wlan0");
        let mut scanner = SimulatedScanner::new(
            &["wlan0"],
            vec![office_access_point()]
        )
            .with_noise(3.0)
            .with_seed(7);

        for _ in 0..50 {
            scanner.trigger_scan(&interface);

            for result in scanner.scan_results(&interface) {
                assert!((result.signal - -30.0).abs() <= 3.0);
            }
        }
    }

    #[test]
    fn status_is_scanning_for_configured_polls() {
        let interface = Interface::new("wlan0");
        let mut scanner = SimulatedScanner::new(&["wlan0"], Vec::new())
            .with_polls_per_scan(2);

        assert_eq!(InterfaceStatus::Idle, scanner.status(&interface));

        scanner.trigger_scan(&interface);

        assert_eq!(InterfaceStatus::Scanning, scanner.status(&interface));
        assert_eq!(InterfaceStatus::Scanning, scanner.status(&interface));
        assert_eq!(InterfaceStatus::Idle, scanner.status(&interface));
    }

    #[test]
    fn unknown_interface_sees_nothing() {
        let mut scanner = SimulatedScanner::new(
            &["wlan0"],
            vec![office_access_point()]
        );
        let unknown = Interface::new("wlan9");

        scanner.trigger_scan(&unknown);

        assert!(scanner.scan_results(&unknown).is_empty());
        assert_eq!(InterfaceStatus::Idle, scanner.status(&unknown));
    }

    #[test]
    fn unusable_noise_does_not_break_scans() {
        let interface = Interface::new("wlan0");

        for (noise, expected) in [
            (f64::NAN, 0.0),
            (f64::INFINITY, 0.0),
            (1e308, MAX_NOISE),
            (-4.0, 4.0),
        ] {
            let mut scanner = SimulatedScanner::new(
                &["wlan0"],
                vec![office_access_point()]
            )
                .with_noise(noise)
                .with_seed(3);

            assert_eq!(expected, scanner.noise());

            scanner.trigger_scan(&interface);

            for result in scanner.scan_results(&interface) {
                assert!((result.signal - -30.0).abs() <= expected);
            }
        }
    }
}
