use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::backend::mathphysics::Millisecond;

use super::{Interface, InterfaceStatus, ScanError, Scanner};


pub const DEFAULT_POLL_INITIAL_DELAY: Millisecond = 500;
pub const DEFAULT_POLL_MAX_DELAY: Millisecond     = 2_000;
pub const DEFAULT_POLL_BACKOFF: f64               = 1.5;
pub const DEFAULT_SCAN_TIMEOUT: Millisecond       = 10_000;


// Waits for an interface to leave the `Scanning` state. Hardware scans take
// from 2 to 8 seconds, so the delay between polls grows up to `max_delay`
// and the whole wait is bounded by `timeout`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanPoller {
    initial_delay: Millisecond,
    max_delay: Millisecond,
    backoff: f64,
    timeout: Millisecond,
}

impl Default for ScanPoller {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_POLL_INITIAL_DELAY,
            max_delay: DEFAULT_POLL_MAX_DELAY,
            backoff: DEFAULT_POLL_BACKOFF,
            timeout: DEFAULT_SCAN_TIMEOUT,
        }
    }
}

impl ScanPoller {
    #[must_use]
    pub fn new(
        initial_delay: Millisecond,
        max_delay: Millisecond,
        backoff: f64,
        timeout: Millisecond,
    ) -> Self {
        Self {
            initial_delay,
            max_delay: max_delay.max(initial_delay),
            backoff: backoff.max(1.0),
            timeout,
        }
    }

    // Polls back to back, for backends that report completion without
    // touching hardware.
    #[must_use]
    pub const fn immediate(timeout: Millisecond) -> Self {
        Self {
            initial_delay: 0,
            max_delay: 0,
            backoff: 1.0,
            timeout,
        }
    }

    #[must_use]
    pub fn with_timeout(timeout: Millisecond) -> Self {
        Self { timeout, ..Self::default() }
    }

    #[must_use]
    pub fn timeout(&self) -> Millisecond {
        self.timeout
    }

    #[must_use]
    pub fn delays(&self) -> PollDelays {
        PollDelays {
            next: self.initial_delay,
            max: self.max_delay,
            backoff: self.backoff,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if the interface is still scanning when the
    /// timeout elapses.
    pub fn wait_until_idle<S: Scanner + ?Sized>(
        &self,
        scanner: &mut S,
        interface: &Interface,
    ) -> Result<(), ScanError> {
        let start   = Instant::now();
        let timeout = Duration::from_millis(self.timeout);
        let mut delays = self.delays();

        while scanner.status(interface) == InterfaceStatus::Scanning {
            let elapsed = start.elapsed();

            if elapsed >= timeout {
                warn!("Interface {interface} did not finish scanning in time");

                return Err(
                    ScanError::Timeout(interface.clone(), self.timeout)
                );
            }

            let delay = delays
                .next()
                .map_or(Duration::ZERO, Duration::from_millis)
                .min(timeout - elapsed);

            debug!("Interface {interface} is scanning, next poll in {delay:?}");

            thread::sleep(delay);
        }

        Ok(())
    }
}


// Endless sequence of poll delays growing by `backoff` until `max`.
#[derive(Clone, Debug)]
pub struct PollDelays {
    next: Millisecond,
    max: Millisecond,
    backoff: f64,
}

impl Iterator for PollDelays {
    type Item = Millisecond;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        let grown   = (current as f64 * self.backoff).ceil() as Millisecond;

        self.next = grown.min(self.max);

        Some(current)
    }
}


#[cfg(test)]
mod tests {
    use crate::backend::scanner::SimulatedScanner;

    use super::*;


    const NO_DELAY_POLLER: ScanPoller = ScanPoller::immediate(1_000);


    fn busy_scanner(polls_per_scan: usize) -> (SimulatedScanner, Interface) {
        let mut scanner = SimulatedScanner::new(&["wlan0"], Vec::new())
            .with_polls_per_scan(polls_per_scan);
        let interface = Interface::new("wlan0");

        scanner.trigger_scan(&interface);

        (scanner, interface)
    }


    #[test]
    fn delays_grow_until_max() {
        let poller = ScanPoller::new(500, 2_000, 1.5, DEFAULT_SCAN_TIMEOUT);
        let delays: Vec<Millisecond> = poller.delays().take(6).collect();

        assert_eq!(vec![500, 750, 1_125, 1_688, 2_000, 2_000], delays);
    }

    #[test]
    fn backoff_below_one_does_not_shrink_delays() {
        let poller = ScanPoller::new(100, 50, 0.5, DEFAULT_SCAN_TIMEOUT);
        let delays: Vec<Millisecond> = poller.delays().take(3).collect();

        assert_eq!(vec![100, 100, 100], delays);
    }

    #[test]
    fn idle_interface_returns_immediately() {
        let mut scanner = SimulatedScanner::new(&["wlan0"], Vec::new());

        assert_eq!(
            Ok(()),
            NO_DELAY_POLLER.wait_until_idle(
                &mut scanner,
                &Interface::new("wlan0")
            )
        );
    }

    #[test]
    fn waits_for_scan_to_finish() {
        let (mut scanner, interface) = busy_scanner(3);

        assert_eq!(
            Ok(()),
            NO_DELAY_POLLER.wait_until_idle(&mut scanner, &interface)
        );
        assert_eq!(InterfaceStatus::Idle, scanner.status(&interface));
    }

    #[test]
    fn endless_scan_times_out() {
        let (mut scanner, interface) = busy_scanner(usize::MAX);
        let poller = ScanPoller::new(1, 5, 2.0, 20);

        assert_eq!(
            Err(ScanError::Timeout(interface.clone(), 20)),
            poller.wait_until_idle(&mut scanner, &interface)
        );
    }
}
