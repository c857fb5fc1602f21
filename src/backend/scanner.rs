use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::mathphysics::{Dbm, Millisecond};
use super::signal::RawReading;


pub use poller::*;
pub use simulated::*;


pub mod poller;
pub mod simulated;


#[derive(Debug, Error, PartialEq)]
pub enum ScanError {
    #[error("No wireless interface is selected")]
    NoInterface,
    #[error("Interface `{0}` is still scanning after {1} ms")]
    Timeout(Interface, Millisecond),
}


#[derive(Clone, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[display("{name}")]
pub struct Interface {
    name: String,
}

impl Interface {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}


#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum InterfaceStatus {
    #[default]
    Idle,
    Scanning,
}


// Record as reported by the scanning backend. Hidden networks come with an
// empty SSID.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub ssid: String,
    pub signal: Dbm,
}

impl ScanResult {
    #[must_use]
    pub fn new(ssid: &str, signal: Dbm) -> Self {
        Self { ssid: ssid.to_string(), signal }
    }
}

impl From<&ScanResult> for RawReading {
    fn from(scan_result: &ScanResult) -> Self {
        RawReading::from_dbm(&scan_result.ssid, scan_result.signal)
    }
}


// Wireless scanning backend. Triggering a scan only starts it, results are
// complete once the interface reports `Idle` again.
pub trait Scanner {
    fn interfaces(&self) -> Vec<Interface>;

    fn status(&mut self, interface: &Interface) -> InterfaceStatus;

    fn trigger_scan(&mut self, interface: &Interface);

    fn scan_results(&mut self, interface: &Interface) -> Vec<ScanResult>;

    fn find_interface(&self, name: &str) -> Option<Interface> {
        self.interfaces()
            .into_iter()
            .find(|interface| interface.name() == name)
    }
}
