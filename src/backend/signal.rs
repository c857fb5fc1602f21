use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::mathphysics::Dbm;


pub use strength::*;


pub mod strength;


pub const HIDDEN_SSID: &str = "<Hidden SSID>";


pub type NetworkName          = String;
pub type NetworkToStrengthMap = BTreeMap<NetworkName, SignalStrength>;


// One (network, strength) pair of a single scan pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    network_name: NetworkName,
    signal_strength: SignalStrength,
}

impl RawReading {
    #[must_use]
    pub fn new(network_name: &str, signal_strength: SignalStrength) -> Self {
        let network_name = if network_name.is_empty() {
            HIDDEN_SSID
        } else {
            network_name
        };

        Self {
            network_name: network_name.to_string(),
            signal_strength,
        }
    }

    #[must_use]
    pub fn from_dbm(network_name: &str, dbm: Dbm) -> Self {
        Self::new(network_name, SignalStrength::new(dbm))
    }

    #[must_use]
    pub fn network_name(&self) -> &str {
        &self.network_name
    }

    #[must_use]
    pub fn signal_strength(&self) -> SignalStrength {
        self.signal_strength
    }
}
