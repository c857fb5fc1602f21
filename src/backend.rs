pub mod aggregator;
pub mod calibration;
pub mod interpolation;
pub mod mathphysics;
pub mod scanner;
pub mod session;
pub mod signal;
pub mod store;
