//! Location providers
//!
//! A terminal has no geolocation capability of its own, so the position comes
//! either from fixed coordinates supplied by the user or from an IP
//! geolocation lookup.

pub mod fixed;
pub mod ip;

pub use fixed::FixedLocation;
pub use ip::IpLocationProvider;
