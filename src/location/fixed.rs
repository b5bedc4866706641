//! Coordinates supplied up front by the user

use crate::{
    error::FinderResult,
    types::{Coordinates, LocationProvider},
};

/// Always reports the same coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Coordinates,
}

impl FixedLocation {
    /// Create a provider from validated latitude and longitude
    pub fn new(latitude: f64, longitude: f64) -> FinderResult<Self> {
        Ok(Self {
            coordinates: Coordinates::new(latitude, longitude)?,
        })
    }
}

impl From<Coordinates> for FixedLocation {
    fn from(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait::async_trait]
impl LocationProvider for FixedLocation {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn current_location(&self) -> FinderResult<Coordinates> {
        Ok(self.coordinates)
    }
}
