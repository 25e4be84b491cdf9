//! Simulated location source.
//!
//! Produces a slow random walk from a starting coordinate, for exercising
//! the SDK in environments without a positioning device.

use std::time::Duration;

use futures_util::stream;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use waymark_core::{LocationSample, LocationSource, Result, SampleStream};

/// A [`LocationSource`] that wanders from a fixed starting point.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    start: LocationSample,
}

impl SimulatedSource {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            start: LocationSample::new(latitude, longitude),
        }
    }
}

impl LocationSource for SimulatedSource {
    fn stream_samples(&self, interval: Duration) -> Result<SampleStream> {
        let seed = 0x57A7_10C5_u64
            ^ self.start.latitude.to_bits()
            ^ self.start.longitude.to_bits().rotate_left(17);

        let walk = Walk {
            position: self.start,
            rng: SmallRng::seed_from_u64(seed),
        };

        Ok(SampleStream::new(stream::unfold(walk, move |mut walk| {
            async move {
                tokio::time::sleep(interval).await;
                let sample = walk.step();
                Some((Ok(sample), walk))
            }
        })))
    }
}

struct Walk {
    position: LocationSample,
    rng: SmallRng,
}

impl Walk {
    fn step(&mut self) -> LocationSample {
        // Roughly ten meters of drift per step at mid latitudes.
        let dlat = self.rng.gen_range(-0.0001..0.0001);
        let dlon = self.rng.gen_range(-0.0001..0.0001);
        self.position = LocationSample::new(
            self.position.latitude + dlat,
            self.position.longitude + dlon,
        );
        self.position
    }
}
