//! Attribute publisher port

use crate::classifier::AirQualityLevel;
use crate::measurement::Channel;

/// Consumer of reported values
///
/// Publishing is fire-and-forget from the pipeline's point of view: an
/// implementation that can fail logs and drops the update itself.
pub trait Publisher {
    /// Publish the value of one channel
    fn update_channel(&mut self, channel: Channel, value: f32);

    /// Publish the overall air quality level
    fn update_level(&mut self, level: AirQualityLevel);
}

impl<P: Publisher + ?Sized> Publisher for &mut P {
    fn update_channel(&mut self, channel: Channel, value: f32) {
        (**self).update_channel(channel, value)
    }

    fn update_level(&mut self, level: AirQualityLevel) {
        (**self).update_level(level)
    }
}
