use std::fmt::Display;

use crate::net::Message;
use crate::time::Duration;

///
/// A transmission rate in bits per second.
///
/// The typed counterpart of link descriptions like "5Mbps": channel
/// parameters are constructed, not parsed.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataRate(u64);

impl DataRate {
    /// A data rate in bits per second.
    #[must_use]
    pub const fn from_bps(bits_per_sec: u64) -> Self {
        Self(bits_per_sec)
    }

    /// A data rate in kilobits (1000 bit) per second.
    #[must_use]
    pub const fn from_kbps(kbits_per_sec: u64) -> Self {
        Self(kbits_per_sec * 1_000)
    }

    /// A data rate in megabits per second.
    #[must_use]
    pub const fn from_mbps(mbits_per_sec: u64) -> Self {
        Self(mbits_per_sec * 1_000_000)
    }

    /// The raw rate in bits per second.
    #[must_use]
    pub const fn bits_per_sec(self) -> u64 {
        self.0
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 >= 1_000_000 && self.0 % 1_000_000 == 0 {
            write!(f, "{}Mbit/s", self.0 / 1_000_000)
        } else if self.0 >= 1_000 && self.0 % 1_000 == 0 {
            write!(f, "{}kbit/s", self.0 / 1_000)
        } else {
            write!(f, "{}bit/s", self.0)
        }
    }
}

///
/// Metrics that define a channel's capabilities.
///
/// Installed once per channel and immutable afterwards. Loss, jitter and
/// queueing are not modelled here; a richer link type would replace the
/// transit computation.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMetrics {
    /// The maximum throughput of the channel.
    pub data_rate: DataRate,
    /// The propagation latency a message endures while traversing the channel.
    pub delay: Duration,
}

impl ChannelMetrics {
    ///
    /// Creates a new instance of channel metrics.
    ///
    #[must_use]
    pub const fn new(data_rate: DataRate, delay: Duration) -> Self {
        Self { data_rate, delay }
    }

    ///
    /// The time needed to put `byte_len` bytes onto the medium.
    /// A zero data rate contributes no serialization delay.
    ///
    #[must_use]
    pub fn serialization_delay(&self, byte_len: usize) -> Duration {
        let rate = self.data_rate.bits_per_sec();
        if rate == 0 {
            return Duration::ZERO;
        }

        let bits = (byte_len * 8) as f64;
        Duration::from_secs_f64(bits / rate as f64)
    }

    ///
    /// Calculates the duration a message travels on a link: propagation
    /// delay plus serialization delay.
    ///
    #[must_use]
    pub fn transit_duration(&self, msg: &Message) -> Duration {
        self.delay + self.serialization_delay(msg.byte_len())
    }
}

impl Display for ChannelMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {:?} delay", self.data_rate, self.delay)
    }
}
