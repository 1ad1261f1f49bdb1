//! Shared build context.
//!
//! One build owns one context: the channel it is building for, the
//! channel's time zone (fixed-start anchoring and pad boundaries are
//! wall-clock concepts), and the cancellation token polled at schedule-item
//! boundaries.

use chrono::TimeZone;
use tokio_util::sync::CancellationToken;

use crate::error::BuildError;

/// Context shared by the build loop, the mode schedulers, and the filler
/// composer.
#[derive(Debug, Clone)]
pub struct PlayoutContext<Tz: TimeZone> {
    /// Channel the playout is being built for.
    pub channel: String,
    /// The channel's time zone; local offsets are resolved per target date.
    pub zone: Tz,
    /// The cancellation token.
    pub token: CancellationToken,
}

impl<Tz: TimeZone> PlayoutContext<Tz> {
    pub fn new(channel: impl Into<String>, zone: Tz, token: CancellationToken) -> Self {
        Self {
            channel: channel.into(),
            zone,
            token,
        }
    }

    /// Convert a fired token into the build's cancellation error.
    pub fn ensure_active(&self) -> Result<(), BuildError> {
        if self.token.is_cancelled() {
            Err(BuildError::Canceled)
        } else {
            Ok(())
        }
    }
}
