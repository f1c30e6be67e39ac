//! Staggered submission of geocoding requests.
//!
//! Entry `i` is submitted `i × delay_unit` after scheduling time. The delay is
//! a pure function of position, independent of how earlier requests fared,
//! and nothing is retried. Every spawned task yields exactly one
//! [`TaggedResult`], including when the geocoder panics.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use brokermap_core::{AddressEntry, FailureKind, GeocodeOutcome, GeocodeResult};
use brokermap_geocoder::Geocoder;
use futures::FutureExt;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::state::{SessionId, TaggedResult};

/// Nominatim's public usage policy allows one request per second; two keeps
/// a comfortable margin.
pub const DEFAULT_DELAY_UNIT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    pub delay_unit: Duration,
}

impl ThrottlePolicy {
    #[must_use]
    pub const fn new(delay_unit: Duration) -> Self {
        Self { delay_unit }
    }

    /// Offset from scheduling time at which entry `ordinal` is submitted.
    #[must_use]
    pub fn delay_for(&self, ordinal: usize) -> Duration {
        let factor = u32::try_from(ordinal).unwrap_or(u32::MAX);
        self.delay_unit.saturating_mul(factor)
    }
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_UNIT)
    }
}

/// Spawns one delayed lookup per entry onto a fresh [`JoinSet`].
///
/// Dropping the returned set (or calling `abort_all`) cancels lookups that
/// have not finished, including ones still waiting for their slot.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_requests<G: Geocoder>(
    geocoder: &Arc<G>,
    session: SessionId,
    entries: &[AddressEntry],
    policy: ThrottlePolicy,
) -> JoinSet<TaggedResult> {
    let scheduled_at = Instant::now();
    let mut tasks = JoinSet::new();

    for (ordinal, entry) in entries.iter().enumerate() {
        let geocoder = Arc::clone(geocoder);
        let entry = entry.clone();
        let delay = policy.delay_for(ordinal);

        tracing::debug!(
            %session,
            ordinal,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            address = %entry.address,
            "geocoding request scheduled"
        );

        let submit_at = scheduled_at.checked_add(delay);

        tasks.spawn(async move {
            match submit_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => tokio::time::sleep(delay).await,
            }

            // The call itself sits inside the guard so a panic while building
            // the lookup future is caught too.
            let outcome = AssertUnwindSafe(async { geocoder.geocode(&entry.address).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    tracing::error!(%session, ordinal, address = %entry.address, "geocoder panicked");
                    GeocodeOutcome::failed(FailureKind::Panicked, "geocoder panicked")
                });

            TaggedResult {
                session,
                result: GeocodeResult {
                    ordinal,
                    query: entry,
                    outcome,
                },
            }
        });
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_is_position_times_unit() {
        let policy = ThrottlePolicy::new(Duration::from_millis(1500));
        assert_eq!(policy.delay_for(0), Duration::ZERO);
        assert_eq!(policy.delay_for(1), Duration::from_millis(1500));
        assert_eq!(policy.delay_for(4), Duration::from_millis(6000));
    }

    #[test]
    fn default_unit_is_two_seconds() {
        assert_eq!(
            ThrottlePolicy::default().delay_for(3),
            Duration::from_secs(6)
        );
    }

    #[test]
    fn huge_ordinal_saturates() {
        let policy = ThrottlePolicy::new(Duration::from_secs(u64::MAX / 2));
        assert_eq!(policy.delay_for(usize::MAX), Duration::MAX);
    }
}
