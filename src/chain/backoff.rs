//! Reopen delays for a lost chain connection.

use std::time::Duration;

use rand::Rng;

use crate::config::ReconnectConfig;

/// Delay before reopen attempt `attempt` (1-based): doubles from the base,
/// capped at the max, plus up to 10% jitter.
pub fn reconnect_delay(attempt: u32, policy: &ReconnectConfig) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u64.saturating_pow(attempt - 1);
    let capped = policy
        .base_delay_ms
        .saturating_mul(factor)
        .min(policy.max_delay_ms);

    let jitter = match capped / 10 {
        0 => 0,
        range => rand::thread_rng().gen_range(0..range),
    };

    Duration::from_millis(capped + jitter)
}
