//! The registry clock.
//!
//! Timestamps are persisted at millisecond precision, so every
//! `create_date`, `update_date`, and `since` must be minted at that
//! precision too — otherwise an entity returned from a create would
//! compare unequal to the same entity read back from storage. All
//! non-test code obtains the current time through [`now`].

use chrono::{DateTime, SubsecRound as _, Utc};

/// The current UTC time, truncated to millisecond precision.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(3) }
