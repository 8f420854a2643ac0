//! Request context carrying the acting user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context for the current, already authorized, request.
///
/// Passed into mutating service methods so that every operation knows
/// *who* is acting, for creator defaults and log fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's id.
    pub user_id: i64,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            request_time: Utc::now(),
        }
    }
}
