//! Time and id sources used by the store.

use keel_types::Timestamp;
use uuid::Uuid;

/// Produces sortable ISO-8601 timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Produces collision-resistant hex tokens.
pub trait IdSource: Send + Sync {
    /// `len` lowercase hex characters.
    fn hex(&self, len: usize) -> String;
}

/// Hex taken from random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn hex(&self, len: usize) -> String {
        let mut out = String::with_capacity(len);
        while out.len() < len {
            let simple = Uuid::new_v4().simple().to_string();
            let take = (len - out.len()).min(simple.len());
            out.push_str(&simple[..take]);
        }
        out
    }
}
