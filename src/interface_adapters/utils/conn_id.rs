use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::use_cases::ConnId;

/// Hands out connection ids for log correlation. The sequence starts
/// from a clock-derived base each boot, so ids from different runs of
/// the process stay distinguishable, and increments from there so two
/// upgrades in the same instant never share an id.
pub fn next_conn_id() -> ConnId {
    static NEXT: OnceLock<AtomicU64> = OnceLock::new();
    let next = NEXT.get_or_init(|| {
        let boot = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        AtomicU64::new(boot.as_nanos() as u64)
    });
    next.fetch_add(1, Ordering::Relaxed)
}
