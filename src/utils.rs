//! Small helpers shared by callers of the API.

use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Generates an order identifier unique within this process.
///
/// The service rejects a repeated `order_id` with a conflict, so identifiers
/// combine the current time in milliseconds with a per-process sequence.
///
/// # Examples
///
/// ```
/// use openpay_rs::utils::generate_order_id;
///
/// let first = generate_order_id("oid");
/// let second = generate_order_id("oid");
/// assert!(first.starts_with("oid-"));
/// assert_ne!(first, second);
/// ```
pub fn generate_order_id(prefix: &str) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("{}-{}{:03}", prefix, Utc::now().timestamp_millis(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_order_id_unique() {
        let ids: HashSet<_> = (0..200).map(|_| generate_order_id("oid")).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_generate_order_id_fits_service_limit() {
        let id = generate_order_id("subscription-test");
        assert!(id.len() <= 100);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }
}
