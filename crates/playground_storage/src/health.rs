//! Storage usage accounting and proactive "almost full" warnings.

use leptos::logging;
use playground_host::{KeyValueStore, NotificationBus};

/// Approximate per-origin `localStorage` capacity in bytes.
pub const DEFAULT_STORAGE_LIMIT_BYTES: usize = 5 * 1024 * 1024;
/// Usage percentage above which a warning is published.
pub const DEFAULT_WARNING_THRESHOLD_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Snapshot of store usage.
pub struct StorageUsage {
    /// Bytes held by keys and values.
    pub used: usize,
    /// Assumed capacity in bytes.
    pub limit: usize,
    /// `used / limit * 100`.
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Computes store usage and warns when it crosses a threshold.
pub struct HealthMonitor {
    limit_bytes: usize,
    threshold_percent: f64,
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_LIMIT_BYTES)
    }
}

impl HealthMonitor {
    /// Creates a monitor assuming `limit_bytes` of capacity and the default threshold.
    pub fn new(limit_bytes: usize) -> Self {
        Self {
            limit_bytes,
            threshold_percent: DEFAULT_WARNING_THRESHOLD_PERCENT,
        }
    }

    /// Overrides the warning threshold percentage.
    #[must_use]
    pub fn with_threshold(mut self, threshold_percent: f64) -> Self {
        self.threshold_percent = threshold_percent;
        self
    }

    /// Assumed capacity in bytes.
    pub fn limit_bytes(&self) -> usize {
        self.limit_bytes
    }

    /// Sums the byte length of every key and value in `store`.
    ///
    /// A store that cannot be enumerated reports zero usage.
    pub fn usage<S: KeyValueStore + ?Sized>(&self, store: &S) -> StorageUsage {
        let used = match store.entries() {
            Ok(entries) => entries.iter().map(|(k, v)| k.len() + v.len()).sum(),
            Err(err) => {
                logging::warn!("storage usage scan failed: {err}");
                0
            }
        };
        let percentage = if self.limit_bytes == 0 {
            0.0
        } else {
            used as f64 * 100.0 / self.limit_bytes as f64
        };
        StorageUsage {
            used,
            limit: self.limit_bytes,
            percentage,
        }
    }

    /// Publishes a warning on `bus` when usage is above the threshold.
    ///
    /// Returns the usage snapshot when a warning was published. Every call above the threshold
    /// warns again.
    pub fn check_health<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        bus: &NotificationBus,
    ) -> Option<StorageUsage> {
        let usage = self.usage(store);
        if usage.percentage <= self.threshold_percent {
            return None;
        }
        let message = format!(
            "Storage is {}% full. Consider exporting your data.",
            usage.percentage.round() as u64
        );
        logging::warn!("{message}");
        bus.publish(&message);
        Some(usage)
    }
}

/// Formats a byte count for display, for example `1.5 KB`.
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use playground_host::MemoryKeyValueStore;

    use super::*;

    fn recorded(bus: &NotificationBus) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |message| sink.borrow_mut().push(message.to_string()));
        seen
    }

    #[test]
    fn usage_sums_keys_and_values() {
        let store = MemoryKeyValueStore::default();
        store.set_item("ab", "1234").expect("save");
        store.set_item("c", "56").expect("save");

        let usage = HealthMonitor::new(100).usage(&store);
        assert_eq!(usage.used, 9);
        assert_eq!(usage.limit, 100);
        assert!((usage.percentage - 9.0).abs() < 1e-9);
    }

    #[test]
    fn eighty_five_percent_publishes_one_warning() {
        let store = MemoryKeyValueStore::default();
        store.set_item("k", &"x".repeat(849)).expect("save");
        let bus = NotificationBus::default();
        let seen = recorded(&bus);

        let usage = HealthMonitor::new(1000)
            .check_health(&store, &bus)
            .expect("warning expected");

        assert_eq!(usage.used, 850);
        assert_eq!(seen.borrow().len(), 1);
        assert!(seen.borrow()[0].contains("85"), "{:?}", seen.borrow());
    }

    #[test]
    fn at_threshold_does_not_warn() {
        let store = MemoryKeyValueStore::default();
        store.set_item("k", &"x".repeat(799)).expect("save");
        let bus = NotificationBus::default();
        let seen = recorded(&bus);

        assert!(HealthMonitor::new(1000).check_health(&store, &bus).is_none());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn repeated_checks_repeat_the_warning() {
        let store = MemoryKeyValueStore::default();
        store.set_item("k", &"x".repeat(950)).expect("save");
        let bus = NotificationBus::default();
        let seen = recorded(&bus);
        let monitor = HealthMonitor::new(1000);

        monitor.check_health(&store, &bus);
        monitor.check_health(&store, &bus);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn custom_threshold_is_respected() {
        let store = MemoryKeyValueStore::default();
        store.set_item("k", &"x".repeat(599)).expect("save");
        let bus = NotificationBus::default();

        let monitor = HealthMonitor::new(1000).with_threshold(50.0);
        assert!(monitor.check_health(&store, &bus).is_some());
    }

    #[test]
    fn format_bytes_picks_units() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_bytes(1_234_567), "1.18 MB");
    }
}
