#![allow(dead_code)]

pub mod mock_dispatcher;
pub mod test_metrics;

use tower_notify::core::{Container, ScanReport};

/// Builds containers with generated ids, in the given order.
pub fn containers(names: &[&str]) -> Vec<Container> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| Container::new(&format!("sha256:{:04}", i), name))
        .collect()
}

/// A report with Scanned=[A,B,C], Updated=[A], Stale=[B], Fresh=[C].
pub fn sample_report() -> ScanReport {
    ScanReport {
        scanned: containers(&["A", "B", "C"]),
        updated: containers(&["A"]),
        stale: containers(&["B"]),
        fresh: containers(&["C"]),
        ..Default::default()
    }
}
