//! Splitting update lists into upstream requests

use super::types::UpdateRecord;
use crate::config::BatchMode;

/// One upstream PATCH worth of updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch<'a> {
    /// Index of the first record in the original update list
    pub start: usize,

    /// Records to send
    pub records: &'a [UpdateRecord],
}

impl Batch<'_> {
    /// Operation label used in error messages
    pub fn label(&self, mode: BatchMode) -> String {
        match mode {
            BatchMode::Chunked { .. } => format!("Batch {}", self.start),
            BatchMode::Single => "Update".to_string(),
        }
    }
}

/// Plan the upstream requests for `updates`, in submission order.
///
/// An empty update list yields no batches.
pub fn plan(updates: &[UpdateRecord], mode: BatchMode) -> Vec<Batch<'_>> {
    if updates.is_empty() {
        return Vec::new();
    }

    match mode {
        BatchMode::Chunked { size } => {
            let size = size.max(1);
            updates
                .chunks(size)
                .enumerate()
                .map(|(i, records)| Batch {
                    start: i * size,
                    records,
                })
                .collect()
        }
        BatchMode::Single => vec![Batch {
            start: 0,
            records: updates,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn updates(n: usize) -> Vec<UpdateRecord> {
        (0..n)
            .map(|i| UpdateRecord {
                id: format!("rec{i:02}"),
                fields: Map::new(),
            })
            .collect()
    }

    #[test]
    fn test_chunked_plan_sizes() {
        let updates = updates(25);
        let batches = plan(&updates, BatchMode::Chunked { size: 10 });

        let sizes: Vec<usize> = batches.iter().map(|b| b.records.len()).collect();
        assert_eq!(sizes, vec![10, 10, 5]);

        let starts: Vec<usize> = batches.iter().map(|b| b.start).collect();
        assert_eq!(starts, vec![0, 10, 20]);
        assert_eq!(batches[2].records[0].id, "rec20");
    }

    #[test]
    fn test_exact_multiple() {
        let updates = updates(20);
        assert_eq!(plan(&updates, BatchMode::Chunked { size: 10 }).len(), 2);
    }

    #[test]
    fn test_single_plan() {
        let updates = updates(25);
        let batches = plan(&updates, BatchMode::Single);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].records.len(), 25);
        assert_eq!(batches[0].label(BatchMode::Single), "Update");
    }

    #[test]
    fn test_empty_plan() {
        assert!(plan(&[], BatchMode::Chunked { size: 10 }).is_empty());
        assert!(plan(&[], BatchMode::Single).is_empty());
    }

    #[test]
    fn test_labels_use_start_index() {
        let updates = updates(15);
        let mode = BatchMode::Chunked { size: 10 };
        let batches = plan(&updates, mode);
        assert_eq!(batches[1].label(mode), "Batch 10");
    }
}
