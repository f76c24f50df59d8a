//! Dataset reader for manually created datasets.

use std::fs::File;

use crate::extensions::dataset_reader::{DatasetReader, VmRequest};

/// Reads VM requests from a JSON file holding an array of request objects.
pub struct JsonDatasetReader {
    requests: Vec<VmRequest>,
    current: usize,
}

impl JsonDatasetReader {
    pub fn new() -> Self {
        Self {
            requests: Vec::new(),
            current: 0,
        }
    }

    /// Loads the dataset from a JSON file and orders it by arrival time.
    pub fn parse(&mut self, file_name: &str) {
        let file = File::open(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name));
        self.requests = serde_json::from_reader(file).unwrap_or_else(|e| panic!("Can't parse {}: {}", file_name, e));
        self.requests
            .sort_by(|a, b| a.arrival_time.partial_cmp(&b.arrival_time).unwrap());
        self.current = 0;
    }
}

impl Default for JsonDatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetReader for JsonDatasetReader {
    fn next_request(&mut self) -> Option<VmRequest> {
        if self.current >= self.requests.len() {
            return None;
        }
        self.current += 1;
        Some(self.requests[self.current - 1].clone())
    }
}
