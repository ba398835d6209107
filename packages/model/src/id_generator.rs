use crc32fast::Hasher;
use std::collections::HashSet;

use crate::node::Kind;

/// Generate a short seed from an arbitrary source string using CRC32
pub fn get_seed(source: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for component nodes.
///
/// A generator never hands out the same id twice, so holding one per
/// editing session keeps deleted ids from being reissued.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(source: &str) -> Self {
        Self {
            seed: get_seed(source),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id, e.g. `section-1a2b3c-4`
    pub fn new_id(&mut self, kind: Kind) -> String {
        self.count += 1;
        format!("{}-{}-{}", kind.as_str().to_lowercase(), self.seed, self.count)
    }

    /// Next id not contained in `taken`.
    pub fn fresh_id(&mut self, kind: Kind, taken: &HashSet<String>) -> String {
        loop {
            let id = self.new_id(kind);
            if !taken.contains(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
