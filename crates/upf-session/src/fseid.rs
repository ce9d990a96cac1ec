//! Local F-SEID allocation.
//!
//! Generators only propose candidates. [`crate::PfcpConn::generate_fseid`]
//! discards `0` and identifiers still in use, so a generator may repeat a
//! value once the session holding it is gone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::Rng;
use upf_config::{SeidAllocation, SessionConfig};
use upf_core::Result;
use upf_shared::INVALID_SEID;

/// Source of candidate local session identifiers.
///
/// Must be safe to call from several threads at once.
#[cfg_attr(test, mockall::automock)]
pub trait FseidGenerator: Send + Sync {
    fn generate(&self) -> Result<u64>;
}

/// Monotonic counter over `[start, u64::MAX]`, wrapping back to `start`.
#[derive(Debug)]
pub struct SequentialFseidGenerator {
    start: u64,
    next: AtomicU64,
}

impl SequentialFseidGenerator {
    pub fn new(start: u64) -> Self {
        let start = start.max(1);
        Self {
            start,
            next: AtomicU64::new(start),
        }
    }
}

impl Default for SequentialFseidGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl FseidGenerator for SequentialFseidGenerator {
    fn generate(&self) -> Result<u64> {
        let start = self.start;
        let prev = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(if n == u64::MAX { start } else { n + 1 })
            })
            .unwrap_or_else(|prev| prev);
        Ok(prev)
    }
}

/// Uniformly random non-zero identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomFseidGenerator;

impl FseidGenerator for RandomFseidGenerator {
    fn generate(&self) -> Result<u64> {
        let mut rng = rand::rng();
        loop {
            let seid: u64 = rng.random();
            if seid != INVALID_SEID {
                return Ok(seid);
            }
        }
    }
}

/// Build the generator selected by `config`
pub fn build_generator(config: &SessionConfig) -> Arc<dyn FseidGenerator> {
    match config.seid_allocation {
        SeidAllocation::Sequential => Arc::new(SequentialFseidGenerator::new(config.seid_start)),
        SeidAllocation::Random => Arc::new(RandomFseidGenerator),
    }
}
