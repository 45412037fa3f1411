/*!
Per-operation performance counters.

Purely observational: the protocol never reads these numbers back.
*/

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Operation kinds tracked by [`PerformanceStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    KeyGeneration,
    Encapsulation,
    Decapsulation,
    Encrypt,
    Decrypt,
    Sign,
    Verify,
    Rekey,
    RatchetHandshake,
    RatchetEncrypt,
    RatchetDecrypt,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Counters for one operation kind
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OperationStats {
    /// Completed calls, successful or not
    pub count: u64,
    /// Calls that returned an error
    pub failures: u64,
    /// Sum of all call durations
    pub total: Duration,
    /// Duration of the most recent call
    pub last: Duration,
    /// Running mean of call durations
    pub average: Duration,
    /// Payload bytes processed, where applicable
    pub bytes: u64,
}

impl OperationStats {
    fn record(&mut self, elapsed: Duration, bytes: usize, ok: bool) {
        self.count += 1;
        if !ok {
            self.failures += 1;
        }
        self.total += elapsed;
        self.last = elapsed;
        self.bytes += bytes as u64;
        // count is at least 1 here
        self.average = self.total / self.count.min(u32::MAX as u64) as u32;
    }
}

/// Counters and averages for every operation kind
#[derive(Debug, Clone, Default)]
pub struct PerformanceStats {
    operations: BTreeMap<OperationKind, OperationStats>,
}

impl PerformanceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call of `kind`
    pub fn record(&mut self, kind: OperationKind, elapsed: Duration, bytes: usize, ok: bool) {
        self.operations.entry(kind).or_default().record(elapsed, bytes, ok);
    }

    /// Time `op` and record it under `kind`, passing its result through
    pub fn measure<T, E>(
        &mut self,
        kind: OperationKind,
        bytes: usize,
        op: impl FnOnce() -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let start = Instant::now();
        let result = op();
        self.record(kind, start.elapsed(), bytes, result.is_ok());
        result
    }

    /// Counters for `kind`, if it was ever recorded
    pub fn get(&self, kind: OperationKind) -> Option<&OperationStats> {
        self.operations.get(&kind)
    }

    /// Number of recorded calls of `kind`
    pub fn count(&self, kind: OperationKind) -> u64 {
        self.get(kind).map_or(0, |stats| stats.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, &OperationStats)> {
        self.operations.iter().map(|(kind, stats)| (*kind, stats))
    }

    pub fn reset(&mut self) {
        self.operations.clear();
    }
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (kind, stats) in self.iter() {
            writeln!(
                f,
                "{:<16} count={:<8} failures={:<6} avg={:?}",
                kind, stats.count, stats.failures, stats.average
            )?;
        }
        Ok(())
    }
}
