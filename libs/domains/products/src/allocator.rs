//! Product id allocation.
//!
//! [`SonyflakeAllocator`] packs a 63-bit id as
//! `elapsed_ticks (39 bits) | sequence (8 bits) | machine_id (16 bits)`,
//! with one tick = 10ms since the epoch. Ids from one allocator are strictly
//! increasing; ids from allocators with distinct machine ids never collide.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

const BITS_TIME: u32 = 39;
const BITS_SEQUENCE: u32 = 8;
const BITS_MACHINE: u32 = 16;
const SEQUENCE_MASK: u16 = (1 << BITS_SEQUENCE) - 1;
const TICK_MS: i64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocatorError {
    #[error("id allocator has not been initialized")]
    Uninitialized,

    #[error("system clock is before the allocator epoch")]
    ClockBeforeEpoch,

    #[error("id allocator time range is exhausted")]
    Exhausted,

    #[error("id allocator state is poisoned")]
    Poisoned,
}

/// Source of unique, monotonically trending product ids.
#[cfg_attr(test, mockall::automock)]
pub trait IdAllocator: Send + Sync {
    /// Must succeed before the first `allocate`. Calling it again is a no-op.
    fn initialize(&self) -> Result<(), AllocatorError>;

    fn allocate(&self) -> Result<u64, AllocatorError>;
}

/// Fields packed into an allocated id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParts {
    pub elapsed_ticks: u64,
    pub sequence: u16,
    pub machine_id: u16,
}

#[derive(Debug)]
struct Clock {
    elapsed_ticks: u64,
    sequence: u16,
}

#[derive(Debug)]
pub struct SonyflakeAllocator {
    machine_id: u16,
    epoch: DateTime<Utc>,
    clock: Mutex<Option<Clock>>,
}

impl SonyflakeAllocator {
    pub fn new(machine_id: u16) -> Self {
        Self::with_epoch(machine_id, default_epoch())
    }

    pub fn with_epoch(machine_id: u16, epoch: DateTime<Utc>) -> Self {
        Self {
            machine_id,
            epoch,
            clock: Mutex::new(None),
        }
    }

    pub fn machine_id(&self) -> u16 {
        self.machine_id
    }

    pub fn decompose(id: u64) -> IdParts {
        IdParts {
            elapsed_ticks: id >> (BITS_SEQUENCE + BITS_MACHINE),
            sequence: ((id >> BITS_MACHINE) & u64::from(SEQUENCE_MASK)) as u16,
            machine_id: (id & 0xFFFF) as u16,
        }
    }

    fn ticks_now(&self) -> Result<u64, AllocatorError> {
        let elapsed_ms = (Utc::now() - self.epoch).num_milliseconds();
        if elapsed_ms < 0 {
            return Err(AllocatorError::ClockBeforeEpoch);
        }
        Ok((elapsed_ms / TICK_MS) as u64)
    }
}

impl IdAllocator for SonyflakeAllocator {
    fn initialize(&self) -> Result<(), AllocatorError> {
        let mut clock = self.clock.lock().map_err(|_| AllocatorError::Poisoned)?;
        if clock.is_some() {
            return Ok(());
        }

        let ticks = self.ticks_now()?;
        *clock = Some(Clock {
            elapsed_ticks: ticks,
            sequence: SEQUENCE_MASK,
        });

        info!(machine_id = self.machine_id, "Id allocator initialized");
        Ok(())
    }

    fn allocate(&self) -> Result<u64, AllocatorError> {
        let mut guard = self.clock.lock().map_err(|_| AllocatorError::Poisoned)?;
        let clock = guard.as_mut().ok_or(AllocatorError::Uninitialized)?;

        let now = self.ticks_now()?;
        if clock.elapsed_ticks < now {
            clock.elapsed_ticks = now;
            clock.sequence = 0;
        } else {
            // Same tick, or the wall clock stepped back: keep counting on the
            // logical clock. A wrapped sequence moves it one tick ahead.
            clock.sequence = (clock.sequence + 1) & SEQUENCE_MASK;
            if clock.sequence == 0 {
                clock.elapsed_ticks += 1;
            }
        }

        if clock.elapsed_ticks >= 1 << BITS_TIME {
            return Err(AllocatorError::Exhausted);
        }

        Ok(clock.elapsed_ticks << (BITS_SEQUENCE + BITS_MACHINE)
            | u64::from(clock.sequence) << BITS_MACHINE
            | u64::from(self.machine_id))
    }
}

/// 2014-09-01T00:00:00Z
pub fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 9, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Machine id used when none is configured: the low 16 bits of the process id.
pub fn default_machine_id() -> u16 {
    (std::process::id() & 0xFFFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ready(machine_id: u16) -> SonyflakeAllocator {
        let allocator = SonyflakeAllocator::new(machine_id);
        allocator.initialize().unwrap();
        allocator
    }

    #[test]
    fn test_allocate_before_initialize_fails() {
        let allocator = SonyflakeAllocator::new(1);
        assert_eq!(allocator.allocate(), Err(AllocatorError::Uninitialized));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let allocator = ready(1);
        let first = allocator.allocate().unwrap();
        allocator.initialize().unwrap();
        assert!(allocator.allocate().unwrap() > first);
    }

    #[test]
    fn test_ids_unique_nonzero_and_increasing() {
        let allocator = ready(7);
        let mut seen = HashSet::new();
        let mut previous = 0;

        // More than one tick's worth of sequence numbers.
        for _ in 0..2_000 {
            let id = allocator.allocate().unwrap();
            assert_ne!(id, 0);
            assert!(id > previous, "{id} should be greater than {previous}");
            assert!(seen.insert(id));
            previous = id;
        }
    }

    #[test]
    fn test_id_layout() {
        let allocator = ready(0xBEEF);
        let id = allocator.allocate().unwrap();
        let parts = SonyflakeAllocator::decompose(id);

        assert_eq!(parts.machine_id, 0xBEEF);
        assert!(parts.elapsed_ticks > 0);
        assert!(id < 1 << 63);
    }

    #[test]
    fn test_distinct_machines_never_collide() {
        let a = ready(1);
        let b = ready(2);
        let ids_a: HashSet<u64> = (0..300).map(|_| a.allocate().unwrap()).collect();
        let ids_b: HashSet<u64> = (0..300).map(|_| b.allocate().unwrap()).collect();
        assert!(ids_a.is_disjoint(&ids_b));
    }

    #[test]
    fn test_future_epoch_rejected() {
        let allocator = SonyflakeAllocator::with_epoch(1, Utc::now() + chrono::Duration::days(1));
        assert_eq!(allocator.initialize(), Err(AllocatorError::ClockBeforeEpoch));
    }

    #[test]
    fn test_time_range_exhausted() {
        let ancient = Utc.with_ymd_and_hms(1700, 1, 1, 0, 0, 0).single().unwrap();
        let allocator = SonyflakeAllocator::with_epoch(1, ancient);
        allocator.initialize().unwrap();
        assert_eq!(allocator.allocate(), Err(AllocatorError::Exhausted));
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let allocator = std::sync::Arc::new(ready(3));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let allocator = allocator.clone();
                std::thread::spawn(move || {
                    (0..500).map(|_| allocator.allocate().unwrap()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 2_000);
    }
}
