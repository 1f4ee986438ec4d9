//! The ten fault/IO counters, and the consistency laws checked on every read.

use spin::Mutex;

/// Ordinal of each counter. Kept as an enum (rather than a raw index, as the
/// source this is modeled on used) so a call site cannot increment an
/// out-of-range slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, num_derive::FromPrimitive)]
pub enum Counter {
    TlbFault = 0,
    TlbFaultFree,
    TlbFaultReplace,
    TlbInvalidate,
    TlbReload,
    PageFaultZero,
    PageFaultDisk,
    ElfFileRead,
    SwapFileRead,
    SwapFileWrite,
}

const COUNT: usize = 10;

struct Counters {
    values: [u64; COUNT],
}

/// The ten named counters, guarded by a single lock.
pub struct Statistics {
    inner: Mutex<Counters>,
}

impl Statistics {
    pub const fn new() -> Self {
        Statistics {
            inner: Mutex::new(Counters { values: [0; COUNT] }),
        }
    }

    pub fn increment(&self, counter: Counter) {
        let mut inner = self.inner.lock();
        inner.values[counter as usize] += 1;
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.inner.lock().values[counter as usize]
    }

    /// Checks the cross-counter laws that must hold after every observation,
    /// not only at shutdown. Returns `Err` naming the first law that fails.
    pub fn check_consistency(&self) -> Result<(), &'static str> {
        let v = self.inner.lock();
        let g = |c: Counter| v.values[c as usize];

        if g(Counter::TlbFault) != g(Counter::TlbFaultFree) + g(Counter::TlbFaultReplace) {
            return Err("TLB_FAULT != TLB_FAULT_FREE + TLB_FAULT_REPLACE");
        }
        if g(Counter::TlbFault)
            != g(Counter::TlbReload) + g(Counter::PageFaultZero) + g(Counter::PageFaultDisk)
        {
            return Err("TLB_FAULT != TLB_RELOAD + PAGE_FAULT_ZERO + PAGE_FAULT_DISK");
        }
        if g(Counter::PageFaultDisk) != g(Counter::ElfFileRead) + g(Counter::SwapFileRead) {
            return Err("PAGE_FAULT_DISK != ELF_FILE_READ + SWAP_FILE_READ");
        }
        Ok(())
    }

    /// Logs every counter at `info!`, mirroring the original summary printer.
    pub fn print_all(&self) {
        let v = self.inner.lock();
        log::info!("vm statistics:");
        for (i, value) in v.values.iter().enumerate() {
            log::info!("  [{}] = {}", i, value);
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}
