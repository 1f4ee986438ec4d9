//! TLB refill and flush policy layered over the [`TlbPort`] hardware trait.

use crate::collab::{pack_tlb_hi, pack_tlb_lo, TlbPort, TLB_LO_VALID};
use crate::memory::addr::{PhysAddress, VirtAddress};
use crate::stats::{Counter, Statistics};

/// Round-robin TLB refill, mirroring the fixed-size replacement policy of a
/// software-refilled TLB with no hardware LRU bits.
pub struct TlbRefill {
    next_victim: usize,
}

impl TlbRefill {
    pub fn new() -> Self {
        TlbRefill { next_victim: 0 }
    }

    /// Installs `(va -> frame)` with the dirty bit set iff `writable`.
    /// Prefers an invalid slot; otherwise evicts the round-robin victim.
    pub fn install(
        &mut self,
        tlb: &mut dyn TlbPort,
        va: VirtAddress,
        frame: PhysAddress,
        writable: bool,
        stats: &Statistics,
    ) {
        let hi = pack_tlb_hi(va);
        let lo = pack_tlb_lo(frame, writable, true);

        let n = tlb.entry_count();
        for i in 0..n {
            let (_, existing_lo) = tlb.read(i);
            if existing_lo & TLB_LO_VALID == 0 {
                tlb.write(i, hi, lo);
                stats.increment(Counter::TlbFaultFree);
                return;
            }
        }

        let victim = self.next_victim % n;
        self.next_victim = (victim + 1) % n;
        tlb.write(victim, hi, lo);
        stats.increment(Counter::TlbFaultReplace);
    }

    /// Removes the single entry mapping `va`, if present. Called when the
    /// coremap evicts the frame backing that page.
    pub fn remove_by_va(&self, tlb: &mut dyn TlbPort, va: VirtAddress) {
        remove_by_va(tlb, va);
    }

    /// Invalidates every entry and logs the transition. Called on address
    /// space activation and deactivation.
    pub fn flush_all(&mut self, tlb: &mut dyn TlbPort, stats: &Statistics) {
        tlb.invalidate_all();
        stats.increment(Counter::TlbInvalidate);
    }
}

impl Default for TlbRefill {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes the single entry mapping `va`, if present. A free function
/// rather than a method since it touches no refill-cursor state, so
/// callers that only have a TLB handle (not a [`TlbRefill`]) can use it
/// directly.
pub fn remove_by_va(tlb: &mut dyn TlbPort, va: VirtAddress) {
    tlb.invalidate(pack_tlb_hi(va));
}
