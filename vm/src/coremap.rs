//! The coremap: authoritative state of every physical RAM frame.

use alloc::vec;
use alloc::vec::Vec;

use spin::Mutex;

use crate::collab::{AsId, RawRam};
use crate::config::PAGE_SIZE;
use crate::error::{VmError, VmResult};
use crate::memory::addr::PhysAddress;
use crate::memory::page::Frame;
use crate::memory::addr::VirtAddress;

/// State of one physical frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameState {
    /// Kernel-owned, never evictable.
    Fixed,
    /// Handed out once, then released. Eligible for immediate reuse by the
    /// coremap's own scan.
    Free,
    /// Backs a live user virtual page. Evictable.
    Dirty,
    /// Never handed out. Not claimable by the coremap's scan; only
    /// `ram.steal()` can turn a `Clean` frame into an allocation.
    Clean,
}

#[derive(Clone, Copy, Debug)]
struct CoremapEntry {
    state: FrameState,
    owner: Option<AsId>,
    vpn: Option<VirtAddress>,
    /// Number of contiguous frames allocated together with this one as the
    /// head. Zero except on the first frame of a multi-frame run.
    run_len: u32,
}

impl CoremapEntry {
    const fn clean() -> Self {
        CoremapEntry {
            state: FrameState::Clean,
            owner: None,
            vpn: None,
            run_len: 0,
        }
    }
}

struct Metadata {
    entries: Vec<CoremapEntry>,
    /// Index the round-robin eviction cursor will examine next.
    victim_cursor: usize,
    activated: bool,
}

/// Callback the coremap invokes on the head frame of a victim run before
/// reusing it, so the caller (which alone knows about swap, page tables and
/// the TLB) can demote the frame to backing storage. Returning `Err` aborts
/// the allocation.
pub trait EvictionSink {
    fn evict(&mut self, owner: AsId, vpn: VirtAddress, frame: Frame) -> VmResult<()>;
}

/// Physical frame allocator and eviction-victim selector.
pub struct Coremap {
    base: PhysAddress,
    metadata: Mutex<Metadata>,
    stealmem: Mutex<()>,
}

impl Coremap {
    /// Sizes the map to cover all of `ram`'s installed memory and marks
    /// every frame `Clean`. The map is not usable for allocation until
    /// [`Coremap::activate`] is called; before that, callers should fall
    /// back to `ram.steal` directly, matching early boot before the coremap
    /// itself is allocated out of RAM.
    pub fn new(ram: &dyn RawRam, base: PhysAddress) -> Self {
        let frame_count = (ram.size() / PAGE_SIZE.as_raw()) as usize;
        Coremap {
            base,
            metadata: Mutex::new(Metadata {
                entries: vec![CoremapEntry::clean(); frame_count],
                victim_cursor: 0,
                activated: false,
            }),
            stealmem: Mutex::new(()),
        }
    }

    pub fn activate(&self) {
        self.metadata.lock().activated = true;
    }

    pub fn is_activated(&self) -> bool {
        self.metadata.lock().activated
    }

    fn frame_at(&self, index: usize) -> Frame {
        Frame::new(self.base + PAGE_SIZE * (index as u64))
    }

    fn index_of(&self, frame: Frame) -> usize {
        (frame.start().distance_from(self.base).as_raw() / PAGE_SIZE.as_raw()) as usize
    }

    /// Allocates `count` contiguous `Fixed` frames for kernel use. Shortage
    /// is fatal to the caller (kernel allocations are never evictable, so
    /// there is nothing left to try).
    pub fn alloc_kernel(&self, ram: &dyn RawRam, count: u64) -> VmResult<Frame> {
        if let Some(frame) = self.try_alloc_free_run(count, FrameState::Fixed, None, None) {
            return Ok(frame);
        }

        let _guard = self.stealmem.lock();
        let Some(frame) = ram.steal(count) else {
            log::error!("vm: out of memory stealing {count} kernel frame(s)");
            return Err(VmError::OutOfMemory);
        };
        let start = self.index_of(frame);
        let mut meta = self.metadata.lock();
        for i in start..start + count as usize {
            meta.entries[i] = CoremapEntry {
                state: FrameState::Fixed,
                owner: None,
                vpn: None,
                run_len: if i == start { count as u32 } else { 0 },
            };
        }
        Ok(frame)
    }

    pub fn free_kernel(&self, frame: Frame) {
        let start = self.index_of(frame);
        let mut meta = self.metadata.lock();
        let run_len = meta.entries[start].run_len.max(1) as usize;
        for i in start..start + run_len {
            meta.entries[i] = CoremapEntry::clean();
            meta.entries[i].state = FrameState::Free;
        }
    }

    /// Allocates one `Dirty` frame for a user page, evicting a victim
    /// through `sink` if RAM is exhausted.
    pub fn alloc_user(
        &self,
        ram: &dyn RawRam,
        owner: AsId,
        vpn: VirtAddress,
        sink: &mut dyn EvictionSink,
    ) -> VmResult<Frame> {
        if let Some(frame) =
            self.try_alloc_free_run(1, FrameState::Dirty, Some(owner), Some(vpn))
        {
            return Ok(frame);
        }

        {
            let _guard = self.stealmem.lock();
            if let Some(frame) = ram.steal(1) {
                let idx = self.index_of(frame);
                let mut meta = self.metadata.lock();
                meta.entries[idx] = CoremapEntry {
                    state: FrameState::Dirty,
                    owner: Some(owner),
                    vpn: Some(vpn),
                    run_len: 1,
                };
                return Ok(frame);
            }
        }

        self.evict_one(owner, vpn, sink)
    }

    pub fn free_user(&self, frame: Frame) {
        let idx = self.index_of(frame);
        let mut meta = self.metadata.lock();
        debug_assert!(!matches!(meta.entries[idx].state, FrameState::Fixed));
        meta.entries[idx] = CoremapEntry::clean();
        meta.entries[idx].state = FrameState::Free;
    }

    fn try_alloc_free_run(
        &self,
        count: u64,
        new_state: FrameState,
        owner: Option<AsId>,
        vpn: Option<VirtAddress>,
    ) -> Option<Frame> {
        let mut meta = self.metadata.lock();
        let n = meta.entries.len();
        let count = count as usize;
        if count == 0 || count > n {
            return None;
        }
        let mut run_start = None;
        let mut run_len = 0usize;
        for i in 0..n {
            if matches!(meta.entries[i].state, FrameState::Free) {
                if run_len == 0 {
                    run_start = Some(i);
                }
                run_len += 1;
                if run_len == count {
                    break;
                }
            } else {
                run_len = 0;
                run_start = None;
            }
        }
        let start = run_start?;
        if run_len < count {
            return None;
        }
        for i in start..start + count {
            meta.entries[i] = CoremapEntry {
                state: new_state,
                owner: if i == start { owner } else { None },
                vpn: if i == start { vpn } else { None },
                run_len: if i == start { count as u32 } else { 0 },
            };
        }
        Some(self.frame_at(start))
    }

    /// Advances the round-robin cursor to the next evictable frame (state
    /// neither `Fixed` nor `Clean`) and demotes it through `sink`, then
    /// claims it for the new owner.
    fn evict_one(
        &self,
        new_owner: AsId,
        new_vpn: VirtAddress,
        sink: &mut dyn EvictionSink,
    ) -> VmResult<Frame> {
        let (victim_idx, old_owner, old_vpn) = {
            let mut meta = self.metadata.lock();
            let n = meta.entries.len();
            if n == 0 {
                log::error!("vm: coremap has no frames to evict");
                return Err(VmError::OutOfMemory);
            }
            let mut idx = meta.victim_cursor % n;
            let mut scanned = 0;
            loop {
                let candidate = meta.entries[idx];
                if matches!(candidate.state, FrameState::Dirty | FrameState::Free) {
                    break;
                }
                idx = (idx + 1) % n;
                scanned += 1;
                if scanned > n {
                    log::error!("vm: no evictable frame found among {n} frames");
                    return Err(VmError::OutOfMemory);
                }
            }
            meta.victim_cursor = (idx + 1) % n;
            let entry = meta.entries[idx];
            (idx, entry.owner, entry.vpn)
        };

        let victim_frame = self.frame_at(victim_idx);
        if matches!(self.state_of(victim_idx), FrameState::Dirty) {
            if let (Some(owner), Some(vpn)) = (old_owner, old_vpn) {
                sink.evict(owner, vpn, victim_frame)?;
            }
        }

        let mut meta = self.metadata.lock();
        meta.entries[victim_idx] = CoremapEntry {
            state: FrameState::Dirty,
            owner: Some(new_owner),
            vpn: Some(new_vpn),
            run_len: 1,
        };
        Ok(victim_frame)
    }

    fn state_of(&self, idx: usize) -> FrameState {
        self.metadata.lock().entries[idx].state
    }

    /// Number of frames currently `Dirty`, for tests asserting the
    /// frame-accounting invariant against the page table.
    pub fn dirty_count(&self) -> usize {
        self.metadata
            .lock()
            .entries
            .iter()
            .filter(|e| matches!(e.state, FrameState::Dirty))
            .count()
    }

    pub fn frame_count(&self) -> usize {
        self.metadata.lock().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeRam {
        total: u64,
        next: Mutex<u64>,
    }

    impl RawRam for FakeRam {
        fn size(&self) -> u64 {
            self.total
        }

        fn steal(&self, count: u64) -> Option<Frame> {
            let mut next = self.next.lock();
            let need = count * PAGE_SIZE.as_raw();
            if *next + need > self.total {
                return None;
            }
            let frame = Frame::new(PhysAddress::from_raw(*next));
            *next += need;
            Some(frame)
        }
    }

    struct NoopSink;
    impl EvictionSink for NoopSink {
        fn evict(&mut self, _owner: AsId, _vpn: VirtAddress, _frame: Frame) -> VmResult<()> {
            Ok(())
        }
    }

    #[test]
    fn alloc_kernel_marks_run_fixed() {
        let ram = FakeRam {
            total: 16 * PAGE_SIZE.as_raw(),
            next: Mutex::new(0),
        };
        let coremap = Coremap::new(&ram, PhysAddress::zero());
        let frame = coremap.alloc_kernel(&ram, 4).unwrap();
        assert_eq!(frame.start(), PhysAddress::zero());
        assert_eq!(coremap.frame_count(), 16);
    }

    #[test]
    fn free_then_alloc_reuses_frame() {
        let ram = FakeRam {
            total: 4 * PAGE_SIZE.as_raw(),
            next: Mutex::new(0),
        };
        let coremap = Coremap::new(&ram, PhysAddress::zero());
        let frame = coremap.alloc_kernel(&ram, 1).unwrap();
        coremap.free_kernel(frame);
        let frame2 = coremap.alloc_kernel(&ram, 1).unwrap();
        assert_eq!(frame, frame2);
    }

    #[test]
    fn alloc_user_evicts_when_ram_exhausted() {
        let ram = FakeRam {
            total: 1 * PAGE_SIZE.as_raw(),
            next: Mutex::new(0),
        };
        let coremap = Coremap::new(&ram, PhysAddress::zero());
        let mut sink = NoopSink;
        let owner_a = AsId(1);
        let va_a = VirtAddress::from_raw(0x1000);
        let f1 = coremap
            .alloc_user(&ram, owner_a, va_a, &mut sink)
            .unwrap();
        assert_eq!(coremap.dirty_count(), 1);

        let owner_b = AsId(2);
        let va_b = VirtAddress::from_raw(0x2000);
        let f2 = coremap
            .alloc_user(&ram, owner_b, va_b, &mut sink)
            .unwrap();
        assert_eq!(f1, f2);
        assert_eq!(coremap.dirty_count(), 1);
    }
}
