//! The VM singleton: coremap, swap area and statistics bundled behind one
//! explicit `bootstrap`, instead of the ambient globals the source this was
//! modeled on used. Passed explicitly to every operation so tests can run
//! several independent instances in one process.

use alloc::sync::Arc;

use spin::Mutex;

use crate::collab::{AddressSpaceDirectory, AsId, BackingStore, PhysMemory, Process, RawRam, TlbPort};
use crate::coremap::{Coremap, EvictionSink};
use crate::error::{VmError, VmResult};
use crate::fault::FaultKind;
use crate::memory::addr::{PhysAddress, VirtAddress};
use crate::memory::page::{Frame, Page};
use crate::pt::Translation;
use crate::segment::Segment;
use crate::stats::{Counter, Statistics};
use crate::swap::SwapArea;
use crate::tlb::TlbRefill;
use crate::addrspace::AddressSpace;

/// Bundles the process-wide VM state: the coremap, the swap area, the
/// statistics counters, and the TLB round-robin cursor. The coremap is held
/// behind an `Arc` so every `AddressSpace` can carry a handle to it and
/// return its own resident frames on drop.
pub struct VmSystem {
    coremap: Arc<Coremap>,
    swap: SwapArea,
    stats: Statistics,
    tlb_refill: Mutex<TlbRefill>,
}

impl VmSystem {
    /// Sizes the coremap to `ram`'s installed memory and opens the swap
    /// file at `swap_path`. Returns `None` if the swap file cannot be
    /// opened, mirroring the original's boot-time failure path.
    pub fn bootstrap(ram: &dyn RawRam, store: &dyn BackingStore, swap_path: &str) -> Option<Self> {
        let coremap = Coremap::new(ram, PhysAddress::zero());
        let swap = SwapArea::init(store, swap_path)?;
        coremap.activate();
        Some(VmSystem {
            coremap: Arc::new(coremap),
            swap,
            stats: Statistics::new(),
            tlb_refill: Mutex::new(TlbRefill::new()),
        })
    }

    /// Prints the final statistics snapshot. Consumes `self` since nothing
    /// may use the VM system after shutdown.
    pub fn shutdown(self) {
        self.stats.print_all();
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// A handle to the coremap backing this VM system, for binding to new
    /// address spaces via [`AddressSpace::bind_reclaimer`] so they can
    /// return their resident frames when destroyed.
    pub fn coremap_handle(&self) -> Arc<Coremap> {
        self.coremap.clone()
    }

    /// Flushes the TLB on a context switch into `asp`.
    pub fn activate(&self, tlb: &mut dyn TlbPort) {
        self.tlb_refill.lock().flush_all(tlb, &self.stats);
    }

    /// Flushes the TLB on a context switch away from the current address
    /// space.
    pub fn deactivate(&self, tlb: &mut dyn TlbPort) {
        self.tlb_refill.lock().flush_all(tlb, &self.stats);
    }

    /// The orchestrator: turns one fault into either an installed TLB entry
    /// or a typed error the caller maps to an errno.
    #[allow(clippy::too_many_arguments)]
    pub fn fault(
        &self,
        kind: FaultKind,
        va: VirtAddress,
        current: &mut AddressSpace,
        process: &dyn Process,
        ram: &dyn RawRam,
        mem: &dyn PhysMemory,
        directory: &dyn AddressSpaceDirectory,
        tlb: &mut dyn TlbPort,
    ) -> VmResult<()> {
        if matches!(kind, FaultKind::ReadOnly) {
            return VmError::AccessViolation.log_return();
        }

        if process.current_as_id().is_none() {
            return VmError::AddressingError.log_return();
        }

        let Some(segment) = current.get_segment(va).cloned() else {
            return VmError::AddressingError.log_return();
        };
        let permissions = segment.permissions();

        if matches!(kind, FaultKind::Write) && !permissions.writable() {
            return VmError::AccessViolation.log_return();
        }

        let page = Page::containing(va).start();
        self.stats.increment(Counter::TlbFault);

        let translation = current.page_table().translate(page);
        let frame = match translation {
            Translation::Resident(frame) => {
                self.stats.increment(Counter::TlbReload);
                frame
            }
            Translation::Swapped(offset) => {
                let frame =
                    self.allocate_for_or_halt(ram, mem, current.id, page, directory, tlb, process)?;
                let bytes = unsafe { mem.frame_bytes_mut(Frame::containing(frame)) };
                self.swap.swap_in(offset, bytes, &self.stats)?;
                current.page_table_mut().set_frame(page, frame);
                self.stats.increment(Counter::PageFaultDisk);
                frame
            }
            Translation::Unreferenced => {
                let frame =
                    self.allocate_for_or_halt(ram, mem, current.id, page, directory, tlb, process)?;
                let bytes = unsafe { mem.frame_bytes_mut(Frame::containing(frame)) };
                match &segment {
                    Segment::Stack { .. } => {
                        bytes.fill(0);
                        self.stats.increment(Counter::PageFaultZero);
                    }
                    Segment::Code(_) | Segment::Data(_) => {
                        segment.load_page(page, bytes)?;
                        self.stats.increment(Counter::PageFaultDisk);
                        self.stats.increment(Counter::ElfFileRead);
                    }
                }
                current.page_table_mut().set_frame(page, frame);
                frame
            }
        };

        self.tlb_refill
            .lock()
            .install(tlb, page, frame, permissions.writable(), &self.stats);
        Ok(())
    }

    fn allocate_for(
        &self,
        ram: &dyn RawRam,
        mem: &dyn PhysMemory,
        owner: AsId,
        vpn: VirtAddress,
        directory: &dyn AddressSpaceDirectory,
        tlb: &mut dyn TlbPort,
    ) -> VmResult<PhysAddress> {
        let mut sink = DirectorySink {
            directory,
            mem,
            swap: &self.swap,
            stats: &self.stats,
            tlb,
        };
        let frame = self.coremap.alloc_user(ram, owner, vpn, &mut sink)?;
        Ok(frame.start())
    }

    /// As [`VmSystem::allocate_for`], but treats exhaustion as unrecoverable:
    /// physical memory and swap together are the system's only backing
    /// storage, so running out of both means no further forward progress is
    /// possible. A short I/O transfer is still returned as a plain error,
    /// since that reflects a backing-store failure rather than exhaustion.
    #[allow(clippy::too_many_arguments)]
    fn allocate_for_or_halt(
        &self,
        ram: &dyn RawRam,
        mem: &dyn PhysMemory,
        owner: AsId,
        vpn: VirtAddress,
        directory: &dyn AddressSpaceDirectory,
        tlb: &mut dyn TlbPort,
        process: &dyn Process,
    ) -> VmResult<PhysAddress> {
        match self.allocate_for(ram, mem, owner, vpn, directory, tlb) {
            Err(VmError::OutOfMemory) => {
                VmError::OutOfMemory.fatal(process, "physical memory and swap exhausted")
            }
            other => other,
        }
    }
}

/// Adapts physical-memory access, the swap area, the address-space
/// directory and the TLB into the coremap's [`EvictionSink`] contract: on
/// eviction, read the victim frame's bytes out to swap, point the owning
/// address space's page table at the new swap offset, and drop the stale
/// TLB entry.
struct DirectorySink<'a> {
    directory: &'a dyn AddressSpaceDirectory,
    mem: &'a dyn PhysMemory,
    swap: &'a SwapArea,
    stats: &'a Statistics,
    tlb: &'a mut dyn TlbPort,
}

impl EvictionSink for DirectorySink<'_> {
    fn evict(&mut self, owner: AsId, vpn: VirtAddress, frame: Frame) -> VmResult<()> {
        // Safety: the coremap has already relinquished this frame from its
        // old owner and not yet handed it to a new one, so no other
        // reference to its bytes is alive.
        let bytes = unsafe { self.mem.frame_bytes_mut(frame) };
        let offset = self.swap.swap_out(owner, vpn, bytes, self.stats)?;

        self.directory.with_address_space_mut(owner, &mut |asp| {
            asp.page_table_mut().set_swap(vpn, offset);
        });

        crate::tlb::remove_by_va(self.tlb, vpn);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{RefCell, UnsafeCell};
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::{Arc, Mutex};

    use test_log::test;

    use crate::addrspace::{AddressSpace, RegionKind};
    use crate::collab::{BackingStore, IoResult, Vnode, TLB_INVALID_HI, TLB_INVALID_LO};
    use crate::config::{Permissions, FILE_SIZE, NUM_TLB, PAGE_SIZE};
    use crate::fault::FaultKind;
    use crate::memory::addr::{Length, VirtAddress};
    use crate::pt::Translation;

    struct FakeRam {
        bytes: UnsafeCell<Vec<u8>>,
        next_free: Mutex<u64>,
    }

    unsafe impl Sync for FakeRam {}

    impl FakeRam {
        fn new(size: u64) -> Self {
            FakeRam {
                bytes: UnsafeCell::new(vec![0u8; size as usize]),
                next_free: Mutex::new(0),
            }
        }
    }

    impl RawRam for FakeRam {
        fn size(&self) -> u64 {
            unsafe { &*self.bytes.get() }.len() as u64
        }

        fn steal(&self, count: u64) -> Option<Frame> {
            let mut next = self.next_free.lock().unwrap();
            let need = count * PAGE_SIZE.as_raw();
            if *next + need > self.size() {
                return None;
            }
            let frame = Frame::new(PhysAddress::from_raw(*next));
            *next += need;
            Some(frame)
        }
    }

    impl PhysMemory for FakeRam {
        unsafe fn frame_bytes_mut(&self, frame: Frame) -> &mut [u8] {
            let start = frame.start().as_raw() as usize;
            let bytes = unsafe { &mut *self.bytes.get() };
            &mut bytes[start..start + PAGE_SIZE.as_raw() as usize]
        }
    }

    struct MemFile {
        bytes: Mutex<Vec<u8>>,
    }

    impl Vnode for MemFile {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult {
            let bytes = self.bytes.lock().unwrap();
            let start = offset as usize;
            if start + buf.len() > bytes.len() {
                return Err(());
            }
            buf.copy_from_slice(&bytes[start..start + buf.len()]);
            Ok(buf.len())
        }

        fn write_at(&self, offset: u64, buf: &[u8]) -> IoResult {
            let mut bytes = self.bytes.lock().unwrap();
            let start = offset as usize;
            if start + buf.len() > bytes.len() {
                bytes.resize(start + buf.len(), 0);
            }
            bytes[start..start + buf.len()].copy_from_slice(buf);
            Ok(buf.len())
        }
    }

    struct FakeStore {
        swap: Arc<MemFile>,
    }

    impl BackingStore for FakeStore {
        fn open(&self, path: &str) -> Option<Box<dyn Vnode>> {
            if path == "swapfile" {
                Some(Box::new(SharedHandle(self.swap.clone())))
            } else {
                None
            }
        }
    }

    struct SharedHandle(Arc<MemFile>);
    impl Vnode for SharedHandle {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult {
            self.0.read_at(offset, buf)
        }
        fn write_at(&self, offset: u64, buf: &[u8]) -> IoResult {
            self.0.write_at(offset, buf)
        }
    }

    struct FakeProcess {
        current: Option<AsId>,
    }

    impl Process for FakeProcess {
        fn current_as_id(&self) -> Option<AsId> {
            self.current
        }

        fn panic(&self, msg: &str) -> ! {
            panic!("vm: fatal: {msg}");
        }
    }

    struct FakeTlb {
        entries: [(u32, u32); NUM_TLB],
    }

    impl FakeTlb {
        fn new() -> Self {
            FakeTlb {
                entries: [(TLB_INVALID_HI, TLB_INVALID_LO); NUM_TLB],
            }
        }

        fn lookup(&self, va: VirtAddress) -> Option<(u32, u32)> {
            let hi = crate::collab::pack_tlb_hi(va);
            self.entries.iter().copied().find(|&(h, _)| h == hi)
        }
    }

    impl TlbPort for FakeTlb {
        fn entry_count(&self) -> usize {
            self.entries.len()
        }

        fn read(&mut self, index: usize) -> (u32, u32) {
            self.entries[index]
        }

        fn write(&mut self, index: usize, hi: u32, lo: u32) {
            self.entries[index] = (hi, lo);
        }

        fn probe(&mut self, va_hi: u32) -> Option<usize> {
            self.entries.iter().position(|&(hi, _)| hi == va_hi)
        }

        fn invalidate_all(&mut self) {
            for e in &mut self.entries {
                *e = (TLB_INVALID_HI, TLB_INVALID_LO);
            }
        }
    }

    /// Single-address-space stand-in for a process table: this harness only
    /// ever drives one address space at a time.
    struct SingleProcessDirectory<'a> {
        id: AsId,
        asp: &'a RefCell<&'a mut AddressSpace>,
    }

    impl AddressSpaceDirectory for SingleProcessDirectory<'_> {
        fn with_address_space_mut(&self, id: AsId, f: &mut dyn FnMut(&mut AddressSpace)) {
            if id == self.id {
                f(&mut **self.asp.borrow_mut());
            }
        }
    }

    const CODE_VA: u64 = 0x0040_0000;

    fn code_image() -> Arc<dyn Vnode> {
        let mut bytes = vec![0u8; PAGE_SIZE.as_raw() as usize];
        bytes[0..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        Arc::new(MemFile {
            bytes: Mutex::new(bytes),
        })
    }

    fn harness(ram_pages: u64) -> (VmSystem, FakeRam, FakeStore) {
        let ram = FakeRam::new(ram_pages * PAGE_SIZE.as_raw());
        let swap_file = Arc::new(MemFile {
            bytes: Mutex::new(vec![0u8; FILE_SIZE as usize]),
        });
        let store = FakeStore { swap: swap_file };
        let vmsys = VmSystem::bootstrap(&ram, &store, "swapfile").expect("bootstrap");
        (vmsys, ram, store)
    }

    fn code_address_space(vmsys: &VmSystem) -> AddressSpace {
        let mut asp = AddressSpace::create(AsId(1));
        asp.bind_reclaimer(vmsys.coremap_handle());
        asp.define_region(
            RegionKind::Code,
            0,
            VirtAddress::from_raw(CODE_VA),
            PAGE_SIZE.as_raw(),
            Length::from_raw(PAGE_SIZE.as_raw()),
            Permissions::READ | Permissions::EXEC,
            code_image(),
        );
        asp.define_stack();
        asp
    }

    #[test]
    fn cold_read_loads_from_executable_and_installs_clean_tlb_entry() {
        let (vmsys, ram, _store) = harness(4);
        let mut asp = code_address_space(&vmsys);
        let process = FakeProcess {
            current: Some(AsId(1)),
        };
        let mut tlb = FakeTlb::new();
        vmsys.activate(&mut tlb);

        let asp_cell = RefCell::new(&mut asp);
        let directory = SingleProcessDirectory {
            id: AsId(1),
            asp: &asp_cell,
        };

        vmsys
            .fault(
                FaultKind::Read,
                VirtAddress::from_raw(CODE_VA + 0x10),
                &mut **asp_cell.borrow_mut(),
                &process,
                &ram,
                &ram,
                &directory,
                &mut tlb,
            )
            .expect("cold read succeeds");

        assert_eq!(vmsys.statistics().get(Counter::PageFaultDisk), 1);
        assert_eq!(vmsys.statistics().get(Counter::ElfFileRead), 1);
        assert_eq!(vmsys.statistics().check_consistency(), Ok(()));
        let (_, lo) = tlb.lookup(VirtAddress::from_raw(CODE_VA)).unwrap();
        assert_eq!(lo & crate::collab::TLB_LO_VALID, crate::collab::TLB_LO_VALID);
        assert_eq!(lo & crate::collab::TLB_LO_DIRTY, 0);
    }

    #[test]
    fn stack_write_zero_fills_and_installs_dirty_tlb_entry() {
        let (vmsys, ram, _store) = harness(4);
        let mut asp = code_address_space(&vmsys);
        let sp = VirtAddress::from_raw(crate::config::USERSTACK);
        let process = FakeProcess {
            current: Some(AsId(1)),
        };
        let mut tlb = FakeTlb::new();
        vmsys.activate(&mut tlb);

        let asp_cell = RefCell::new(&mut asp);
        let directory = SingleProcessDirectory {
            id: AsId(1),
            asp: &asp_cell,
        };

        let fault_va = sp - Length::from_raw(8);
        vmsys
            .fault(
                FaultKind::Write,
                fault_va,
                &mut **asp_cell.borrow_mut(),
                &process,
                &ram,
                &ram,
                &directory,
                &mut tlb,
            )
            .expect("stack fault succeeds");

        assert_eq!(vmsys.statistics().get(Counter::PageFaultZero), 1);
        assert_eq!(vmsys.statistics().check_consistency(), Ok(()));
        let page = crate::memory::page::Page::containing(fault_va).start();
        let (_, lo) = tlb.lookup(page).unwrap();
        assert_eq!(lo & crate::collab::TLB_LO_DIRTY, crate::collab::TLB_LO_DIRTY);
    }

    #[test]
    fn reload_after_eviction_reads_from_swap_not_elf() {
        // One RAM frame: the stack touch evicts the already-resident code
        // page, forcing the next code read to come back through swap_in.
        let (vmsys, ram, _store) = harness(1);
        let mut asp = code_address_space(&vmsys);
        let sp = VirtAddress::from_raw(crate::config::USERSTACK);
        let process = FakeProcess {
            current: Some(AsId(1)),
        };
        let mut tlb = FakeTlb::new();
        vmsys.activate(&mut tlb);

        let asp_cell = RefCell::new(&mut asp);
        let directory = SingleProcessDirectory {
            id: AsId(1),
            asp: &asp_cell,
        };

        vmsys
            .fault(
                FaultKind::Read,
                VirtAddress::from_raw(CODE_VA),
                &mut **asp_cell.borrow_mut(),
                &process,
                &ram,
                &ram,
                &directory,
                &mut tlb,
            )
            .expect("cold read succeeds");

        vmsys
            .fault(
                FaultKind::Write,
                sp - Length::from_raw(8),
                &mut **asp_cell.borrow_mut(),
                &process,
                &ram,
                &ram,
                &directory,
                &mut tlb,
            )
            .expect("stack fault evicts the code page");

        let before = vmsys.statistics().get(Counter::SwapFileRead);
        let elf_reads_before = vmsys.statistics().get(Counter::ElfFileRead);

        vmsys
            .fault(
                FaultKind::Read,
                VirtAddress::from_raw(CODE_VA),
                &mut **asp_cell.borrow_mut(),
                &process,
                &ram,
                &ram,
                &directory,
                &mut tlb,
            )
            .expect("reload from swap succeeds");

        assert_eq!(vmsys.statistics().get(Counter::SwapFileRead), before + 1);
        assert_eq!(vmsys.statistics().get(Counter::ElfFileRead), elf_reads_before);
        assert_eq!(vmsys.statistics().check_consistency(), Ok(()));
        let translation = asp_cell
            .borrow()
            .page_table()
            .translate(VirtAddress::from_raw(CODE_VA));
        assert!(matches!(translation, Translation::Resident(_)));
    }

    #[test]
    fn write_to_read_only_segment_is_access_violation() {
        let (vmsys, ram, _store) = harness(4);
        let mut asp = code_address_space(&vmsys);
        let process = FakeProcess {
            current: Some(AsId(1)),
        };
        let mut tlb = FakeTlb::new();
        vmsys.activate(&mut tlb);

        let asp_cell = RefCell::new(&mut asp);
        let directory = SingleProcessDirectory {
            id: AsId(1),
            asp: &asp_cell,
        };

        let result = vmsys.fault(
            FaultKind::Write,
            VirtAddress::from_raw(CODE_VA),
            &mut **asp_cell.borrow_mut(),
            &process,
            &ram,
            &ram,
            &directory,
            &mut tlb,
        );
        assert_eq!(result, Err(VmError::AccessViolation));
        assert_eq!(result.unwrap_err().errno(), 13);
    }

    #[test]
    fn fault_outside_any_segment_is_addressing_error() {
        let (vmsys, ram, _store) = harness(4);
        let mut asp = code_address_space(&vmsys);
        let process = FakeProcess {
            current: Some(AsId(1)),
        };
        let mut tlb = FakeTlb::new();
        vmsys.activate(&mut tlb);

        let asp_cell = RefCell::new(&mut asp);
        let directory = SingleProcessDirectory {
            id: AsId(1),
            asp: &asp_cell,
        };

        let result = vmsys.fault(
            FaultKind::Read,
            VirtAddress::from_raw(0x1000_0000),
            &mut **asp_cell.borrow_mut(),
            &process,
            &ram,
            &ram,
            &directory,
            &mut tlb,
        );
        assert_eq!(result, Err(VmError::AddressingError));
    }

    struct NullVnode;
    impl Vnode for NullVnode {
        fn read_at(&self, _offset: u64, buf: &mut [u8]) -> IoResult {
            buf.fill(0);
            Ok(buf.len())
        }
        fn write_at(&self, _offset: u64, buf: &[u8]) -> IoResult {
            Ok(buf.len())
        }
    }

    #[test]
    fn swap_overflow_halts_instead_of_returning_an_error() {
        // One RAM frame, one zero-filled data segment much larger than the
        // swap file: walking it page by page evicts the previous page each
        // time, so after exactly `swap_slot_count()` evictions every slot is
        // taken and the next one has nowhere left to go.
        let (vmsys, ram, _store) = harness(1);
        let slot_count = crate::config::swap_slot_count() as u64;

        let mut asp = AddressSpace::create(AsId(1));
        asp.bind_reclaimer(vmsys.coremap_handle());
        let base = VirtAddress::from_raw(0x0050_0000);
        asp.define_region(
            RegionKind::Data,
            0,
            base,
            0,
            Length::from_raw((slot_count + 2) * PAGE_SIZE.as_raw()),
            Permissions::READ | Permissions::WRITE,
            Arc::new(NullVnode),
        );

        let process = FakeProcess {
            current: Some(AsId(1)),
        };
        let mut tlb = FakeTlb::new();
        vmsys.activate(&mut tlb);

        let asp_cell = RefCell::new(&mut asp);
        let directory = SingleProcessDirectory {
            id: AsId(1),
            asp: &asp_cell,
        };

        // Fills every one of the swap file's slots, one page at a time.
        for i in 0..=slot_count {
            let va = base + Length::from_raw(i * PAGE_SIZE.as_raw());
            vmsys
                .fault(
                    FaultKind::Read,
                    va,
                    &mut **asp_cell.borrow_mut(),
                    &process,
                    &ram,
                    &ram,
                    &directory,
                    &mut tlb,
                )
                .unwrap_or_else(|e| panic!("fault {i} should succeed, got {e:?}"));
        }

        let overflow_va = base + Length::from_raw((slot_count + 1) * PAGE_SIZE.as_raw());
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            vmsys.fault(
                FaultKind::Read,
                overflow_va,
                &mut **asp_cell.borrow_mut(),
                &process,
                &ram,
                &ram,
                &directory,
                &mut tlb,
            )
        }));
        assert!(outcome.is_err(), "swap exhaustion should halt, not return");
    }

    #[test]
    fn dropping_address_space_returns_its_frames_to_the_coremap() {
        let (vmsys, ram, _store) = harness(4);
        let coremap = vmsys.coremap_handle();
        let mut asp = code_address_space(&vmsys);
        let sp = VirtAddress::from_raw(crate::config::USERSTACK);
        let process = FakeProcess {
            current: Some(AsId(1)),
        };
        let mut tlb = FakeTlb::new();
        vmsys.activate(&mut tlb);

        {
            let asp_cell = RefCell::new(&mut asp);
            let directory = SingleProcessDirectory {
                id: AsId(1),
                asp: &asp_cell,
            };

            vmsys
                .fault(
                    FaultKind::Read,
                    VirtAddress::from_raw(CODE_VA),
                    &mut **asp_cell.borrow_mut(),
                    &process,
                    &ram,
                    &ram,
                    &directory,
                    &mut tlb,
                )
                .expect("cold read succeeds");
            vmsys
                .fault(
                    FaultKind::Write,
                    sp - Length::from_raw(8),
                    &mut **asp_cell.borrow_mut(),
                    &process,
                    &ram,
                    &ram,
                    &directory,
                    &mut tlb,
                )
                .expect("stack fault succeeds");

            assert_eq!(coremap.dirty_count(), 2);
        }

        drop(asp);
        assert_eq!(coremap.dirty_count(), 0);
    }
}
