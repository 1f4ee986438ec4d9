//! Host-side demo binary: wires fake collaborators to [`vm::VmSystem`] and
//! drives a handful of faults end to end. Boot glue, the real filesystem,
//! and the real TLB all live outside this crate; here they are stood in by
//! small in-memory fakes so the VM subsystem can be exercised on a
//! workstation.

use std::cell::{RefCell, UnsafeCell};
use std::sync::{Arc, Mutex};

use vm::addrspace::{AddressSpace, RegionKind};
use vm::collab::{
    AddressSpaceDirectory, AsId, BackingStore, IoResult, PhysMemory, Process, RawRam, TlbPort,
    Vnode, TLB_INVALID_HI, TLB_INVALID_LO,
};
use vm::config::{Permissions, FILE_SIZE, NUM_TLB, PAGE_SIZE};
use vm::fault::FaultKind;
use vm::memory::addr::{Length, PhysAddress, VirtAddress};
use vm::memory::page::Frame;
use vm::VmSystem;

/// Flat byte array standing in for physical RAM, with kernel-alias access
/// exposed through unsynchronized interior mutability. Fine for this
/// single-threaded demo; a real kernel's kseg0 mapping gives the same
/// unchecked access.
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

/// An in-memory "file", used both for the executable image and the swap
/// file.
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

/// Toy single-process directory: this demo drives one address space at a
/// time, so resolving an id only ever means "is it the one already
/// borrowed".
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

fn main() {
    env_logger::init();

    let ram = FakeRam::new(8 * PAGE_SIZE.as_raw());
    let swap_file = Arc::new(MemFile {
        bytes: Mutex::new(vec![0u8; FILE_SIZE as usize]),
    });
    let store = FakeStore {
        swap: swap_file.clone(),
    };

    let vmsys = VmSystem::bootstrap(&ram, &store, "swapfile").expect("vm bootstrap");

    let mut code_bytes = vec![0u8; PAGE_SIZE.as_raw() as usize];
    code_bytes[0..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    let code_file: Arc<dyn Vnode> = Arc::new(MemFile {
        bytes: Mutex::new(code_bytes),
    });

    let mut asp = AddressSpace::create(AsId(1));
    asp.bind_reclaimer(vmsys.coremap_handle());
    asp.define_region(
        RegionKind::Code,
        0,
        VirtAddress::from_raw(0x0040_0000),
        PAGE_SIZE.as_raw(),
        Length::from_raw(PAGE_SIZE.as_raw()),
        Permissions::READ | Permissions::EXEC,
        code_file,
    );
    let sp = asp.define_stack();
    log::info!("initial stack pointer: {:#x}", sp.as_raw());

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

    // Cold read from the code segment: demand-loads from the fake
    // executable.
    vmsys
        .fault(
            FaultKind::Read,
            VirtAddress::from_raw(0x0040_0000),
            &mut **asp_cell.borrow_mut(),
            &process,
            &ram,
            &ram,
            &directory,
            &mut tlb,
        )
        .expect("cold read fault");

    // Stack write: zero-filled, no I/O.
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
        .expect("stack fault");

    // Write to the read-only code segment: must fail with an access
    // violation, not crash.
    let result = vmsys.fault(
        FaultKind::Write,
        VirtAddress::from_raw(0x0040_0000),
        &mut **asp_cell.borrow_mut(),
        &process,
        &ram,
        &ram,
        &directory,
        &mut tlb,
    );
    log::info!("write-to-code result: {:?}", result);

    vmsys.shutdown();
}
