//! Narrow interfaces to the rest of the kernel.
//!
//! Every collaborator the core needs from the host kernel is expressed here
//! as a trait. Production code wires these to the real RAM probe,
//! filesystem, process table and TLB; tests wire them to small in-memory
//! fakes, which is what makes the fault-handling logic exercisable on a
//! workstation.

use alloc::boxed::Box;

use crate::memory::addr::PhysAddress;
use crate::memory::page::Frame;

/// Queries and reservations against physical RAM before the coremap is
/// self-sufficient.
pub trait RawRam {
    /// Total installed RAM, in bytes.
    fn size(&self) -> u64;

    /// Hands out `count` contiguous frames via the early bump allocator.
    /// Returns `None` once RAM below the bump pointer is exhausted.
    fn steal(&self, count: u64) -> Option<Frame>;
}

/// An open handle to a backing file (executable image or swap file).
pub trait Vnode {
    /// Reads exactly `buf.len()` bytes starting at `offset` into `buf`.
    /// A short read is reported by returning fewer bytes than requested;
    /// the caller treats that as [`crate::VmError::IoFailure`].
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> IoResult;

    /// Writes exactly `buf.len()` bytes starting at `offset`.
    fn write_at(&self, offset: u64, buf: &[u8]) -> IoResult;
}

/// Result of a single I/O transfer: bytes actually moved.
pub type IoResult = Result<usize, ()>;

/// Opens files by path. The swap area and the segment loader both go through
/// this to get a [`Vnode`].
pub trait BackingStore {
    fn open(&self, path: &str) -> Option<Box<dyn Vnode>>;
}

/// A stable, non-owning handle to an address space, used by the coremap to
/// record which address space owns a resident user frame without holding a
/// strong reference to it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct AsId(pub u32);

/// Access to the currently running process, for the fault handler's
/// "is there even a current address space" check and for the unrecoverable
/// halt path.
pub trait Process {
    /// The address space of the process currently executing, or `None` if
    /// the fault happened with no user process current (an early-boot or
    /// kernel-thread fault, which is always an addressing error).
    fn current_as_id(&self) -> Option<AsId>;

    /// Halts the system in response to an invariant violation. Never
    /// returns. The real kernel panics; tests can record the message and
    /// unwind instead.
    fn panic(&self, msg: &str) -> !;
}

/// Direct access to the bytes of a physical frame, through whatever
/// kernel-alias mapping the architecture provides (MIPS's unmapped kseg0
/// segment, in the machine this subsystem targets). Used to fill, copy, and
/// drain a frame's contents during loading, zero-fill, and swap I/O.
pub trait PhysMemory {
    /// Returns a mutable view of the `PAGE_SIZE` bytes starting at
    /// `frame`'s base.
    ///
    /// # Safety
    ///
    /// The caller must ensure no other live reference to the same frame's
    /// bytes exists for the duration of the borrow.
    unsafe fn frame_bytes_mut(&self, frame: Frame) -> &mut [u8];
}

/// Looks up an address space by its stable id so the coremap's eviction
/// path can update the page table of whichever address space owned the
/// victim frame, which may not be the address space that triggered the
/// fault.
pub trait AddressSpaceDirectory {
    fn with_address_space_mut(&self, id: AsId, f: &mut dyn FnMut(&mut crate::addrspace::AddressSpace));
}

/// Software-managed TLB primitives. `hi` packs a virtual page number, `lo`
/// packs a physical frame plus valid/dirty bits, matching a MIPS-style
/// software-refilled TLB entry pair.
pub trait TlbPort {
    /// Number of hardware TLB entries.
    fn entry_count(&self) -> usize;

    fn read(&mut self, index: usize) -> (u32, u32);
    fn write(&mut self, index: usize, hi: u32, lo: u32);

    /// Returns the index of the entry whose `hi` half matches `va`, if any.
    fn probe(&mut self, va_hi: u32) -> Option<usize>;

    /// Invalidates every entry. Used on address-space activation,
    /// deactivation, and shootdown.
    fn invalidate_all(&mut self);

    /// Invalidates the single entry mapping `va_hi`, if present. Used when
    /// the coremap evicts the frame backing that page.
    fn invalidate(&mut self, va_hi: u32) {
        if let Some(i) = self.probe(va_hi) {
            self.write(i, TLB_INVALID_HI, TLB_INVALID_LO);
        }
    }
}

pub const TLB_INVALID_HI: u32 = 0xFFFF_FFFF;
pub const TLB_INVALID_LO: u32 = 0;

/// Bit layout of a TLB `lo` half, matching the MIPS32 EntryLo convention
/// closely enough for this subsystem's purposes.
pub const TLB_LO_VALID: u32 = 1 << 1;
pub const TLB_LO_DIRTY: u32 = 1 << 2;

/// Packs a physical frame and flags into a TLB `lo` half.
pub fn pack_tlb_lo(frame: PhysAddress, dirty: bool, valid: bool) -> u32 {
    let mut lo = (frame.as_raw() as u32) & 0xFFFF_F000;
    if valid {
        lo |= TLB_LO_VALID;
    }
    if dirty {
        lo |= TLB_LO_DIRTY;
    }
    lo
}

/// Packs a virtual page number into a TLB `hi` half.
pub fn pack_tlb_hi(va: crate::memory::addr::VirtAddress) -> u32 {
    (va.as_raw() as u32) & 0xFFFF_F000
}
