//! Fixed constants describing the target machine and the demand-paging policy.
//!
//! These mirror the header-constant style of the source this subsystem was
//! modeled on: small, compile-time, and not meant to be tuned at runtime.

use crate::memory::addr::Length;

/// Size of a page/frame on this machine.
pub const PAGE_SIZE: Length = Length::from_raw(4096);

/// Mask selecting the frame-number bits of a physical or virtual address.
pub const PAGE_FRAME: u64 = 0xFFFF_F000;

/// Mask selecting the in-page offset bits.
pub const PAGE_OFFSET_MASK: u64 = 0x0000_0FFF;

/// Top of the user address space; the stack grows down from here.
pub const USERSTACK: u64 = 0x8000_0000;

/// Number of pages reserved for a process's stack, below `USERSTACK`.
pub const STACKPAGES: u64 = 18;

/// Number of hardware TLB entries.
pub const NUM_TLB: usize = 64;

/// Size in bytes of the swap backing file.
pub const FILE_SIZE: u64 = 9 * 1024 * 1024;

/// Number of slots the swap file can hold.
pub const fn swap_slot_count() -> usize {
    (FILE_SIZE / PAGE_SIZE.as_raw()) as usize
}

bitflags::bitflags! {
    /// ELF-style segment permission bits, plus a core-defined marker for the
    /// stack region (which has no ELF program header of its own).
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
    pub struct Permissions: u8 {
        const EXEC  = 0b0001;
        const WRITE = 0b0010;
        const READ  = 0b0100;
        /// Not an ELF bit; marks the fixed-size stack region.
        const STACK = 0b1000;
    }
}

impl Permissions {
    pub fn from_elf_flags(r: bool, w: bool, x: bool) -> Self {
        let mut bits = Permissions::empty();
        if r {
            bits |= Permissions::READ;
        }
        if w {
            bits |= Permissions::WRITE;
        }
        if x {
            bits |= Permissions::EXEC;
        }
        bits
    }

    /// Whether a TLB entry for this permission should be installed with its
    /// dirty (writable) bit set.
    pub fn writable(self) -> bool {
        self.contains(Permissions::WRITE) || self.contains(Permissions::STACK)
    }
}
