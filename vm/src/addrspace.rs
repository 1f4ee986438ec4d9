//! The per-process container binding a page table to its segments.

use alloc::sync::Arc;

use crate::collab::{AsId, Vnode};
use crate::config::{Permissions, PAGE_SIZE, STACKPAGES, USERSTACK};
use crate::coremap::Coremap;
use crate::memory::addr::{Length, VirtAddress};
use crate::memory::page::Frame;
use crate::pt::PageTable;
use crate::segment::{LoadedRegion, Segment};

/// Which slot [`AddressSpace::define_region`] fills in. An ELF image has at
/// most one code and one data segment; the stack has its own dedicated
/// setter since it is never loaded from a file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegionKind {
    Code,
    Data,
}

/// Owns one process's translation state: its page table and its three
/// segments (code, data, stack).
pub struct AddressSpace {
    pub id: AsId,
    pub(crate) pt: PageTable,
    code: Option<Segment>,
    data: Option<Segment>,
    stack: Option<Segment>,
    /// The coremap to return resident frames to on drop. `None` only in
    /// tests that build an `AddressSpace` without a live coremap behind it.
    reclaimer: Option<Arc<Coremap>>,
}

impl AddressSpace {
    pub fn create(id: AsId) -> Self {
        AddressSpace {
            id,
            pt: PageTable::create(),
            code: None,
            data: None,
            stack: None,
            reclaimer: None,
        }
    }

    /// Binds the coremap this address space's resident frames will be
    /// returned to when it is destroyed. Must be called once, by whatever
    /// creates the address space, before any fault can install a frame.
    pub fn bind_reclaimer(&mut self, coremap: Arc<Coremap>) {
        self.reclaimer = Some(coremap);
    }

    /// Deep-copies segment metadata into a fresh address space with a new
    /// id. The copy's page table starts empty: sharing leaf tables between
    /// the original and the copy would let two address spaces claim
    /// ownership of the same coremap frame, so the copy re-faults its pages
    /// from scratch on first touch instead. The copy keeps the same
    /// reclaimer as the original, since they share one coremap.
    pub fn try_clone(&self, new_id: AsId) -> AddressSpace {
        AddressSpace {
            id: new_id,
            pt: PageTable::create(),
            code: self.code.clone(),
            data: self.data.clone(),
            stack: self.stack.clone(),
            reclaimer: self.reclaimer.clone(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn define_region(
        &mut self,
        kind: RegionKind,
        file_offset: u64,
        base: VirtAddress,
        file_size: u64,
        memsize: Length,
        permissions: Permissions,
        vnode: Arc<dyn Vnode>,
    ) {
        let region = LoadedRegion {
            base,
            file_offset,
            file_size,
            memsize,
            permissions,
            vnode,
        };
        let segment = match permissions.contains(Permissions::EXEC) {
            true => Segment::Code(region),
            false => Segment::Data(region),
        };
        match kind {
            RegionKind::Code => self.code = Some(segment),
            RegionKind::Data => self.data = Some(segment),
        }
    }

    /// Installs the fixed-size stack region and returns the initial stack
    /// pointer, `USERSTACK`.
    pub fn define_stack(&mut self) -> VirtAddress {
        let base = VirtAddress::from_raw(USERSTACK) - PAGE_SIZE * STACKPAGES;
        self.stack = Some(Segment::Stack {
            base,
            memsize: PAGE_SIZE * STACKPAGES,
        });
        VirtAddress::from_raw(USERSTACK)
    }

    /// Reserved for future copy-on-write support; currently a no-op.
    pub fn prepare_load(&mut self) {}

    /// Reserved for future copy-on-write support; currently a no-op.
    pub fn complete_load(&mut self) {}

    /// Finds the segment containing `va`, if any.
    pub fn get_segment(&self, va: VirtAddress) -> Option<&Segment> {
        [&self.code, &self.data, &self.stack]
            .into_iter()
            .flatten()
            .find(|seg| seg.contains(va))
    }

    pub fn page_table(&self) -> &PageTable {
        &self.pt
    }

    pub fn page_table_mut(&mut self) -> &mut PageTable {
        &mut self.pt
    }
}

/// Returns every resident frame to the coremap. Mirrors `as_destroy`: the
/// page table and its leaf tables are reclaimed by ordinary `Box` drop glue,
/// so only the frames they pointed at need explicit release.
impl Drop for AddressSpace {
    fn drop(&mut self) {
        let Some(coremap) = &self.reclaimer else {
            return;
        };
        for (_, _, frame) in self.pt.resident_frames() {
            coremap.free_user(Frame::containing(frame));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::IoResult;

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
    fn define_stack_sets_fixed_window() {
        let mut asp = AddressSpace::create(AsId(1));
        let sp = asp.define_stack();
        assert_eq!(sp, VirtAddress::from_raw(USERSTACK));
        let top_minus_one = VirtAddress::from_raw(USERSTACK - 1);
        assert!(asp.get_segment(top_minus_one).is_some());
        let below_window = VirtAddress::from_raw(USERSTACK) - PAGE_SIZE * STACKPAGES
            - Length::from_raw(1);
        assert!(asp.get_segment(below_window).is_none());
    }

    #[test]
    fn clone_duplicates_segments_but_not_page_table() {
        let mut asp = AddressSpace::create(AsId(1));
        asp.define_region(
            RegionKind::Code,
            0,
            VirtAddress::from_raw(0x0040_0000),
            4096,
            Length::from_raw(4096),
            Permissions::READ | Permissions::EXEC,
            Arc::new(NullVnode),
        );
        asp.page_table_mut()
            .set_frame(VirtAddress::from_raw(0x0040_0000), crate::memory::addr::PhysAddress::from_raw(0x1000));

        let clone = asp.try_clone(AsId(2));
        assert!(clone.get_segment(VirtAddress::from_raw(0x0040_0000)).is_some());
        assert_eq!(
            clone.page_table().translate(VirtAddress::from_raw(0x0040_0000)),
            crate::pt::Translation::Unreferenced
        );
    }
}
