//! Segment descriptions and the single-page loader.

use alloc::sync::Arc;

use crate::collab::Vnode;
use crate::config::{Permissions, PAGE_SIZE};
use crate::error::{VmError, VmResult};
use crate::memory::addr::{Length, VirtAddress, VirtExtent};

/// A region of an address space's virtual memory, tagged by what backs it.
/// Kept as a variant per kind (rather than one struct with an optional
/// vnode) so the loader's "zero-only vs. read-from-file" branch is a match
/// on the tag instead of a null check.
#[derive(Clone)]
pub enum Segment {
    Code(LoadedRegion),
    Data(LoadedRegion),
    Stack { base: VirtAddress, memsize: Length },
}

/// A region backed by bytes in an executable image, with zero-fill beyond
/// `file_size`.
#[derive(Clone)]
pub struct LoadedRegion {
    pub base: VirtAddress,
    pub file_offset: u64,
    pub file_size: u64,
    pub memsize: Length,
    pub permissions: Permissions,
    pub vnode: Arc<dyn Vnode>,
}

impl Segment {
    pub fn base(&self) -> VirtAddress {
        match self {
            Segment::Code(r) | Segment::Data(r) => r.base,
            Segment::Stack { base, .. } => *base,
        }
    }

    pub fn memsize(&self) -> Length {
        match self {
            Segment::Code(r) | Segment::Data(r) => r.memsize,
            Segment::Stack { memsize, .. } => *memsize,
        }
    }

    pub fn permissions(&self) -> Permissions {
        match self {
            Segment::Code(r) | Segment::Data(r) => r.permissions,
            Segment::Stack { .. } => Permissions::READ | Permissions::WRITE | Permissions::STACK,
        }
    }

    pub fn extent(&self) -> VirtExtent {
        VirtExtent::new(self.base(), self.memsize())
    }

    /// Whether `va` falls within this segment. The high end is exclusive,
    /// per the module-level note on [`VirtExtent::contains_address`]: the
    /// byte at `base + memsize` belongs to whatever segment follows.
    pub fn contains(&self, va: VirtAddress) -> bool {
        self.extent().contains_address(va)
    }

    /// Zero-fills `page`, then — for `Code`/`Data` segments whose file
    /// region overlaps this page — overwrites the overlapping bytes by
    /// reading from the backing vnode. `page` must be page-aligned and must
    /// lie within this segment.
    pub fn load_page(&self, page: VirtAddress, dest: &mut [u8]) -> VmResult<()> {
        debug_assert!(page.is_aligned_to(PAGE_SIZE.as_raw()));
        debug_assert_eq!(dest.len() as u64, PAGE_SIZE.as_raw());

        dest.fill(0);

        let region = match self {
            Segment::Stack { .. } => return Ok(()),
            Segment::Code(r) | Segment::Data(r) => r,
        };

        // Bytes-from-base-of-segment at which this page starts; the segment
        // need not itself be page-aligned, so the first page can carry
        // leading zero bytes before the file's contents begin.
        let page_start_in_segment = page.distance_from(self.base().align_down(PAGE_SIZE.as_raw()));
        let page_start = page_start_in_segment.as_raw();
        let page_end = page_start + PAGE_SIZE.as_raw();

        // The segment's file bytes occupy `[base_skew, base_skew +
        // file_size)` measured from the page-aligned start of the segment's
        // first page, where `base_skew` is how far into that first page the
        // segment's true base address falls.
        let base_skew = self.base().as_raw() - self.base().align_down(PAGE_SIZE.as_raw()).as_raw();
        let file_start = base_skew;
        let file_end = base_skew + region.file_size;

        let overlap_start = page_start.max(file_start);
        let overlap_end = page_end.min(file_end);
        if overlap_end <= overlap_start {
            return Ok(());
        }

        let dest_offset = (overlap_start - page_start) as usize;
        let len = (overlap_end - overlap_start) as usize;
        let file_offset = region.file_offset + (overlap_start - file_start);

        let buf = &mut dest[dest_offset..dest_offset + len];
        match region.vnode.read_at(file_offset, buf) {
            Ok(n) if n == len => Ok(()),
            _ => {
                log::warn!("vm: short read loading segment page at file offset {file_offset}");
                Err(VmError::IoFailure)
            }
        }
    }
}
