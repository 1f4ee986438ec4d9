//! Page- and frame-granular wrappers over [`Address`].

use super::addr::{Length, PhysAddress, PhysExtent, VirtAddress, VirtExtent};
use crate::config::PAGE_SIZE;

/// A page-sized physical memory frame.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Frame {
    start: PhysAddress,
}

impl Frame {
    /// Creates a `Frame` representing the frame beginning at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not aligned to [`PAGE_SIZE`].
    pub fn new(start: PhysAddress) -> Frame {
        assert!(start.is_aligned_to(PAGE_SIZE.as_raw()));
        Frame { start }
    }

    /// Gets the `Frame` that contains `addr`.
    pub fn containing(addr: PhysAddress) -> Frame {
        Self::new(addr.align_down(PAGE_SIZE.as_raw()))
    }

    pub fn start(self) -> PhysAddress {
        self.start
    }

    pub fn extent(self) -> PhysExtent {
        PhysExtent::new(self.start, PAGE_SIZE)
    }

    /// The nth frame after `self`, or `None` if it's not addressable.
    pub fn next(self, n: u64) -> Option<Frame> {
        let next_start = self
            .start
            .offset_by_checked(Length::from_raw(PAGE_SIZE.as_raw().checked_mul(n)?))?;
        Some(Self::new(next_start))
    }
}

/// A page-sized virtual memory page.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Page {
    start: VirtAddress,
}

impl Page {
    /// Creates a `Page` representing the page beginning at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start` is not aligned to [`PAGE_SIZE`].
    pub fn new(start: VirtAddress) -> Page {
        assert!(start.is_aligned_to(PAGE_SIZE.as_raw()));
        Page { start }
    }

    /// Gets the `Page` that contains `addr`.
    pub fn containing(addr: VirtAddress) -> Page {
        Self::new(addr.align_down(PAGE_SIZE.as_raw()))
    }

    pub fn start(self) -> VirtAddress {
        self.start
    }

    pub fn extent(self) -> VirtExtent {
        VirtExtent::new(self.start, PAGE_SIZE)
    }

    /// The nth page after `self`, or `None` if it's not addressable.
    pub fn next(self, n: u64) -> Option<Page> {
        let next_start = self
            .start
            .offset_by_checked(Length::from_raw(PAGE_SIZE.as_raw().checked_mul(n)?))?;
        Some(Self::new(next_start))
    }

    /// Index of this page within a region starting at `base`, i.e. how many
    /// whole pages separate them.
    pub fn index_from(self, base: VirtAddress) -> u64 {
        self.start.distance_from(Page::containing(base).start()).as_raw() / PAGE_SIZE.as_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_containing_aligns_down() {
        let f = Frame::containing(PhysAddress::from_raw(0x1234));
        assert_eq!(f.start(), PhysAddress::from_raw(0x1000));
    }

    #[test]
    fn page_next_advances_by_page_size() {
        let p = Page::new(VirtAddress::from_raw(0x1000));
        assert_eq!(
            p.next(2).unwrap().start(),
            VirtAddress::from_raw(0x1000 + 2 * PAGE_SIZE.as_raw())
        );
    }
}
