//! Fixed-capacity swap area backing evicted user frames.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use spin::Mutex;

use crate::collab::{AsId, BackingStore, Vnode};
use crate::config::{swap_slot_count, PAGE_SIZE};
use crate::error::{VmError, VmResult};
use crate::memory::addr::VirtAddress;
use crate::stats::{Counter, Statistics};

#[derive(Clone, Copy)]
struct Slot {
    taken: bool,
    /// Diagnostic only; not the lookup key for swap-in.
    owner: Option<AsId>,
    vpn: Option<VirtAddress>,
}

impl Slot {
    const fn free() -> Self {
        Slot {
            taken: false,
            owner: None,
            vpn: None,
        }
    }
}

/// Bounded secondary storage for evicted user frames. Exhaustion is fatal by
/// design: the system is not expected to thrash past its fixed capacity.
pub struct SwapArea {
    file: Box<dyn Vnode>,
    slots: Mutex<Vec<Slot>>,
}

impl SwapArea {
    pub fn init(store: &dyn BackingStore, path: &str) -> Option<Self> {
        let file = store.open(path)?;
        Some(SwapArea {
            file,
            slots: Mutex::new(vec![Slot::free(); swap_slot_count()]),
        })
    }

    /// Writes `page` (one `PAGE_SIZE` buffer) to the lowest-index free slot
    /// and returns the byte offset it was written at.
    pub fn swap_out(
        &self,
        owner: AsId,
        vpn: VirtAddress,
        page: &[u8],
        stats: &Statistics,
    ) -> VmResult<u64> {
        debug_assert_eq!(page.len() as u64, PAGE_SIZE.as_raw());

        let slot_index = {
            let mut slots = self.slots.lock();
            let Some(i) = slots.iter().position(|s| !s.taken) else {
                log::error!("vm: swap file exhausted, {} slots all taken", slots.len());
                return Err(VmError::OutOfMemory);
            };
            slots[i] = Slot {
                taken: true,
                owner: Some(owner),
                vpn: Some(vpn),
            };
            i
        };

        let offset = slot_index as u64 * PAGE_SIZE.as_raw();
        match self.file.write_at(offset, page) {
            Ok(n) if n as u64 == PAGE_SIZE.as_raw() => {
                stats.increment(Counter::SwapFileWrite);
                Ok(offset)
            }
            _ => {
                log::warn!("vm: short write to swap file at offset {offset}");
                self.slots.lock()[slot_index] = Slot::free();
                Err(VmError::IoFailure)
            }
        }
    }

    /// Reads the page stored at `offset` into `dest` and frees the slot.
    pub fn swap_in(&self, offset: u64, dest: &mut [u8], stats: &Statistics) -> VmResult<()> {
        debug_assert_eq!(dest.len() as u64, PAGE_SIZE.as_raw());
        let slot_index = (offset / PAGE_SIZE.as_raw()) as usize;

        {
            let mut slots = self.slots.lock();
            slots[slot_index] = Slot::free();
        }

        match self.file.read_at(offset, dest) {
            Ok(n) if n as u64 == PAGE_SIZE.as_raw() => {
                stats.increment(Counter::SwapFileRead);
                Ok(())
            }
            _ => {
                log::warn!("vm: short read from swap file at offset {offset}");
                Err(VmError::IoFailure)
            }
        }
    }

    pub fn taken_count(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.taken).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;

    struct FakeFile {
        bytes: Mutex<Vec<u8>>,
    }

    impl Vnode for FakeFile {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> crate::collab::IoResult {
            let bytes = self.bytes.lock();
            let start = offset as usize;
            if start + buf.len() > bytes.len() {
                return Err(());
            }
            buf.copy_from_slice(&bytes[start..start + buf.len()]);
            Ok(buf.len())
        }

        fn write_at(&self, offset: u64, buf: &[u8]) -> crate::collab::IoResult {
            let mut bytes = self.bytes.lock();
            let start = offset as usize;
            if start + buf.len() > bytes.len() {
                bytes.resize(start + buf.len(), 0);
            }
            bytes[start..start + buf.len()].copy_from_slice(buf);
            Ok(buf.len())
        }
    }

    struct FakeStore(Arc<FakeFile>);
    impl BackingStore for FakeStore {
        fn open(&self, _path: &str) -> Option<Box<dyn Vnode>> {
            Some(Box::new(FakeFileHandle(self.0.clone())))
        }
    }

    struct FakeFileHandle(Arc<FakeFile>);
    impl Vnode for FakeFileHandle {
        fn read_at(&self, offset: u64, buf: &mut [u8]) -> crate::collab::IoResult {
            self.0.read_at(offset, buf)
        }
        fn write_at(&self, offset: u64, buf: &[u8]) -> crate::collab::IoResult {
            self.0.write_at(offset, buf)
        }
    }

    fn new_area() -> SwapArea {
        let file = Arc::new(FakeFile {
            bytes: Mutex::new(vec![0u8; crate::config::FILE_SIZE as usize]),
        });
        let store = FakeStore(file);
        SwapArea::init(&store, "swapfile").unwrap()
    }

    #[test]
    fn round_trip_preserves_contents() {
        let area = new_area();
        let stats = Statistics::new();
        let page = [0x42u8; 4096];
        let owner = AsId(1);
        let vpn = VirtAddress::from_raw(0x1000);

        let offset = area.swap_out(owner, vpn, &page, &stats).unwrap();
        assert_eq!(area.taken_count(), 1);

        let mut dest = [0u8; 4096];
        area.swap_in(offset, &mut dest, &stats).unwrap();
        assert_eq!(dest, page);
        assert_eq!(area.taken_count(), 0);
    }

    #[test]
    fn swap_out_picks_lowest_free_slot() {
        let area = new_area();
        let stats = Statistics::new();
        let page = [1u8; 4096];
        let owner = AsId(1);

        let o1 = area
            .swap_out(owner, VirtAddress::from_raw(0x1000), &page, &stats)
            .unwrap();
        let o2 = area
            .swap_out(owner, VirtAddress::from_raw(0x2000), &page, &stats)
            .unwrap();
        assert!(o2 > o1);

        let mut dest = [0u8; 4096];
        area.swap_in(o1, &mut dest, &stats).unwrap();

        let o3 = area
            .swap_out(owner, VirtAddress::from_raw(0x3000), &page, &stats)
            .unwrap();
        assert_eq!(o3, o1);
    }
}
