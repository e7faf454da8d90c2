//! The subsystem's private memory arena.

/// Size of the region reserved for the injected subsystem's allocations.
pub const ARENA_SIZE: usize = 1024 * 1024;

/// A fixed-size byte region owned by the patch layer for the lifetime of the
/// process.
///
/// The injected allocator carves it up; this type only owns the storage and
/// hands out its extent. Constructed once during initialization and passed
/// into the subsystem rather than living in a process-wide static, so tests
/// can build their own.
pub struct Arena {
    region: Box<[u8]>,
}

impl Arena {
    /// Reserves a zeroed region of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            region: vec![0; len].into_boxed_slice(),
        }
    }

    /// Returns the size of the region in bytes.
    pub fn len(&self) -> usize {
        self.region.len()
    }

    /// Returns `true` if the region is empty.
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    /// Returns the base address the injected allocator initializes from.
    pub fn base(&mut self) -> *mut u8 {
        self.region.as_mut_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_owns_its_region() {
        let mut a = Arena::new(4096);
        let mut b = Arena::new(4096);

        assert_eq!(a.len(), 4096);
        assert!(!a.is_empty());
        assert!(!a.base().is_null());

        // Two arenas never alias.
        assert_ne!(a.base(), b.base());

        assert!(Arena::new(0).is_empty());
    }
}
