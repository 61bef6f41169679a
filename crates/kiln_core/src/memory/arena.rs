//! # Arena Allocator
//!
//! A fixed-capacity bump allocator. Requests advance a single cursor through
//! one buffer; there is no per-allocation free.

use std::cell::RefCell;
use std::mem::{align_of, size_of};
use std::rc::Rc;

use bytemuck::Pod;

use super::ArenaRef;
use crate::error::{ArenaError, ArenaResult};

/// Backing word. Keeps the buffer base aligned for any `Pod` root up to
/// `align_of::<u128>()`.
type Word = u128;

const WORD_SIZE: usize = size_of::<Word>();

/// A bump-pointer arena over a fixed byte buffer.
///
/// Allocations are fast (just bump a cursor). Memory is released all at once,
/// either by [`reset`](Self::reset) (zero-fill + rewind) or by
/// [`clear`](Self::clear) (rewind only).
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. The host loop is the only thread touching it.
///
/// # Example
///
/// ```rust
/// use kiln_core::MemoryArena;
///
/// let mut arena = MemoryArena::new(1024);
/// let first = arena.allocate(16).as_ptr();
/// let second = arena.allocate(16).as_ptr();
/// assert_eq!(second as usize - first as usize, 16);
///
/// arena.clear();
/// assert_eq!(arena.used(), 0);
/// ```
pub struct MemoryArena {
    /// The backing storage, `capacity` bytes rounded up to whole words.
    storage: Box<[Word]>,
    /// Usable size in bytes.
    capacity: usize,
    /// Current allocation offset.
    cursor: usize,
}

impl MemoryArena {
    /// Creates a new zero-filled arena with the specified capacity in bytes.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Total size in bytes
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut arena = Self::default();
        arena.reserve(capacity);
        arena
    }

    /// Creates a new arena wrapped for sharing between host and plugin.
    #[must_use]
    pub fn shared(capacity: usize) -> ArenaRef {
        Rc::new(RefCell::new(Self::new(capacity)))
    }

    /// Replaces the backing buffer with a fresh zero-filled one of
    /// `capacity` bytes and rewinds the cursor.
    ///
    /// Prior contents are discarded. Running out of memory here aborts the
    /// process; the environment cannot host the game.
    pub fn reserve(&mut self, capacity: usize) {
        let words = capacity.div_ceil(WORD_SIZE);
        self.storage = vec![0; words].into_boxed_slice();
        self.capacity = capacity;
        self.cursor = 0;
        tracing::debug!(capacity, "arena reserved");
    }

    /// Returns the total capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current used space in bytes.
    #[inline]
    #[must_use]
    pub const fn used(&self) -> usize {
        self.cursor
    }

    /// Returns the remaining free space in bytes.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Returns the base address of the buffer.
    ///
    /// Useful for computing the offset of an allocation; the pointer is only
    /// meaningful until the next [`reserve`](Self::reserve).
    #[inline]
    #[must_use]
    pub fn base_ptr(&self) -> *const u8 {
        self.storage.as_ptr().cast()
    }

    /// Views the whole buffer, allocated or not.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<Word, u8>(&self.storage)[..self.capacity]
    }

    /// Mutable view of the whole buffer, allocated or not.
    #[must_use]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        &mut bytemuck::cast_slice_mut::<Word, u8>(&mut self.storage)[..capacity]
    }

    /// Carves `byte_count` bytes off the front of the free space.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::Overflow`] if the request does not fit. The
    /// cursor is left untouched in that case.
    pub fn try_allocate(&mut self, byte_count: usize) -> ArenaResult<&mut [u8]> {
        let start = self.cursor;
        let end = match start.checked_add(byte_count) {
            Some(end) if end <= self.capacity => end,
            _ => {
                return Err(ArenaError::Overflow {
                    requested: byte_count,
                    used: start,
                    capacity: self.capacity,
                })
            }
        };

        self.cursor = end;
        Ok(&mut self.bytes_mut()[start..end])
    }

    /// Carves `byte_count` bytes off the front of the free space.
    ///
    /// Regions are contiguous in call order and never overlap. Their contents
    /// are zero only if nothing wrote to them since the last
    /// [`reset`](Self::reset).
    ///
    /// # Panics
    ///
    /// Panics if the request does not fit. A blown arena budget means the
    /// capacity constants are wrong; continuing would corrupt game state.
    pub fn allocate(&mut self, byte_count: usize) -> &mut [u8] {
        match self.try_allocate(byte_count) {
            Ok(bytes) => bytes,
            Err(error) => panic!("{error}"),
        }
    }

    /// Allocates `count` values of `T`, aligned for `T`.
    ///
    /// Alignment padding counts against the arena like any other byte.
    ///
    /// # Panics
    ///
    /// Panics if the padded request does not fit.
    pub fn allocate_slice<T: Pod>(&mut self, count: usize) -> &mut [T] {
        if count == 0 || size_of::<T>() == 0 {
            return &mut [];
        }

        let align = align_of::<T>();
        let address = self.base_ptr() as usize + self.cursor;
        let padding = address.wrapping_neg() & (align - 1);
        let size = size_of::<T>()
            .checked_mul(count)
            .and_then(|size| size.checked_add(padding))
            .unwrap_or(usize::MAX);

        let bytes = self.allocate(size);
        bytemuck::cast_slice_mut(&mut bytes[padding..])
    }

    /// Zero-fills the whole buffer and rewinds the cursor.
    ///
    /// Used for full reinitialization, e.g. a user-triggered restart.
    pub fn reset(&mut self) {
        self.storage.fill(0);
        self.cursor = 0;
    }

    /// Rewinds the cursor without touching the contents.
    ///
    /// This is a **zero-cost** operation. Every slice handed out before the
    /// call is logically dead afterwards.
    #[inline]
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    /// Views the start of the buffer as the root value `T`, in place.
    ///
    /// # Panics
    ///
    /// Panics if the arena is smaller than `T`.
    #[must_use]
    pub fn root<T: Pod>(&self) -> &T {
        self.check_root_fits::<T>();
        bytemuck::from_bytes(&self.bytes()[..size_of::<T>()])
    }

    /// Mutable in-place view of the root value `T`.
    ///
    /// # Panics
    ///
    /// Panics if the arena is smaller than `T`.
    #[must_use]
    pub fn root_mut<T: Pod>(&mut self) -> &mut T {
        self.check_root_fits::<T>();
        bytemuck::from_bytes_mut(&mut self.bytes_mut()[..size_of::<T>()])
    }

    /// Claims the root bytes for `T` and returns the in-place view.
    ///
    /// If the cursor still sits inside the root it is advanced past it, so
    /// later allocations never alias the root value. Bytes are not touched.
    ///
    /// # Panics
    ///
    /// Panics if the arena is smaller than `T`.
    pub fn place_root<T: Pod>(&mut self) -> &mut T {
        let size = size_of::<T>();
        if self.cursor < size {
            let missing = size - self.cursor;
            self.allocate(missing);
        }
        self.root_mut()
    }

    fn check_root_fits<T>(&self) {
        assert!(
            size_of::<T>() <= self.capacity,
            "root state of {} bytes does not fit an arena of {} bytes",
            size_of::<T>(),
            self.capacity
        );
    }
}

impl Default for MemoryArena {
    /// An arena with no backing storage; call [`reserve`](Self::reserve).
    fn default() -> Self {
        Self {
            storage: Box::default(),
            capacity: 0,
            cursor: 0,
        }
    }
}

impl std::fmt::Debug for MemoryArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryArena")
            .field("capacity", &self.capacity)
            .field("used", &self.cursor)
            .finish_non_exhaustive()
    }
}
