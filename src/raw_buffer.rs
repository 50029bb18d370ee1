use crate::{TryReserveError, error};
use std::{
    alloc::{self, Layout},
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    mem::{self, align_of, size_of},
    ptr::NonNull,
};

/// An owned block of untyped storage with room for exactly `capacity` values
/// of `T`.
///
/// A `RawBuffer` only manages memory. It has no idea which of its slots hold
/// live values, so it **never** constructs **nor** drops a `T`: dropping the
/// buffer releases the block and nothing else. Keeping track of live slots is
/// the job of the owner, normally a [`DynamicArray`].
///
/// The block is never resized in place. Changing capacity means allocating
/// another buffer, moving the values over, and swapping the two.
///
/// For zero-sized `T`, no memory is ever requested and the recorded capacity
/// is exactly the one asked for.
///
/// ```
/// # use dynarr::RawBuffer;
/// let mut buffer = RawBuffer::<u32>::allocate(4);
/// assert_eq!(buffer.capacity(), 4);
/// unsafe {
///     buffer.slot(0).write(7);
///     assert_eq!(buffer.slot(0).read(), 7);
/// }
/// ```
///
/// [`DynamicArray`]: crate::DynamicArray
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T> Send for RawBuffer<T> where T: Send {}
unsafe impl<T> Sync for RawBuffer<T> where T: Sync {}

impl<T> RawBuffer<T> {
    /// Creates an empty buffer without allocating.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates room for `capacity` elements.
    ///
    /// A `capacity` of zero yields the empty buffer.
    ///
    /// # Panics
    ///
    /// Panics if the size of the block would exceed `isize::MAX` bytes.
    /// Allocator failure is reported through [`handle_alloc_error`].
    ///
    /// [`handle_alloc_error`]: std::alloc::handle_alloc_error
    pub fn allocate(capacity: usize) -> Self {
        error::infallible(Self::try_allocate(capacity))
    }

    /// Allocates room for `capacity` elements, returning an error instead of
    /// panicking or aborting.
    ///
    /// ```
    /// # use dynarr::{RawBuffer, TryReserveError};
    /// let error = RawBuffer::<u64>::try_allocate(usize::MAX).unwrap_err();
    /// assert_eq!(error, TryReserveError::CapacityOverflow);
    /// ```
    pub fn try_allocate(capacity: usize) -> Result<Self, TryReserveError> {
        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout =
            Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        // SAFETY: The layout has a non-zero size.
        let ptr = unsafe { alloc::alloc(layout) };
        match NonNull::new(ptr.cast::<T>()) {
            Some(ptr) => Ok(Self {
                ptr,
                capacity,
                _marker: PhantomData,
            }),
            None => {
                log::debug!("allocation of {} bytes failed", layout.size());
                Err(TryReserveError::AllocError { layout })
            }
        }
    }

    /// Releases the block and leaves the buffer empty. Calling this on an
    /// empty buffer does nothing.
    ///
    /// Values still living in the slots are leaked, not dropped.
    pub fn deallocate(&mut self) {
        if let Some(layout) = self.layout() {
            // SAFETY: The block was allocated with this same layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
        }
        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }

    /// The number of `T`-sized slots, not bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The start of the block, or `None` when the buffer has no capacity.
    pub fn address(&self) -> Option<NonNull<T>> {
        (self.capacity > 0).then_some(self.ptr)
    }

    /// A pointer to the first slot. Dangling, but well aligned, when the
    /// buffer is empty.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// A mutable pointer to the first slot. Dangling, but well aligned, when
    /// the buffer is empty.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the address of the slot at `offset`.
    ///
    /// The one-past-the-end address (`offset == capacity`) may be computed but
    /// never dereferenced.
    ///
    /// # Safety
    ///
    /// The caller must ensure that
    ///
    /// - `offset <= self.capacity()`
    ///
    /// This is checked with a debug assertion only.
    pub unsafe fn slot(&self, offset: usize) -> *mut T {
        debug_assert!(
            offset <= self.capacity,
            "slot {offset} is past the capacity of {}",
            self.capacity
        );
        // SAFETY: Caller ensures the offset stays within the block or one past
        // it.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Exchanges the blocks of two buffers. Never allocates.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the block out, leaving this buffer empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    fn layout(&self) -> Option<Layout> {
        if self.capacity == 0 || size_of::<T>() == 0 {
            return None;
        }
        // SAFETY: The same size and alignment passed validation in
        // try_allocate.
        Some(unsafe {
            Layout::from_size_align_unchecked(size_of::<T>() * self.capacity, align_of::<T>())
        })
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("address", &self.address())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        self.deallocate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_has_no_address() {
        let buffer = RawBuffer::<u64>::allocate(0);
        assert_eq!(buffer.capacity(), 0);
        assert_eq!(buffer.address(), None);
    }

    #[test]
    fn slots_are_contiguous() {
        let buffer = RawBuffer::<u64>::allocate(3);
        assert!(buffer.address().is_some());
        unsafe {
            for i in 0..3 {
                buffer.slot(i).write(i as u64 * 10);
            }
            assert_eq!(buffer.slot(3).offset_from(buffer.slot(0)), 3);
            assert_eq!(buffer.slot(2).read(), 20);
        }
    }

    #[test]
    fn swap_exchanges_blocks() {
        let mut a = RawBuffer::<u8>::allocate(2);
        let mut b = RawBuffer::<u8>::allocate(8);
        let (a_address, b_address) = (a.address(), b.address());
        a.swap(&mut b);
        assert_eq!(a.capacity(), 8);
        assert_eq!(b.capacity(), 2);
        assert_eq!(a.address(), b_address);
        assert_eq!(b.address(), a_address);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut source = RawBuffer::<String>::allocate(5);
        let address = source.address();
        let taken = source.take();
        assert_eq!(taken.capacity(), 5);
        assert_eq!(taken.address(), address);
        assert_eq!(source.capacity(), 0);
        assert_eq!(source.address(), None);
    }

    #[test]
    fn deallocate_is_idempotent() {
        let mut buffer = RawBuffer::<u32>::allocate(16);
        buffer.deallocate();
        assert_eq!(buffer.capacity(), 0);
        buffer.deallocate();
        assert_eq!(buffer.address(), None);
    }

    #[test]
    fn zero_sized_never_allocates() {
        let buffer = RawBuffer::<()>::allocate(usize::MAX);
        assert_eq!(buffer.capacity(), usize::MAX);
        assert_eq!(buffer.address(), Some(NonNull::dangling()));
    }

    #[test]
    fn oversized_request_overflows() {
        let too_many = isize::MAX as usize / size_of::<u32>() + 1;
        assert_eq!(
            RawBuffer::<u32>::try_allocate(too_many).unwrap_err(),
            TryReserveError::CapacityOverflow
        );
    }
}
