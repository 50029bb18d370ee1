use crate::RawBuffer;
use std::{
    fmt::{self, Debug, Formatter},
    iter::FusedIterator,
    ptr, slice,
};

/// An iterator that moves out of a [`DynamicArray`].
///
/// This struct is created by the [`into_iter`] method, provided by the
/// [`IntoIterator`] trait. It takes over the array's buffer; elements that
/// are never yielded are dropped along with it.
///
/// [`DynamicArray`]: crate::DynamicArray
/// [`into_iter`]: crate::DynamicArray::into_iter
pub struct IntoIter<T> {
    buffer: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// # Safety
    ///
    /// The first `len` slots of `buffer` must be live, and ownership of them
    /// passes to the iterator.
    pub(crate) unsafe fn new(buffer: RawBuffer<T>, len: usize) -> Self {
        Self {
            buffer,
            start: 0,
            end: len,
        }
    }

    /// Returns the elements that have not been yielded yet.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: Slots [start, end) are live.
        unsafe { slice::from_raw_parts(self.buffer.slot(self.start), self.end - self.start) }
    }

    /// Returns the elements that have not been yielded yet, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: Slots [start, end) are live and we have exclusive access.
        unsafe { slice::from_raw_parts_mut(self.buffer.slot(self.start), self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        } else {
            // SAFETY: The slot is live and start moves past it, so it is read
            // exactly once.
            let out = unsafe { self.buffer.slot(self.start).read() };
            self.start += 1;
            Some(out)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            None
        } else {
            self.end -= 1;
            // SAFETY: As in next.
            Some(unsafe { self.buffer.slot(self.end).read() })
        }
    }
}

impl<T> Debug for IntoIter<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining: *mut [T] = self.as_mut_slice();
        self.start = self.end;
        // SAFETY: The remaining elements are live and no longer reachable
        // through the iterator. The buffer releases its block afterwards.
        unsafe { ptr::drop_in_place(remaining) };
    }
}

impl<T> FusedIterator for IntoIter<T> {}
impl<T> ExactSizeIterator for IntoIter<T> {}
