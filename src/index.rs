use crate::DynamicArray;
use std::{
    ops::{Index, IndexMut},
    slice::SliceIndex,
};

impl<T, P, I> Index<I> for DynamicArray<T, P>
where
    I: SliceIndex<[T]>,
{
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, P, I> IndexMut<I> for DynamicArray<T, P>
where
    I: SliceIndex<[T]>,
{
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

#[cfg(test)]
mod tests {
    use crate::dyn_array;

    #[test]
    fn element_and_range() {
        let mut array = dyn_array![10, 20, 30, 40];
        array[1] += 1;
        assert_eq!(array[1], 21);
        assert_eq!(array[2..], [30, 40]);
        assert_eq!(array[..=1], [10, 21]);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds() {
        let array = dyn_array![1, 2, 3];
        let _ = array[3];
    }
}
