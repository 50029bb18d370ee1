use crate::DynamicArray;

macro_rules! uni {
    ($t:ty, $u:ty $(, $($b:tt)+)?) => {
        impl<T, U, P $(, $($b)+)?> PartialEq<$u> for $t
        where
            T: PartialEq<U>,
        {
            fn eq(&self, other: &$u) -> bool {
                self[..] == other[..]
            }
        }
    };
}

macro_rules! bi {
    ($t:ty, $u:ty $(, $($b:tt)+)?) => {
        $crate::eq_impl::uni!($t, $u $(, $($b)+)?);

        impl<T, U, P $(, $($b)+)?> PartialEq<$t> for $u
        where
            U: PartialEq<T>,
        {
            fn eq(&self, other: &$t) -> bool {
                self[..] == other[..]
            }
        }
    };
}

pub(crate) use bi;
pub(crate) use uni;

crate::eq_impl::uni!(DynamicArray<T, P>, DynamicArray<U, Q>, Q);
crate::eq_impl::bi!(DynamicArray<T, P>, Vec<U>);
crate::eq_impl::bi!(DynamicArray<T, P>, [U]);
crate::eq_impl::bi!(DynamicArray<T, P>, &[U]);
crate::eq_impl::bi!(DynamicArray<T, P>, &mut [U]);
crate::eq_impl::bi!(DynamicArray<T, P>, [U; N], const N: usize);
crate::eq_impl::bi!(DynamicArray<T, P>, &[U; N], const N: usize);

impl<T, P> Eq for DynamicArray<T, P> where T: Eq {}

#[cfg(test)]
mod tests {
    use crate::{DynamicArray, Duplicate, dyn_array};

    #[test]
    fn across_policies() {
        let relocating = dyn_array![1, 2];
        let mut duplicating = DynamicArray::new_in(Duplicate);
        duplicating.extend([1, 2]);
        assert_eq!(relocating, duplicating);
    }

    #[test]
    fn against_std_sequences() {
        let array = dyn_array![1, 2, 3];
        assert_eq!(array, vec![1, 2, 3]);
        assert_eq!(vec![1, 2, 3], array);
        assert_eq!(array, [1, 2, 3]);
        assert_eq!([1, 2, 3], array);
        assert_eq!(array, &[1, 2, 3][..]);
        assert_eq!(&[1, 2, 3], array);
        assert_ne!(array, [1, 2]);
    }
}
