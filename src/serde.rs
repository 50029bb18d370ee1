use crate::{DynamicArray, TransferPolicy};
use serde::{
    de::{Deserialize, Deserializer, SeqAccess, Visitor},
    ser::{Serialize, SerializeSeq, Serializer},
};
use std::{
    fmt::{self, Formatter},
    marker::PhantomData,
};

/// Upper bound on what a length hint from the input may preallocate.
const MAX_PREALLOCATED_BYTES: usize = 1 << 20;

impl<T, P> Serialize for DynamicArray<T, P>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for el in self {
            seq.serialize_element(el)?;
        }
        seq.end()
    }
}

impl<'de, T, P> Deserialize<'de> for DynamicArray<T, P>
where
    T: Deserialize<'de>,
    P: TransferPolicy<T>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ArrayVisitor(PhantomData))
    }
}

struct ArrayVisitor<T, P>(PhantomData<fn() -> (T, P)>);

impl<'de, T, P> Visitor<'de> for ArrayVisitor<T, P>
where
    T: Deserialize<'de>,
    P: TransferPolicy<T>,
{
    type Value = DynamicArray<T, P>;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut out = DynamicArray::<T, P>::default();
        let element_size = size_of::<T>().max(1);
        let hint = seq.size_hint().unwrap_or(0);
        out.reserve(hint.min(MAX_PREALLOCATED_BYTES / element_size));
        while let Some(next) = seq.next_element()? {
            out.push(next);
        }
        Ok(out)
    }
}
