use std::{cell::Cell, fmt, rc::Rc};

/// Shared bookkeeping for [`Probe`] values: how many are alive and how many
/// more clones may succeed before `clone` panics.
#[derive(Debug)]
pub struct Ledger {
    live: Cell<isize>,
    clones_allowed: Cell<usize>,
}

impl Ledger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            live: Cell::new(0),
            clones_allowed: Cell::new(usize::MAX),
        })
    }

    pub fn live(&self) -> isize {
        self.live.get()
    }

    pub fn allow_clones(&self, count: usize) {
        self.clones_allowed.set(count);
    }

    pub fn probe(self: &Rc<Self>, value: u32) -> Probe {
        self.live.set(self.live.get() + 1);
        Probe {
            value,
            ledger: Rc::clone(self),
        }
    }

    pub fn probes(self: &Rc<Self>, values: impl IntoIterator<Item = u32>) -> Vec<Probe> {
        values.into_iter().map(|value| self.probe(value)).collect()
    }
}

/// An element that reports its lifetime to a [`Ledger`] and whose `clone`
/// can be made to panic.
pub struct Probe {
    pub value: u32,
    ledger: Rc<Ledger>,
}

impl Clone for Probe {
    fn clone(&self) -> Self {
        let allowed = self.ledger.clones_allowed.get();
        if allowed == 0 {
            panic!("clone budget exhausted");
        }
        self.ledger.clones_allowed.set(allowed - 1);
        self.ledger.probe(self.value)
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.ledger.live.set(self.ledger.live.get() - 1);
    }
}

impl PartialEq<u32> for Probe {
    fn eq(&self, other: &u32) -> bool {
        self.value == *other
    }
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Probe({})", self.value)
    }
}

/// Panics if dropped more than once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SingleDrop(pub u8);

impl SingleDrop {
    pub const DEFAULT: Self = Self(0);
}

impl Drop for SingleDrop {
    fn drop(&mut self) {
        assert_eq!(self.0, 0);
        self.0 += 1;
    }
}
