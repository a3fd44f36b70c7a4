use std::collections::BTreeSet;

/// Program-counter breakpoints, iterated in address order.
///
/// Owned by the host and handed to [`Cpu::run_frame`](crate::Cpu::run_frame);
/// they survive a machine reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Breakpoints(BTreeSet<u16>);

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the address was already set.
    pub fn insert(&mut self, addr: u16) -> bool {
        self.0.insert(addr)
    }

    /// Returns `false` if the address was not set.
    pub fn remove(&mut self, addr: u16) -> bool {
        self.0.remove(&addr)
    }

    /// Flip a breakpoint. Returns whether it is set afterwards.
    pub fn toggle(&mut self, addr: u16) -> bool {
        if self.0.remove(&addr) {
            false
        } else {
            self.0.insert(addr);
            true
        }
    }

    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        self.0.contains(&addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<u16> for Breakpoints {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
