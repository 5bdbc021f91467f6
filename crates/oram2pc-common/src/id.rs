use core::fmt;
use std::sync::Arc;

/// A logical thread identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(Arc<[u8]>);

impl Default for ThreadId {
    fn default() -> Self {
        Self(vec![0].into())
    }
}

impl ThreadId {
    /// Creates a new thread ID with the provided ID.
    #[inline]
    pub fn new(id: u8) -> Self {
        Self(vec![id].into())
    }

    /// Returns the thread ID as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for ThreadId {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// A simple counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Counter(u32);

impl Counter {
    /// Increments the counter in place, returning the previous value.
    pub fn next(&mut self) -> Self {
        let prev = self.0;
        self.0 += 1;
        Self(prev)
    }

    /// Returns the current value.
    pub fn current(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
