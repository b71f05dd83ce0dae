//! Qubit and classical bit addressing

use std::fmt;

/// Type-safe identifier for a qubit
///
/// Qubit `i` corresponds to bit `i` of a basis-state index, so qubit 0 is
/// the least-significant bit.
///
/// # Example
/// ```
/// use kettle_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// let q1 = QubitId::new(1);
/// assert!(q0 < q1);
/// assert_eq!(q1.mask(), 0b10);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Bit mask selecting this qubit in a basis-state index
    #[inline]
    pub const fn mask(&self) -> usize {
        1 << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}

/// Type-safe identifier for a classical bit
///
/// Classical bit 0 is rendered as the rightmost character of a counts key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClbitId(usize);

impl ClbitId {
    /// Create a new classical bit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<usize> for ClbitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_creation() {
        let q = QubitId::new(5);
        assert_eq!(q.index(), 5);
        assert_eq!(q.mask(), 32);
    }

    #[test]
    fn test_qubit_ordering() {
        let q0 = QubitId::new(0);
        let q1 = QubitId::new(1);
        let q2 = QubitId::new(2);

        assert!(q0 < q1);
        assert!(q1 < q2);
        assert!(q2 > q0);
    }

    #[test]
    fn test_display() {
        assert_eq!(QubitId::new(5).to_string(), "q5");
        assert_eq!(ClbitId::new(3).to_string(), "c3");
    }

    #[test]
    fn test_conversions() {
        let q: QubitId = 5.into();
        assert_eq!(q.index(), 5);
        let i: usize = q.into();
        assert_eq!(i, 5);

        let c: ClbitId = 2.into();
        assert_eq!(c.index(), 2);
    }
}
