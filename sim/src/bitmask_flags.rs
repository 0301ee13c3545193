use num_traits::{One, PrimInt};

use crate::types::Vec3;

/// Trait implemented by flag enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) is the bit index.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A small bitmask container over any primitive integer.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn has_any<U: FlagBitmask<Storage = T> + Copy>(&self, tags: &[U]) -> bool {
        let combined = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        (self.bits & combined) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn union(self, other: Self) -> Self {
        Self::new(self.bits | other.bits)
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

// Local mover axes: x = Lateral, y = Vertical, z = Forward.
define_bitmask_flags!(Axis, u8, {
    Lateral,
    Vertical,
    Forward,
});

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Lateral, Axis::Vertical, Axis::Forward];

    /// Component index in a local-frame vector.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Local axes along which a surface pushed the mover during one tick.
pub type BlockedAxes = BitmaskFlags<u8>;

impl BlockedAxes {
    /// Flags every local axis whose component of `local_direction` exceeds `eps` in magnitude.
    pub fn from_local_direction(local_direction: &Vec3, eps: f32) -> Self {
        let mut blocked = Self::default();
        for axis in Axis::ALL {
            if local_direction[axis.index()].abs() > eps {
                blocked.add(axis);
            }
        }
        blocked
    }

    /// Copy of `local` with every blocked component set to zero.
    pub fn zero_blocked(&self, local: &Vec3) -> Vec3 {
        let mut out = *local;
        for axis in Axis::ALL {
            if self.has(axis) {
                out[axis.index()] = 0.0;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_bits_are_distinct() {
        assert_eq!(Axis::Lateral.mask(), 0b001);
        assert_eq!(Axis::Vertical.mask(), 0b010);
        assert_eq!(Axis::Forward.mask(), 0b100);
    }

    #[test]
    fn direction_flags_only_significant_components() {
        let blocked = BlockedAxes::from_local_direction(&Vec3::new(0.0, 1.0, 5.0e-5), 1.0e-4);
        assert!(blocked.has(Axis::Vertical));
        assert!(!blocked.has(Axis::Lateral));
        assert!(!blocked.has(Axis::Forward));
    }

    #[test]
    fn zero_blocked_keeps_free_axes() {
        let mut blocked = BlockedAxes::default();
        blocked.add(Axis::Forward);

        let out = blocked.zero_blocked(&Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(out, Vec3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn union_merges_flags() {
        let mut a = BlockedAxes::default();
        a.add(Axis::Lateral);
        let mut b = BlockedAxes::default();
        b.add(Axis::Forward);

        let merged = a.union(b);
        assert!(merged.has_any(&[Axis::Lateral]));
        assert!(merged.has(Axis::Forward));
        assert!(!merged.has(Axis::Vertical));
        assert!(BlockedAxes::default().is_empty());
    }
}
