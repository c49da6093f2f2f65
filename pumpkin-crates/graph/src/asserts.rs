//! Assertions on internal invariants. Simple checks are always on; checks on hot paths run in tests
//! or with the `debug-checks` feature.

pub const PUMPKIN_ASSERT_SIMPLE: u8 = 1;
pub const PUMPKIN_ASSERT_MODERATE: u8 = 2;

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const PUMPKIN_ASSERT_LEVEL_DEFINITION: u8 = PUMPKIN_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const PUMPKIN_ASSERT_LEVEL_DEFINITION: u8 = PUMPKIN_ASSERT_MODERATE;

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::PUMPKIN_ASSERT_LEVEL_DEFINITION >= $crate::asserts::PUMPKIN_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::PUMPKIN_ASSERT_LEVEL_DEFINITION >= $crate::asserts::PUMPKIN_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

/// Checks on hot paths, such as every push onto the propagator queue.
#[macro_export]
#[doc(hidden)]
macro_rules! pumpkin_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::PUMPKIN_ASSERT_LEVEL_DEFINITION >= $crate::asserts::PUMPKIN_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}
