//! Testing utilities and harness for sprig.

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
