//! Testing utilities and fakes for Treedo

pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::testing::*;
}
