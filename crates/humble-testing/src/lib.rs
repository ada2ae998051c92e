//! Hosts, views and proptest strategies for exercising the reconciler
//! without a toolkit.

pub mod strategies;
pub mod testing;

pub use testing::*;

pub mod prelude {
    pub use crate::strategies::*;
    pub use crate::testing::*;
}
