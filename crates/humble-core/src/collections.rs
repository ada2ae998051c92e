//! Map used by the observer registry and the view pools.
//!
//! The `std-hash` feature swaps hashbrown for the standard library map.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::HashMap;
}
