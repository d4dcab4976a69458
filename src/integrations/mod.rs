//! Key-value store backends.

pub mod store {
    pub use crate::store::*;
}

pub mod redis_store {
    pub use crate::redis_store::*;
}
