#[cfg(feature = "memory-storage")]
mod memory;
mod traits;

#[cfg(feature = "memory-storage")]
pub use memory::*;
pub use traits::*;
