pub mod performance;

pub use performance::{BatchStats, Timer};
