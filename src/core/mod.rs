pub mod config;

pub use config::{DetectionConfig, PerformanceConfig, ValidatorOptions};
