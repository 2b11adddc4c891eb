pub mod detections;
pub mod kind;
pub mod template;

pub use detections::{ConfigurableDetections, Detection};
pub use kind::{DetectionKind, NO_VALUE, SeverityAxes};
pub use template::EntryTemplate;
