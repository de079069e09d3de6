//! # Squat-Metrics
//!
//! Turns repaired per-frame pose and bar traces into objective squat
//! performance metrics.
//!
//! ## Components
//!
//! - **Side selection**: analyse the leg the pose model sees most confidently
//! - **Segmentation**: rep bottoms are spacing-constrained maxima of the
//!   hip-depth signal, each with a symmetric frame window
//! - **Depth quality**: the bottom knee angle falls into a below / parallel /
//!   partial band
//! - **Bar path**: horizontal dispersion of the bar within each rep window
//! - **Alignment**: hip horizontally over the ankle, frame by frame
//!
//! [`SquatAnalyzer`] wires these together and returns one immutable
//! [`MetricsRecord`] per recorded set.

pub mod alignment;
pub mod analyzer;
pub mod bar_path;
pub mod depth;
pub mod record;
pub mod request;
pub mod segmentation;
pub mod side;
pub mod summary;

pub use alignment::*;
pub use analyzer::*;
pub use bar_path::*;
pub use depth::*;
pub use record::*;
pub use request::*;
pub use segmentation::*;
pub use side::*;
pub use summary::*;
