//! quickreduct: online rough-set feature selection for data streams.
//!
//! Slides (or adaptively resizes) a window over a stream of labelled records
//! and, for every window, computes a Quick Reduct: a small attribute subset
//! whose information granules explain class membership as well as possible.
//! Each window's reduct warm-starts the next, so the selection tracks concept
//! drift over time.
//!
//! # Key Types
//!
//! - [`DatasetMetadata`] / [`InstanceSnapshot`] - Stream description and records
//! - [`SlidingWindow`] / [`AdaptiveWindow`] - Window engines
//! - [`QuickReduct`] / [`QuickReductConfig`] - Per-window reduct search
//! - [`ReductStream`] / [`ReductHistory`] - Whole-stream driver and results
//!
//! # Example
//!
//! ```
//! use quickreduct::{QuickReductConfig, ReductStream, WindowConfig};
//! use quickreduct::testing::{drift_stream, numeric_metadata};
//!
//! let meta = numeric_metadata(2, 2);
//! let stream = drift_stream(1000, 500, 42);
//! let config = QuickReductConfig::builder().build().unwrap();
//!
//! let window = WindowConfig::Sliding { size: 100, overlap: 50 };
//! let history = ReductStream::new(&meta, config)
//!     .run_with_config(&stream, &window, |_| {})
//!     .unwrap();
//!
//! // the informative attribute changes at the drift point
//! assert_eq!(history.windows()[0].reduct.to_vec(), vec![0]);
//! assert_eq!(history.last().unwrap().to_vec(), vec![1]);
//! ```

pub mod data;
pub mod distance;
pub mod logger;
pub mod reduct;
pub mod stream;
pub mod testing;
pub mod utils;
pub mod window;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Data model
pub use data::{AttributeKind, AttributeMeta, AttributeValue, DatasetError, DatasetMetadata, InstanceSnapshot};

// Distances
pub use distance::{DistanceFn, DistanceKind};

// Windows
pub use window::{AdaptiveWindow, SlidingWindow, Window, WindowConfig, WindowError, WindowStrategy};

// Reduct search
pub use reduct::{ConfigError, QuickReduct, QuickReductConfig, Reduct};

// Stream driver
pub use stream::{Progress, ReductHistory, ReductStream, StreamError, WindowReduct};

// Logging and shared utilities
pub use logger::Verbosity;
pub use utils::{run_with_threads, Parallelism};
