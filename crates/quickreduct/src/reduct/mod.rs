//! Rough-set reduct search.
//!
//! - [`Reduct`]: attribute subset plus dependency score
//! - [`QuickReduct`]: per-window search, warm-started from the previous reduct
//! - [`DecisionPartition`], [`information_granules`], [`dependency_degree`]:
//!   the rough-set primitives the search scores with
//! - [`TieBreaker`]: injectable choice among zero-score candidates

mod config;
mod granules;
mod quick_reduct;
mod state;
mod tie_break;

pub use config::{ConfigError, QuickReductConfig};
pub use granules::{dependency_degree, information_granules, DecisionPartition, SimilarityRelation};
pub use quick_reduct::QuickReduct;
pub use state::Reduct;
pub use tie_break::{FirstCandidate, RngTieBreaker, TieBreaker};
