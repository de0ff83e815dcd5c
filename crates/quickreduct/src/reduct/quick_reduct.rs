//! Per-window Quick Reduct search.
//!
//! Each call to [`QuickReduct::compute_reduct`] runs four steps on one window:
//!
//! 1. group the window's instances by class
//! 2. rescore the previous window's reduct on this window
//! 3. prune attributes whose removal does not lower the score
//! 4. greedily add the attribute that raises the score most
//!
//! Candidate scores within a pruning pass or a growth round are independent
//! and may be computed in parallel; selection among them is sequential and
//! deterministic apart from the zero-score tie-break.

use std::collections::BTreeSet;

use rand_xoshiro::Xoshiro256PlusPlus;

use super::config::QuickReductConfig;
use super::granules::{dependency_degree, DecisionPartition, SimilarityRelation};
use super::state::Reduct;
use super::tie_break::{RngTieBreaker, TieBreaker};
use crate::data::{DatasetMetadata, InstanceSnapshot};
use crate::logger::ReductLogger;
use crate::utils::Parallelism;
use crate::window::Window;

// =============================================================================
// QuickReduct
// =============================================================================

/// Online Quick Reduct over consecutive windows.
///
/// Stateless across windows apart from an iteration counter used in log
/// events; the previous reduct is passed in explicitly.
///
/// # Example
///
/// ```
/// use quickreduct::reduct::{QuickReduct, QuickReductConfig, Reduct};
/// use quickreduct::testing::{numeric_metadata, separable_stream};
/// use quickreduct::window::Window;
///
/// let meta = numeric_metadata(2, 2);
/// let stream = separable_stream(20);
/// let config = QuickReductConfig::builder().build().unwrap();
///
/// let mut search = QuickReduct::new(&meta, config);
/// let reduct = search.compute_reduct(&Window::new(&stream, 0..20), &Reduct::empty());
/// assert_eq!(reduct.to_vec(), vec![0]);
/// assert!(reduct.has_max_score());
/// ```
pub struct QuickReduct<'a, T = RngTieBreaker<Xoshiro256PlusPlus>> {
    metadata: &'a DatasetMetadata,
    config: QuickReductConfig,
    tie_breaker: T,
    parallelism: Parallelism,
    logger: ReductLogger,
    iteration: usize,
}

impl<'a> QuickReduct<'a> {
    /// Search with a Xoshiro tie breaker seeded from `config.seed`.
    pub fn new(metadata: &'a DatasetMetadata, config: QuickReductConfig) -> Self {
        let tie_breaker = RngTieBreaker::seeded(config.seed);
        Self::with_tie_breaker(metadata, config, tie_breaker)
    }
}

impl<'a, T: TieBreaker> QuickReduct<'a, T> {
    /// Search with a custom tie breaker.
    pub fn with_tie_breaker(
        metadata: &'a DatasetMetadata,
        config: QuickReductConfig,
        tie_breaker: T,
    ) -> Self {
        Self {
            metadata,
            parallelism: Parallelism::from_threads(config.thread_count()),
            logger: ReductLogger::new(config.verbosity),
            config,
            tie_breaker,
            iteration: 0,
        }
    }

    pub fn metadata(&self) -> &'a DatasetMetadata {
        self.metadata
    }

    pub fn config(&self) -> &QuickReductConfig {
        &self.config
    }

    /// Number of windows processed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub(crate) fn set_parallelism(&mut self, parallelism: Parallelism) {
        self.parallelism = parallelism;
    }

    /// Dependency degree of the classes on `attributes` within `window`.
    pub fn dependency_score(&self, window: &Window<'_>, attributes: &[usize]) -> f64 {
        let partition = DecisionPartition::new(window.instances(), self.metadata.n_classes());
        let relation = SimilarityRelation::new(
            self.metadata,
            &self.config.distance,
            self.config.similarity_threshold,
        );
        dependency_degree(window.instances(), &partition, attributes, &relation)
    }

    /// Compute the reduct of `window`, warm-started from `previous`.
    ///
    /// `window` must not be empty; callers stop once the window engine is
    /// exhausted. An empty window yields an empty reduct with score 0.
    pub fn compute_reduct(&mut self, window: &Window<'_>, previous: &Reduct) -> Reduct {
        self.iteration += 1;
        let trace = Trace {
            logger: self.logger,
            metadata: self.metadata,
            iteration: self.iteration,
        };

        if window.is_empty() {
            trace.logger.warn(trace.iteration, "empty window, returning empty reduct");
            return Reduct::empty();
        }

        let instances = window.instances();
        let partition = DecisionPartition::new(instances, self.metadata.n_classes());
        trace.debug(|| {
            format!(
                "window {:?}: class sizes {:?}",
                window.bounds(),
                partition.class_sizes()
            )
        });

        let scorer = Scorer {
            instances,
            partition: &partition,
            relation: SimilarityRelation::new(
                self.metadata,
                &self.config.distance,
                self.config.similarity_threshold,
            ),
            parallelism: self.parallelism,
        };

        let mut reduct = previous.clone();
        let rescored = scorer.score(&reduct.to_vec());
        trace.debug(|| {
            format!(
                "previous reduct {} rescored {:.4} -> {:.4}",
                trace.names(&reduct),
                previous.score(),
                rescored
            )
        });
        reduct.rescore(rescored);

        let removed = prune(&scorer, &mut reduct, &trace);
        let growth = Growth {
            n_attributes: self.metadata.n_attributes(),
            max_stalled_rounds: self.config.max_stalled_rounds,
        };
        let rounds = growth.run(&scorer, &mut reduct, &removed, &mut self.tie_breaker, &trace);
        trace.debug(|| format!("growth scores {rounds:.4?}"));

        trace.debug(|| format!("reduct {}", reduct.describe(self.metadata)));
        reduct
    }
}

impl<T> std::fmt::Debug for QuickReduct<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickReduct")
            .field("dataset", &self.metadata.name())
            .field("config", &self.config)
            .field("parallelism", &self.parallelism)
            .field("iteration", &self.iteration)
            .finish()
    }
}

// =============================================================================
// Scoring
// =============================================================================

/// Scores attribute sets against one window.
struct Scorer<'s> {
    instances: &'s [InstanceSnapshot],
    partition: &'s DecisionPartition,
    relation: SimilarityRelation<'s>,
    parallelism: Parallelism,
}

impl Scorer<'_> {
    fn score(&self, attributes: &[usize]) -> f64 {
        dependency_degree(self.instances, self.partition, attributes, &self.relation)
    }

    /// Score every subset; output order matches input order.
    fn score_all(&self, subsets: Vec<Vec<usize>>) -> Vec<f64> {
        self.parallelism
            .maybe_par_map(subsets, |subset| self.score(&subset))
    }
}

/// Logging context of one `compute_reduct` call.
struct Trace<'m> {
    logger: ReductLogger,
    metadata: &'m DatasetMetadata,
    iteration: usize,
}

impl Trace<'_> {
    fn debug(&self, message: impl FnOnce() -> String) {
        self.logger.debug(self.iteration, message);
    }

    fn name(&self, attribute: usize) -> String {
        match self.metadata.attribute_name(attribute) {
            Some(name) => name.to_string(),
            None => format!("#{attribute}"),
        }
    }

    fn names(&self, reduct: &Reduct) -> String {
        let names: Vec<String> = reduct.iter().map(|a| self.name(a)).collect();
        format!("{{{}}}", names.join(", "))
    }
}

// =============================================================================
// Backward pruning
// =============================================================================

/// Remove redundant attributes, one at a time.
///
/// In each pass the first attribute (ascending) whose removal keeps the score
/// at least as high is dropped and the pass restarts on the smaller reduct.
/// Singletons are never pruned. Returns the removed attributes.
fn prune(scorer: &Scorer<'_>, reduct: &mut Reduct, trace: &Trace<'_>) -> BTreeSet<usize> {
    let mut removed = BTreeSet::new();

    while reduct.len() > 1 {
        let members = reduct.to_vec();
        let subsets: Vec<Vec<usize>> = members
            .iter()
            .map(|&attr| members.iter().copied().filter(|&a| a != attr).collect())
            .collect();
        let scores = scorer.score_all(subsets);

        let current = reduct.score();
        let Some((attr, score)) = members
            .into_iter()
            .zip(scores)
            .find(|&(_, score)| score >= current)
        else {
            break;
        };

        reduct.remove(attr, score);
        removed.insert(attr);
        trace.debug(|| {
            format!(
                "pruned {} ({:.4} -> {:.4})",
                trace.name(attr),
                current,
                score
            )
        });
    }

    if !removed.is_empty() {
        trace.debug(|| {
            let names: Vec<String> = removed.iter().map(|&a| trace.name(a)).collect();
            format!("removed [{}]", names.join(", "))
        });
    }
    removed
}

// =============================================================================
// Forward growth
// =============================================================================

struct Growth {
    n_attributes: usize,
    max_stalled_rounds: usize,
}

impl Growth {
    /// Greedily extend `reduct`.
    ///
    /// Each round scores `reduct ∪ {a}` for every attribute not in the reduct
    /// and not just pruned. The best positive score wins, lowest index first;
    /// if every candidate scores 0 the tie breaker picks one. The winner is
    /// added when it improves the score, or when both scores are 0. Growth
    /// stops at score 1, when no candidates remain, or after
    /// `max_stalled_rounds` consecutive rounds without an addition.
    ///
    /// Returns the reduct score before the first round followed by the score
    /// after each round.
    fn run<T: TieBreaker>(
        &self,
        scorer: &Scorer<'_>,
        reduct: &mut Reduct,
        removed: &BTreeSet<usize>,
        tie_breaker: &mut T,
        trace: &Trace<'_>,
    ) -> Vec<f64> {
        let mut rounds = vec![reduct.score()];
        let mut stalled = 0;

        while !reduct.has_max_score() {
            let candidates: Vec<usize> = (0..self.n_attributes)
                .filter(|a| !reduct.contains(*a) && !removed.contains(a))
                .collect();
            if candidates.is_empty() {
                break;
            }

            let members = reduct.to_vec();
            let subsets: Vec<Vec<usize>> = candidates
                .iter()
                .map(|&candidate| with_attribute(&members, candidate))
                .collect();
            let scores = scorer.score_all(subsets);

            let best = scores.iter().copied().fold(0.0_f64, f64::max);
            let position = if best > 0.0 {
                scores.iter().position(|&s| s == best).unwrap_or(0)
            } else {
                tie_breaker.pick(candidates.len()).min(candidates.len() - 1)
            };
            let (attr, score) = (candidates[position], scores[position]);
            trace.debug(|| {
                format!(
                    "best candidate {} of {}: {:.4}",
                    trace.name(attr),
                    candidates.len(),
                    score
                )
            });

            let current = reduct.score();
            if score > current || (score == 0.0 && current == 0.0) {
                reduct.add(attr, score);
                stalled = 0;
                trace.debug(|| format!("added {} ({:.4} -> {:.4})", trace.name(attr), current, score));
            } else {
                stalled += 1;
            }
            rounds.push(reduct.score());
            if stalled >= self.max_stalled_rounds {
                break;
            }
        }
        rounds
    }
}

/// `members` with `attribute` inserted in ascending position.
fn with_attribute(members: &[usize], attribute: usize) -> Vec<usize> {
    let mut subset = Vec::with_capacity(members.len() + 1);
    subset.extend_from_slice(members);
    let at = subset.partition_point(|&a| a < attribute);
    subset.insert(at, attribute);
    subset
}
