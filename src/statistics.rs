//! Summaries of the per-article reference counts of a population.
//!
//! All functions accept empty input and return zero in that case.

use super::article::Article;
use super::ArticleId;
use fxhash::FxHashMap;

pub fn reference_counts(population: &[Article]) -> Vec<usize> {
    population.iter().map(Article::reference_count).collect()
}

pub fn mean(counts: &[usize]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }

    counts.iter().sum::<usize>() as f64 / counts.len() as f64
}

/// Middle value of the sorted counts; the average of both middle values for even lengths.
pub fn median(counts: &[usize]) -> f64 {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 0 => (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0,
        _ => sorted[n / 2] as f64,
    }
}

/// Most frequent count. Among equally frequent values, the one whose running frequency
/// reached the maximum first (scanning `counts` in order) wins: `[2, 2, 3, 3]` has mode 2,
/// `[3, 2, 3, 2]` has mode 3.
pub fn mode(counts: &[usize]) -> usize {
    let mut frequencies: FxHashMap<usize, usize> = FxHashMap::default();
    let mut mode = 0;
    let mut max_frequency = 0;

    for &c in counts {
        let frequency = frequencies.entry(c).or_insert(0);
        *frequency += 1;

        if *frequency > max_frequency {
            max_frequency = *frequency;
            mode = c;
        }
    }

    mode
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub median: f64,
    pub mode: usize,
}

impl Summary {
    pub fn from_counts(counts: &[usize]) -> Self {
        Self {
            mean: mean(counts),
            median: median(counts),
            mode: mode(counts),
        }
    }

    /// Summary of the reference counts of `population`.
    pub fn of(population: &[Article]) -> Self {
        Self::from_counts(&reference_counts(population))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArticleCounts {
    pub id: ArticleId,
    pub citation_count: usize,
    pub reference_count: usize,
}

/// Statistics collected after a step; step 0 is the state right after initialization.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub step: usize,
    pub population_size: usize,
    pub number_of_edges: usize,
    pub summary: Summary,
    pub articles: Vec<ArticleCounts>,
}

impl Snapshot {
    pub fn collect(step: usize, population: &[Article], number_of_edges: usize) -> Self {
        Self {
            step,
            population_size: population.len(),
            number_of_edges,
            summary: Summary::of(population),
            articles: population
                .iter()
                .map(|a| ArticleCounts {
                    id: a.id(),
                    citation_count: a.citation_count(),
                    reference_count: a.reference_count(),
                })
                .collect(),
        }
    }
}
