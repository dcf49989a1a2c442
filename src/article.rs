use super::error::{Result, SimulationError};
use super::graph::CitationGraph;
use super::sampler::WeightedSampler;
use super::weight_function::WeightFunction;
use super::ArticleId;
use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Chooses the normal distribution an article draws its target citation count from.
///
/// While the population is smaller than `early_low_citation_threshold`, the mean is
/// `population_size / early_mu_divisor` with spread `early_sigma`; afterwards a fixed
/// `Normal(late_mu, late_sigma)` is used.
#[derive(Clone, Debug)]
pub struct CitationRule {
    early_low_citation_threshold: usize,
    early_mu_divisor: f64,
    early_sigma: f64,
    late: Normal<f64>,
}

impl CitationRule {
    pub fn new(
        early_low_citation_threshold: usize,
        early_mu_divisor: f64,
        early_sigma: f64,
        late_mu: f64,
        late_sigma: f64,
    ) -> Result<Self> {
        if !early_mu_divisor.is_finite() || early_mu_divisor <= 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "early mu divisor must be finite and positive, got {}",
                early_mu_divisor
            )));
        }

        // the early distribution is only built on demand, so check its spread now
        Self::normal(0.0, early_sigma)?;

        Ok(Self {
            early_low_citation_threshold,
            early_mu_divisor,
            early_sigma,
            late: Self::normal(late_mu, late_sigma)?,
        })
    }

    pub fn early_low_citation_threshold(&self) -> usize {
        self.early_low_citation_threshold
    }

    pub fn is_early(&self, population_size: usize) -> bool {
        population_size < self.early_low_citation_threshold
    }

    pub fn distribution(&self, population_size: usize) -> Result<Normal<f64>> {
        if self.is_early(population_size) {
            Self::normal(
                population_size as f64 / self.early_mu_divisor,
                self.early_sigma,
            )
        } else {
            Ok(self.late)
        }
    }

    /// Draws a target citation count, truncated towards zero. The result may be negative.
    pub fn draw_target(&self, rng: &mut impl Rng, population_size: usize) -> Result<i64> {
        let x: f64 = self.distribution(population_size)?.sample(rng);
        Ok(x.trunc() as i64)
    }

    fn normal(mu: f64, sigma: f64) -> Result<Normal<f64>> {
        if !mu.is_finite() || !sigma.is_finite() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "citation count distribution needs finite parameters, got mu={} sigma={}",
                mu, sigma
            )));
        }
        if sigma < 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "citation count spread must not be negative, got sigma={}",
                sigma
            )));
        }

        Normal::new(mu, sigma).map_err(|e| {
            SimulationError::InvalidConfiguration(format!(
                "citation count distribution N({}, {}): {:?}",
                mu, sigma, e
            ))
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Article {
    id: ArticleId,
    target_citation_count: i64,
    citation_draws: Vec<ArticleId>,
    referenced_articles: Vec<ArticleId>,
    has_cited: bool,
}

/// Per-article values exposed for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleReport {
    pub id: ArticleId,
    pub target_citation_count: i64,
    pub citation_count: usize,
    pub reference_count: usize,
    pub referenced_articles: Vec<ArticleId>,
    pub times_cited: usize,
    pub out_degree: usize,
}

impl Article {
    pub fn new(id: ArticleId, target_citation_count: i64) -> Self {
        Self {
            id,
            target_citation_count,
            citation_draws: Vec::new(),
            referenced_articles: Vec::new(),
            has_cited: false,
        }
    }

    /// Creates an article whose target citation count follows `rule` for the current
    /// population size.
    pub fn create(
        id: ArticleId,
        rng: &mut impl Rng,
        rule: &CitationRule,
        population_size: usize,
    ) -> Result<Self> {
        let target = rule.draw_target(rng, population_size)?;
        Ok(Self::new(id, target))
    }

    /// Draws `target_citation_count` articles from `population`, with replacement and with
    /// probability proportional to `weight_function(degree)`, then records one edge per
    /// distinct drawn article. The article itself is never a candidate.
    ///
    /// May only be called once, after the article has been added to `graph`.
    pub fn cite(
        &mut self,
        rng: &mut impl Rng,
        population: &[Article],
        graph: &mut CitationGraph,
        weight_function: &WeightFunction,
    ) -> Result<()> {
        if self.has_cited {
            return Err(SimulationError::InvalidState(format!(
                "article {} has already cited",
                self.id
            )));
        }
        if !graph.contains_node(self.id) {
            return Err(SimulationError::UnknownNode(self.id));
        }

        let candidates = population
            .iter()
            .map(|a| a.id)
            .filter(|&id| id != self.id)
            .collect_vec();

        let num_draws = self.target_citation_count.max(0) as usize;

        let draws = if num_draws == 0 || candidates.is_empty() {
            Vec::new()
        } else {
            // degrees cannot change while drawing; edges are added after the last draw
            let weights = candidates
                .iter()
                .map(|&id| graph.degree(id).map(|d| weight_function.get(d)))
                .collect::<Result<Vec<f64>>>()?;
            let sampler = WeightedSampler::new(&weights)?;

            (0..num_draws)
                .map(|_| *sampler.choose(rng, &candidates))
                .collect_vec()
        };

        self.record_draws(draws, graph)
    }

    fn record_draws(&mut self, draws: Vec<ArticleId>, graph: &mut CitationGraph) -> Result<()> {
        let referenced = draws.iter().copied().unique().collect_vec();
        for &cited in &referenced {
            graph.add_edge(self.id, cited)?;
        }

        self.citation_draws = draws;
        self.referenced_articles = referenced;
        self.has_cited = true;
        Ok(())
    }

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn target_citation_count(&self) -> i64 {
        self.target_citation_count
    }

    /// Raw draws, possibly with repetitions, in draw order.
    pub fn citation_draws(&self) -> &[ArticleId] {
        &self.citation_draws
    }

    /// Distinct cited articles in order of discovery.
    pub fn referenced_articles(&self) -> &[ArticleId] {
        &self.referenced_articles
    }

    pub fn citation_count(&self) -> usize {
        self.citation_draws.len()
    }

    pub fn reference_count(&self) -> usize {
        self.referenced_articles.len()
    }

    pub fn has_cited(&self) -> bool {
        self.has_cited
    }

    pub fn report(&self, graph: &CitationGraph) -> Result<ArticleReport> {
        Ok(ArticleReport {
            id: self.id,
            target_citation_count: self.target_citation_count,
            citation_count: self.citation_count(),
            reference_count: self.reference_count(),
            referenced_articles: self.referenced_articles.clone(),
            times_cited: graph.in_degree(self.id)?,
            out_degree: graph.out_degree(self.id)?,
        })
    }
}
