use super::article::{Article, ArticleReport, CitationRule};
use super::edge_writer::degree_distribution;
use super::error::{Result, SimulationError};
use super::graph::{CitationGraph, GraphSnapshot};
use super::statistics::Snapshot;
use super::weight_function::WeightFunction;
use super::ArticleId;
use rand::Rng;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    /// No article is created once the population reached this size.
    pub max_articles: usize,
    /// Number of articles created, without citations, during initialization.
    pub initial_seed_size: usize,
    /// Articles created while the population is smaller than this draw their target
    /// citation count from `N(population / early_mu_divisor, early_sigma)`.
    pub early_low_citation_threshold: usize,
    pub early_mu_divisor: f64,
    pub early_sigma: f64,
    pub late_mu: f64,
    pub late_sigma: f64,
    /// Attachment weight `degree**exponent + offset`.
    pub attachment_exponent: f64,
    pub attachment_offset: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_articles: 750,
            initial_seed_size: 10,
            early_low_citation_threshold: 60,
            early_mu_divisor: 2.0,
            early_sigma: 1.0,
            late_mu: 30.0,
            late_sigma: 6.0,
            attachment_exponent: 1.0,
            attachment_offset: 1.0,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_articles == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "max_articles must be positive".to_string(),
            ));
        }
        if self.initial_seed_size == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "initial_seed_size must be positive".to_string(),
            ));
        }
        if self.initial_seed_size > self.max_articles {
            return Err(SimulationError::InvalidConfiguration(format!(
                "initial_seed_size ({}) exceeds max_articles ({})",
                self.initial_seed_size, self.max_articles
            )));
        }

        self.citation_rule()?;
        self.weight_function()?;
        Ok(())
    }

    pub fn citation_rule(&self) -> Result<CitationRule> {
        CitationRule::new(
            self.early_low_citation_threshold,
            self.early_mu_divisor,
            self.early_sigma,
            self.late_mu,
            self.late_sigma,
        )
    }

    pub fn weight_function(&self) -> Result<WeightFunction> {
        WeightFunction::new(self.attachment_exponent, self.attachment_offset)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelState {
    Initializing,
    Running,
    Stopped,
}

/// Grows a citation network one article per step.
///
/// Whether the model keeps running is decided at the start of every step: a step that finds
/// the population at `max_articles` creates nothing, still collects statistics and stops the
/// model. Stepping a stopped model is an error, while `run` simply returns.
pub struct SimulationModel<R: Rng> {
    rng: R,
    config: ModelConfig,
    citation_rule: CitationRule,
    weight_function: WeightFunction,

    population: Vec<Article>,
    graph: CitationGraph,
    next_id: ArticleId,

    state: ModelState,
    step_count: usize,
    snapshots: Vec<Snapshot>,
}

impl<R: Rng> SimulationModel<R> {
    pub fn new(rng: R, config: ModelConfig) -> Result<Self> {
        config.validate()?;

        let mut model = Self {
            rng,
            citation_rule: config.citation_rule()?,
            weight_function: config.weight_function()?,

            population: Vec::with_capacity(config.max_articles),
            graph: CitationGraph::with_capacity(config.max_articles),
            next_id: 0,

            state: ModelState::Initializing,
            step_count: 0,
            snapshots: Vec::new(),

            config,
        };

        model.initialize()?;
        Ok(model)
    }

    fn initialize(&mut self) -> Result<()> {
        for _ in 0..self.config.initial_seed_size {
            let article = self.create_article(false)?;
            self.population.push(article);
        }

        self.collect_statistics();

        self.state = if self.population.len() <= self.config.max_articles {
            ModelState::Running
        } else {
            ModelState::Stopped
        };

        info!(
            seed_articles = self.population.len(),
            max_articles = self.config.max_articles,
            state = ?self.state,
            exponent = self.weight_function.exponent(),
            offset = self.weight_function.offset(),
            regime = ?self.weight_function.regime(),
            "citation model initialized"
        );
        Ok(())
    }

    pub fn step(&mut self) -> Result<()> {
        if self.state != ModelState::Running {
            return Err(SimulationError::InvalidState(format!(
                "cannot step a model in state {:?}",
                self.state
            )));
        }

        self.step_count += 1;

        if self.population.len() < self.config.max_articles {
            let article = self.create_article(true)?;

            debug!(
                step = self.step_count,
                article = article.id(),
                target = article.target_citation_count(),
                draws = article.citation_count(),
                references = article.reference_count(),
                "article created"
            );

            self.population.push(article);
        } else {
            self.state = ModelState::Stopped;
            info!(
                step = self.step_count,
                population = self.population.len(),
                "population reached max_articles, model stopped"
            );
        }

        self.collect_statistics();
        Ok(())
    }

    /// Calls `step` `n` times, stopping early once the model stopped.
    pub fn run(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            if !self.is_running() {
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    /// Creates the next article and lets it cite. Seed articles get no peers to cite.
    fn create_article(&mut self, cite_population: bool) -> Result<Article> {
        let id = self.next_id;
        let mut article =
            Article::create(id, &mut self.rng, &self.citation_rule, self.population.len())?;

        self.graph.add_node(id);

        let peers: &[Article] = if cite_population { &self.population } else { &[] };
        article.cite(&mut self.rng, peers, &mut self.graph, &self.weight_function)?;
        self.next_id += 1;

        Ok(article)
    }

    fn collect_statistics(&mut self) {
        self.snapshots.push(Snapshot::collect(
            self.step_count,
            &self.population,
            self.graph.number_of_edges(),
        ));
    }

    pub fn is_running(&self) -> bool {
        self.state == ModelState::Running
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Articles in creation order.
    pub fn population(&self) -> &[Article] {
        &self.population
    }

    pub fn article_reports(&self) -> Result<Vec<ArticleReport>> {
        self.population
            .iter()
            .map(|a| a.report(&self.graph))
            .collect()
    }

    pub fn graph(&self) -> &CitationGraph {
        &self.graph
    }

    pub fn graph_snapshot(&self) -> GraphSnapshot {
        self.graph.snapshot()
    }

    pub fn statistics_at(&self, step: usize) -> Option<&Snapshot> {
        self.snapshots.get(step)
    }

    /// One snapshot per step, starting with the one taken at initialization.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn latest_statistics(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// `(times cited, number of articles)` pairs.
    pub fn times_cited_distribution(&self) -> Vec<(usize, usize)> {
        degree_distribution(self.graph.in_degrees().into_iter())
    }

    /// `(total degree, number of articles)` pairs.
    pub fn degree_distribution(&self) -> Vec<(usize, usize)> {
        degree_distribution(self.graph.degrees().into_iter())
    }
}

#[cfg(test)]
mod test {
    use super::{Article, ArticleReport, ModelConfig, ModelState, SimulationError, SimulationModel};
    use pcg_rand::Pcg64;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn model(seed: u64, config: ModelConfig) -> SimulationModel<Pcg64> {
        SimulationModel::new(Pcg64::seed_from_u64(seed), config).unwrap()
    }

    fn small_config(max_articles: usize) -> ModelConfig {
        ModelConfig {
            max_articles,
            ..Default::default()
        }
    }

    fn assert_consistent(model: &SimulationModel<Pcg64>) {
        let population = model.population();
        let graph = model.graph();

        let references: usize = population.iter().map(Article::reference_count).sum();
        assert_eq!(references, graph.number_of_edges());

        let in_degrees: usize = graph.in_degrees().iter().sum();
        assert_eq!(in_degrees, references);

        assert!(population.len() <= model.config().max_articles);
        assert_eq!(
            graph.all_node_ids().collect::<Vec<_>>(),
            population.iter().map(Article::id).collect::<Vec<_>>()
        );

        for a in population {
            assert!(!a.referenced_articles().contains(&a.id()));
            assert!(a.referenced_articles().iter().all(|&r| r < a.id()));
            assert_eq!(graph.out_degree(a.id()).unwrap(), a.reference_count());
        }
    }

    #[test]
    fn invalid_configurations() {
        let invalid = [
            small_config(0),
            ModelConfig {
                initial_seed_size: 0,
                ..Default::default()
            },
            ModelConfig {
                max_articles: 5,
                initial_seed_size: 6,
                ..Default::default()
            },
            ModelConfig {
                late_sigma: -1.0,
                ..Default::default()
            },
            ModelConfig {
                early_sigma: -0.5,
                ..Default::default()
            },
            ModelConfig {
                early_mu_divisor: 0.0,
                ..Default::default()
            },
            ModelConfig {
                attachment_offset: -0.5,
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(matches!(
                SimulationModel::new(Pcg64::seed_from_u64(0), config),
                Err(SimulationError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn initialization_creates_uncited_seed() {
        let model = model(1, ModelConfig::default());

        assert_eq!(model.state(), ModelState::Running);
        assert_eq!(model.step_count(), 0);
        assert_eq!(model.population().len(), 10);
        assert_eq!(model.graph().number_of_nodes(), 10);
        assert_eq!(model.graph().number_of_edges(), 0);
        assert!(model.population().iter().all(|a| a.has_cited() && a.citation_count() == 0));

        let initial = model.statistics_at(0).unwrap();
        assert_eq!(initial.population_size, 10);
        assert_eq!(initial.summary.mode, 0);
        assert!(model.statistics_at(1).is_none());
    }

    #[test]
    fn each_step_adds_one_citing_article() {
        let mut model = model(2, ModelConfig::default());

        model.run(25).unwrap();
        assert_eq!(model.step_count(), 25);
        assert_eq!(model.population().len(), 35);
        assert_eq!(model.snapshots().len(), 26);

        for (step, snapshot) in model.snapshots().iter().enumerate() {
            assert_eq!(snapshot.step, step);
            assert_eq!(snapshot.population_size, 10 + step);
            assert_eq!(snapshot.articles.len(), snapshot.population_size);
        }

        let ids = model.population().iter().map(Article::id).collect::<Vec<_>>();
        assert_eq!(ids, (0..35).collect::<Vec<_>>());
        assert_consistent(&model);
    }

    #[test]
    fn early_articles_cite_half_the_population() {
        let config = ModelConfig {
            early_low_citation_threshold: 1000,
            early_sigma: 0.0,
            ..Default::default()
        };
        let mut model = model(3, config);
        model.run(5).unwrap();

        let targets = model.population()[10..]
            .iter()
            .map(|a| (a.target_citation_count(), a.citation_count()))
            .collect::<Vec<_>>();
        assert_eq!(targets, vec![(5, 5), (5, 5), (6, 6), (6, 6), (7, 7)]);
    }

    #[test]
    fn stops_at_max_articles() {
        let mut model = model(4, small_config(12));

        model.step().unwrap();
        model.step().unwrap();
        assert_eq!(model.population().len(), 12);
        assert!(model.is_running());

        // population is full: the step neither grows nor fails, but stops the model
        model.step().unwrap();
        assert_eq!(model.population().len(), 12);
        assert_eq!(model.state(), ModelState::Stopped);
        assert_eq!(model.statistics_at(3).unwrap().population_size, 12);

        assert!(matches!(model.step(), Err(SimulationError::InvalidState(_))));
        model.run(10).unwrap();
        assert_eq!(model.step_count(), 3);
        assert_eq!(model.snapshots().len(), 4);
    }

    #[test]
    fn seed_filling_the_model_stops_on_first_step() {
        let config = ModelConfig {
            max_articles: 10,
            initial_seed_size: 10,
            ..Default::default()
        };
        let mut model = model(5, config);
        assert!(model.is_running());

        model.run(100).unwrap();
        assert_eq!(model.step_count(), 1);
        assert_eq!(model.population().len(), 10);
        assert!(!model.is_running());
    }

    #[test]
    fn same_seed_same_network() {
        let run = |seed| {
            let mut model = model(seed, small_config(200));
            model.run(250).unwrap();
            (model.graph_snapshot(), model.population().to_vec())
        };

        let (graph_a, population_a) = run(77);
        let (graph_b, population_b) = run(77);
        assert_eq!(graph_a, graph_b);
        assert_eq!(population_a, population_b);

        let (graph_c, _) = run(78);
        assert_ne!(graph_a, graph_c);
    }

    #[test]
    fn reports_and_distributions() {
        let mut model = model(6, small_config(80));
        model.run(100).unwrap();
        assert_consistent(&model);

        let reports = model.article_reports().unwrap();
        assert_eq!(reports.len(), 80);

        let times_cited: usize = reports.iter().map(|r| r.times_cited).sum();
        assert_eq!(times_cited, model.graph().number_of_edges());

        let distr = model.times_cited_distribution();
        assert_eq!(distr.iter().map(|&(_, n)| n).sum::<usize>(), 80);

        let degrees = model.degree_distribution();
        let total_degree: usize = degrees.iter().map(|&(d, n)| d * n).sum();
        assert_eq!(total_degree, 2 * model.graph().number_of_edges());

        let last = model.latest_statistics().unwrap();
        let references = last.articles.iter().map(|a| a.reference_count).collect::<Vec<_>>();
        assert_eq!(last.summary, crate::statistics::Summary::from_counts(&references));
    }

    #[test]
    fn old_articles_collect_more_citations() {
        let mut model = model(9, small_config(400));
        model.run(400).unwrap();

        let reports = model.article_reports().unwrap();
        let mean_cited = |r: &[ArticleReport]| {
            r.iter().map(|x| x.times_cited).sum::<usize>() as f64 / r.len() as f64
        };
        assert!(mean_cited(&reports[..50]) > mean_cited(&reports[350..]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn network_invariants(
            seed in any::<u64>(),
            max_articles in 1usize..60,
            steps in 0usize..80,
        ) {
            let config = ModelConfig {
                max_articles,
                initial_seed_size: max_articles.min(10),
                ..Default::default()
            };
            let mut model = model(seed, config);
            model.run(steps).unwrap();

            assert_consistent(&model);
            prop_assert!(model.step_count() <= steps);
            prop_assert_eq!(model.snapshots().len(), model.step_count() + 1);
            prop_assert!(model
                .snapshots()
                .windows(2)
                .all(|w| w[0].population_size <= w[1].population_size));
        }
    }
}
