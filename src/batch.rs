use super::article::ArticleReport;
use super::error::{Result, SimulationError};
use super::model::{ModelConfig, SimulationModel};
use super::statistics::Summary;
use itertools::Itertools;
use pcg_rand::Pcg64;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Shared parameters; `max_articles` is replaced by each value of `max_articles` below.
    pub base: ModelConfig,
    pub max_articles: Vec<usize>,
    pub iterations: usize,
    /// Steps per run; defaults to the largest `max_articles`.
    pub max_steps: Option<usize>,
    pub num_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            base: ModelConfig::default(),
            max_articles: (100..1000).step_by(50).collect(),
            iterations: 10,
            max_steps: None,
            num_threads: num_cpus::get(),
        }
    }
}

/// One independent simulation of a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Job {
    pub run_id: usize,
    pub iteration: usize,
    pub max_articles: usize,
    pub seed: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub job: Job,
    pub steps: usize,
    pub population_size: usize,
    pub number_of_edges: usize,
    pub summary: Summary,
    pub articles: Vec<ArticleReport>,
}

/// Runs independent models over a grid of `max_articles` values.
///
/// Every run owns its model and a `Pcg64` seeded with a per-run seed drawn up front, so the
/// results do not depend on the number of threads.
pub struct BatchRunner {
    config: BatchConfig,
    jobs: Vec<Job>,
}

impl BatchRunner {
    pub fn new(config: BatchConfig, rng: &mut impl Rng) -> Result<Self> {
        if config.max_articles.is_empty() {
            return Err(SimulationError::InvalidConfiguration(
                "batch needs at least one max_articles value".to_string(),
            ));
        }
        if config.iterations == 0 || config.num_threads == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "iterations and num_threads must be positive".to_string(),
            ));
        }

        for &max_articles in &config.max_articles {
            Self::model_config(&config.base, max_articles).validate()?;
        }

        let jobs = config
            .max_articles
            .iter()
            .cartesian_product(0..config.iterations)
            .enumerate()
            .map(|(run_id, (&max_articles, iteration))| Job {
                run_id,
                iteration,
                max_articles,
                seed: rng.gen(),
            })
            .collect_vec();

        Ok(Self { config, jobs })
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn iterations(&self) -> usize {
        self.config.iterations
    }

    pub fn max_steps(&self) -> usize {
        self.config.max_steps.unwrap_or_else(|| {
            self.config.max_articles.iter().copied().max().unwrap_or(0)
        })
    }

    /// Executes all jobs and returns their results ordered by run id.
    pub fn run(&self) -> Result<Vec<RunResult>> {
        let num_threads = self.config.num_threads.min(self.jobs.len()).max(1);
        let max_steps = self.max_steps();

        info!(
            runs = self.jobs.len(),
            num_threads, max_steps, "starting batch"
        );

        let per_thread = crossbeam::scope(|s| {
            let handles = (0..num_threads)
                .map(|rank| {
                    let jobs = &self.jobs;
                    let base = &self.config.base;
                    s.spawn(move |_| {
                        jobs.iter()
                            .skip(rank)
                            .step_by(num_threads)
                            .map(|job| Self::execute(base, job, max_steps))
                            .collect::<Result<Vec<_>>>()
                    })
                })
                .collect_vec();

            handles
                .into_iter()
                .map(|h| h.join().map_err(|_| SimulationError::WorkerPanicked))
                .collect::<Result<Vec<_>>>()
        })
        .map_err(|_| SimulationError::WorkerPanicked)??;

        let mut results = per_thread
            .into_iter()
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect_vec();
        results.sort_unstable_by_key(|r| r.job.run_id);

        info!(runs = results.len(), "batch finished");
        Ok(results)
    }

    fn execute(base: &ModelConfig, job: &Job, max_steps: usize) -> Result<RunResult> {
        let rng = Pcg64::seed_from_u64(job.seed);
        let mut model = SimulationModel::new(rng, Self::model_config(base, job.max_articles))?;
        model.run(max_steps)?;

        let population = model.population();
        let result = RunResult {
            job: *job,
            steps: model.step_count(),
            population_size: population.len(),
            number_of_edges: model.graph().number_of_edges(),
            summary: Summary::of(population),
            articles: model.article_reports()?,
        };

        debug!(
            run = job.run_id,
            max_articles = job.max_articles,
            steps = result.steps,
            edges = result.number_of_edges,
            "run finished"
        );
        Ok(result)
    }

    fn model_config(base: &ModelConfig, max_articles: usize) -> ModelConfig {
        ModelConfig {
            max_articles,
            ..base.clone()
        }
    }
}
