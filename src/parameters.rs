use crate::batch::BatchConfig;
use crate::error::{Result, SimulationError};
use crate::model::ModelConfig;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "citation_preferential_attachment",
    about = "Simulates the growth of a citation network where new articles cite by preferential attachment"
)]
pub struct Parameters {
    #[structopt(short = "s", long)]
    pub seed_value: Option<u64>,

    #[structopt(flatten)]
    pub model: ModelParameters,

    #[structopt(subcommand)]
    pub command: Command,
}

#[derive(Debug, StructOpt)]
pub struct ModelParameters {
    #[structopt(short = "n", long, default_value = "750")]
    pub max_articles: usize,

    #[structopt(short = "i", long, default_value = "10")]
    pub seed_articles: usize,

    #[structopt(long, default_value = "60")]
    pub early_threshold: usize,

    #[structopt(long, default_value = "2.0")]
    pub early_mu_divisor: f64,

    #[structopt(long, default_value = "1.0")]
    pub early_sigma: f64,

    #[structopt(long, default_value = "30.0")]
    pub late_mu: f64,

    #[structopt(long, default_value = "6.0")]
    pub late_sigma: f64,

    #[structopt(short = "e", long, default_value = "1.0")]
    pub exponent: f64,

    #[structopt(short = "c", long, default_value = "1.0")]
    pub offset: f64,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Runs one simulation and prints the statistics of every step as CSV
    Run {
        /// Number of steps; defaults to max-articles
        #[structopt(short = "t", long)]
        steps: Option<usize>,

        /// Only print every k-th step (the last step is always printed)
        #[structopt(short = "k", long, default_value = "1")]
        every: usize,

        #[structopt(short = "r", long)]
        report_degree_distribution: bool,

        /// Writes the edge list as CSV to this file
        #[structopt(long, parse(from_os_str))]
        edge_list: Option<PathBuf>,
    },

    /// Runs independent simulations over a range of max-articles and writes CSV files
    Batch {
        #[structopt(long, default_value = "100")]
        from: usize,

        /// Exclusive upper bound of max-articles
        #[structopt(long, default_value = "1000")]
        to: usize,

        #[structopt(long, default_value = "50")]
        step_by: usize,

        #[structopt(short = "x", long, default_value = "10")]
        iterations: usize,

        /// Steps per run; defaults to the largest max-articles
        #[structopt(long)]
        max_steps: Option<usize>,

        #[structopt(short = "p", long)]
        num_threads: Option<usize>,

        #[structopt(short = "o", long, parse(from_os_str), default_value = ".")]
        output_dir: PathBuf,
    },
}

impl ModelParameters {
    pub fn to_config(&self) -> ModelConfig {
        ModelConfig {
            max_articles: self.max_articles,
            initial_seed_size: self.seed_articles,
            early_low_citation_threshold: self.early_threshold,
            early_mu_divisor: self.early_mu_divisor,
            early_sigma: self.early_sigma,
            late_mu: self.late_mu,
            late_sigma: self.late_sigma,
            attachment_exponent: self.exponent,
            attachment_offset: self.offset,
        }
    }
}

impl Parameters {
    /// Batch settings, if the batch command was selected.
    pub fn batch_config(&self) -> Option<BatchConfig> {
        match self.command {
            Command::Batch {
                from,
                to,
                step_by,
                iterations,
                max_steps,
                num_threads,
                ..
            } => Some(BatchConfig {
                base: self.model.to_config(),
                max_articles: (from..to).step_by(step_by.max(1)).collect(),
                iterations,
                max_steps,
                num_threads: num_threads.unwrap_or_else(num_cpus::get),
            }),
            Command::Run { .. } => None,
        }
    }

    pub fn check(&self) -> Result<()> {
        match &self.command {
            Command::Run { every, .. } => {
                if *every == 0 {
                    return Err(SimulationError::InvalidConfiguration(
                        "every must be positive".to_string(),
                    ));
                }
                self.model.to_config().validate()
            }
            Command::Batch {
                from, to, step_by, ..
            } => {
                if *step_by == 0 || from >= to {
                    return Err(SimulationError::InvalidConfiguration(format!(
                        "empty max-articles range {}..{} step {}",
                        from, to, step_by
                    )));
                }
                Ok(())
            }
        }
    }
}

pub fn get_and_check_options() -> Result<Parameters> {
    let opt = Parameters::from_args();
    opt.check()?;
    Ok(opt)
}
