use anyhow::Context;
use rust_citation_pa::batch::BatchRunner;
use rust_citation_pa::edge_writer::{
    report_distribution, report_labeled_distribution, EdgeListWriter,
};
use rust_citation_pa::model::SimulationModel;
use rust_citation_pa::parameters::{get_and_check_options, Command, Parameters};
use rust_citation_pa::report::{
    article_file_name, model_file_name, write_article_rows, write_model_rows, write_step_rows,
};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use pcg_rand::Pcg64;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn execute_run(
    rng: Pcg64,
    opt: &Parameters,
    steps: Option<usize>,
    every: usize,
    report_degree_distribution: bool,
    edge_list: Option<&Path>,
) -> anyhow::Result<()> {
    let config = opt.model.to_config();
    let steps = steps.unwrap_or(config.max_articles);

    let start = Instant::now();
    let mut model = SimulationModel::new(rng, config)?;
    model.run(steps)?;
    let runtime = start.elapsed();

    let mut out = stdout().lock();
    write_step_rows(model.snapshots(), every, &mut out)?;

    if report_degree_distribution {
        report_distribution(&model.degree_distribution(), &mut out)?;
        report_labeled_distribution("#TC", &model.times_cited_distribution(), &mut out)?;
    }

    if let Some(path) = edge_list {
        let file = File::create(path)
            .with_context(|| format!("cannot create edge list {}", path.display()))?;
        let mut writer = EdgeListWriter::new(BufWriter::new(file))?;
        model.graph().write_edges(&mut writer);
        writer.finish()?;
        info!(path = %path.display(), edges = model.graph().number_of_edges(), "edge list written");
    }

    writeln!(out, "runtime_s:{}", runtime.as_secs_f64())?;
    Ok(())
}

fn execute_batch(mut rng: Pcg64, opt: &Parameters, output_dir: &Path) -> anyhow::Result<()> {
    let config = opt
        .batch_config()
        .context("batch settings requested for a non-batch command")?;

    let runner = BatchRunner::new(config, &mut rng)?;

    let start = Instant::now();
    let results = runner.run()?;
    let runtime = start.elapsed();

    let experiments = runner.iterations();
    let max_steps = runner.max_steps();

    let model_path = output_dir.join(model_file_name(experiments, max_steps));
    let mut model_file = BufWriter::new(
        File::create(&model_path)
            .with_context(|| format!("cannot create {}", model_path.display()))?,
    );
    write_model_rows(&results, &mut model_file)?;
    model_file.flush()?;

    let article_path = output_dir.join(article_file_name(experiments, max_steps));
    let mut article_file = BufWriter::new(
        File::create(&article_path)
            .with_context(|| format!("cannot create {}", article_path.display()))?,
    );
    write_article_rows(&results, &mut article_file)?;
    article_file.flush()?;

    info!(
        runs = results.len(),
        model = %model_path.display(),
        articles = %article_path.display(),
        "batch results written"
    );

    println!("runtime_s:{}", runtime.as_secs_f64());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opt = get_and_check_options()?;

    let rng = if let Some(seed_value) = opt.seed_value {
        Pcg64::seed_from_u64(seed_value)
    } else {
        Pcg64::from_entropy()
    };

    match &opt.command {
        Command::Run {
            steps,
            every,
            report_degree_distribution,
            edge_list,
        } => execute_run(
            rng,
            &opt,
            *steps,
            *every,
            *report_degree_distribution,
            edge_list.as_deref(),
        ),
        Command::Batch { output_dir, .. } => execute_batch(rng, &opt, output_dir),
    }
}
