//! Row oriented CSV output of per-step statistics and batch results.

use super::batch::RunResult;
use super::statistics::Snapshot;
use itertools::Itertools;
use std::io::{Result, Write};

/// Writes every `every`-th snapshot, and always the last one.
pub fn write_step_rows(
    snapshots: &[Snapshot],
    every: usize,
    writer: &mut impl Write,
) -> Result<()> {
    let every = every.max(1);
    writeln!(writer, "step,population,edges,mean,median,mode")?;

    for (i, s) in snapshots.iter().enumerate() {
        if s.step % every != 0 && i + 1 != snapshots.len() {
            continue;
        }

        writeln!(
            writer,
            "{},{},{},{},{},{}",
            s.step,
            s.population_size,
            s.number_of_edges,
            s.summary.mean,
            s.summary.median,
            s.summary.mode
        )?;
    }

    Ok(())
}

/// One row per run.
pub fn write_model_rows(results: &[RunResult], writer: &mut impl Write) -> Result<()> {
    writeln!(
        writer,
        "run,iteration,max_articles,seed,steps,population,edges,mean,median,mode"
    )?;

    for r in results {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            r.job.run_id,
            r.job.iteration,
            r.job.max_articles,
            r.job.seed,
            r.steps,
            r.population_size,
            r.number_of_edges,
            r.summary.mean,
            r.summary.median,
            r.summary.mode
        )?;
    }

    Ok(())
}

/// One row per article and run; referenced ids are joined by `;`.
pub fn write_article_rows(results: &[RunResult], writer: &mut impl Write) -> Result<()> {
    writeln!(
        writer,
        "run,iteration,max_articles,article,target_citation_count,citation_count,reference_count,times_cited,referenced_articles"
    )?;

    for r in results {
        for a in &r.articles {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{}",
                r.job.run_id,
                r.job.iteration,
                r.job.max_articles,
                a.id,
                a.target_citation_count,
                a.citation_count,
                a.reference_count,
                a.times_cited,
                a.referenced_articles.iter().join(";")
            )?;
        }
    }

    Ok(())
}

pub fn model_file_name(experiments: usize, max_steps: usize) -> String {
    format!(
        "citation_model_experiments_{}_max_steps_{}.csv",
        experiments, max_steps
    )
}

pub fn article_file_name(experiments: usize, max_steps: usize) -> String {
    format!(
        "citation_articles_experiments_{}_max_steps_{}.csv",
        experiments, max_steps
    )
}
