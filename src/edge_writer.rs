use super::*;
use itertools::Itertools;
use std::io::Write;

pub trait EdgeWriter {
    fn add_edge(&mut self, u: ArticleId, v: ArticleId);
}

/// Streams `citing,cited` lines. I/O errors are kept and reported by `finish`.
pub struct EdgeListWriter<W: Write> {
    writer: W,
    error: Option<std::io::Error>,
}

impl<W: Write> EdgeListWriter<W> {
    pub fn new(mut writer: W) -> std::io::Result<Self> {
        writer.write_all(b"citing,cited\n")?;
        Ok(Self {
            writer,
            error: None,
        })
    }

    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EdgeWriter for EdgeListWriter<W> {
    fn add_edge(&mut self, u: ArticleId, v: ArticleId) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.writer, "{},{}", u, v) {
            self.error = Some(e);
        }
    }
}

/// Sorted `(value, number of occurrences)` pairs.
pub fn degree_distribution(degrees: impl Iterator<Item = usize>) -> Vec<(usize, usize)> {
    let mut counts = degrees.counts().into_iter().collect_vec();
    counts.sort_unstable();
    counts
}

pub fn report_distribution(
    degree_distr: &[(usize, usize)],
    writer: &mut impl Write,
) -> std::io::Result<()> {
    report_labeled_distribution("#DD", degree_distr, writer)
}

pub fn report_labeled_distribution(
    label: &str,
    distr: &[(usize, usize)],
    writer: &mut impl Write,
) -> std::io::Result<()> {
    writer.write_all(
        distr
            .iter()
            .map(|&(d, n)| format!("{} {:>10}, {:>10}\n", label, d, n))
            .join("")
            .as_bytes(),
    )?;
    Ok(())
}
