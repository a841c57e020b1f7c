//! Render many records in parallel. One bad record never stops its siblings.

use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::FontSet;
use crate::foundation::error::{OgError, OgResult, RecordError, Stage};
use crate::pipeline::CardRenderer;
use crate::record::{RecordSource, reject_unusable_ids};
use crate::text::measure::{ParleyText, TextPainter};

#[derive(Clone, Copy, Debug, Default)]
pub struct BatchDriver {
    /// Worker threads; `None` lets rayon decide.
    pub threads: Option<usize>,
}

/// Outcome of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<(String, PathBuf)>,
    pub failed: Vec<RecordError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl BatchDriver {
    /// Render every source to `<out_dir>/<id>.png` with one shaping context per worker.
    ///
    /// Errors returned here abort the whole batch before any record is attempted; per-record
    /// failures, including unusable or repeated ids, land in [`BatchReport::failed`].
    pub fn run(
        &self,
        sources: Vec<RecordSource>,
        renderer: &CardRenderer<'_>,
        fonts: &FontSet,
        out_dir: &Path,
    ) -> OgResult<BatchReport> {
        self.run_with(sources, renderer, out_dir, || ParleyText::new(fonts))
    }

    /// [`BatchDriver::run`] with a caller-supplied painter per worker.
    #[tracing::instrument(skip_all, fields(records = sources.len(), out_dir = %out_dir.display()))]
    pub fn run_with<P, F>(
        &self,
        mut sources: Vec<RecordSource>,
        renderer: &CardRenderer<'_>,
        out_dir: &Path,
        make_painter: F,
    ) -> OgResult<BatchReport>
    where
        P: TextPainter,
        F: Fn() -> OgResult<P> + Sync + Send,
    {
        let pool = build_thread_pool(self.threads)?;
        let rejected = reject_unusable_ids(&mut sources);
        if rejected > 0 {
            tracing::warn!(rejected, "records with unusable or repeated ids");
        }
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

        let results = pool.install(|| {
            sources
                .into_par_iter()
                .map_init(&make_painter, |painter, source| {
                    render_one(renderer, painter, source, out_dir)
                })
                .collect::<Vec<_>>()
        });

        let mut report = BatchReport::default();
        for result in results {
            match result {
                Ok(written) => report.written.push(written),
                Err(err) => {
                    tracing::warn!(id = %err.id, stage = %err.stage, error = %err.source, "card failed");
                    report.failed.push(err);
                }
            }
        }
        tracing::info!(
            written = report.written.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        Ok(report)
    }
}

fn render_one<P: TextPainter>(
    renderer: &CardRenderer<'_>,
    painter: &mut OgResult<P>,
    source: RecordSource,
    out_dir: &Path,
) -> Result<(String, PathBuf), RecordError> {
    let id = source.id.clone();
    let painter = painter
        .as_mut()
        .map_err(|e| RecordError::new(&id, Stage::Render, OgError::render(e.to_string())))?;
    let record = source
        .into_record()
        .map_err(|e| RecordError::new(&id, Stage::Input, e))?;

    let png = renderer.render_record(&record, painter)?;

    let path = out_dir.join(format!("{id}.png"));
    std::fs::write(&path, png)
        .with_context(|| format!("write '{}'", path.display()))
        .map_err(|e| RecordError::new(&id, Stage::Write, OgError::from(e)))?;
    tracing::debug!(id = %id, path = %path.display(), "card written");
    Ok((id, path))
}

fn build_thread_pool(threads: Option<usize>) -> OgResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(OgError::validation("batch 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| OgError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/batch/batch.rs"]
mod tests;
