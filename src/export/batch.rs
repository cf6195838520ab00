use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::decode::ImageSource;
use crate::export::encode::{OutputFormat, encode};
use crate::foundation::core::Side;
use crate::foundation::error::{PairframeError, PairframeResult};
use crate::model::PairJob;
use crate::render::composer::{Compositor, FrameInputs};
use crate::render::target::RenderTarget;
use crate::text::fonts::FontBook;

/// Export settings.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    pub format: OutputFormat,
    pub target: RenderTarget,
    /// Directory relative photo paths are resolved against.
    pub base_dir: Option<PathBuf>,
    /// Optional explicit worker thread count for batch export.
    pub threads: Option<usize>,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            target: RenderTarget::Export,
            base_dir: None,
            threads: None,
        }
    }
}

impl ExportOpts {
    /// Defaults overridden by `PAIRFRAME_JPEG_QUALITY` and `PAIRFRAME_EXPORT_THREADS`.
    ///
    /// Unparseable or out-of-range values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut opts = Self::default();
        if let Some(q) = lookup("PAIRFRAME_JPEG_QUALITY")
            .and_then(|v| v.trim().parse::<u8>().ok())
            .filter(|q| (1..=100).contains(q))
        {
            opts.format = OutputFormat::Jpeg(q);
        }
        opts.threads = lookup("PAIRFRAME_EXPORT_THREADS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0);
        opts
    }

    fn resolve(&self, photo: &str) -> PathBuf {
        let p = Path::new(photo);
        match &self.base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.to_path_buf(),
        }
    }
}

/// One encoded composite, ready for download or archiving.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `"{name}_combined.{ext}"`, with path separators in `name` replaced.
pub fn export_file_name(name: &str, format: OutputFormat) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "pair" } else { stem.as_str() };
    format!("{stem}_combined.{}", format.extension())
}

/// Load, compose, and encode one job.
#[tracing::instrument(skip(compositor, job, opts), fields(job = %job.name))]
pub fn export_pair(
    compositor: &mut Compositor,
    job: &PairJob,
    opts: &ExportOpts,
) -> PairframeResult<ExportedImage> {
    let load = |side: Side| {
        ImageSource::Path(opts.resolve(job.photo(side)))
            .load()
            .map_err(|e| e.with_side(side))
    };
    let (left, right) = rayon::join(|| load(Side::Left), || load(Side::Right));
    let (left, right) = (left?, right?);

    let mut inputs = FrameInputs::new(&left, &right).with_transforms(job.transform);
    inputs.text = job.text_options.as_ref();
    let frame = compositor.render(&inputs, opts.target)?;

    Ok(ExportedImage {
        file_name: export_file_name(&job.name, opts.format),
        bytes: encode(&frame, opts.format)?,
    })
}

/// Export many jobs in parallel, one compositor per worker.
///
/// Results come back in job order; a failed job does not affect the others.
pub fn export_batch(
    fonts: &FontBook,
    jobs: &[PairJob],
    opts: &ExportOpts,
) -> PairframeResult<Vec<PairframeResult<ExportedImage>>> {
    let pool = build_thread_pool(opts.threads)?;
    tracing::debug!(jobs = jobs.len(), threads = pool.current_num_threads(), "batch export");

    let results = pool.install(|| {
        jobs.par_iter()
            .map_init(
                || Compositor::new(fonts.clone()),
                |compositor, job| export_pair(compositor, job, opts),
            )
            .collect::<Vec<_>>()
    });

    for (job, result) in jobs.iter().zip(&results) {
        if let Err(e) = result {
            tracing::warn!(job = %job.name, error = %e, "export failed");
        }
    }
    Ok(results)
}

/// Write exported files into `dir`, creating it if needed. Returns the written paths.
///
/// Repeated file names get a numeric suffix (`jane_combined_2.jpg`) so no export overwrites
/// another from the same call.
pub fn write_exports(
    dir: impl AsRef<Path>,
    exports: &[ExportedImage],
) -> PairframeResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let mut taken = HashSet::with_capacity(exports.len());
    let mut written = Vec::with_capacity(exports.len());
    for export in exports {
        let file_name = unique_file_name(&export.file_name, &taken);
        if file_name != export.file_name {
            tracing::debug!(from = %export.file_name, to = %file_name, "rename duplicate export");
        }
        let path = dir.join(&file_name);
        taken.insert(file_name);
        std::fs::write(&path, &export.bytes)
            .with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn unique_file_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_owned();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (2..)
        .map(|n| match ext {
            Some(ext) => format!("{stem}_{n}.{ext}"),
            None => format!("{stem}_{n}"),
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_owned())
}

fn build_thread_pool(threads: Option<usize>) -> PairframeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PairframeError::validation(
            "export 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PairframeError::validation(format!("failed to build rayon thread pool: {e}")))
}
