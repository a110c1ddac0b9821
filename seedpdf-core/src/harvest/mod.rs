//! Rebalanced seeds built from annotations harvested out of real documents.
//!
//! The document library is only reached through [`AnnotationBackend`]:
//! open a file, list each page's boxes and annotation dictionaries, and write
//! a fresh single-page document. The pool strips noisy widget keys once while
//! it is built and is read-only afterwards; per-seed edits happen on copies.

mod lopdf_backend;

pub use lopdf_backend::LopdfBackend;

use crate::corpus::{display_name, CorpusWriter, Manifest};
use crate::error::{Result, SeedError};
use lopdf::{Dictionary, Object};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Widget keys removed while the pool is built.
pub const WIDGET_STRIP_KEYS: [&str; 5] = ["DA", "MK", "Border", "AP", "TU"];

/// One annotation dictionary lifted out of its source document.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestedAnnotation {
    pub source: PathBuf,
    pub media_box: Object,
    pub crop_box: Object,
    pub dictionary: Dictionary,
}

impl HarvestedAnnotation {
    pub fn subtype(&self) -> Option<&[u8]> {
        match self.dictionary.get(b"Subtype") {
            Ok(Object::Name(name)) => Some(name.as_slice()),
            _ => None,
        }
    }

    pub fn is_widget(&self) -> bool {
        self.subtype() == Some(b"Widget".as_slice())
    }

    /// Rough serialized size used to prefer small annotations.
    pub fn size_proxy(&self) -> usize {
        format!("{:?}", self.dictionary).len()
    }

    /// Remove every present key; absent keys are ignored.
    pub fn remove_keys(&mut self, keys: &[&str]) -> usize {
        keys.iter()
            .filter(|key| self.dictionary.remove(key.as_bytes()).is_some())
            .count()
    }
}

/// Access to an external document object model.
pub trait AnnotationBackend {
    /// Every annotation on every page of the document at `path`.
    fn harvest(&self, path: &Path) -> Result<Vec<HarvestedAnnotation>>;

    /// One page carrying `annotations`, boxes taken from the first entry.
    /// With `strip_streams` all stream payloads inside the copies are emptied.
    fn assemble(&self, annotations: &[&HarvestedAnnotation], strip_streams: bool) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Total pool size, split evenly between widgets and other annotations.
    pub keep: usize,
    /// Upper bound of annotations per seed.
    pub max_annotations: usize,
    pub size_budget: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            keep: 400,
            max_annotations: 5,
            size_budget: crate::config::DEFAULT_SIZE_BUDGET,
        }
    }
}

/// Balanced widget / non-widget annotation pools.
#[derive(Debug, Clone, Default)]
pub struct HarvestPool {
    widgets: Vec<HarvestedAnnotation>,
    others: Vec<HarvestedAnnotation>,
}

impl HarvestPool {
    /// Harvest every `*.pdf` in `dir`, skipping files the backend cannot read.
    pub fn collect<B: AnnotationBackend>(backend: &B, dir: &Path, options: &HarvestOptions) -> Result<Self> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut harvested = Vec::new();
        for path in &paths {
            match backend.harvest(path) {
                Ok(annotations) => harvested.extend(annotations),
                Err(err) => debug!(path = %path.display(), error = %err, "skipping unreadable document"),
            }
        }

        let pool = Self::from_annotations(harvested, options);
        info!(
            documents = paths.len(),
            widgets = pool.widgets.len(),
            others = pool.others.len(),
            "annotation pools built"
        );
        Ok(pool)
    }

    /// Classify, sort smallest first, strip widget keys, keep `keep / 2` of each.
    pub fn from_annotations(annotations: Vec<HarvestedAnnotation>, options: &HarvestOptions) -> Self {
        let (mut widgets, mut others): (Vec<_>, Vec<_>) =
            annotations.into_iter().partition(HarvestedAnnotation::is_widget);

        widgets.sort_by_cached_key(HarvestedAnnotation::size_proxy);
        others.sort_by_cached_key(HarvestedAnnotation::size_proxy);

        for widget in &mut widgets {
            widget.remove_keys(&WIDGET_STRIP_KEYS);
        }

        let half = options.keep / 2;
        widgets.truncate(half);
        others.truncate(half);

        Self { widgets, others }
    }

    pub fn widgets(&self) -> &[HarvestedAnnotation] {
        &self.widgets
    }

    pub fn others(&self) -> &[HarvestedAnnotation] {
        &self.others
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty() && self.others.is_empty()
    }

    /// `count / 2` widgets and the rest from the other pool, without
    /// replacement, shuffled together. A short class is topped up from the
    /// other one; only when both run out are fewer entries returned.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<&HarvestedAnnotation> {
        let mut widget_count = (count / 2).min(self.widgets.len());
        let other_count = (count - widget_count).min(self.others.len());
        widget_count = (count - other_count).min(self.widgets.len());

        let mut chosen: Vec<&HarvestedAnnotation> = self
            .widgets
            .choose_multiple(rng, widget_count)
            .chain(self.others.choose_multiple(rng, other_count))
            .collect();
        chosen.shuffle(rng);
        chosen
    }
}

/// Write `count` seeds (`seed_001.pdf`, ...) into `output_dir`.
pub fn generate_seeds<B: AnnotationBackend, R: Rng + ?Sized>(
    backend: &B,
    pool: &HarvestPool,
    options: &HarvestOptions,
    output_dir: &Path,
    count: usize,
    rng: &mut R,
) -> Result<Manifest> {
    if pool.is_empty() {
        return Err(SeedError::EmptyPool(
            "no annotations were harvested".to_string(),
        ));
    }
    fs::create_dir_all(output_dir)?;
    let writer = CorpusWriter::new(options.size_budget);
    let mut manifest = Manifest::default();

    for index in 1..=count {
        let path = output_dir.join(format!("seed_{index:03}.pdf"));
        let file = display_name(&path);
        let wanted = rng.gen_range(1..=options.max_annotations.max(1));
        let chosen = pool.sample(wanted, rng);

        let result = build_seed(backend, &chosen, options.size_budget)
            .and_then(|bytes| writer.write(&bytes, &path));
        match result {
            Ok(outcome) => manifest.record_written(file, outcome, None),
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to write seed");
                manifest.record_failed(file, &err);
            }
        }
    }

    manifest.save(output_dir)?;
    info!(
        dir = %output_dir.display(),
        written = manifest.written,
        failed = manifest.failed,
        oversized = manifest.oversized,
        "harvest batch complete"
    );
    Ok(manifest)
}

/// Assemble once; when over budget, retry with stream payloads emptied.
fn build_seed<B: AnnotationBackend>(
    backend: &B,
    chosen: &[&HarvestedAnnotation],
    size_budget: usize,
) -> Result<Vec<u8>> {
    let bytes = backend.assemble(chosen, false)?;
    if bytes.len() <= size_budget {
        return Ok(bytes);
    }
    debug!(bytes = bytes.len(), "seed over budget, stripping stream data");
    backend.assemble(chosen, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn annotation(subtype: &str, padding: usize) -> HarvestedAnnotation {
        let mut dictionary = Dictionary::new();
        dictionary.set("Type", Object::Name(b"Annot".to_vec()));
        dictionary.set("Subtype", Object::Name(subtype.as_bytes().to_vec()));
        dictionary.set(
            "Contents",
            Object::String(vec![b'x'; padding], lopdf::StringFormat::Literal),
        );
        dictionary.set("DA", Object::String(b"/Helv 0 Tf".to_vec(), lopdf::StringFormat::Literal));
        dictionary.set("TU", Object::String(b"tooltip".to_vec(), lopdf::StringFormat::Literal));
        HarvestedAnnotation {
            source: PathBuf::from(format!("{subtype}-{padding}.pdf")),
            media_box: LopdfBackend::letter_box(),
            crop_box: LopdfBackend::letter_box(),
            dictionary,
        }
    }

    fn mixed(widgets: usize, others: usize) -> Vec<HarvestedAnnotation> {
        (0..widgets)
            .map(|i| annotation("Widget", i + 1))
            .chain((0..others).map(|i| annotation("Text", i + 1)))
            .collect()
    }

    #[test]
    fn test_pool_classifies_and_strips_widgets() {
        let pool = HarvestPool::from_annotations(mixed(3, 4), &HarvestOptions::default());
        assert_eq!(pool.widgets().len(), 3);
        assert_eq!(pool.others().len(), 4);
        for widget in pool.widgets() {
            assert!(!widget.dictionary.has(b"DA"));
            assert!(!widget.dictionary.has(b"TU"));
        }
        for other in pool.others() {
            assert!(other.dictionary.has(b"DA"));
        }
    }

    #[test]
    fn test_pool_keeps_smallest_half_of_each_class() {
        let options = HarvestOptions {
            keep: 4,
            ..HarvestOptions::default()
        };
        let pool = HarvestPool::from_annotations(mixed(5, 5), &options);
        assert_eq!(pool.widgets().len(), 2);
        assert_eq!(pool.others().len(), 2);
        let sizes: Vec<usize> = pool.others().iter().map(|a| a.size_proxy()).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(pool.others()[0].source, PathBuf::from("Text-1.pdf"));
    }

    #[test]
    fn test_sample_balances_widgets() {
        let pool = HarvestPool::from_annotations(mixed(10, 10), &HarvestOptions::default());
        let mut rng = StdRng::seed_from_u64(5);
        for count in 1..=5 {
            let chosen = pool.sample(count, &mut rng);
            assert_eq!(chosen.len(), count);
            let widgets = chosen.iter().filter(|a| a.is_widget()).count();
            assert_eq!(widgets, count / 2);
            let distinct: HashSet<&PathBuf> = chosen.iter().map(|a| &a.source).collect();
            assert_eq!(distinct.len(), count);
        }
    }

    #[test]
    fn test_sample_short_pool_yields_fewer() {
        let pool = HarvestPool::from_annotations(mixed(0, 2), &HarvestOptions::default());
        let chosen = pool.sample(5, &mut StdRng::seed_from_u64(1));
        assert_eq!(chosen.len(), 2);
    }

    #[test]
    fn test_sample_tops_up_from_other_class() {
        let mut rng = StdRng::seed_from_u64(2);

        let widgets_only = HarvestPool::from_annotations(mixed(6, 0), &HarvestOptions::default());
        for count in 1..=5 {
            let chosen = widgets_only.sample(count, &mut rng);
            assert_eq!(chosen.len(), count);
            assert!(chosen.iter().all(|a| a.is_widget()));
        }

        let few_widgets = HarvestPool::from_annotations(mixed(1, 6), &HarvestOptions::default());
        let chosen = few_widgets.sample(4, &mut rng);
        assert_eq!(chosen.len(), 4);
        assert_eq!(chosen.iter().filter(|a| a.is_widget()).count(), 1);
    }

    #[test]
    fn test_widget_only_pool_never_fails_a_seed() {
        let output = tempfile::tempdir().unwrap();
        let backend = LopdfBackend::default();
        let pool = HarvestPool::from_annotations(mixed(4, 0), &HarvestOptions::default());
        let manifest = generate_seeds(
            &backend,
            &pool,
            &HarvestOptions::default(),
            output.path(),
            10,
            &mut StdRng::seed_from_u64(6),
        )
        .unwrap();
        assert_eq!(manifest.written, 10);
        assert_eq!(manifest.failed, 0);
    }

    #[test]
    fn test_remove_keys_ignores_missing() {
        let mut annot = annotation("Widget", 1);
        assert_eq!(annot.remove_keys(&WIDGET_STRIP_KEYS), 2);
        assert_eq!(annot.remove_keys(&WIDGET_STRIP_KEYS), 0);
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate_seeds(
            &LopdfBackend::default(),
            &HarvestPool::default(),
            &HarvestOptions::default(),
            dir.path(),
            3,
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SeedError::EmptyPool(_))));
    }
}
