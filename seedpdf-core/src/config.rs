//! Generator configuration.

use crate::corruption::CorruptionPolicy;
use crate::error::{Result, SeedError};
use crate::version::PdfVersion;
use crate::writer::TrailerOptions;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Size threshold above which a written document triggers a warning.
pub const DEFAULT_SIZE_BUDGET: usize = 10 * 1024;

/// Inclusive count range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: usize,
    pub max: usize,
}

impl CountRange {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn exactly(count: usize) -> Self {
        Self::new(count, count)
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// How annotation kinds are picked for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationSelection {
    /// Each slot draws uniformly from the whole pool.
    WithReplacement,
    /// Distinct kinds in shuffled order, capped at the pool size.
    DistinctSubset,
}

/// Payload of the per-page content streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// Random alphanumeric text of the given length.
    Random { len: usize },
    /// The same operator text on every page.
    Fixed(String),
}

impl ContentSource {
    pub fn text_operators() -> Self {
        ContentSource::Fixed("BT /F1 12 Tf 100 700 Td (File variation) Tj ET".to_string())
    }
}

/// Everything the structural randomizer and builder need to produce a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Header versions, drawn uniformly per document.
    pub versions: Vec<PdfVersion>,
    pub pages: CountRange,
    pub annotations_per_page: CountRange,
    pub selection: AnnotationSelection,
    pub fillers: CountRange,
    /// Permute physical object order independently of numbering.
    pub shuffle_emission: bool,
    /// Sample geometry and colors instead of copying skeletons verbatim.
    pub randomize_annotations: bool,
    pub content: ContentSource,
    /// Chance that a page carries a `/Modified` date.
    pub modified_probability: f64,
    pub trailer: TrailerOptions,
    pub corruption: CorruptionPolicy,
    /// Bytes; larger documents are still written but flagged.
    pub size_budget: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::varied()
    }
}

impl GeneratorConfig {
    /// Multi-page documents with shuffled objects, fillers and random noise.
    pub fn varied() -> Self {
        Self {
            versions: vec![PdfVersion::V1_4, PdfVersion::V1_5, PdfVersion::V1_7],
            pages: CountRange::new(1, 5),
            annotations_per_page: CountRange::new(1, 5),
            selection: AnnotationSelection::WithReplacement,
            fillers: CountRange::new(0, 5),
            shuffle_emission: true,
            randomize_annotations: true,
            content: ContentSource::Random { len: 20 },
            modified_probability: 0.3,
            trailer: TrailerOptions::default(),
            corruption: CorruptionPolicy::default(),
            size_budget: DEFAULT_SIZE_BUDGET,
        }
    }

    /// One well-formed page carrying a shuffled subset (at least five) of all kinds.
    pub fn kind_subset() -> Self {
        Self {
            versions: vec![PdfVersion::V1_4],
            pages: CountRange::exactly(1),
            annotations_per_page: CountRange::new(5, 26),
            selection: AnnotationSelection::DistinctSubset,
            fillers: CountRange::exactly(0),
            shuffle_emission: false,
            randomize_annotations: false,
            content: ContentSource::text_operators(),
            modified_probability: 0.0,
            trailer: TrailerOptions::required_only(),
            corruption: CorruptionPolicy::disabled(),
            size_budget: DEFAULT_SIZE_BUDGET,
        }
    }

    pub fn with_pages(mut self, pages: CountRange) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_annotations_per_page(mut self, annotations: CountRange) -> Self {
        self.annotations_per_page = annotations;
        self
    }

    pub fn with_fillers(mut self, fillers: CountRange) -> Self {
        self.fillers = fillers;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle_emission = shuffle;
        self
    }

    pub fn with_corruption(mut self, corruption: CorruptionPolicy) -> Self {
        self.corruption = corruption;
        self
    }

    pub fn with_trailer(mut self, trailer: TrailerOptions) -> Self {
        self.trailer = trailer;
        self
    }

    pub fn with_size_budget(mut self, bytes: usize) -> Self {
        self.size_budget = bytes;
        self
    }

    /// Load a configuration from JSON; missing fields take the `varied` defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.versions.is_empty() {
            return Err(SeedError::Config("versions must not be empty".to_string()));
        }
        for (name, range) in [
            ("pages", self.pages),
            ("annotations_per_page", self.annotations_per_page),
            ("fillers", self.fillers),
        ] {
            if range.min > range.max {
                return Err(SeedError::Config(format!(
                    "{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        if self.pages.min == 0 {
            return Err(SeedError::Config(
                "pages: a document needs at least one page".to_string(),
            ));
        }
        for (name, probability) in [
            ("modified_probability", self.modified_probability),
            ("trailer.info_probability", self.trailer.info_probability),
            (
                "trailer.xref_stream_hint_probability",
                self.trailer.xref_stream_hint_probability,
            ),
            (
                "corruption.stream_length_probability",
                self.corruption.stream_length_probability,
            ),
            (
                "corruption.startxref_probability",
                self.corruption.startxref_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&probability) {
                return Err(SeedError::Config(format!(
                    "{name}: {probability} is not a probability"
                )));
            }
        }
        if self.corruption.magnitude != 1 {
            return Err(SeedError::Config(format!(
                "corruption.magnitude: {} (declared values may only drift by 1)",
                self.corruption.magnitude
            )));
        }
        if let ContentSource::Random { len: 0 } = self.content {
            return Err(SeedError::Config(
                "content: random payload length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
