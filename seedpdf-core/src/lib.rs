//! # seedpdf
//!
//! Generates corpora of small, randomized and boundedly malformed PDF files
//! for fuzzing the annotation handling of PDF consumers.
//!
//! ## Features
//!
//! - **Template pool**: one skeleton dictionary for each of the 26 annotation subtypes
//! - **Randomized fill-in**: rectangles, colors, borders and contents text
//! - **Structural variation**: version, page count, filler objects and emission order
//! - **Offset tracking**: a cross-reference table that matches the bytes written
//! - **Bounded corruption**: stream `/Length` and `startxref` values nudged off by a little
//! - **Harvesting**: rebalanced seeds built from annotations found in existing documents
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use seedpdf::{DocumentGenerator, GeneratorConfig, Result, TemplatePool};
//!
//! # fn main() -> Result<()> {
//! let generator = DocumentGenerator::new(GeneratorConfig::varied(), TemplatePool::standard())?;
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let document = generator.generate(&mut rng)?;
//! assert!(document.bytes().starts_with(b"%PDF-1."));
//! assert!(document.bytes().ends_with(b"%%EOF\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Writing a corpus
//!
//! ```rust,no_run
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use seedpdf::{Corpus, DocumentGenerator, GeneratorConfig, TemplatePool};
//!
//! # fn main() -> seedpdf::Result<()> {
//! let generator = DocumentGenerator::new(GeneratorConfig::varied(), TemplatePool::standard())?;
//! let corpus = Corpus::new(generator, "seeds", "generated_1");
//! let manifest = corpus.run(50, &mut StdRng::from_entropy())?;
//! println!("{} written, {} failed", manifest.written, manifest.failed);
//! # Ok(())
//! # }
//! ```

pub mod annotations;
pub mod config;
pub mod corpus;
pub mod corruption;
pub mod error;
pub mod generator;
pub mod graph;
pub mod harvest;
pub mod objects;
pub mod sampling;
pub mod version;
pub mod writer;

// Re-export generation types
pub use annotations::{AnnotationKind, AnnotationRandomizer, AnnotationTemplate, TemplatePool};
pub use config::{AnnotationSelection, ContentSource, CountRange, GeneratorConfig};
pub use corruption::{CorruptionPolicy, CorruptionReport, Drift};
pub use error::{Result, SeedError};
pub use generator::{DocumentGenerator, DocumentSummary, GeneratedDocument};
pub use version::PdfVersion;

// Re-export output types
pub use corpus::{Corpus, CorpusWriter, Manifest, MANIFEST_FILE};
pub use writer::{OffsetTrackingSerializer, Trailer, TrailerOptions, XrefTable};

// Re-export harvesting types
pub use harvest::{generate_seeds, AnnotationBackend, HarvestOptions, HarvestPool, LopdfBackend};

/// Current version of seedpdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_standard_pool_covers_every_kind() {
        assert_eq!(TemplatePool::standard().len(), AnnotationKind::ALL.len());
    }
}
