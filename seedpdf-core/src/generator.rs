//! One document, start to finish.

use crate::annotations::TemplatePool;
use crate::config::{AnnotationSelection, GeneratorConfig};
use crate::corruption::CorruptionReport;
use crate::error::{Result, SeedError};
use crate::graph::{GraphBuilder, ObjectGraph, StructuralRandomizer};
use crate::writer::{OffsetMap, OffsetTrackingSerializer, Trailer, XrefTable};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shape of a generated document, as recorded in the corpus manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub version: String,
    pub objects: u32,
    /// Annotation count per page, in page order.
    pub annotations_per_page: Vec<usize>,
    pub fillers: usize,
    pub trailer: Trailer,
    pub corruption: CorruptionReport,
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    bytes: Vec<u8>,
    graph: ObjectGraph,
    offsets: OffsetMap,
    xref_offset: u64,
    startxref: u64,
    trailer: Trailer,
    corruption: CorruptionReport,
}

impl GeneratedDocument {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    pub fn offsets(&self) -> &OffsetMap {
        &self.offsets
    }

    /// True position of the `xref` keyword.
    pub fn xref_offset(&self) -> u64 {
        self.xref_offset
    }

    /// Value written after `startxref`, possibly perturbed.
    pub fn startxref(&self) -> u64 {
        self.startxref
    }

    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    pub fn corruption(&self) -> &CorruptionReport {
        &self.corruption
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            version: self.graph.version().to_string(),
            objects: self.graph.highest_number(),
            annotations_per_page: self
                .graph
                .page_nodes()
                .iter()
                .map(|p| p.annotations.len())
                .collect(),
            fillers: self.graph.fillers().len(),
            trailer: self.trailer.clone(),
            corruption: self.corruption.clone(),
        }
    }
}

/// Runs plan → build → shuffle → serialize → xref/trailer → corruption.
#[derive(Debug, Clone)]
pub struct DocumentGenerator<'a> {
    config: GeneratorConfig,
    pool: &'a TemplatePool,
}

impl<'a> DocumentGenerator<'a> {
    /// Fails when the pool cannot fill every page up to the configured bound.
    pub fn new(config: GeneratorConfig, pool: &'a TemplatePool) -> Result<Self> {
        config.validate()?;
        let bound = config.annotations_per_page;
        if pool.is_empty() && bound.min > 0 {
            return Err(SeedError::Config(format!(
                "annotations_per_page: min {} needs a non-empty template pool",
                bound.min
            )));
        }
        if config.selection == AnnotationSelection::DistinctSubset && bound.max > pool.len() {
            return Err(SeedError::Config(format!(
                "annotations_per_page: max {} exceeds the {} distinct templates available",
                bound.max,
                pool.len()
            )));
        }
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedDocument> {
        let structure = StructuralRandomizer::new(&self.config, self.pool);
        let plan = structure.plan(rng);
        let graph = GraphBuilder::new(&self.config).build(&plan, rng);
        let order = structure.shuffle(&graph, rng);

        let mut serializer = OffsetTrackingSerializer::in_memory();
        serializer.write_header(&graph.version().header())?;
        serializer.write_objects(order)?;

        let highest = graph.highest_number();
        let table = XrefTable::from_offsets(serializer.offsets(), highest);
        let xref_offset = serializer.write_xref(&table)?;

        let trailer = Trailer::sample(highest, graph.catalog(), &self.config.trailer, rng);
        let startxref = self.config.corruption.startxref(xref_offset, rng);
        serializer.write_trailer(&trailer, startxref)?;

        let mut corruption = graph.corruption().clone();
        corruption.record_startxref(startxref, xref_offset);

        let (bytes, offsets) = serializer.into_parts();
        debug!(
            version = %graph.version(),
            pages = graph.page_nodes().len(),
            objects = highest,
            bytes = bytes.len(),
            corrupted = !corruption.is_clean(),
            "generated document"
        );

        Ok(GeneratedDocument {
            bytes,
            graph,
            offsets,
            xref_offset,
            startxref,
            trailer,
            corruption,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CountRange;
    use crate::corruption::CorruptionPolicy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clean_config() -> GeneratorConfig {
        GeneratorConfig::varied().with_corruption(CorruptionPolicy::disabled())
    }

    #[test]
    fn test_document_layout() {
        let generator = DocumentGenerator::new(clean_config(), TemplatePool::standard()).unwrap();
        let doc = generator.generate(&mut StdRng::seed_from_u64(10)).unwrap();
        let bytes = doc.bytes();

        assert!(bytes.starts_with(b"%PDF-1."));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let xref = doc.xref_offset() as usize;
        assert_eq!(&bytes[xref..xref + 5], b"xref\n");
        assert_eq!(doc.startxref(), doc.xref_offset());
        assert!(doc.corruption().is_clean());
    }

    #[test]
    fn test_offsets_point_at_object_headers() {
        let generator = DocumentGenerator::new(clean_config(), TemplatePool::standard()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..25 {
            let doc = generator.generate(&mut rng).unwrap();
            for object in doc.graph().objects() {
                let offset = doc.offsets().get(object.number()).unwrap() as usize;
                let expected = format!("{} 0 obj\n", object.number());
                assert!(doc.bytes()[offset..].starts_with(expected.as_bytes()));
            }
        }
    }

    #[test]
    fn test_trailer_size_matches_objects() {
        let generator = DocumentGenerator::new(clean_config(), TemplatePool::standard()).unwrap();
        let doc = generator.generate(&mut StdRng::seed_from_u64(12)).unwrap();
        assert_eq!(doc.trailer().size, doc.graph().highest_number() + 1);
        assert_eq!(doc.trailer().root, 1);
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let generator = DocumentGenerator::new(GeneratorConfig::varied(), TemplatePool::standard()).unwrap();
        let a = generator.generate(&mut StdRng::seed_from_u64(99)).unwrap();
        let b = generator.generate(&mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.bytes(), b.bytes());
    }

    #[test]
    fn test_forced_startxref_corruption_recorded() {
        let config = clean_config().with_corruption(CorruptionPolicy::disabled().with_startxref_probability(1.0));
        let generator = DocumentGenerator::new(config, TemplatePool::standard()).unwrap();
        let doc = generator.generate(&mut StdRng::seed_from_u64(13)).unwrap();
        let drift = doc.corruption().startxref.unwrap();
        assert_eq!(drift.delta().abs(), 1);
        assert_eq!(drift.actual, doc.xref_offset());
        assert!(doc.corruption().stream_lengths.is_empty());
    }

    #[test]
    fn test_summary_reflects_graph() {
        let config = clean_config()
            .with_pages(CountRange::exactly(3))
            .with_annotations_per_page(CountRange::exactly(2))
            .with_fillers(CountRange::exactly(4));
        let generator = DocumentGenerator::new(config, TemplatePool::standard()).unwrap();
        let summary = generator.generate(&mut StdRng::seed_from_u64(14)).unwrap().summary();
        assert_eq!(summary.annotations_per_page, vec![2, 2, 2]);
        assert_eq!(summary.fillers, 4);
        // catalog + pages + 3 * (stream + 2 annots + page) + 4 fillers
        assert_eq!(summary.objects, 2 + 12 + 4);
    }

    #[test]
    fn test_distinct_subset_larger_than_pool_rejected() {
        let config = GeneratorConfig::kind_subset().with_annotations_per_page(CountRange::exactly(30));
        let err = DocumentGenerator::new(config, TemplatePool::standard()).unwrap_err();
        assert!(matches!(err, SeedError::Config(_)));
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_distinct_subset_of_whole_pool_fills_every_page() {
        let config = GeneratorConfig::kind_subset()
            .with_pages(CountRange::exactly(2))
            .with_annotations_per_page(CountRange::exactly(26));
        let generator = DocumentGenerator::new(config, TemplatePool::standard()).unwrap();
        let summary = generator.generate(&mut StdRng::seed_from_u64(15)).unwrap().summary();
        assert_eq!(summary.annotations_per_page, vec![26, 26]);
    }

    #[test]
    fn test_empty_pool_rejected_when_annotations_required() {
        let empty = TemplatePool::new(Vec::new());
        let config = clean_config().with_annotations_per_page(CountRange::exactly(2));
        assert!(matches!(
            DocumentGenerator::new(config, &empty),
            Err(SeedError::Config(_))
        ));
    }

    #[test]
    fn test_empty_pool_allowed_without_annotations() {
        let empty = TemplatePool::new(Vec::new());
        let config = clean_config().with_annotations_per_page(CountRange::exactly(0));
        let generator = DocumentGenerator::new(config, &empty).unwrap();
        let summary = generator.generate(&mut StdRng::seed_from_u64(16)).unwrap().summary();
        assert!(summary.annotations_per_page.iter().all(|&n| n == 0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GeneratorConfig::varied().with_pages(CountRange::new(3, 1));
        assert!(DocumentGenerator::new(config, TemplatePool::standard()).is_err());
    }
}
