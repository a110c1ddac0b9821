use crate::annotations::{AnnotationKind, AnnotationRandomizer};
use crate::config::{ContentSource, GeneratorConfig};
use crate::corruption::CorruptionReport;
use crate::graph::nodes::{catalog_object, filler_object};
use crate::graph::{DocumentPlan, ObjectAllocator, PageNode, PagesNode, CATALOG_ID, PAGES_ID};
use crate::objects::{IndirectObject, ObjectId};
use crate::sampling::{random_string, Rect};
use crate::version::PdfVersion;
use rand::Rng;
use std::collections::BTreeMap;

/// Length of the `/Data` string carried by filler objects.
const FILLER_DATA_LEN: usize = 10;

/// One complete document graph, numbered densely from 1.
#[derive(Debug, Clone)]
pub struct ObjectGraph {
    version: PdfVersion,
    objects: Vec<IndirectObject>,
    pages: PagesNode,
    page_nodes: Vec<PageNode>,
    annotation_kinds: BTreeMap<u32, AnnotationKind>,
    fillers: Vec<ObjectId>,
    corruption: CorruptionReport,
}

impl ObjectGraph {
    pub fn version(&self) -> PdfVersion {
        self.version
    }

    /// Objects in ascending number order.
    pub fn objects(&self) -> &[IndirectObject] {
        &self.objects
    }

    pub fn get(&self, number: u32) -> Option<&IndirectObject> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        self.objects.get(index)
    }

    /// N, the highest object number.
    pub fn highest_number(&self) -> u32 {
        self.objects.len() as u32
    }

    pub fn catalog(&self) -> ObjectId {
        CATALOG_ID
    }

    pub fn pages(&self) -> &PagesNode {
        &self.pages
    }

    pub fn page_nodes(&self) -> &[PageNode] {
        &self.page_nodes
    }

    pub fn annotation_kind(&self, number: u32) -> Option<AnnotationKind> {
        self.annotation_kinds.get(&number).copied()
    }

    pub fn fillers(&self) -> &[ObjectId] {
        &self.fillers
    }

    /// Stream-length perturbations applied while building.
    pub fn corruption(&self) -> &CorruptionReport {
        &self.corruption
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Numbering: catalog 1, pages 2, then per page its content stream, its
    /// annotations and the page itself; fillers come last.
    pub fn build<R: Rng + ?Sized>(&self, plan: &DocumentPlan<'_>, rng: &mut R) -> ObjectGraph {
        let mut allocator = ObjectAllocator::new();
        let mut objects: BTreeMap<u32, IndirectObject> = BTreeMap::new();
        let mut annotation_kinds = BTreeMap::new();
        let mut page_nodes = Vec::with_capacity(plan.pages.len());
        let mut corruption = CorruptionReport::default();

        objects.insert(CATALOG_ID.number(), catalog_object(CATALOG_ID, PAGES_ID));

        for page_plan in &plan.pages {
            let contents = allocator.allocate();
            let stream = self.content_stream(contents, rng, &mut corruption);
            objects.insert(contents.number(), stream);

            let mut annotations = Vec::with_capacity(page_plan.templates.len());
            for template in &page_plan.templates {
                let id = allocator.allocate();
                let filled = if self.config.randomize_annotations {
                    AnnotationRandomizer::fill(template, rng)
                } else {
                    AnnotationRandomizer::verbatim(template)
                };
                annotation_kinds.insert(id.number(), filled.kind());
                objects.insert(id.number(), IndirectObject::dictionary(id, filled.into_body()));
                annotations.push(id);
            }

            let page = PageNode {
                id: allocator.allocate(),
                contents,
                annotations,
                media_box: Rect::letter(),
                modified: page_plan.modified.clone(),
            };
            objects.insert(page.id.number(), page.to_object());
            page_nodes.push(page);
        }

        let pages = PagesNode {
            id: PAGES_ID,
            kids: page_nodes.iter().map(|p| p.id).collect(),
        };
        objects.insert(PAGES_ID.number(), pages.to_object());

        let fillers: Vec<ObjectId> = (0..plan.fillers)
            .map(|_| {
                let id = allocator.allocate();
                let data = random_string(rng, FILLER_DATA_LEN);
                objects.insert(id.number(), filler_object(id, &data));
                id
            })
            .collect();

        debug_assert_eq!(objects.len() as u32, allocator.highest());

        ObjectGraph {
            version: plan.version,
            objects: objects.into_values().collect(),
            pages,
            page_nodes,
            annotation_kinds,
            fillers,
            corruption,
        }
    }

    fn content_stream<R: Rng + ?Sized>(
        &self,
        id: ObjectId,
        rng: &mut R,
        corruption: &mut CorruptionReport,
    ) -> IndirectObject {
        let data = match &self.config.content {
            ContentSource::Random { len } => random_string(rng, *len).into_bytes(),
            ContentSource::Fixed(text) => text.clone().into_bytes(),
        };
        let actual = data.len();
        let declared = self.config.corruption.stream_length(actual, rng);
        corruption.record_stream(id.number(), declared, actual);
        IndirectObject::stream(id, data, declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::TemplatePool;
    use crate::config::CountRange;
    use crate::corruption::CorruptionPolicy;
    use crate::graph::{PagePlan, StructuralRandomizer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn fixed_plan(pages: usize, per_page: usize, fillers: usize) -> DocumentPlan<'static> {
        let pool = TemplatePool::standard();
        let template = pool.get(AnnotationKind::Text).unwrap();
        DocumentPlan {
            version: PdfVersion::V1_7,
            pages: (0..pages)
                .map(|_| PagePlan {
                    templates: vec![template; per_page],
                    modified: None,
                })
                .collect(),
            fillers,
        }
    }

    #[test]
    fn test_numbering_order() {
        let config = GeneratorConfig::varied().with_corruption(CorruptionPolicy::disabled());
        let graph = GraphBuilder::new(&config).build(&fixed_plan(2, 2, 3), &mut StdRng::seed_from_u64(0));

        // 1 catalog, 2 pages, page one: 3 stream, 4-5 annots, 6 page;
        // page two: 7 stream, 8-9 annots, 10 page; fillers 11-13
        assert_eq!(graph.highest_number(), 13);
        let numbers: Vec<u32> = graph.objects().iter().map(|o| o.number()).collect();
        assert_eq!(numbers, (1..=13).collect::<Vec<_>>());

        let first = &graph.page_nodes()[0];
        assert_eq!(first.contents.number(), 3);
        assert_eq!(first.annotations.iter().map(|a| a.number()).collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(first.id.number(), 6);
        assert_eq!(graph.page_nodes()[1].id.number(), 10);
        assert_eq!(
            graph.fillers().iter().map(|f| f.number()).collect::<Vec<_>>(),
            vec![11, 12, 13]
        );
        assert!(graph.get(3).unwrap().is_stream());
        assert_eq!(graph.annotation_kind(4), Some(AnnotationKind::Text));
        assert!(graph.get(0).is_none());
        assert!(graph.get(14).is_none());
    }

    #[test]
    fn test_every_reference_resolves() {
        let config = GeneratorConfig::varied();
        let pool = TemplatePool::standard();
        let randomizer = StructuralRandomizer::new(&config, pool);
        let builder = GraphBuilder::new(&config);
        let mut rng = StdRng::seed_from_u64(1234);

        for _ in 0..100 {
            let plan = randomizer.plan(&mut rng);
            let graph = builder.build(&plan, &mut rng);
            let present: HashSet<u32> = graph.objects().iter().map(|o| o.number()).collect();

            for kid in &graph.pages().kids {
                assert!(present.contains(&kid.number()));
            }
            for page in graph.page_nodes() {
                for reference in page.references() {
                    assert!(present.contains(&reference.number()));
                }
            }
            assert_eq!(graph.pages().count(), plan.pages.len());
        }
    }

    #[test]
    fn test_stream_lengths_truthful_without_corruption() {
        let config = GeneratorConfig::varied().with_corruption(CorruptionPolicy::disabled());
        let graph = GraphBuilder::new(&config).build(&fixed_plan(5, 1, 0), &mut StdRng::seed_from_u64(8));
        for page in graph.page_nodes() {
            let stream = graph.get(page.contents.number()).unwrap();
            assert_eq!(stream.declared_length(), stream.true_length());
            assert_eq!(stream.true_length(), Some(20));
        }
        assert!(graph.corruption().is_clean());
    }

    #[test]
    fn test_forced_stream_length_corruption() {
        let config = GeneratorConfig::varied().with_corruption(CorruptionPolicy::forced());
        let graph = GraphBuilder::new(&config).build(&fixed_plan(5, 1, 0), &mut StdRng::seed_from_u64(8));
        for page in graph.page_nodes() {
            let stream = graph.get(page.contents.number()).unwrap();
            let declared = stream.declared_length().unwrap() as i64;
            let actual = stream.true_length().unwrap() as i64;
            assert_eq!((declared - actual).abs(), 1);
        }
        assert_eq!(graph.corruption().stream_lengths.len(), 5);
    }

    #[test]
    fn test_fixed_content_and_verbatim_annotations() {
        let config = GeneratorConfig::kind_subset().with_annotations_per_page(CountRange::exactly(5));
        let graph = GraphBuilder::new(&config).build(&fixed_plan(1, 1, 0), &mut StdRng::seed_from_u64(2));
        let stream = graph.get(3).unwrap();
        assert_eq!(
            stream.to_bytes(),
            b"3 0 obj\n<< /Length 46 >>\nstream\nBT /F1 12 Tf 100 700 Td (File variation) Tj ET\nendstream\nendobj\n".to_vec()
        );
        let annotation = String::from_utf8(graph.get(4).unwrap().to_bytes()).unwrap();
        assert!(annotation.contains("/Rect [50 750 70 770]"));
    }
}
