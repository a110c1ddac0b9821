//! Structural decisions that are independent of object content.

use crate::annotations::{AnnotationTemplate, TemplatePool};
use crate::config::{AnnotationSelection, GeneratorConfig};
use crate::graph::ObjectGraph;
use crate::objects::IndirectObject;
use crate::sampling::{chance, random_pdf_date};
use crate::version::PdfVersion;
use rand::seq::SliceRandom;
use rand::Rng;

/// What one page will carry.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan<'p> {
    /// Annotation templates in `/Annots` order.
    pub templates: Vec<&'p AnnotationTemplate>,
    pub modified: Option<String>,
}

/// Shape of a document, decided before any object is numbered.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan<'p> {
    pub version: PdfVersion,
    pub pages: Vec<PagePlan<'p>>,
    pub fillers: usize,
}

impl DocumentPlan<'_> {
    pub fn annotation_count(&self) -> usize {
        self.pages.iter().map(|p| p.templates.len()).sum()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StructuralRandomizer<'a> {
    config: &'a GeneratorConfig,
    pool: &'a TemplatePool,
}

impl<'a> StructuralRandomizer<'a> {
    pub fn new(config: &'a GeneratorConfig, pool: &'a TemplatePool) -> Self {
        Self { config, pool }
    }

    /// Version, page count, per-page kinds and filler count, each an independent draw.
    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> DocumentPlan<'a> {
        let version = self
            .config
            .versions
            .choose(rng)
            .copied()
            .unwrap_or(PdfVersion::V1_4);

        let page_count = self.config.pages.sample(rng);
        let pages = (0..page_count).map(|_| self.plan_page(rng)).collect();
        let fillers = self.config.fillers.sample(rng);

        DocumentPlan {
            version,
            pages,
            fillers,
        }
    }

    fn plan_page<R: Rng + ?Sized>(&self, rng: &mut R) -> PagePlan<'a> {
        let count = self.config.annotations_per_page.sample(rng);
        let templates = match self.config.selection {
            AnnotationSelection::WithReplacement => (0..count)
                .filter_map(|_| self.pool.choose(rng))
                .collect(),
            AnnotationSelection::DistinctSubset => self.pool.choose_distinct(rng, count),
        };
        let modified = chance(rng, self.config.modified_probability).then(|| random_pdf_date(rng));

        PagePlan {
            templates,
            modified,
        }
    }

    /// Physical emission order. Numbering and references are untouched.
    pub fn shuffle<'g, R: Rng + ?Sized>(
        &self,
        graph: &'g ObjectGraph,
        rng: &mut R,
    ) -> Vec<&'g IndirectObject> {
        let mut order: Vec<&IndirectObject> = graph.objects().iter().collect();
        if self.config.shuffle_emission {
            order.shuffle(rng);
        }
        order
    }
}
