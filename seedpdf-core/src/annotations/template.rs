//! Canonical annotation skeletons.
//!
//! Each skeleton is a complete annotation dictionary whose `/Rect` value is
//! the template's placeholder rectangle. The randomizer swaps that exact text
//! for sampled geometry.

use crate::annotations::AnnotationKind;
use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationTemplate {
    kind: AnnotationKind,
    skeleton: &'static str,
    placeholder: &'static str,
}

impl AnnotationTemplate {
    pub const fn new(kind: AnnotationKind, skeleton: &'static str, placeholder: &'static str) -> Self {
        Self {
            kind,
            skeleton,
            placeholder,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn skeleton(&self) -> &'static str {
        self.skeleton
    }

    pub fn placeholder(&self) -> &'static str {
        self.placeholder
    }
}

const STANDARD_TEMPLATES: [AnnotationTemplate; 26] = [
    AnnotationTemplate::new(
        AnnotationKind::Text,
        "<< /Type/Annot /Subtype /Text /Rect [50 750 70 770] /Contents (Text Annotation) >>",
        "[50 750 70 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Link,
        "<< /Type/Annot /Subtype /Link /Rect [80 750 100 770] /A << /S /URI /URI (http://example.com) >> /Contents (Link Annotation) >>",
        "[80 750 100 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::FreeText,
        "<< /Type/Annot /Subtype /FreeText /Rect [110 750 150 770] /Contents (FreeText Annotation) /DA (/Helvetica 10 Tf 0 g) >>",
        "[110 750 150 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Line,
        "<< /Type/Annot /Subtype /Line /Rect [160 750 200 770] /L [160 760 200 760] /Contents (Line Annotation) >>",
        "[160 750 200 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Square,
        "<< /Type/Annot /Subtype /Square /Rect [210 750 250 770] /BS << /W 1 >> /Contents (Square Annotation) >>",
        "[210 750 250 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Circle,
        "<< /Type/Annot /Subtype /Circle /Rect [260 750 300 770] /BS << /W 1 >> /Contents (Circle Annotation) >>",
        "[260 750 300 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Polygon,
        "<< /Type/Annot /Subtype /Polygon /Rect [310 750 350 770] /Vertices [310 760 330 780 350 760] /Contents (Polygon Annotation) >>",
        "[310 750 350 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::PolyLine,
        "<< /Type/Annot /Subtype /PolyLine /Rect [360 750 400 770] /Vertices [360 760 380 780 400 760] /Contents (PolyLine Annotation) >>",
        "[360 750 400 770]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Highlight,
        "<< /Type/Annot /Subtype /Highlight /Rect [50 700 100 720] /QuadPoints [50 720 100 720 50 700 100 700] /Contents (Highlight Annotation) >>",
        "[50 700 100 720]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Underline,
        "<< /Type/Annot /Subtype /Underline /Rect [110 700 160 720] /QuadPoints [110 720 160 720 110 700 160 700] /Contents (Underline Annotation) >>",
        "[110 700 160 720]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Squiggly,
        "<< /Type/Annot /Subtype /Squiggly /Rect [170 700 220 720] /QuadPoints [170 720 220 720 170 700 220 700] /Contents (Squiggly Annotation) >>",
        "[170 700 220 720]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::StrikeOut,
        "<< /Type/Annot /Subtype /StrikeOut /Rect [230 700 280 720] /QuadPoints [230 720 280 720 230 700 280 700] /Contents (StrikeOut Annotation) >>",
        "[230 700 280 720]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Stamp,
        "<< /Type/Annot /Subtype /Stamp /Rect [290 700 330 720] /Contents (Stamp Annotation) >>",
        "[290 700 330 720]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Caret,
        "<< /Type/Annot /Subtype /Caret /Rect [340 700 360 720] /Contents (Caret Annotation) >>",
        "[340 700 360 720]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Ink,
        "<< /Type/Annot /Subtype /Ink /Rect [50 650 100 670] /InkList [[50 660 75 665 100 660]] /Contents (Ink Annotation) >>",
        "[50 650 100 670]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Popup,
        "<< /Type/Annot /Subtype /Popup /Rect [110 650 150 670] /Contents (Popup Annotation) >>",
        "[110 650 150 670]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::FileAttachment,
        "<< /Type/Annot /Subtype /FileAttachment /Rect [160 650 200 670] /FS << /Type /Filespec /F (attached.txt) >> /Contents (FileAttachment Annotation) >>",
        "[160 650 200 670]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Sound,
        "<< /Type/Annot /Subtype /Sound /Rect [210 650 250 670] /Sound << /R 8000 /E (raw) /Channels 1 >> /Contents (Sound Annotation) >>",
        "[210 650 250 670]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Movie,
        "<< /Type/Annot /Subtype /Movie /Rect [260 650 300 670] /Movie << /F (movie.mpg) >> /Contents (Movie Annotation) >>",
        "[260 650 300 670]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Widget,
        "<< /Type/Annot /Subtype /Widget /Rect [310 650 350 670] /Contents (Widget Annotation) >>",
        "[310 650 350 670]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Screen,
        "<< /Type/Annot /Subtype /Screen /Rect [360 650 400 670] /Contents (Screen Annotation) >>",
        "[360 650 400 670]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::PrinterMark,
        "<< /Type/Annot /Subtype /PrinterMark /Rect [50 600 100 620] /Contents (PrinterMark Annotation) >>",
        "[50 600 100 620]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::TrapNet,
        "<< /Type/Annot /Subtype /TrapNet /Rect [110 600 150 620] /Contents (TrapNet Annotation) >>",
        "[110 600 150 620]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Watermark,
        "<< /Type/Annot /Subtype /Watermark /Rect [160 600 200 620] /Contents (Watermark Annotation) >>",
        "[160 600 200 620]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::ThreeD,
        "<< /Type/Annot /Subtype /3D /Rect [210 600 250 620] /Contents (3D Annotation) >>",
        "[210 600 250 620]",
    ),
    AnnotationTemplate::new(
        AnnotationKind::Redact,
        "<< /Type/Annot /Subtype /Redact /Rect [260 600 300 620] /Contents (Redact Annotation) >>",
        "[260 600 300 620]",
    ),
];

lazy_static! {
    static ref STANDARD_POOL: TemplatePool = TemplatePool::new(STANDARD_TEMPLATES.to_vec());
}

/// Immutable registry with one template per annotation kind.
#[derive(Debug, Clone)]
pub struct TemplatePool {
    templates: Vec<AnnotationTemplate>,
}

impl TemplatePool {
    pub fn new(templates: Vec<AnnotationTemplate>) -> Self {
        Self { templates }
    }

    /// The built-in 26-kind registry, constructed on first use.
    pub fn standard() -> &'static TemplatePool {
        &STANDARD_POOL
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, kind: AnnotationKind) -> Option<&AnnotationTemplate> {
        self.templates.iter().find(|t| t.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnnotationTemplate> {
        self.templates.iter()
    }

    /// Uniform draw; `None` only for an empty pool.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&AnnotationTemplate> {
        self.templates.choose(rng)
    }

    /// `count` distinct templates in random order, capped at the pool size.
    pub fn choose_distinct<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<&AnnotationTemplate> {
        let mut picked: Vec<&AnnotationTemplate> = self.templates.iter().collect();
        picked.shuffle(rng);
        picked.truncate(count);
        picked
    }
}
