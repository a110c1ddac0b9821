use serde::{Deserialize, Serialize};

/// Annotation subtypes covered by the template pool (ISO 32000 Table 169 plus 3D and Redact)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Text annotation (sticky note)
    Text,
    /// Link annotation
    Link,
    /// Free text annotation
    FreeText,
    Line,
    Square,
    Circle,
    Polygon,
    PolyLine,
    Highlight,
    Underline,
    /// Squiggly underline annotation
    Squiggly,
    StrikeOut,
    /// Rubber stamp annotation
    Stamp,
    Caret,
    Ink,
    Popup,
    FileAttachment,
    Sound,
    Movie,
    /// Widget annotation (form field)
    Widget,
    Screen,
    PrinterMark,
    /// Trap network annotation
    TrapNet,
    Watermark,
    #[serde(rename = "3D")]
    ThreeD,
    Redact,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 26] = [
        AnnotationKind::Text,
        AnnotationKind::Link,
        AnnotationKind::FreeText,
        AnnotationKind::Line,
        AnnotationKind::Square,
        AnnotationKind::Circle,
        AnnotationKind::Polygon,
        AnnotationKind::PolyLine,
        AnnotationKind::Highlight,
        AnnotationKind::Underline,
        AnnotationKind::Squiggly,
        AnnotationKind::StrikeOut,
        AnnotationKind::Stamp,
        AnnotationKind::Caret,
        AnnotationKind::Ink,
        AnnotationKind::Popup,
        AnnotationKind::FileAttachment,
        AnnotationKind::Sound,
        AnnotationKind::Movie,
        AnnotationKind::Widget,
        AnnotationKind::Screen,
        AnnotationKind::PrinterMark,
        AnnotationKind::TrapNet,
        AnnotationKind::Watermark,
        AnnotationKind::ThreeD,
        AnnotationKind::Redact,
    ];

    /// Get PDF subtype name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            AnnotationKind::Text => "Text",
            AnnotationKind::Link => "Link",
            AnnotationKind::FreeText => "FreeText",
            AnnotationKind::Line => "Line",
            AnnotationKind::Square => "Square",
            AnnotationKind::Circle => "Circle",
            AnnotationKind::Polygon => "Polygon",
            AnnotationKind::PolyLine => "PolyLine",
            AnnotationKind::Highlight => "Highlight",
            AnnotationKind::Underline => "Underline",
            AnnotationKind::Squiggly => "Squiggly",
            AnnotationKind::StrikeOut => "StrikeOut",
            AnnotationKind::Stamp => "Stamp",
            AnnotationKind::Caret => "Caret",
            AnnotationKind::Ink => "Ink",
            AnnotationKind::Popup => "Popup",
            AnnotationKind::FileAttachment => "FileAttachment",
            AnnotationKind::Sound => "Sound",
            AnnotationKind::Movie => "Movie",
            AnnotationKind::Widget => "Widget",
            AnnotationKind::Screen => "Screen",
            AnnotationKind::PrinterMark => "PrinterMark",
            AnnotationKind::TrapNet => "TrapNet",
            AnnotationKind::Watermark => "Watermark",
            AnnotationKind::ThreeD => "3D",
            AnnotationKind::Redact => "Redact",
        }
    }

    pub fn is_widget(&self) -> bool {
        matches!(self, AnnotationKind::Widget)
    }
}
