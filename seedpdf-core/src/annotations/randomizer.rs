use crate::annotations::{AnnotationKind, AnnotationTemplate};
use crate::sampling::{random_border, random_color, random_rect, random_string};
use rand::Rng;

/// Length of the sampled `/Contents` text.
pub const CONTENTS_LEN: usize = 15;

/// Annotation dictionary text ready to become an indirect object body.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledAnnotation {
    kind: AnnotationKind,
    body: String,
}

impl FilledAnnotation {
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

/// Turns template skeletons into annotation bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationRandomizer;

impl AnnotationRandomizer {
    /// Sample geometry, color, border and contents into `template`.
    ///
    /// The placeholder rectangle is replaced in place when present, otherwise
    /// a `/Rect` key is appended. `/C`, `/Border` and `/Contents` always go
    /// last, so most skeletons end up with two `/Contents` keys.
    pub fn fill<R: Rng + ?Sized>(template: &AnnotationTemplate, rng: &mut R) -> FilledAnnotation {
        let rect = random_rect(rng);
        let contents = random_string(rng, CONTENTS_LEN);
        let color = random_color(rng);
        let border = random_border(rng);

        let skeleton = template.skeleton();
        let placeholder = template.placeholder();
        let mut body = if !placeholder.is_empty() && skeleton.contains(placeholder) {
            skeleton.replacen(placeholder, &rect.to_string(), 1)
        } else {
            format!("{} /Rect {rect} >>", open_dictionary(skeleton))
        };

        body = format!(
            "{} /C {color} /Border {border} /Contents ({contents}) >>",
            open_dictionary(&body)
        );

        FilledAnnotation {
            kind: template.kind(),
            body,
        }
    }

    /// Use the skeleton unchanged.
    pub fn verbatim(template: &AnnotationTemplate) -> FilledAnnotation {
        FilledAnnotation {
            kind: template.kind(),
            body: template.skeleton().to_string(),
        }
    }
}

/// Dictionary text without its closing `>>`.
fn open_dictionary(text: &str) -> &str {
    let trimmed = text.trim_end();
    trimmed.strip_suffix(">>").unwrap_or(trimmed).trim_end()
}
