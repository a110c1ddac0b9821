//! Annotation templates and their randomized fill-in.

mod kind;
mod randomizer;
mod template;

pub use kind::AnnotationKind;
pub use randomizer::{AnnotationRandomizer, FilledAnnotation, CONTENTS_LEN};
pub use template::{AnnotationTemplate, TemplatePool};
