//! Document object graph: numbering, node bodies and structural choices.

mod allocator;
mod builder;
mod nodes;
mod structure;

pub use allocator::{ObjectAllocator, CATALOG_ID, PAGES_ID};
pub use builder::{GraphBuilder, ObjectGraph};
pub use nodes::{PageNode, PagesNode};
pub use structure::{DocumentPlan, PagePlan, StructuralRandomizer};
