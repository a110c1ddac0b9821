mod serializer;
mod xref;

pub use serializer::{OffsetMap, OffsetTrackingSerializer};
pub use xref::{Trailer, TrailerOptions, XrefEntry, XrefTable, FREE_HEAD_ENTRY};
