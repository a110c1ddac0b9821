use crate::objects::ObjectId;

/// Object number of the document catalog.
pub const CATALOG_ID: ObjectId = ObjectId::new(1, 0);
/// Object number reserved for the page tree root.
pub const PAGES_ID: ObjectId = ObjectId::new(2, 0);

/// Hands out dense object numbers. Catalog and page tree are pre-reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAllocator {
    next: u32,
}

impl ObjectAllocator {
    pub fn new() -> Self {
        Self {
            next: PAGES_ID.number() + 1,
        }
    }

    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next, 0);
        self.next += 1;
        id
    }

    /// Highest number handed out so far (N); the xref table has N + 1 entries.
    pub fn highest(&self) -> u32 {
        self.next - 1
    }
}

impl Default for ObjectAllocator {
    fn default() -> Self {
        Self::new()
    }
}
