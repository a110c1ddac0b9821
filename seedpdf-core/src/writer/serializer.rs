use crate::error::Result;
use crate::objects::IndirectObject;
use crate::writer::{Trailer, XrefTable};
use std::collections::BTreeMap;
use std::io::Write;

/// Byte offset of every emitted object, keyed by object number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetMap {
    offsets: BTreeMap<u32, u64>,
}

impl OffsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, number: u32) -> Option<u64> {
        self.offsets.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Entries in ascending object number order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.offsets.iter().map(|(number, offset)| (*number, *offset))
    }

    pub(crate) fn record(&mut self, number: u32, offset: u64) {
        self.offsets.insert(number, offset);
    }
}

/// Writes objects in any order while tracking where each one starts.
pub struct OffsetTrackingSerializer<W: Write> {
    writer: W,
    offsets: OffsetMap,
    current_position: u64,
}

impl<W: Write> OffsetTrackingSerializer<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            offsets: OffsetMap::new(),
            current_position: 0,
        }
    }

    pub fn position(&self) -> u64 {
        self.current_position
    }

    pub fn offsets(&self) -> &OffsetMap {
        &self.offsets
    }

    pub fn write_header(&mut self, header: &[u8]) -> Result<()> {
        self.write_bytes(header)
    }

    /// Record the object's offset, then append its encoded bytes.
    pub fn write_object(&mut self, object: &IndirectObject) -> Result<()> {
        self.offsets.record(object.number(), self.current_position);
        self.write_bytes(&object.to_bytes())
    }

    pub fn write_objects<'o>(
        &mut self,
        objects: impl IntoIterator<Item = &'o IndirectObject>,
    ) -> Result<()> {
        for object in objects {
            self.write_object(object)?;
        }
        Ok(())
    }

    /// Write the table and return the true offset of its `xref` keyword.
    pub fn write_xref(&mut self, table: &XrefTable) -> Result<u64> {
        let position = self.current_position;
        self.write_bytes(&table.to_bytes())?;
        Ok(position)
    }

    /// Trailer dictionary, `startxref` pointer and end marker.
    pub fn write_trailer(&mut self, trailer: &Trailer, startxref: u64) -> Result<()> {
        self.write_bytes(&trailer.to_bytes())?;
        self.write_bytes(format!("startxref\n{startxref}\n").as_bytes())?;
        self.write_bytes(b"%%EOF\n")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_parts(self) -> (W, OffsetMap) {
        (self.writer, self.offsets)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

impl OffsetTrackingSerializer<Vec<u8>> {
    pub fn in_memory() -> Self {
        Self::new_with_writer(Vec::new())
    }
}
