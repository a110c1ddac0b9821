//! Cross-reference table and trailer.

use crate::objects::ObjectId;
use crate::sampling::{chance, random_string};
use crate::writer::OffsetMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the string stored under `/Info`.
const INFO_LEN: usize = 12;

/// Head of the free list, always the first entry.
pub const FREE_HEAD_ENTRY: &str = "0000000000 65535 f \n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrefEntry {
    Free,
    InUse { offset: u64 },
}

/// Classic single-subsection table covering objects 0..=N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefTable {
    entries: Vec<XrefEntry>,
}

impl XrefTable {
    /// One entry per number in 1..=`highest`; numbers that were never
    /// emitted become free entries at offset 0.
    pub fn from_offsets(offsets: &OffsetMap, highest: u32) -> Self {
        let entries = (1..=highest)
            .map(|number| match offsets.get(number) {
                Some(offset) => XrefEntry::InUse { offset },
                None => XrefEntry::Free,
            })
            .collect();
        Self { entries }
    }

    /// Entry count including the free-list head; equals the trailer `/Size`.
    pub fn entry_count(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn entry(&self, number: u32) -> Option<XrefEntry> {
        match number {
            0 => Some(XrefEntry::Free),
            n => self.entries.get(n as usize - 1).copied(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("xref\n0 {}\n", self.entry_count()).into_bytes();
        out.extend_from_slice(FREE_HEAD_ENTRY.as_bytes());
        for entry in &self.entries {
            let line = match entry {
                XrefEntry::InUse { offset } => format!("{offset:010} 00000 n \n"),
                XrefEntry::Free => "0000000000 00000 f \n".to_string(),
            };
            out.extend_from_slice(line.as_bytes());
        }
        out
    }
}

/// Chances for the optional trailer keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailerOptions {
    pub info_probability: f64,
    pub xref_stream_hint_probability: f64,
}

impl Default for TrailerOptions {
    fn default() -> Self {
        Self {
            info_probability: 0.5,
            xref_stream_hint_probability: 0.5,
        }
    }
}

impl TrailerOptions {
    /// Only `/Size` and `/Root`.
    pub fn required_only() -> Self {
        Self {
            info_probability: 0.0,
            xref_stream_hint_probability: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
    pub size: u32,
    pub root: u32,
    /// Literal string under `/Info` (not a reference on purpose).
    pub info: Option<String>,
    /// Bogus `/XRefStm` offset hinting at a hybrid file.
    pub xref_stream_hint: Option<u32>,
}

impl Trailer {
    pub fn new(highest: u32, root: ObjectId) -> Self {
        Self {
            size: highest + 1,
            root: root.number(),
            info: None,
            xref_stream_hint: None,
        }
    }

    /// Required keys plus independently drawn optional ones.
    pub fn sample<R: Rng + ?Sized>(
        highest: u32,
        root: ObjectId,
        options: &TrailerOptions,
        rng: &mut R,
    ) -> Self {
        let mut trailer = Self::new(highest, root);
        if chance(rng, options.info_probability) {
            trailer.info = Some(random_string(rng, INFO_LEN));
        }
        if chance(rng, options.xref_stream_hint_probability) {
            trailer.xref_stream_hint = Some(rng.gen_range(100..=999));
        }
        trailer
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut dict = format!("<< /Size {} /Root {} 0 R", self.size, self.root);
        if let Some(info) = &self.info {
            dict.push_str(&format!(" /Info ({info})"));
        }
        if let Some(hint) = self.xref_stream_hint {
            dict.push_str(&format!(" /XRefStm {hint}"));
        }
        dict.push_str(" >>");
        format!("trailer\n{dict}\n").into_bytes()
    }
}
