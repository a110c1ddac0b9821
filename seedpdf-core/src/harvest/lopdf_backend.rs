use super::{AnnotationBackend, HarvestedAnnotation};
use crate::error::{Result, SeedError};
use crate::sampling::{PAGE_HEIGHT, PAGE_WIDTH};
use lopdf::xref::XrefType;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Keys that point back into the source page tree.
const BACK_REFERENCES: [&[u8]; 2] = [b"P", b"Parent"];

/// [`AnnotationBackend`] on top of `lopdf`.
#[derive(Debug, Clone, Copy)]
pub struct LopdfBackend {
    max_depth: usize,
}

impl Default for LopdfBackend {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

impl LopdfBackend {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// `[0 0 612 792]`
    pub fn letter_box() -> Object {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH as i64),
            Object::Integer(PAGE_HEIGHT as i64),
        ])
    }

    fn resolve<'d>(doc: &'d Document, object: &'d Object) -> Result<&'d Object> {
        match object {
            Object::Reference(id) => Ok(doc.get_object(*id)?),
            other => Ok(other),
        }
    }

    /// Walk the `Parent` chain for an inheritable page attribute.
    fn inherited(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
        let mut current = page.clone();
        for _ in 0..64 {
            if let Ok(value) = current.get(key) {
                return Self::resolve(doc, value).ok().cloned();
            }
            let parent = match current.get(b"Parent") {
                Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok()?,
                _ => return None,
            };
            current = parent.clone();
        }
        None
    }

    fn page_annotations<'d>(doc: &'d Document, page: &'d Dictionary) -> Vec<&'d Object> {
        let annots = match page.get(b"Annots") {
            Ok(annots) => annots,
            Err(_) => return Vec::new(),
        };
        match Self::resolve(doc, annots) {
            Ok(Object::Array(items)) => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Inline every reference reachable from `object`, dropping back
    /// references and anything that closes a cycle.
    fn detach(&self, doc: &Document, object: &Object, path: &mut HashSet<ObjectId>, depth: usize) -> Object {
        if depth > self.max_depth {
            return Object::Null;
        }
        match object {
            Object::Reference(id) => {
                if !path.insert(*id) {
                    return Object::Null;
                }
                let inlined = match doc.get_object(*id) {
                    Ok(target) => self.detach(doc, target, path, depth + 1),
                    Err(_) => Object::Null,
                };
                path.remove(id);
                inlined
            }
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.detach(doc, item, path, depth + 1))
                    .collect(),
            ),
            Object::Dictionary(dict) => Object::Dictionary(self.detach_dictionary(doc, dict, path, depth)),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.detach_dictionary(doc, &stream.dict, path, depth);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn detach_dictionary(
        &self,
        doc: &Document,
        dict: &Dictionary,
        path: &mut HashSet<ObjectId>,
        depth: usize,
    ) -> Dictionary {
        let mut detached = Dictionary::new();
        for (key, value) in dict.iter() {
            if BACK_REFERENCES.contains(&key.as_slice()) {
                continue;
            }
            detached.set(key.clone(), self.detach(doc, value, path, depth + 1));
        }
        detached
    }
}

/// Move nested streams into their own objects, optionally emptying them.
fn hoist(doc: &mut Document, object: Object, strip_streams: bool) -> Object {
    match object {
        Object::Stream(mut stream) => {
            hoist_dictionary(doc, &mut stream.dict, strip_streams);
            if strip_streams {
                stream.set_content(Vec::new());
            }
            Object::Reference(doc.add_object(Object::Stream(stream)))
        }
        Object::Dictionary(mut dict) => {
            hoist_dictionary(doc, &mut dict, strip_streams);
            Object::Dictionary(dict)
        }
        Object::Array(items) => Object::Array(
            items
                .into_iter()
                .map(|item| hoist(doc, item, strip_streams))
                .collect(),
        ),
        other => other,
    }
}

fn hoist_dictionary(doc: &mut Document, dict: &mut Dictionary, strip_streams: bool) {
    for (_, value) in dict.iter_mut() {
        let taken = std::mem::replace(value, Object::Null);
        *value = hoist(doc, taken, strip_streams);
    }
}

impl AnnotationBackend for LopdfBackend {
    fn harvest(&self, path: &Path) -> Result<Vec<HarvestedAnnotation>> {
        let doc = Document::load(path)?;
        let mut harvested = Vec::new();

        for (page_number, page_id) in doc.get_pages() {
            let page = doc.get_dictionary(page_id)?;
            let media_box = Self::inherited(&doc, page, b"MediaBox").unwrap_or_else(Self::letter_box);
            let crop_box = Self::inherited(&doc, page, b"CropBox").unwrap_or_else(|| media_box.clone());

            for entry in Self::page_annotations(&doc, page) {
                let mut path_guard = HashSet::new();
                match self.detach(&doc, entry, &mut path_guard, 0) {
                    Object::Dictionary(dictionary) => harvested.push(HarvestedAnnotation {
                        source: path.to_path_buf(),
                        media_box: media_box.clone(),
                        crop_box: crop_box.clone(),
                        dictionary,
                    }),
                    _ => debug!(page = page_number, "ignoring non-dictionary annotation entry"),
                }
            }
        }

        debug!(path = %path.display(), annotations = harvested.len(), "harvested document");
        Ok(harvested)
    }

    fn assemble(&self, annotations: &[&HarvestedAnnotation], strip_streams: bool) -> Result<Vec<u8>> {
        let first = annotations
            .first()
            .ok_or_else(|| SeedError::EmptyPool("nothing to assemble".to_string()))?;

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();

        let mut annot_refs = Vec::with_capacity(annotations.len());
        for annotation in annotations {
            let mut dict = annotation.dictionary.clone();
            hoist_dictionary(&mut doc, &mut dict, strip_streams);
            dict.set("P", Object::Reference(page_id));
            annot_refs.push(Object::Reference(doc.add_object(Object::Dictionary(dict))));
        }

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(pages_id));
        page.set("MediaBox", first.media_box.clone());
        page.set("CropBox", first.crop_box.clone());
        page.set("Resources", Object::Dictionary(Dictionary::new()));
        page.set("Contents", Object::Array(Vec::new()));
        page.set("Annots", Object::Array(annot_refs));
        doc.objects.insert(page_id, Object::Dictionary(page));

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", Object::Integer(1));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        // Classic table; a cross-reference stream needs 1.5.
        doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
