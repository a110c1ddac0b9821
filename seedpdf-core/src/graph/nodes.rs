use crate::graph::PAGES_ID;
use crate::objects::{IndirectObject, ObjectId};
use crate::sampling::Rect;

fn reference_list(ids: &[ObjectId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A leaf of the page tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PageNode {
    pub id: ObjectId,
    pub contents: ObjectId,
    pub annotations: Vec<ObjectId>,
    pub media_box: Rect,
    pub modified: Option<String>,
}

impl PageNode {
    pub fn to_object(&self) -> IndirectObject {
        let mut body = format!(
            "<< /Type /Page /Parent {PAGES_ID} /MediaBox {} /Contents {} /Annots [{}]",
            self.media_box,
            self.contents,
            reference_list(&self.annotations)
        );
        if let Some(date) = &self.modified {
            body.push_str(&format!(" /Modified ({date})"));
        }
        body.push_str(" >>");
        IndirectObject::dictionary(self.id, body)
    }

    /// Every object number this page points at.
    pub fn references(&self) -> impl Iterator<Item = ObjectId> + '_ {
        std::iter::once(PAGES_ID)
            .chain(std::iter::once(self.contents))
            .chain(self.annotations.iter().copied())
    }
}

/// The page tree root.
#[derive(Debug, Clone, PartialEq)]
pub struct PagesNode {
    pub id: ObjectId,
    pub kids: Vec<ObjectId>,
}

impl PagesNode {
    pub fn count(&self) -> usize {
        self.kids.len()
    }

    pub fn to_object(&self) -> IndirectObject {
        IndirectObject::dictionary(
            self.id,
            format!(
                "<< /Type /Pages /Count {} /Kids [{}] >>",
                self.count(),
                reference_list(&self.kids)
            ),
        )
    }
}

pub fn catalog_object(id: ObjectId, pages: ObjectId) -> IndirectObject {
    IndirectObject::dictionary(id, format!("<< /Type /Catalog /Pages {pages} >>"))
}

pub fn filler_object(id: ObjectId, data: &str) -> IndirectObject {
    IndirectObject::dictionary(id, format!("<< /Type /Dummy /Data ({data}) >>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_body() {
        let page = PageNode {
            id: ObjectId::new(6, 0),
            contents: ObjectId::new(3, 0),
            annotations: vec![ObjectId::new(4, 0), ObjectId::new(5, 0)],
            media_box: Rect::letter(),
            modified: None,
        };
        let bytes = page.to_object().to_bytes();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "6 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 3 0 R /Annots [4 0 R 5 0 R] >>\nendobj\n"
        );
        let refs: Vec<u32> = page.references().map(|id| id.number()).collect();
        assert_eq!(refs, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_page_with_modified_date() {
        let page = PageNode {
            id: ObjectId::new(4, 0),
            contents: ObjectId::new(3, 0),
            annotations: vec![],
            media_box: Rect::letter(),
            modified: Some("D:20240101000000+00'00".to_string()),
        };
        let body = String::from_utf8(page.to_object().to_bytes()).unwrap();
        assert!(body.contains("/Annots [] /Modified (D:20240101000000+00'00) >>"));
    }

    #[test]
    fn test_pages_and_catalog_bodies() {
        let pages = PagesNode {
            id: PAGES_ID,
            kids: vec![ObjectId::new(5, 0), ObjectId::new(9, 0)],
        };
        let body = String::from_utf8(pages.to_object().to_bytes()).unwrap();
        assert!(body.contains("<< /Type /Pages /Count 2 /Kids [5 0 R 9 0 R] >>"));

        let catalog = catalog_object(ObjectId::new(1, 0), PAGES_ID);
        assert_eq!(
            catalog.to_bytes(),
            b"1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_vec()
        );
    }

    #[test]
    fn test_filler_body() {
        let filler = filler_object(ObjectId::new(12, 0), "abcDEF1234");
        assert_eq!(
            filler.to_bytes(),
            b"12 0 obj\n<< /Type /Dummy /Data (abcDEF1234) >>\nendobj\n".to_vec()
        );
    }
}
