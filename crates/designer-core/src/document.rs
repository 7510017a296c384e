//! Pages and documents: the multi-artboard container around canvases.

use crate::artboard::{Artboard, calculate_next_position, create_artboard};
use crate::error::{DesignerError, DesignerResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Size of the artboard a new document starts with.
pub const DEFAULT_ARTBOARD_WIDTH: f64 = 1080.0;
pub const DEFAULT_ARTBOARD_HEIGHT: f64 = 1080.0;

/// An ordered list of artboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artboards: Vec<Artboard>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            artboards: Vec::new(),
        }
    }

    pub fn find_artboard(&self, id: &str) -> Option<&Artboard> {
        self.artboards.iter().find(|a| a.id == id)
    }
}

/// A design document: ordered pages plus the active page and artboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub pages: Vec<Page>,
    pub active_page_id: String,
    #[serde(default)]
    pub active_artboard_id: Option<String>,
}

impl Document {
    /// A document with one page holding one default artboard, both active.
    pub fn new(name: impl Into<String>) -> Self {
        let mut page = Page::new("Page 1");
        let artboard = create_artboard(
            "Artboard 1",
            DEFAULT_ARTBOARD_WIDTH,
            DEFAULT_ARTBOARD_HEIGHT,
            kurbo::Point::ZERO,
        );
        let active_artboard_id = Some(artboard.id.clone());
        page.artboards.push(artboard);
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            active_page_id: page.id.clone(),
            pages: vec![page],
            active_artboard_id,
        }
    }

    pub fn active_page(&self) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == self.active_page_id)
    }

    pub fn active_artboard(&self) -> Option<&Artboard> {
        let id = self.active_artboard_id.as_deref()?;
        self.find_artboard(id)
    }

    /// Find an artboard on any page.
    pub fn find_artboard(&self, id: &str) -> Option<&Artboard> {
        self.pages.iter().find_map(|p| p.find_artboard(id))
    }

    /// Append an empty page and make it active.
    pub fn add_page(&self, name: impl Into<String>) -> Self {
        let page = Page::new(name);
        let mut next = self.clone();
        next.active_page_id = page.id.clone();
        next.active_artboard_id = None;
        next.pages.push(page);
        next
    }

    /// Remove a page. The last remaining page is never removed. Removing
    /// the active page activates its predecessor (or the new first page).
    pub fn remove_page(&self, page_id: &str) -> Self {
        let Some(index) = self.pages.iter().position(|p| p.id == page_id) else {
            return self.clone();
        };
        if self.pages.len() == 1 {
            log::debug!("Refusing to remove the last page {}", page_id);
            return self.clone();
        }

        let mut next = self.clone();
        next.pages.remove(index);
        if self.active_page_id == page_id {
            let fallback = next.pages[index.saturating_sub(1)].id.clone();
            return next.set_active_page(&fallback);
        }
        next
    }

    /// Activate a page and its first artboard. Unknown ids are ignored.
    pub fn set_active_page(&self, page_id: &str) -> Self {
        let Some(page) = self.pages.iter().find(|p| p.id == page_id) else {
            return self.clone();
        };
        Self {
            active_page_id: page.id.clone(),
            active_artboard_id: page.artboards.first().map(|a| a.id.clone()),
            ..self.clone()
        }
    }

    /// Activate an artboard, switching to its page. Unknown ids are ignored.
    pub fn set_active_artboard(&self, artboard_id: &str) -> Self {
        let Some(page) = self.pages.iter().find(|p| p.find_artboard(artboard_id).is_some()) else {
            return self.clone();
        };
        Self {
            active_page_id: page.id.clone(),
            active_artboard_id: Some(artboard_id.to_string()),
            ..self.clone()
        }
    }

    /// Append an artboard to the active page, `gap` to the right of the
    /// existing ones, and make it active.
    pub fn add_artboard(&self, name: impl Into<String>, width: f64, height: f64, gap: f64) -> Self {
        let Some(page) = self.active_page() else {
            return self.clone();
        };
        let mut artboard = create_artboard(name, width, height, calculate_next_position(&page.artboards, gap));
        artboard.order = page.artboards.len();
        self.insert_artboard(artboard)
    }

    /// Append a prepared artboard (e.g. from a preset or an import) to the
    /// active page and make it active.
    pub fn insert_artboard(&self, artboard: Artboard) -> Self {
        let mut next = self.clone();
        let Some(page) = next.pages.iter_mut().find(|p| p.id == self.active_page_id) else {
            return next;
        };
        next.active_artboard_id = Some(artboard.id.clone());
        page.artboards.push(artboard);
        next
    }

    /// Replace artboards by id, wherever they live. Used to commit the
    /// results of resize or arrange operations.
    pub fn replace_artboards(&self, artboards: &[Artboard]) -> Self {
        let mut next = self.clone();
        for replacement in artboards {
            if let Some(slot) = next
                .pages
                .iter_mut()
                .flat_map(|p| p.artboards.iter_mut())
                .find(|a| a.id == replacement.id)
            {
                *slot = replacement.clone();
            }
        }
        next
    }

    /// Remove an artboard from whichever page holds it. If it was active,
    /// the first artboard left on that page becomes active.
    pub fn remove_artboard(&self, artboard_id: &str) -> Self {
        let mut next = self.clone();
        let Some(page) = next.pages.iter_mut().find(|p| p.find_artboard(artboard_id).is_some()) else {
            return next;
        };
        page.artboards.retain(|a| a.id != artboard_id);
        for (order, artboard) in page.artboards.iter_mut().enumerate() {
            artboard.order = order;
        }
        if next.active_artboard_id.as_deref() == Some(artboard_id) {
            next.active_artboard_id = page.artboards.first().map(|a| a.id.clone());
        }
        next
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a document. Stale active ids fall back to the first page and
    /// its first artboard.
    pub fn from_json(json: &str) -> DesignerResult<Self> {
        let document: Document = serde_json::from_str(json)?;
        let Some(first) = document.pages.first() else {
            return Err(DesignerError::EmptyDocument);
        };
        if document.active_page().is_none() {
            log::warn!("Active page {} not found, using first page", document.active_page_id);
            let first_id = first.id.clone();
            return Ok(document.set_active_page(&first_id));
        }
        if document.active_artboard_id.is_some() && document.active_artboard().is_none() {
            let page_id = document.active_page_id.clone();
            return Ok(document.set_active_page(&page_id));
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new("Untitled");
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].artboards.len(), 1);
        assert_eq!(doc.active_page().unwrap().id, doc.pages[0].id);
        assert_eq!(doc.active_artboard().unwrap().width, DEFAULT_ARTBOARD_WIDTH);
    }

    #[test]
    fn test_add_and_remove_page() {
        let doc = Document::new("Doc");
        let first = doc.pages[0].id.clone();
        let doc = doc.add_page("Page 2");
        assert_eq!(doc.pages.len(), 2);
        assert_ne!(doc.active_page_id, first);
        assert!(doc.active_artboard().is_none());

        let second = doc.active_page_id.clone();
        let doc = doc.remove_page(&second);
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.active_page_id, first);
        assert!(doc.active_artboard().is_some());

        let doc = doc.remove_page(&first);
        assert_eq!(doc.pages.len(), 1);
    }

    #[test]
    fn test_add_artboard_places_next_to_existing() {
        let doc = Document::new("Doc").add_artboard("Second", 500.0, 400.0, 100.0);
        let page = doc.active_page().unwrap();
        assert_eq!(page.artboards.len(), 2);
        let added = doc.active_artboard().unwrap();
        assert_eq!(added.name, "Second");
        assert_eq!((added.x, added.y), (DEFAULT_ARTBOARD_WIDTH + 100.0, 0.0));
        assert_eq!(added.order, 1);
    }

    #[test]
    fn test_set_active_artboard_switches_page() {
        let doc = Document::new("Doc");
        let first_artboard = doc.active_artboard_id.clone().unwrap();
        let doc = doc.add_page("Other").add_artboard("B", 100.0, 100.0, 10.0);
        let doc = doc.set_active_artboard(&first_artboard);
        assert_eq!(doc.active_page_id, doc.pages[0].id);
        assert_eq!(doc.active_artboard_id.as_deref(), Some(first_artboard.as_str()));

        let unchanged = doc.set_active_artboard("missing");
        assert_eq!(unchanged, doc);
    }

    #[test]
    fn test_remove_artboard() {
        let doc = Document::new("Doc").add_artboard("B", 100.0, 100.0, 10.0);
        let active = doc.active_artboard_id.clone().unwrap();
        let doc = doc.remove_artboard(&active);
        assert!(doc.find_artboard(&active).is_none());
        assert_eq!(doc.active_artboard_id.as_deref(), Some(doc.pages[0].artboards[0].id.as_str()));
    }

    #[test]
    fn test_replace_artboards() {
        let doc = Document::new("Doc");
        let mut artboard = doc.active_artboard().unwrap().clone();
        artboard.width = 10.0;
        let doc = doc.replace_artboards(&[artboard]);
        assert_eq!(doc.active_artboard().unwrap().width, 10.0);
    }

    #[test]
    fn test_json_roundtrip_and_repair() {
        let doc = Document::new("Doc").add_page("Two");
        let json = doc.to_json().unwrap();
        assert!(json.contains("activePageId"));
        assert_eq!(Document::from_json(&json).unwrap(), doc);

        let mut stale = doc.clone();
        stale.active_page_id = "gone".to_string();
        let repaired = Document::from_json(&stale.to_json().unwrap()).unwrap();
        assert_eq!(repaired.active_page_id, doc.pages[0].id);

        let empty = r#"{"id":"d","name":"n","pages":[],"activePageId":"x"}"#;
        assert!(matches!(Document::from_json(empty), Err(DesignerError::EmptyDocument)));
    }
}
