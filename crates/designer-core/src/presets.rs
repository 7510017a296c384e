//! Fixed catalog of artboard sizes offered by "new artboard" pickers.

use serde::Serialize;

/// A named artboard size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
    pub category: &'static str,
}

const fn preset(id: &'static str, name: &'static str, width: f64, height: f64, category: &'static str) -> ArtboardPreset {
    ArtboardPreset {
        id,
        name,
        width,
        height,
        category,
    }
}

pub const ARTBOARD_PRESETS: &[ArtboardPreset] = &[
    preset("instagram-post", "Instagram Post", 1080.0, 1080.0, "social"),
    preset("instagram-story", "Instagram Story", 1080.0, 1920.0, "social"),
    preset("facebook-post", "Facebook Post", 1200.0, 630.0, "social"),
    preset("twitter-post", "Twitter Post", 1600.0, 900.0, "social"),
    preset("youtube-thumbnail", "YouTube Thumbnail", 1280.0, 720.0, "social"),
    preset("tshirt-front", "T-Shirt Front", 4500.0, 5400.0, "apparel"),
    preset("tshirt-pocket", "T-Shirt Pocket", 1200.0, 1200.0, "apparel"),
    preset("hoodie-front", "Hoodie Front", 4500.0, 4050.0, "apparel"),
    preset("mug-wrap", "Mug Wrap", 2700.0, 1100.0, "apparel"),
    preset("tote-bag", "Tote Bag", 3000.0, 3000.0, "apparel"),
    preset("a4-portrait", "A4 Portrait", 2480.0, 3508.0, "print"),
    preset("a4-landscape", "A4 Landscape", 3508.0, 2480.0, "print"),
    preset("letter", "US Letter", 2550.0, 3300.0, "print"),
    preset("poster-18x24", "Poster 18x24", 5400.0, 7200.0, "print"),
    preset("business-card", "Business Card", 1050.0, 600.0, "print"),
    preset("desktop", "Desktop", 1920.0, 1080.0, "screen"),
    preset("tablet", "Tablet", 1024.0, 1366.0, "screen"),
    preset("mobile", "Mobile", 390.0, 844.0, "screen"),
];

/// Presets in one category, in catalog order.
pub fn get_presets_by_category(category: &str) -> Vec<&'static ArtboardPreset> {
    ARTBOARD_PRESETS.iter().filter(|p| p.category == category).collect()
}

/// Look up a preset by id.
pub fn get_preset_by_id(id: &str) -> Option<&'static ArtboardPreset> {
    ARTBOARD_PRESETS.iter().find(|p| p.id == id)
}

/// Distinct categories, in first-seen order.
pub fn get_preset_categories() -> Vec<&'static str> {
    let mut categories: Vec<&'static str> = Vec::new();
    for preset in ARTBOARD_PRESETS {
        if !categories.contains(&preset.category) {
            categories.push(preset.category);
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        for (i, a) in ARTBOARD_PRESETS.iter().enumerate() {
            for b in &ARTBOARD_PRESETS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_by_category() {
        let social = get_presets_by_category("social");
        assert!(!social.is_empty());
        assert!(social.iter().all(|p| p.category == "social"));
        assert!(get_presets_by_category("nope").is_empty());
    }

    #[test]
    fn test_lookup_and_categories() {
        let preset = get_preset_by_id("instagram-post").unwrap();
        assert!((preset.width - 1080.0).abs() < f64::EPSILON);
        assert!(get_preset_by_id("missing").is_none());
        assert_eq!(get_preset_categories(), vec!["social", "apparel", "print", "screen"]);
    }
}
