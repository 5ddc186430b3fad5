//! The immutable cosmetic shop catalog.
//!
//! Six themes and six titles, priced in spendable XP. The catalog is static
//! data compiled into the binary; per-user ownership lives on the
//! [`ProgressLedger`](skillforge_types::ProgressLedger), never here.

use skillforge_types::{ItemKind, ShopItem};

/// Item id of the free default theme every ledger owns.
pub const DEFAULT_THEME: &str = "theme-light";

/// Item id of the free default title every ledger owns.
pub const DEFAULT_TITLE: &str = "title-novice";

/// One entry of the static catalog.
///
/// Uses `&'static str` fields so the whole table is `const`; convert to the
/// wire-facing [`ShopItem`] with [`CatalogItem::to_shop_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    /// Stable item id.
    pub id: &'static str,
    /// The slot this item occupies.
    pub kind: ItemKind,
    /// Price in spendable XP.
    pub cost: u32,
    /// Display name.
    pub display_name: &'static str,
    /// One-line flavor description.
    pub description: &'static str,
}

impl CatalogItem {
    /// Convert to the serializable shop item shape.
    pub fn to_shop_item(&self) -> ShopItem {
        ShopItem {
            id: String::from(self.id),
            kind: self.kind,
            cost: self.cost,
            display_name: String::from(self.display_name),
            description: String::from(self.description),
        }
    }
}

/// Every purchasable item, themes first.
pub const CATALOG: &[CatalogItem] = &[
    // --- Themes ---
    CatalogItem {
        id: DEFAULT_THEME,
        kind: ItemKind::Theme,
        cost: 0,
        display_name: "Standard Light",
        description: "Default bright theme.",
    },
    CatalogItem {
        id: "theme-dracula",
        kind: ItemKind::Theme,
        cost: 300,
        display_name: "Dracula",
        description: "A dark theme for vampires.",
    },
    CatalogItem {
        id: "theme-monokai",
        kind: ItemKind::Theme,
        cost: 400,
        display_name: "Monokai",
        description: "Vibrant and contrasty.",
    },
    CatalogItem {
        id: "theme-nord",
        kind: ItemKind::Theme,
        cost: 450,
        display_name: "Nord",
        description: "An arctic, north-bluish palette.",
    },
    CatalogItem {
        id: "theme-matrix",
        kind: ItemKind::Theme,
        cost: 500,
        display_name: "The Matrix",
        description: "Green code raining down.",
    },
    CatalogItem {
        id: "theme-cyberpunk",
        kind: ItemKind::Theme,
        cost: 1000,
        display_name: "Cyberpunk 2077",
        description: "Neon pinks and deep blues.",
    },
    // --- Titles ---
    CatalogItem {
        id: DEFAULT_TITLE,
        kind: ItemKind::Title,
        cost: 0,
        display_name: "Novice",
        description: "The journey begins.",
    },
    CatalogItem {
        id: "title-bug-hunter",
        kind: ItemKind::Title,
        cost: 200,
        display_name: "Bug Hunter",
        description: "Squashing bugs for fun.",
    },
    CatalogItem {
        id: "title-stack-overflow",
        kind: ItemKind::Title,
        cost: 500,
        display_name: "Stack Overflow VIP",
        description: "Ctrl+C, Ctrl+V expert.",
    },
    CatalogItem {
        id: "title-algo-wizard",
        kind: ItemKind::Title,
        cost: 800,
        display_name: "Algo Wizard",
        description: "Master of complexity.",
    },
    CatalogItem {
        id: "title-senior-dev",
        kind: ItemKind::Title,
        cost: 2000,
        display_name: "10x Engineer",
        description: "Highly efficient.",
    },
    CatalogItem {
        id: "title-architect",
        kind: ItemKind::Title,
        cost: 5000,
        display_name: "System Architect",
        description: "Draws boxes and arrows.",
    },
];

/// Look up a catalog item by id.
pub fn find(item_id: &str) -> Option<&'static CatalogItem> {
    CATALOG.iter().find(|item| item.id == item_id)
}

/// The full catalog in wire shape.
pub fn all_items() -> Vec<ShopItem> {
    CATALOG.iter().map(CatalogItem::to_shop_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_of_each_kind() {
        let themes = CATALOG.iter().filter(|i| i.kind == ItemKind::Theme).count();
        let titles = CATALOG.iter().filter(|i| i.kind == ItemKind::Title).count();
        assert_eq!(themes, 6);
        assert_eq!(titles, 6);
    }

    #[test]
    fn defaults_are_free() {
        assert_eq!(find(DEFAULT_THEME).map(|i| i.cost), Some(0));
        assert_eq!(find(DEFAULT_TITLE).map(|i| i.cost), Some(0));
    }

    #[test]
    fn ids_are_unique() {
        for (idx, item) in CATALOG.iter().enumerate() {
            let dup = CATALOG
                .iter()
                .enumerate()
                .any(|(other_idx, other)| other_idx != idx && other.id == item.id);
            assert!(!dup, "duplicate id {}", item.id);
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(find("theme-does-not-exist").is_none());
    }
}
