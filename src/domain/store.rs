use serde::Serialize;

/// A retailer whose prices the catalog tracks.
///
/// The registry is static configuration; price discovery is only allowed to
/// attach offers to stores listed here.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Store {
    pub id: &'static str,
    pub name: &'static str,
}

/// The fixed store registry, in display order.
pub const STORES: [Store; 3] = [
    Store {
        id: "store-1",
        name: "PC Factory",
    },
    Store {
        id: "store-2",
        name: "SP Digital",
    },
    Store {
        id: "store-3",
        name: "Infor-Ingen",
    },
];

/// Looks up a store's display name by identifier.
pub fn store_name(id: &str) -> Option<&'static str> {
    STORES.iter().find(|s| s.id == id).map(|s| s.name)
}

/// Whether the identifier names a registered store.
pub fn is_known_store(id: &str) -> bool {
    STORES.iter().any(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_contains_three_stores() {
        assert_eq!(STORES.len(), 3);
        assert_eq!(store_name("store-1"), Some("PC Factory"));
    }

    #[test]
    fn unknown_store_is_rejected() {
        assert!(is_known_store("store-2"));
        assert!(!is_known_store("store-99"));
    }
}
