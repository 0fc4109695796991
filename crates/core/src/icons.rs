//! Closed set of product card icons.
//!
//! Products store the icon as a text tag. Only the tags below are accepted on
//! write; unknown tags already in the table render as [`ProductIcon::Home`].

use serde::{Deserialize, Serialize};

/// Icon shown on a product card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductIcon {
    /// Residential rooftop systems.
    #[default]
    Home,
    /// Housing societies and commercial buildings.
    Building,
    /// Industrial installations.
    Factory,
}

impl ProductIcon {
    /// All icons, in display order.
    pub const ALL: [ProductIcon; 3] = [Self::Home, Self::Building, Self::Factory];

    /// The tag persisted in the `products.icon` column.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Building => "Building",
            Self::Factory => "Factory",
        }
    }

    /// Parse a stored tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.tag() == tag)
    }

    /// Parse a stored tag, falling back to the default icon.
    pub fn from_tag_or_default(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_default()
    }
}

impl From<String> for ProductIcon {
    fn from(tag: String) -> Self {
        Self::from_tag_or_default(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for icon in ProductIcon::ALL {
            assert_eq!(ProductIcon::from_tag(icon.tag()), Some(icon));
        }
    }

    #[test]
    fn unknown_tag_falls_back_to_home() {
        assert_eq!(ProductIcon::from_tag("Rocket"), None);
        assert_eq!(ProductIcon::from_tag_or_default("Rocket"), ProductIcon::Home);
    }

    #[test]
    fn serde_uses_stored_tags() {
        let json = serde_json::to_string(&ProductIcon::Factory).unwrap();
        assert_eq!(json, "\"Factory\"");
        let parsed: ProductIcon = serde_json::from_str("\"Building\"").unwrap();
        assert_eq!(parsed, ProductIcon::Building);
        assert!(serde_json::from_str::<ProductIcon>("\"home\"").is_err());
    }
}
