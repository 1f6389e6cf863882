//! The fixed set of storefront categories.

use core::fmt;
use core::str::FromStr;

use super::CategoryId;

/// A browsable product category.
///
/// The storefront exposes exactly these three; their IDs are the ones the
/// external API uses for `/catwiseproducts/{categoryId}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Electronics,
    Clothes,
    Food,
}

/// Returned when a name or ID does not match any [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0} (expected electronics, clothes, or food)")]
pub struct UnknownCategory(pub String);

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Electronics, Self::Clothes, Self::Food];

    /// The API identifier for this category.
    #[must_use]
    pub const fn id(self) -> CategoryId {
        match self {
            Self::Electronics => CategoryId::new(1),
            Self::Clothes => CategoryId::new(2),
            Self::Food => CategoryId::new(3),
        }
    }

    /// Human-readable name, e.g. `"Electronics"`.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Clothes => "Clothes",
            Self::Food => "Food",
        }
    }

    /// Lowercase slug, e.g. `"electronics"`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothes => "clothes",
            Self::Food => "food",
        }
    }

    /// Look up a category by its API identifier.
    #[must_use]
    pub fn from_id(id: CategoryId) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Accepts a slug (case-insensitive) or a numeric category ID.
impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if let Ok(id) = needle.parse::<CategoryId>() {
            return Self::from_id(id).ok_or_else(|| UnknownCategory(s.to_owned()));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_match_api() {
        assert_eq!(Category::Electronics.id(), CategoryId::new(1));
        assert_eq!(Category::Clothes.id(), CategoryId::new(2));
        assert_eq!(Category::Food.id(), CategoryId::new(3));
    }

    #[test]
    fn test_parse_by_slug_and_id() {
        assert_eq!("electronics".parse::<Category>().unwrap(), Category::Electronics);
        assert_eq!("Clothes".parse::<Category>().unwrap(), Category::Clothes);
        assert_eq!("3".parse::<Category>().unwrap(), Category::Food);
        assert!("toys".parse::<Category>().is_err());
        assert!("9".parse::<Category>().is_err());
    }

    #[test]
    fn test_from_id_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from_id(category.id()), Some(category));
        }
    }
}
