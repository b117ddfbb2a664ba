//! Names of the bundled reference datasets.

use std::fmt;

/// A bundled, read-only reference dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Products,
    Categories,
    Collections,
    Clients,
    Testimonials,
    Banners,
    Coupons,
    StaticPages,
}

impl Dataset {
    /// Every dataset, in a stable order.
    pub const ALL: [Dataset; 8] = [
        Dataset::Products,
        Dataset::Categories,
        Dataset::Collections,
        Dataset::Clients,
        Dataset::Testimonials,
        Dataset::Banners,
        Dataset::Coupons,
        Dataset::StaticPages,
    ];

    /// Resource name, also the file stem in a data directory.
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Products => "products",
            Dataset::Categories => "categories",
            Dataset::Collections => "collections",
            Dataset::Clients => "clients",
            Dataset::Testimonials => "testimonials",
            Dataset::Banners => "banners",
            Dataset::Coupons => "coupons",
            Dataset::StaticPages => "static-pages",
        }
    }

    /// Look up a dataset by resource name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AsRef<str> for Dataset {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for dataset in Dataset::ALL {
            assert_eq!(Dataset::from_name(dataset.name()), Some(dataset));
        }
        assert_eq!(Dataset::from_name("orders"), None);
    }

    #[test]
    fn test_static_pages_name() {
        assert_eq!(Dataset::StaticPages.to_string(), "static-pages");
    }
}
