use serde::Serialize;
use std::fmt;

/// Structural complexity tier of a site, derived from its page count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Complexity {
    Basic,
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    /// Maps a page count onto a tier
    ///
    /// # Examples
    ///
    /// ```
    /// use site_atlas::sitemap::Complexity;
    ///
    /// assert_eq!(Complexity::from_total_pages(23), Complexity::Moderate);
    /// ```
    pub fn from_total_pages(total_pages: usize) -> Self {
        match total_pages {
            n if n >= 50 => Self::Complex,
            n if n >= 20 => Self::Moderate,
            n if n >= 6 => Self::Simple,
            _ => Self::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
