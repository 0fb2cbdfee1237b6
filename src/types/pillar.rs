use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the three ESG dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pillar {
    #[serde(rename = "E")]
    Environmental,
    #[serde(rename = "S")]
    Social,
    #[serde(rename = "G")]
    Governance,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::Environmental, Pillar::Social, Pillar::Governance];

    pub fn code(self) -> &'static str {
        match self {
            Self::Environmental => "E",
            Self::Social => "S",
            Self::Governance => "G",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Environmental => "Environmental",
            Self::Social => "Social",
            Self::Governance => "Governance",
        }
    }

    /// Tag attributed to a question of this pillar when it carries none.
    pub fn default_tag(self) -> &'static str {
        match self {
            Self::Environmental => "energy",
            Self::Social => "people",
            Self::Governance => "governance",
        }
    }

    /// Parses a pillar letter, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "E" => Some(Self::Environmental),
            "S" => Some(Self::Social),
            "G" => Some(Self::Governance),
            _ => None,
        }
    }

    /// Maps the legacy `category` labels. Anything else is Environmental.
    pub fn from_category(category: &str) -> Self {
        match category {
            "Social" => Self::Social,
            "Governance" => Self::Governance,
            _ => Self::Environmental,
        }
    }

    /// Resolves an explicit pillar code first, then the legacy category.
    ///
    /// A present but unrecognised code does not fall through to the
    /// category; it lands on Environmental like any other unknown value.
    pub fn resolve(code: Option<&str>, category: Option<&str>) -> Self {
        match code.filter(|code| !code.trim().is_empty()) {
            Some(code) => Self::from_code(code).unwrap_or(Self::Environmental),
            None => category
                .map(Self::from_category)
                .unwrap_or(Self::Environmental),
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A value for each pillar, serialized with `E`/`S`/`G` keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarMap<T> {
    #[serde(rename = "E")]
    pub e: T,
    #[serde(rename = "S")]
    pub s: T,
    #[serde(rename = "G")]
    pub g: T,
}

impl<T> PillarMap<T> {
    pub fn new(e: T, s: T, g: T) -> Self {
        Self { e, s, g }
    }

    pub fn from_fn(mut f: impl FnMut(Pillar) -> T) -> Self {
        Self {
            e: f(Pillar::Environmental),
            s: f(Pillar::Social),
            g: f(Pillar::Governance),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Pillar, &T) -> U) -> PillarMap<U> {
        PillarMap {
            e: f(Pillar::Environmental, &self.e),
            s: f(Pillar::Social, &self.s),
            g: f(Pillar::Governance, &self.g),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pillar, &T)> {
        [
            (Pillar::Environmental, &self.e),
            (Pillar::Social, &self.s),
            (Pillar::Governance, &self.g),
        ]
        .into_iter()
    }
}

impl<T> Index<Pillar> for PillarMap<T> {
    type Output = T;

    fn index(&self, pillar: Pillar) -> &T {
        match pillar {
            Pillar::Environmental => &self.e,
            Pillar::Social => &self.s,
            Pillar::Governance => &self.g,
        }
    }
}

impl<T> IndexMut<Pillar> for PillarMap<T> {
    fn index_mut(&mut self, pillar: Pillar) -> &mut T {
        match pillar {
            Pillar::Environmental => &mut self.e,
            Pillar::Social => &mut self.s,
            Pillar::Governance => &mut self.g,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_code_over_category() {
        assert_eq!(
            Pillar::resolve(Some("g"), Some("Social")),
            Pillar::Governance
        );
        assert_eq!(Pillar::resolve(None, Some("Social")), Pillar::Social);
        assert_eq!(Pillar::resolve(Some(""), Some("Governance")), Pillar::Governance);
    }

    #[test]
    fn resolve_defaults_to_environmental() {
        assert_eq!(Pillar::resolve(None, None), Pillar::Environmental);
        assert_eq!(Pillar::resolve(Some("X"), Some("Social")), Pillar::Environmental);
        assert_eq!(Pillar::resolve(None, Some("Economic")), Pillar::Environmental);
    }

    #[test]
    fn pillar_map_serializes_with_letter_keys() {
        let map = PillarMap::new(1, 2, 3);
        let json = serde_json::to_string(&map).expect("map should serialize");
        assert_eq!(json, r#"{"E":1,"S":2,"G":3}"#);
    }
}
