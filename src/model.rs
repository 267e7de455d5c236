//! Catalog records as they come off the wire.

use serde::{Deserialize, Serialize};

/// Number of records the API returns per list page.
pub const EXPECTED_PAGE_LEN: usize = 20;

/// The three browsable collections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    #[default]
    Characters,
    Locations,
    Episodes,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Characters,
        Collection::Locations,
        Collection::Episodes,
    ];

    /// Path segment of the REST endpoint (`/character`, ...).
    pub fn endpoint(self) -> &'static str {
        match self {
            Collection::Characters => "character",
            Collection::Locations => "location",
            Collection::Episodes => "episode",
        }
    }

    /// Name used for list pages in `ref` query parameters.
    pub fn plural(self) -> &'static str {
        match self {
            Collection::Characters => "characters",
            Collection::Locations => "locations",
            Collection::Episodes => "episodes",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Collection::Characters => "Characters",
            Collection::Locations => "Locations",
            Collection::Episodes => "Episodes",
        }
    }

    /// Accepts both the singular detail name and the plural list name.
    /// `index` is the landing page, which lists characters.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "character" | "characters" | "index" => Some(Collection::Characters),
            "location" | "locations" => Some(Collection::Locations),
            "episode" | "episodes" => Some(Collection::Episodes),
            _ => None,
        }
    }

    /// Collection whose records a detail page of this collection links to.
    pub fn related(self) -> Collection {
        match self {
            Collection::Characters => Collection::Episodes,
            Collection::Locations => Collection::Characters,
            Collection::Episodes => Collection::Characters,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Collection::Characters => 0,
            Collection::Locations => 1,
            Collection::Episodes => 2,
        }
    }
}

/// `info` block of every list response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl PageInfo {
    /// The `info` part of the body synthesized for a 404.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub info: PageInfo,
    pub results: Vec<Entity>,
}

impl Page {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// `{ name, url }` pointer to another resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedLink {
    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.url)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub species: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "blank_as_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<String>,
    #[serde(default)]
    pub origin: Option<NamedLink>,
    #[serde(default)]
    pub location: Option<NamedLink>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub episode: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "blank_as_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub dimension: Option<String>,
    #[serde(default)]
    pub residents: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub air_date: Option<String>,
    /// Season/episode code such as `S01E05`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub episode: Option<String>,
    #[serde(default)]
    pub characters: Vec<String>,
}

/// A record of any collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Character(Character),
    Location(Location),
    Episode(Episode),
}

impl Entity {
    pub fn id(&self) -> u32 {
        match self {
            Entity::Character(c) => c.id,
            Entity::Location(l) => l.id,
            Entity::Episode(e) => e.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Character(c) => &c.name,
            Entity::Location(l) => &l.name,
            Entity::Episode(e) => &e.name,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Entity::Character(_) => Collection::Characters,
            Entity::Location(_) => Collection::Locations,
            Entity::Episode(_) => Collection::Episodes,
        }
    }

    /// Secondary line shown on list cards.
    pub fn subtitle(&self) -> &str {
        match self {
            Entity::Character(c) => unknown_if_none(c.species.as_deref()),
            Entity::Location(l) => unknown_if_none(l.kind.as_deref()),
            Entity::Episode(e) => unknown_if_none(e.air_date.as_deref()),
        }
    }

    /// URLs of the records this one links to (episodes of a character,
    /// residents of a location, cast of an episode).
    pub fn related_urls(&self) -> &[String] {
        match self {
            Entity::Character(c) => &c.episode,
            Entity::Location(l) => &l.residents,
            Entity::Episode(e) => &e.characters,
        }
    }

    /// Ids of the related records, in the order the URLs were listed.
    pub fn related_ids(&self) -> Vec<u32> {
        self.related_urls()
            .iter()
            .filter_map(|url| id_from_url(url))
            .collect()
    }
}

/// Result of a single-record lookup.
///
/// The API answers a lookup of an unknown id with 404; the client turns that
/// into an empty page whose body carries no usable `id`, which decodes here as
/// `Missing`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Lookup<T> {
    Found(T),
    Missing,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Missing => Lookup::Missing,
        }
    }
}

/// Trailing path segment of a resource URL, as a numeric id.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .filter(|id| *id > 0)
}

/// Positive integer `id` field of a JSON record, if it has one.
pub fn record_id(value: &serde_json::Value) -> Option<u32> {
    value
        .get("id")
        .and_then(|id| id.as_u64())
        .filter(|id| *id > 0)
        .and_then(|id| u32::try_from(id).ok())
}

pub fn unknown_if_none(value: Option<&str>) -> &str {
    value.unwrap_or("Unknown")
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
