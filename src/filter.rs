//! Filter state shared by the list pages.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Collection;

/// Query parameters the catalog endpoints filter on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FilterKey {
    Name,
    Status,
    Species,
    Gender,
    Type,
    Dimension,
    Episode,
}

impl FilterKey {
    pub fn param(self) -> &'static str {
        match self {
            FilterKey::Name => "name",
            FilterKey::Status => "status",
            FilterKey::Species => "species",
            FilterKey::Gender => "gender",
            FilterKey::Type => "type",
            FilterKey::Dimension => "dimension",
            FilterKey::Episode => "episode",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Name => "Name",
            FilterKey::Status => "Status",
            FilterKey::Species => "Species",
            FilterKey::Gender => "Gender",
            FilterKey::Type => "Type",
            FilterKey::Dimension => "Dimension",
            FilterKey::Episode => "Episode",
        }
    }
}

/// Filter key to value. Blank values count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    values: BTreeMap<FilterKey, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: FilterKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn remove(&mut self, key: FilterKey) {
        self.values.remove(&key);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Stored value, blank or not.
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Entries that would be sent with a request.
    pub fn active(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.values
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (*key, value.as_str()))
    }

    /// `(param, value)` pairs for the request query, blank entries dropped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.active()
            .map(|(key, value)| (key.param().to_string(), value.to_string()))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// `Species: Human, Status: Alive` or `No filters applied`.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .active()
            .map(|(key, value)| format!("{}: {value}", key.label()))
            .collect();
        if parts.is_empty() {
            "No filters applied".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Applies free-text search input to the filters of `collection`.
///
/// Episode searches that look like an episode code (`S01E05`, `S02`) filter on
/// `episode`; everything else filters on `name`. Only one of the two is kept.
pub fn apply_search(collection: Collection, filters: &mut FilterState, input: &str) {
    if collection != Collection::Episodes {
        filters.set(FilterKey::Name, input);
        return;
    }
    match classify_episode_search(input) {
        FilterKey::Episode => {
            filters.set(FilterKey::Episode, input);
            filters.remove(FilterKey::Name);
        }
        _ => {
            filters.set(FilterKey::Name, input);
            filters.remove(FilterKey::Episode);
        }
    }
}

/// `FilterKey::Episode` for `S<2 digits>E<2 digits>` or `S<2 digits>`
/// (case-insensitive), `FilterKey::Name` otherwise.
pub fn classify_episode_search(input: &str) -> FilterKey {
    if episode_code_pattern().is_match(input) {
        FilterKey::Episode
    } else {
        FilterKey::Name
    }
}

fn episode_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^S\d{2}(E\d{2})?$").expect("valid episode pattern"))
}

/// Select filters offered for a collection, with their fixed option lists.
pub fn select_options(collection: Collection) -> &'static [(FilterKey, &'static [&'static str])] {
    match collection {
        Collection::Characters => CHARACTER_SELECTS,
        Collection::Locations => LOCATION_SELECTS,
        Collection::Episodes => &[],
    }
}

/// Value after `current` in `options`, stepping through "all" (empty) first.
pub fn cycle_option(options: &[&str], current: Option<&str>, step: i16) -> String {
    let current = current.unwrap_or("");
    let len = options.len() as i16 + 1;
    let index = options
        .iter()
        .position(|option| *option == current)
        .map(|idx| idx as i16 + 1)
        .unwrap_or(0);
    let next = (index + step).rem_euclid(len);
    if next == 0 {
        String::new()
    } else {
        options[(next - 1) as usize].to_string()
    }
}

const CHARACTER_SELECTS: &[(FilterKey, &[&str])] = &[
    (
        FilterKey::Species,
        &[
            "Human",
            "Alien",
            "Humanoid",
            "Poopybutthole",
            "Mythological Creature",
            "Robot",
            "Animal",
            "Cronenberg",
            "Disease",
        ],
    ),
    (FilterKey::Gender, &["Female", "Male", "Genderless", "unknown"]),
    (FilterKey::Status, &["Alive", "Dead", "unknown"]),
];

const LOCATION_SELECTS: &[(FilterKey, &[&str])] = &[
    (
        FilterKey::Type,
        &[
            "Acid Plant",
            "Arcade",
            "Artificially generated world",
            "Asteroid",
            "Base",
            "Box",
            "Cluster",
            "Consciousness",
            "Convention",
            "Country",
            "Customs",
            "Daycare",
            "Death Star",
            "Diegesis",
            "Dimension",
            "Dream",
            "Dwarf planet (Celestial Dwarf)",
            "Elemental Rings",
            "Fantasy town",
            "Game",
            "Hell",
            "Human",
            "Liquid",
            "Machine",
            "Memory",
            "Menagerie",
            "Microverse",
            "Miniverse",
            "Mount",
            "Nightmare",
            "Non-Diegetic Alternative Reality",
            "Planet",
            "Police Department",
            "Quadrant",
            "Quasar",
            "Reality",
            "Resort",
            "Spa",
            "Space",
            "Space station",
            "Spacecraft",
            "TV",
            "Teenyverse",
            "Woods",
            "unknown",
        ],
    ),
    (
        FilterKey::Dimension,
        &[
            "Chair Dimension",
            "Cromulon Dimension",
            "Cronenberg Dimension",
            "Dimension 5-126",
            "Dimension C-137",
            "Dimension C-35",
            "Dimension C-500A",
            "Dimension D-99",
            "Dimension D716",
            "Dimension D716-B",
            "Dimension D716-C",
            "Dimension J-22",
            "Dimension J19ζ7",
            "Dimension K-22",
            "Dimension K-83",
            "Eric Stoltz Mask Dimension",
            "Evil Rick's Target Dimension",
            "Fantasy Dimension",
            "Fascist Dimension",
            "Fascist Shrimp Dimension",
            "Fascist Teddy Bear Dimension",
            "Giant Telepathic Spiders Dimension",
            "Magic Dimension",
            "Merged Dimension",
            "Phone Dimension",
            "Pizza Dimension",
            "Post-Apocalyptic Dimension",
            "Replacement Dimension",
            "Testicle Monster Dimension",
            "Tusk Dimension",
            "Unknown dimension",
            "Wasp Dimension",
            "unknown",
        ],
    ),
];
