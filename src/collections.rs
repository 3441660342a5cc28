use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HuntTarget {
    pub pokemon_id: u32,
    pub pokemon_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionsStore {
    #[serde(default)]
    pub caught: BTreeMap<u32, bool>,
    #[serde(default)]
    pub liked: BTreeMap<u32, bool>,
    /// Area name to the Pokémon being hunted there.
    #[serde(default)]
    pub hunting_list: BTreeMap<String, Vec<HuntTarget>>,
}

impl CollectionsStore {
    pub fn is_caught(&self, pokemon_id: u32) -> bool {
        self.caught.get(&pokemon_id).copied().unwrap_or(false)
    }

    pub fn is_liked(&self, pokemon_id: u32) -> bool {
        self.liked.get(&pokemon_id).copied().unwrap_or(false)
    }

    /// Returns the new caught flag.
    pub fn toggle_caught(&mut self, pokemon_id: u32) -> bool {
        let caught = !self.is_caught(pokemon_id);
        self.caught.insert(pokemon_id, caught);
        caught
    }

    /// Marks as caught; returns `true` when the flag changed.
    pub fn ensure_caught(&mut self, pokemon_id: u32) -> bool {
        if self.is_caught(pokemon_id) {
            return false;
        }
        self.caught.insert(pokemon_id, true);
        true
    }

    /// Returns the new liked flag.
    pub fn toggle_liked(&mut self, pokemon_id: u32) -> bool {
        let liked = !self.is_liked(pokemon_id);
        self.liked.insert(pokemon_id, liked);
        liked
    }

    pub fn liked_ids(&self) -> Vec<u32> {
        self.liked
            .iter()
            .filter(|(_, liked)| **liked)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn caught_count(&self) -> usize {
        self.caught.values().filter(|caught| **caught).count()
    }

    pub fn add_to_hunt(&mut self, pokemon_id: u32, pokemon_name: &str, area: &str) -> bool {
        let area = area.trim();
        if area.is_empty() {
            return false;
        }
        let targets = self.hunting_list.entry(area.to_string()).or_default();
        if targets.iter().any(|target| target.pokemon_id == pokemon_id) {
            return false;
        }
        targets.push(HuntTarget {
            pokemon_id,
            pokemon_name: pokemon_name.to_string(),
        });
        true
    }

    pub fn remove_from_hunt(&mut self, pokemon_id: u32, area: &str) -> bool {
        let Some(targets) = self.hunting_list.get_mut(area) else {
            return false;
        };
        let before = targets.len();
        targets.retain(|target| target.pokemon_id != pokemon_id);
        let removed = targets.len() != before;
        if targets.is_empty() {
            self.hunting_list.remove(area);
        }
        removed
    }

    pub fn is_hunted(&self, pokemon_id: u32) -> bool {
        self.hunting_list
            .values()
            .flatten()
            .any(|target| target.pokemon_id == pokemon_id)
    }

    /// Flattened `(area, target)` pairs in area order.
    pub fn hunt_entries(&self) -> Vec<(&str, &HuntTarget)> {
        self.hunting_list
            .iter()
            .flat_map(|(area, targets)| targets.iter().map(move |target| (area.as_str(), target)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flip_and_report() {
        let mut store = CollectionsStore::default();
        assert!(store.toggle_caught(25));
        assert!(store.is_caught(25));
        assert!(!store.toggle_caught(25));
        assert!(!store.is_caught(25));

        assert!(store.toggle_liked(133));
        assert!(store.toggle_liked(1));
        store.toggle_liked(1);
        assert_eq!(store.liked_ids(), vec![133]);
    }

    #[test]
    fn ensure_caught_only_changes_once() {
        let mut store = CollectionsStore::default();
        assert!(store.ensure_caught(7));
        assert!(!store.ensure_caught(7));
        assert_eq!(store.caught_count(), 1);
    }

    #[test]
    fn hunting_list_appends_and_removes() {
        let mut store = CollectionsStore::default();
        assert!(store.add_to_hunt(129, "Magikarp", "Zone 2"));
        assert!(!store.add_to_hunt(129, "Magikarp", "Zone 2"));
        assert!(store.add_to_hunt(129, "Magikarp", "Zone 6"));
        assert!(store.add_to_hunt(120, "Staryu", "Zone 2"));
        assert!(!store.add_to_hunt(120, "Staryu", "   "));
        assert_eq!(store.hunt_entries().len(), 3);

        assert!(store.remove_from_hunt(129, "Zone 6"));
        assert!(!store.hunting_list.contains_key("Zone 6"));
        assert!(!store.remove_from_hunt(129, "Zone 6"));
        assert!(store.is_hunted(129));
        assert!(store.remove_from_hunt(129, "Zone 2"));
        assert!(!store.is_hunted(129));
    }
}
