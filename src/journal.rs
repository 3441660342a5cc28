use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const NEW_ENTRY_TITLE: &str = "New Note";

const LINK_OPEN: &str = "{{pokemon:";
const LINK_CLOSE: &str = "}}";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JournalStore {
    entries: Vec<JournalEntry>,
}

impl JournalStore {
    pub fn from_entries(mut entries: Vec<JournalEntry>) -> Self {
        sort_newest_first(&mut entries);
        Self { entries }
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Creates an empty note stamped `now_ms` and returns its id.
    pub fn add_entry(&mut self, now_ms: i64) -> String {
        let entry = JournalEntry {
            id: uuid::Uuid::new_v4().to_string(),
            title: NEW_ENTRY_TITLE.to_string(),
            content: String::new(),
            created_at: now_ms,
        };
        let id = entry.id.clone();
        self.entries.insert(0, entry);
        sort_newest_first(&mut self.entries);
        id
    }

    pub fn update_entry(&mut self, id: &str, title: &str, content: &str) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        entry.title = title.to_string();
        entry.content = content.to_string();
        true
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalizes order after deserialization.
    pub fn sort(&mut self) {
        sort_newest_first(&mut self.entries);
    }
}

fn sort_newest_first(entries: &mut [JournalEntry]) {
    // Stable, so notes created in the same millisecond keep insertion order.
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    PokemonLink(&'a str),
}

/// Split note content into plain text and Pokémon link tokens.
/// Unterminated or empty tokens stay as text.
pub fn segments(content: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = content;
    while let Some(start) = rest.find(LINK_OPEN) {
        let after_open = &rest[start + LINK_OPEN.len()..];
        let Some(end) = after_open.find(LINK_CLOSE) else {
            break;
        };
        let name = after_open[..end].trim();
        if name.is_empty() {
            let consumed = start + LINK_OPEN.len() + end + LINK_CLOSE.len();
            out.push(Segment::Text(&rest[..consumed]));
            rest = &rest[consumed..];
            continue;
        }
        if start > 0 {
            out.push(Segment::Text(&rest[..start]));
        }
        out.push(Segment::PokemonLink(name));
        rest = &after_open[end + LINK_CLOSE.len()..];
    }
    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

/// Names of every Pokémon linked from the content, in order.
pub fn linked_pokemon(content: &str) -> Vec<&str> {
    segments(content)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::PokemonLink(name) => Some(name),
            Segment::Text(_) => None,
        })
        .collect()
}
