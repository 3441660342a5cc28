use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::collections::CollectionsStore;
use crate::detail::{DetailState, DetailView, PokemonRef};
use crate::journal::{JournalEntry, JournalStore};
use crate::megas::{MegaEvolution, MEGA_EVOLUTIONS};
use crate::navigator::NavigatorState;
use crate::persist::Stores;
use crate::team::{TeamMember, TeamStore};
use crate::zones::{find_in_wild_zones, WILD_ZONES};

pub const DEFAULT_HUNT_AREA: &str = "Lumiose City";
/// Suggestions start once the query is longer than this.
pub const SUGGESTION_MIN_CHARS: usize = 1;
pub const SUGGESTION_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ActiveView {
    #[default]
    Team,
    Pokedex,
    Journal,
    Navigator,
    Zones,
}

impl ActiveView {
    pub const ALL: [ActiveView; 5] = [
        ActiveView::Team,
        ActiveView::Pokedex,
        ActiveView::Journal,
        ActiveView::Navigator,
        ActiveView::Zones,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActiveView::Team => "Team",
            ActiveView::Pokedex => "Pokédex",
            ActiveView::Journal => "Journal",
            ActiveView::Navigator => "Navigator",
            ActiveView::Zones => "Wild Zones",
        }
    }

    /// Views with a text field.
    pub fn has_input(self) -> bool {
        matches!(
            self,
            ActiveView::Pokedex | ActiveView::Journal | ActiveView::Navigator
        )
    }
}

/// What the Pokédex list shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PokedexMode {
    #[default]
    Collections,
    Megas,
}

/// Which journal field receives typed text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum JournalField {
    Title,
    #[default]
    Content,
}

/// A selectable line in the detail panel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailRow {
    Ability { raw_name: String, display_name: String },
    Move { raw_name: String, display_name: String },
    Evolution(PokemonRef),
}

/// A selectable line in the Pokédex view: liked Pokémon, then hunt targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CollectionRow {
    Liked(u32),
    Hunt {
        area: String,
        pokemon_id: u32,
        pokemon_name: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub view: ActiveView,
    pub editing: bool,

    pub team: TeamStore,
    pub collections: CollectionsStore,
    pub journal: JournalStore,

    pub detail: DetailState,
    pub detail_cursor: usize,
    pub navigator: NavigatorState,
    pub navigator_input: String,

    pub pokedex_query: String,
    pub pokedex_mode: PokedexMode,
    pub species_names: Vec<String>,
    pub species_index_loading: bool,
    pub list_cursor: usize,
    pub journal_selected: Option<String>,
    pub journal_field: JournalField,

    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Stores::default())
    }
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        Self {
            terminal_size: (80, 24),
            view: ActiveView::Team,
            editing: false,
            team: stores.team,
            collections: stores.collections,
            journal: stores.journal,
            detail: DetailState::default(),
            detail_cursor: 0,
            navigator: NavigatorState::default(),
            navigator_input: String::new(),
            pokedex_query: String::new(),
            pokedex_mode: PokedexMode::Collections,
            species_names: Vec::new(),
            species_index_loading: false,
            list_cursor: 0,
            journal_selected: None,
            journal_field: JournalField::Content,
            message: None,
        }
    }

    pub fn selected_journal_entry(&self) -> Option<&JournalEntry> {
        self.journal.get(self.journal_selected.as_deref()?)
    }

    pub fn selected_member(&self) -> Option<&TeamMember> {
        self.team.members().get(self.list_cursor)
    }

    /// Rows the detail cursor moves over for the panel's current view.
    pub fn detail_rows(&self) -> Vec<DetailRow> {
        if !matches!(self.detail.view, DetailView::Pokemon { .. }) {
            return Vec::new();
        }
        let Some(pokemon) = self.detail.current_pokemon() else {
            return Vec::new();
        };
        let abilities = pokemon.abilities.iter().map(|ability| DetailRow::Ability {
            raw_name: ability.raw_name.clone(),
            display_name: ability.display_name.clone(),
        });
        let evolutions = pokemon
            .evolution
            .iter()
            .filter(|stage| stage.name != pokemon.name)
            .map(|stage| {
                DetailRow::Evolution(match stage.id {
                    Some(id) => PokemonRef::Id(id),
                    None => PokemonRef::Name(stage.name.clone()),
                })
            });
        let moves = pokemon.moves.iter().map(|mv| DetailRow::Move {
            raw_name: mv.raw_name.clone(),
            display_name: mv.name.clone(),
        });
        abilities.chain(evolutions).chain(moves).collect()
    }

    pub fn selected_detail_row(&self) -> Option<DetailRow> {
        self.detail_rows().into_iter().nth(self.detail_cursor)
    }

    pub fn collection_rows(&self) -> Vec<CollectionRow> {
        let liked = self
            .collections
            .liked_ids()
            .into_iter()
            .map(CollectionRow::Liked);
        let hunts = self
            .collections
            .hunt_entries()
            .into_iter()
            .map(|(area, target)| CollectionRow::Hunt {
                area: area.to_string(),
                pokemon_id: target.pokemon_id,
                pokemon_name: target.pokemon_name.clone(),
            });
        liked.chain(hunts).collect()
    }

    /// Species names containing the typed query, case-insensitively.
    pub fn name_suggestions(&self) -> Vec<&str> {
        let query = self.pokedex_query.trim().to_lowercase();
        if query.chars().count() <= SUGGESTION_MIN_CHARS {
            return Vec::new();
        }
        self.species_names
            .iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .take(SUGGESTION_LIMIT)
            .map(String::as_str)
            .collect()
    }

    /// The highlighted Mega Evolution while the Pokédex browses megas.
    pub fn selected_mega(&self) -> Option<&'static MegaEvolution> {
        if self.pokedex_mode != PokedexMode::Megas {
            return None;
        }
        MEGA_EVOLUTIONS.get(self.list_cursor)
    }

    /// `(zone name, pokemon id, pokemon name)` for every zone listing.
    pub fn zone_rows(&self) -> Vec<(&'static str, u32, &'static str)> {
        WILD_ZONES
            .iter()
            .flat_map(|zone| {
                zone.pokemon
                    .iter()
                    .map(move |pokemon| (zone.name, pokemon.id, pokemon.name))
            })
            .collect()
    }

    /// Number of rows the list cursor moves over in the active view.
    pub fn list_len(&self) -> usize {
        match self.view {
            ActiveView::Team => self.team.len(),
            ActiveView::Pokedex => match self.pokedex_mode {
                PokedexMode::Collections => self.collection_rows().len(),
                PokedexMode::Megas => MEGA_EVOLUTIONS.len(),
            },
            ActiveView::Journal => self.journal.len(),
            ActiveView::Navigator => 0,
            ActiveView::Zones => self.zone_rows().len(),
        }
    }

    /// Area recorded when hunting a Pokémon: its first wild zone, if any.
    pub fn hunt_area_for(&self, pokemon_id: u32) -> String {
        find_in_wild_zones(pokemon_id)
            .into_iter()
            .next()
            .map(|sighting| sighting.zone_name)
            .unwrap_or_else(|| DEFAULT_HUNT_AREA.to_string())
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("View")
                .entry("view", ron_string(&self.view))
                .entry("editing", ron_string(&self.editing))
                .entry("list_cursor", ron_string(&self.list_cursor))
                .entry("message", ron_string(&self.message)),
            DebugSection::new("Detail")
                .entry("view", ron_string(&self.detail.view))
                .entry("loading", ron_string(&self.detail.loading))
                .entry("error", ron_string(&self.detail.error))
                .entry("generation", ron_string(&self.detail.generation))
                .entry("pending", ron_string(&self.detail.pending))
                .entry("cursor", ron_string(&self.detail_cursor)),
            DebugSection::new("Pokédex")
                .entry("query", ron_string(&self.pokedex_query))
                .entry("mode", ron_string(&self.pokedex_mode))
                .entry("species_names", ron_string(&self.species_names.len()))
                .entry("species_index_loading", ron_string(&self.species_index_loading)),
            DebugSection::new("Navigator")
                .entry("prompt", ron_string(&self.navigator.prompt))
                .entry("loading", ron_string(&self.navigator.loading))
                .entry("error", ron_string(&self.navigator.error))
                .entry("generation", ron_string(&self.navigator.generation)),
            DebugSection::new("Team")
                .entry("members", ron_string(&self.team.len()))
                .entry(
                    "species",
                    ron_string(
                        &self
                            .team
                            .members()
                            .iter()
                            .map(|member| member.species.clone())
                            .collect::<Vec<_>>(),
                    ),
                ),
            DebugSection::new("Collections")
                .entry("caught", ron_string(&self.collections.caught_count()))
                .entry("liked", ron_string(&self.collections.liked_ids().len()))
                .entry("hunting", ron_string(&self.collections.hunt_entries().len())),
            DebugSection::new("Journal")
                .entry("entries", ron_string(&self.journal.len()))
                .entry("selected", ron_string(&self.journal_selected))
                .entry("field", ron_string(&self.journal_field)),
        ]
    }
}
