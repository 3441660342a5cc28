//! Detail panel navigation.
//!
//! One panel shows a Pokémon, or an ability/move opened from that Pokémon.
//! `back` returns to the Pokémon using the data already on hand. Every
//! transition bumps `generation`; fetch results carry the generation they were
//! issued under and are dropped once it is no longer current.
//!
//! A staged move ([`PendingMoveAssignment`]) lives beside the panel, not in it,
//! and survives `close`.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::{api_slug, AbilityDetail, MoveDetail, PokemonDetail};

/// A Pokémon by National Dex number or by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PokemonRef {
    Id(u32),
    Name(String),
}

impl PokemonRef {
    /// Parse free text: digits become an id, anything else a name.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().trim_start_matches('#');
        if input.is_empty() {
            return None;
        }
        match input.parse::<u32>() {
            Ok(id) => Some(PokemonRef::Id(id)),
            Err(_) => Some(PokemonRef::Name(input.to_string())),
        }
    }

    /// Path segment for the lookup service.
    pub fn api_key(&self) -> String {
        match self {
            PokemonRef::Id(id) => id.to_string(),
            PokemonRef::Name(name) => api_slug(name),
        }
    }

    /// Whether `detail` is the Pokémon this reference points at.
    pub fn matches(&self, detail: &PokemonDetail) -> bool {
        match self {
            PokemonRef::Id(id) => *id == detail.id,
            PokemonRef::Name(name) => api_slug(name) == detail.name,
        }
    }
}

impl fmt::Display for PokemonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PokemonRef::Id(id) => write!(f, "{id}"),
            PokemonRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for PokemonRef {
    fn from(id: u32) -> Self {
        PokemonRef::Id(id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailView {
    #[default]
    Closed,
    Pokemon {
        target: PokemonRef,
    },
    Ability {
        name: String,
        origin: PokemonRef,
    },
    Move {
        name: String,
        origin: PokemonRef,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailFetch {
    Pokemon(PokemonRef),
    Ability(String),
    Move(String),
}

/// A fetch the panel wants issued, tagged with the generation it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DetailRequest {
    pub generation: u64,
    pub kind: DetailFetch,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PendingMoveAssignment {
    pub pokemon_id: u32,
    pub move_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailState {
    pub view: DetailView,
    pub pokemon: Option<PokemonDetail>,
    pub ability: Option<AbilityDetail>,
    pub move_detail: Option<MoveDetail>,
    pub loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    pub pending: Option<PendingMoveAssignment>,
}

impl DetailState {
    pub fn is_open(&self) -> bool {
        !matches!(self.view, DetailView::Closed)
    }

    /// Show a Pokémon from any state. The previous data stays visible until
    /// the new result arrives.
    pub fn open_pokemon(&mut self, target: PokemonRef) -> DetailRequest {
        self.view = DetailView::Pokemon {
            target: target.clone(),
        };
        self.begin(DetailFetch::Pokemon(target))
    }

    /// Only valid while a Pokémon is shown.
    pub fn open_ability(&mut self, name: &str) -> Option<DetailRequest> {
        let origin = self.pokemon_target()?.clone();
        self.view = DetailView::Ability {
            name: name.to_string(),
            origin,
        };
        Some(self.begin(DetailFetch::Ability(name.to_string())))
    }

    /// Only valid while a Pokémon is shown.
    pub fn open_move(&mut self, name: &str) -> Option<DetailRequest> {
        let origin = self.pokemon_target()?.clone();
        self.view = DetailView::Move {
            name: name.to_string(),
            origin,
        };
        Some(self.begin(DetailFetch::Move(name.to_string())))
    }

    /// Return to the origin Pokémon without fetching.
    pub fn back(&mut self) -> bool {
        let origin = match &self.view {
            DetailView::Ability { origin, .. } | DetailView::Move { origin, .. } => origin.clone(),
            DetailView::Closed | DetailView::Pokemon { .. } => return false,
        };
        self.view = DetailView::Pokemon { target: origin };
        self.settle();
        true
    }

    pub fn close(&mut self) {
        self.view = DetailView::Closed;
        self.settle();
    }

    pub fn pokemon_loaded(&mut self, generation: u64, result: Result<PokemonDetail, String>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(detail) => {
                self.pokemon = Some(detail);
                self.error = None;
            }
            Err(message) => {
                self.pokemon = None;
                self.error = Some(message);
            }
        }
        true
    }

    pub fn ability_loaded(&mut self, generation: u64, result: Result<AbilityDetail, String>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(detail) => {
                self.ability = Some(detail);
                self.error = None;
            }
            Err(message) => {
                self.ability = None;
                self.error = Some(message);
            }
        }
        true
    }

    pub fn move_loaded(&mut self, generation: u64, result: Result<MoveDetail, String>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(detail) => {
                self.move_detail = Some(detail);
                self.error = None;
            }
            Err(message) => {
                self.move_detail = None;
                self.error = Some(message);
            }
        }
        true
    }

    /// Remember a move for a Pokémon. Navigation is untouched.
    pub fn stage_move(&mut self, pokemon_id: u32, move_name: &str) {
        self.pending = Some(PendingMoveAssignment {
            pokemon_id,
            move_name: move_name.to_string(),
        });
    }

    /// The staged move, if it belongs to `pokemon_id`.
    pub fn staged_move_for(&self, pokemon_id: u32) -> Option<&str> {
        self.pending
            .as_ref()
            .filter(|pending| pending.pokemon_id == pokemon_id)
            .map(|pending| pending.move_name.as_str())
    }

    pub fn take_pending(&mut self) -> Option<PendingMoveAssignment> {
        self.pending.take()
    }

    /// The Pokémon shown (or the origin of the ability/move shown), once loaded.
    pub fn current_pokemon(&self) -> Option<&PokemonDetail> {
        let target = match &self.view {
            DetailView::Closed => return None,
            DetailView::Pokemon { target } => target,
            DetailView::Ability { origin, .. } | DetailView::Move { origin, .. } => origin,
        };
        self.pokemon.as_ref().filter(|detail| target.matches(detail))
    }

    pub fn title(&self) -> String {
        match &self.view {
            DetailView::Closed => String::new(),
            DetailView::Pokemon { target } => match self.current_pokemon() {
                Some(detail) => format!("#{} {}", detail.id, detail.display_name()),
                None => target.to_string(),
            },
            DetailView::Ability { name, origin } => format!("Ability: {name} (from {origin})"),
            DetailView::Move { name, origin } => format!("Move: {name} (from {origin})"),
        }
    }

    fn pokemon_target(&self) -> Option<&PokemonRef> {
        match &self.view {
            DetailView::Pokemon { target } => Some(target),
            _ => None,
        }
    }

    fn begin(&mut self, kind: DetailFetch) -> DetailRequest {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        DetailRequest {
            generation: self.generation,
            kind,
        }
    }

    fn settle(&mut self) {
        self.generation += 1;
        self.loading = false;
        self.error = None;
    }

    fn accepts(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
