use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TeamError;

pub const TEAM_CAPACITY: usize = 6;
pub const MOVE_SLOTS: usize = 4;
pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 100;

/// Outcome of inserting a move into a [`MoveSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MoveInsert {
    /// Written into the first empty slot.
    Filled(usize),
    /// All slots were taken; slot 0 was overwritten.
    Replaced(usize),
    /// The move was already known; nothing written.
    Duplicate,
}

impl MoveInsert {
    pub fn written(self) -> bool {
        !matches!(self, MoveInsert::Duplicate)
    }
}

/// Exactly four move slots. Names are unique across filled slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoveSet([Option<String>; MOVE_SLOTS]);

impl MoveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_move(name: &str) -> Self {
        let mut set = Self::new();
        set.insert(name);
        set
    }

    /// Shared assignment rule for staged moves and move updates:
    /// skip duplicates, else first empty slot, else overwrite slot 0.
    pub fn insert(&mut self, name: &str) -> MoveInsert {
        if self.contains(name) {
            return MoveInsert::Duplicate;
        }
        if let Some(slot) = self.0.iter().position(Option::is_none) {
            self.0[slot] = Some(name.to_string());
            return MoveInsert::Filled(slot);
        }
        self.0[0] = Some(name.to_string());
        MoveInsert::Replaced(0)
    }

    /// Set one slot explicitly. An empty name clears the slot.
    pub fn set(&mut self, slot: usize, name: &str) -> Result<(), TeamError> {
        if slot >= MOVE_SLOTS {
            return Err(TeamError::SlotOutOfRange(slot));
        }
        let name = name.trim();
        if name.is_empty() {
            self.0[slot] = None;
            return Ok(());
        }
        let taken_elsewhere = self
            .0
            .iter()
            .enumerate()
            .any(|(idx, existing)| idx != slot && existing.as_deref() == Some(name));
        if taken_elsewhere {
            return Err(TeamError::DuplicateMove(name.to_string()));
        }
        self.0[slot] = Some(name.to_string());
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|slot| slot.as_deref() == Some(name))
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.0.get(slot).and_then(|name| name.as_deref())
    }

    pub fn slots(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(|slot| slot.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamMember {
    pub id: String,
    pub species: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub pokemon_id: Option<u32>,
    #[serde(default)]
    pub held_item: Option<String>,
    #[serde(default)]
    pub moves: MoveSet,
    #[serde(default)]
    pub is_shiny: bool,
    pub types: Vec<String>,
}

impl TeamMember {
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species)
    }
}

/// Input for [`TeamStore::add`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AddTeamMember {
    pub species: String,
    pub level: u32,
    pub nickname: Option<String>,
    pub pokemon_id: Option<u32>,
    pub initial_move: Option<String>,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TeamStore {
    members: Vec<TeamMember>,
}

impl TeamStore {
    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= TEAM_CAPACITY
    }

    pub fn get(&self, id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn find_by_pokemon(&self, pokemon_id: u32) -> Option<&TeamMember> {
        self.members
            .iter()
            .find(|member| member.pokemon_id == Some(pokemon_id))
    }

    pub fn add(&mut self, data: AddTeamMember) -> Result<&TeamMember, TeamError> {
        if self.is_full() {
            return Err(TeamError::RosterFull(TEAM_CAPACITY));
        }
        let species = data.species.trim();
        if species.is_empty() {
            return Err(TeamError::MissingSpecies);
        }
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&data.level) {
            return Err(TeamError::InvalidLevel(data.level));
        }
        if data.types.is_empty() || data.types.len() > 2 {
            return Err(TeamError::InvalidTypes(data.types.len()));
        }

        let moves = data
            .initial_move
            .as_deref()
            .map(MoveSet::with_move)
            .unwrap_or_default();
        let nickname = data
            .nickname
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        self.members.push(TeamMember {
            id: uuid::Uuid::new_v4().to_string(),
            species: species.to_string(),
            nickname,
            level: data.level,
            pokemon_id: data.pokemon_id,
            held_item: None,
            moves,
            is_shiny: false,
            types: data.types,
        });
        Ok(&self.members[self.members.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member.id != id);
        self.members.len() != before
    }

    pub fn update_nickname(&mut self, id: &str, nickname: &str) -> Result<(), TeamError> {
        let member = self.member_mut(id)?;
        let nickname = nickname.trim();
        member.nickname = (!nickname.is_empty()).then(|| nickname.to_string());
        Ok(())
    }

    pub fn update_level(&mut self, id: &str, level: u32) -> Result<(), TeamError> {
        let member = self.member_mut(id)?;
        member.level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        Ok(())
    }

    pub fn update_item(&mut self, id: &str, item: &str) -> Result<(), TeamError> {
        let member = self.member_mut(id)?;
        let item = item.trim();
        member.held_item = (!item.is_empty()).then(|| item.to_string());
        Ok(())
    }

    /// Teach a member a move using the shared insertion rule.
    pub fn update_move(&mut self, id: &str, name: &str) -> Result<MoveInsert, TeamError> {
        Ok(self.member_mut(id)?.moves.insert(name))
    }

    /// Edit one slot directly, as the roster editor does.
    pub fn set_move_slot(&mut self, id: &str, slot: usize, name: &str) -> Result<(), TeamError> {
        self.member_mut(id)?.moves.set(slot, name)
    }

    pub fn toggle_shiny(&mut self, id: &str) -> Result<bool, TeamError> {
        let member = self.member_mut(id)?;
        member.is_shiny = !member.is_shiny;
        Ok(member.is_shiny)
    }

    /// Write a staged move onto the member with the given Pokédex id.
    /// Returns `None` when no such member is on the team.
    pub fn assign_move(&mut self, pokemon_id: u32, name: &str) -> Option<MoveInsert> {
        let member = self
            .members
            .iter_mut()
            .find(|member| member.pokemon_id == Some(pokemon_id))?;
        Some(member.moves.insert(name))
    }

    fn member_mut(&mut self, id: &str) -> Result<&mut TeamMember, TeamError> {
        self.members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or_else(|| TeamError::UnknownMember(id.to_string()))
    }
}
