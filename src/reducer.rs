use tracing::debug;
use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::detail::{DetailView, PokemonRef};
use crate::effect::Effect;
use crate::error::TeamError;
use crate::megas::{step_index, MEGA_EVOLUTIONS};
use crate::state::{ActiveView, AppState, CollectionRow, DetailRow, PokedexMode};
use crate::team::{AddTeamMember, MoveInsert};

/// Level given to Pokémon added straight from the detail panel.
pub const DEFAULT_ADD_LEVEL: u32 = 5;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.message = Some(format!(
                "{} on team, {} caught, {} notes",
                state.team.len(),
                state.collections.caught_count(),
                state.journal.len()
            ));
            state.species_index_loading = true;
            DispatchResult::changed_with(Effect::LoadSpeciesIndex)
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::ViewSet(view) => {
            if state.view == view {
                return DispatchResult::unchanged();
            }
            state.view = view;
            state.editing = false;
            state.list_cursor = 0;
            DispatchResult::changed()
        }

        Action::EditStart => {
            if !state.view.has_input() || state.editing {
                return DispatchResult::unchanged();
            }
            if state.view == ActiveView::Journal && state.selected_journal_entry().is_none() {
                return DispatchResult::unchanged();
            }
            state.editing = true;
            DispatchResult::changed()
        }

        Action::Escape => {
            let was_editing = std::mem::take(&mut state.editing);
            if state.detail.is_open() {
                state.detail.close();
                state.detail_cursor = 0;
                return DispatchResult::changed();
            }
            if was_editing {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::CursorMove(delta) => {
            let len = if state.detail.is_open() {
                state.detail_rows().len()
            } else {
                state.list_len()
            };
            let cursor = if state.detail.is_open() {
                &mut state.detail_cursor
            } else {
                &mut state.list_cursor
            };
            let next = step_cursor(*cursor, delta, len);
            if next == *cursor {
                return DispatchResult::unchanged();
            }
            *cursor = next;
            DispatchResult::changed()
        }

        Action::CursorActivate => activate_selection(state),

        Action::DetailOpenPokemon(target) => open_pokemon(state, target),

        Action::DetailOpenAbility(name) => match state.detail.open_ability(&name) {
            Some(request) => {
                state.detail_cursor = 0;
                DispatchResult::changed_with(Effect::LoadDetail(request))
            }
            None => DispatchResult::unchanged(),
        },

        Action::DetailOpenMove(name) => match state.detail.open_move(&name) {
            Some(request) => {
                state.detail_cursor = 0;
                DispatchResult::changed_with(Effect::LoadDetail(request))
            }
            None => DispatchResult::unchanged(),
        },

        Action::DetailBack => {
            if state.detail.back() {
                state.detail_cursor = 0;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::DetailClose => {
            if !state.detail.is_open() {
                return DispatchResult::unchanged();
            }
            state.detail.close();
            state.detail_cursor = 0;
            DispatchResult::changed()
        }

        Action::DetailPokemonDidLoad { generation, detail } => {
            applied(state.detail.pokemon_loaded(generation, Ok(detail)), "pokemon", generation)
        }
        Action::DetailPokemonDidError { generation, error } => {
            applied(state.detail.pokemon_loaded(generation, Err(error)), "pokemon", generation)
        }
        Action::DetailAbilityDidLoad { generation, detail } => {
            applied(state.detail.ability_loaded(generation, Ok(detail)), "ability", generation)
        }
        Action::DetailAbilityDidError { generation, error } => {
            applied(state.detail.ability_loaded(generation, Err(error)), "ability", generation)
        }
        Action::DetailMoveDidLoad { generation, detail } => {
            applied(state.detail.move_loaded(generation, Ok(detail)), "move", generation)
        }
        Action::DetailMoveDidError { generation, error } => {
            applied(state.detail.move_loaded(generation, Err(error)), "move", generation)
        }

        Action::DetailStageMove {
            pokemon_id,
            move_name,
        } => {
            state.detail.stage_move(pokemon_id, &move_name);
            state.message = Some(format!("{move_name} staged"));
            finish(resolve_pending(state).into_iter().collect())
        }

        Action::DetailAddToTeam => add_current_to_team(state),

        Action::TeamAdd(data) => match state.team.add(data) {
            Ok(member) => {
                state.message = Some(format!("{} joined the team", member.display_name()));
                team_changed(state)
            }
            Err(err) => rejected(state, err),
        },

        Action::TeamRemove(id) => {
            if !state.team.remove(&id) {
                return DispatchResult::unchanged();
            }
            state.list_cursor = state.list_cursor.min(state.team.len().saturating_sub(1));
            team_changed(state)
        }

        Action::TeamNicknameSet { id, nickname } => {
            team_result(state, |team| team.update_nickname(&id, &nickname))
        }
        Action::TeamLevelSet { id, level } => team_result(state, |team| team.update_level(&id, level)),
        Action::TeamItemSet { id, item } => team_result(state, |team| team.update_item(&id, &item)),
        Action::TeamMoveUpdate { id, move_name } => match state.team.update_move(&id, &move_name) {
            Ok(MoveInsert::Duplicate) => {
                state.message = Some(format!("Already knows {move_name}"));
                DispatchResult::changed()
            }
            Ok(_) => team_changed(state),
            Err(err) => rejected(state, err),
        },
        Action::TeamMoveSlotSet {
            id,
            slot,
            move_name,
        } => team_result(state, |team| team.set_move_slot(&id, slot, &move_name)),
        Action::TeamShinyToggle(id) => team_result(state, |team| team.toggle_shiny(&id).map(|_| ())),

        Action::CollectionsCaughtToggle(pokemon_id) => {
            state.collections.toggle_caught(pokemon_id);
            collections_changed(state)
        }

        Action::CollectionsLikedToggle(pokemon_id) => {
            state.collections.toggle_liked(pokemon_id);
            collections_changed(state)
        }

        Action::CollectionsHuntAdd {
            pokemon_id,
            pokemon_name,
            area,
        } => {
            if !state.collections.add_to_hunt(pokemon_id, &pokemon_name, &area) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Hunting {pokemon_name} in {}", area.trim()));
            collections_changed(state)
        }

        Action::CollectionsHuntRemove { pokemon_id, area } => {
            if !state.collections.remove_from_hunt(pokemon_id, &area) {
                return DispatchResult::unchanged();
            }
            state.list_cursor = state
                .list_cursor
                .min(state.collection_rows().len().saturating_sub(1));
            collections_changed(state)
        }

        Action::JournalAdd { now_ms } => {
            let id = state.journal.add_entry(now_ms);
            state.journal_selected = Some(id);
            state.view = ActiveView::Journal;
            state.list_cursor = 0;
            journal_changed(state)
        }

        Action::JournalSelect(id) => {
            if state.journal.get(&id).is_none() {
                return DispatchResult::unchanged();
            }
            state.journal_selected = Some(id);
            state.view = ActiveView::Journal;
            DispatchResult::changed()
        }

        Action::JournalUpdate { id, title, content } => {
            if !state.journal.update_entry(&id, &title, &content) {
                return DispatchResult::unchanged();
            }
            journal_changed(state)
        }

        Action::JournalDelete(id) => {
            if !state.journal.delete_entry(&id) {
                return DispatchResult::unchanged();
            }
            if state.journal_selected.as_deref() == Some(id.as_str()) {
                state.journal_selected = None;
                state.editing = false;
                state.view = ActiveView::Team;
                state.list_cursor = 0;
            } else {
                state.list_cursor = state.list_cursor.min(state.journal.len().saturating_sub(1));
            }
            journal_changed(state)
        }

        Action::JournalFieldSet(field) => {
            if state.journal_field == field {
                return DispatchResult::unchanged();
            }
            state.journal_field = field;
            DispatchResult::changed()
        }

        Action::NavigatorInputChanged(text) => {
            if state.navigator_input == text {
                return DispatchResult::unchanged();
            }
            state.navigator_input = text;
            DispatchResult::changed()
        }

        Action::NavigatorSubmit => {
            let prompt = state.navigator_input.clone();
            match state.navigator.submit(&prompt) {
                Some(request) => {
                    state.editing = false;
                    DispatchResult::changed_with(Effect::AskNavigator(request))
                }
                None => DispatchResult::unchanged(),
            }
        }

        Action::NavigatorDidAnswer { generation, text } => {
            match state.navigator.resolve(generation, Ok(text)) {
                Some(true) => {
                    state.view = ActiveView::Team;
                    state.list_cursor = 0;
                    state.message = Some("Hunt confirmed".to_string());
                    DispatchResult::changed()
                }
                Some(false) => DispatchResult::changed(),
                None => {
                    debug!(generation, "dropping stale navigator answer");
                    DispatchResult::unchanged()
                }
            }
        }

        Action::NavigatorDidError { generation, error } => {
            match state.navigator.resolve(generation, Err(error)) {
                Some(_) => DispatchResult::changed(),
                None => {
                    debug!(generation, "dropping stale navigator error");
                    DispatchResult::unchanged()
                }
            }
        }

        Action::NavigatorReset => {
            state.navigator.reset();
            state.navigator_input.clear();
            DispatchResult::changed()
        }

        Action::PokedexQueryChanged(query) => {
            if state.pokedex_query == query {
                return DispatchResult::unchanged();
            }
            state.pokedex_query = query;
            DispatchResult::changed()
        }

        Action::PokedexQuerySubmit => match PokemonRef::parse(&state.pokedex_query) {
            Some(target) => {
                state.editing = false;
                open_pokemon(state, target)
            }
            None => DispatchResult::unchanged(),
        },

        Action::PokedexSuggestionAccept => {
            let Some(name) = state.name_suggestions().first().map(|name| name.to_string()) else {
                return DispatchResult::unchanged();
            };
            if state.pokedex_query == name {
                return DispatchResult::unchanged();
            }
            state.pokedex_query = name;
            DispatchResult::changed()
        }

        Action::PokedexMegaToggle => {
            if state.view != ActiveView::Pokedex {
                return DispatchResult::unchanged();
            }
            state.list_cursor = 0;
            match state.pokedex_mode {
                PokedexMode::Collections => {
                    state.pokedex_mode = PokedexMode::Megas;
                    state.pokedex_query.clear();
                    state.editing = false;
                    open_mega(state)
                }
                PokedexMode::Megas => {
                    state.pokedex_mode = PokedexMode::Collections;
                    state.detail.close();
                    state.detail_cursor = 0;
                    DispatchResult::changed()
                }
            }
        }

        Action::PokedexMegaStep(delta) => {
            if state.pokedex_mode != PokedexMode::Megas || delta == 0 {
                return DispatchResult::unchanged();
            }
            state.list_cursor = step_index(state.list_cursor, delta);
            open_mega(state)
        }

        Action::SpeciesIndexDidLoad(names) => {
            state.species_index_loading = false;
            state.species_names = names;
            DispatchResult::changed()
        }

        Action::SpeciesIndexDidError(error) => {
            state.species_index_loading = false;
            debug!(%error, "name suggestions unavailable");
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn finish(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn applied(accepted: bool, kind: &str, generation: u64) -> DispatchResult<Effect> {
    if accepted {
        DispatchResult::changed()
    } else {
        debug!(kind, generation, "dropping stale detail result");
        DispatchResult::unchanged()
    }
}

fn rejected(state: &mut AppState, err: TeamError) -> DispatchResult<Effect> {
    state.message = Some(err.to_string());
    DispatchResult::changed()
}

fn step_cursor(cursor: usize, delta: i16, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = cursor as i64 + delta as i64;
    next.clamp(0, len as i64 - 1) as usize
}

fn open_pokemon(state: &mut AppState, target: PokemonRef) -> DispatchResult<Effect> {
    let request = state.detail.open_pokemon(target);
    state.detail_cursor = 0;
    DispatchResult::changed_with(Effect::LoadDetail(request))
}

fn open_mega(state: &mut AppState) -> DispatchResult<Effect> {
    match MEGA_EVOLUTIONS.get(state.list_cursor) {
        Some(mega) => open_pokemon(state, PokemonRef::Id(mega.id)),
        None => DispatchResult::changed(),
    }
}

fn activate_selection(state: &mut AppState) -> DispatchResult<Effect> {
    if state.detail.is_open() {
        return match state.selected_detail_row() {
            Some(DetailRow::Ability { raw_name, .. }) => {
                reducer(state, Action::DetailOpenAbility(raw_name))
            }
            Some(DetailRow::Move { raw_name, .. }) => reducer(state, Action::DetailOpenMove(raw_name)),
            Some(DetailRow::Evolution(target)) => open_pokemon(state, target),
            None => DispatchResult::unchanged(),
        };
    }

    match state.view {
        ActiveView::Team => {
            let Some(member) = state.selected_member() else {
                return DispatchResult::unchanged();
            };
            let target = match member.pokemon_id {
                Some(id) => PokemonRef::Id(id),
                None => PokemonRef::Name(member.species.clone()),
            };
            open_pokemon(state, target)
        }
        ActiveView::Pokedex if state.pokedex_mode == PokedexMode::Megas => open_mega(state),
        ActiveView::Pokedex => match state.collection_rows().into_iter().nth(state.list_cursor) {
            Some(CollectionRow::Liked(id)) | Some(CollectionRow::Hunt { pokemon_id: id, .. }) => {
                open_pokemon(state, PokemonRef::Id(id))
            }
            None => DispatchResult::unchanged(),
        },
        ActiveView::Journal => {
            match state.journal.entries().get(state.list_cursor).map(|e| e.id.clone()) {
                Some(id) => reducer(state, Action::JournalSelect(id)),
                None => DispatchResult::unchanged(),
            }
        }
        ActiveView::Zones => match state.zone_rows().get(state.list_cursor) {
            Some((_, id, _)) => {
                let id = *id;
                open_pokemon(state, PokemonRef::Id(id))
            }
            None => DispatchResult::unchanged(),
        },
        ActiveView::Navigator => DispatchResult::unchanged(),
    }
}

/// Write the staged move into the matching team member, if there is one.
/// The staged move is consumed whenever a member matches, whether the move
/// was written or already known; otherwise it is kept for add-to-team.
fn resolve_pending(state: &mut AppState) -> Option<Effect> {
    let pending = state.detail.pending.clone()?;
    let outcome = state.team.assign_move(pending.pokemon_id, &pending.move_name)?;
    state.detail.take_pending();
    let member = state
        .team
        .find_by_pokemon(pending.pokemon_id)
        .map(|member| member.display_name().to_string())
        .unwrap_or_default();
    match outcome {
        MoveInsert::Duplicate => {
            state.message = Some(format!("{member} already knows {}", pending.move_name));
            None
        }
        MoveInsert::Filled(slot) | MoveInsert::Replaced(slot) => {
            state.message = Some(format!(
                "{member} learned {} (slot {})",
                pending.move_name,
                slot + 1
            ));
            Some(Effect::SaveTeam(state.team.clone()))
        }
    }
}

fn add_current_to_team(state: &mut AppState) -> DispatchResult<Effect> {
    let Some(pokemon) = state.detail.current_pokemon() else {
        return DispatchResult::unchanged();
    };
    if !matches!(state.detail.view, DetailView::Pokemon { .. }) {
        return DispatchResult::unchanged();
    }
    let pokemon_id = pokemon.id;
    let staged = state.detail.staged_move_for(pokemon_id).map(str::to_string);
    let data = AddTeamMember {
        species: pokemon.display_name(),
        level: DEFAULT_ADD_LEVEL,
        nickname: None,
        pokemon_id: Some(pokemon_id),
        initial_move: staged.clone(),
        types: pokemon.types.clone(),
    };

    match state.team.add(data) {
        Ok(member) => {
            state.message = Some(format!("{} joined the team", member.display_name()));
            if staged.is_some() {
                state.detail.take_pending();
            }
            let mut effects = vec![Effect::SaveTeam(state.team.clone())];
            if state.collections.ensure_caught(pokemon_id) {
                effects.push(Effect::SaveCollections(state.collections.clone()));
            }
            finish(effects)
        }
        Err(err) => rejected(state, err),
    }
}

fn team_result(
    state: &mut AppState,
    update: impl FnOnce(&mut crate::team::TeamStore) -> Result<(), TeamError>,
) -> DispatchResult<Effect> {
    match update(&mut state.team) {
        Ok(()) => team_changed(state),
        Err(err) => rejected(state, err),
    }
}

/// Persist the roster, then let a staged move land on a newly matching member.
fn team_changed(state: &mut AppState) -> DispatchResult<Effect> {
    let effect = resolve_pending(state).unwrap_or_else(|| Effect::SaveTeam(state.team.clone()));
    DispatchResult::changed_with(effect)
}

fn collections_changed(state: &mut AppState) -> DispatchResult<Effect> {
    DispatchResult::changed_with(Effect::SaveCollections(state.collections.clone()))
}

fn journal_changed(state: &mut AppState) -> DispatchResult<Effect> {
    DispatchResult::changed_with(Effect::SaveJournal(state.journal.clone()))
}
