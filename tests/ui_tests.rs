//! Rendering and key handling against real state

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kalosdex::action::Action;
use kalosdex::api::{MoveDetail, PokemonDetail, PokemonMove};
use kalosdex::detail::PokemonRef;
use kalosdex::megas::MEGA_EVOLUTIONS;
use kalosdex::reducer::reducer;
use kalosdex::state::{ActiveView, AppState, JournalField, PokedexMode};
use kalosdex::team::AddTeamMember;
use kalosdex::ui;
use tui_dispatch::testing::*;
use tui_dispatch::EventKind;

fn key(code: KeyCode) -> EventKind {
    EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn actions_for(event: EventKind, state: &AppState) -> Vec<Action> {
    ui::handle_event(&event, state).actions.into_iter().collect()
}

fn learned(raw_name: &str, name: &str, level: u32) -> PokemonMove {
    PokemonMove {
        raw_name: raw_name.into(),
        name: name.into(),
        level_learned_at: level,
        learn_method: "level-up".into(),
    }
}

fn froakie() -> PokemonDetail {
    PokemonDetail {
        id: 656,
        name: "froakie".into(),
        sprite_url: None,
        shiny_sprite_url: None,
        genus: "Bubble Frog Pokémon".into(),
        types: vec!["Water".into()],
        abilities: vec![],
        base_stats: vec![],
        evolution: vec![],
        flavor_text: String::new(),
        moves: vec![learned("pound", "Pound", 1), learned("bubble", "Bubble", 5)],
    }
}

fn move_detail(raw_name: &str, name: &str) -> MoveDetail {
    MoveDetail {
        id: 1,
        raw_name: raw_name.into(),
        name: name.into(),
        accuracy: Some(100),
        power: Some(40),
        pp: Some(35),
        move_type: "Normal".into(),
        damage_class: "Physical".into(),
        effect: String::new(),
        effect_chance: None,
        flavor_text: String::new(),
        target: "Selected Pokemon".into(),
        learned_by: vec![],
    }
}

#[test]
fn empty_team_renders_a_hint() {
    let mut render = RenderHarness::new(100, 30);
    let state = AppState::default();
    let output = render.render_to_string_plain(|frame| ui::draw(frame, frame.area(), &state));
    assert!(output.contains("Kalosdex"));
    assert!(output.contains("No Pokémon yet"));
}

#[test]
fn team_members_render_with_moves() {
    let mut state = AppState::default();
    reducer(
        &mut state,
        Action::TeamAdd(AddTeamMember {
            species: "Froakie".into(),
            level: 16,
            nickname: Some("Ribbit".into()),
            pokemon_id: Some(656),
            initial_move: Some("Bubble".into()),
            types: vec!["Water".into()],
        }),
    );
    let mut render = RenderHarness::new(120, 30);
    let output = render.render_to_string_plain(|frame| ui::draw(frame, frame.area(), &state));
    assert!(output.contains("Ribbit"));
    assert!(output.contains("Lv.16"));
    assert!(output.contains("Bubble"));
}

#[test]
fn wild_zones_list_renders() {
    let state = AppState {
        view: ActiveView::Zones,
        ..AppState::default()
    };
    let mut render = RenderHarness::new(100, 30);
    let output = render.render_to_string_plain(|frame| ui::draw(frame, frame.area(), &state));
    assert!(output.contains("Wild Zones"));
}

#[test]
fn team_keys_target_the_selected_member() {
    let mut state = AppState::default();
    reducer(
        &mut state,
        Action::TeamAdd(AddTeamMember {
            species: "Pikachu".into(),
            level: 10,
            pokemon_id: Some(25),
            types: vec!["Electric".into()],
            ..Default::default()
        }),
    );
    let id = state.team.members()[0].id.clone();

    assert_eq!(
        actions_for(key(KeyCode::Char('+')), &state),
        vec![Action::TeamLevelSet {
            id: id.clone(),
            level: 11
        }]
    );
    assert_eq!(
        actions_for(key(KeyCode::Char('x')), &state),
        vec![Action::TeamRemove(id)]
    );
    assert_eq!(
        actions_for(key(KeyCode::Enter), &state),
        vec![Action::CursorActivate]
    );
}

#[test]
fn journal_typing_edits_the_active_field() {
    let mut state = AppState::default();
    reducer(&mut state, Action::JournalAdd { now_ms: 5 });
    reducer(&mut state, Action::EditStart);
    let id = state.journal_selected.clone().unwrap();
    let title = state.selected_journal_entry().unwrap().title.clone();

    assert_eq!(
        actions_for(key(KeyCode::Char('!')), &state),
        vec![Action::JournalUpdate {
            id: id.clone(),
            title: title.clone(),
            content: "!".into(),
        }]
    );
    assert_eq!(
        actions_for(key(KeyCode::Tab), &state),
        vec![Action::JournalFieldSet(JournalField::Title)]
    );
}

#[test]
fn resize_is_forwarded() {
    let state = AppState::default();
    assert_eq!(
        actions_for(EventKind::Resize(120, 40), &state),
        vec![Action::UiTerminalResize(120, 40)]
    );
}

#[test]
fn stage_key_waits_for_the_move_on_screen() {
    let mut state = AppState::default();
    reducer(&mut state, Action::DetailOpenPokemon(PokemonRef::Id(656)));
    let generation = state.detail.generation;
    reducer(
        &mut state,
        Action::DetailPokemonDidLoad {
            generation,
            detail: froakie(),
        },
    );
    reducer(&mut state, Action::DetailOpenMove("bubble".into()));
    let generation = state.detail.generation;
    reducer(
        &mut state,
        Action::DetailMoveDidLoad {
            generation,
            detail: move_detail("bubble", "Bubble"),
        },
    );
    reducer(&mut state, Action::DetailBack);
    reducer(&mut state, Action::DetailOpenMove("pound".into()));

    // Bubble is still cached while Pound loads.
    assert!(state.detail.loading);
    assert_eq!(actions_for(key(KeyCode::Char('s')), &state), vec![]);

    let generation = state.detail.generation;
    reducer(
        &mut state,
        Action::DetailMoveDidLoad {
            generation,
            detail: move_detail("pound", "Pound"),
        },
    );
    assert_eq!(
        actions_for(key(KeyCode::Char('s')), &state),
        vec![Action::DetailStageMove {
            pokemon_id: 656,
            move_name: "Pound".into(),
        }]
    );
}

#[test]
fn mega_keys_only_step_while_browsing_megas() {
    let mut state = AppState {
        view: ActiveView::Pokedex,
        ..AppState::default()
    };
    assert_eq!(
        actions_for(key(KeyCode::Char('m')), &state),
        vec![Action::PokedexMegaToggle]
    );
    assert_eq!(actions_for(key(KeyCode::Char(']')), &state), vec![]);

    reducer(&mut state, Action::PokedexMegaToggle);
    assert_eq!(state.pokedex_mode, PokedexMode::Megas);
    assert_eq!(
        actions_for(key(KeyCode::Char(']')), &state),
        vec![Action::PokedexMegaStep(1)]
    );
    assert_eq!(
        actions_for(key(KeyCode::Char('[')), &state),
        vec![Action::PokedexMegaStep(-1)]
    );
    // Hunt removal belongs to the collections list.
    state.detail.close();
    assert_eq!(actions_for(key(KeyCode::Char('x')), &state), vec![]);
}

#[test]
fn mega_catalog_renders_the_highlighted_form() {
    let mut state = AppState {
        view: ActiveView::Pokedex,
        pokedex_mode: PokedexMode::Megas,
        list_cursor: 1,
        ..AppState::default()
    };
    state.collections.toggle_caught(6);
    let mut render = RenderHarness::new(100, 40);
    let output = render.render_to_string_plain(|frame| ui::draw(frame, frame.area(), &state));
    assert!(output.contains(&format!("Mega Evolutions 2/{}", MEGA_EVOLUTIONS.len())));
    assert!(output.contains("Mega Charizard X"));
}

#[test]
fn suggestions_show_while_typing_and_tab_completes() {
    let mut state = AppState {
        view: ActiveView::Pokedex,
        ..AppState::default()
    };
    reducer(
        &mut state,
        Action::SpeciesIndexDidLoad(vec!["Fennekin".into(), "Froakie".into(), "Frogadier".into()]),
    );
    reducer(&mut state, Action::EditStart);
    reducer(&mut state, Action::PokedexQueryChanged("fro".into()));

    let mut render = RenderHarness::new(100, 30);
    let output = render.render_to_string_plain(|frame| ui::draw(frame, frame.area(), &state));
    assert!(output.contains("Tab to complete"));
    assert!(output.contains("Frogadier"));
    assert!(!output.contains("Fennekin"));

    assert_eq!(
        actions_for(key(KeyCode::Tab), &state),
        vec![Action::PokedexSuggestionAccept]
    );
    reducer(&mut state, Action::PokedexSuggestionAccept);
    assert_eq!(state.pokedex_query, "Froakie");
}
