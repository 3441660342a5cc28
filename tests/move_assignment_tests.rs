//! Staging a move from the detail panel and landing it on the team

use kalosdex::action::Action;
use kalosdex::api::{PokemonDetail, PokemonMove};
use kalosdex::detail::PokemonRef;
use kalosdex::effect::Effect;
use kalosdex::reducer::reducer;
use kalosdex::state::AppState;
use kalosdex::team::AddTeamMember;
use pretty_assertions::assert_eq;
use tui_dispatch::EffectStore;

const HAWLUCHA: u32 = 701;

fn hawlucha_member(initial_move: Option<&str>) -> AddTeamMember {
    AddTeamMember {
        species: "Hawlucha".into(),
        level: 30,
        pokemon_id: Some(HAWLUCHA),
        initial_move: initial_move.map(str::to_string),
        types: vec!["Fighting".into(), "Flying".into()],
        ..Default::default()
    }
}

fn moves_of(state: &AppState, pokemon_id: u32) -> Vec<Option<String>> {
    state
        .team
        .find_by_pokemon(pokemon_id)
        .map(|member| member.moves.slots().map(|slot| slot.map(str::to_string)).collect())
        .unwrap_or_default()
}

/// Hawlucha on the team knowing four moves.
fn full_moveset_state() -> AppState {
    let mut state = AppState::default();
    reducer(&mut state, Action::TeamAdd(hawlucha_member(Some("Karate Chop"))));
    let id = state.team.members()[0].id.clone();
    for name in ["Wing Attack", "Detect", "Aerial Ace"] {
        reducer(
            &mut state,
            Action::TeamMoveUpdate {
                id: id.clone(),
                move_name: name.into(),
            },
        );
    }
    state
}

#[test]
fn staged_move_replaces_first_slot_of_a_full_moveset() {
    let mut store = EffectStore::new(full_moveset_state(), reducer);

    let result = store.dispatch(Action::DetailStageMove {
        pokemon_id: HAWLUCHA,
        move_name: "Flying Press".into(),
    });

    assert!(matches!(&result.effects[..], [Effect::SaveTeam(_)]));
    assert_eq!(
        moves_of(store.state(), HAWLUCHA),
        vec![
            Some("Flying Press".to_string()),
            Some("Wing Attack".to_string()),
            Some("Detect".to_string()),
            Some("Aerial Ace".to_string()),
        ]
    );
    assert_eq!(store.state().detail.pending, None);
}

#[test]
fn known_move_is_consumed_without_writing() {
    let mut store = EffectStore::new(full_moveset_state(), reducer);
    let before = moves_of(store.state(), HAWLUCHA);

    let result = store.dispatch(Action::DetailStageMove {
        pokemon_id: HAWLUCHA,
        move_name: "Detect".into(),
    });

    assert!(result.effects.is_empty());
    assert_eq!(moves_of(store.state(), HAWLUCHA), before);
    assert_eq!(store.state().detail.pending, None);
}

#[test]
fn staged_move_fills_first_empty_slot() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::TeamAdd(hawlucha_member(Some("Karate Chop"))));

    store.dispatch(Action::DetailStageMove {
        pokemon_id: HAWLUCHA,
        move_name: "Detect".into(),
    });

    assert_eq!(
        moves_of(store.state(), HAWLUCHA),
        vec![
            Some("Karate Chop".to_string()),
            Some("Detect".to_string()),
            None,
            None,
        ]
    );
}

#[test]
fn staged_move_waits_for_the_pokemon_to_join() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::DetailStageMove {
        pokemon_id: HAWLUCHA,
        move_name: "Flying Press".into(),
    });
    assert!(store.state().detail.pending.is_some());

    let result = store.dispatch(Action::TeamAdd(hawlucha_member(None)));
    assert!(matches!(&result.effects[..], [Effect::SaveTeam(_)]));
    assert_eq!(
        moves_of(store.state(), HAWLUCHA)[0].as_deref(),
        Some("Flying Press")
    );
    assert_eq!(store.state().detail.pending, None);
}

#[test]
fn add_to_team_from_detail_starts_with_the_staged_move() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let result = store.dispatch(Action::DetailOpenPokemon(PokemonRef::Id(HAWLUCHA)));
    let [Effect::LoadDetail(request)] = &result.effects[..] else {
        panic!("expected a detail load");
    };
    let generation = request.generation;
    store.dispatch(Action::DetailPokemonDidLoad {
        generation,
        detail: PokemonDetail {
            id: HAWLUCHA,
            name: "hawlucha".into(),
            sprite_url: None,
            shiny_sprite_url: None,
            genus: "Wrestling Pokémon".into(),
            types: vec!["Fighting".into(), "Flying".into()],
            abilities: vec![],
            base_stats: vec![],
            evolution: vec![],
            flavor_text: String::new(),
            moves: vec![PokemonMove {
                raw_name: "flying-press".into(),
                name: "Flying Press".into(),
                level_learned_at: 28,
                learn_method: "level-up".into(),
            }],
        },
    });
    store.dispatch(Action::DetailStageMove {
        pokemon_id: HAWLUCHA,
        move_name: "Flying Press".into(),
    });

    let result = store.dispatch(Action::DetailAddToTeam);
    assert!(result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::SaveCollections(_))));
    let member = &store.state().team.members()[0];
    assert_eq!(member.species, "Hawlucha");
    assert_eq!(member.moves.get(0), Some("Flying Press"));
    assert_eq!(store.state().detail.pending, None);
    assert!(store.state().collections.is_caught(HAWLUCHA));
}

#[test]
fn seventh_member_is_rejected() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    for n in 0..6 {
        store.dispatch(Action::TeamAdd(AddTeamMember {
            species: format!("Pokémon {n}"),
            level: 10,
            types: vec!["Normal".into()],
            ..Default::default()
        }));
    }
    let before = store.state().team.clone();

    let result = store.dispatch(Action::TeamAdd(hawlucha_member(None)));

    assert!(result.effects.is_empty());
    assert_eq!(store.state().team, before);
    assert_eq!(store.state().message.as_deref(), Some("Team is full (6)."));
}
