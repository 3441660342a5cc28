//! Stores written by effects load back on the next start

use kalosdex::action::Action;
use kalosdex::effect::Effect;
use kalosdex::persist::{FileStore, KeyValueStore, Persisted, Stores, CAUGHT_KEY, TEAM_KEY};
use kalosdex::reducer::reducer;
use kalosdex::state::AppState;
use kalosdex::team::AddTeamMember;
use pretty_assertions::assert_eq;
use tui_dispatch::EffectStore;

/// Carry out save effects the way the binary does.
fn apply_saves(effects: Vec<Effect>, port: &dyn KeyValueStore) {
    for effect in effects {
        match effect {
            Effect::SaveTeam(team) => team.save(port),
            Effect::SaveCollections(collections) => collections.save(port),
            Effect::SaveJournal(journal) => journal.save(port),
            Effect::LoadDetail(_) | Effect::LoadSpeciesIndex | Effect::AskNavigator(_) => {}
        }
    }
}

#[test]
fn session_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let port = FileStore::new(dir.path());

    let mut store = EffectStore::new(AppState::new(Stores::load(&port)), reducer);
    let actions = vec![
        Action::TeamAdd(AddTeamMember {
            species: "Fennekin".into(),
            level: 12,
            nickname: Some("Ember".into()),
            pokemon_id: Some(653),
            initial_move: Some("Ember".into()),
            types: vec!["Fire".into()],
        }),
        Action::CollectionsCaughtToggle(653),
        Action::CollectionsLikedToggle(25),
        Action::CollectionsHuntAdd {
            pokemon_id: 280,
            pokemon_name: "Ralts".into(),
            area: "Wild Zone 3".into(),
        },
        Action::JournalAdd { now_ms: 1_700_000_000_000 },
    ];
    for action in actions {
        let result = store.dispatch(action);
        apply_saves(result.effects, &port);
    }
    let id = store.state().journal_selected.clone().unwrap();
    let result = store.dispatch(Action::JournalUpdate {
        id,
        title: "Day one".into(),
        content: "Met {{Fennekin}} near the plaza.".into(),
    });
    apply_saves(result.effects, &port);

    let reloaded = Stores::load(&FileStore::new(dir.path()));
    assert_eq!(reloaded.team, store.state().team);
    assert_eq!(reloaded.collections, store.state().collections);
    assert_eq!(reloaded.journal, store.state().journal);
    assert_eq!(reloaded.journal.entries()[0].title, "Day one");
}

#[test]
fn corrupted_team_does_not_block_other_stores() {
    let dir = tempfile::tempdir().unwrap();
    let port = FileStore::new(dir.path());
    port.set(TEAM_KEY, "{not json").unwrap();
    port.set(CAUGHT_KEY, r#"{"25":true}"#).unwrap();

    let stores = Stores::load(&port);
    assert!(stores.team.is_empty());
    assert!(stores.collections.is_caught(25));
}
