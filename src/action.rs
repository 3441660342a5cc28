use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::{AbilityDetail, MoveDetail, PokemonDetail};
use crate::detail::PokemonRef;
use crate::state::{ActiveView, JournalField};
use crate::team::AddTeamMember;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,
    UiTerminalResize(u16, u16),

    ViewSet(ActiveView),
    EditStart,
    Escape,
    CursorMove(i16),
    CursorActivate,

    DetailOpenPokemon(PokemonRef),
    DetailOpenAbility(String),
    DetailOpenMove(String),
    DetailBack,
    DetailClose,
    DetailPokemonDidLoad { generation: u64, detail: PokemonDetail },
    DetailPokemonDidError { generation: u64, error: String },
    DetailAbilityDidLoad { generation: u64, detail: AbilityDetail },
    DetailAbilityDidError { generation: u64, error: String },
    DetailMoveDidLoad { generation: u64, detail: MoveDetail },
    DetailMoveDidError { generation: u64, error: String },
    DetailStageMove { pokemon_id: u32, move_name: String },
    DetailAddToTeam,

    TeamAdd(AddTeamMember),
    TeamRemove(String),
    TeamNicknameSet { id: String, nickname: String },
    TeamLevelSet { id: String, level: u32 },
    TeamItemSet { id: String, item: String },
    TeamMoveUpdate { id: String, move_name: String },
    TeamMoveSlotSet { id: String, slot: usize, move_name: String },
    TeamShinyToggle(String),

    CollectionsCaughtToggle(u32),
    CollectionsLikedToggle(u32),
    CollectionsHuntAdd { pokemon_id: u32, pokemon_name: String, area: String },
    CollectionsHuntRemove { pokemon_id: u32, area: String },

    JournalAdd { now_ms: i64 },
    JournalSelect(String),
    JournalUpdate { id: String, title: String, content: String },
    JournalDelete(String),
    JournalFieldSet(JournalField),

    NavigatorInputChanged(String),
    NavigatorSubmit,
    NavigatorDidAnswer { generation: u64, text: String },
    NavigatorDidError { generation: u64, error: String },
    NavigatorReset,

    PokedexQueryChanged(String),
    PokedexQuerySubmit,
    PokedexSuggestionAccept,
    PokedexMegaToggle,
    PokedexMegaStep(i16),
    SpeciesIndexDidLoad(Vec<String>),
    SpeciesIndexDidError(String),

    Quit,
}
