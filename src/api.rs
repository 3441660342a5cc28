use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::detail::PokemonRef;
use crate::error::LookupError;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
const PREFERRED_VERSION_GROUP: &str = "x-y";
const LEVEL_UP: &str = "level-up";
/// National Dex size; the species index asks for this many names.
const SPECIES_COUNT: u32 = 1025;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub sprite_url: Option<String>,
    pub shiny_sprite_url: Option<String>,
    pub genus: String,
    pub types: Vec<String>,
    pub abilities: Vec<PokemonAbility>,
    pub base_stats: Vec<BaseStat>,
    pub evolution: Vec<EvolutionStage>,
    pub flavor_text: String,
    pub moves: Vec<PokemonMove>,
}

impl PokemonDetail {
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }

    pub fn base_stat_total(&self) -> u32 {
        self.base_stats.iter().map(|stat| stat.value).sum()
    }

    /// One to five stars from the base stat total.
    pub fn strength_rating(&self) -> u8 {
        match self.base_stat_total() {
            total if total > 580 => 5,
            total if total > 500 => 4,
            total if total > 410 => 3,
            total if total > 320 => 2,
            _ => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonAbility {
    pub display_name: String,
    pub raw_name: String,
    pub is_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BaseStat {
    pub name: String,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvolutionStage {
    pub name: String,
    pub id: Option<u32>,
    pub trigger: Option<String>,
    pub min_level: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonMove {
    pub raw_name: String,
    pub name: String,
    pub level_learned_at: u32,
    pub learn_method: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonLink {
    pub name: String,
    pub id: Option<u32>,
    pub is_hidden: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AbilityDetail {
    pub id: u32,
    pub name: String,
    pub effect: String,
    pub short_effect: String,
    pub flavor_text: String,
    pub pokemon: Vec<PokemonLink>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoveDetail {
    pub id: u32,
    pub raw_name: String,
    pub name: String,
    pub accuracy: Option<u32>,
    pub power: Option<u32>,
    pub pp: Option<u32>,
    pub move_type: String,
    pub damage_class: String,
    pub effect: String,
    pub effect_chance: Option<u32>,
    pub flavor_text: String,
    pub target: String,
    pub learned_by: Vec<PokemonLink>,
}

#[async_trait]
pub trait PokemonLookup: Send + Sync {
    async fn fetch_pokemon_details(&self, target: &PokemonRef) -> Result<PokemonDetail, LookupError>;
    async fn fetch_ability_details(&self, name: &str) -> Result<AbilityDetail, LookupError>;
    async fn fetch_move_details(&self, name: &str) -> Result<MoveDetail, LookupError>;
    /// Display names of every species, in Dex order.
    async fn fetch_species_names(&self) -> Result<Vec<String>, LookupError>;
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ResourceList {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    species: NamedResource,
    sprites: serde_json::Value,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    moves: Vec<PokemonMoveSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
    #[serde(default)]
    version_group_details: Vec<VersionGroupDetail>,
}

#[derive(Clone, Debug, Deserialize)]
struct VersionGroupDetail {
    level_learned_at: u32,
    move_learn_method: NamedResource,
    version_group: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    genera: Vec<GenusEntry>,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GenusEntry {
    genus: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    #[serde(default)]
    evolves_to: Vec<ChainLink>,
    #[serde(default)]
    evolution_details: Vec<EvolutionDetailResponse>,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionDetailResponse {
    trigger: Option<NamedResource>,
    min_level: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
struct EffectEntry {
    effect: String,
    short_effect: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct AbilityResponse {
    id: u32,
    name: String,
    #[serde(default)]
    effect_entries: Vec<EffectEntry>,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    pokemon: Vec<AbilityPokemonSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct AbilityPokemonSlot {
    pokemon: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct MoveResponse {
    id: u32,
    name: String,
    accuracy: Option<u32>,
    power: Option<u32>,
    pp: Option<u32>,
    #[serde(rename = "type")]
    move_type: NamedResource,
    damage_class: NamedResource,
    effect_chance: Option<u32>,
    #[serde(default)]
    effect_entries: Vec<EffectEntry>,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    target: NamedResource,
    #[serde(default)]
    learned_by_pokemon: Vec<NamedResource>,
}

#[derive(Clone, Debug)]
pub struct PokeApiClient {
    base: String,
    cache_root: Option<PathBuf>,
}

impl PokeApiClient {
    /// `cache_root = None` disables the response cache.
    pub fn new(base: impl Into<String>, cache_root: Option<PathBuf>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            cache_root,
        }
    }

    async fn fetch_json_cached<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        subject: &str,
    ) -> Result<T, LookupError> {
        let bytes = self.fetch_bytes_cached(url, subject).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(err) => {
                if let Some(path) = self.cache_path(url) {
                    let _ = fs::remove_file(&path).await;
                }
                Err(LookupError::Decode(err.to_string()))
            }
        }
    }

    async fn fetch_bytes_cached(&self, url: &str, subject: &str) -> Result<Vec<u8>, LookupError> {
        let cache_path = self.cache_path(url);
        if let Some(path) = &cache_path {
            if let Some(bytes) = read_cache(path).await {
                debug!(url, "pokeapi cache hit");
                return Ok(bytes);
            }
        }

        debug!(url, "pokeapi request");
        let response = http_client()
            .get(url)
            .send()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "pokeapi request failed");
            return Err(status_error(status.as_u16(), subject));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?
            .to_vec();
        if let Some(path) = &cache_path {
            write_cache(path, &bytes).await;
        }
        Ok(bytes)
    }

    fn cache_path(&self, url: &str) -> Option<PathBuf> {
        let root = self.cache_root.as_ref()?;
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        Some(root.join("http").join(digest))
    }
}

#[async_trait]
impl PokemonLookup for PokeApiClient {
    async fn fetch_pokemon_details(&self, target: &PokemonRef) -> Result<PokemonDetail, LookupError> {
        let subject = target.to_string();
        let url = format!("{}/pokemon/{}", self.base, encode(&target.api_key()));
        let pokemon: PokemonResponse = self.fetch_json_cached(&url, &subject).await?;
        let species: SpeciesResponse = self.fetch_json_cached(&pokemon.species.url, &subject).await?;

        let evolution = match &species.evolution_chain {
            Some(chain) => match self
                .fetch_json_cached::<EvolutionChainResponse>(&chain.url, &subject)
                .await
            {
                Ok(response) => {
                    let mut stages = Vec::new();
                    build_chain_stages(&response.chain, &mut stages);
                    stages
                }
                Err(err) => {
                    warn!(pokemon = %subject, error = %err, "evolution chain unavailable");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(pokemon_detail(pokemon, &species, evolution))
    }

    async fn fetch_ability_details(&self, name: &str) -> Result<AbilityDetail, LookupError> {
        let url = format!("{}/ability/{}", self.base, encode(&api_slug(name)));
        let response: AbilityResponse = self.fetch_json_cached(&url, name).await?;
        Ok(ability_detail(response))
    }

    async fn fetch_move_details(&self, name: &str) -> Result<MoveDetail, LookupError> {
        let url = format!("{}/move/{}", self.base, encode(&api_slug(name)));
        let response: MoveResponse = self.fetch_json_cached(&url, name).await?;
        Ok(move_detail(response))
    }

    async fn fetch_species_names(&self) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/pokemon-species?limit={SPECIES_COUNT}", self.base);
        let list: ResourceList = self.fetch_json_cached(&url, "species index").await?;
        Ok(species_names(list))
    }
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    if let Err(err) = fs::write(path, bytes).await {
        debug!(path = %path.display(), error = %err, "failed to write pokeapi cache");
    }
}

fn status_error(status: u16, subject: &str) -> LookupError {
    if status == 404 {
        LookupError::NotFound(subject.to_string())
    } else {
        LookupError::Transport(format!("PokeAPI returned status {status}"))
    }
}

fn pokemon_detail(
    response: PokemonResponse,
    species: &SpeciesResponse,
    evolution: Vec<EvolutionStage>,
) -> PokemonDetail {
    let sprite_url = pointer_string(&response.sprites, "/other/official-artwork/front_default")
        .or_else(|| pointer_string(&response.sprites, "/front_default"));
    let shiny_sprite_url = pointer_string(&response.sprites, "/other/official-artwork/front_shiny")
        .or_else(|| pointer_string(&response.sprites, "/front_shiny"));

    let types = response
        .types
        .into_iter()
        .map(|slot| display_name(&slot.type_info.name))
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| PokemonAbility {
            display_name: display_name(&slot.ability.name),
            raw_name: slot.ability.name,
            is_hidden: slot.is_hidden,
        })
        .collect();
    let base_stats = response
        .stats
        .into_iter()
        .map(|slot| BaseStat {
            name: slot.stat.name,
            value: slot.base_stat,
        })
        .collect();
    let mut moves: Vec<PokemonMove> = response.moves.into_iter().filter_map(learnset_entry).collect();
    sort_moves(&mut moves);

    PokemonDetail {
        id: response.id,
        name: response.name,
        sprite_url,
        shiny_sprite_url,
        genus: species
            .genera
            .iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| entry.genus.clone())
            .unwrap_or_default(),
        types,
        abilities,
        base_stats,
        evolution,
        flavor_text: english_flavor_text(&species.flavor_text_entries),
        moves,
    }
}

fn learnset_entry(slot: PokemonMoveSlot) -> Option<PokemonMove> {
    let detail = slot
        .version_group_details
        .iter()
        .find(|detail| detail.version_group.name == PREFERRED_VERSION_GROUP)
        .or_else(|| slot.version_group_details.last())?;
    Some(PokemonMove {
        name: display_name(&slot.move_info.name),
        level_learned_at: detail.level_learned_at,
        learn_method: detail.move_learn_method.name.clone(),
        raw_name: slot.move_info.name,
    })
}

/// Level-up moves first by level, then everything else by name.
fn sort_moves(moves: &mut [PokemonMove]) {
    moves.sort_by(|a, b| move_order(a).cmp(&move_order(b)));
}

fn move_order(mv: &PokemonMove) -> (bool, u32, &str) {
    let level_up = mv.learn_method == LEVEL_UP;
    let level = if level_up { mv.level_learned_at } else { 0 };
    (!level_up, level, mv.name.as_str())
}

fn ability_detail(response: AbilityResponse) -> AbilityDetail {
    let (effect, short_effect) = english_effect(&response.effect_entries);
    AbilityDetail {
        id: response.id,
        name: display_name(&response.name),
        effect,
        short_effect,
        flavor_text: english_flavor_text(&response.flavor_text_entries),
        pokemon: response
            .pokemon
            .into_iter()
            .map(|slot| PokemonLink {
                id: resource_id(&slot.pokemon.url),
                name: display_name(&slot.pokemon.name),
                is_hidden: slot.is_hidden,
            })
            .collect(),
    }
}

fn move_detail(response: MoveResponse) -> MoveDetail {
    let (effect, short_effect) = english_effect(&response.effect_entries);
    let effect = if effect.is_empty() { short_effect } else { effect };
    let effect = match response.effect_chance {
        Some(chance) => effect.replace("$effect_chance", &chance.to_string()),
        None => effect,
    };
    MoveDetail {
        id: response.id,
        name: display_name(&response.name),
        raw_name: response.name,
        accuracy: response.accuracy,
        power: response.power,
        pp: response.pp,
        move_type: display_name(&response.move_type.name),
        damage_class: display_name(&response.damage_class.name),
        effect,
        effect_chance: response.effect_chance,
        flavor_text: english_flavor_text(&response.flavor_text_entries),
        target: display_name(&response.target.name),
        learned_by: response
            .learned_by_pokemon
            .into_iter()
            .map(|pokemon| PokemonLink {
                id: resource_id(&pokemon.url),
                name: display_name(&pokemon.name),
                is_hidden: false,
            })
            .collect(),
    }
}

fn species_names(list: ResourceList) -> Vec<String> {
    list.results
        .into_iter()
        .map(|resource| display_name(&resource.name))
        .collect()
}

fn build_chain_stages(chain: &ChainLink, stages: &mut Vec<EvolutionStage>) {
    if !stages.iter().any(|stage| stage.name == chain.species.name) {
        let detail = chain.evolution_details.first();
        stages.push(EvolutionStage {
            name: chain.species.name.clone(),
            id: resource_id(&chain.species.url),
            trigger: detail
                .and_then(|detail| detail.trigger.as_ref())
                .map(|trigger| display_name(&trigger.name)),
            min_level: detail.and_then(|detail| detail.min_level),
        });
    }
    for next in &chain.evolves_to {
        build_chain_stages(next, stages);
    }
}

fn english_flavor_text(entries: &[FlavorTextEntry]) -> String {
    entries
        .iter()
        .rev()
        .find(|entry| entry.language.name == "en")
        .map(|entry| sanitize_text(&entry.flavor_text))
        .unwrap_or_default()
}

fn english_effect(entries: &[EffectEntry]) -> (String, String) {
    entries
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| (sanitize_text(&entry.effect), sanitize_text(&entry.short_effect)))
        .unwrap_or_default()
}

fn sanitize_text(text: &str) -> String {
    text.replace(['\n', '\u{000C}'], " ")
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Trailing numeric id of a PokeAPI resource URL.
pub fn resource_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// `"thunder-punch"` to `"Thunder Punch"`.
pub fn display_name(raw: &str) -> String {
    raw.split(['-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Identifier as PokeAPI expects it: `"Mr. Mime"` to `"mr-mime"`.
pub fn api_slug(name: &str) -> String {
    let lowered = name
        .trim()
        .to_lowercase()
        .replace('♀', "-f")
        .replace('♂', "-m");
    lowered
        .split(|ch: char| ch.is_whitespace() || ch == '-')
        .map(|part| part.chars().filter(|ch| ch.is_alphanumeric()).collect::<String>())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: &str, url: &str) -> serde_json::Value {
        json!({ "name": name, "url": url })
    }

    fn learn(name: &str, level: u32, method: &str) -> serde_json::Value {
        json!({
            "move": named(name, "https://pokeapi.co/api/v2/move/1/"),
            "version_group_details": [{
                "level_learned_at": level,
                "move_learn_method": named(method, ""),
                "version_group": named("x-y", ""),
            }]
        })
    }

    #[test]
    fn names_round_between_display_and_slug() {
        assert_eq!(display_name("thunder-punch"), "Thunder Punch");
        assert_eq!(display_name("mr-mime"), "Mr Mime");
        assert_eq!(api_slug("Thunder Punch"), "thunder-punch");
        assert_eq!(api_slug("Mr. Mime"), "mr-mime");
        assert_eq!(api_slug("Nidoran♀"), "nidoran-f");
        assert_eq!(api_slug("  Farfetch'd "), "farfetchd");
    }

    #[test]
    fn resource_ids_come_from_url_tail() {
        assert_eq!(resource_id("https://pokeapi.co/api/v2/pokemon-species/656/"), Some(656));
        assert_eq!(resource_id("https://pokeapi.co/api/v2/pokemon-species/"), None);
    }

    #[test]
    fn not_found_status_names_the_subject() {
        assert_eq!(
            status_error(404, "missingno").to_string(),
            "Could not find details for \"missingno\"."
        );
        assert!(matches!(status_error(500, "x"), LookupError::Transport(_)));
    }

    #[test]
    fn pokemon_detail_orders_level_up_moves_first() {
        let pokemon: PokemonResponse = serde_json::from_value(json!({
            "id": 656,
            "name": "froakie",
            "species": named("froakie", "https://pokeapi.co/api/v2/pokemon-species/656/"),
            "sprites": { "front_default": "front.png", "front_shiny": null },
            "types": [{ "type": named("water", "") }],
            "stats": [
                { "base_stat": 41, "stat": named("hp", "") },
                { "base_stat": 56, "stat": named("attack", "") },
                { "base_stat": 40, "stat": named("defense", "") },
                { "base_stat": 62, "stat": named("special-attack", "") },
                { "base_stat": 44, "stat": named("special-defense", "") },
                { "base_stat": 71, "stat": named("speed", "") }
            ],
            "abilities": [
                { "ability": named("torrent", ""), "is_hidden": false },
                { "ability": named("protean", ""), "is_hidden": true }
            ],
            "moves": [
                learn("water-pulse", 0, "machine"),
                learn("bubble", 5, "level-up"),
                learn("pound", 1, "level-up"),
                learn("aerial-ace", 0, "machine")
            ]
        }))
        .unwrap();
        let species: SpeciesResponse = serde_json::from_value(json!({
            "flavor_text_entries": [
                { "flavor_text": "It secretes\nflexible bubbles.", "language": named("en", "") }
            ],
            "genera": [{ "genus": "Bubble Frog Pokémon", "language": named("en", "") }],
            "evolution_chain": null
        }))
        .unwrap();

        let detail = pokemon_detail(pokemon, &species, Vec::new());
        let order: Vec<_> = detail.moves.iter().map(|mv| mv.raw_name.as_str()).collect();
        assert_eq!(order, vec!["pound", "bubble", "aerial-ace", "water-pulse"]);
        assert_eq!(detail.types, vec!["Water"]);
        assert_eq!(detail.sprite_url.as_deref(), Some("front.png"));
        assert_eq!(detail.flavor_text, "It secretes flexible bubbles.");
        assert_eq!(detail.genus, "Bubble Frog Pokémon");
        assert!(detail.abilities[1].is_hidden);
        assert_eq!(detail.base_stat_total(), 314);
        assert_eq!(detail.strength_rating(), 1);
    }

    #[test]
    fn strength_rating_thresholds() {
        let with_total = |total: u32| PokemonDetail {
            id: 1,
            name: "x".into(),
            sprite_url: None,
            shiny_sprite_url: None,
            genus: String::new(),
            types: vec![],
            abilities: vec![],
            base_stats: vec![BaseStat {
                name: "hp".into(),
                value: total,
            }],
            evolution: vec![],
            flavor_text: String::new(),
            moves: vec![],
        };
        assert_eq!(with_total(600).strength_rating(), 5);
        assert_eq!(with_total(580).strength_rating(), 4);
        assert_eq!(with_total(501).strength_rating(), 4);
        assert_eq!(with_total(411).strength_rating(), 3);
        assert_eq!(with_total(321).strength_rating(), 2);
        assert_eq!(with_total(320).strength_rating(), 1);
    }

    #[test]
    fn evolution_chain_flattens_in_order() {
        let chain: EvolutionChainResponse = serde_json::from_value(json!({
            "chain": {
                "species": named("froakie", "https://pokeapi.co/api/v2/pokemon-species/656/"),
                "evolution_details": [],
                "evolves_to": [{
                    "species": named("frogadier", "https://pokeapi.co/api/v2/pokemon-species/657/"),
                    "evolution_details": [{ "trigger": named("level-up", ""), "min_level": 16 }],
                    "evolves_to": [{
                        "species": named("greninja", "https://pokeapi.co/api/v2/pokemon-species/658/"),
                        "evolution_details": [{ "trigger": named("level-up", ""), "min_level": 36 }],
                        "evolves_to": []
                    }]
                }]
            }
        }))
        .unwrap();
        let mut stages = Vec::new();
        build_chain_stages(&chain.chain, &mut stages);
        let names: Vec<_> = stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["froakie", "frogadier", "greninja"]);
        assert_eq!(stages[2].id, Some(658));
        assert_eq!(stages[2].min_level, Some(36));
        assert_eq!(stages[0].trigger, None);
    }

    #[test]
    fn species_index_uses_display_names() {
        let list: ResourceList = serde_json::from_value(json!({
            "count": 1025,
            "next": null,
            "results": [
                named("bulbasaur", "https://pokeapi.co/api/v2/pokemon-species/1/"),
                named("mr-mime", "https://pokeapi.co/api/v2/pokemon-species/122/"),
                named("froakie", "https://pokeapi.co/api/v2/pokemon-species/656/")
            ]
        }))
        .unwrap();
        assert_eq!(species_names(list), vec!["Bulbasaur", "Mr Mime", "Froakie"]);
    }

    #[test]
    fn move_effect_fills_in_chance() {
        let response: MoveResponse = serde_json::from_value(json!({
            "id": 7,
            "name": "fire-punch",
            "accuracy": 100,
            "power": 75,
            "pp": 15,
            "type": named("fire", ""),
            "damage_class": named("physical", ""),
            "effect_chance": 10,
            "effect_entries": [{
                "effect": "Has a $effect_chance% chance to burn the target.",
                "short_effect": "May burn.",
                "language": named("en", "")
            }],
            "flavor_text_entries": [],
            "target": named("selected-pokemon", ""),
            "learned_by_pokemon": [named("charmander", "https://pokeapi.co/api/v2/pokemon/4/")]
        }))
        .unwrap();
        let detail = move_detail(response);
        assert_eq!(detail.name, "Fire Punch");
        assert_eq!(detail.effect, "Has a 10% chance to burn the target.");
        assert_eq!(detail.learned_by[0].id, Some(4));
        assert_eq!(detail.move_type, "Fire");
    }
}
