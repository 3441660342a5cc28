use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Condition {
    Both,
    DayOnly,
    NightOnly,
}

impl Condition {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "both" | "" => Some(Condition::Both),
            "day only" | "day" => Some(Condition::DayOnly),
            "night only" | "night" => Some(Condition::NightOnly),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Condition::Both => "Both",
            Condition::DayOnly => "Day only",
            Condition::NightOnly => "Night only",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WildPokemon {
    pub name: &'static str,
    pub id: u32,
    pub condition: Condition,
}

impl WildPokemon {
    const fn new(name: &'static str, id: u32, condition: Condition) -> Self {
        Self {
            name,
            id,
            condition,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WildZone {
    pub id: &'static str,
    pub name: &'static str,
    pub pokemon: &'static [WildPokemon],
}

/// Where a Pokémon can be found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ZoneSighting {
    pub zone_name: String,
    pub condition: Condition,
}

pub static WILD_ZONES: &[WildZone] = &[
    WildZone {
        id: "zone-1",
        name: "Zone 1",
        pokemon: &[
            WildPokemon::new("Weedle", 13, Condition::Both),
            WildPokemon::new("Pidgey", 16, Condition::Both),
            WildPokemon::new("Pichu", 172, Condition::Both),
            WildPokemon::new("Mareep", 179, Condition::Both),
            WildPokemon::new("Bunnelby", 659, Condition::Both),
            WildPokemon::new("Fletchling", 661, Condition::Both),
            WildPokemon::new("Scatterbug", 664, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-2",
        name: "Zone 2",
        pokemon: &[
            WildPokemon::new("Kakuna", 14, Condition::Both),
            WildPokemon::new("Patrat", 504, Condition::Both),
            WildPokemon::new("Binacle", 688, Condition::Both),
            WildPokemon::new("Staryu", 120, Condition::NightOnly),
            WildPokemon::new("Magikarp", 129, Condition::Both),
            WildPokemon::new("Budew", 406, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-3",
        name: "Zone 3",
        pokemon: &[
            WildPokemon::new("Skiddo", 672, Condition::Both),
            WildPokemon::new("Pancham", 674, Condition::Both),
            WildPokemon::new("Litleo", 667, Condition::Both),
            WildPokemon::new("Espurr", 677, Condition::Both),
            WildPokemon::new("Flabébé", 669, Condition::Both),
            WildPokemon::new("Pikachu", 25, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-4",
        name: "Zone 4",
        pokemon: &[
            WildPokemon::new("Patrat", 504, Condition::Both),
            WildPokemon::new("Gastly", 92, Condition::Both),
            WildPokemon::new("Honedge", 679, Condition::NightOnly),
            WildPokemon::new("Spewpa", 665, Condition::DayOnly),
            WildPokemon::new("Ekans", 23, Condition::DayOnly),
            WildPokemon::new("Spinarak", 167, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-5",
        name: "Zone 5",
        pokemon: &[
            WildPokemon::new("Pidgey", 16, Condition::Both),
            WildPokemon::new("Pidgeotto", 17, Condition::Both),
            WildPokemon::new("Abra", 63, Condition::Both),
            WildPokemon::new("Bellsprout", 69, Condition::Both),
            WildPokemon::new("Electrike", 309, Condition::Both),
            WildPokemon::new("Venipede", 543, Condition::Both),
            WildPokemon::new("Bunnelby", 659, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-6",
        name: "Zone 6",
        pokemon: &[
            WildPokemon::new("Magikarp", 129, Condition::Both),
            WildPokemon::new("Flaaffy", 180, Condition::Both),
            WildPokemon::new("Houndour", 228, Condition::Both),
            WildPokemon::new("Meditite", 307, Condition::DayOnly),
            WildPokemon::new("Swablu", 333, Condition::Both),
            WildPokemon::new("Buneary", 427, Condition::Both),
            WildPokemon::new("Binacle", 688, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-7",
        name: "Zone 7",
        pokemon: &[
            WildPokemon::new("Kakuna", 14, Condition::Both),
            WildPokemon::new("Roselia", 315, Condition::Both),
            WildPokemon::new("Shuppet", 353, Condition::NightOnly),
            WildPokemon::new("Hippopotas", 449, Condition::DayOnly),
            WildPokemon::new("Audino", 531, Condition::Both),
            WildPokemon::new("Floette", 670, Condition::Both),
            WildPokemon::new("Vanillite", 582, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-8",
        name: "Zone 8",
        pokemon: &[
            WildPokemon::new("Machop", 66, Condition::Both),
            WildPokemon::new("Numel", 322, Condition::Both),
            WildPokemon::new("Gible", 443, Condition::Both),
            WildPokemon::new("Drilbur", 529, Condition::Both),
            WildPokemon::new("Sandile", 551, Condition::Both),
            WildPokemon::new("Krokorok", 552, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-9",
        name: "Zone 9",
        pokemon: &[
            WildPokemon::new("Carbink", 703, Condition::Both),
            WildPokemon::new("Espurr", 677, Condition::Both),
            WildPokemon::new("Fletchinder", 662, Condition::Both),
            WildPokemon::new("Kadabra", 64, Condition::Both),
            WildPokemon::new("Sableye", 302, Condition::Both),
            WildPokemon::new("Mawile", 303, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-10",
        name: "Zone 10",
        pokemon: &[
            WildPokemon::new("Arbok", 24, Condition::Both),
            WildPokemon::new("Bellsprout", 69, Condition::Both),
            WildPokemon::new("Slowpoke", 79, Condition::Both),
            WildPokemon::new("Staryu", 120, Condition::Both),
            WildPokemon::new("Carvanha", 318, Condition::Both),
            WildPokemon::new("Watchog", 505, Condition::Both),
            WildPokemon::new("Tynamo", 602, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-11",
        name: "Zone 11",
        pokemon: &[
            WildPokemon::new("Slowpoke", 79, Condition::Both),
            WildPokemon::new("Gyarados", 130, Condition::Both),
            WildPokemon::new("Stunfisk", 618, Condition::Both),
            WildPokemon::new("Furfrou", 676, Condition::Both),
            WildPokemon::new("Inkay", 686, Condition::Both),
            WildPokemon::new("Clauncher", 692, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-12",
        name: "Zone 12",
        pokemon: &[
            WildPokemon::new("Machop", 66, Condition::Both),
            WildPokemon::new("Machoke", 67, Condition::Both),
            WildPokemon::new("Snorunt", 361, Condition::Both),
            WildPokemon::new("Snover", 459, Condition::Both),
            WildPokemon::new("Gogoat", 673, Condition::Both),
            WildPokemon::new("Bergmite", 712, Condition::Both),
            WildPokemon::new("Vanillite", 582, Condition::Both),
            WildPokemon::new("Delibird", 225, Condition::Both),
        ],
    },
    WildZone {
        id: "zone-13",
        name: "Zone 13",
        pokemon: &[
            WildPokemon::new("Weepinbell", 70, Condition::DayOnly),
            WildPokemon::new("Scyther", 123, Condition::Both),
            WildPokemon::new("Pinsir", 127, Condition::Both),
            WildPokemon::new("Phantump", 708, Condition::NightOnly),
            WildPokemon::new("Vivillon", 666, Condition::Both),
            WildPokemon::new("Heracross", 214, Condition::Both),
        ],
    },
];

/// Every zone listing `pokemon_id`, in zone order.
pub fn find_in_wild_zones(pokemon_id: u32) -> Vec<ZoneSighting> {
    WILD_ZONES
        .iter()
        .flat_map(|zone| {
            zone.pokemon
                .iter()
                .filter(move |pokemon| pokemon.id == pokemon_id)
                .map(move |pokemon| ZoneSighting {
                    zone_name: zone.name.to_string(),
                    condition: pokemon.condition,
                })
        })
        .collect()
}
