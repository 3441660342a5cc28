/// A Mega Evolution available in Kalos: the base species and the form's
/// own PokeAPI id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MegaEvolution {
    pub name: &'static str,
    pub form_name: &'static str,
    pub id: u32,
    pub form_id: u32,
}

const fn mega(name: &'static str, form_name: &'static str, id: u32, form_id: u32) -> MegaEvolution {
    MegaEvolution {
        name,
        form_name,
        id,
        form_id,
    }
}

pub static MEGA_EVOLUTIONS: &[MegaEvolution] = &[
    mega("Venusaur", "Mega Venusaur", 3, 10033),
    mega("Charizard", "Mega Charizard X", 6, 10034),
    mega("Charizard", "Mega Charizard Y", 6, 10035),
    mega("Blastoise", "Mega Blastoise", 9, 10036),
    mega("Beedrill", "Mega Beedrill", 15, 10090),
    mega("Pidgeot", "Mega Pidgeot", 18, 10073),
    mega("Alakazam", "Mega Alakazam", 65, 10037),
    mega("Slowbro", "Mega Slowbro", 80, 10071),
    mega("Gengar", "Mega Gengar", 94, 10038),
    mega("Kangaskhan", "Mega Kangaskhan", 115, 10039),
    mega("Pinsir", "Mega Pinsir", 127, 10040),
    mega("Gyarados", "Mega Gyarados", 130, 10041),
    mega("Aerodactyl", "Mega Aerodactyl", 142, 10042),
    mega("Mewtwo", "Mega Mewtwo X", 150, 10043),
    mega("Mewtwo", "Mega Mewtwo Y", 150, 10044),
    mega("Ampharos", "Mega Ampharos", 181, 10045),
    mega("Steelix", "Mega Steelix", 208, 10070),
    mega("Scizor", "Mega Scizor", 212, 10046),
    mega("Heracross", "Mega Heracross", 214, 10047),
    mega("Houndoom", "Mega Houndoom", 229, 10048),
    mega("Tyranitar", "Mega Tyranitar", 248, 10049),
    mega("Sceptile", "Mega Sceptile", 254, 10065),
    mega("Blaziken", "Mega Blaziken", 257, 10050),
    mega("Swampert", "Mega Swampert", 260, 10068),
    mega("Gardevoir", "Mega Gardevoir", 282, 10051),
    mega("Sableye", "Mega Sableye", 302, 10062),
    mega("Mawile", "Mega Mawile", 303, 10052),
    mega("Aggron", "Mega Aggron", 306, 10053),
    mega("Medicham", "Mega Medicham", 308, 10054),
    mega("Manectric", "Mega Manectric", 310, 10055),
    mega("Sharpedo", "Mega Sharpedo", 319, 10063),
    mega("Camerupt", "Mega Camerupt", 323, 10087),
    mega("Altaria", "Mega Altaria", 334, 10064),
    mega("Banette", "Mega Banette", 354, 10056),
    mega("Absol", "Mega Absol", 359, 10057),
    mega("Glalie", "Mega Glalie", 362, 10072),
    mega("Salamence", "Mega Salamence", 373, 10089),
    mega("Metagross", "Mega Metagross", 376, 10076),
    mega("Latias", "Mega Latias", 380, 10066),
    mega("Latios", "Mega Latios", 381, 10067),
    mega("Rayquaza", "Mega Rayquaza", 384, 10077),
    mega("Lopunny", "Mega Lopunny", 428, 10088),
    mega("Garchomp", "Mega Garchomp", 445, 10059),
    mega("Lucario", "Mega Lucario", 448, 10060),
    mega("Abomasnow", "Mega Abomasnow", 460, 10061),
    mega("Gallade", "Mega Gallade", 475, 10069),
    mega("Audino", "Mega Audino", 531, 10074),
    mega("Diancie", "Mega Diancie", 719, 10075),
];

/// Index `delta` steps from `index`, wrapping around the catalog.
pub fn step_index(index: usize, delta: i16) -> usize {
    let len = MEGA_EVOLUTIONS.len() as i64;
    (index as i64 + delta as i64).rem_euclid(len) as usize
}

/// Mega forms of the species with National Dex number `id`.
pub fn forms_for(id: u32) -> impl Iterator<Item = &'static MegaEvolution> {
    MEGA_EVOLUTIONS.iter().filter(move |mega| mega.id == id)
}
