/// Random colonist data for decorative page content.
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

pub const COLONIST_NAMES: [&str; 16] = [
    "Maya", "Lucas", "Zara", "Rex", "Nova", "Kai", "Luna", "Phoenix", "Sage", "Raven", "Echo",
    "Storm", "Vale", "Quinn", "Zoe", "Ash",
];

pub const SKILLS: [&str; 13] = [
    "Mining",
    "Growing",
    "Construction",
    "Animals",
    "Cooking",
    "Hunting",
    "Medicine",
    "Artistic",
    "Crafting",
    "Intellectual",
    "Social",
    "Melee",
    "Shooting",
];

pub const TRAITS: [&str; 16] = [
    "Hard Worker",
    "Lazy",
    "Bloodlust",
    "Pacifist",
    "Kind",
    "Abrasive",
    "Psychopath",
    "Cannibal",
    "Night Owl",
    "Early Bird",
    "Fast Learner",
    "Slow Learner",
    "Iron-Willed",
    "Neurotic",
    "Optimist",
    "Pessimist",
];

pub const INCIDENTS: [&str; 10] = [
    "Raid incoming!",
    "Solar flare detected",
    "Trader caravan arrived",
    "Wild animals manhunting",
    "Toxic fallout",
    "Volcanic winter",
    "Ancient danger awakened",
    "Mechanoid cluster landed",
    "Prisoner escape attempt",
    "Blight destroyed crops",
];

pub const BASE_NAMES: [&str; 12] = [
    "New Haven",
    "Sanctuary",
    "Haven Ridge",
    "Last Stand",
    "Hope Valley",
    "Steel Fortress",
    "Greenlands",
    "Survivor's Rest",
    "Phoenix Base",
    "Unity Station",
    "Freedom Point",
    "Safe Harbor",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mood {
    Happy,
    Content,
    Stressed,
    Breaking,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Content, Mood::Stressed, Mood::Breaking];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub name: String,
    /// 1..=10
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Colonist {
    pub id: String,
    pub name: String,
    /// 18..=77
    pub age: u32,
    /// 60..=99
    pub health: u32,
    pub mood: Mood,
    /// 3 to 5 distinct skills
    pub skills: Vec<Skill>,
    /// 1 to 3 distinct traits
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColonySnapshot {
    pub base_name: String,
    pub incident: String,
    pub colonists: Vec<Colonist>,
}

pub fn generate_colonist<R: Rng + ?Sized>(rng: &mut R) -> Colonist {
    let name = COLONIST_NAMES[rng.gen_range(0..COLONIST_NAMES.len())];
    colonist_named(rng, name)
}

/// `count` colonists with distinct names. Capped at the number of available names.
pub fn generate_colonists<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Colonist> {
    let names: Vec<&str> = COLONIST_NAMES
        .choose_multiple(rng, count.min(COLONIST_NAMES.len()))
        .copied()
        .collect();
    names
        .into_iter()
        .map(|name| colonist_named(rng, name))
        .collect()
}

pub fn random_incident<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    INCIDENTS[rng.gen_range(0..INCIDENTS.len())]
}

pub fn random_base_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    BASE_NAMES[rng.gen_range(0..BASE_NAMES.len())]
}

pub fn generate_colony<R: Rng + ?Sized>(rng: &mut R, colonists: usize) -> ColonySnapshot {
    ColonySnapshot {
        base_name: random_base_name(rng).to_string(),
        incident: random_incident(rng).to_string(),
        colonists: generate_colonists(rng, colonists),
    }
}

fn colonist_named<R: Rng + ?Sized>(rng: &mut R, name: &str) -> Colonist {
    let age = rng.gen_range(18..78);
    let health = rng.gen_range(60..100);
    let mood = Mood::ALL[rng.gen_range(0..Mood::ALL.len())];

    let skill_count = rng.gen_range(3..=5);
    let skill_names: Vec<&str> = SKILLS.choose_multiple(rng, skill_count).copied().collect();
    let skills = skill_names
        .into_iter()
        .map(|skill| Skill {
            name: skill.to_string(),
            level: rng.gen_range(1..=10),
        })
        .collect();

    let trait_count = rng.gen_range(1..=3);
    let traits = TRAITS
        .choose_multiple(rng, trait_count)
        .map(|t| t.to_string())
        .collect();

    Colonist {
        id: format!("{:016x}", rng.gen::<u64>()),
        name: name.to_string(),
        age,
        health,
        mood,
        skills,
        traits,
    }
}
