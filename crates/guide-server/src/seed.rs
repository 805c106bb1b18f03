/// Sample guides and tips loaded into an empty store.
use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use site_common::error::CommonError;

use crate::model::{is_valid_slug, Difficulty, Guide, Tip};

struct SeedGuide {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
    content: &'static str,
    difficulty: Difficulty,
    category: &'static str,
    tags: &'static [&'static str],
    /// (year, month, day)
    created: (i32, u32, u32),
}

const SEED_GUIDES: &[SeedGuide] = &[
    SeedGuide {
        slug: "getting-started",
        title: "Getting Started: Your First Colony",
        description: "Pick a landing site, keep three colonists alive and get a roof up before winter.",
        content: "# Getting Started\n\n\
Choose a temperate forest or arid shrubland for the first run. Long growing seasons \
forgive mistakes.\n\n## First day\n\n- Draft nobody; set work priorities instead.\n\
- Build a shared bedroom and a stockpile before anything decorative.\n\
- Plant rice first: it is the fastest crop to harvest.\n",
        difficulty: Difficulty::Beginner,
        category: "Basics",
        tags: &["beginner", "colony", "setup"],
        created: (2024, 1, 10),
    },
    SeedGuide {
        slug: "food-production",
        title: "Food Production That Scales",
        description: "Crops, hunting and cold storage for a colony that keeps growing.",
        content: "# Food Production\n\n\
Plan roughly 45 tiles of rice or potatoes per colonist. Corn is slow but survives \
being left in the field.\n\n## Storage\n\nA freezer is a walled room with a cooler \
exhausting outside. Keep it below -1 C so meals never spoil.\n",
        difficulty: Difficulty::Beginner,
        category: "Farming",
        tags: &["food", "farming", "storage"],
        created: (2024, 2, 3),
    },
    SeedGuide {
        slug: "power-management",
        title: "Power Management",
        description: "Balance generators, batteries and consumers so the lights stay on through eclipses.",
        content: "# Power Management\n\n\
Solar generators stop at night and during an eclipse; pair them with batteries. \
Geothermal is the most reliable source once researched.\n\n\
Wrap batteries in a roofed room: rain makes them short-circuit.\n",
        difficulty: Difficulty::Intermediate,
        category: "Infrastructure",
        tags: &["power", "electricity", "batteries"],
        created: (2024, 3, 18),
    },
    SeedGuide {
        slug: "medicine-and-surgery",
        title: "Medicine and Surgery",
        description: "Treat wounds, manage infections and install prosthetics without losing patients.",
        content: "# Medicine\n\n\
Keep a dedicated hospital room: sterile tiles lower infection chance. Herbal medicine \
works for minor wounds; save industrial medicine for infections and surgery.\n",
        difficulty: Difficulty::Intermediate,
        category: "Medical",
        tags: &["medicine", "surgery", "health"],
        created: (2024, 4, 22),
    },
    SeedGuide {
        slug: "base-defense",
        title: "Base Defense and Killboxes",
        description: "Turn raids into a predictable fight with walls, turrets and a single entrance.",
        content: "# Base Defense\n\n\
Funnel raiders through one entrance lined with sandbags. Place turrets behind cover \
and keep a repair crew out of the line of fire.\n\n\
Against mechanoids, use EMP grenades before closing to melee.\n",
        difficulty: Difficulty::Advanced,
        category: "Combat",
        tags: &["defense", "raids", "turrets"],
        created: (2024, 5, 30),
    },
    SeedGuide {
        slug: "ship-launch",
        title: "Building the Escape Ship",
        description: "Research, components and the fifteen-day defence of the reactor.",
        content: "# Escape Ship\n\n\
Starting the reactor draws every raid for fifteen days. Stockpile components, \
medicine and ammunition first, and build the ship inside your defences.\n",
        difficulty: Difficulty::Advanced,
        category: "Endgame",
        tags: &["endgame", "ship", "research"],
        created: (2024, 7, 12),
    },
];

const SEED_TIPS: &[(&str, &str, &str, Difficulty)] = &[
    (
        "Stockpile priority",
        "Set the freezer stockpile to Important so haulers fill it before anything else.",
        "Farming",
        Difficulty::Beginner,
    ),
    (
        "Fire breaks",
        "Keep a ring of bare ground around the base; wildfire cannot cross it.",
        "Basics",
        Difficulty::Beginner,
    ),
    (
        "Mood buffers",
        "A fine meal and a decent bedroom together cover most of a stressed colonist's debuffs.",
        "Colonists",
        Difficulty::Intermediate,
    ),
    (
        "Turret upkeep",
        "Mini-turrets explode when destroyed; never place them next to batteries.",
        "Combat",
        Difficulty::Advanced,
    ),
];

/// Seed guides in insertion order, ids assigned from 1.
pub fn sample_guides() -> Vec<Guide> {
    SEED_GUIDES
        .iter()
        .zip(1_i64..)
        .map(|(seed, id)| {
            let created_at = seed_time(seed.created);
            Guide {
                id,
                slug: seed.slug.to_string(),
                title: seed.title.to_string(),
                description: seed.description.to_string(),
                content: seed.content.to_string(),
                difficulty: seed.difficulty,
                category: seed.category.to_string(),
                tags: seed.tags.iter().map(|t| t.to_string()).collect(),
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}

pub fn sample_tips() -> Vec<Tip> {
    SEED_TIPS
        .iter()
        .map(|(title, content, category, difficulty)| Tip {
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            difficulty: *difficulty,
        })
        .collect()
}

/// Reject guides whose slug is not URL-safe or is used twice.
pub fn validate_guides(guides: &[Guide]) -> Result<(), CommonError> {
    let mut seen = HashSet::new();
    for guide in guides {
        if !is_valid_slug(&guide.slug) {
            return Err(CommonError::InvalidSeed(format!(
                "slug '{}' is not URL-safe",
                guide.slug
            )));
        }
        if !seen.insert(guide.slug.as_str()) {
            return Err(CommonError::InvalidSeed(format!(
                "slug '{}' is used by more than one guide",
                guide.slug
            )));
        }
    }
    Ok(())
}

fn seed_time((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
