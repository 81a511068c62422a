//! crates/symptom_guide_core/src/first_aid.rs
//!
//! Static first-aid reference, available offline.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstAidTopic {
    pub title: &'static str,
    pub steps: &'static [&'static str],
}

pub const FIRST_AID_GUIDE: &[FirstAidTopic] = &[
    FirstAidTopic {
        title: "Burns",
        steps: &[
            "Run cool (not cold) water over the burn for 20 minutes.",
            "Remove jewelry or tight clothing before the area swells.",
            "Cover with a sterile non-stick bandage.",
            "Do NOT use butter, oils, or ice directly on the burn.",
        ],
    },
    FirstAidTopic {
        title: "Cuts & Bleeding",
        steps: &[
            "Apply direct pressure with a clean cloth until bleeding stops.",
            "Clean the wound with mild soap and water.",
            "Apply an antibiotic ointment.",
            "Cover with a clean bandage. Seek help if the cut is deep.",
        ],
    },
    FirstAidTopic {
        title: "Fever",
        steps: &[
            "Rest and drink plenty of fluids.",
            "Keep the room temperature comfortable.",
            "Use light clothing.",
            "Seek help if fever exceeds 103F (39.4C) or lasts over 3 days.",
        ],
    },
    FirstAidTopic {
        title: "Dehydration",
        steps: &[
            "Sip small amounts of water or oral rehydration salts.",
            "Avoid caffeinated or sugary drinks.",
            "Seek shaded or cool areas.",
            "Look for dry mouth or decreased urination as key signs.",
        ],
    },
    FirstAidTopic {
        title: "Snake Bite",
        steps: &[
            "Remain calm and move away from the snake's strike zone.",
            "Keep the bitten limb at or below heart level.",
            "Remove rings or constricting items.",
            "Seek EMERGENCY medical care immediately. Do NOT cut the wound or try to suck out venom.",
        ],
    },
];

/// Finds a topic whose title starts with `query`, ignoring case.
pub fn find_topic(query: &str) -> Option<&'static FirstAidTopic> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    FIRST_AID_GUIDE
        .iter()
        .find(|topic| topic.title.to_lowercase().starts_with(&query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_topic_by_prefix() {
        assert_eq!(find_topic("snake").map(|t| t.title), Some("Snake Bite"));
        assert_eq!(find_topic("CUTS").map(|t| t.title), Some("Cuts & Bleeding"));
    }

    #[test]
    fn unknown_or_blank_query_finds_nothing() {
        assert!(find_topic("frostbite").is_none());
        assert!(find_topic("  ").is_none());
    }
}
