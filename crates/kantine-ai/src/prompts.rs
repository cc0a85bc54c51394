//! Prompt variants for menu extraction, cheapest first.
//!
//! The short prompt handles most weeks. The longer one spells out the
//! format and is only sent when the short one produced something unusable.

use kantine_core::Weekday;

use crate::completion::Turn;

fn day_keys() -> String {
    Weekday::ALL.map(|day| day.as_str()).join(", ")
}

/// The default escalation ladder.
pub fn default_prompts() -> Vec<Vec<Turn>> {
    let keys = day_keys();
    vec![
        vec![Turn::system(format!(
            "Send me a Norwegian cantina menu and I will reply with only a JSON object \
             holding an array of dishes for each day, using the keys [{keys}]. \
             Dish names stay in Norwegian; never translate them."
        ))],
        vec![
            Turn::system(
                "You turn unstructured text into JSON. You are given a short description, \
                 the expected format and the unstructured text. Reply with the JSON document only.",
            ),
            Turn::user(format!(
                "This is the menu of a cantina, but the text is somewhat malformed. Reply with \
                 only a JSON object where each key is a day and each value is an array of the \
                 dishes served that day. Use exactly the keys [{keys}] and an empty array for a \
                 day without dishes. Do not translate the dishes."
            )),
        ],
    ]
}
