use proptest::prelude::*;

use natal_batch::Profile;

/// Calendar dates chrono accepts (day capped at 28 to stay valid every month)
pub fn date_strategy() -> impl Strategy<Value = String> {
    (1900i32..=2100, 1u32..=12, 1u32..=28)
        .prop_map(|(year, month, day)| format!("{year:04}-{month:02}-{day:02}"))
}

pub fn time_strategy() -> impl Strategy<Value = String> {
    (0u32..24, 0u32..60).prop_map(|(hour, minute)| format!("{hour:02}:{minute:02}"))
}

/// Free text including quotes, accents, and escapes
pub fn free_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 ,.'\"\\\\/éèçœ-]{0,24}",
    ]
}

pub fn profile_strategy() -> impl Strategy<Value = Profile> {
    (
        free_text_strategy(),
        date_strategy(),
        time_strategy(),
        -90.0f64..=90.0,
        -180.0f64..=180.0,
        free_text_strategy(),
        free_text_strategy(),
    )
        .prop_map(|(name, date, time, lat, lon, country, state)| Profile {
            name,
            date,
            time,
            lat,
            lon,
            country,
            state,
        })
}

pub fn profile_batch_strategy() -> impl Strategy<Value = Vec<Profile>> {
    prop::collection::vec(profile_strategy(), 0..20)
}
