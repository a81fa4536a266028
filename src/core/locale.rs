//! Localized strings bundled with the binary.
//!
//! Each locale is the merge of the shared `_all-<locale>.json` dictionary and
//! the `timetracker-<locale>.json` one, the latter winning on conflicts.
//! Unknown locale codes get English.

use crate::errors::AppResult;
use std::collections::BTreeMap;

pub const SUPPORTED_LOCALES: &[&str] = &["de", "en"];
pub const DEFAULT_LOCALE: &str = "en";

const ALL_DE: &str = include_str!("../../locale/_all-de.json");
const ALL_EN: &str = include_str!("../../locale/_all-en.json");
const TIMETRACKER_DE: &str = include_str!("../../locale/timetracker-de.json");
const TIMETRACKER_EN: &str = include_str!("../../locale/timetracker-en.json");

/// The locale actually served for `requested`.
pub fn effective_locale(requested: &str) -> &'static str {
    match requested {
        "de" => "de",
        _ => DEFAULT_LOCALE,
    }
}

pub fn dictionary(locale: &str) -> AppResult<BTreeMap<String, String>> {
    let (all, timetracker) = match effective_locale(locale) {
        "de" => (ALL_DE, TIMETRACKER_DE),
        _ => (ALL_EN, TIMETRACKER_EN),
    };
    let mut merged: BTreeMap<String, String> = serde_json::from_str(all)?;
    merged.extend(serde_json::from_str::<BTreeMap<String, String>>(timetracker)?);
    Ok(merged)
}
