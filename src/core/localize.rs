use crate::core::locale;
use std::collections::BTreeMap;

/// Placeholder values, substituted for `{name}` in a string.
pub type Data<'a> = &'a [(&'a str, &'a str)];

pub const NO_DATA: Data<'static> = &[];

pub trait Localizer {
    fn localize_key(&self, key: &str, data: Data<'_>) -> String;

    fn localize_keys(&self, keys: &[(&str, Data<'_>)]) -> Vec<String> {
        keys.iter()
            .map(|(key, data)| self.localize_key(key, data))
            .collect()
    }
}

pub fn substitute(text: &str, data: Data<'_>) -> String {
    let mut out = text.to_string();
    for (name, value) in data {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Dictionary lookup; keys without a translation are used as text.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: BTreeMap<String, String>,
}

impl Dictionary {
    pub fn for_locale(code: &str) -> Self {
        match locale::dictionary(code) {
            Ok(entries) => Self { entries },
            Err(e) => {
                log::warn!("Locale '{code}' unavailable, using raw keys: {e}");
                Self::default()
            }
        }
    }
}

impl Localizer for Dictionary {
    fn localize_key(&self, key: &str, data: Data<'_>) -> String {
        let text = self.entries.get(key).map(String::as_str).unwrap_or(key);
        substitute(text, data)
    }
}
