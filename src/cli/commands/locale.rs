use crate::cli::parser::Commands;
use crate::core::locale::{dictionary, effective_locale};
use crate::errors::AppResult;

pub fn handle(cmd: &Commands) -> AppResult<()> {
    if let Commands::Locale { code } = cmd {
        if effective_locale(code) != code.as_str() {
            log::warn!("Locale '{code}' is not supported, showing '{}'", effective_locale(code));
        }
        println!("{}", serde_json::to_string_pretty(&dictionary(code)?)?);
    }
    Ok(())
}
