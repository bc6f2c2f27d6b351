//! Locale command - show or change the display language

use anyhow::Result;
use clinicfinder_cli::output::Status;
use clinicfinder_core::{Locale, LocaleStore};
use owo_colors::OwoColorize;

/// Print the saved locale code
pub fn get() -> Result<()> {
    let locale = LocaleStore::user_default().load();
    println!("{}", locale.code());
    Ok(())
}

/// Validate and persist a locale
pub fn set(code: &str) -> Result<()> {
    let locale: Locale = code.parse()?;
    let store = LocaleStore::user_default();
    store.save(locale)?;
    Status::success(&format!(
        "Display language set to {} ({})",
        locale.native_name(),
        store.path().display()
    ));
    Ok(())
}

/// List supported locales, marking the saved one
pub fn list() -> Result<()> {
    let current = LocaleStore::user_default().load();
    for locale in Locale::ALL {
        let marker = if locale == current {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!("{marker} {:<4} {}", locale.code(), locale.native_name());
    }
    Ok(())
}
