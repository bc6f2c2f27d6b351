//! Show command - print one clinic record

use crate::context::Context;
use anyhow::Result;
use clinicfinder_core::{Error, Locale, LocaleStore};
use clinicfinder_records::{find_clinic, ClinicRecord};
use owo_colors::OwoColorize;

/// Run show command
pub fn run(ctx: &Context, key: &str, locale: Option<&str>, json: bool) -> Result<()> {
    let locale = match locale {
        Some(code) => code.parse::<Locale>()?,
        None => LocaleStore::user_default().load(),
    };

    let store = ctx.open_store()?;
    let clinic = find_clinic(&store, ctx.collection(), key, &ctx.region())?
        .ok_or_else(|| Error::record_not_found(key))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&clinic)?);
        return Ok(());
    }

    print_clinic(&clinic, locale);
    Ok(())
}

fn print_clinic(clinic: &ClinicRecord, locale: Locale) {
    println!();
    print!("  {}", clinic.name.bold());
    if clinic.verified {
        print!("  {}", "✓ verified".green());
    }
    println!();
    println!("  {}", clinic.address.dimmed());
    println!();

    if let Some(summary) = clinic.summary_for(locale) {
        println!("  {summary}");
        println!();
    }

    row("Id", &clinic.id);
    if let Some(slug) = &clinic.slug {
        row("Slug", slug);
    }
    row("Location", &clinic.coordinates.to_string());
    list_row("Services", &clinic.services);
    list_row("Languages", &clinic.languages);
    list_row("Eligibility", &clinic.eligibility);
    if let Some(phone) = &clinic.phone {
        row("Phone", phone);
    }
    if let Some(url) = &clinic.url {
        row("Website", url);
    }

    if let Some(hours) = clinic.hours.as_ref().filter(|h| !h.is_empty()) {
        println!("  {}", "Hours".dimmed());
        for (day, times) in hours.iter() {
            println!("    {:<4} {times}", day.short_name());
        }
    }
    println!();
}

fn row(label: &str, value: &str) {
    println!("  {:<12} {value}", label.dimmed());
}

fn list_row(label: &str, values: &[String]) {
    if !values.is_empty() {
        row(label, &values.join(", "));
    }
}
