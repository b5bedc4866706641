//! Stateless text rendering of the session for the terminal

use crate::{
    session::SearchSession,
    types::{Business, Coordinates},
};
use colored::*;
use std::fmt::Write;

/// How the result list is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Simple,
}

/// Location chip: coordinates or a pending notice
pub fn location_chip(location: Option<Coordinates>) -> String {
    match location {
        Some(coords) => format!("📍 {}", coords.to_string().cyan()),
        None => format!("📍 {}", "Getting location...".dimmed()),
    }
}

/// Error banner
pub fn error_banner(message: &str) -> String {
    format!("{} {}", "Error:".bold().red(), message.red())
}

/// Loading indicator shown while a search is in flight
pub fn loading_line(query: &str) -> String {
    format!("{} {}", "⏳ Searching for".dimmed(), query.italic())
}

/// Panel shown before the first search
pub fn welcome_panel() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Ready to Discover?".bold().blue());
    let _ = writeln!(out, "Your search results will appear here.");
    let _ = write!(
        out,
        "{}",
        "Enter a type of business (e.g. \"coffee shops\", \"plumbers\", \"bookstores\") to find local establishments without a website."
            .dimmed()
    );
    out
}

/// One result card
pub fn business_card(index: usize, business: &Business) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}. {}",
        index.to_string().bold(),
        business.name.bold().blue()
    );
    let _ = writeln!(out, "   {}", business.address);
    let _ = write!(out, "   {}", "🌐 No Website Listed".red().bold());
    if let Some(phone) = &business.phone {
        let _ = write!(out, "\n   📞 {phone}");
    }
    if let Some(maps_url) = &business.maps_url {
        let _ = write!(out, "\n   🔗 {}", maps_url.underline());
    }
    out
}

/// Result list for a finished search in the requested format
pub fn results(query: &str, businesses: &[Business], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(businesses).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Simple => businesses
            .iter()
            .map(|b| {
                let phone = b.phone.as_deref().unwrap_or("-");
                format!("{}\t{}\t{}", b.name, b.address, phone)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Table => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", format!("Results for \"{query}\"").bold());
            let _ = writeln!(out, "{}", "─".repeat(60).dimmed());
            if businesses.is_empty() {
                let _ = write!(
                    out,
                    "{}",
                    "No businesses without websites found for your search.".dimmed()
                );
            } else {
                let cards: Vec<String> = businesses
                    .iter()
                    .enumerate()
                    .map(|(i, b)| business_card(i + 1, b))
                    .collect();
                let _ = write!(out, "{}", cards.join("\n\n"));
            }
            out
        }
    }
}

/// Whole-screen view of the session: error banner, then results or welcome
pub fn session_view(session: &SearchSession, format: OutputFormat) -> String {
    let mut sections = Vec::new();

    if let Some(error) = session.error() {
        sections.push(error_banner(error));
    }

    if session.is_loading() {
        sections.push(loading_line(session.query()));
    } else if session.has_searched() {
        // A failed search leaves no results worth listing.
        if session.error().is_none() || !session.results().is_empty() {
            sections.push(results(session.query(), session.results(), format));
        }
    } else {
        sections.push(welcome_panel());
    }

    sections.join("\n\n")
}
