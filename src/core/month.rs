//! Calendar month names used in period labels and rate tables

use anyhow::{Result, anyhow};

/// Month abbreviations as they appear in index tables, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

const ENGLISH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Returns the abbreviation for a 0-based month index.
pub fn abbreviation(month_index: u32) -> Option<&'static str> {
    MONTH_ABBREVIATIONS.get(month_index as usize).copied()
}

const PORTUGUESE_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

const ENGLISH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parses a month name into its 0-based index.
///
/// Accepts, in any case, the table abbreviations, their English counterparts
/// and the full Portuguese or English names ("marco" is taken for "março").
/// Anything else is an error, including words that merely start like a month.
pub fn parse_month_name(name: &str) -> Result<u32> {
    let lowered = name.trim().to_lowercase();
    let wanted = if lowered == "marco" { "março" } else { lowered.as_str() };

    [
        &MONTH_ABBREVIATIONS,
        &ENGLISH_ABBREVIATIONS,
        &PORTUGUESE_NAMES,
        &ENGLISH_NAMES,
    ]
    .iter()
    .find_map(|names| names.iter().position(|m| m.to_lowercase() == wanted))
    .map(|i| i as u32)
    .ok_or_else(|| anyhow!("Invalid month name: {}", name))
}

/// Converts a 1-based month number into a 0-based index.
pub fn from_number(number: u32) -> Result<u32> {
    if (1..=12).contains(&number) {
        Ok(number - 1)
    } else {
        Err(anyhow!("Month number out of range (1-12): {}", number))
    }
}
