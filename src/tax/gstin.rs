//! GSTIN format checks and place-of-supply state codes

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{GstError, GstResult};

static GSTIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$")
        .expect("GSTIN pattern is a valid regex")
});

/// State and union territory codes used as the first two GSTIN digits
pub const STATES: [(&str, &str); 37] = [
    ("01", "Jammu and Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman and Diu"),
    ("26", "Dadra and Nagar Haveli"),
    ("27", "Maharashtra"),
    ("28", "Andhra Pradesh"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman and Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
];

/// Check a GSTIN against the 15-character format. The check digit is not verified.
pub fn is_valid_gstin(gstin: &str) -> bool {
    GSTIN_PATTERN.is_match(gstin)
}

/// Like [`is_valid_gstin`] but reports which GSTIN failed
pub fn validate_gstin(gstin: &str) -> GstResult<()> {
    if gstin.trim().is_empty() {
        return Err(GstError::Validation("GSTIN is required".to_string()));
    }
    if !is_valid_gstin(gstin) {
        return Err(GstError::Validation(format!("Invalid GSTIN format: {}", gstin)));
    }
    Ok(())
}

/// State code of a valid GSTIN
pub fn state_code(gstin: &str) -> Option<&str> {
    if is_valid_gstin(gstin) {
        gstin.get(..2)
    } else {
        None
    }
}

pub fn state_name(code: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(state_code, _)| *state_code == code)
        .map(|(_, name)| *name)
}

/// Place-of-supply label such as `27-Maharashtra`
pub fn place_of_supply_label(code: &str) -> Option<String> {
    state_name(code).map(|name| format!("{}-{}", code, name))
}

/// Resolve a place of supply given as `27-Maharashtra`, `27` or `Maharashtra`
pub fn place_of_supply_code(place_of_supply: &str) -> Option<&'static str> {
    let text = place_of_supply.trim();
    let prefix = text.get(..2).filter(|p| p.chars().all(|c| c.is_ascii_digit()));

    match prefix {
        Some(code) => STATES
            .iter()
            .find(|(state_code, _)| *state_code == code)
            .map(|(state_code, _)| *state_code),
        // Andhra Pradesh appears twice; the later code is the current one
        None => STATES
            .iter()
            .rev()
            .find(|(_, name)| name.eq_ignore_ascii_case(text))
            .map(|(state_code, _)| *state_code),
    }
}

/// Whether a supply from `home_state_code` to `place_of_supply` is inter-state.
///
/// An empty place of supply is intra-state. Anything that is not the home
/// state, including unrecognised text such as export destinations, is inter-state.
pub fn is_inter_state(home_state_code: &str, place_of_supply: &str) -> bool {
    if place_of_supply.trim().is_empty() {
        return false;
    }
    match place_of_supply_code(place_of_supply) {
        Some(code) => code != home_state_code,
        None => true,
    }
}
