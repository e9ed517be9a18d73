//! Hotel facts substituted into canned replies

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// `{name}` placeholder in a reply template
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"));

/// Static facts about the property the concierge speaks for
///
/// Every field has a default, so a TOML `[hotel]` table only needs to name
/// the values it changes. Fields marked informational are published through
/// `/api/hotel` but are not spoken by the built-in replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelProfile {
    /// Full name used in greetings and farewells
    pub name: String,

    /// Short name used mid-sentence
    pub short_name: String,

    /// Guest Wi-Fi network name
    pub wifi_network: String,

    /// Check-in time (e.g. "3 PM")
    pub check_in: String,

    /// Check-out time (e.g. "11 AM")
    pub check_out: String,

    /// Breakfast service window, written "<open> to <close>"
    pub breakfast_hours: String,

    /// Room service availability
    pub room_service: String,

    /// Standard room rate per night, in dollars
    pub standard_rate: u32,

    /// Deluxe suite rate per night, in dollars
    pub suite_rate: u32,

    /// Parking arrangement (informational)
    pub parking: String,

    /// Cancellation policy summary (informational)
    pub cancellation: String,

    /// On-site amenities (informational)
    pub amenities: Vec<String>,
}

impl Default for HotelProfile {
    fn default() -> Self {
        Self {
            name: "Grand Plaza Hotel".to_string(),
            short_name: "Grand Plaza".to_string(),
            wifi_network: "GrandPlaza-Guest".to_string(),
            check_in: "3 PM".to_string(),
            check_out: "11 AM".to_string(),
            breakfast_hours: "6:30 AM to 10:30 AM".to_string(),
            room_service: "24/7".to_string(),
            standard_rate: 149,
            suite_rate: 249,
            parking: "Complimentary valet and self-parking".to_string(),
            cancellation: "Free up to 24 hours before check-in".to_string(),
            amenities: vec![
                "Fitness center".to_string(),
                "Pool".to_string(),
                "Spa".to_string(),
                "Restaurant".to_string(),
                "Free WiFi".to_string(),
            ],
        }
    }
}

impl HotelProfile {
    /// Expand `{placeholder}` variables in a reply template
    ///
    /// Substitution is a single pass, so braces inside profile values are
    /// emitted as-is. Unknown placeholders are left untouched.
    #[must_use]
    pub fn expand(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                self.lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let value = match key {
            "hotel" => self.name.clone(),
            "hotel_short" => self.short_name.clone(),
            "wifi_network" => self.wifi_network.clone(),
            "check_in" => self.check_in.clone(),
            "check_out" => self.check_out.clone(),
            "breakfast_hours" => self.breakfast_hours.clone(),
            "breakfast_hours_short" => self.breakfast_hours_short(),
            "room_service" => self.room_service.clone(),
            "standard_rate" => self.standard_rate.to_string(),
            "suite_rate" => self.suite_rate.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Breakfast window with a shared AM/PM suffix spoken once
    ///
    /// "6:30 AM to 10:30 AM" becomes "6:30 to 10:30 AM".
    fn breakfast_hours_short(&self) -> String {
        let Some((open, close)) = self.breakfast_hours.split_once(" to ") else {
            return self.breakfast_hours.clone();
        };

        for suffix in [" AM", " PM"] {
            if let (Some(open), true) = (open.strip_suffix(suffix), close.ends_with(suffix)) {
                return format!("{open} to {close}");
            }
        }

        self.breakfast_hours.clone()
    }
}
