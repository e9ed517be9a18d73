//! Concierge responder: keyword intent matching over a canned response set
//!
//! Utterances are lowercased and tested against an ordered rule list. The
//! first rule whose trigger matches decides the intent; inside that rule the
//! first matching refinement decides the reply, otherwise one of the rule's
//! replies is picked at random. Nothing is remembered between calls.

mod profile;
mod rules;

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

pub use profile::HotelProfile;
pub use rules::FALLBACK_REPLIES;
use rules::{BUILTIN_RULES, Rule};

/// What the guest is asking about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Booking,
    CheckIn,
    CheckOut,
    Amenities,
    Dining,
    Parking,
    RoomService,
    Wifi,
    Pricing,
    Cancellation,
    Pool,
    Spa,
    Fitness,
    Pets,
    Thanks,
    Farewell,
    /// No rule matched
    Fallback,
    /// Operator-defined rule from configuration
    Custom(String),
}

impl Intent {
    /// Stable snake_case label, used in logs and the conversation table
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Greeting => "greeting",
            Self::Booking => "booking",
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
            Self::Amenities => "amenities",
            Self::Dining => "dining",
            Self::Parking => "parking",
            Self::RoomService => "room_service",
            Self::Wifi => "wifi",
            Self::Pricing => "pricing",
            Self::Cancellation => "cancellation",
            Self::Pool => "pool",
            Self::Spa => "spa",
            Self::Fitness => "fitness",
            Self::Pets => "pets",
            Self::Thanks => "thanks",
            Self::Farewell => "farewell",
            Self::Fallback => "fallback",
            Self::Custom(label) => label,
        }
    }

    /// Parse a label; unknown labels become [`Intent::Custom`]
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "greeting" => Self::Greeting,
            "booking" => Self::Booking,
            "check_in" => Self::CheckIn,
            "check_out" => Self::CheckOut,
            "amenities" => Self::Amenities,
            "dining" => Self::Dining,
            "parking" => Self::Parking,
            "room_service" => Self::RoomService,
            "wifi" => Self::Wifi,
            "pricing" => Self::Pricing,
            "cancellation" => Self::Cancellation,
            "pool" => Self::Pool,
            "spa" => Self::Spa,
            "fitness" => Self::Fitness,
            "pets" => Self::Pets,
            "thanks" => Self::Thanks,
            "farewell" => Self::Farewell,
            "fallback" => Self::Fallback,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Intent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Operator-defined rule, checked before the built-in set
#[derive(Debug, Clone, Deserialize)]
pub struct CustomRule {
    /// Intent label reported for matches
    pub intent: String,
    /// Regex tested against the lowercased utterance
    pub pattern: String,
    /// Reply templates, one picked at random
    pub replies: Vec<String>,
}

/// A chosen reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

/// The concierge responder
pub struct Concierge {
    profile: HotelProfile,
    custom: Vec<Rule>,
}

impl Concierge {
    /// Create a responder with the built-in rules preceded by `custom_rules`
    ///
    /// Invalid custom rules are logged and skipped
    #[must_use]
    pub fn new(profile: HotelProfile, custom_rules: &[CustomRule]) -> Self {
        let custom: Vec<Rule> = custom_rules
            .iter()
            .filter_map(|r| {
                if r.replies.is_empty() {
                    tracing::warn!(intent = %r.intent, "custom rule has no replies, skipping");
                    return None;
                }
                // Operator patterns may use capitals; utterances are lowercased
                match Regex::new(&format!("(?i){}", r.pattern)) {
                    Ok(trigger) => Some(Rule::new(
                        Intent::from_label(&r.intent),
                        trigger,
                        Vec::new(),
                        r.replies.clone(),
                    )),
                    Err(e) => {
                        tracing::warn!(
                            pattern = %r.pattern,
                            error = %e,
                            "invalid custom rule pattern, skipping"
                        );
                        None
                    }
                }
            })
            .collect();

        if !custom.is_empty() {
            tracing::info!(count = custom.len(), "loaded custom concierge rules");
        }

        Self { profile, custom }
    }

    /// The hotel facts used for replies
    #[must_use]
    pub const fn profile(&self) -> &HotelProfile {
        &self.profile
    }

    /// Number of active rules (custom + built-in)
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.custom.len() + BUILTIN_RULES.len()
    }

    fn matching_rule(&self, lowered: &str) -> Option<&Rule> {
        self.custom
            .iter()
            .chain(BUILTIN_RULES.iter())
            .find(|rule| rule.matches(lowered))
    }

    /// Classify an utterance without choosing a reply
    #[must_use]
    pub fn classify(&self, utterance: &str) -> Intent {
        let lowered = utterance.to_lowercase();
        self.matching_rule(&lowered)
            .map_or(Intent::Fallback, |rule| rule.intent.clone())
    }

    /// Choose a reply using the thread-local RNG
    #[must_use]
    pub fn respond(&self, utterance: &str) -> Reply {
        self.respond_with(utterance, &mut rand::thread_rng())
    }

    /// Choose a reply using the given RNG for pool selection
    pub fn respond_with<R: Rng + ?Sized>(&self, utterance: &str, rng: &mut R) -> Reply {
        let lowered = utterance.to_lowercase();

        let (intent, template) = match self.matching_rule(&lowered) {
            Some(rule) => (rule.intent.clone(), rule.select(&lowered, rng)),
            None => (
                Intent::Fallback,
                FALLBACK_REPLIES.choose(rng).copied().unwrap_or_default(),
            ),
        };

        tracing::debug!(intent = %intent, "concierge rule matched");

        Reply {
            intent,
            text: self.profile.expand(template),
        }
    }
}

impl Default for Concierge {
    fn default() -> Self {
        Self::new(HotelProfile::default(), &[])
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn reply(text: &str) -> Reply {
        let mut rng = StdRng::seed_from_u64(7);
        Concierge::default().respond_with(text, &mut rng)
    }

    #[test]
    fn test_greeting_picks_from_pool() {
        let concierge = Concierge::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let r = concierge.respond_with("Hello there", &mut rng);
            assert_eq!(r.intent, Intent::Greeting);
            assert!(
                [
                    "Hello! Welcome to Grand Plaza Hotel. How may I assist you today?",
                    "Good day! I'm here to help with your hotel needs. What can I do for you?",
                    "Hi there! Welcome to Grand Plaza. How can I make your stay exceptional?",
                ]
                .contains(&r.text.as_str()),
                "unexpected greeting: {}",
                r.text
            );
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(Concierge::default().classify("GOOD MORNING"), Intent::Greeting);
    }

    #[test]
    fn test_word_boundaries() {
        // "this" contains "hi" but not as a word
        assert_eq!(Concierge::default().classify("this"), Intent::Fallback);
        // "carpet" is not "car"
        assert_eq!(Concierge::default().classify("carpet"), Intent::Fallback);
    }

    #[test]
    fn test_booking_refinements() {
        let r = reply("I want to book a room, which dates are open?");
        assert_eq!(r.intent, Intent::Booking);
        assert!(r.text.starts_with("I'd be happy to help you book a room."));

        let r = reply("reserve 2 nights please");
        assert!(r.text.contains("Our rooms start at $149 per night."));

        let r = reply("I need a reservation");
        assert_eq!(
            r.text,
            "I'd love to help you with a reservation. What dates are you looking to stay with us, and how many guests?"
        );
    }

    #[test]
    fn test_booking_date_branch_wins_over_number() {
        // Both refinements match; the first listed wins
        let r = reply("book for 3 people, what date works");
        assert!(r.text.starts_with("I'd be happy to help you book a room."));
    }

    #[test]
    fn test_check_in_variants() {
        let c = Concierge::default();
        assert_eq!(c.classify("when is check-in"), Intent::CheckIn);
        assert_eq!(c.classify("when is checkin"), Intent::CheckIn);
        assert_eq!(c.classify("we are checking in tomorrow"), Intent::CheckIn);

        let r = reply("can we arrive early?");
        assert!(r.text.contains("we can arrange early check-in"));

        let r = reply("what time is arrival");
        assert_eq!(
            r.text,
            "Our check-in time is 3 PM. Early check-in may be available depending on room availability. Would you like me to check for you?"
        );
    }

    #[test]
    fn test_check_out_late() {
        let r = reply("can I check out late?");
        assert_eq!(r.intent, Intent::CheckOut);
        assert!(r.text.contains("small fee of $30"));

        let r = reply("what is checkout");
        assert!(r.text.starts_with("Check-out time is 11 AM."));
    }

    #[test]
    fn test_greeting_shadows_later_rules() {
        // First match wins: "hi" fires before "parking"
        assert_eq!(Concierge::default().classify("hi, where is parking"), Intent::Greeting);
    }

    #[test]
    fn test_in_room_dining_answered_by_dining() {
        let c = Concierge::default();
        assert_eq!(c.classify("in room dining menu"), Intent::Dining);
        assert_eq!(c.classify("I want room service"), Intent::RoomService);
    }

    #[test]
    fn test_dining_hours() {
        let r = reply("when is breakfast");
        assert!(r.text.starts_with("Breakfast is served from 6:30 AM to 10:30 AM"));

        let r = reply("tell me about the restaurant");
        assert!(r.text.starts_with("We serve a delicious breakfast"));
    }

    #[test]
    fn test_wifi_password() {
        let r = reply("what's the wi-fi password");
        assert_eq!(r.intent, Intent::Wifi);
        assert!(r.text.contains("'GrandPlaza-Guest'"));

        let r = reply("is there internet");
        assert!(r.text.starts_with("We provide complimentary high-speed WiFi"));
    }

    #[test]
    fn test_pricing_suite() {
        let r = reply("what does a deluxe suite cost");
        assert_eq!(r.intent, Intent::Pricing);
        assert!(r.text.starts_with("Our deluxe suites start at $249 per night."));

        let r = reply("how much is it");
        assert!(r.text.starts_with("Our standard rooms start at $149 per night"));
    }

    #[test]
    fn test_single_reply_intents() {
        let c = Concierge::default();
        assert_eq!(c.classify("what amenities are there"), Intent::Amenities);
        assert_eq!(c.classify("where do I park"), Intent::Parking);
        assert_eq!(c.classify("I need a refund"), Intent::Cancellation);
        assert_eq!(c.classify("is the pool heated"), Intent::Pool);
        assert_eq!(c.classify("book a massage"), Intent::Booking);
        assert_eq!(c.classify("a massage please"), Intent::Spa);
        assert_eq!(c.classify("where is the gym"), Intent::Fitness);
        assert_eq!(c.classify("can I bring my dog"), Intent::Pets);
        assert_eq!(c.classify("thanks a lot"), Intent::Thanks);
        assert_eq!(c.classify("that's all, goodbye"), Intent::Farewell);
    }

    #[test]
    fn test_farewell_uses_hotel_name() {
        let r = reply("bye");
        assert_eq!(
            r.text,
            "Thank you for contacting Grand Plaza Hotel! We look forward to welcoming you. Have a wonderful day!"
        );
    }

    #[test]
    fn test_fallback() {
        let r = reply("what's the meaning of life");
        assert_eq!(r.intent, Intent::Fallback);
        assert!(FALLBACK_REPLIES.contains(&r.text.as_str()));

        assert_eq!(reply("").intent, Intent::Fallback);
    }

    #[test]
    fn test_profile_substitution() {
        let profile = HotelProfile {
            name: "Seaside Inn".to_string(),
            check_in: "4 PM".to_string(),
            ..HotelProfile::default()
        };
        let concierge = Concierge::new(profile, &[]);
        let mut rng = StdRng::seed_from_u64(1);

        let r = concierge.respond_with("goodbye", &mut rng);
        assert!(r.text.contains("Seaside Inn"));

        let r = concierge.respond_with("arrival time?", &mut rng);
        assert!(r.text.contains("4 PM"));
    }

    #[test]
    fn test_service_hours_follow_profile() {
        let r = reply("I want room service");
        assert!(r.text.starts_with("Room service is available 24/7 for"));

        let r = reply("tell me about the restaurant");
        assert!(r.text.contains("from 6:30 to 10:30 AM."));

        let profile = HotelProfile {
            breakfast_hours: "7 AM to 11 AM".to_string(),
            room_service: "from 6 AM to midnight".to_string(),
            ..HotelProfile::default()
        };
        let concierge = Concierge::new(profile, &[]);
        let mut rng = StdRng::seed_from_u64(5);

        let r = concierge.respond_with("when does breakfast open", &mut rng);
        assert!(r.text.starts_with("Breakfast is served from 7 AM to 11 AM in"));

        let r = concierge.respond_with("breakfast?", &mut rng);
        assert!(r.text.contains("from 7 to 11 AM."));

        let r = concierge.respond_with("order food", &mut rng);
        assert!(r.text.starts_with("Room service is available from 6 AM to midnight for"));
    }

    #[test]
    fn test_custom_rules_checked_first() {
        let rules = vec![CustomRule {
            intent: "shuttle".to_string(),
            pattern: r"\b(shuttle|airport)\b".to_string(),
            replies: vec!["Our {hotel_short} shuttle leaves every hour.".to_string()],
        }];
        let concierge = Concierge::new(HotelProfile::default(), &rules);
        let mut rng = StdRng::seed_from_u64(3);

        // Would otherwise be a greeting
        let r = concierge.respond_with("Hi, is there an airport Shuttle?", &mut rng);
        assert_eq!(r.intent, Intent::Custom("shuttle".to_string()));
        assert_eq!(r.text, "Our Grand Plaza shuttle leaves every hour.");
        assert_eq!(concierge.rule_count(), 18);
    }

    #[test]
    fn test_invalid_custom_rules_skipped() {
        let rules = vec![
            CustomRule {
                intent: "broken".to_string(),
                pattern: "(unclosed".to_string(),
                replies: vec!["never".to_string()],
            },
            CustomRule {
                intent: "empty".to_string(),
                pattern: "anything".to_string(),
                replies: vec![],
            },
        ];
        let concierge = Concierge::new(HotelProfile::default(), &rules);

        assert_eq!(concierge.rule_count(), 17);
        assert_eq!(concierge.classify("anything"), Intent::Fallback);
    }

    #[test]
    fn test_intent_labels_round_trip() {
        assert_eq!(Intent::from_label("room_service"), Intent::RoomService);
        assert_eq!(Intent::CheckIn.to_string(), "check_in");
        assert_eq!(
            Intent::from_label("valet"),
            Intent::Custom("valet".to_string())
        );
        assert_eq!(
            serde_json::to_string(&Intent::Wifi).unwrap(),
            "\"wifi\""
        );
    }
}
