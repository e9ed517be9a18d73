//! Keyword rules and the built-in canned response set

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use super::Intent;

/// Replies used when no rule matches
pub const FALLBACK_REPLIES: &[&str] = &[
    "I'd be happy to help you with that. Could you provide a bit more detail about what you're looking for?",
    "I'm here to assist with reservations, hotel amenities, dining, and any other questions. What specifically would you like to know?",
    "Let me help you with that. Are you asking about our rooms, facilities, or would you like to make a reservation?",
    "I want to make sure I give you the best information. Could you tell me more about what you need?",
];

/// A refinement inside a rule: when `when` also matches, `reply` is used
pub struct Branch {
    when: Regex,
    reply: String,
}

/// A compiled keyword rule
pub struct Rule {
    pub(crate) intent: Intent,
    trigger: Regex,
    branches: Vec<Branch>,
    replies: Vec<String>,
}

impl Rule {
    /// Build a rule from already-compiled parts
    pub(crate) const fn new(
        intent: Intent,
        trigger: Regex,
        branches: Vec<Branch>,
        replies: Vec<String>,
    ) -> Self {
        Self {
            intent,
            trigger,
            branches,
            replies,
        }
    }

    /// Built-in rule from static pattern text
    ///
    /// Patterns in the built-in table are fixed, so compilation failure is a bug.
    fn builtin(
        intent: Intent,
        trigger: &str,
        branches: &[(&str, &str)],
        replies: &[&str],
    ) -> Self {
        let branches = branches
            .iter()
            .map(|(when, reply)| Branch {
                when: Regex::new(when).expect("valid regex"),
                reply: (*reply).to_string(),
            })
            .collect();

        Self::new(
            intent,
            Regex::new(trigger).expect("valid regex"),
            branches,
            replies.iter().map(|r| (*r).to_string()).collect(),
        )
    }

    /// Whether the rule fires for lowercased text
    pub(crate) fn matches(&self, lowered: &str) -> bool {
        self.trigger.is_match(lowered)
    }

    /// Pick the reply template: first matching branch, else a random pool entry
    pub(crate) fn select<'a, R: Rng + ?Sized>(&'a self, lowered: &str, rng: &mut R) -> &'a str {
        self.branches
            .iter()
            .find(|b| b.when.is_match(lowered))
            .map_or_else(
                || self.replies.choose(rng).map_or("", String::as_str),
                |b| b.reply.as_str(),
            )
    }
}

/// The built-in canned response set, in match order
pub static BUILTIN_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::builtin(
            Intent::Greeting,
            r"\b(hi|hello|hey|good morning|good afternoon|good evening)\b",
            &[],
            &[
                "Hello! Welcome to {hotel}. How may I assist you today?",
                "Good day! I'm here to help with your hotel needs. What can I do for you?",
                "Hi there! Welcome to {hotel_short}. How can I make your stay exceptional?",
            ],
        ),
        Rule::builtin(
            Intent::Booking,
            r"\b(book|reservation|reserve|room available|availability)\b",
            &[
                (
                    r"\b(when|what date|which date|dates)\b",
                    "I'd be happy to help you book a room. Could you tell me your check-in and check-out dates? Also, how many guests will be staying?",
                ),
                (
                    r"\b(\d+)\b",
                    "Great! I can help you with that. Our rooms start at ${standard_rate} per night. Would you like a standard room, deluxe suite, or would you like to hear about our special packages?",
                ),
            ],
            &["I'd love to help you with a reservation. What dates are you looking to stay with us, and how many guests?"],
        ),
        Rule::builtin(
            Intent::CheckIn,
            r"\b(check.?in|checking in|arrival|arrive)\b",
            &[(
                r"\b(early|earlier|before)\b",
                "Check-in is at {check_in}, but we can arrange early check-in based on availability. I'd be happy to make a note on your reservation. May I have your confirmation number?",
            )],
            &["Our check-in time is {check_in}. Early check-in may be available depending on room availability. Would you like me to check for you?"],
        ),
        Rule::builtin(
            Intent::CheckOut,
            r"\b(check.?out|checkout|leaving|departure)\b",
            &[(
                r"\b(late|later|extend|after)\b",
                "Check-out is at {check_out}. We do offer late check-out until 2 PM for a small fee of $30. Would you like me to arrange that for you?",
            )],
            &["Check-out time is {check_out}. We offer late check-out until 2 PM for $30 if you need extra time. Can I help with anything else?"],
        ),
        Rule::builtin(
            Intent::Amenities,
            r"\b(amenities|facilities|features|what do you have|what does the hotel have)\b",
            &[],
            &["We have excellent facilities including a state-of-the-art fitness center, outdoor pool, full-service spa, fine dining restaurant, and complimentary high-speed WiFi. What interests you most?"],
        ),
        Rule::builtin(
            Intent::Dining,
            r"\b(breakfast|morning meal|dining|restaurant)\b",
            &[(
                r"\b(time|when|hours|open)\b",
                "Breakfast is served from {breakfast_hours} in our Sunrise Dining Room. We offer both continental and full hot breakfast options. Is breakfast included in your reservation?",
            )],
            &["We serve a delicious breakfast with both continental and hot options from {breakfast_hours_short}. Our restaurant also offers lunch and dinner. Would you like to know more?"],
        ),
        Rule::builtin(
            Intent::Parking,
            r"\b(parking|park|car|vehicle)\b",
            &[],
            &["We offer complimentary parking for all guests. You can choose valet service at the main entrance or self-parking in our covered garage. Both are free of charge."],
        ),
        Rule::builtin(
            Intent::RoomService,
            r"\b(room service|order food|in.?room dining)\b",
            &[],
            &["Room service is available {room_service} for your convenience. You can order using the phone in your room or through our mobile app. Is there something specific you'd like to order?"],
        ),
        Rule::builtin(
            Intent::Wifi,
            r"\b(wifi|wi.?fi|internet|connection)\b",
            &[(
                r"\b(password|connect|how)\b",
                "High-speed WiFi is complimentary throughout the hotel. The network is '{wifi_network}' and no password is required. Just select it and you'll be connected automatically.",
            )],
            &["We provide complimentary high-speed WiFi throughout the entire property. You'll find the network name in your room information packet, or I can help you connect."],
        ),
        Rule::builtin(
            Intent::Pricing,
            r"\b(price|cost|rate|how much|expensive)\b",
            &[(
                r"\b(suite|deluxe|premium)\b",
                "Our deluxe suites start at ${suite_rate} per night. They feature separate living areas, premium amenities, and stunning views. Shall I check availability for your dates?",
            )],
            &["Our standard rooms start at ${standard_rate} per night, and rates vary by season and availability. When are you planning to visit? I can check the exact rate for your dates."],
        ),
        Rule::builtin(
            Intent::Cancellation,
            r"\b(cancel|cancellation|refund|change reservation)\b",
            &[],
            &["Our cancellation policy allows free cancellation up to 24 hours before check-in. After that, one night's room charge applies. Would you like me to help you modify or cancel a reservation?"],
        ),
        Rule::builtin(
            Intent::Pool,
            r"\b(pool|swimming|swim)\b",
            &[],
            &["Our heated outdoor pool is open daily from 7 AM to 10 PM. We provide towels and have a hot tub adjacent to the pool. It's on the 3rd floor terrace with beautiful city views."],
        ),
        Rule::builtin(
            Intent::Spa,
            r"\b(spa|massage|treatment)\b",
            &[],
            &["Our spa offers a full range of treatments including massages, facials, and body treatments. Would you like me to book an appointment or send you our spa menu?"],
        ),
        Rule::builtin(
            Intent::Fitness,
            r"\b(gym|fitness|workout|exercise)\b",
            &[],
            &["Our 24/7 fitness center features cardio equipment, free weights, and yoga space. It's located on the 2nd floor. Towels and water are provided. Do you need directions?"],
        ),
        Rule::builtin(
            Intent::Pets,
            r"\b(pet|dog|cat|animal)\b",
            &[],
            &["Yes, we're a pet-friendly hotel! We welcome dogs and cats under 40 pounds for a one-time fee of $75. We provide pet beds, bowls, and treats. Are you traveling with a pet?"],
        ),
        Rule::builtin(
            Intent::Thanks,
            r"\b(thank|thanks|appreciate)\b",
            &[],
            &[
                "You're very welcome! Is there anything else I can help you with today?",
                "My pleasure! Don't hesitate to reach out if you need anything else.",
                "Happy to help! Feel free to ask if you have any other questions.",
            ],
        ),
        Rule::builtin(
            Intent::Farewell,
            r"\b(bye|goodbye|that's all|nothing else)\b",
            &[],
            &["Thank you for contacting {hotel}! We look forward to welcoming you. Have a wonderful day!"],
        ),
    ]
});
