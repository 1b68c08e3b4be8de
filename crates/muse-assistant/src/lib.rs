//! Keyword-matching chat responder.
//!
//! Deliberately not natural-language understanding: a fixed rule table
//! is scanned in order, a rule fires when every one of its keywords
//! appears in the lowercased input, and the first match wins. Unmatched
//! input gets an echoing fallback.

mod rules;

pub use rules::Rule;

/// What the hosting application should do with a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start playback of this track or playlist URI.
    Play { uri: String },
    /// Nothing to play; the message stands alone.
    None,
}

/// A reply to one line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub message: String,
    pub action: Action,
}

/// Produce a reply for one line of user input.
pub fn respond(input: &str) -> Reply {
    let lowered = input.to_lowercase();

    for rule in rules::RULES {
        if rule.keywords.iter().all(|keyword| lowered.contains(keyword)) {
            let action = match rule.uri {
                Some(uri) => Action::Play {
                    uri: uri.to_string(),
                },
                None => Action::None,
            };
            return Reply {
                message: rule.message.to_string(),
                action,
            };
        }
    }

    Reply {
        message: format!(
            "I'll look for \"{}\". Try asking by mood, activity, genre, or a specific artist.",
            input.trim()
        ),
        action: Action::None,
    }
}
