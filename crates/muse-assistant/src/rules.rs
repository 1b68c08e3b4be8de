//! The response rule table.
//!
//! A rule fires when all of its keywords appear in the input; rules are
//! scanned in order and the first match wins, so put narrower phrases
//! above broader ones.

/// One keyword-match rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Lowercase keywords that must all appear in the input.
    pub keywords: &'static [&'static str],
    /// Reply message shown to the user.
    pub message: &'static str,
    /// Track or playlist URI to start, when the rule plays something.
    pub uri: Option<&'static str>,
}

const HELP_MESSAGE: &str = "I can help you find and play music. Try asking by mood \
    (like \"happy\" or \"relaxing\"), activity (like \"studying\" or \"workout\"), \
    genre (like \"jazz\" or \"rock\"), or specific artists and songs.";

pub(crate) const RULES: &[Rule] = &[
    Rule {
        keywords: &["jazz", "studying"],
        message: "Playing some relaxing jazz perfect for studying.",
        uri: Some("spotify:playlist:37i9dQZF1DX0SM0LYsmbMT"),
    },
    Rule {
        keywords: &["90s", "bollywood"],
        message: "Here's a mix of 90s Bollywood romantic songs. Enjoy!",
        uri: Some("spotify:playlist:37i9dQZF1DX0XUfTFmNBRM"),
    },
    Rule {
        keywords: &["deep focus"],
        message: "Found a great playlist for deep focus. Playing now.",
        uri: Some("spotify:playlist:37i9dQZF1DX3PFzdbtx1Us"),
    },
    Rule {
        keywords: &["upbeat", "working out"],
        message: "Here's an energetic playlist for your workout!",
        uri: Some("spotify:playlist:37i9dQZF1DX76Wlfdnj7AP"),
    },
    Rule {
        keywords: &["help"],
        message: HELP_MESSAGE,
        uri: None,
    },
    Rule {
        keywords: &["what can you do"],
        message: HELP_MESSAGE,
        uri: None,
    },
];
