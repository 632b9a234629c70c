//! Review focus areas
//!
//! User-selectable emphases passed verbatim into reviewer prompts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An emphasis the user wants the reviewers to concentrate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusArea {
    /// Composition, color, and overall visual impression
    Composition,
    /// Writing style and delivery in captions
    Voice,
    /// Humor and irony in the roast
    Humor,
    /// Competitive positioning within the niche
    Positioning,
}

impl FocusArea {
    /// All focus areas, in presentation order.
    pub const ALL: &'static [FocusArea] = &[
        FocusArea::Composition,
        FocusArea::Voice,
        FocusArea::Humor,
        FocusArea::Positioning,
    ];

    /// Human-readable label used in prompts and help text.
    pub fn label(&self) -> &'static str {
        match self {
            FocusArea::Composition => "composition and color",
            FocusArea::Voice => "style and delivery in the text",
            FocusArea::Humor => "humor and irony",
            FocusArea::Positioning => "competitive positioning",
        }
    }

    /// CLI token for this focus area.
    pub fn token(&self) -> &'static str {
        match self {
            FocusArea::Composition => "composition",
            FocusArea::Voice => "voice",
            FocusArea::Humor => "humor",
            FocusArea::Positioning => "positioning",
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FocusArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FocusArea::ALL
            .iter()
            .find(|area| area.token() == s)
            .copied()
            .ok_or_else(|| {
                let tokens: Vec<_> = FocusArea::ALL.iter().map(|a| a.token()).collect();
                format!("unknown focus area {s:?}, expected one of: {}", tokens.join(", "))
            })
    }
}

/// Join focus labels into the comma-separated list reviewer prompts use.
pub fn focus_list(areas: &[FocusArea]) -> String {
    areas
        .iter()
        .map(|a| a.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        for area in FocusArea::ALL {
            assert_eq!(area.token().parse::<FocusArea>().unwrap(), *area);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!("vibes".parse::<FocusArea>().is_err());
    }

    #[test]
    fn test_focus_list() {
        let list = focus_list(&[FocusArea::Composition, FocusArea::Humor]);
        assert_eq!(list, "composition and color, humor and irony");
    }
}
