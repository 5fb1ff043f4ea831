//! # Message Parser
//!
//! Heuristic entity extraction from a free-text order message.
//!
//! ## The Heuristic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "2x audi a4 abs sensor"                                               │
//! │    │   │    │  └────────── part name (remaining words)                 │
//! │    │   │    └───────────── model (second word)                         │
//! │    │   └────────────────── make (first word)                           │
//! │    └────────────────────── quantity (optional leading <n>x token)      │
//! │                                                                         │
//! │  Fewer than two words after the quantity token → the whole text is     │
//! │  treated as a bare part-name query with no fitment filter.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a stand-in for a real NLU call; it exists so the rest of the
//! pipeline (search, filter, quote, draft order) has a stable input shape.

/// What was understood from a message. All fields are best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOrder {
    /// Vehicle make filter, lowercased matching downstream.
    pub make: Option<String>,
    /// Vehicle model filter.
    pub model: Option<String>,
    /// What to search the catalog for. Empty means nothing usable.
    pub part_name: String,
    /// Requested quantity; defaults to 1 when no `<n>x` token was given.
    pub quantity: i64,
}

impl ParsedOrder {
    /// True when the message contained nothing searchable.
    pub fn is_empty(&self) -> bool {
        self.part_name.is_empty()
    }
}

/// Parses a free-text message into order entities.
pub fn parse_message(message: &str) -> ParsedOrder {
    let mut words: Vec<&str> = message.split_whitespace().collect();

    // Optional leading quantity token: "2x", "10x".
    let mut quantity = 1;
    if let Some(first) = words.first() {
        if let Some(qty) = parse_quantity_token(first) {
            quantity = qty;
            words.remove(0);
        }
    }

    if words.len() < 2 {
        return ParsedOrder {
            make: None,
            model: None,
            part_name: words.join(" "),
            quantity,
        };
    }

    ParsedOrder {
        make: Some(words[0].to_string()),
        model: Some(words[1].to_string()),
        part_name: words[2..].join(" "),
        quantity,
    }
}

/// Parses tokens of the form `<n>x` (e.g. "2x"). Zero is not a quantity.
fn parse_quantity_token(token: &str) -> Option<i64> {
    let digits = token.strip_suffix(['x', 'X'])?;
    match digits.parse::<i64>() {
        Ok(qty) if qty > 0 => Some(qty),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_message_with_fitment() {
        let parsed = parse_message("audi a4 abs sensor");
        assert_eq!(parsed.make.as_deref(), Some("audi"));
        assert_eq!(parsed.model.as_deref(), Some("a4"));
        assert_eq!(parsed.part_name, "abs sensor");
        assert_eq!(parsed.quantity, 1);
    }

    #[test]
    fn test_leading_quantity_token() {
        let parsed = parse_message("2x toyota corolla brake pad set");
        assert_eq!(parsed.quantity, 2);
        assert_eq!(parsed.make.as_deref(), Some("toyota"));
        assert_eq!(parsed.model.as_deref(), Some("corolla"));
        assert_eq!(parsed.part_name, "brake pad set");
    }

    #[test]
    fn test_single_word_is_bare_part_query() {
        let parsed = parse_message("alternator");
        assert_eq!(parsed.make, None);
        assert_eq!(parsed.model, None);
        assert_eq!(parsed.part_name, "alternator");
    }

    #[test]
    fn test_quantity_with_single_word() {
        let parsed = parse_message("3x radiator");
        assert_eq!(parsed.quantity, 3);
        assert_eq!(parsed.part_name, "radiator");
        assert_eq!(parsed.make, None);
    }

    #[test]
    fn test_two_words_consumed_as_fitment_leaves_empty_part() {
        // Mirrors the heuristic's known blind spot: with exactly two
        // words, both are read as fitment and the part name is empty.
        let parsed = parse_message("audi a4");
        assert_eq!(parsed.make.as_deref(), Some("audi"));
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_empty_message() {
        let parsed = parse_message("   ");
        assert!(parsed.is_empty());
        assert_eq!(parsed.quantity, 1);
    }

    #[test]
    fn test_zero_and_malformed_quantity_tokens_are_not_quantities() {
        assert_eq!(parse_quantity_token("0x"), None);
        assert_eq!(parse_quantity_token("x"), None);
        assert_eq!(parse_quantity_token("-2x"), None);
        assert_eq!(parse_quantity_token("ax"), None);
        assert_eq!(parse_quantity_token("10X"), Some(10));
    }
}
