//! Prompt composition for the Vicky persona
//!
//! Exactly two instruction templates exist, keyed on whether the session's
//! assistant has introduced itself yet. The introduction is issued once per
//! session; every later turn explicitly forbids repeating it.

use crate::knowledge::FaqMatch;

/// Build the instruction text sent to the model for one turn.
///
/// Pure function: the caller owns the `introduced` flag and flips it after
/// composing.
pub fn compose(query: &str, faq: Option<&FaqMatch>, introduced: bool) -> String {
    let context = match faq {
        Some(m) => format!("FAQ Answer: {}", m.answer),
        None => String::new(),
    };

    if !introduced {
        format!(
            "Your name is VICKY, the official AI assistant of VKIT College. \
             You should introduce yourself only once in the first message. \
             After the first message, NEVER introduce yourself again.\n\n\
             Student Question: {query}\n\
             {context}\n\
             Give your first answer with introduction:"
        )
    } else {
        format!(
            "You are VICKY, the VKIT College assistant. \
             You already introduced yourself before. \
             Do NOT introduce yourself again.\n\n\
             Student Question: {query}\n\
             {context}\n\
             Answer normally and directly:"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_turn_uses_introduction_template() {
        let prompt = compose("Where is VKIT located?", None, false);
        assert!(prompt.contains("introduce yourself only once"));
        assert!(prompt.ends_with("Give your first answer with introduction:"));
        assert!(prompt.contains("Student Question: Where is VKIT located?"));
    }

    #[test]
    fn later_turns_forbid_reintroduction() {
        let prompt = compose("What about fees?", None, true);
        assert!(prompt.contains("Do NOT introduce yourself again"));
        assert!(prompt.ends_with("Answer normally and directly:"));
        assert!(!prompt.contains("first answer with introduction"));
    }

    #[test]
    fn matched_faq_is_embedded_as_context() {
        let m = FaqMatch {
            answer: "9am-5pm".into(),
        };
        let prompt = compose("library hours?", Some(&m), true);
        assert!(prompt.contains("FAQ Answer: 9am-5pm"));
    }

    #[test]
    fn no_match_leaves_context_empty() {
        let prompt = compose("library hours?", None, true);
        assert!(!prompt.contains("FAQ Answer:"));
    }
}
