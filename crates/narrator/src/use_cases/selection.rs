//! Winner selection over arbitration output.
//!
//! The completion service answers in free-form text, so mapping that text
//! back to a candidate is a heuristic. The heuristic lives behind a trait so
//! it can be swapped (exact match, structured output) without touching the
//! turn state machine.

use taleweaver_domain::CharacterId;

/// One non-silent agent response, in priority (roster) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub character_id: CharacterId,
    pub name: String,
    pub message: String,
}

/// Maps completion text to one of the candidates, or none.
pub trait SelectionStrategy: Send + Sync {
    fn select<'a>(&self, completion: &str, candidates: &'a [Candidate]) -> Option<&'a Candidate>;
}

/// Picks the first candidate whose character name appears as a substring of
/// the completion text.
///
/// Substring rather than exact match tolerates the service's free-form
/// phrasing ("The Guard reacts immediately."). When one name is a substring
/// of another, iteration order decides - candidates arrive in priority
/// order, so the result is deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameSubstring;

impl SelectionStrategy for NameSubstring {
    fn select<'a>(&self, completion: &str, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        candidates.iter().find(|c| completion.contains(&c.name))
    }
}
