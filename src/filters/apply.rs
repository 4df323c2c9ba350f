use std::sync::Arc;

use super::criteria::FilterCriteria;
use crate::models::{Backup, Conversation, FilteredMessage, FilteredMessages, Message};

/// Result sets larger than this are counted but not listed message by message
pub const DISPLAY_LIMIT: usize = 5000;

pub fn exceeds_display_limit(len: usize) -> bool {
    len > DISPLAY_LIMIT
}

/// Select the messages matching `criteria`, split by collection
///
/// Filter logic:
/// - An excluded collection yields an empty list and is not scanned
/// - An empty query matches every message of the included collections
/// - Otherwise a message matches when its contents contain the query, ignoring case
///
/// Per-conversation message order is preserved and conversations are visited
/// in backup order. The backup is only read; results share its messages.
pub fn filter_backup(backup: &Backup, criteria: &FilterCriteria) -> FilteredMessages {
    let matcher = Matcher::new(&criteria.query);

    let direct = if criteria.include_direct {
        collect_matches(&backup.direct, &matcher)
    } else {
        Vec::new()
    };
    let groups = if criteria.include_groups {
        collect_matches(&backup.groups, &matcher)
    } else {
        Vec::new()
    };

    FilteredMessages { direct, groups }
}

fn collect_matches<C: Conversation>(conversations: &[C], matcher: &Matcher) -> Vec<FilteredMessage> {
    let mut matches = Vec::new();

    for conversation in conversations {
        // One shared id per conversation instead of one String per match
        let mut conversation_id: Option<Arc<str>> = None;

        for message in conversation.messages() {
            if matcher.is_match(message) {
                let id = conversation_id.get_or_insert_with(|| Arc::from(conversation.id()));
                matches.push(FilteredMessage::new(Arc::clone(id), Arc::clone(message)));
            }
        }
    }

    matches
}

/// Case folding applied to both query and contents
///
/// Every char is lowered on its own (`char::to_lowercase`), never depending on
/// the surrounding text (no final-sigma rule).
fn fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

/// Query folded once per filter pass
struct Matcher {
    needle: Vec<char>,
    /// Longest proper prefix of `needle[..=i]` that is also its suffix
    fallback: Vec<usize>,
    /// Folded query bytes when the query is pure ASCII
    ascii: Option<Vec<u8>>,
}

impl Matcher {
    fn new(query: &str) -> Self {
        let needle: Vec<char> = fold(query).collect();
        let fallback = fallback_table(&needle);
        let ascii =
            needle.iter().all(char::is_ascii).then(|| needle.iter().map(|&c| c as u8).collect());
        Self { needle, fallback, ascii }
    }

    fn is_match(&self, message: &Message) -> bool {
        self.matches(&message.contents)
    }

    fn matches(&self, haystack: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        if let Some(needle) = &self.ascii
            && haystack.is_ascii()
        {
            return haystack.len() >= needle.len()
                && haystack.as_bytes().windows(needle.len()).any(|w| w.eq_ignore_ascii_case(needle));
        }
        self.matches_folded(haystack)
    }

    /// Streaming KMP over the folded contents; never allocates
    fn matches_folded(&self, haystack: &str) -> bool {
        let mut matched = 0;
        for ch in fold(haystack) {
            while matched > 0 && self.needle[matched] != ch {
                matched = self.fallback[matched - 1];
            }
            if self.needle[matched] == ch {
                matched += 1;
                if matched == self.needle.len() {
                    return true;
                }
            }
        }
        false
    }
}

fn fallback_table(needle: &[char]) -> Vec<usize> {
    let mut table = vec![0; needle.len()];
    let mut k = 0;
    for i in 1..needle.len() {
        while k > 0 && needle[i] != needle[k] {
            k = table[k - 1];
        }
        if needle[i] == needle[k] {
            k += 1;
        }
        table[i] = k;
    }
    table
}
