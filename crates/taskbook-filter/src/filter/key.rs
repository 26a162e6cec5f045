//! Filter keys and filter operators.

use std::fmt;

use strsim::levenshtein;

/// Maximum Levenshtein distance to consider an alias as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// The task field a filter unit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    /// The task name.
    Name,
    /// The task deadline.
    Deadline,
    /// The task priority.
    Priority,
    /// The task recurrence frequency.
    Frequency,
    /// The task tag set.
    Tag,
    /// The task attachment set.
    Attachment,
}

impl FilterKey {
    /// Every key, in the order they are listed to users.
    pub const ALL: [FilterKey; 6] = [
        FilterKey::Name,
        FilterKey::Deadline,
        FilterKey::Priority,
        FilterKey::Frequency,
        FilterKey::Tag,
        FilterKey::Attachment,
    ];

    /// Returns the aliases that select this key; the first is the short form.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            FilterKey::Name => &["n", "name"],
            FilterKey::Deadline => &["d", "due", "deadline"],
            FilterKey::Priority => &["p", "pri", "priority"],
            FilterKey::Frequency => &["f", "freq", "frequency"],
            FilterKey::Tag => &["t", "tag", "tags"],
            FilterKey::Attachment => &["a", "attach", "attachment", "attachments"],
        }
    }

    /// Looks up a key by alias, ignoring case.
    pub fn from_alias(alias: &str) -> Option<FilterKey> {
        let lower = alias.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.aliases().contains(&lower.as_str()))
    }

    /// Returns the alias that most resembles `alias`, if any is close enough.
    ///
    /// Single-letter aliases are never suggested; they are too easy to hit by accident.
    pub fn suggest(alias: &str) -> Option<&'static str> {
        let lower = alias.to_lowercase();
        let (best_match, best_distance) = Self::ALL
            .iter()
            .flat_map(|key| key.aliases().iter().copied())
            .filter(|candidate| candidate.len() > 1)
            .map(|candidate| (candidate, levenshtein(&lower, candidate)))
            .min_by_key(|(_, distance)| *distance)?;

        if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
            Some(best_match)
        } else {
            None
        }
    }

    /// Returns true for fields that hold a set of values.
    pub fn is_set(&self) -> bool {
        matches!(self, FilterKey::Tag | FilterKey::Attachment)
    }

    /// Returns true for fields that take part in bare-phrase matching.
    ///
    /// Priority and frequency are plain numbers; matching every bare number
    /// against them would flood results with unrelated tasks.
    pub fn matches_bare_phrase(&self) -> bool {
        !matches!(self, FilterKey::Priority | FilterKey::Frequency)
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKey::Name => "name",
            FilterKey::Deadline => "deadline",
            FilterKey::Priority => "priority",
            FilterKey::Frequency => "frequency",
            FilterKey::Tag => "tag",
            FilterKey::Attachment => "attachment",
        };
        f.write_str(name)
    }
}

/// The comparison operator of a filter unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    /// `:`, the field's most natural comparison.
    Convenience,
    /// `=`
    Equal,
    /// `<`
    Less,
    /// `>`
    Greater,
}

impl FilterOperator {
    /// Parses a one-character operator token.
    pub fn from_symbol(symbol: &str) -> Option<FilterOperator> {
        match symbol {
            ":" => Some(FilterOperator::Convenience),
            "=" => Some(FilterOperator::Equal),
            "<" => Some(FilterOperator::Less),
            ">" => Some(FilterOperator::Greater),
            _ => None,
        }
    }

    /// Returns the operator's source symbol.
    pub fn symbol(&self) -> char {
        match self {
            FilterOperator::Convenience => ':',
            FilterOperator::Equal => '=',
            FilterOperator::Less => '<',
            FilterOperator::Greater => '>',
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
