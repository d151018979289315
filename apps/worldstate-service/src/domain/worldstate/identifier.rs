//! Identifier kinds and their fallback rules.

use std::borrow::Cow;
use std::fmt;

/// Path segment the store omits from item keys.
const STORE_ITEMS_SEGMENT: &str = "StoreItems/";

/// What an internal identifier names.
///
/// The kind fixes which localization store category holds its display
/// string and which single rewrite is tried after a verbatim miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    /// Store item path.
    Item,
    /// Star chart node.
    Node,
    /// Mission type code.
    MissionType,
    /// Faction code.
    Faction,
    /// Language tag.
    Language,
    /// Seasonal challenge path.
    Challenge,
    /// Sortie or archon boss code.
    SortieBoss,
    /// Sortie condition code.
    SortieModifier,
}

impl IdentifierKind {
    /// Localization store category.
    #[must_use]
    pub const fn store_category(self) -> &'static str {
        match self {
            Self::Item => "items",
            Self::Node => "nodes",
            Self::MissionType => "missionTypes",
            Self::Faction => "factions",
            Self::Language => "languages",
            Self::Challenge => "challenges",
            Self::SortieBoss => "sortieBosses",
            Self::SortieModifier => "sortieModifiers",
        }
    }

    /// Rewritten key to retry after a verbatim miss, or `None` when the
    /// kind has no rewrite or the rewrite leaves the key unchanged.
    #[must_use]
    pub fn fallback_key(self, identifier: &str) -> Option<String> {
        let rewritten: Cow<'_, str> = match self {
            Self::Item => Cow::Owned(identifier.replace(STORE_ITEMS_SEGMENT, "")),
            Self::Language => Cow::Owned(identifier.to_lowercase()),
            Self::Challenge => Cow::Borrowed(
                identifier
                    .rsplit('/')
                    .find(|segment| !segment.is_empty())
                    .unwrap_or(identifier),
            ),
            Self::Node
            | Self::MissionType
            | Self::Faction
            | Self::SortieBoss
            | Self::SortieModifier => return None,
        };

        (rewritten != identifier).then(|| rewritten.into_owned())
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.store_category())
    }
}
