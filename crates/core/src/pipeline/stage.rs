//! Declarative aggregation stages.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`] values. Stores translate it
//! into their own query language, so the stage set is deliberately closed.

use std::fmt;

/// Field holding a document's identity.
pub const ID_FIELD: &str = "_id";
/// Key half of a key/value pair document.
pub const PAIR_KEY: &str = "k";
/// Value half of a key/value pair document.
pub const PAIR_VALUE: &str = "v";

/// The collections of the kanban store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// `boards`
    Boards,
    /// `swimlanes`
    Swimlanes,
    /// `lists`
    Lists,
    /// `customFields`
    CustomFields,
    /// `users`
    Users,
}

impl Collection {
    /// Every collection, in dependency order.
    pub const ALL: [Self; 5] = [
        Self::Boards,
        Self::Swimlanes,
        Self::Lists,
        Self::CustomFields,
        Self::Users,
    ];

    /// Returns the stored collection name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boards => "boards",
            Self::Swimlanes => "swimlanes",
            Self::Lists => "lists",
            Self::CustomFields => "customFields",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A condition on a single (possibly dotted) field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// String field matches a regular expression.
    Regex {
        /// Field path.
        field: String,
        /// Regular expression.
        pattern: String,
        /// Match ignoring case.
        case_insensitive: bool,
    },
    /// Field equals a string value.
    Equals {
        /// Field path.
        field: String,
        /// Expected value.
        value: String,
    },
    /// Field is present and holds a non-empty string.
    NonEmpty {
        /// Field path.
        field: String,
    },
    /// Array field holds the given string among its elements.
    Contains {
        /// Field path.
        field: String,
        /// Expected element.
        value: String,
    },
}

impl Predicate {
    /// Case-insensitive regular expression match.
    #[must_use]
    pub fn regex_i(field: &str, pattern: &str) -> Self {
        Self::Regex {
            field: field.to_string(),
            pattern: pattern.to_string(),
            case_insensitive: true,
        }
    }

    /// Equality with a string value.
    #[must_use]
    pub fn equals(field: &str, value: &str) -> Self {
        Self::Equals {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Presence of a non-empty string.
    #[must_use]
    pub fn non_empty(field: &str) -> Self {
        Self::NonEmpty {
            field: field.to_string(),
        }
    }

    /// Array membership of a string value.
    #[must_use]
    pub fn contains(field: &str, value: &str) -> Self {
        Self::Contains {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Returns the field the predicate inspects.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Regex { field, .. }
            | Self::Equals { field, .. }
            | Self::NonEmpty { field }
            | Self::Contains { field, .. } => field,
        }
    }
}

/// How documents of a joined collection relate to the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    /// One-to-many: the foreign field equals the local value.
    Equals {
        /// Path in the current document.
        local: String,
        /// Field in the joined document.
        foreign: String,
    },
    /// Many-to-many: the local value is a member of the foreign array.
    Contains {
        /// Path in the current document.
        local: String,
        /// Array field in the joined document.
        foreign: String,
    },
    /// Uncorrelated: every joined document matching the filter.
    All,
}

/// A join against another collection.
///
/// Every join attaches its matches under `as_field` as `{k: _id, v: document}`
/// pairs, whatever the match kind, so later reshaping stays generic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    /// Collection to pull documents from.
    pub collection: Collection,
    /// Join predicate.
    pub match_kind: MatchKind,
    /// Extra conditions on the joined documents.
    pub filter: Vec<Predicate>,
    /// Field receiving the pair array.
    pub as_field: String,
}

impl JoinSpec {
    /// Join where `foreign == local`.
    #[must_use]
    pub fn equals(collection: Collection, local: &str, foreign: &str, as_field: &str) -> Self {
        Self {
            collection,
            match_kind: MatchKind::Equals {
                local: local.to_string(),
                foreign: foreign.to_string(),
            },
            filter: Vec::new(),
            as_field: as_field.to_string(),
        }
    }

    /// Join where `local` is a member of the `foreign` array.
    #[must_use]
    pub fn contains(collection: Collection, local: &str, foreign: &str, as_field: &str) -> Self {
        Self {
            collection,
            match_kind: MatchKind::Contains {
                local: local.to_string(),
                foreign: foreign.to_string(),
            },
            filter: Vec::new(),
            as_field: as_field.to_string(),
        }
    }

    /// Uncorrelated join of the whole collection.
    #[must_use]
    pub fn all(collection: Collection, as_field: &str) -> Self {
        Self {
            collection,
            match_kind: MatchKind::All,
            filter: Vec::new(),
            as_field: as_field.to_string(),
        }
    }

    /// Adds a condition on the joined documents.
    #[must_use]
    pub fn with_filter(mut self, predicate: Predicate) -> Self {
        self.filter.push(predicate);
        self
    }
}

/// One step of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Keep documents satisfying every predicate.
    Filter(Vec<Predicate>),
    /// Replace each document with `{field: document}`.
    Envelope {
        /// Field receiving the original document.
        field: String,
    },
    /// Attach documents of another collection.
    Join(JoinSpec),
    /// Convert each named array of `{k, v}` pairs into a mapping.
    PairsToMap {
        /// Fields to convert.
        fields: Vec<String>,
    },
    /// Replace each document with `{k: <key>, v: {<value fields>}}`.
    KeyValue {
        /// Path of the key.
        key: String,
        /// Top-level fields bundled into the value.
        value: Vec<String>,
    },
    /// Group-by-constant: collapse all documents into exactly one document
    /// `{field: [documents]}`, even when there are none.
    Group {
        /// Field receiving the collected documents.
        field: String,
    },
    /// Keep only the named top-level fields.
    Keep {
        /// Fields to retain.
        fields: Vec<String>,
    },
}

impl Stage {
    /// Short stage name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Filter(_) => "filter",
            Self::Envelope { .. } => "envelope",
            Self::Join(_) => "join",
            Self::PairsToMap { .. } => "pairs_to_map",
            Self::KeyValue { .. } => "key_value",
            Self::Group { .. } => "group",
            Self::Keep { .. } => "keep",
        }
    }
}

/// An ordered sequence of stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline(Vec<Stage>);

impl Pipeline {
    /// Returns the stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.0
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the pipeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the join stages.
    pub fn joins(&self) -> impl Iterator<Item = &JoinSpec> {
        self.0.iter().filter_map(|stage| match stage {
            Stage::Join(join) => Some(join),
            _ => None,
        })
    }
}

impl From<Vec<Stage>> for Pipeline {
    fn from(stages: Vec<Stage>) -> Self {
        Self(stages)
    }
}

impl<'a> IntoIterator for &'a Pipeline {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
