//! In-process evaluation of pipeline stages over BSON documents.

use std::collections::HashMap;

use mongodb::bson::{Bson, Document};
use regex::{Regex, RegexBuilder};
use tableau_core::pipeline::{
    Collection, ID_FIELD, JoinSpec, MatchKind, PAIR_KEY, PAIR_VALUE, Pair, Pipeline, Predicate,
    Stage, pairs_to_map,
};
use tracing::trace;

use crate::error::StoreError;

pub(crate) type Collections = HashMap<Collection, Vec<Document>>;

/// Runs `pipeline` over the documents of `source`.
pub(crate) fn run(
    collections: &Collections,
    source: Collection,
    pipeline: &Pipeline,
) -> Result<Vec<Document>, StoreError> {
    let mut documents = collections.get(&source).cloned().unwrap_or_default();
    for stage in pipeline {
        documents = apply(collections, stage, documents)?;
        trace!(stage = stage.kind(), documents = documents.len(), "Applied stage");
    }
    Ok(documents)
}

fn apply(
    collections: &Collections,
    stage: &Stage,
    documents: Vec<Document>,
) -> Result<Vec<Document>, StoreError> {
    match stage {
        Stage::Filter(predicates) => {
            let matcher = Matcher::compile(predicates)?;
            Ok(documents
                .into_iter()
                .filter(|document| matcher.matches(document))
                .collect())
        }
        Stage::Envelope { field } => Ok(documents
            .into_iter()
            .map(|document| single(field, document))
            .collect()),
        Stage::Join(join) => join_documents(collections, join, documents),
        Stage::PairsToMap { fields } => documents
            .into_iter()
            .map(|mut document| -> Result<Document, StoreError> {
                for field in fields {
                    let converted = array_to_object(document.get(field))?;
                    document.insert(field.as_str(), converted);
                }
                Ok(document)
            })
            .collect(),
        Stage::KeyValue { key, value } => Ok(documents
            .into_iter()
            .map(|document| {
                let k = lookup(&document, key).cloned().unwrap_or(Bson::Null);
                let v: Document = value
                    .iter()
                    .filter_map(|field| document.get(field).map(|b| (field.clone(), b.clone())))
                    .collect();
                pair(k, Bson::Document(v))
            })
            .collect()),
        Stage::Group { field } => {
            let collected: Vec<Bson> = documents.into_iter().map(Bson::Document).collect();
            Ok(vec![single(field, collected)])
        }
        Stage::Keep { fields } => Ok(documents
            .into_iter()
            .map(|document| {
                fields
                    .iter()
                    .filter_map(|field| document.get(field).map(|b| (field.clone(), b.clone())))
                    .collect::<Document>()
            })
            .collect()),
    }
}

fn join_documents(
    collections: &Collections,
    join: &JoinSpec,
    documents: Vec<Document>,
) -> Result<Vec<Document>, StoreError> {
    let matcher = Matcher::compile(&join.filter)?;
    let candidates: Vec<&Document> = collections
        .get(&join.collection)
        .map(|found| found.iter().filter(|c| matcher.matches(c)).collect())
        .unwrap_or_default();

    Ok(documents
        .into_iter()
        .map(|mut document| {
            let pairs: Vec<Bson> = candidates
                .iter()
                .filter(|candidate| joins(&join.match_kind, &document, candidate))
                .map(|candidate| {
                    let id = candidate.get(ID_FIELD).cloned().unwrap_or(Bson::Null);
                    Bson::Document(pair(id, Bson::Document((*candidate).clone())))
                })
                .collect();
            document.insert(join.as_field.as_str(), pairs);
            document
        })
        .collect())
}

fn joins(kind: &MatchKind, document: &Document, candidate: &Document) -> bool {
    match kind {
        MatchKind::Equals { local, foreign } => match lookup(document, local) {
            None | Some(Bson::Null) => false,
            Some(key) => lookup(candidate, foreign) == Some(key),
        },
        MatchKind::Contains { local, foreign } => match lookup(document, local) {
            None | Some(Bson::Null) => false,
            Some(key) => match lookup(candidate, foreign) {
                Some(Bson::Array(members)) => members.contains(key),
                _ => false,
            },
        },
        MatchKind::All => true,
    }
}

/// `$arrayToObject`: an array of `{k, v}` pairs becomes a document. Missing or
/// null input yields null.
fn array_to_object(value: Option<&Bson>) -> Result<Bson, StoreError> {
    let items = match value {
        None | Some(Bson::Null) => return Ok(Bson::Null),
        Some(Bson::Array(items)) => items,
        Some(other) => {
            return Err(StoreError::InvalidPipeline(format!(
                "expected an array of pairs, found {:?}",
                other.element_type()
            )));
        }
    };

    let pairs = items
        .iter()
        .map(|item| {
            let Bson::Document(entry) = item else {
                return Err(StoreError::InvalidPipeline(
                    "pair entries must be documents".to_string(),
                ));
            };
            match (entry.get(PAIR_KEY), entry.get(PAIR_VALUE)) {
                (Some(Bson::String(k)), Some(v)) => Ok(Pair::new(k.clone(), v.clone())),
                _ => Err(StoreError::InvalidPipeline(
                    "pair entries need a string key and a value".to_string(),
                )),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Bson::Document(pairs_to_map(pairs).into_iter().collect()))
}

/// Resolves a dotted path through embedded documents.
fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        match current {
            Bson::Document(inner) => current = inner.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

fn single(field: &str, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(field, value);
    document
}

fn pair(k: Bson, v: Bson) -> Document {
    let mut document = Document::new();
    document.insert(PAIR_KEY, k);
    document.insert(PAIR_VALUE, v);
    document
}

/// Predicates with their regular expressions compiled.
pub(crate) struct Matcher<'a> {
    checks: Vec<Check<'a>>,
}

enum Check<'a> {
    Regex(&'a str, Regex),
    Equals(&'a str, &'a str),
    NonEmpty(&'a str),
    Contains(&'a str, &'a str),
}

impl<'a> Matcher<'a> {
    pub(crate) fn compile(predicates: &'a [Predicate]) -> Result<Self, StoreError> {
        let checks = predicates
            .iter()
            .map(|predicate| -> Result<Check<'a>, StoreError> {
                Ok(match predicate {
                    Predicate::Regex {
                        field,
                        pattern,
                        case_insensitive,
                    } => {
                        let regex = RegexBuilder::new(pattern)
                            .case_insensitive(*case_insensitive)
                            .build()
                            .map_err(|e| {
                                StoreError::InvalidPipeline(format!("bad pattern {pattern:?}: {e}"))
                            })?;
                        Check::Regex(field, regex)
                    }
                    Predicate::Equals { field, value } => Check::Equals(field, value),
                    Predicate::NonEmpty { field } => Check::NonEmpty(field),
                    Predicate::Contains { field, value } => Check::Contains(field, value),
                })
            })
            .collect::<Result<_, StoreError>>()?;
        Ok(Self { checks })
    }

    pub(crate) fn matches(&self, document: &Document) -> bool {
        self.checks.iter().all(|check| match check {
            Check::Regex(field, regex) => {
                matches!(lookup(document, field), Some(Bson::String(s)) if regex.is_match(s))
            }
            Check::Equals(field, value) => {
                matches!(lookup(document, field), Some(Bson::String(s)) if s == value)
            }
            Check::NonEmpty(field) => {
                matches!(lookup(document, field), Some(Bson::String(s)) if !s.is_empty())
            }
            Check::Contains(field, value) => match lookup(document, field) {
                Some(Bson::Array(items)) => items
                    .iter()
                    .any(|item| matches!(item, Bson::String(s) if s == value)),
                _ => false,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use tableau_core::pipeline::{Collection, build_config_pipeline};

    fn collections() -> Collections {
        let mut collections = Collections::new();
        collections.insert(
            Collection::Boards,
            vec![
                doc! { "_id": "b1", "title": "Ops", "slug": "tableau-acme-ops", "type": "board" },
                doc! { "_id": "b2", "title": "Tpl", "slug": "tableau-acme-tpl", "type": "template-board" },
            ],
        );
        collections.insert(
            Collection::CustomFields,
            vec![
                doc! { "_id": "c1", "name": "P", "type": "text", "boardIds": ["b1"] },
                doc! { "_id": "c2", "name": "Q", "type": "text" },
            ],
        );
        collections
    }

    #[test]
    fn test_lookup_dotted_path() {
        let document = doc! { "board": { "_id": "b1" } };
        assert_eq!(lookup(&document, "board._id"), Some(&Bson::String("b1".into())));
        assert_eq!(lookup(&document, "board.slug"), None);
        assert_eq!(lookup(&document, "board._id.x"), None);
    }

    #[test]
    fn test_filter_skips_templates() {
        let result = run(&collections(), Collection::Boards, &Pipeline::from(vec![
            Stage::Filter(vec![
                Predicate::regex_i("slug", "^TABLEAU-ACME-"),
                Predicate::equals("type", "board"),
            ]),
        ]))
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_str("_id").unwrap(), "b1");
    }

    #[test]
    fn test_containment_join_ignores_missing_array() {
        let pipeline = Pipeline::from(vec![
            Stage::Filter(vec![Predicate::equals("_id", "b1")]),
            Stage::Envelope { field: "board".into() },
            Stage::Join(JoinSpec::contains(
                Collection::CustomFields,
                "board._id",
                "boardIds",
                "customFields",
            )),
        ]);
        let result = run(&collections(), Collection::Boards, &pipeline).unwrap();

        let pairs = result[0].get_array("customFields").unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_group_on_empty_input_yields_one_document() {
        let pipeline = Pipeline::from(vec![
            Stage::Filter(vec![Predicate::equals("slug", "nothing")]),
            Stage::Group { field: "boards".into() },
        ]);
        let result = run(&collections(), Collection::Boards, &pipeline).unwrap();

        assert_eq!(result, vec![doc! { "boards": [] }]);
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let result = run(&collections(), Collection::Boards, &build_config_pipeline("(unclosed"));
        assert!(matches!(result, Err(StoreError::InvalidPipeline(_))));
    }

    #[test]
    fn test_non_string_pair_key_is_rejected() {
        let items = Bson::Array(vec![Bson::Document(doc! { "k": 1, "v": "x" })]);
        assert!(array_to_object(Some(&items)).is_err());
    }

    #[test]
    fn test_array_to_object_keeps_last_duplicate() {
        let items = Bson::Array(vec![
            Bson::Document(doc! { "k": "a", "v": 1 }),
            Bson::Document(doc! { "k": "a", "v": 2 }),
        ]);
        assert_eq!(
            array_to_object(Some(&items)).unwrap(),
            Bson::Document(doc! { "a": 2 })
        );
    }
}
