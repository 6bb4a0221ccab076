//! Translation of pipeline stages into MongoDB aggregation syntax.
//!
//! Two stages need care on MongoDB:
//!
//! - `Group` renders as `$facet` rather than `$group`, because `$group` over
//!   an empty input yields no document while `$facet` always yields one.
//! - Containment joins guard the foreign array with `$isArray` so documents
//!   lacking `boardIds` are skipped instead of failing the `$in`.

use mongodb::bson::{Bson, Document, doc};
use tableau_core::pipeline::{
    ID_FIELD, JoinSpec, MatchKind, PAIR_KEY, PAIR_VALUE, Pipeline, Predicate, Stage,
};

/// `$lookup` variable bound to the local join key.
const LOCAL_VAR: &str = "localKey";

/// Renders a full pipeline.
#[must_use]
pub fn render_pipeline(pipeline: &Pipeline) -> Vec<Document> {
    pipeline.stages().iter().map(render_stage).collect()
}

/// Renders predicates as a query filter; several predicates are AND-ed.
#[must_use]
pub fn render_filter(predicates: &[Predicate]) -> Document {
    let mut clauses: Vec<Document> = predicates.iter().map(render_predicate).collect();
    match clauses.len() {
        0 => Document::new(),
        1 => clauses.remove(0),
        _ => doc! { "$and": clauses },
    }
}

/// Renders one stage.
#[must_use]
pub fn render_stage(stage: &Stage) -> Document {
    match stage {
        Stage::Filter(predicates) => doc! { "$match": render_filter(predicates) },
        Stage::Envelope { field } => {
            doc! { "$replaceRoot": { "newRoot": single(field, "$$ROOT") } }
        }
        Stage::Join(join) => render_join(join),
        Stage::PairsToMap { fields } => {
            let mut converted = Document::new();
            for field in fields {
                converted.insert(field.as_str(), doc! { "$arrayToObject": reference(field) });
            }
            doc! { "$addFields": converted }
        }
        Stage::KeyValue { key, value } => {
            let mut bundle = Document::new();
            for field in value {
                bundle.insert(field.as_str(), reference(field));
            }
            doc! { "$replaceRoot": { "newRoot": pair(reference(key), bundle) } }
        }
        Stage::Group { field } => {
            doc! { "$facet": single(field, vec![doc! { "$match": {} }]) }
        }
        Stage::Keep { fields } => {
            let mut projection = doc! { "_id": 0 };
            for field in fields {
                projection.insert(field.as_str(), 1);
            }
            doc! { "$project": projection }
        }
    }
}

fn render_predicate(predicate: &Predicate) -> Document {
    let condition = match predicate {
        Predicate::Regex {
            pattern,
            case_insensitive,
            ..
        } => {
            let options = if *case_insensitive { "i" } else { "" };
            doc! { "$regex": pattern.as_str(), "$options": options }
        }
        Predicate::Equals { value, .. } => doc! { "$eq": value.as_str() },
        Predicate::NonEmpty { .. } => doc! { "$type": "string", "$ne": "" },
        Predicate::Contains { value, .. } => doc! { "$elemMatch": { "$eq": value.as_str() } },
    };
    single(predicate.field(), condition)
}

fn render_join(join: &JoinSpec) -> Document {
    let mut lookup = doc! {
        "from": join.collection.name(),
        "as": join.as_field.as_str(),
    };
    let mut pipeline = Vec::new();

    match &join.match_kind {
        MatchKind::Equals { local, foreign } => {
            lookup.insert("let", single(LOCAL_VAR, reference(local)));
            pipeline.push(doc! {
                "$match": { "$expr": { "$eq": [reference(foreign), variable()] } }
            });
        }
        MatchKind::Contains { local, foreign } => {
            lookup.insert("let", single(LOCAL_VAR, reference(local)));
            let members = doc! {
                "$cond": [{ "$isArray": reference(foreign) }, reference(foreign), []]
            };
            pipeline.push(doc! {
                "$match": { "$expr": { "$in": [variable(), members] } }
            });
        }
        MatchKind::All => {}
    }

    if !join.filter.is_empty() {
        pipeline.push(doc! { "$match": render_filter(&join.filter) });
    }
    pipeline.push(doc! {
        "$replaceRoot": { "newRoot": pair(reference(ID_FIELD), "$$ROOT") }
    });

    lookup.insert("pipeline", pipeline);
    doc! { "$lookup": lookup }
}

fn reference(field: &str) -> String {
    format!("${field}")
}

fn variable() -> String {
    format!("$${LOCAL_VAR}")
}

fn single(field: &str, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(field, value);
    document
}

fn pair(key: impl Into<Bson>, value: impl Into<Bson>) -> Document {
    let mut document = Document::new();
    document.insert(PAIR_KEY, key);
    document.insert(PAIR_VALUE, value);
    document
}
