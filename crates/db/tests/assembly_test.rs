//! Integration tests for tenant config assembly over the in-memory store.
//!
//! Covers board scoping, swimlane/list joins, custom field fan-out across
//! boards, global user inclusion and empty matches.

#![allow(clippy::similar_names)]

use std::sync::Arc;

use mongodb::bson::doc;
use proptest::prelude::*;
use tableau_core::model::{Board, BoardType, CustomField, List, Swimlane, TenantConfig, User};
use tableau_core::pipeline::Collection;
use tableau_db::{
    BoardRepository, ConfigAssembler, CustomFieldRepository, DocumentStore, ListRepository,
    MemoryStore, SwimlaneRepository, UserRepository,
};
use tableau_shared::types::{BoardId, CustomFieldId, ListId, SwimlaneId, UserId};

/// Seeds the reference store:
///
/// - `b1` tableau-acme-x, `b3` tableau-acme-z and template `b4` tableau-acme-tpl
/// - `b2` tableau-other-y
/// - swimlane `s1` on `b1`, `s2` on `b2`; list `l1` on `b1`, `l2` on `b3`
/// - `c1` on `b1` and `b2`, `c2` on `b1` and `b3`, `c3` with no boards
/// - `u1` alice, `u2` bob, `u3` without username, `u4` with an empty one
async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn DocumentStore> = store.clone();

    let boards = BoardRepository::new(shared.clone());
    for (id, slug) in [
        ("b1", "tableau-acme-x"),
        ("b2", "tableau-other-y"),
        ("b3", "TABLEAU-ACME-Z"),
    ] {
        boards.insert(&Board::new(id, id, slug)).await.unwrap();
    }
    let mut template = Board::new("b4", "Templates", "tableau-acme-tpl");
    template.board_type = BoardType::TemplateBoard;
    boards.insert(&template).await.unwrap();

    let swimlanes = SwimlaneRepository::new(shared.clone());
    swimlanes
        .insert(&Swimlane::new("s1", "Default", "b1"))
        .await
        .unwrap();
    swimlanes
        .insert(&Swimlane::new("s2", "Default", "b2"))
        .await
        .unwrap();

    let lists = ListRepository::new(shared.clone());
    lists.insert(&List::new("l1", "Todo", "b1")).await.unwrap();
    lists.insert(&List::new("l2", "Done", "b3")).await.unwrap();

    let fields = CustomFieldRepository::new(shared.clone());
    for (id, board_ids) in [
        ("c1", vec!["b1", "b2"]),
        ("c2", vec!["b1", "b3"]),
        ("c3", vec![]),
    ] {
        let board_ids = board_ids.into_iter().map(BoardId::from).collect();
        fields
            .insert(&CustomField::new(id, id, "text", board_ids))
            .await
            .unwrap();
    }

    let users = UserRepository::new(shared.clone());
    users.insert(&User::new("u1", "alice")).await.unwrap();
    users.insert(&User::new("u2", "bob")).await.unwrap();
    let mut system = User::new("u3", "");
    system.username = None;
    users.insert(&system).await.unwrap();
    users.insert(&User::new("u4", "")).await.unwrap();

    store
}

async fn assemble(store: &Arc<MemoryStore>, pattern: &str) -> TenantConfig {
    ConfigAssembler::new(store.clone())
        .assemble(pattern)
        .await
        .expect("assembly should succeed")
}

#[tokio::test]
async fn test_boards_scoped_by_slug_and_type() {
    let store = seeded_store().await;

    let config = assemble(&store, "^tableau-acme-").await;

    let ids: Vec<_> = config.boards.keys().map(BoardId::as_str).collect();
    assert_eq!(ids, vec!["b1", "b3"]);
}

#[tokio::test]
async fn test_swimlanes_and_lists_stay_with_their_board() {
    let store = seeded_store().await;

    let config = assemble(&store, "^tableau-").await;

    let b1 = config.board(&BoardId::from("b1")).unwrap();
    assert_eq!(b1.swimlanes.keys().collect::<Vec<_>>(), vec![&SwimlaneId::from("s1")]);
    assert_eq!(b1.lists.keys().collect::<Vec<_>>(), vec![&ListId::from("l1")]);

    let b2 = config.board(&BoardId::from("b2")).unwrap();
    assert_eq!(b2.swimlanes.keys().collect::<Vec<_>>(), vec![&SwimlaneId::from("s2")]);
    assert!(b2.lists.is_empty());

    for (board_id, bundle) in &config.boards {
        assert!(bundle.swimlanes.values().all(|s| &s.board_id == board_id));
        assert!(bundle.lists.values().all(|l| &l.board_id == board_id));
    }
}

#[tokio::test]
async fn test_custom_field_fans_out_to_every_board() {
    let store = seeded_store().await;

    let config = assemble(&store, "^tableau-acme-").await;

    let c2 = CustomFieldId::from("c2");
    let holders: Vec<_> = config.boards_with_custom_field(&c2).collect();
    assert_eq!(holders, vec![&BoardId::from("b1"), &BoardId::from("b3")]);

    let c3 = CustomFieldId::from("c3");
    assert_eq!(config.boards_with_custom_field(&c3).count(), 0);
}

#[tokio::test]
async fn test_users_are_global_and_named() {
    let store = seeded_store().await;

    for pattern in ["^tableau-acme-", "^nothing-matches$"] {
        let config = assemble(&store, pattern).await;
        let ids: Vec<_> = config.users.keys().map(UserId::as_str).collect();
        assert_eq!(ids, vec!["u1", "u2"]);
    }
}

#[tokio::test]
async fn test_empty_match_yields_empty_boards() {
    let store = seeded_store().await;

    let config = assemble(&store, "^nothing-matches$").await;

    assert!(config.has_no_boards());
    assert_eq!(config.users.len(), 2);
}

#[tokio::test]
async fn test_empty_store_yields_empty_config() {
    let store = Arc::new(MemoryStore::new());

    let config = assemble(&store, ".*").await;

    assert_eq!(config, TenantConfig::default());
}

#[tokio::test]
async fn test_assembly_is_idempotent() {
    let store = seeded_store().await;

    let first = assemble(&store, "acme").await;
    let second = assemble(&store, "acme").await;

    assert_eq!(first, second);
    assert_eq!(store.open_cursors(), 0);
}

#[tokio::test]
async fn test_reference_scenario() {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn DocumentStore> = store.clone();

    let b1 = Board::new("b1", "X", "tableau-acme-x");
    let b2 = Board::new("b2", "Y", "tableau-other-y");
    let s1 = Swimlane::new("s1", "Default", "b1");
    let c1 = CustomField::new(
        "c1",
        "Priority",
        "dropdown",
        vec![BoardId::from("b1"), BoardId::from("b2")],
    );
    let alice = User::new("u1", "alice");

    BoardRepository::new(shared.clone()).insert(&b1).await.unwrap();
    BoardRepository::new(shared.clone()).insert(&b2).await.unwrap();
    SwimlaneRepository::new(shared.clone()).insert(&s1).await.unwrap();
    CustomFieldRepository::new(shared.clone()).insert(&c1).await.unwrap();
    UserRepository::new(shared.clone()).insert(&alice).await.unwrap();

    let config = assemble(&store, "tableau-acme-").await;

    assert_eq!(config.boards.len(), 1);
    let bundle = &config.boards[&BoardId::from("b1")];
    assert_eq!(bundle.board, b1);
    assert_eq!(bundle.swimlanes[&SwimlaneId::from("s1")], s1);
    assert!(bundle.lists.is_empty());
    assert_eq!(bundle.custom_fields[&CustomFieldId::from("c1")], c1);
    assert_eq!(config.users[&UserId::from("u1")], alice);
}

#[tokio::test]
async fn test_custom_field_without_board_ids_is_skipped() {
    let store = seeded_store().await;
    store
        .insert_one(
            Collection::CustomFields,
            doc! { "_id": "legacy", "name": "Legacy", "type": "text" },
        )
        .await
        .unwrap();

    let config = assemble(&store, "^tableau-acme-").await;

    let legacy = CustomFieldId::from("legacy");
    assert_eq!(config.boards_with_custom_field(&legacy).count(), 0);
}

#[tokio::test]
async fn test_invalid_pattern_is_an_execution_error() {
    let store = seeded_store().await;

    let err = ConfigAssembler::new(store.clone())
        .assemble("(unclosed")
        .await
        .unwrap_err();

    assert!(err.is_execution());
}

fn arb_slug() -> impl Strategy<Value = String> {
    prop_oneof![
        "tableau-acme-[a-z]{1,6}",
        "TABLEAU-ACME-[a-z]{1,6}",
        "tableau-[a-z]{1,6}-[a-z]{1,6}",
        "[a-z]{1,10}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// A board appears iff its slug matches and it is a regular board.
    #[test]
    fn prop_filter_correctness(boards in proptest::collection::vec((arb_slug(), any::<bool>()), 0..12)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let config = runtime.block_on(async {
            let store = Arc::new(MemoryStore::new());
            let repo = BoardRepository::new(store.clone());
            for (index, (slug, template)) in boards.iter().enumerate() {
                let mut board = Board::new(format!("b{index}"), "t", slug.clone());
                if *template {
                    board.board_type = BoardType::TemplateBoard;
                }
                repo.insert(&board).await.unwrap();
            }
            assemble(&store, "^tableau-acme-").await
        });

        for (index, (slug, template)) in boards.iter().enumerate() {
            let expected = !template && slug.to_lowercase().starts_with("tableau-acme-");
            let present = config.boards.contains_key(&BoardId::from(format!("b{index}")));
            prop_assert_eq!(present, expected, "slug {}", slug);
        }
    }
}
