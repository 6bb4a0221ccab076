//! Document store seeder for Tableau development and testing.
//!
//! Seeds a demo tenant (two `tableau-demo-` boards, a template board, their
//! swimlanes, lists and custom fields) plus a few users. Re-running skips
//! documents that already exist.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use serde_json::json;
use tableau_core::model::{Board, BoardType, CustomField, List, Swimlane, User, UserEmail};
use tableau_db::repositories::{Entity, EntityRepository};
use tableau_db::{DocumentStore, connect};
use tableau_shared::AppConfig;
use tableau_shared::types::BoardId;

/// Demo board IDs (stable across runs).
const DEMO_BOARD_ID: &str = "demo-board-ops";
const DEMO_BOARD_SALES_ID: &str = "demo-board-sales";
const TEMPLATE_BOARD_ID: &str = "demo-board-template";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    println!("Connecting to {}...", config.database.name);
    let store: Arc<dyn DocumentStore> = Arc::new(connect(&config.database).await?);

    println!("Seeding boards...");
    seed(&store, demo_boards()).await?;

    println!("Seeding swimlanes...");
    seed(&store, demo_swimlanes()).await?;

    println!("Seeding lists...");
    seed(&store, demo_lists()).await?;

    println!("Seeding custom fields...");
    seed(&store, demo_custom_fields()).await?;

    println!("Seeding users...");
    seed(&store, demo_users()).await?;

    println!("Seeding complete!");
    Ok(())
}

/// Inserts every entity whose ID is not taken yet.
async fn seed<T: Entity>(store: &Arc<dyn DocumentStore>, entities: Vec<T>) -> anyhow::Result<()> {
    let repo = EntityRepository::<T>::new(Arc::clone(store));
    for entity in entities {
        let id = entity.id().as_ref().to_string();
        if repo.find_by_id(entity.id()).await?.is_some() {
            println!("  {id} already exists, skipping...");
            continue;
        }
        repo.insert(&entity).await?;
        println!("  Created {id}");
    }
    Ok(())
}

fn demo_boards() -> Vec<Board> {
    let mut ops = Board::new(DEMO_BOARD_ID, "Operations", "tableau-demo-operations");
    ops.color = Some("belize".to_string());
    ops.permission = Some("private".to_string());

    let mut sales = Board::new(DEMO_BOARD_SALES_ID, "Sales", "tableau-demo-sales");
    sales.color = Some("nephritis".to_string());
    sales.permission = Some("private".to_string());

    let mut template = Board::new(TEMPLATE_BOARD_ID, "Templates", "tableau-demo-templates");
    template.board_type = BoardType::TemplateContainer;

    vec![ops, sales, template]
}

fn demo_swimlanes() -> Vec<Swimlane> {
    let mut swimlanes = Vec::new();
    for board_id in [DEMO_BOARD_ID, DEMO_BOARD_SALES_ID] {
        for (index, title) in ["Default", "Escalations"].into_iter().enumerate() {
            let mut swimlane = Swimlane::new(
                format!("{board_id}-swimlane-{index}"),
                title,
                board_id,
            );
            swimlane.sort = Some(sort_key(index));
            swimlanes.push(swimlane);
        }
    }
    swimlanes
}

fn demo_lists() -> Vec<List> {
    let mut lists = Vec::new();
    for board_id in [DEMO_BOARD_ID, DEMO_BOARD_SALES_ID] {
        for (index, title) in ["Backlog", "In Progress", "Done"].into_iter().enumerate() {
            let mut list = List::new(format!("{board_id}-list-{index}"), title, board_id);
            list.sort = Some(sort_key(index));
            lists.push(list);
        }
    }
    lists
}

fn sort_key(index: usize) -> f64 {
    f64::from(u32::try_from(index).unwrap_or(u32::MAX))
}

fn demo_custom_fields() -> Vec<CustomField> {
    let mut priority = CustomField::new(
        "demo-field-priority",
        "Priority",
        "dropdown",
        vec![BoardId::from(DEMO_BOARD_ID), BoardId::from(DEMO_BOARD_SALES_ID)],
    );
    priority.settings = json!({
        "dropdownItems": [
            { "_id": "low", "name": "Low" },
            { "_id": "high", "name": "High" },
        ]
    });
    priority.show_on_card = true;

    let estimate = CustomField::new(
        "demo-field-estimate",
        "Estimate",
        "number",
        vec![BoardId::from(DEMO_BOARD_ID)],
    );

    vec![priority, estimate]
}

fn demo_users() -> Vec<User> {
    let mut admin = User::new("demo-user-admin", "admin");
    admin.is_admin = true;
    admin.emails.push(UserEmail {
        address: "admin@tableau.dev".to_string(),
        verified: true,
    });
    admin.profile = json!({ "fullname": "Demo Admin" });

    let member = User::new("demo-user-member", "member");

    vec![admin, member]
}
