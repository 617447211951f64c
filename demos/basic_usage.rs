//! # Basic Usage Example
//!
//! Walks through the everyday Accessor workflow against a local PostgreSQL:
//! - Defining models with the `#[model]` macro
//! - Insert, select, update and delete through `ActiveRecord`
//! - Composing queries with filters, ordering and limits
//! - Following relationships between models
//! - Registering lifecycle hooks
//!
//! Expects a database reachable as `postgres:password@localhost:5432/accessor`.

use accessor::entity_object::PgDriver;
use accessor::prelude::*;
use std::sync::Arc;

#[model]
#[table(name = "demo_authors")]
pub struct Author {
    #[primary_key]
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

#[model]
#[table(name = "demo_posts")]
pub struct Post {
    #[primary_key]
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub views: i32,
}

const SCHEMA: &[&str] = &[
    "DROP TABLE IF EXISTS demo_posts, demo_authors CASCADE",
    "CREATE TABLE demo_authors (id BIGSERIAL PRIMARY KEY, name TEXT NOT NULL, email TEXT)",
    "CREATE TABLE demo_posts (id BIGSERIAL PRIMARY KEY, author_id BIGINT NOT NULL REFERENCES demo_authors(id), title TEXT NOT NULL, views INT NOT NULL)",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("Accessor Basic Usage Example");
    println!("============================");

    // 1. Setup
    let config = DatabaseConfig::new(
        "pgsql".to_string(),
        "localhost".to_string(),
        "accessor".to_string(),
        5432,
        "postgres".to_string(),
        "password".to_string(),
    );
    config.validate()?;

    let driver = PgDriver::connect(&config).await?;
    for statement in SCHEMA {
        accessor::sqlx::query(statement).execute(driver.pool()).await?;
    }

    let mut accessor = Accessor::with_driver(Arc::new(driver));
    accessor.health_check().await?;
    println!("Connected to {}", config.dsn());

    // 2. Hooks
    accessor.register_hooks(
        HookSet::<Author>::new()
            .before_insert(|author| author.name = author.name.trim().to_string())
            .after_insert(|author| println!("  hook: inserted author #{}", author.id)),
    );
    let db = accessor.database();

    // 3. Create
    println!("\nCreating records");
    let mut author = Author {
        name: "  Ada Lovelace ".to_string(),
        email: Some("ada@example.com".to_string()),
        ..Default::default()
    };
    author.insert(db).await?;
    println!("  author stored as '{}' with id {}", author.name, author.id);

    for (title, views) in [("Notes on the Engine", 120), ("On Bernoulli Numbers", 45)] {
        let mut post = Post {
            author_id: author.id,
            title: title.to_string(),
            views,
            ..Default::default()
        };
        post.insert(db).await?;
    }

    // 4. Read
    println!("\nQuerying");
    let popular = Post::select()
        .filter(("views", ">", 100))
        .order("views", SortOrder::Desc)
        .fetch(db)
        .await?;
    for post in &popular {
        println!("  popular: {} ({} views)", post.title, post.views);
    }
    println!("  total posts: {}", Post::select().count(db).await?);

    // 5. Relationships
    println!("\nRelationships");
    let posts: Vec<Post> = author.has_many(db, "author_id").await?;
    println!("  {} has {} posts", author.name, posts.len());
    if let Some(post) = posts.first() {
        let owner: Option<Author> = post.belongs_to(db, "author_id", "id").await?;
        if let Some(owner) = owner {
            println!("  '{}' was written by {}", post.title, owner.name);
        }
    }

    // 6. Update
    println!("\nUpdating");
    author.email = None;
    author.update(db).await?;
    let reloaded = Author::select().filter(("id", author.id)).first(db).await?;
    println!("  email after update: {:?}", reloaded.and_then(|a| a.email));

    // 7. Delete
    println!("\nDeleting");
    for mut post in posts {
        post.delete(db).await?;
    }
    author.delete(db).await?;
    println!(
        "  remaining authors: {}",
        Author::select().count(db).await?
    );

    println!("\nDone");
    Ok(())
}
