//! Database schema migrations.

use crate::{Db, DbError};

/// Idempotent schema statements, applied in order.
pub const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS coupons (
        id TEXT PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        description TEXT,
        kind TEXT NOT NULL,
        percent REAL,
        amount_cents INTEGER,
        currency TEXT NOT NULL,
        minimum_order_cents INTEGER NOT NULL DEFAULT 0,
        maximum_discount_cents INTEGER,
        usage_limit INTEGER,
        used_count INTEGER NOT NULL DEFAULT 0,
        user_usage_limit INTEGER,
        applicable_products TEXT NOT NULL DEFAULT '[]',
        applicable_categories TEXT NOT NULL DEFAULT '[]',
        starts_at INTEGER NOT NULL,
        ends_at INTEGER NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        sku TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        description TEXT,
        status TEXT NOT NULL,
        price_cents INTEGER NOT NULL,
        currency TEXT NOT NULL,
        category_ids TEXT NOT NULL DEFAULT '[]',
        tags TEXT NOT NULL DEFAULT '[]',
        image_url TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY,
        parent_id TEXT,
        name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        description TEXT,
        image_url TEXT,
        position INTEGER NOT NULL DEFAULT 0,
        product_count INTEGER NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_products_status ON products(status)",
    "CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_id)",
];

/// Apply all migrations.
pub fn migrate(db: &Db) -> Result<(), DbError> {
    for statement in MIGRATIONS {
        db.execute(statement, &[])?;
    }
    tracing::info!(statements = MIGRATIONS.len(), "schema migrated");
    Ok(())
}
