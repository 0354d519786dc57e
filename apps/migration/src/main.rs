//! Migration CLI tool.
//!
//! Reads `DATABASE_URL` and accepts the standard SeaORM subcommands
//! (`up`, `down`, `fresh`, `refresh`, `reset`, `status`).

use blog_migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    cli::run_cli(Migrator).await;
}
