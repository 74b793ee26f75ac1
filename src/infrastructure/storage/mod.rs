//! Relational storage plumbing: pool setup and schema migrations

pub mod migrations;
mod postgres;

pub use migrations::{run_todo_migrations, todo_migrations, Migration, PostgresMigrator};
pub use postgres::{connect, PostgresConfig};
