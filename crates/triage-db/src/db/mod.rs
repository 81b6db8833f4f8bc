pub mod connection;
pub mod enums;
pub mod migrate;
pub mod pg_store;
pub mod query;
pub mod schema;
pub mod transaction;
