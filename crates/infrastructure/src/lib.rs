//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_run_store;
mod postgres_run_repository;
mod run_row;
mod supabase_client;
mod supabase_object_storage;
mod supabase_run_repository;

pub use in_memory_run_store::{InMemoryObjectStorage, InMemoryRunRepository};
pub use postgres_run_repository::PostgresRunRepository;
pub use supabase_client::SupabaseConfig;
pub use supabase_object_storage::SupabaseObjectStorage;
pub use supabase_run_repository::SupabaseRunRepository;
