mod repository;
mod storage;

pub use repository::RunRepository;
pub use storage::ObjectStorage;
