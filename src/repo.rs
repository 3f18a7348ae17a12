mod memory;
mod postgres;
mod query;
mod store;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use query::{Direction, Filter, Page, PageInfo, Pagination, Sort, Window};
pub use store::{Document, DocumentStore, Store, StoreError, StoreResult};
