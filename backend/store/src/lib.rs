pub mod memory;
pub mod mongo;

pub use memory::InMemoryMessageStore;
pub use mongo::{MessageDocument, MongoMessageStore};
