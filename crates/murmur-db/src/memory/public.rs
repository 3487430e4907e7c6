use std::sync::Arc;

use murmur_types::Result;
use murmur_types::models::Message;

use super::MemoryStore;
use crate::pagination::paginate;
use crate::repository::PublicRepository;

pub struct MemoryPublicRepo {
    store: Arc<MemoryStore>,
}

impl MemoryPublicRepo {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl PublicRepository for MemoryPublicRepo {
    fn insert_message(&self, message: Message) -> Result<()> {
        self.store.public.apply(|log| log.push(message))
    }

    fn get_messages(&self, limit: usize, offset: usize) -> Result<Vec<Message>> {
        self.store
            .public
            .read(|log| paginate(log, limit, offset).map(<[Message]>::to_vec))?
    }
}
