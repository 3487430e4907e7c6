use std::sync::Arc;

use tracing::{debug, info};

use murmur_db::{AuthRepository, PrivateRepository, PublicRepository};
use murmur_types::models::{Message, Principal};
use murmur_types::{ChatError, Result};

use crate::identity::{Credentials, IdentityResolver, VerifyIdentity};

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    resolver: IdentityResolver,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, resolver: IdentityResolver) -> Self {
        Self { repo, resolver }
    }

    /// Register a user. Returns a bearer token under token auth, or the
    /// username under password auth.
    pub fn create_user(&self, username: &str, password: &str) -> Result<String> {
        let stored = self.resolver.seal_password(password)?;
        self.repo.insert_user(username, &stored)?;
        info!(username = %username, "user registered");

        self.resolver.issue(username)
    }

    pub fn user_identity(&self, credentials: &Credentials) -> Result<Principal> {
        self.resolver.verify(credentials)
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }
}

pub struct PublicService {
    repo: Arc<dyn PublicRepository>,
}

impl PublicService {
    pub fn new(repo: Arc<dyn PublicRepository>) -> Self {
        Self { repo }
    }

    pub fn send_message(&self, message: Message) -> Result<()> {
        debug!(sender = %message.sender, "public message");
        self.repo.insert_message(message)
    }

    /// A page of the public log. Paging past the end yields an empty page.
    pub fn messages(&self, limit: usize, offset: usize) -> Result<Vec<Message>> {
        empty_when_out_of_range(self.repo.get_messages(limit, offset))
    }
}

pub struct PrivateService {
    repo: Arc<dyn PrivateRepository>,
}

impl PrivateService {
    pub fn new(repo: Arc<dyn PrivateRepository>) -> Self {
        Self { repo }
    }

    pub fn send_message(&self, message: Message) -> Result<()> {
        debug!(sender = %message.sender, recipient = %message.recipient, "private message");
        self.repo.insert_message(message)
    }

    /// A page of the conversation. Paging past the end yields an empty page,
    /// but a conversation that never started is still `ChatNotFound`.
    pub fn messages(
        &self,
        sender: &str,
        recipient: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>> {
        empty_when_out_of_range(self.repo.get_messages(sender, recipient, limit, offset))
    }

    pub fn correspondents(&self, user: &str) -> Result<Vec<String>> {
        self.repo.get_users(user)
    }
}

fn empty_when_out_of_range(page: Result<Vec<Message>>) -> Result<Vec<Message>> {
    match page {
        Err(ChatError::OutOfRange) => Ok(Vec::new()),
        other => other,
    }
}
