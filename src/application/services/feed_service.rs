//! Feed Service
//!
//! Reads messages or comments and serializes them with their owners, loading
//! each owner once per call.

use std::collections::{BTreeSet, HashMap};

use tracing::instrument;

use crate::config::FeedSettings;
use crate::domain::{
    CommentJson, CommentRepository, MessageId, MessageJson, MessageRepository, User, UserId,
    UserRepository,
};
use crate::shared::error::AppError;

#[derive(Debug, Clone)]
pub struct FeedService {
    timeline_limit: i64,
}

impl FeedService {
    pub fn new(settings: &FeedSettings) -> Self {
        Self {
            timeline_limit: settings.timeline_limit,
        }
    }

    pub fn timeline_limit(&self) -> i64 {
        self.timeline_limit
    }

    /// The user's own messages and those of users they follow, newest first.
    #[instrument(skip(self, session))]
    pub async fn home_timeline<S>(
        &self,
        session: &mut S,
        user_id: UserId,
    ) -> Result<Vec<MessageJson>, AppError>
    where
        S: MessageRepository + UserRepository,
    {
        let messages = session.timeline(user_id, self.timeline_limit).await?;
        let owners = load_owners(session, messages.iter().map(|m| m.user_id)).await?;

        messages
            .iter()
            .map(|m| m.serialize(owner(&owners, m.user_id)?))
            .collect()
    }

    /// A single user's messages, newest first.
    #[instrument(skip(self, session))]
    pub async fn user_messages<S>(
        &self,
        session: &mut S,
        user_id: UserId,
    ) -> Result<Vec<MessageJson>, AppError>
    where
        S: MessageRepository + UserRepository,
    {
        let messages = session
            .messages_by_user(user_id, self.timeline_limit)
            .await?;
        if messages.is_empty() {
            return Ok(Vec::new());
        }

        let user = session
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user_id)))?;

        messages.iter().map(|m| m.serialize(&user)).collect()
    }

    /// Comments on a message, oldest first.
    #[instrument(skip(self, session))]
    pub async fn comment_thread<S>(
        &self,
        session: &mut S,
        message_id: MessageId,
    ) -> Result<Vec<CommentJson>, AppError>
    where
        S: CommentRepository + UserRepository,
    {
        let comments = session.comments_for_message(message_id).await?;
        let owners = load_owners(session, comments.iter().map(|c| c.user_id)).await?;

        comments
            .iter()
            .map(|c| c.serialize(owner(&owners, c.user_id)?))
            .collect()
    }
}

async fn load_owners<S>(
    session: &mut S,
    ids: impl Iterator<Item = UserId>,
) -> Result<HashMap<UserId, User>, AppError>
where
    S: UserRepository + ?Sized,
{
    let ids: BTreeSet<UserId> = ids.collect();
    let mut owners = HashMap::with_capacity(ids.len());

    for id in ids {
        if let Some(user) = session.find_user(id).await? {
            owners.insert(id, user);
        }
    }

    Ok(owners)
}

fn owner(owners: &HashMap<UserId, User>, id: UserId) -> Result<&User, AppError> {
    owners
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
}
