//! Repository trait impls for [`MemorySession`].

use async_trait::async_trait;

use super::tables::{self, Tables};
use super::{MemorySession, Write};
use crate::domain::{
    check_feed_limit, Comment, CommentId, CommentRepository, Follow, FollowRepository, Like,
    LikeRepository, Message, MessageId, MessageRepository, NewComment, NewMessage, NewUser, User,
    UserId, UserProfileUpdate, UserRepository,
};
use crate::shared::error::AppError;

#[async_trait]
impl UserRepository for MemorySession {
    async fn insert_user(&mut self, user: &NewUser) -> Result<User, AppError> {
        let row = tables::user_row(self.next_user_id(), user);
        self.write(Write::InsertUser(row.clone()), |t| Ok(t.insert_user(row)))
    }

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, AppError> {
        self.read(|t| t.users.get(&id).cloned())
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, AppError> {
        self.read(|t| t.users.values().find(|u| u.username == username).cloned())
    }

    async fn search_users(&mut self, query: &str) -> Result<Vec<User>, AppError> {
        self.read(|t| {
            t.users
                .values()
                .filter(|u| u.username.contains(query))
                .cloned()
                .collect()
        })
    }

    async fn update_user(&mut self, id: UserId, update: &UserProfileUpdate) -> Result<User, AppError> {
        self.write(Write::UpdateUser(id, update.clone()), |t| t.update_user(id, update))
    }

    async fn delete_user(&mut self, id: UserId) -> Result<(), AppError> {
        self.write(Write::DeleteUser(id), |t| t.delete_user(id))
    }
}

#[async_trait]
impl MessageRepository for MemorySession {
    async fn insert_message(&mut self, message: &NewMessage) -> Result<Message, AppError> {
        let row = tables::message_row(self.next_message_id(), message);
        self.write(Write::InsertMessage(row.clone()), |t| t.insert_message(row))
    }

    async fn find_message(&mut self, id: MessageId) -> Result<Option<Message>, AppError> {
        self.read(|t| t.messages.get(&id).cloned())
    }

    async fn delete_message(&mut self, id: MessageId) -> Result<(), AppError> {
        self.write(Write::DeleteMessage(id), |t| t.delete_message(id))
    }

    async fn messages_by_user(&mut self, user_id: UserId, limit: i64) -> Result<Vec<Message>, AppError> {
        let limit = check_feed_limit(limit)? as usize;
        self.read(|t| {
            Tables::newest_first(
                t.messages.values().filter(|m| m.user_id == user_id),
                Some(limit),
            )
        })
    }

    async fn timeline(&mut self, user_id: UserId, limit: i64) -> Result<Vec<Message>, AppError> {
        let limit = check_feed_limit(limit)? as usize;
        self.read(|t| t.timeline(user_id, limit))
    }
}

#[async_trait]
impl CommentRepository for MemorySession {
    async fn insert_comment(&mut self, comment: &NewComment) -> Result<Comment, AppError> {
        let row = tables::comment_row(self.next_comment_id(), comment);
        self.write(Write::InsertComment(row.clone()), |t| t.insert_comment(row))
    }

    async fn find_comment(&mut self, id: CommentId) -> Result<Option<Comment>, AppError> {
        self.read(|t| t.comments.get(&id).cloned())
    }

    async fn delete_comment(&mut self, id: CommentId) -> Result<(), AppError> {
        self.write(Write::DeleteComment(id), |t| t.delete_comment(id))
    }

    async fn comments_for_message(&mut self, message_id: MessageId) -> Result<Vec<Comment>, AppError> {
        self.read(|t| {
            let mut comments: Vec<Comment> = t
                .comments
                .values()
                .filter(|c| c.message_id == message_id)
                .cloned()
                .collect();
            comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
            comments
        })
    }
}

#[async_trait]
impl LikeRepository for MemorySession {
    async fn insert_like(&mut self, like: Like) -> Result<Like, AppError> {
        self.write(Write::InsertLike(like), |t| t.insert_like(like))
    }

    async fn delete_like(&mut self, like: Like) -> Result<bool, AppError> {
        self.write(Write::DeleteLike(like), |t| Ok(t.likes.remove(&like)))
    }

    async fn like_exists(&mut self, like: Like) -> Result<bool, AppError> {
        self.read(|t| t.likes.contains(&like))
    }

    async fn likes_for_message(&mut self, message_id: MessageId) -> Result<Vec<Like>, AppError> {
        self.read(|t| {
            t.likes
                .iter()
                .filter(|l| l.message_id == message_id)
                .copied()
                .collect()
        })
    }

    async fn liked_messages(&mut self, user_id: UserId) -> Result<Vec<Message>, AppError> {
        self.read(|t| {
            Tables::newest_first(
                t.likes
                    .iter()
                    .filter(|l| l.user_id == user_id)
                    .filter_map(|l| t.messages.get(&l.message_id)),
                None,
            )
        })
    }
}

#[async_trait]
impl FollowRepository for MemorySession {
    async fn insert_follow(&mut self, follow: Follow) -> Result<Follow, AppError> {
        self.write(Write::InsertFollow(follow), |t| t.insert_follow(follow))
    }

    async fn delete_follow(&mut self, follow: Follow) -> Result<bool, AppError> {
        self.write(Write::DeleteFollow(follow), |t| Ok(t.follows.remove(&follow)))
    }

    async fn follows_involving(&mut self, user_id: UserId) -> Result<Vec<Follow>, AppError> {
        self.read(|t| {
            t.follows
                .iter()
                .filter(|f| f.follower_id == user_id || f.followee_id == user_id)
                .copied()
                .collect()
        })
    }

    async fn followers(&mut self, user_id: UserId) -> Result<Vec<User>, AppError> {
        self.read(|t| t.users_linked(|f| (f.followee_id == user_id).then_some(f.follower_id)))
    }

    async fn following(&mut self, user_id: UserId) -> Result<Vec<User>, AppError> {
        self.read(|t| t.users_linked(|f| (f.follower_id == user_id).then_some(f.followee_id)))
    }
}
