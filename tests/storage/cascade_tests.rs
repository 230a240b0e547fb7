//! Cascade delete tests

use pretty_assertions::assert_eq;

use warbler::domain::{
    CommentRepository, Follow, FollowRepository, Like, LikeRepository, MessageRepository,
    NewComment, UserRepository,
};
use warbler::infrastructure::database::Session;
use warbler::shared::error::AppError;

use crate::common::{post, TestStore};

#[tokio::test]
async fn test_deleting_message_removes_likes_and_comments() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;
    let (alice, bob) = (&users[0], &users[1]);

    let mut session = t.session().await;
    let message = post(&mut session, alice, "hello").await;
    let comment = session
        .insert_comment(&NewComment::new(bob.id, message.id, "hi"))
        .await
        .unwrap();
    session.insert_like(Like::new(bob.id, message.id)).await.unwrap();
    session.commit().await.unwrap();

    let mut session = t.session().await;
    session.delete_message(message.id).await.unwrap();
    session.commit().await.unwrap();

    let mut session = t.session().await;
    assert!(session.find_message(message.id).await.unwrap().is_none());
    assert!(session.find_comment(comment.id).await.unwrap().is_none());
    assert!(session.likes_for_message(message.id).await.unwrap().is_empty());
    assert!(session.liked_messages(bob.id).await.unwrap().is_empty());
    assert!(session.find_user(bob.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_deleting_user_removes_everything_they_own() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;
    let (alice, bob) = (&users[0], &users[1]);

    let mut session = t.session().await;
    let alice_message = post(&mut session, alice, "alice's").await;
    let bob_message = post(&mut session, bob, "bob's").await;
    let alice_comment = session
        .insert_comment(&NewComment::new(alice.id, bob_message.id, "from alice"))
        .await
        .unwrap();
    let bob_comment = session
        .insert_comment(&NewComment::new(bob.id, alice_message.id, "on alice's"))
        .await
        .unwrap();
    session.insert_like(Like::new(alice.id, bob_message.id)).await.unwrap();
    session.insert_like(Like::new(bob.id, alice_message.id)).await.unwrap();
    session.insert_follow(Follow::new(alice.id, bob.id)).await.unwrap();
    session.insert_follow(Follow::new(bob.id, alice.id)).await.unwrap();
    session.commit().await.unwrap();

    let mut session = t.session().await;
    session.delete_user(alice.id).await.unwrap();
    session.commit().await.unwrap();

    let mut session = t.session().await;
    assert!(session.find_user(alice.id).await.unwrap().is_none());
    assert!(session.find_message(alice_message.id).await.unwrap().is_none());
    assert!(session.find_comment(alice_comment.id).await.unwrap().is_none());
    // Bob's comment hung off Alice's message.
    assert!(session.find_comment(bob_comment.id).await.unwrap().is_none());
    assert!(session.likes_for_message(bob_message.id).await.unwrap().is_empty());
    assert!(session.follows_involving(bob.id).await.unwrap().is_empty());

    assert!(session.find_message(bob_message.id).await.unwrap().is_some());
    assert_eq!(session.messages_by_user(bob.id, 100).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleting_absent_rows_is_not_found() {
    let t = TestStore::new();
    let mut session = t.session().await;

    assert!(matches!(
        session.delete_user(404).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        session.delete_message(404).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        session.delete_comment(404).await,
        Err(AppError::NotFound(_))
    ));

    // NotFound does not poison the session.
    t.signup(&mut session, "alice").await;
}
