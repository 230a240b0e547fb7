//! Like relation tests

use pretty_assertions::assert_eq;

use warbler::domain::{Like, LikeRepository};
use warbler::infrastructure::database::Session;

use crate::common::{post, TestStore};

#[tokio::test]
async fn test_is_liked_by() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob", "carol"]).await;

    let mut session = t.session().await;
    let message = post(&mut session, &users[0], "hello").await;
    session
        .insert_like(Like::new(users[1].id, message.id))
        .await
        .unwrap();

    let likes = session.likes_for_message(message.id).await.unwrap();

    assert!(message.is_liked_by(&likes, users[1].id));
    assert!(!message.is_liked_by(&likes, users[2].id));
}

#[tokio::test]
async fn test_duplicate_like_conflicts() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;

    let mut session = t.session().await;
    let message = post(&mut session, &users[0], "hello").await;
    let like = Like::new(users[1].id, message.id);
    session.insert_like(like).await.unwrap();

    let err = session.insert_like(like).await.unwrap_err();

    assert!(err.is_unique_violation());
    assert_eq!(err.constraint(), Some(Like::PRIMARY_KEY));
}

#[tokio::test]
async fn test_toggle_like() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;

    let mut session = t.session().await;
    let message = post(&mut session, &users[0], "hello").await;
    let like = Like::new(users[1].id, message.id);

    assert!(session.toggle_like(like).await.unwrap());
    assert!(session.like_exists(like).await.unwrap());
    assert!(!session.toggle_like(like).await.unwrap());
    assert!(!session.like_exists(like).await.unwrap());
}

#[tokio::test]
async fn test_liked_messages_newest_first() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;

    let mut session = t.session().await;
    let first = post(&mut session, &users[0], "first").await;
    let second = post(&mut session, &users[0], "second").await;
    post(&mut session, &users[0], "ignored").await;
    session.insert_like(Like::new(users[1].id, first.id)).await.unwrap();
    session.insert_like(Like::new(users[1].id, second.id)).await.unwrap();
    session.commit().await.unwrap();

    let mut session = t.session().await;
    let liked: Vec<_> = session
        .liked_messages(users[1].id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(liked, vec![second.id, first.id]);
}
