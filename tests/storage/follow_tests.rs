//! Follow relation tests

use pretty_assertions::assert_eq;

use warbler::domain::{Follow, FollowRepository, UserRepository};
use warbler::infrastructure::database::Session;
use warbler::shared::error::AppError;

use crate::common::TestStore;

#[tokio::test]
async fn test_follow_predicates() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob", "carol"]).await;
    let (alice, bob, carol) = (&users[0], &users[1], &users[2]);

    let mut session = t.session().await;
    session.insert_follow(Follow::new(bob.id, alice.id)).await.unwrap();

    let alice_follows = session.follows_involving(alice.id).await.unwrap();
    let bob_follows = session.follows_involving(bob.id).await.unwrap();

    assert!(alice.is_followed_by(&alice_follows, bob));
    assert!(!alice.is_following(&alice_follows, bob));
    assert!(bob.is_following(&bob_follows, alice));
    assert!(!bob.is_followed_by(&bob_follows, alice));
    assert!(!alice.is_followed_by(&alice_follows, carol));
}

#[tokio::test]
async fn test_duplicate_follow_conflicts() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;

    let mut session = t.session().await;
    session
        .insert_follow(Follow::new(users[1].id, users[0].id))
        .await
        .unwrap();
    let err = session
        .insert_follow(Follow::new(users[1].id, users[0].id))
        .await
        .unwrap_err();

    assert_eq!(err.constraint(), Some(Follow::PRIMARY_KEY));
}

#[tokio::test]
async fn test_follow_of_missing_user_violates_foreign_key() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice"]).await;

    let mut session = t.session().await;
    let err = session
        .insert_follow(Follow::new(users[0].id, 9_999))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ForeignKeyViolation(ref c) if c == Follow::FOLLOWEE_FK));
}

#[tokio::test]
async fn test_self_follow_is_allowed() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice"]).await;
    let alice = &users[0];

    let mut session = t.session().await;
    let follow = session
        .insert_follow(Follow::new(alice.id, alice.id))
        .await
        .unwrap();
    let follows = session.follows_involving(alice.id).await.unwrap();

    assert!(follow.is_self_follow());
    assert!(alice.is_following(&follows, alice));
    assert!(alice.is_followed_by(&follows, alice));
}

#[tokio::test]
async fn test_followers_and_following_lists() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob", "carol"]).await;
    let (alice, bob, carol) = (&users[0], &users[1], &users[2]);

    let mut session = t.session().await;
    session.insert_follow(Follow::new(bob.id, alice.id)).await.unwrap();
    session.insert_follow(Follow::new(carol.id, alice.id)).await.unwrap();
    session.insert_follow(Follow::new(alice.id, carol.id)).await.unwrap();
    session.commit().await.unwrap();

    let mut session = t.session().await;
    let followers: Vec<_> = session
        .followers(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    let following: Vec<_> = session
        .following(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();

    assert_eq!(followers, vec!["bob", "carol"]);
    assert_eq!(following, vec!["carol"]);
}

#[tokio::test]
async fn test_unfollow() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;
    let follow = Follow::new(users[1].id, users[0].id);

    let mut session = t.session().await;
    session.insert_follow(follow).await.unwrap();

    assert!(session.delete_follow(follow).await.unwrap());
    assert!(!session.delete_follow(follow).await.unwrap());
    assert!(session.follows_involving(users[0].id).await.unwrap().is_empty());
    assert!(session.find_user(users[1].id).await.unwrap().is_some());
}
