//! Unit of work tests

use pretty_assertions::assert_eq;

use warbler::application::dto::SignupRequest;
use warbler::domain::{
    Like, LikeRepository, MessageRepository, NewMessage, User, UserProfileUpdate, UserRepository,
};
use warbler::infrastructure::database::{with_transaction, Session};
use warbler::shared::error::AppError;

use crate::common::{post, reload_user, TestStore};

#[tokio::test]
async fn test_with_transaction_commits_on_success() {
    let t = TestStore::new();
    let auth = t.auth.clone();

    let user = with_transaction(&t.store, |mut session| async move {
        let user = auth
            .signup(
                &mut session,
                SignupRequest::new("alice", "a@x.io", "pw123", None),
            )
            .await?;
        Ok::<_, AppError>((user, session))
    })
    .await
    .unwrap();

    let mut session = t.session().await;
    assert_eq!(reload_user(&mut session, &user).await, Some(user));
}

#[tokio::test]
async fn test_with_transaction_discards_on_error() {
    let t = TestStore::new();
    let auth = t.auth.clone();

    let result: Result<(), AppError> = with_transaction(&t.store, |mut session| async move {
        let user = auth
            .signup(
                &mut session,
                SignupRequest::new("alice", "a@x.io", "pw123", None),
            )
            .await?;
        session
            .insert_message(&NewMessage::new(user.id, "x".repeat(141)))
            .await?;
        Ok::<_, AppError>(((), session))
    })
    .await;

    assert!(matches!(result, Err(AppError::ConstraintViolation(_))));

    let mut session = t.session().await;
    assert!(session.find_user_by_username("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_constraint_violation_aborts_session() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice"]).await;
    let alice = &users[0];

    let mut session = t.session().await;
    let bob = t.signup(&mut session, "bob").await;
    let message = post(&mut session, alice, "hello").await;
    let like = Like::new(bob.id, message.id);
    session.insert_like(like).await.unwrap();

    let conflict = session.insert_like(like).await;
    assert!(matches!(conflict, Err(AppError::Conflict(_))));

    // Further statements fail and the commit publishes nothing.
    assert!(session.find_user(bob.id).await.is_err());
    session.commit().await.unwrap();

    let mut session = t.session().await;
    assert!(session.find_user_by_username("bob").await.unwrap().is_none());
    assert!(session.find_message(message.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_rename_to_taken_username_fails_at_commit() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;

    let mut session = t.session().await;
    session
        .update_user(
            users[1].id,
            &UserProfileUpdate {
                username: Some("alice".into()),
                ..Default::default()
            },
        )
        .await
        .expect("uniqueness is checked at commit");
    let err = session.commit().await.unwrap_err();

    assert_eq!(err.constraint(), Some(User::USERNAME_UNIQUE));

    let mut session = t.session().await;
    assert_eq!(
        reload_user(&mut session, &users[1]).await.map(|u| u.username),
        Some("bob".to_string())
    );
}

#[tokio::test]
async fn test_interleaved_commits_keep_each_other() {
    let t = TestStore::new();

    let mut first = t.session().await;
    let mut second = t.session().await;

    let alice = t.signup(&mut first, "alice").await;
    first.commit().await.unwrap();

    let bob = t.signup(&mut second, "bob").await;
    second.commit().await.unwrap();

    let mut session = t.session().await;
    assert_eq!(reload_user(&mut session, &alice).await, Some(alice));
    assert_eq!(reload_user(&mut session, &bob).await, Some(bob));
}

#[tokio::test]
async fn test_concurrent_signups_of_same_username() {
    let t = TestStore::new();

    let mut first = t.session().await;
    let mut second = t.session().await;

    let winner = t.signup(&mut first, "alice").await;
    t.signup(&mut second, "alice").await;

    first.commit().await.unwrap();
    let err = second.commit().await.unwrap_err();
    assert!(err.is_unique_violation());

    let mut session = t.session().await;
    let found = session.find_user_by_username("alice").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(winner.id));
    assert_eq!(session.search_users("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_commit_rechecks_foreign_keys_against_concurrent_deletes() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;
    let (alice, bob) = (&users[0], &users[1]);

    let mut setup = t.session().await;
    let message = post(&mut setup, alice, "hello").await;
    setup.commit().await.unwrap();

    let mut liker = t.session().await;
    let mut deleter = t.session().await;
    liker.insert_like(Like::new(bob.id, message.id)).await.unwrap();
    deleter.delete_message(message.id).await.unwrap();
    deleter.commit().await.unwrap();

    let err = liker.commit().await.unwrap_err();
    assert_eq!(err.constraint(), Some(Like::MESSAGE_FK));

    let mut session = t.session().await;
    assert!(session.find_message(message.id).await.unwrap().is_none());
    assert!(session.liked_messages(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_replayed_delete_of_already_deleted_row_is_a_no_op() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "bob"]).await;

    let mut first = t.session().await;
    let mut second = t.session().await;
    first.delete_user(users[0].id).await.unwrap();
    second.delete_user(users[0].id).await.unwrap();
    let carol = t.signup(&mut second, "carol").await;

    first.commit().await.unwrap();
    second.commit().await.unwrap();

    let mut session = t.session().await;
    assert!(reload_user(&mut session, &users[0]).await.is_none());
    assert!(reload_user(&mut session, &users[1]).await.is_some());
    assert!(reload_user(&mut session, &carol).await.is_some());
}

#[tokio::test]
async fn test_profile_update_and_search() {
    let t = TestStore::new();
    let users = t.committed_users(&["alice", "alicia", "bob"]).await;

    let mut session = t.session().await;
    let updated = session
        .update_user(
            users[2].id,
            &UserProfileUpdate {
                bio: Some("hi there".into()),
                location: Some("Lisbon".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    session.commit().await.unwrap();

    assert_eq!(updated.bio.as_deref(), Some("hi there"));
    assert_eq!(updated.username, "bob");

    let mut session = t.session().await;
    let names: Vec<_> = session
        .search_users("ali")
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, vec!["alice", "alicia"]);

    let missing = session
        .update_user(404, &UserProfileUpdate::default())
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_ids_are_not_reused_after_rollback() {
    let t = TestStore::new();

    let mut session = t.session().await;
    let discarded = t.signup(&mut session, "alice").await;
    session.rollback().await.unwrap();

    let mut session = t.session().await;
    let kept = t.signup(&mut session, "alice").await;

    assert!(kept.id > discarded.id);
}
