mod common;

use common::{insert_account, insert_group, membership_rows, setup_store};
use membership_engine::{
    AccountRef, GroupRef, MembershipReader, MembershipType, MembershipWriter, RemovalOutcome,
};

#[tokio::test]
async fn test_remove_member_is_role_scoped() {
    let store = setup_store().await;
    let alice = insert_account(&store, "alice", "Alice", None).await;
    let staff = insert_group(&store, "staff").await;

    store.add_member(alice, staff).await.unwrap();
    store.add_admin(alice, staff).await.unwrap();

    assert!(store.remove_member(alice, staff).await.unwrap());

    // The admin row survives the member removal
    assert!(!store
        .is_member(&AccountRef::Id(alice), Some(&GroupRef::Id(staff)))
        .await
        .unwrap());
    assert!(store
        .is_admin(&AccountRef::Id(alice), Some(&GroupRef::Id(staff)))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_remove_absent_pair_returns_false() {
    let store = setup_store().await;
    let alice = insert_account(&store, "alice", "Alice", None).await;
    let staff = insert_group(&store, "staff").await;

    assert!(!store.remove_member(alice, staff).await.unwrap());
    assert!(!store.remove_admin(alice, staff).await.unwrap());
}

#[tokio::test]
async fn test_remove_all_account_memberships_covers_both_roles() {
    let store = setup_store().await;
    let alice = insert_account(&store, "alice", "Alice", None).await;
    let bob = insert_account(&store, "bob", "Bob", None).await;
    let staff = insert_group(&store, "staff").await;
    let ops = insert_group(&store, "ops").await;

    store.add_member(alice, staff).await.unwrap();
    store.add_admin(alice, staff).await.unwrap();
    store.add_member(alice, ops).await.unwrap();
    store.add_member(bob, staff).await.unwrap();

    assert!(store.remove_all_account_memberships(alice).await.unwrap());

    assert!(!store.is_member(&AccountRef::Id(alice), None).await.unwrap());
    assert!(!store.is_admin(&AccountRef::Id(alice), None).await.unwrap());
    // Other accounts untouched
    assert!(store.is_member(&AccountRef::Id(bob), None).await.unwrap());

    // Nothing left to remove on the second call
    assert!(!store.remove_all_account_memberships(alice).await.unwrap());
}

#[tokio::test]
async fn test_remove_all_group_members_covers_both_roles() {
    let store = setup_store().await;
    let alice = insert_account(&store, "alice", "Alice", None).await;
    let bob = insert_account(&store, "bob", "Bob", None).await;
    let staff = insert_group(&store, "staff").await;
    let ops = insert_group(&store, "ops").await;

    store.add_member(alice, staff).await.unwrap();
    store.add_admin(bob, staff).await.unwrap();
    store.add_member(bob, ops).await.unwrap();

    assert!(store.remove_all_group_members(staff).await.unwrap());

    assert!(store
        .get_group_members(Some(&GroupRef::Id(staff)))
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .get_group_admins(Some(&GroupRef::Id(staff)))
        .await
        .unwrap()
        .is_empty());
    assert!(store.is_member(&AccountRef::Id(bob), None).await.unwrap());

    assert!(!store.remove_all_group_members(staff).await.unwrap());
}

#[tokio::test]
async fn test_unfiltered_removal_is_refused() {
    let store = setup_store().await;
    let alice = insert_account(&store, "alice", "Alice", None).await;
    let staff = insert_group(&store, "staff").await;

    store.add_member(alice, staff).await.unwrap();
    store.add_admin(alice, staff).await.unwrap();

    // Neither account nor group: refused outright, even with a role filter
    let outcome = store
        .remove_memberships(None, None, Some(MembershipType::User))
        .await
        .unwrap();
    assert_eq!(outcome, RemovalOutcome::Refused);

    let outcome = store.remove_memberships(None, None, None).await.unwrap();
    assert_eq!(outcome, RemovalOutcome::Refused);

    // The table was never touched
    assert_eq!(membership_rows(&store).await, 2);
}

#[tokio::test]
async fn test_filtered_removal_outcomes() {
    let store = setup_store().await;
    let alice = insert_account(&store, "alice", "Alice", None).await;
    let staff = insert_group(&store, "staff").await;

    store.add_member(alice, staff).await.unwrap();

    let outcome = store
        .remove_memberships(Some(alice), None, None)
        .await
        .unwrap();
    assert_eq!(outcome, RemovalOutcome::Removed);

    let outcome = store
        .remove_memberships(None, Some(staff), None)
        .await
        .unwrap();
    assert_eq!(outcome, RemovalOutcome::NothingMatched);
}
