//! Soft-delete, restore and permanent deletion cascades.

mod common;

use itemtree_core::error::ErrorKind;
use itemtree_core::types::ItemId;
use itemtree_service::RestoreTarget;

use common::TestTree;

#[tokio::test]
async fn test_soft_delete_marks_whole_subtree() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", Some(a.id)).await;
    let c = t.file("c.txt", Some(b.id)).await;
    let d = t.file("d.txt", Some(a.id)).await;
    let other = t.file("other.txt", None).await;

    let marked = t.trash.soft_delete(&t.ctx, a.id).await.unwrap();
    assert_eq!(marked, 4);

    for id in [a.id, b.id, c.id, d.id] {
        assert!(t.get(id).await.is_trashed(), "{id} should be trashed");
    }
    assert!(t.get(other.id).await.is_live());
    assert_eq!(t.names_under(None).await, vec!["other.txt"]);

    let trash = t.query.get_trash_items(t.storage).await.unwrap();
    assert_eq!(trash.len(), 4);
}

#[tokio::test]
async fn test_restore_brings_back_whole_subtree() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", Some(a.id)).await;
    let c = t.file("c.txt", Some(b.id)).await;

    // A descendant trashed on its own earlier comes back too.
    t.trash.soft_delete(&t.ctx, c.id).await.unwrap();
    t.trash.soft_delete(&t.ctx, a.id).await.unwrap();

    let restored = t
        .trash
        .restore(&t.ctx, a.id, RestoreTarget::Original)
        .await
        .unwrap();
    assert!(restored.is_live());
    assert_eq!(restored.parent_id, None);

    for id in [a.id, b.id, c.id] {
        assert!(t.get(id).await.is_live(), "{id} should be live");
    }
    assert!(t.query.get_trash_items(t.storage).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_restore_into_trashed_original_parent_needs_new_parent() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let file = t.file("f.txt", Some(a.id)).await;
    let dest = t.dir("Dest", None).await;

    t.trash.soft_delete(&t.ctx, a.id).await.unwrap();

    let err = t
        .trash
        .restore(&t.ctx, file.id, RestoreTarget::Original)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert!(t.get(file.id).await.is_trashed());

    let restored = t
        .trash
        .restore(&t.ctx, file.id, RestoreTarget::Parent(Some(dest.id)))
        .await
        .unwrap();
    assert_eq!(restored.parent_id, Some(dest.id));
    assert_eq!(t.names_under(Some(dest.id)).await, vec!["f.txt"]);

    let root_file = t.file("g.txt", Some(a.id)).await;
    t.trash.soft_delete(&t.ctx, root_file.id).await.unwrap();
    let restored = t
        .trash
        .restore(&t.ctx, root_file.id, RestoreTarget::Parent(None))
        .await
        .unwrap();
    assert_eq!(restored.parent_id, None);
}

#[tokio::test]
async fn test_restore_to_explicit_parent_is_validated() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", Some(a.id)).await;
    let file = t.file("f.txt", None).await;
    t.trash.soft_delete(&t.ctx, a.id).await.unwrap();

    let err = t
        .trash
        .restore(&t.ctx, a.id, RestoreTarget::Parent(Some(file.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    // B is trashed along with A.
    let err = t
        .trash
        .restore(&t.ctx, a.id, RestoreTarget::Parent(Some(b.id)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);

    let err = t
        .trash
        .restore(&t.ctx, a.id, RestoreTarget::Parent(Some(ItemId::new())))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_permanent_removes_subtree() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", Some(a.id)).await;
    t.file("c.txt", Some(b.id)).await;
    t.file("keep.txt", None).await;

    let removed = t.trash.delete_permanent(&t.ctx, a.id).await.unwrap();
    assert_eq!(removed, 3);
    assert_eq!(t.store.len(), 1);

    let err = t
        .trash
        .restore(&t.ctx, a.id, RestoreTarget::Original)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = t.trash.delete_permanent(&t.ctx, a.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_soft_delete_missing_item() {
    let t = TestTree::new();
    let err = t.trash.soft_delete(&t.ctx, ItemId::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_empty_trash_only_touches_trashed_items() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    t.file("a1.txt", Some(a.id)).await;
    let loose = t.file("loose.txt", None).await;
    let keep = t.dir("Keep", None).await;
    t.file("k.txt", Some(keep.id)).await;
    let foreign = t.dir_in(itemtree_core::types::StorageId::new(), "Foreign", None).await;

    t.trash.soft_delete(&t.ctx, a.id).await.unwrap();
    t.trash.soft_delete(&t.ctx, loose.id).await.unwrap();
    t.trash.soft_delete(&t.ctx, foreign.id).await.unwrap();

    let removed = t.trash.empty_trash(&t.ctx, t.storage).await.unwrap();
    assert_eq!(removed, 3);
    assert!(t.query.get_trash_items(t.storage).await.unwrap().is_empty());
    assert_eq!(t.names_under(Some(keep.id)).await, vec!["k.txt"]);
    assert!(t.get(foreign.id).await.is_trashed());

    assert_eq!(t.trash.empty_trash(&t.ctx, t.storage).await.unwrap(), 0);
}
