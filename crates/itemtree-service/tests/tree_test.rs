//! Move, descendant collection and children counts.

mod common;

use std::collections::HashSet;

use itemtree_core::error::ErrorKind;
use itemtree_core::types::{ItemId, StorageId};

use common::TestTree;

#[tokio::test]
async fn test_move_to_current_parent_is_a_noop() {
    let t = TestTree::new();
    let docs = t.dir("Docs", None).await;
    let file = t.file("a.txt", Some(docs.id)).await;

    let moved = t.tree.move_item(&t.ctx, file.id, Some(docs.id)).await.unwrap();
    assert_eq!(moved, file);
    assert_eq!(t.get(file.id).await.updated_at, file.updated_at);

    let root_file = t.file("b.txt", None).await;
    let moved = t.tree.move_item(&t.ctx, root_file.id, None).await.unwrap();
    assert_eq!(moved, root_file);
}

#[tokio::test]
async fn test_move_into_own_subtree_is_rejected() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", Some(a.id)).await;
    let c = t.dir("C", Some(b.id)).await;

    let err = t.tree.move_item(&t.ctx, a.id, Some(c.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    let err = t.tree.move_item(&t.ctx, a.id, Some(a.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);

    assert_eq!(t.get(a.id).await.parent_id, None);
}

#[tokio::test]
async fn test_move_validates_target() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let file = t.file("f.txt", None).await;
    let trashed = t.dir("Old", None).await;
    t.trash.soft_delete(&t.ctx, trashed.id).await.unwrap();
    let foreign = t.dir_in(StorageId::new(), "Elsewhere", None).await;

    let cases = [
        (ItemId::new(), ErrorKind::NotFound),
        (file.id, ErrorKind::InvalidArgument),
        (trashed.id, ErrorKind::InvalidState),
        (foreign.id, ErrorKind::Forbidden),
    ];
    for (target, kind) in cases {
        let err = t.tree.move_item(&t.ctx, a.id, Some(target)).await.unwrap_err();
        assert_eq!(err.kind, kind, "target {target}");
    }
}

#[tokio::test]
async fn test_move_rejects_missing_and_trashed_items() {
    let t = TestTree::new();
    let err = t.tree.move_item(&t.ctx, ItemId::new(), None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let dest = t.dir("Dest", None).await;
    let file = t.file("f.txt", None).await;
    t.trash.soft_delete(&t.ctx, file.id).await.unwrap();
    let err = t.tree.move_item(&t.ctx, file.id, Some(dest.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_move_reparents_and_lists() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", None).await;
    let file = t.file("f.txt", Some(a.id)).await;

    let moved = t.tree.move_item(&t.ctx, file.id, Some(b.id)).await.unwrap();
    assert_eq!(moved.parent_id, Some(b.id));
    assert!(t.names_under(Some(a.id)).await.is_empty());
    assert_eq!(t.names_under(Some(b.id)).await, vec!["f.txt"]);

    let moved = t.tree.move_item(&t.ctx, b.id, Some(a.id)).await.unwrap();
    assert_eq!(moved.parent_id, Some(a.id));
    let moved = t.tree.move_item(&t.ctx, b.id, None).await.unwrap();
    assert_eq!(moved.parent_id, None);
}

#[tokio::test]
async fn test_random_moves_keep_the_forest_acyclic() {
    let t = TestTree::new();
    let mut dirs = Vec::new();
    for i in 0..6 {
        let parent = dirs.last().copied();
        dirs.push(t.dir(&format!("d{i}"), parent).await.id);
    }

    // Deterministic pseudo-random sequence of (item, target) pairs.
    let mut seed = 7u64;
    for _ in 0..60 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let item = dirs[(seed >> 33) as usize % dirs.len()];
        let target = match (seed >> 17) % 7 {
            6 => None,
            n => Some(dirs[n as usize % dirs.len()]),
        };
        let _ = t.tree.move_item(&t.ctx, item, target).await;

        for &start in &dirs {
            let mut seen = HashSet::new();
            let mut current = Some(start);
            while let Some(id) = current {
                assert!(seen.insert(id), "cycle through {id}");
                current = t.get(id).await.parent_id;
            }
        }
    }
}

#[tokio::test]
async fn test_descendants_include_trashed_items() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", Some(a.id)).await;
    let c = t.file("c.txt", Some(b.id)).await;
    let d = t.file("d.txt", Some(a.id)).await;
    t.file("outside.txt", None).await;
    t.trash.soft_delete(&t.ctx, b.id).await.unwrap();

    let ids: HashSet<ItemId> = t
        .tree
        .get_children_ids_recursively(a.id)
        .await
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(ids, HashSet::from([b.id, c.id, d.id]));

    assert!(
        t.tree
            .get_children_ids_recursively(c.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_children_count_is_direct_and_live() {
    let t = TestTree::new();
    let a = t.dir("A", None).await;
    let b = t.dir("B", Some(a.id)).await;
    t.dir("C", Some(a.id)).await;
    t.file("x.txt", Some(a.id)).await;
    let gone = t.file("y.txt", Some(a.id)).await;
    t.file("nested.txt", Some(b.id)).await;
    t.trash.soft_delete(&t.ctx, gone.id).await.unwrap();

    let count = t.tree.get_children_count(a.id).await.unwrap();
    assert_eq!(count.total, 3);
    assert_eq!(count.folders, 2);
    assert_eq!(count.files, 1);
}
