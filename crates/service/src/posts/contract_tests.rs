//! Behaviour every `PostStorage` backend must share, run against each of them.

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;

use super::*;
use crate::test_support::{post, sqlite_db};

type Store = Arc<dyn PostStorage>;

async fn memory() -> anyhow::Result<Store> {
    Ok(Arc::new(InMemoryPostStorage::new()))
}

async fn seaorm() -> anyhow::Result<Store> {
    Ok(Arc::new(SeaOrmPostStorage::new(sqlite_db().await?)))
}

fn moka() -> Arc<dyn PostCache> {
    Arc::new(MokaPostCache::new(Duration::from_secs(60), 1024))
}

async fn cached_memory() -> anyhow::Result<Store> {
    Ok(Arc::new(CachedPostStorage::new(memory().await?, moka())))
}

async fn cached_seaorm() -> anyhow::Result<Store> {
    Ok(Arc::new(CachedPostStorage::new(seaorm().await?, moka())))
}

fn ids(page: &UserPosts) -> Vec<&str> {
    page.posts.iter().map(|p| p.id.as_str()).collect()
}

async fn check_round_trip(store: Store) -> anyhow::Result<()> {
    let p = post("rt-1", "ann", "Hola, guapo");
    store.add(p.clone()).await?;
    assert_eq!(store.get("rt-1").await?, p);
    // second read may come from a cache
    assert_eq!(store.get("rt-1").await?, p);
    Ok(())
}

async fn check_collision(store: Store) -> anyhow::Result<()> {
    let original = post("dup", "ann", "first");
    store.add(original.clone()).await?;

    let err = store.add(post("dup", "bob", "second")).await.unwrap_err();
    assert!(matches!(err, StorageError::Collision), "got {err:?}");
    assert_eq!(store.get("dup").await?, original);
    assert!(store.get_by_author("bob", None, 10).await?.posts.is_empty());
    Ok(())
}

async fn check_not_found(store: Store) -> anyhow::Result<()> {
    let err = store.get("funnypostname").await.unwrap_err();
    assert!(matches!(err, StorageError::PostNotFound), "got {err:?}");
    Ok(())
}

async fn check_documented_example(store: Store) -> anyhow::Result<()> {
    store.add(post("1", "u", "hi")).await?;
    store.add(post("2", "u", "yo")).await?;

    let first = store.get_by_author("u", None, 1).await?;
    assert_eq!(ids(&first), ["2"]);
    assert_eq!(first.next_page.as_deref(), Some("1"));

    let second = store.get_by_author("u", Some("1"), 1).await?;
    assert_eq!(ids(&second), ["1"]);
    assert_eq!(second.next_page, None);
    Ok(())
}

async fn walk(store: &Store, author: &str, size: usize) -> anyhow::Result<(Vec<String>, usize)> {
    let mut seen = Vec::new();
    let mut pages = 0;
    let mut token: Option<String> = None;
    loop {
        let page = store.get_by_author(author, token.as_deref(), size).await?;
        assert!(page.posts.len() <= size);
        assert!(page.posts.iter().all(|p| p.author_id == author));
        pages += 1;
        seen.extend(page.posts.into_iter().map(|p| p.id));
        match page.next_page {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok((seen, pages))
}

async fn check_pagination_walk(store: Store) -> anyhow::Result<()> {
    for i in 1..=7 {
        store.add(post(&format!("post-{i:02}"), "walker", "w")).await?;
        // interleave another author's history
        store.add(post(&format!("post-{i:02}-x"), "other", "o")).await?;
    }
    let expected: Vec<String> = (1..=7).rev().map(|i| format!("post-{i:02}")).collect();

    for size in [1, 2, 3, 7, 10] {
        let (seen, pages) = walk(&store, "walker", size).await?;
        assert_eq!(seen, expected, "page size {size}");
        assert_eq!(pages, 7usize.div_ceil(size), "page size {size}");
    }
    Ok(())
}

async fn check_exact_multiple_has_no_trailing_empty_page(store: Store) -> anyhow::Result<()> {
    for i in 1..=6 {
        store.add(post(&format!("m{i}"), "ann", "x")).await?;
    }
    let first = store.get_by_author("ann", None, 3).await?;
    assert_eq!(ids(&first), ["m6", "m5", "m4"]);
    let token = first.next_page.expect("more posts");
    let second = store.get_by_author("ann", Some(&token), 3).await?;
    assert_eq!(ids(&second), ["m3", "m2", "m1"]);
    assert_eq!(second.next_page, None);
    Ok(())
}

async fn check_token_validity(store: Store) -> anyhow::Result<()> {
    store.add(post("a1", "alice", "x")).await?;
    store.add(post("a2", "alice", "x")).await?;
    store.add(post("b1", "bruno", "y")).await?;

    let alice = store.get_by_author("alice", None, 1).await?;
    let token = alice.next_page.expect("alice has a second page");

    let err = store.get_by_author("bruno", Some(&token), 1).await.unwrap_err();
    assert!(matches!(err, StorageError::WrongAuthor), "got {err:?}");

    let err = store.get_by_author("alice", Some("no-such-post"), 1).await.unwrap_err();
    assert!(matches!(err, StorageError::WrongPage), "got {err:?}");
    Ok(())
}

async fn check_empty_author_asymmetry(store: Store) -> anyhow::Result<()> {
    store.add(post("s1", "someone", "x")).await?;

    let page = store.get_by_author("nobody", None, 10).await?;
    assert!(page.posts.is_empty());
    assert_eq!(page.next_page, None);

    for token in ["whatever", "s1"] {
        let err = store.get_by_author("nobody", Some(token), 10).await.unwrap_err();
        assert!(matches!(err, StorageError::UserNotFound), "token {token}: got {err:?}");
    }
    Ok(())
}

async fn check_patch(store: Store) -> anyhow::Result<()> {
    let original = post("pt", "ann", "before");
    store.add(original.clone()).await?;
    store.get("pt").await?;

    let edited_at = original.created_at + ChronoDuration::minutes(3);
    let mut edit = original.edited("after", edited_at);
    edit.author_id = "intruder".into();
    edit.created_at = edited_at;
    store.patch(edit).await?;

    let seen = store.get("pt").await?;
    assert_eq!(seen.text, "after");
    assert_eq!(seen.last_modified_at, edited_at);
    assert_eq!(seen.id, original.id);
    assert_eq!(seen.author_id, original.author_id);
    assert_eq!(seen.created_at, original.created_at);

    let listed = store.get_by_author("ann", None, 10).await?;
    assert_eq!(listed.posts, vec![seen]);
    Ok(())
}

async fn check_patch_unknown_post(store: Store) -> anyhow::Result<()> {
    let err = store.patch(post("ghost", "ann", "boo")).await.unwrap_err();
    assert!(matches!(err, StorageError::PostNotFound), "got {err:?}");
    assert!(matches!(store.get("ghost").await, Err(StorageError::PostNotFound)));
    Ok(())
}

async fn check_concurrent_adds(store: Store) -> anyhow::Result<()> {
    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.add(post(&format!("c{i:02}"), "crowd", "hi")).await
        }));
    }
    for h in handles {
        h.await??;
    }

    let (seen, pages) = walk(&store, "crowd", 6).await?;
    assert_eq!(pages, 4);
    let expected: Vec<String> = (0..20).rev().map(|i| format!("c{i:02}")).collect();
    assert_eq!(seen, expected);
    Ok(())
}

async fn check_listing_follows_id_not_arrival(store: Store) -> anyhow::Result<()> {
    store.add(post("id-2", "u", "second")).await?;
    store.add(post("id-4", "u", "fourth")).await?;
    store.add(post("id-1", "u", "first")).await?;
    store.add(post("id-3", "u", "third")).await?;

    let all = store.get_by_author("u", None, 10).await?;
    assert_eq!(ids(&all), ["id-4", "id-3", "id-2", "id-1"]);

    let first = store.get_by_author("u", None, 1).await?;
    assert_eq!(first.next_page.as_deref(), Some("id-3"));
    store.add(post("id-0", "u", "zeroth")).await?;
    let (seen, _) = walk(&store, "u", 2).await?;
    assert_eq!(seen, ["id-4", "id-3", "id-2", "id-1", "id-0"]);
    Ok(())
}

macro_rules! contract_suite {
    ($backend:ident) => {
        mod $backend {
            use super::*;

            #[tokio::test]
            async fn round_trip() -> anyhow::Result<()> {
                check_round_trip(super::$backend().await?).await
            }

            #[tokio::test]
            async fn collision() -> anyhow::Result<()> {
                check_collision(super::$backend().await?).await
            }

            #[tokio::test]
            async fn not_found() -> anyhow::Result<()> {
                check_not_found(super::$backend().await?).await
            }

            #[tokio::test]
            async fn documented_example() -> anyhow::Result<()> {
                check_documented_example(super::$backend().await?).await
            }

            #[tokio::test]
            async fn pagination_walk() -> anyhow::Result<()> {
                check_pagination_walk(super::$backend().await?).await
            }

            #[tokio::test]
            async fn exact_multiple_page() -> anyhow::Result<()> {
                check_exact_multiple_has_no_trailing_empty_page(super::$backend().await?).await
            }

            #[tokio::test]
            async fn token_validity() -> anyhow::Result<()> {
                check_token_validity(super::$backend().await?).await
            }

            #[tokio::test]
            async fn empty_author_asymmetry() -> anyhow::Result<()> {
                check_empty_author_asymmetry(super::$backend().await?).await
            }

            #[tokio::test]
            async fn patch() -> anyhow::Result<()> {
                check_patch(super::$backend().await?).await
            }

            #[tokio::test]
            async fn patch_unknown_post() -> anyhow::Result<()> {
                check_patch_unknown_post(super::$backend().await?).await
            }

            #[tokio::test]
            async fn listing_follows_id_not_arrival() -> anyhow::Result<()> {
                check_listing_follows_id_not_arrival(super::$backend().await?).await
            }

            #[tokio::test]
            async fn concurrent_adds() -> anyhow::Result<()> {
                check_concurrent_adds(super::$backend().await?).await
            }
        }
    };
}

contract_suite!(memory);
contract_suite!(seaorm);
contract_suite!(cached_memory);
contract_suite!(cached_seaorm);
