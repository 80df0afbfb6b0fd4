// crates/sirsi-store/tests/registry_props.rs
//
// Contract tests for the generic in-memory registry: create/get fidelity,
// NotFound on unknown ids, uniqueness under concurrent creates, and cursor
// pagination stability.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use sirsi_core::error::AdminError;
use sirsi_core::estate::{Estate, EstateDraft, EstateFilter, EstatePatch, EstatePhase};
use sirsi_core::pagination::PageRequest;
use sirsi_core::tenant::{Tenant, TenantDraft};
use sirsi_core::traits::Registry;
use sirsi_core::user::{User, UserDraft, UserRole};
use sirsi_store::MemoryRegistry;

fn estate_draft(i: usize) -> EstateDraft {
    EstateDraft {
        name: format!("Estate {}", i),
        owner_email: format!("owner{}@sirsi.ai", i),
        phase: if i % 2 == 0 {
            Some(EstatePhase::Funding)
        } else {
            None
        },
    }
}

#[tokio::test]
async fn test_create_then_get_returns_draft_plus_defaults() {
    let reg = MemoryRegistry::<Estate>::new();
    let draft = EstateDraft {
        name: "Crystal Peak Manor".to_string(),
        owner_email: "bob@builder.com".to_string(),
        phase: None,
    };

    let created = reg.create(draft.clone()).await.unwrap();
    let fetched = reg.get(&created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, draft.name);
    assert_eq!(fetched.owner_email, draft.owner_email);
    assert_eq!(fetched.phase, EstatePhase::Planning);
}

#[tokio::test]
async fn test_unknown_id_is_not_found_everywhere() {
    let reg = MemoryRegistry::<Estate>::new();
    reg.create(estate_draft(1)).await.unwrap();
    let ghost = Uuid::now_v7();

    assert!(matches!(reg.get(&ghost).await, Err(AdminError::NotFound(_))));
    assert!(matches!(
        reg.update(&ghost, EstatePatch::default()).await,
        Err(AdminError::NotFound(_))
    ));
    assert!(matches!(reg.delete(&ghost).await, Err(AdminError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let reg = MemoryRegistry::<Estate>::new();
    let e = reg.create(estate_draft(1)).await.unwrap();
    reg.delete(&e.id).await.unwrap();
    assert!(matches!(reg.get(&e.id).await, Err(AdminError::NotFound(_))));
    assert!(matches!(reg.delete(&e.id).await, Err(AdminError::NotFound(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_slug_has_one_winner() {
    for round in 0..20 {
        let reg = Arc::new(MemoryRegistry::<Tenant>::new());
        let slug = format!("race-{}", round);

        let handles: Vec<_> = (0..2)
            .map(|i| {
                let reg = reg.clone();
                let slug = slug.clone();
                tokio::spawn(async move {
                    reg.create(TenantDraft {
                        name: format!("Racer {}", i),
                        slug,
                        description: String::new(),
                    })
                    .await
                })
            })
            .collect();

        let mut ok = 0;
        let mut rejected = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(AdminError::Validation(_)) => rejected += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
        assert_eq!((ok, rejected), (1, 1));
        assert_eq!(reg.len().unwrap(), 1);
    }
}

#[tokio::test]
async fn test_email_uniqueness_is_case_insensitive() {
    let reg = MemoryRegistry::<User>::new();
    reg.create(UserDraft {
        email: "cylton@sirsi.ai".to_string(),
        name: "Cylton".to_string(),
        role: Some(UserRole::Admin),
    })
    .await
    .unwrap();

    let err = reg
        .create(UserDraft {
            email: "CYLTON@sirsi.ai".to_string(),
            name: "Impostor".to_string(),
            role: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
}

#[tokio::test]
async fn test_page_size_one_walks_every_item_once() {
    let reg = MemoryRegistry::<Estate>::new();
    let n = 7;
    let mut created = Vec::new();
    for i in 0..n {
        created.push(reg.create(estate_draft(i)).await.unwrap().id);
    }

    let filter = EstateFilter::default();
    let mut request = PageRequest::first(1);
    let mut seen = Vec::new();
    let mut calls = 0;
    loop {
        let page = reg.list(&filter, &request).await.unwrap();
        calls += 1;
        assert_eq!(page.total_count, n as u64);
        assert!(page.items.len() <= 1);
        seen.extend(page.items.iter().map(|e| e.id));
        match page.next_page_token {
            Some(token) => request = PageRequest::after(token, 1),
            None => break,
        }
    }

    assert_eq!(calls, n);
    assert_eq!(seen, created);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), n);
}

#[tokio::test]
async fn test_appends_do_not_shift_issued_pages() {
    let reg = MemoryRegistry::<Estate>::new();
    for i in 0..4 {
        reg.create(estate_draft(i)).await.unwrap();
    }
    let filter = EstateFilter::default();
    let first = reg.list(&filter, &PageRequest::first(2)).await.unwrap();
    let token = first.next_page_token.clone().unwrap();

    // New items appended between calls land after everything already paged.
    let late = reg.create(estate_draft(99)).await.unwrap();
    let mut rest = Vec::new();
    let mut request = PageRequest::after(token, 2);
    loop {
        let page = reg.list(&filter, &request).await.unwrap();
        rest.extend(page.items.iter().map(|e| e.id));
        match page.next_page_token {
            Some(t) => request = PageRequest::after(t, 2),
            None => break,
        }
    }

    let first_ids: Vec<_> = first.items.iter().map(|e| e.id).collect();
    assert!(first_ids.iter().all(|id| !rest.contains(id)));
    assert_eq!(rest.len(), 3);
    assert_eq!(rest.last(), Some(&late.id));
}

#[tokio::test]
async fn test_filtered_listing_counts_matches_only() {
    let reg = MemoryRegistry::<Estate>::new();
    for i in 0..6 {
        reg.create(estate_draft(i)).await.unwrap();
    }
    let filter = EstateFilter {
        phase: Some(EstatePhase::Funding),
        ..Default::default()
    };
    let page = reg.list(&filter, &PageRequest::default()).await.unwrap();
    assert_eq!(page.total_count, 3);
    assert!(page.items.iter().all(|e| e.phase == EstatePhase::Funding));
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn test_malformed_token_is_validation_error() {
    let reg = MemoryRegistry::<Estate>::new();
    let err = reg
        .list(&EstateFilter::default(), &PageRequest::after("garbage", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));
}
