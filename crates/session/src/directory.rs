//! Tenant-directory collaborator contract.
//!
//! The facade signals "fetch tenants for customer X" on every customer switch
//! and on successful auto-initialization; the directory owns the actual
//! transport and caching. Only `Enabled` tenants are eligible for selection.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use scopegate_core::{CustomerId, TenantId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenantStatus {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSummary {
    pub id: TenantId,
    pub name: String,
    pub status: TenantStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPageRequest {
    pub customer_id: CustomerId,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantPage {
    pub items: Vec<TenantSummary>,
    pub meta: PageMeta,
}

impl TenantPage {
    /// Whether the given tenant appears on this page with `Enabled` status.
    pub fn is_eligible(&self, tenant_id: &TenantId) -> bool {
        self.items
            .iter()
            .any(|t| t.id == *tenant_id && t.status == TenantStatus::Enabled)
    }
}

/// Paginated tenant listing, keyed by customer.
///
/// Implementations own transport and caching; callers treat `fetch` as a
/// snapshot that may lag behind the directory of record.
pub trait TenantDirectory: Send + Sync {
    fn fetch(&self, request: &TenantPageRequest) -> TenantPage;
}

/// In-memory directory for tests and the demo server.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    tenants: Mutex<HashMap<CustomerId, Vec<TenantSummary>>>,
}

impl InMemoryTenantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, customer_id: CustomerId, tenant: TenantSummary) {
        self.tenants
            .lock()
            .unwrap()
            .entry(customer_id)
            .or_default()
            .push(tenant);
    }
}

impl TenantDirectory for InMemoryTenantDirectory {
    fn fetch(&self, request: &TenantPageRequest) -> TenantPage {
        let tenants = self.tenants.lock().unwrap();
        let all = tenants
            .get(&request.customer_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        // The trait is total over arbitrary requests; out-of-range pages
        // yield an empty page rather than overflowing.
        let page = request.page.max(1);
        let start = (page - 1).saturating_mul(request.page_size);
        let items = all
            .iter()
            .skip(start)
            .take(request.page_size)
            .cloned()
            .collect();

        TenantPage {
            items,
            meta: PageMeta {
                page,
                page_size: request.page_size,
                total: all.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(id: &str, status: TenantStatus) -> TenantSummary {
        TenantSummary {
            id: TenantId::new(id).unwrap(),
            name: id.to_string(),
            status,
        }
    }

    #[test]
    fn fetch_pages_and_reports_total() {
        let dir = InMemoryTenantDirectory::new();
        let customer = CustomerId::new("A").unwrap();
        for i in 0..5 {
            dir.insert(customer.clone(), tenant(&format!("T{i}"), TenantStatus::Enabled));
        }

        let page = dir.fetch(&TenantPageRequest {
            customer_id: customer.clone(),
            page: 2,
            page_size: 2,
        });

        assert_eq!(page.meta.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id.as_str(), "T2");
    }

    #[test]
    fn out_of_range_page_requests_yield_an_empty_page() {
        let dir = InMemoryTenantDirectory::new();
        let customer = CustomerId::new("A").unwrap();
        dir.insert(customer.clone(), tenant("T1", TenantStatus::Enabled));

        // Far past the data.
        let page = dir.fetch(&TenantPageRequest {
            customer_id: customer.clone(),
            page: 40,
            page_size: 25,
        });
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 1);

        // Adversarially large page numbers must not overflow the offset.
        let page = dir.fetch(&TenantPageRequest {
            customer_id: customer,
            page: usize::MAX,
            page_size: usize::MAX,
        });
        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 1);
    }

    #[test]
    fn unknown_customer_yields_empty_page() {
        let dir = InMemoryTenantDirectory::new();
        let page = dir.fetch(&TenantPageRequest {
            customer_id: CustomerId::new("ghost").unwrap(),
            page: 1,
            page_size: 10,
        });

        assert!(page.items.is_empty());
        assert_eq!(page.meta.total, 0);
    }

    #[test]
    fn eligibility_requires_enabled_status() {
        let page = TenantPage {
            items: vec![
                tenant("T1", TenantStatus::Enabled),
                tenant("T2", TenantStatus::Disabled),
            ],
            meta: PageMeta { page: 1, page_size: 10, total: 2 },
        };

        assert!(page.is_eligible(&TenantId::new("T1").unwrap()));
        assert!(!page.is_eligible(&TenantId::new("T2").unwrap()));
        assert!(!page.is_eligible(&TenantId::new("T3").unwrap()));
    }
}
