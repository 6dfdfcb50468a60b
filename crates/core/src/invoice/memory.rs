//! In-memory invoice store for unit tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use invoicer_shared::types::{PageRequest, ProductId};

use super::store::{InvoiceStore, InvoiceTransaction, StoreError};
use super::summary::{InvoiceTotals, summarize};
use super::types::{Invoice, InvoiceDraft, Product};

type Table = Arc<Mutex<BTreeMap<String, Invoice>>>;

fn lock(table: &Table) -> MutexGuard<'_, BTreeMap<String, Invoice>> {
    table.lock().unwrap()
}

/// Store backed by a shared map. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryStore {
    invoices: Table,
    fail_create_for: Option<String>,
    fail_lookups: bool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store whose transactions fail when inserting `invoice_no`.
    pub(crate) fn failing_create_for(invoice_no: &str) -> Self {
        Self {
            fail_create_for: Some(invoice_no.to_string()),
            ..Self::default()
        }
    }

    /// Store whose single-invoice lookups always fail.
    pub(crate) fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub(crate) fn seed(&self, draft: &InvoiceDraft) -> Invoice {
        let invoice = materialize(draft, None);
        lock(&self.invoices).insert(invoice.invoice_no.clone(), invoice.clone());
        invoice
    }

    pub(crate) fn invoice_nos(&self) -> Vec<String> {
        lock(&self.invoices).keys().cloned().collect()
    }

    pub(crate) fn get(&self, invoice_no: &str) -> Option<Invoice> {
        lock(&self.invoices).get(invoice_no).cloned()
    }
}

fn materialize(draft: &InvoiceDraft, existing: Option<&Invoice>) -> Invoice {
    let now = Utc::now();
    let created_at = existing.map_or(now, |i| i.created_at);
    Invoice {
        invoice_no: draft.invoice_no.clone(),
        date: draft.date,
        customer_name: draft.customer_name.clone(),
        salesperson_name: draft.salesperson_name.clone(),
        payment_type: draft.payment_type,
        notes: draft.notes.clone(),
        created_at,
        updated_at: now,
        products: draft
            .products
            .iter()
            .map(|p| Product {
                id: ProductId::new(),
                invoice_no: draft.invoice_no.clone(),
                item_name: p.item_name.clone(),
                quantity: p.quantity,
                unit_cost: p.unit_cost,
                unit_price: p.unit_price,
                created_at: now,
                updated_at: now,
            })
            .collect(),
    }
}

fn by_date(table: &BTreeMap<String, Invoice>, date: NaiveDate) -> Vec<Invoice> {
    let mut invoices: Vec<Invoice> = table.values().filter(|i| i.date == date).cloned().collect();
    invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    invoices
}

impl InvoiceStore for MemoryStore {
    type Transaction = MemoryTransaction;

    async fn find_by_invoice_no(&self, invoice_no: &str) -> Result<Option<Invoice>, StoreError> {
        if self.fail_lookups {
            return Err(StoreError::Database("connection reset".into()));
        }
        Ok(self.get(invoice_no))
    }

    async fn find_by_invoice_nos(&self, invoice_nos: &[String]) -> Result<Vec<Invoice>, StoreError> {
        let table = lock(&self.invoices);
        let mut invoices: Vec<Invoice> = invoice_nos
            .iter()
            .filter_map(|no| table.get(no).cloned())
            .collect();
        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(invoices)
    }

    async fn find_by_date(
        &self,
        date: NaiveDate,
        page: PageRequest,
    ) -> Result<(Vec<Invoice>, u64), StoreError> {
        let all = by_date(&lock(&self.invoices), date);
        let total = all.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok((all.into_iter().skip(offset).take(limit).collect(), total))
    }

    async fn summary_by_date(&self, date: NaiveDate) -> Result<InvoiceTotals, StoreError> {
        Ok(summarize(&by_date(&lock(&self.invoices), date)))
    }

    async fn begin(&self) -> Result<MemoryTransaction, StoreError> {
        Ok(MemoryTransaction {
            invoices: Arc::clone(&self.invoices),
            staged: Mutex::new(Vec::new()),
            fail_create_for: self.fail_create_for.clone(),
        })
    }
}

#[derive(Debug)]
enum Staged {
    Put(Invoice),
    Remove(String),
}

/// Buffers writes until commit; dropping it discards them.
#[derive(Debug)]
pub(crate) struct MemoryTransaction {
    invoices: Table,
    staged: Mutex<Vec<Staged>>,
    fail_create_for: Option<String>,
}

impl MemoryTransaction {
    fn lookup(&self, invoice_no: &str) -> Option<Invoice> {
        let staged = self.staged.lock().unwrap();
        for op in staged.iter().rev() {
            match op {
                Staged::Put(invoice) if invoice.invoice_no == invoice_no => {
                    return Some(invoice.clone());
                }
                Staged::Remove(no) if no == invoice_no => return None,
                _ => {}
            }
        }
        drop(staged);
        lock(&self.invoices).get(invoice_no).cloned()
    }

    fn stage(&self, op: Staged) {
        self.staged.lock().unwrap().push(op);
    }
}

impl InvoiceTransaction for MemoryTransaction {
    async fn find_by_invoice_no(&self, invoice_no: &str) -> Result<Option<Invoice>, StoreError> {
        Ok(self.lookup(invoice_no))
    }

    async fn create(&self, draft: &InvoiceDraft) -> Result<Invoice, StoreError> {
        if self.fail_create_for.as_deref() == Some(draft.invoice_no.as_str()) {
            return Err(StoreError::Database("insert failed".into()));
        }
        if self.lookup(&draft.invoice_no).is_some() {
            return Err(StoreError::Conflict(draft.invoice_no.clone()));
        }
        let invoice = materialize(draft, None);
        self.stage(Staged::Put(invoice.clone()));
        Ok(invoice)
    }

    async fn replace(&self, draft: &InvoiceDraft) -> Result<Invoice, StoreError> {
        let existing = self.lookup(&draft.invoice_no);
        let invoice = materialize(draft, existing.as_ref());
        self.stage(Staged::Put(invoice.clone()));
        Ok(invoice)
    }

    async fn delete(&self, invoice_no: &str) -> Result<bool, StoreError> {
        if self.lookup(invoice_no).is_none() {
            return Ok(false);
        }
        self.stage(Staged::Remove(invoice_no.to_string()));
        Ok(true)
    }

    async fn commit(self) -> Result<(), StoreError> {
        let staged = self.staged.into_inner().unwrap();
        let mut table = lock(&self.invoices);
        for op in staged {
            match op {
                Staged::Put(invoice) => {
                    table.insert(invoice.invoice_no.clone(), invoice);
                }
                Staged::Remove(no) => {
                    table.remove(&no);
                }
            }
        }
        Ok(())
    }
}
