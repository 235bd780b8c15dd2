//! Saved quotes: the record envelope and the stores that keep quote history.
//!
//! The rating engine never touches a store. Callers price a request, wrap the
//! result in a [`NewQuote`] and hand it to a [`QuoteStore`], which assigns the id.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::applicant::QuoteRequest;
use crate::error::StoreError;
use crate::rating::CalculationResult;
use crate::types::{Category, QuoteId};

/// A priced quote that has not been stored yet.
///
/// Serializes as `{type, data, result, timestamp, totalPrice}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    #[serde(flatten)]
    pub request: QuoteRequest,
    pub result: CalculationResult,
    pub timestamp: DateTime<Utc>,
    /// Monthly price at creation time.
    pub total_price: u64,
}

impl NewQuote {
    pub fn new(request: QuoteRequest, result: CalculationResult, timestamp: DateTime<Utc>) -> Self {
        NewQuote { total_price: result.monthly_price, request, result, timestamp }
    }

    pub fn category(&self) -> Category {
        self.request.category()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: QuoteId,
    #[serde(flatten)]
    pub quote: NewQuote,
}

impl QuoteRecord {
    pub fn category(&self) -> Category {
        self.quote.category()
    }
}

/// Shallow update: every `Some` field replaces the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotePatch {
    pub request: Option<QuoteRequest>,
    pub result: Option<CalculationResult>,
    pub timestamp: Option<DateTime<Utc>>,
    pub total_price: Option<u64>,
}

impl QuotePatch {
    fn apply(self, quote: &mut NewQuote) {
        if let Some(request) = self.request {
            quote.request = request;
        }
        if let Some(result) = self.result {
            quote.result = result;
        }
        if let Some(timestamp) = self.timestamp {
            quote.timestamp = timestamp;
        }
        if let Some(total_price) = self.total_price {
            quote.total_price = total_price;
        }
    }
}

/// Quote history keyed by store-assigned ids, kept in insertion order.
pub trait QuoteStore {
    fn save(&mut self, quote: NewQuote) -> Result<QuoteRecord, StoreError>;

    /// Save a batch in one write. Ids increase in input order; on error nothing
    /// from the batch is kept.
    fn save_all(&mut self, quotes: Vec<NewQuote>) -> Result<Vec<QuoteRecord>, StoreError>;

    fn all(&self) -> Result<Vec<QuoteRecord>, StoreError>;

    fn by_category(&self, category: Category) -> Result<Vec<QuoteRecord>, StoreError> {
        Ok(self.all()?.into_iter().filter(|q| q.category() == category).collect())
    }

    fn get(&self, id: &QuoteId) -> Result<Option<QuoteRecord>, StoreError> {
        Ok(self.all()?.into_iter().find(|q| &q.id == id))
    }

    fn update(&mut self, id: &QuoteId, patch: QuotePatch) -> Result<Option<QuoteRecord>, StoreError>;

    /// Returns whether a record was removed.
    fn delete(&mut self, id: &QuoteId) -> Result<bool, StoreError>;

    /// Returns how many records were removed.
    fn delete_by_category(&mut self, category: Category) -> Result<usize, StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Issues ids from the wall clock in epoch milliseconds, bumping past the last
/// id so two saves in the same millisecond still get distinct, increasing ids.
fn next_id(last: i64, now: DateTime<Utc>) -> i64 {
    now.timestamp_millis().max(last.saturating_add(1))
}

/// Wrap `quotes` into records with increasing ids after `last`. Returns the
/// records and the last id issued.
fn assign_ids(last: i64, quotes: Vec<NewQuote>, now: DateTime<Utc>) -> (Vec<QuoteRecord>, i64) {
    let mut last = last;
    let records = quotes
        .into_iter()
        .map(|quote| {
            last = next_id(last, now);
            QuoteRecord { id: QuoteId(last.to_string()), quote }
        })
        .collect();
    (records, last)
}

fn max_id(records: &[QuoteRecord]) -> i64 {
    records.iter().filter_map(|r| r.id.0.parse::<i64>().ok()).max().unwrap_or(0)
}

fn update_in(records: &mut [QuoteRecord], id: &QuoteId, patch: QuotePatch) -> Option<QuoteRecord> {
    let record = records.iter_mut().find(|r| &r.id == id)?;
    patch.apply(&mut record.quote);
    Some(record.clone())
}

fn remove_where(records: &mut Vec<QuoteRecord>, pred: impl Fn(&QuoteRecord) -> bool) -> usize {
    let before = records.len();
    records.retain(|r| !pred(r));
    before - records.len()
}

#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    records: Vec<QuoteRecord>,
    last_id: i64,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl QuoteStore for MemoryQuoteStore {
    fn save(&mut self, quote: NewQuote) -> Result<QuoteRecord, StoreError> {
        self.last_id = next_id(self.last_id, Utc::now());
        let record = QuoteRecord { id: QuoteId(self.last_id.to_string()), quote };
        self.records.push(record.clone());
        Ok(record)
    }

    fn save_all(&mut self, quotes: Vec<NewQuote>) -> Result<Vec<QuoteRecord>, StoreError> {
        let (records, last) = assign_ids(self.last_id, quotes, Utc::now());
        self.last_id = last;
        self.records.extend(records.iter().cloned());
        Ok(records)
    }

    fn all(&self) -> Result<Vec<QuoteRecord>, StoreError> {
        Ok(self.records.clone())
    }

    fn update(&mut self, id: &QuoteId, patch: QuotePatch) -> Result<Option<QuoteRecord>, StoreError> {
        Ok(update_in(&mut self.records, id, patch))
    }

    fn delete(&mut self, id: &QuoteId) -> Result<bool, StoreError> {
        Ok(remove_where(&mut self.records, |r| &r.id == id) > 0)
    }

    fn delete_by_category(&mut self, category: Category) -> Result<usize, StoreError> {
        Ok(remove_where(&mut self.records, |r| r.category() == category))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.records.clear();
        Ok(())
    }
}

/// Quote history kept as one JSON array in a file, re-read on every call.
///
/// A missing file is an empty history. A file that cannot be read or parsed is
/// logged and treated as empty; the next write replaces it.
#[derive(Debug, Clone)]
pub struct JsonFileQuoteStore {
    path: PathBuf,
}

impl JsonFileQuoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileQuoteStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Vec<QuoteRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read quotes; treating as empty");
                return Vec::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "corrupt quote file; treating as empty");
            Vec::new()
        })
    }

    fn persist(&self, records: &[QuoteRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec(records)?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

impl QuoteStore for JsonFileQuoteStore {
    fn save(&mut self, quote: NewQuote) -> Result<QuoteRecord, StoreError> {
        let mut records = self.load();
        let id = next_id(max_id(&records), Utc::now());
        let record = QuoteRecord { id: QuoteId(id.to_string()), quote };
        records.push(record.clone());
        self.persist(&records)?;
        tracing::debug!(id = %record.id, category = %record.category(), "saved quote");
        Ok(record)
    }

    fn save_all(&mut self, quotes: Vec<NewQuote>) -> Result<Vec<QuoteRecord>, StoreError> {
        let mut records = self.load();
        let (saved, _) = assign_ids(max_id(&records), quotes, Utc::now());
        records.extend(saved.iter().cloned());
        self.persist(&records)?;
        tracing::debug!(count = saved.len(), "saved quote batch");
        Ok(saved)
    }

    fn all(&self) -> Result<Vec<QuoteRecord>, StoreError> {
        Ok(self.load())
    }

    fn update(&mut self, id: &QuoteId, patch: QuotePatch) -> Result<Option<QuoteRecord>, StoreError> {
        let mut records = self.load();
        let updated = update_in(&mut records, id, patch);
        if updated.is_some() {
            self.persist(&records)?;
        }
        Ok(updated)
    }

    fn delete(&mut self, id: &QuoteId) -> Result<bool, StoreError> {
        let mut records = self.load();
        let removed = remove_where(&mut records, |r| &r.id == id);
        if removed > 0 {
            self.persist(&records)?;
        }
        Ok(removed > 0)
    }

    fn delete_by_category(&mut self, category: Category) -> Result<usize, StoreError> {
        let mut records = self.load();
        let removed = remove_where(&mut records, |r| r.category() == category);
        if removed > 0 {
            self.persist(&records)?;
        }
        Ok(removed)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io { path: self.path.display().to_string(), source: e }),
        }
    }
}
