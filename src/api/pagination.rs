// src/api/pagination.rs
//! Offset pagination against a listing that declares its total up front.

use super::parser::parse_payload;
use super::types::{ListingPage, RawItem};
use super::{ListingTransport, QueryParams};
use crate::constants::{COUNT_KEY, OFFSET_KEY};
use crate::error::AppError;
use crate::metadata::normalize::normalize;
use crate::progress::ProgressObserver;
use crate::types::ValidationError;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// What to list and how to page through it.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    /// API method, e.g. `photos.get`.
    pub method: &'a str,
    /// Caller parameters; must not contain the offset or page-size keys.
    pub base_params: &'a QueryParams,
    pub page_size: u32,
    /// Name of the page-size request parameter. The declared total is
    /// always read from the reply's `count` field.
    pub count_key: &'a str,
    /// Progress unit, e.g. `photo`.
    pub unit: &'a str,
}

impl<'a> PageRequest<'a> {
    pub fn new(method: &'a str, base_params: &'a QueryParams, page_size: u32) -> Self {
        Self {
            method,
            base_params,
            page_size,
            count_key: COUNT_KEY,
            unit: "item",
        }
    }

    pub fn with_unit(self, unit: &'a str) -> Self {
        Self { unit, ..self }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.page_size == 0 {
            return Err(ValidationError::InvalidPageSize(self.page_size));
        }
        for reserved in [OFFSET_KEY, self.count_key] {
            if self.base_params.contains_key(reserved) {
                return Err(ValidationError::ReservedParameter(reserved.to_string()));
            }
        }
        Ok(())
    }

    fn page_params(&self, offset: u64) -> QueryParams {
        let mut params = self.base_params.clone();
        params.insert(self.count_key.to_string(), self.page_size.to_string());
        params.insert(OFFSET_KEY.to_string(), offset.to_string());
        params
    }
}

/// Fetches every item of an offset-paginated listing.
///
/// The first page (offset 0) doubles as the count probe: its declared
/// total `T` fixes how many items must arrive. Pages are requested at
/// offsets `0, page_size, 2 * page_size, ...` until at least `T` items
/// are held, and the result must contain exactly `T` of them. An empty
/// page before that point is [`AppError::IncompletePage`]; overshooting
/// is [`AppError::CountMismatch`]. Items come back id-normalized, in page
/// order.
///
/// Cancellation discards everything fetched so far.
pub async fn fetch_all_offsets<T>(
    transport: &T,
    request: &PageRequest<'_>,
    observer: &dyn ProgressObserver,
    cancel: &CancellationToken,
) -> Result<Vec<RawItem>, AppError>
where
    T: ListingTransport + ?Sized,
{
    request.validate()?;

    let mut items: Vec<Value> = Vec::new();
    let mut declared: Option<u64> = None;
    let mut offset = 0u64;

    loop {
        let params = request.page_params(offset);
        let payload = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("{} cancelled at offset {}", request.method, offset);
                return Err(AppError::Cancelled(request.method.to_string()));
            }
            payload = transport.call(request.method, &params) => payload?,
        };
        let page: ListingPage = parse_payload(request.method, payload)?;

        let total = *declared.get_or_insert_with(|| {
            log::debug!("{} declares {} items", request.method, page.count);
            page.count
        });
        if total == 0 {
            break;
        }

        if page.items.is_empty() {
            return Err(AppError::IncompletePage {
                endpoint: request.method.to_string(),
                offset,
                fetched: items.len() as u64,
                declared: total,
            });
        }

        items.extend(page.items);
        offset += u64::from(request.page_size);

        let fetched = items.len() as u64;
        observer.on_progress(request.unit, fetched.min(total), total);

        if fetched >= total {
            if fetched != total {
                return Err(AppError::CountMismatch {
                    endpoint: request.method.to_string(),
                    fetched,
                    declared: total,
                });
            }
            break;
        }
    }

    log::info!("{}: fetched {} items", request.method, items.len());

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(normalize(map)?),
            other => Err(AppError::MalformedResponse(format!(
                "{} returned a non-object item: {}",
                request.method, other
            ))),
        })
        .collect()
}
