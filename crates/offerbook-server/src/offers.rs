//! The offers handlers: list, lookup by date, and create.
//!
//! Create runs the pipeline in a fixed order: attachment extraction,
//! default-name augmentation, numeric coercion, validation, then coordinate
//! derivation. Validation never short-circuits; an invalid record fails
//! with the full error set.

use bytes::Bytes;
use http::Response;
use serde::Deserialize;
use serde_json::Value;

use offerbook_core::{coerce, geo, names, validate};
use offerbook_core::{ApiError, OfferDraft, OfferStore, DEFAULT_MAX_QUANTITY};

use crate::context::RequestParts;
use crate::extract::{
    ExtractionError, Field, FromRequest, Json, Multipart, MultipartConfig, Query, UploadPolicy,
};
use crate::response::JsonResponse;

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    skip: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

/// `GET /api/offers`: returns the fixture slice `[skip, skip + limit)`.
///
/// Parsing is lenient: a value that is not an integer falls back to its
/// default (skip 0, limit [`DEFAULT_MAX_QUANTITY`]). Negative values and
/// `skip > limit` are a not-found failure.
pub async fn list(store: &OfferStore, parts: &RequestParts) -> Result<Response<Bytes>, ApiError> {
    let Query(page) = Query::<PageQuery>::from_request(parts)?;

    let skip = parse_or_default(page.skip.as_deref(), 0);
    let limit = parse_or_default(page.limit.as_deref(), DEFAULT_MAX_QUANTITY as i64);

    if skip < 0 || limit < 0 || skip > limit {
        return Err(ApiError::not_found("invalid query parameters"));
    }

    let offers = store.page(skip as usize, limit as usize);
    tracing::debug!(skip, limit, returned = offers.len(), "listing offers");
    Ok(JsonResponse::new(offers).into_response())
}

fn parse_or_default(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(default)
}

/// `GET /api/offers/{date}`: returns the first offer with the given date.
pub async fn get_by_date(
    store: &OfferStore,
    parts: &RequestParts,
) -> Result<Response<Bytes>, ApiError> {
    let raw = parts
        .params()
        .get("date")
        .ok_or_else(|| ApiError::illegal_argument("no date provided"))?;
    let date: i64 = raw
        .parse()
        .map_err(|_| ApiError::illegal_argument("the format of the date is incorrect"))?;

    let offer = store
        .find_by_date(date)
        .ok_or_else(|| ApiError::not_found(format!("no offer with the date {date} was found")))?;

    Ok(JsonResponse::new(offer).into_response())
}

/// `POST /api/offers`: validates a submitted offer and echoes the derived
/// record. Nothing is persisted into the fixture.
pub async fn create(parts: &RequestParts) -> Result<Response<Bytes>, ApiError> {
    let mut draft = extract_draft(parts).await?;

    names::assign_default_name(&mut draft);
    coerce::cast_to_number(&mut draft, coerce::NUMERIC_FIELDS);

    let errors = validate::validate(&draft);
    if !errors.is_empty() {
        tracing::debug!(fields = errors.len(), "offer rejected by validation");
        return Err(ApiError::validation_with_fields(
            "offer failed validation",
            errors,
        ));
    }

    let location = geo::locate(draft.address_text().unwrap_or_default());
    let submission = draft.into_submission(location)?;
    Ok(JsonResponse::new(submission).into_response())
}

async fn extract_draft(parts: &RequestParts) -> Result<OfferDraft, ApiError> {
    if is_multipart(parts) {
        return draft_from_multipart(parts).await;
    }
    if parts.body().is_empty() {
        // An empty body validates as an all-absent record, so the caller
        // gets the complete required-field error set.
        return Ok(OfferDraft::default());
    }
    let Json(draft) = Json::<OfferDraft>::from_request(parts)?;
    Ok(draft)
}

fn is_multipart(parts: &RequestParts) -> bool {
    parts
        .content_type()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

async fn draft_from_multipart(parts: &RequestParts) -> Result<OfferDraft, ApiError> {
    let mut multipart = Multipart::from_parts(
        parts.headers(),
        parts.body().clone(),
        MultipartConfig::default(),
    )?;
    let policy = UploadPolicy::images();
    let mut draft = OfferDraft::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                attach_file(&mut draft, &policy, &field, &name, file_name)?;
            }
            None => {
                let text = field.text().await?;
                // Unknown text fields are dropped; the draft carries only
                // the fields the rule table knows.
                draft.set(&name, Value::String(text));
            }
        }
    }

    Ok(draft)
}

fn attach_file(
    draft: &mut OfferDraft,
    policy: &UploadPolicy,
    field: &Field,
    name: &str,
    file_name: String,
) -> Result<(), ApiError> {
    if !policy.accepts_slot(name) {
        return Err(ExtractionError::upload_rejected(name, "unknown file slot").into());
    }
    if !policy.accepts_file(field) {
        return Err(ExtractionError::upload_rejected(
            name,
            "file uploads only support jpeg, jpg and png",
        )
        .into());
    }

    let slot = if name == "avatar" {
        &mut draft.avatar
    } else {
        &mut draft.preview
    };
    if slot.is_some() {
        return Err(ExtractionError::upload_rejected(name, "at most one file per slot").into());
    }
    *slot = Some(file_name);
    Ok(())
}
