//! Validation of raw detection records into [`BrandAppearance`]s.

use serde_json::{Map, Value};
use sponsorlens_core::{
    BrandAppearance, ClassificationRules, Detection, PlacementContext, PlacementType, Prominence,
    SalvagedAppearance, SentimentContext, SponsorshipCategory, ViewerAttention,
};

use crate::classifier::{categorize_sponsorship_placement, is_valid_brand};
use crate::error::ValidationError;

const MIN_DESCRIPTION_CHARS: usize = 10;

/// Validates one raw detection record.
///
/// Pure function of its input: no repair is attempted here, so validating
/// the serialized form of an already-valid appearance yields an identical
/// value.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first offending field.
pub fn validate(raw: &Map<String, Value>) -> Result<BrandAppearance, ValidationError> {
    let brand = required_str(raw, "brand")?.trim().to_string();
    if brand.is_empty() {
        return Err(ValidationError::new("brand", "must be non-empty"));
    }

    let timeline = parse_timeline(raw.get("timeline"))?;
    if timeline[0] < 0.0 {
        return Err(ValidationError::new("timeline", "start must be >= 0"));
    }
    if timeline[1] <= timeline[0] {
        return Err(ValidationError::new(
            "timeline",
            "end time must be after start time",
        ));
    }

    let placement_type = label(raw, "type", PlacementType::from_label)?;
    let sponsorship_category =
        label(raw, "sponsorship_category", SponsorshipCategory::from_label)?;
    let location = parse_location(raw.get("location"))?;
    let prominence = label(raw, "prominence", Prominence::from_label)?;
    let context = label(raw, "context", PlacementContext::from_label)?;

    let description = required_str(raw, "description")?.to_string();
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::new(
            "description",
            format!("must be at least {MIN_DESCRIPTION_CHARS} characters"),
        ));
    }

    let sentiment_context = label(raw, "sentiment_context", SentimentContext::from_label)?;
    let viewer_attention = label(raw, "viewer_attention", ViewerAttention::from_label)?;

    Ok(BrandAppearance {
        timeline,
        brand,
        placement_type,
        sponsorship_category,
        location,
        prominence,
        context,
        description,
        sentiment_context,
        viewer_attention,
    })
}

/// Turns one raw record from the vision service into a [`Detection`].
///
/// Records whose brand fails [`is_valid_brand`] are dropped. A missing
/// `sponsorship_category` is filled in from the type and context. Records
/// that then fail validation are salvaged when they still carry a brand and
/// a two-number timeline; everything else is dropped.
#[must_use]
pub fn normalize_detection(raw: &Value, rules: &ClassificationRules) -> Option<Detection> {
    let Some(record) = raw.as_object() else {
        tracing::warn!(record = %raw, "dropping detection: not a JSON object");
        return None;
    };

    let brand = record
        .get("brand")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if brand.is_empty() {
        tracing::warn!("dropping detection without a brand name");
        return None;
    }
    if !is_valid_brand(brand, rules) {
        tracing::debug!(brand, "dropping detection: not a commercial brand");
        return None;
    }

    let mut record = record.clone();
    if !record
        .get("sponsorship_category")
        .is_some_and(Value::is_string)
    {
        let placement_type = record.get("type").and_then(Value::as_str).unwrap_or("");
        let context = record.get("context").and_then(Value::as_str).unwrap_or("");
        let category = categorize_sponsorship_placement(placement_type, context, rules);
        record.insert(
            "sponsorship_category".to_string(),
            Value::String(category.as_str().to_string()),
        );
    }

    match validate(&record) {
        Ok(appearance) => Some(Detection::Validated(appearance)),
        Err(err) => match parse_timeline(record.get("timeline")) {
            Ok(timeline) => {
                tracing::warn!(
                    brand,
                    field = err.field,
                    error = %err,
                    "detection failed validation; keeping raw record with fidelity warning"
                );
                Some(Detection::Salvaged(SalvagedAppearance::new(
                    brand.to_string(),
                    timeline,
                    err.to_string(),
                    record,
                )))
            }
            Err(_) => {
                tracing::warn!(brand, error = %err, "dropping detection without a usable timeline");
                None
            }
        },
    }
}

fn required_str<'a>(
    raw: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match raw.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ValidationError::new(field, "must be a string")),
        None => Err(ValidationError::new(field, "is required")),
    }
}

fn label<T>(
    raw: &Map<String, Value>,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    let value = required_str(raw, field)?;
    parse(value).ok_or_else(|| ValidationError::new(field, format!("unknown value '{value}'")))
}

/// Two numbers, no range checks.
fn parse_timeline(value: Option<&Value>) -> Result<[f64; 2], ValidationError> {
    let Some(Value::Array(items)) = value else {
        return Err(ValidationError::new(
            "timeline",
            "must be a [start, end] array",
        ));
    };
    match items.as_slice() {
        [start, end] => match (start.as_f64(), end.as_f64()) {
            (Some(start), Some(end)) => Ok([start, end]),
            _ => Err(ValidationError::new("timeline", "values must be numbers")),
        },
        _ => Err(ValidationError::new(
            "timeline",
            "must have exactly 2 elements",
        )),
    }
}

fn parse_location(value: Option<&Value>) -> Result<Option<[f64; 4]>, ValidationError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ValidationError::new(
                "location",
                "must be an [x, y, width, height] array",
            ))
        }
    };
    if items.len() != 4 {
        return Err(ValidationError::new(
            "location",
            "must have exactly 4 elements",
        ));
    }

    let mut location = [0.0; 4];
    for (slot, item) in location.iter_mut().zip(items) {
        let v = item
            .as_f64()
            .ok_or_else(|| ValidationError::new("location", "values must be numbers"))?;
        if !(0.0..=100.0).contains(&v) {
            return Err(ValidationError::new(
                "location",
                "values must be percentages between 0 and 100",
            ));
        }
        *slot = v;
    }
    Ok(Some(location))
}
