//! Coupons and pass-through reference data.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use vitrine_commerce::cart::{validate_coupon, Coupon};
use vitrine_commerce::{CommerceError, Money};
use vitrine_data::Dataset;

use super::{list, object, HandlerResult};
use crate::request::RequestContext;
use crate::router::Services;

/// Fields on reference records that hold an image path.
const IMAGE_FIELDS: [&str; 4] = ["image", "logo", "avatar", "image_url"];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ValidateInput {
    code: Option<String>,
    #[serde(alias = "subtotal", alias = "total", alias = "orderAmount")]
    amount: Option<Money>,
}

/// `GET coupons`
pub(crate) async fn list_coupons(svc: &Services, _ctx: &RequestContext) -> HandlerResult {
    let coupons = svc
        .catalog
        .datasets()
        .get::<Coupon>(Dataset::Coupons.name())
        .await?;
    list("coupons", coupons.iter())
}

/// `POST coupons/validate` with `{code, amount}`
pub(crate) async fn validate(svc: &Services, ctx: &RequestContext) -> HandlerResult {
    let input: ValidateInput = ctx.body_as();
    let amount = input
        .amount
        .ok_or_else(|| CommerceError::Validation("amount is required".to_string()))?;
    let coupons = svc
        .catalog
        .datasets()
        .get::<Coupon>(Dataset::Coupons.name())
        .await?;

    let quote = validate_coupon(
        &coupons,
        input.code.as_deref().unwrap_or_default(),
        amount,
        Utc::now(),
    )?;
    object(&quote)
}

/// `GET clients` / `GET testimonials` / `GET banners`
///
/// Banners are filtered to active ones unless `all=true`.
pub(crate) async fn reference(svc: &Services, ctx: &RequestContext, dataset: Dataset) -> HandlerResult {
    let records = svc.catalog.datasets().get::<Value>(dataset.name()).await?;
    let include_inactive = dataset != Dataset::Banners || ctx.query_flag("all").unwrap_or(false);

    let records: Vec<Value> = records
        .iter()
        .filter(|r| include_inactive || is_active(r))
        .map(|r| with_display_urls(svc, r.clone()))
        .collect();
    list(dataset.name(), records)
}

/// Records without an activity flag count as active.
fn is_active(record: &Value) -> bool {
    ["is_active", "isActive", "active"]
        .iter()
        .find_map(|key| record.get(key).and_then(Value::as_bool))
        .unwrap_or(true)
}

fn with_display_urls(svc: &Services, mut record: Value) -> Value {
    if let Some(fields) = record.as_object_mut() {
        for key in IMAGE_FIELDS {
            let Some(path) = fields.get(key).and_then(Value::as_str) else {
                continue;
            };
            let url = svc.catalog.urls().build_display_url(path);
            fields.insert(key.to_string(), url.map_or(Value::Null, Value::String));
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_active() {
        assert!(is_active(&json!({"title": "Sale"})));
        assert!(!is_active(&json!({"isActive": false})));
        assert!(is_active(&json!({"is_active": true, "active": false})));
    }

    #[test]
    fn test_validate_input_aliases() {
        let input: ValidateInput =
            serde_json::from_value(json!({"code": "SAVE10", "subtotal": "120.50"})).unwrap();
        assert_eq!(input.amount, Some(Money::new(12050)));
    }
}
