use actix_web::{post, web};
use serde_json::{Value, json};
use watches::{CheckReport, WatchRegistry};

use crate::error::AppError;

macros_utils::routes! {
    route report_result,
}

/// Poller callback: overwrite the latest result of a watch
#[post("/results")]
pub async fn report_result(
    registry: web::Data<WatchRegistry>,
    body: web::Json<CheckReport>,
) -> Result<web::Json<Value>, AppError> {
    registry.apply_report(body.into_inner()).await?;
    Ok(web::Json(json!({ "ok": true })))
}
