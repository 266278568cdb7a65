use actix_web::{HttpResponse, get, post, web};
use watches::{NewWatch, Watch, WatchRegistry};

use crate::error::AppError;

macros_utils::routes! {
    route list_watches,
    route add_watch,
    route get_watch,
}

#[get("/watches")]
pub async fn list_watches(registry: web::Data<WatchRegistry>) -> Result<web::Json<Vec<Watch>>, AppError> {
    Ok(web::Json(registry.list_watches().await?))
}

#[post("/watches")]
pub async fn add_watch(
    registry: web::Data<WatchRegistry>,
    body: web::Json<NewWatch>,
) -> Result<HttpResponse, AppError> {
    let watch = registry.add_watch(&body.url, body.interval).await?;
    Ok(HttpResponse::Created().json(watch))
}

#[get("/watches/{id}")]
pub async fn get_watch(
    registry: web::Data<WatchRegistry>,
    id: web::Path<i64>,
) -> Result<web::Json<Watch>, AppError> {
    Ok(web::Json(registry.get_watch(id.into_inner()).await?))
}
