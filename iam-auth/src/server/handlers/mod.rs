pub mod groups;
pub mod health;
pub mod memberships;
pub mod policies;
pub mod sessions;
pub mod users;

use std::sync::Arc;

use salvo::prelude::*;

use crate::error::AppError;
use crate::store::Store;

pub(super) fn store(depot: &Depot) -> Arc<dyn Store> {
    depot.obtain::<Arc<dyn Store>>().unwrap().clone()
}

pub(super) fn pagination(req: &mut Request) -> (usize, Option<usize>) {
    let offset = req.query::<usize>("offset").unwrap_or(0);
    let limit = req.query::<usize>("limit");
    (offset, limit)
}

pub(super) async fn render_result<T: serde::Serialize>(
    res: &mut Response,
    result: Result<T, AppError>,
    req: &mut Request,
    depot: &mut Depot,
) {
    match result {
        Ok(body) => {
            res.status_code(StatusCode::OK);
            res.render(Json(body));
        }
        Err(err) => err.write(req, depot, res).await,
    }
}

pub(super) async fn render_unit_result(
    res: &mut Response,
    result: Result<(), AppError>,
    req: &mut Request,
    depot: &mut Depot,
) {
    match result {
        Ok(()) => res.status_code(StatusCode::NO_CONTENT),
        Err(err) => err.write(req, depot, res).await,
    }
}
