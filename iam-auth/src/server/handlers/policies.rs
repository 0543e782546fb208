use salvo::prelude::*;

use crate::model::{CreatePolicy, Policy, PolicyIdentifier};

use super::{pagination, render_result, render_unit_result, store};

#[handler]
pub async fn list_policies(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let (offset, limit) = pagination(req);
    let result = async {
        let ids = store.list_policy_ids(offset, limit).await?;
        let mut policies = Vec::with_capacity(ids.len());
        for id in ids {
            policies.push(store.get_policy(&PolicyIdentifier::Id(id)).await?);
        }
        Ok::<Vec<Policy>, crate::error::AppError>(policies)
    }
    .await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn create_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let body: CreatePolicy = match req.parse_json().await {
        Ok(body) => body,
        Err(_) => {
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    };
    let result = store.create_policy(body).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn get_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let id = PolicyIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = store.get_policy(&id).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn update_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let id = PolicyIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let existing = match store.get_policy(&id).await {
        Ok(existing) => existing,
        Err(err) => {
            err.write(req, depot, res).await;
            return;
        }
    };
    let body: CreatePolicy = match req.parse_json().await {
        Ok(body) => body,
        Err(_) => {
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    };
    let policy = Policy::new(existing.pid, body);
    let result = store.update_policy(policy).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn delete_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let id = PolicyIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = store.delete_policy(&id).await;
    render_unit_result(res, result, req, depot).await;
}
