use salvo::prelude::*;

use crate::model::{CreateUser, PolicyIdentifier, UserIdentifier};

use super::{pagination, render_result, render_unit_result, store};

#[handler]
pub async fn list_users(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let (offset, limit) = pagination(req);
    let result = store.list_users(offset, limit).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn create_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let body: CreateUser = match req.parse_json().await {
        Ok(body) => body,
        Err(_) => {
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    };
    let result = store.create_user(body).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn get_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let id = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = store.get_user(&id).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn delete_user(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let id = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = store.delete_user(&id).await;
    render_unit_result(res, result, req, depot).await;
}

#[handler]
pub async fn attach_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let uid = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let pid = PolicyIdentifier::from_path_segment(req.param::<String>("pident").unwrap().as_str());
    let result = store.create_user_policy_attachment(&uid, &pid).await;
    render_unit_result(res, result, req, depot).await;
}

#[handler]
pub async fn detach_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let uid = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let pid = PolicyIdentifier::from_path_segment(req.param::<String>("pident").unwrap().as_str());
    let result = store.delete_user_policy_attachment(&uid, &pid).await;
    render_unit_result(res, result, req, depot).await;
}
