use salvo::prelude::*;

use crate::model::{CreateGroup, GroupIdentifier, PolicyIdentifier};

use super::{pagination, render_result, render_unit_result, store};

#[handler]
pub async fn list_groups(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let (offset, limit) = pagination(req);
    let result = store.list_groups(offset, limit).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn create_group(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let body: CreateGroup = match req.parse_json().await {
        Ok(body) => body,
        Err(_) => {
            res.status_code(StatusCode::BAD_REQUEST);
            return;
        }
    };
    let result = store.create_group(body).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn get_group(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let id = GroupIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = store.get_group(&id).await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn delete_group(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let id = GroupIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = store.delete_group(&id).await;
    render_unit_result(res, result, req, depot).await;
}

#[handler]
pub async fn attach_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let gid = GroupIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let pid = PolicyIdentifier::from_path_segment(req.param::<String>("pident").unwrap().as_str());
    let result = store.create_group_policy_attachment(&gid, &pid).await;
    render_unit_result(res, result, req, depot).await;
}

#[handler]
pub async fn detach_policy(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let gid = GroupIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let pid = PolicyIdentifier::from_path_segment(req.param::<String>("pident").unwrap().as_str());
    let result = store.delete_group_policy_attachment(&gid, &pid).await;
    render_unit_result(res, result, req, depot).await;
}
