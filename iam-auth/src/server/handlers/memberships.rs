use salvo::prelude::*;

use crate::model::{GroupIdentifier, UserIdentifier};

use super::{render_unit_result, store};

#[handler]
pub async fn create_membership(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let uid = UserIdentifier::from_path_segment(req.param::<String>("uid").unwrap().as_str());
    let gid = GroupIdentifier::from_path_segment(req.param::<String>("gid").unwrap().as_str());
    let result = store.create_membership(&uid, &gid).await;
    render_unit_result(res, result, req, depot).await;
}

#[handler]
pub async fn delete_membership(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let uid = UserIdentifier::from_path_segment(req.param::<String>("uid").unwrap().as_str());
    let gid = GroupIdentifier::from_path_segment(req.param::<String>("gid").unwrap().as_str());
    let result = store.delete_membership(&uid, &gid).await;
    render_unit_result(res, result, req, depot).await;
}
