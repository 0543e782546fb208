use std::sync::Arc;

use salvo::prelude::*;
use uuid::Uuid;

use crate::error::AppError;
use crate::model::UserIdentifier;
use crate::session::SessionManager;

use super::{pagination, render_result, render_unit_result, store};

fn session_manager(depot: &Depot) -> Arc<SessionManager> {
    depot.obtain::<Arc<SessionManager>>().unwrap().clone()
}

fn parse_sid(req: &mut Request) -> Result<Uuid, AppError> {
    let raw = req.param::<String>("sid").unwrap();
    Uuid::parse_str(&raw).map_err(|_| AppError::not_found("session", raw))
}

#[handler]
pub async fn list_sessions(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let identifier = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let (offset, limit) = pagination(req);
    let result = async {
        let uid = store.get_user_id(&identifier).await?;
        store.list_user_sessions(uid, offset, limit).await
    }
    .await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn create_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let manager = session_manager(depot);
    let identifier = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = async {
        let uid = store.get_user_id(&identifier).await?;
        manager.create_session(&store, uid).await
    }
    .await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn get_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let identifier = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let result = async {
        let uid = store.get_user_id(&identifier).await?;
        let sid = parse_sid(req)?;
        store.get_session_by_id(uid, sid).await
    }
    .await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn refresh_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let manager = session_manager(depot);
    let identifier = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let sid = match parse_sid(req) {
        Ok(sid) => sid,
        Err(err) => {
            err.write(req, depot, res).await;
            return;
        }
    };
    let result = async {
        let uid = store.get_user_id(&identifier).await?;
        manager.refresh_session(&store, uid, sid).await
    }
    .await;
    render_result(res, result, req, depot).await;
}

#[handler]
pub async fn delete_session(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let store = store(depot);
    let identifier = UserIdentifier::from_path_segment(req.param::<String>("id").unwrap().as_str());
    let sid = match parse_sid(req) {
        Ok(sid) => sid,
        Err(err) => {
            err.write(req, depot, res).await;
            return;
        }
    };
    let result = async {
        let uid = store.get_user_id(&identifier).await?;
        store.delete_session(uid, sid).await
    }
    .await;
    render_unit_result(res, result, req, depot).await;
}
