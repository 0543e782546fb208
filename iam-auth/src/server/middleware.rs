//! The `hoop` that runs the authentication and authorization pipeline ahead
//! of every handler below it, installing the resulting [`Auth`]
//! context into the [`Depot`] or short-circuiting the response with the
//! mapped [`AppError`].

use std::sync::Arc;

use salvo::prelude::*;

use crate::auth::{AuthenticationConfig, RequestHeaders, authenticate, authorize};
use crate::model::Action;
use crate::store::Store;

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

#[handler]
pub async fn auth_pipeline(req: &mut Request, depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
    let store = depot.obtain::<Arc<dyn Store>>().unwrap().clone();
    let config = depot.obtain::<Arc<AuthenticationConfig>>().unwrap().clone();

    let host = header(req, "host");
    let headers = RequestHeaders {
        method: req.method().as_str(),
        host,
        raw_path: req.uri().path(),
        raw_query: req.uri().query().unwrap_or(""),
        authorization: header(req, "authorization"),
        user_id: header(req, &config.user_id_header()),
        public_key: header(req, &config.public_key_header()),
        request_id: header(req, &config.request_id_header()),
        session_token: header(req, "session-token"),
    };

    let authenticated = match authenticate(&store, &config, headers).await {
        Ok(authenticated) => authenticated,
        Err(err) => {
            err.write(req, depot, res).await;
            ctrl.skip_rest();
            return;
        }
    };

    let action = Action::from_method(req.method());
    let resource = req.uri().path().to_string();
    let host = host.unwrap_or_default().to_string();

    match authorize(&store, authenticated, &host, action, &resource).await {
        Ok(auth) => {
            depot.inject(auth);
        }
        Err(err) => {
            err.write(req, depot, res).await;
            ctrl.skip_rest();
        }
    }
}
