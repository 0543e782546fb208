//! Router assembly: every resource root below the server root runs
//! behind the [`crate::server::middleware::auth_pipeline`] hoop, except the
//! ambient `/health` endpoint.

use salvo::prelude::*;

use super::handlers::{groups, health, memberships, policies, sessions, users};
use super::middleware::auth_pipeline;

fn users_routes() -> Router {
    Router::with_path("users")
        .get(users::list_users)
        .post(users::create_user)
        .push(
            Router::with_path("{id}")
                .get(users::get_user)
                .delete(users::delete_user)
                .push(
                    Router::with_path("policies/{pident}")
                        .post(users::attach_policy)
                        .delete(users::detach_policy),
                )
                .push(
                    Router::with_path("sessions")
                        .get(sessions::list_sessions)
                        .post(sessions::create_session)
                        .push(
                            Router::with_path("{sid}")
                                .get(sessions::get_session)
                                .put(sessions::refresh_session)
                                .delete(sessions::delete_session),
                        ),
                ),
        )
}

fn groups_routes() -> Router {
    Router::with_path("groups")
        .get(groups::list_groups)
        .post(groups::create_group)
        .push(
            Router::with_path("{id}")
                .get(groups::get_group)
                .delete(groups::delete_group)
                .push(
                    Router::with_path("policies/{pident}")
                        .post(groups::attach_policy)
                        .delete(groups::detach_policy),
                ),
        )
}

fn policies_routes() -> Router {
    Router::with_path("policies")
        .get(policies::list_policies)
        .post(policies::create_policy)
        .push(
            Router::with_path("{id}")
                .get(policies::get_policy)
                .put(policies::update_policy)
                .delete(policies::delete_policy),
        )
}

fn memberships_routes() -> Router {
    Router::with_path("memberships/{uid}/{gid}")
        .post(memberships::create_membership)
        .delete(memberships::delete_membership)
}

/// The authenticated+authorized API surface. Callers mount this under the
/// shared [`auth_pipeline`] hoop and add `/health` alongside it.
pub fn api_routes() -> Router {
    Router::new()
        .hoop(auth_pipeline)
        .push(users_routes())
        .push(groups_routes())
        .push(policies_routes())
        .push(memberships_routes())
}

pub fn health_route() -> Router {
    Router::with_path("health").get(health::health_check)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod routes_tests;
