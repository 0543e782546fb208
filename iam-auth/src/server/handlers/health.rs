use salvo::prelude::*;

/// Process liveness only; unauthenticated and outside the auth pipeline.
#[handler]
pub async fn health_check(res: &mut Response) {
    res.status_code(StatusCode::OK);
    res.render(Text::Plain("OK"));
}
