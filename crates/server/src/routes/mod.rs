pub mod ask;
pub mod health;
pub mod summarize;

use actix_web::web;

/// Register all routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health).service(
        web::scope("/api")
            .service(summarize::summarize)
            .service(ask::ask),
    );
}
