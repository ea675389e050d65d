pub mod dashboard;
pub mod health;
pub mod quotes;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(quotes::config),
    )
    .configure(dashboard::config);
}
