pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{web, Error, HttpRequest};

use crate::error::AppError;

fn bad_request<E: std::fmt::Display>(err: E, _req: &HttpRequest) -> Error {
    AppError::BadRequest(err.to_string()).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // Body, query and path rejections use the same `{"error": ...}` shape as everything else.
    cfg.app_data(web::JsonConfig::default().error_handler(bad_request))
        .app_data(web::QueryConfig::default().error_handler(bad_request))
        .app_data(web::FormConfig::default().error_handler(bad_request))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            log::debug!("Unmatched path parameter: {}", err);
            AppError::NotFound("Not found".into()).into()
        }));

    cfg.service(health::health)
        .service(
            web::scope("/users")
                .service(users::list_users)
                .service(users::register)
                .service(users::update_me)
                .service(users::login)
                .service(users::refresh)
                // Must precede `/{id}/`.
                .service(users::me)
                .service(users::get_user),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}
