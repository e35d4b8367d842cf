pub mod health_handler;
pub mod plagiarism_handler;
pub mod question_paper_handler;
pub mod upload;

use actix_web::web;

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use plagiarism_handler::check_plagiarism;
pub use question_paper_handler::generate_question_paper;

/// Registers every route on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(generate_question_paper)
        .service(check_plagiarism);
}
