pub mod http_helpers;
pub mod model_service;
pub mod orchestrator_steps;
pub mod pdf_renderer;
pub mod plagiarism_service;
pub mod question_paper_service;
pub mod report_service;
pub mod repository_search_service;
pub mod web_search_service;
