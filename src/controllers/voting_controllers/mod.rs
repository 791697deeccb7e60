pub mod check_work_voting;
pub mod models;
