pub mod voting_controllers;
pub mod work_controllers;
