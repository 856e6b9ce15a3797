pub mod items_handler;
pub mod planner_handler;
pub mod sim_handler;
