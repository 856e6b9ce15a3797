pub mod action_gateway;
pub mod movement_recorder;
pub mod sim_clock;
