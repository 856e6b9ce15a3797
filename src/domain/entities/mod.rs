pub mod action;
pub mod movement;
pub mod order;
pub mod proposal;
