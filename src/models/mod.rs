pub mod activity;
pub mod dto;
