pub mod api;

pub mod app_config;

pub mod pipeline;

pub mod recommendations;

pub mod reports;
