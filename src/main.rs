mod aggregate;
mod app;
mod auth;
mod backend;
mod components;
mod config;
mod controller;
mod dialog;
mod error;
mod format;
mod logger;
mod model;
mod state;
mod store;

use std::rc::Rc;

use app::{App, AppProps};
use config::AppConfig;

fn main() {
    let config = AppConfig::from_env();
    logger::init(config.log_level);
    log::info!(
        "starting in {} mode",
        if config.is_local() { "local" } else { "remote" }
    );
    yew::Renderer::<App>::with_props(AppProps {
        config: Rc::new(config),
    })
    .render();
}
