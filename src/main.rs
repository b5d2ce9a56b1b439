mod blog;
mod config;
mod contact;
mod content;
mod gui;
mod i18n;
mod lang;
mod route;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    let cfg = config::SiteConfig::from_env();
    gui::run(cfg)
}
