//! Daily Dose CLI - ties the client, the stores and the terminal together.

pub mod config;
pub mod menu;
pub mod pipeline;
pub mod ui;

pub use config::{Command, Config};
pub use menu::{run_menu, MenuChoice};
pub use pipeline::{Pipeline, Presenter};
pub use ui::TerminalPresenter;
