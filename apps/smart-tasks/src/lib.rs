//! Smart Tasks
//!
//! Terminal front-end for the tasks domain.
//!
//! ```text
//! stdin ─► Command (command.rs) ─► Shell (shell.rs) ─► TaskService
//!                                        │
//! stdout ◄──── render_tasks (render.rs) ◄┘
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod render;
pub mod shell;

pub use app::run;
pub use config::Config;
