//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; the route table dispatches to [`crate::project::Project`].

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_bindings_json, format_check_report, format_names, format_pool_inventory,
};
pub use route::RunContext;
