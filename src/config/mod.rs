//! Service configuration: YAML file schema and command-line arguments.

mod args;
mod schema;

pub use args::{
    parse_args, ArtifactArgs, Cli, Command, InspectArgs, OutputFormat, PredictArgs, ServeArgs,
};
pub use schema::AppConfig;
