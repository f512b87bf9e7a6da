mod cli;
mod console;
mod infra;
mod routes;
mod server;

pub(crate) use cli::run;
