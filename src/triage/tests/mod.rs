mod common;
mod engine;
mod service;
