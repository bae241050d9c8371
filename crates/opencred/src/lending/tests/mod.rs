mod assistant;
mod common;
