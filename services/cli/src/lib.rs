mod cli;
mod commands;
mod render;

use opencred::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
