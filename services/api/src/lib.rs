mod cli;
mod infra;
mod report;
mod routes;
mod server;

use backyard_bud::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
