#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    homeport_directory_controller::Args::parse_and_run().await
}
