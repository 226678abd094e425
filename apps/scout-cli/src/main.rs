use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = scout_cli::Args::parse();

	scout_cli::run(args).await
}
