use clap::Parser;
use searchgate_cli::{CliArgs, SearchgateCli, exit_code};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let result = match SearchgateCli::from_args("searchgate", &args) {
        Ok(cli) => cli.run(args).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(exit_code(&err));
    }
}
