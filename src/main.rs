use clap::Parser;
use threader::cli::commands::Cli;
use threader::cli::handlers;
use threader::logging;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
