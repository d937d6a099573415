use std::process::ExitCode;

use clap::Parser;
use post_to_src_lib::cli::{self, Cli};

// One lookup at a time: a single-threaded runtime is all this needs
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging(args.verbose);

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let code = cli::run(&args, &mut stdout.lock(), &mut stderr.lock()).await;

    ExitCode::from(code)
}
