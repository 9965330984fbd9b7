// crates/addendum-cli/src/main.rs
use addendum_cli::{run_pipeline, Args, Outcome};
use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match run_pipeline(args) {
        Ok(Outcome::Written(path)) => println!("{}", path.display()),
        Ok(Outcome::Dumped(json)) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
