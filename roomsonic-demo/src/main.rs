mod cli;

use cli::DemoArgs;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let demo_args = DemoArgs::parse(&args)?;
    cli::run_walkthrough(&demo_args)
}
