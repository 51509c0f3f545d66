use clap::Parser;

use todo_dapp::{
    Config,
    cli::{self, Cli, Command},
    telemetry,
};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = args.load_config()?;
    telemetry::init(args.verbose, &config.logging.level);
    tracing::debug!(?config, "configuration loaded");

    match args.command {
        // iced drives its own runtime.
        Command::Gui => run_gui(config),
        command => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(cli::execute(&command, &config))
        }
    }
}

#[cfg(feature = "gui")]
fn run_gui(config: Config) -> anyhow::Result<()> {
    todo_dapp::gui::run(config)
}

#[cfg(not(feature = "gui"))]
fn run_gui(_config: Config) -> anyhow::Result<()> {
    anyhow::bail!("todo-dapp was built without the `gui` feature")
}
