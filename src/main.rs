use clap::Parser;
use lemon::cli::{Cli, Commands, GlobalOpts};
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Sync(args) => lemon::cli::commands::sync::run(args, &global),
        Commands::Menu(args) => lemon::cli::commands::menu::run(args, &global),
        Commands::Categories(args) => lemon::cli::commands::categories::run(args, &global),
        Commands::Browse(args) => lemon::cli::commands::browse::run(args, &global),
        Commands::Cache(cmd) => lemon::cli::commands::cache::run(cmd, &global),
        Commands::Config(cmd) => lemon::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => lemon::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `LEMON_LOG` wins over `--verbose`
fn init_tracing(global: &GlobalOpts) {
    let default_level = if global.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LEMON_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
