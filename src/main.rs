use clap::Parser;
use cutlist::cli::{Cli, Commands};
use miette::Result;

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

    match cli.command {
        Commands::Generate(args) => cutlist::cli::commands::generate::run(args, &global),
        Commands::List(args) => cutlist::cli::commands::list::run(args, &global),
        Commands::Config(cmd) => cutlist::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => cutlist::cli::commands::completions::run(args),
    }
}
