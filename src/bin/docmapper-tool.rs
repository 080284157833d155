//! Backup tool for document databases.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use docmapper::tool::{Tool, ToolOptions};

#[derive(Parser, Debug)]
#[command(name = "docmapper-tool", disable_version_flag = true)]
struct Args {
    /// Database location, e.g. http://localhost:5984/mydb
    dsn: String,
    /// Print version and exit
    #[arg(long, short = 'V', global = true)]
    version: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export all documents of the database
    Dump,
    /// Import documents into the database
    Load,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let tool = Tool::new(args.dsn, ToolOptions { version: args.version });
    let mut stdout = std::io::stdout().lock();
    let result = match args.command {
        Command::Dump => tool.dump(&mut stdout),
        Command::Load => tool.load(&mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
