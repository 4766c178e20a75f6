use std::path::PathBuf;
use std::process::ExitCode;

use blocklog::{Storage, StorageConfig, StorageResult};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blocklog", about = "Inspect and append to a block-structured log")]
struct Args {
    /// Storage directory; required unless `--config` names one.
    #[arg(long, required_unless_present = "config")]
    dir: Option<PathBuf>,

    /// JSON config file; command line options override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Block size in bytes, must match the size the log was written with.
    #[arg(long)]
    block_size: Option<usize>,

    /// Name of the log file inside the storage directory.
    #[arg(long)]
    log_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append records and flush them.
    Append { records: Vec<String> },
    /// Print every record, newest first.
    Dump,
    /// Print storage and log layout.
    Info,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> StorageResult<()> {
    let mut config = match &args.config {
        Some(path) => StorageConfig::load(path)?,
        None => StorageConfig::default(),
    };
    if let Some(dir) = args.dir {
        config.directory = dir;
    }
    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = log_file;
    }

    let storage = Storage::open(&config)?;
    let log_manager = storage.log_manager();
    match args.command {
        Command::Append { records } => {
            let mut last = 0;
            for record in &records {
                last = log_manager.append(record.as_bytes())?;
                println!("{}", last);
            }
            log_manager.flush(last)?;
        }
        Command::Dump => {
            for record in log_manager.iterator()? {
                let record = record?;
                println!("{:>6}  {}", record.len(), String::from_utf8_lossy(&record));
            }
        }
        Command::Info => {
            let file_manager = storage.file_manager();
            println!("directory:  {}", file_manager.directory().display());
            println!("new:        {}", file_manager.is_new());
            println!("block size: {}", file_manager.block_size());
            println!("log file:   {}", log_manager.log_file());
            println!("log blocks: {}", file_manager.length(log_manager.log_file())?);
            println!("tail block: {}", log_manager.current_block());
        }
    }
    Ok(())
}
