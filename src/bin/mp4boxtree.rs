use clap::{ArgAction, Parser};
use mp4view::{WalkOptions, api::render_tree, logger, util::load_file};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Print the box tree of an MP4/ISOBMFF file")]
struct Args {
    /// MP4/ISOBMFF file path
    path: String,

    /// Limit recursion depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn run(args: &Args) -> anyhow::Result<()> {
    let data = load_file(&args.path)?;
    let options = WalkOptions {
        max_depth: args.max_depth,
    };
    print!("{}", render_tree(&data, options));
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Exception \"{e:#}\"");
            ExitCode::FAILURE
        }
    }
}
