use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use mp4view::{
    BoxVisit, Flow, TypeTag, WalkOptions, Walker, default_registry, dump::dump_header, flat_boxes,
    logger, render_flat,
    util::{hex_dump, load_file},
};
use std::process::ExitCode;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(version, about = "Flat listing of the boxes in an MP4/ISOBMFF file")]
struct Args {
    /// MP4/ISOBMFF file path
    path: String,

    /// Emit JSON instead of the text listing
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Do not decode known boxes
    #[arg(long, action = ArgAction::SetTrue)]
    no_decode: bool,

    /// Dump raw content of this 4CC (e.g. --raw stsd) or uuid:xxxxxxxx...
    #[arg(long = "raw")]
    raw: Option<Selector>,

    /// Bytes to show when dumping raw (0 means entire box content)
    #[arg(long, default_value_t = 0)]
    bytes: usize,

    /// Limit recursion depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Which boxes `--raw` dumps.
#[derive(Debug, Clone)]
enum Selector {
    Tag(TypeTag),
    /// Lowercase hex prefix of the user type.
    Uuid(String),
}

impl FromStr for Selector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if let Some(prefix) = s.strip_prefix("uuid:") {
            if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
                bail!("invalid uuid prefix {prefix:?}");
            }
            return Ok(Selector::Uuid(prefix.to_ascii_lowercase()));
        }
        Ok(Selector::Tag(s.parse()?))
    }
}

impl Selector {
    fn matches(&self, visit: &BoxVisit<'_>) -> bool {
        match (self, visit.header.user_type) {
            (Selector::Uuid(prefix), Some(u)) => u.to_hex().starts_with(prefix.as_str()),
            (Selector::Uuid(_), None) => false,
            (Selector::Tag(tag), _) => visit.header.typ == *tag,
        }
    }
}

fn dump_raw(data: &[u8], sel: &Selector, limit: usize, options: WalkOptions) {
    let mut index = 0;
    Walker::with_options(data, options).walk(|visit| {
        if sel.matches(visit) {
            let content = visit.content();
            let shown = match limit {
                0 => content,
                n => &content[..n.min(content.len())],
            };
            let offset = (visit.offset + usize::from(visit.header.header_size)) as u64;
            println!(
                "\n== Dump {} ({}) content: offset={:#x}, len={} ==",
                index,
                dump_header(&visit.header),
                offset,
                shown.len()
            );
            print!("{}", hex_dump(shown, offset));
            index += 1;
        }
        Flow::Continue
    });
}

fn run(args: &Args) -> anyhow::Result<()> {
    let data = load_file(&args.path).with_context(|| format!("cannot read {}", args.path))?;
    let options = WalkOptions {
        max_depth: args.max_depth,
    };
    let registry = default_registry();
    let boxes = flat_boxes(&data, &registry, !args.no_decode, options)?;

    // JSON mode: output JSON and exit (no raw dump to keep output clean)
    if args.json {
        println!("{}", serde_json::to_string_pretty(&boxes)?);
        return Ok(());
    }

    print!("{}", render_flat(&boxes));

    if let Some(sel) = &args.raw {
        dump_raw(&data, sel, args.bytes, options);
    }
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
