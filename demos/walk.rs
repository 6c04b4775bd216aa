use mp4view::typed::{MediaHeaderBoxView, TrackHeaderBoxView, Validate};
use mp4view::{Flow, FullBoxView, Walker};
use std::env;

// Walks an MP4 file and prints, for every track header and media header it
// finds, the fields most people look for first.
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file>", args[0]);
        std::process::exit(1);
    }

    let data = mp4view::util::load_file(&args[1])?;

    Walker::new(&data).walk(|visit| {
        let full = FullBoxView::new(visit.view);
        let tkhd = TrackHeaderBoxView::new(full);
        if tkhd.is_valid() {
            println!(
                "{:#x} track {:?}: duration {:?}, {:?}x{:?}",
                visit.offset,
                tkhd.track_id(),
                tkhd.duration(),
                tkhd.width().map(|w| w[0]),
                tkhd.height().map(|h| h[0]),
            );
        }
        let mdhd = MediaHeaderBoxView::new(full);
        if mdhd.is_valid() {
            println!(
                "{:#x} media: timescale {:?}, duration {:?}, language {}",
                visit.offset,
                mdhd.timescale(),
                mdhd.duration(),
                mdhd.language().map(|l| l.to_string()).unwrap_or_default(),
            );
        }
        Flow::Continue
    });

    Ok(())
}
