// Command line demo:
// • `show` loads a screenshot, highlights the given rectangles and puts it
//   on screen as an overlay, centred on the primary display.
// • `check-name` prints the file name an image would be saved under.
// • `convert` re-encodes an image, format taken from the output name.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use sx_overlay::capture::ImageCapture;
use sx_overlay::{
    bridge, codec, logging, Annotation, Element, Error, FixedDisplay, Kind, OverlayRenderer,
    OverlayScheduler, OverlayState, Settings, UiThread,
};

#[derive(Parser)]
#[command(name = "sx-overlay", version, about = "Highlight screen regions in an overlay window")]
struct Cli {
    /// Settings file (TOML); defaults apply when it does not exist
    #[arg(long, global = true, default_value = "sx-overlay.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show an image as an overlay
    Show {
        image: PathBuf,
        /// Milliseconds; negative shows in the background and returns after |MS|
        #[arg(long, allow_negative_numbers = true)]
        duration: Option<i64>,
        /// Rectangle to highlight: x,y,w,h,score
        #[arg(long, value_parser = parse_annotation)]
        annotate: Vec<Annotation>,
        /// Widen every annotation by the configured grow margin
        #[arg(long)]
        grow: bool,
    },
    /// Print the validated image file name
    CheckName { name: String },
    /// Re-encode an image
    Convert { input: PathBuf, output: String },
}

fn parse_annotation(text: &str) -> Result<Annotation, String> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [x, y, w, h, score] = parts.as_slice() else {
        return Err(format!("expected x,y,w,h,score, got {text:?}"));
    };
    let int = |s: &str| s.parse::<i32>().map_err(|e| format!("{s:?}: {e}"));
    let score = score.parse::<f64>().map_err(|e| format!("{score:?}: {e}"))?;
    let bounds = Element::with_kind(Kind::Target, int(*x)?, int(*y)?, int(*w)?, int(*h)?)
        .with_score(score);
    Ok(Annotation::from_element(&bounds))
}

fn show(
    settings: &Settings,
    image: PathBuf,
    duration: Option<i64>,
    annotations: Vec<Annotation>,
) -> Result<(), Error> {
    let capture = ImageCapture::open(&image)?;
    let planes = bridge::try_split(&capture.next_frame())?;
    let (w, h) = capture.resolution();
    let mut element = Element::with_kind(Kind::Picture, 0, 0, w as i32, h as i32);
    if let Some(stem) = image.file_stem().and_then(|s| s.to_str()) {
        element.set_name(stem);
    }

    let renderer = OverlayRenderer::new(Arc::new(FixedDisplay::from_settings(settings)));
    let scheduler = OverlayScheduler::new(UiThread::spawn_minifb()?, renderer, settings);

    let ms = duration.unwrap_or(settings.show_time as i64 * 1000);
    tracing::info!(%element, ms, annotations = annotations.len(), "showing overlay");
    let content = Arc::new(planes.color);
    if annotations.is_empty() {
        scheduler.show(&element, content, ms)?;
    } else {
        scheduler.show_all(&element, content, annotations, ms)?;
    }

    // a background overlay must not outlive the process
    if scheduler.state() == OverlayState::Showing {
        scheduler.stop();
    }
    Ok(())
}

fn convert(input: PathBuf, output: &str) -> Result<(), Error> {
    let capture = ImageCapture::open(&input)?;
    let planes = bridge::try_split(&capture.next_frame())?;
    let path = codec::save(&planes.color, output)?;
    println!("{}", path.display());
    Ok(())
}

fn main() -> Result<(), Error> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Show { image, duration, mut annotate, grow } => {
            let settings = Settings::load_or_default(&cli.config)?;
            if grow {
                for a in &mut annotate {
                    a.bounds.grow_with(&settings);
                }
            }
            show(&settings, image, duration, annotate)
        }
        Command::CheckName { name } => {
            println!("{}", codec::try_validate_filename(&name)?);
            Ok(())
        }
        Command::Convert { input, output } => convert(input, &output),
    }
}
