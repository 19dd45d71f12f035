use clap::{Parser, Subcommand};
use knobcore::knob::DEFAULT_LIMITING_ANGLE;
use knobcore::seekbar::{self, DEFAULT_BARS_COUNT};
use knobcore::{KnobController, Point, SeekBarController, TouchEvent, TouchPhase};

#[derive(Parser, Debug)]
#[command(name = "knobctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Map a touch over the knob to an angle and a percentage
    Knob {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        /// Knob centre, x
        #[arg(long)]
        cx: f64,
        /// Knob centre, y
        #[arg(long)]
        cy: f64,
        /// Half width of the dead zone around the top, in degrees
        #[arg(short, long, default_value_t = DEFAULT_LIMITING_ANGLE)]
        limit: f64,
        #[arg(short, long, default_value = "down")]
        phase: TouchPhase,
    },
    /// Map a horizontal touch on the seek track
    Seek {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        /// Track width in pixels
        #[arg(short, long)]
        width: f64,
        #[arg(short, long, default_value_t = DEFAULT_BARS_COUNT)]
        bars: usize,
        #[arg(short, long, default_value = "down")]
        phase: TouchPhase,
    },
    /// Show which bars are lit for a volume
    Bars {
        #[arg(short, long)]
        volume: f64,
        #[arg(short, long, default_value_t = DEFAULT_BARS_COUNT)]
        bars: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Knob {
            x,
            y,
            cx,
            cy,
            limit,
            phase,
        } => knob(TouchEvent::new(x, y, phase), Point::new(cx, cy), limit),
        Commands::Seek {
            x,
            width,
            bars,
            phase,
        } => seek(TouchEvent::new(x, 0.0, phase), width, bars),
        Commands::Bars { volume, bars } => {
            if bars == 0 {
                anyhow::bail!("--bars must be at least 1");
            }
            print_bars(volume.clamp(0.0, 1.0), bars);
            Ok(())
        }
    }
}

fn knob(event: TouchEvent, center: Point, limit: f64) -> anyhow::Result<()> {
    let mut knob = KnobController::new(limit)?;
    knob.set_center(center);

    match knob.handle(event) {
        Some(update) => println!(
            "angle {:.1}°  percentage {:.3}",
            *update.angle, update.percentage
        ),
        None => println!("no update (dead zone or {} sample)", event.phase),
    }
    Ok(())
}

fn seek(event: TouchEvent, width: f64, bars: usize) -> anyhow::Result<()> {
    let mut seek = SeekBarController::new(bars)?;
    if !seek.measure(width) {
        anyhow::bail!("invalid track width {}", width);
    }

    match seek.handle(event) {
        Some(update) => {
            println!("angle {:.1}°  percent {:.3}", *update.angle, update.percent);
            print_bars(update.percent, bars);
        }
        None => println!("no update (outside track or {} sample)", event.phase),
    }
    Ok(())
}

fn print_bars(volume: f64, bars: usize) {
    let active = seekbar::active_bars(volume, bars);
    let row: String = (0..bars)
        .map(|i| if seekbar::is_bar_active(i, active) { '█' } else { '·' })
        .collect();
    println!("{row}  ({active} of {bars})");
}
