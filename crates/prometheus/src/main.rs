use anyhow::Context;
use clap::{Parser, Subcommand};
use prometheus::config;
use prometheus::events::AppEvent;
use prometheus::session::Session;
use prometheus::sys::runtime;
use prometheus_geometry::Point;
use prometheus_geometry::overlay::{GridMode, Orientation, grid_lines};
use prometheus_geometry::radial::{NavAction, RadialLayout};
use prometheus_geometry::viewport::{GridPoint, Viewport, format_coord};
use prometheus_geometry::zone::ZonedScale;

#[derive(Parser, Debug)]
#[command(name = "prometheus", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Read the duration under a slider position (0 to 100)
    Slider { position: f64 },
    /// Find the slider position of a duration, e.g. `position 3 days`
    Position {
        value: i64,
        unit: String,
        /// Use the circular dial instead of the slider
        #[arg(long)]
        dial: bool,
    },
    /// Read the duration under a dial angle in degrees
    #[command(allow_negative_numbers = true)]
    Dial { degrees: f64 },
    /// Place items evenly around a circle
    #[command(allow_negative_numbers = true)]
    Place {
        #[arg(short = 'n', long, default_value_t = 8)]
        count: usize,
        #[arg(short, long, default_value_t = 120.0)]
        radius: f64,
        #[arg(long, default_value_t = 0.0)]
        cx: f64,
        #[arg(long, default_value_t = 0.0)]
        cy: f64,
        /// Also print tick marks between these two radii
        #[arg(long, num_args = 2, value_names = ["INNER", "OUTER"])]
        ticks: Option<Vec<f64>>,
    },
    /// Convert a screen pixel to centered grid coordinates
    #[command(allow_negative_numbers = true)]
    ToGrid {
        x: f64,
        y: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },
    /// Convert centered grid coordinates to a screen pixel
    #[command(allow_negative_numbers = true)]
    ToScreen {
        x: f64,
        y: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },
    /// Click the navigation wheel at a screen point
    #[command(allow_negative_numbers = true)]
    Nav {
        x: f64,
        y: f64,
        /// Click the collapsed corner button instead of the expanded wheel
        #[arg(long)]
        collapsed: bool,
    },
    /// List the grid overlay lines for the configured viewport
    Lines {
        #[arg(short, long, default_value_t = GridMode::Standard)]
        mode: GridMode,
    },
    /// Replay a pointer script from stdin against the rotary template list
    Replay {
        /// Number of templates in the list
        #[arg(short = 'n', long, default_value_t = 10)]
        items: usize,
        /// Reload the list settings when the config file changes
        #[arg(long)]
        watch: bool,
    },
    /// Write the default config file if none exists
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load_or_default();

    match cli.command {
        Commands::Slider { position } => {
            let scale = config.slider_scale()?;
            println!("{}", scale.position_to_value(position));
        }
        Commands::Position { value, unit, dial } => {
            let scale = if dial {
                ZonedScale::duration_dial()
            } else {
                config.slider_scale()?
            };
            let position = scale
                .value_to_position_str(value, &unit)
                .with_context(|| format!("No position for {} {}", value, unit))?;
            println!("{}", position);
        }
        Commands::Dial { degrees } => {
            println!("{}", ZonedScale::duration_dial().position_to_value(degrees));
        }
        Commands::Place {
            count,
            radius,
            cx,
            cy,
            ticks,
        } => {
            let layout = RadialLayout::new(Point::new(cx, cy), radius);
            for (i, p) in layout.evenly_spaced(count).iter().enumerate() {
                println!("{}\t{:.3}\t{:.3}", i, p.x, p.y);
            }
            if let Some([inner, outer]) = ticks.as_deref() {
                for tick in layout.tick_marks(count, *inner, *outer) {
                    println!(
                        "tick {:.1}\t{:.3} {:.3} -> {:.3} {:.3}",
                        tick.degrees, tick.from.x, tick.from.y, tick.to.x, tick.to.y
                    );
                }
            }
        }
        Commands::ToGrid {
            x,
            y,
            width,
            height,
        } => {
            let viewport = viewport_or(config.viewport, width, height);
            println!("{}", viewport.screen_to_grid(Point::new(x, y)).describe());
        }
        Commands::ToScreen {
            x,
            y,
            width,
            height,
        } => {
            let viewport = viewport_or(config.viewport, width, height);
            let p = viewport.grid_to_screen(GridPoint::new(x, y));
            println!("{} {}", p.x, p.y);
        }
        Commands::Nav { x, y, collapsed } => {
            let mut wheel = config.menu.build(config.viewport.center());
            if collapsed {
                wheel.set_center(corner_anchor(config.viewport, wheel.radius()));
            } else {
                wheel.set_expanded(true);
            }
            let pointer = Point::new(x, y);
            println!("{:?}", wheel.hit_test(pointer));
            match wheel.click(pointer) {
                NavAction::Navigate(label) => println!("navigate {}", label),
                action => println!("{:?}", action),
            }
        }
        Commands::Lines { mode } => {
            for line in grid_lines(mode, config.viewport) {
                let axis = match line.orientation {
                    Orientation::Vertical => "x",
                    Orientation::Horizontal => "y",
                };
                let weight = if line.is_center {
                    "center"
                } else if line.is_primary {
                    "primary"
                } else {
                    "secondary"
                };
                println!(
                    "{} {}\tat {:.1}\t{}",
                    axis,
                    format_coord(line.value),
                    line.position,
                    weight
                );
            }
        }
        Commands::Replay { items, watch } => replay(config, items, watch),
        Commands::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Center of the collapsed wheel, inset from the bottom-left corner.
fn corner_anchor(viewport: Viewport, radius: f64) -> Point {
    const INSET: f64 = 30.0;
    Point::new(INSET + radius, viewport.height - INSET - radius)
}

fn viewport_or(base: Viewport, width: Option<f64>, height: Option<f64>) -> Viewport {
    Viewport::new(width.unwrap_or(base.width), height.unwrap_or(base.height))
}

fn replay(config: config::Config, items: usize, watch: bool) {
    let hub = prometheus_geometry::pointer::PointerHub::new();
    let mut session = Session::new(&hub, config, items);
    log::info!(
        "Replaying pointer input over {} items, max offset {}",
        items,
        session.max_offset()
    );

    let (tx, rx) = async_channel::bounded(32);
    runtime::start_background_services(tx, watch);

    while let Ok(event) = rx.recv_blocking() {
        let closed = matches!(event, AppEvent::InputClosed);
        if let Some(frame) = session.handle(event) {
            println!(
                "offset {:.3}\trotation {:.3}{}",
                frame.offset,
                frame.rotation,
                if frame.dragging { "\tdragging" } else { "" }
            );
        }
        if closed {
            break;
        }
    }
}
