use sprite_compositor::config::{DemoConfig, DEFAULT_CONFIG_PATH};
use sprite_compositor::display::{Display, InputEvent, PixelBuffer, RenderTarget};
use sprite_compositor::util::{Bouncer, FrameClock};
use sprite_compositor::{Rect, Sprite};

use sdl2::keyboard::Keycode;

/// Print the average frame rate every this many frames
const FPS_REPORT_INTERVAL: u64 = 300;

/// Parse command line arguments and return (config path, vsync override)
fn parse_args() -> (String, Option<bool>) {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut vsync = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => vsync = Some(false),
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: sprite-demo [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --config PATH, -c PATH  JSON config file (default: {})",
                    DEFAULT_CONFIG_PATH
                );
                println!("  --no-vsync              Disable VSync for uncapped framerate");
                println!("  --help                  Show this help message");
                std::process::exit(0);
            },
            other => eprintln!("Ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    (config_path, vsync)
}

fn load_config(path: &str) -> DemoConfig {
    match DemoConfig::load(path) {
        Ok(config) => {
            println!("config: loaded {}", path);
            config
        },
        Err(e) => {
            eprintln!("config: {} ({}), using defaults", path, e);
            DemoConfig::default()
        },
    }
}

/// Soft-edged disc on a transparent background
fn build_sprite(config: &DemoConfig) -> Sprite {
    let diameter = config.sprite_radius * 2;
    let radius = config.sprite_radius as i32;
    let c = config.sprite_color;
    let mut image = PixelBuffer::with_size(diameter, diameter);
    image.fill_circle_soft(radius, radius, radius, c.r, c.g, c.b, c.a, config.sprite_feather);
    image.into_sprite()
}

fn main() -> Result<(), String> {
    let (config_path, vsync_override) = parse_args();
    let mut config = load_config(&config_path);
    if let Some(vsync) = vsync_override {
        config.vsync = vsync;
    }
    let (width, height) = (config.width, config.height);

    let (mut display, texture_creator) =
        Display::with_options("sprite-demo", width, height, config.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let row_bytes = width as usize * 4 + config.row_padding;
    let mut canvas = PixelBuffer::with_row_bytes(width, height, row_bytes);

    let sprite = build_sprite(&config);
    let size = sprite.size();
    let overshoot = config.overshoot * size.width as f32;
    let mut bouncer = Bouncer::new(
        (width, height),
        (size.width as u32, size.height as u32),
        config.velocity,
        overshoot,
    );
    // Bottom half only, toggled with H
    let lower_half = Rect::new(0, size.height / 2, size.width, size.height - size.height / 2);
    let mut half = false;

    let mut clock = FrameClock::new(60);
    let mut frame: u64 = 0;

    println!("=== sprite-demo ===");
    println!("Resolution: {}x{} (row_bytes {})", width, height, row_bytes);
    println!("Controls:");
    println!("  H          - Toggle compositing only the lower half of the sprite");
    println!("  Escape     - Quit");

    let bg = config.background;
    'main: loop {
        let dt = clock.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::H) => half = !half,
                InputEvent::KeyDown(_) => {},
            }
        }

        bouncer.update(dt);
        let mut position = bouncer.position();

        canvas.clear(bg.r, bg.g, bg.b);
        if half {
            position.y += lower_half.y;
            canvas.composite(&sprite, lower_half, position);
        } else {
            canvas.composite(&sprite, sprite.bounds(), position);
        }

        display.present(&mut target, &canvas)?;

        frame += 1;
        if frame % FPS_REPORT_INTERVAL == 0 {
            eprintln!("fps: {:.1}", clock.average_fps());
        }
    }

    Ok(())
}
