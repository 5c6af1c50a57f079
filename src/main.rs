use std::error::Error;
use std::fs;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};
use sdl2::event::Event;
use sdl2::keyboard::{KeyboardState, Keycode, Scancode};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

use c8vm::{
    Framebuffer, Interpreter, Machine, C8_DISPLAY_HEIGHT, C8_DISPLAY_WIDTH, C8_KEY_COUNT,
    C8_ROM_START,
};

mod tone;

use tone::Tone;

// COSMAC VIP hex keypad laid over the left side of a QWERTY keyboard
const SCANCODE_MAPPING: [Scancode; C8_KEY_COUNT] = [
    Scancode::X,
    Scancode::Num1, Scancode::Num2, Scancode::Num3,
    Scancode::Q, Scancode::W, Scancode::E,
    Scancode::A, Scancode::S, Scancode::D,
    Scancode::Z, Scancode::C,
    Scancode::Num4, Scancode::R, Scancode::F, Scancode::V,
];

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg()]
    file: String,

    #[arg(short, long, default_value_t = 700, help = "Instructions per second")]
    freq: u32,

    #[arg(short, long, default_value_t = C8_ROM_START, help = "Loading/start address")]
    address: u16,

    #[arg(long, default_value_t = 640, help = "Window width")]
    width: u32,

    #[arg(long, default_value_t = 320, help = "Window height")]
    height: u32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    if args.width != args.height * 2 {
        warn!("running in an aspect ratio other than 2:1, display may look stretched");
    }
    if args.address < C8_ROM_START {
        return Err(format!("load address must be at least {:#05X}", C8_ROM_START).into());
    }

    let rom = fs::read(&args.file).map_err(|err| format!("could not open {}: {}", args.file, err))?;
    let mut machine = Machine::new();
    machine.load_program_at(&rom, args.address)?;
    let mut interpreter = Interpreter::new();
    info!("running {} at {}Hz", args.file, args.freq);

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let window = video_subsystem
        .window("c8vm", args.width, args.height)
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().accelerated().build()?;
    render(&mut canvas, &machine.framebuffer, args)?;

    let mut event_pump = sdl_context.event_pump()?;
    let tone = Tone::from_sdl_context(&sdl_context)?;

    let step_interval = Duration::from_nanos(1_000_000_000 / args.freq.max(1) as u64);
    let mut last_step = Instant::now();
    let mut last_timer_update = last_step;
    let mut timer_backlog = Duration::ZERO;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => break 'running,
                _ => {}
            }
        }

        let keyboard_state = event_pump.keyboard_state();
        refresh_keys(&mut machine, &keyboard_state);
        let fast_forward = keyboard_state.is_scancode_pressed(Scancode::Space);

        if interpreter.step(&mut machine)? {
            render(&mut canvas, &machine.framebuffer, args)?;
        }

        // Timers run off wall time, sleeps included, whatever the instruction rate
        let now = Instant::now();
        timer_backlog += now - last_timer_update;
        last_timer_update = now;
        machine.catch_up_timers(&mut timer_backlog);
        tone.set(machine.is_tone_on());

        if !fast_forward {
            std::thread::sleep(step_interval.saturating_sub(now - last_step));
        }
        last_step = Instant::now();
    }
    Ok(())
}

fn refresh_keys(machine: &mut Machine, keyboard_state: &KeyboardState) {
    for (k, scancode) in SCANCODE_MAPPING.iter().enumerate() {
        machine.set_key(k, keyboard_state.is_scancode_pressed(*scancode));
    }
}

fn render(canvas: &mut Canvas<Window>, framebuffer: &Framebuffer, args: &Args) -> Result<(), String> {
    let spot_width = args.width / C8_DISPLAY_WIDTH as u32;
    let spot_height = args.height / C8_DISPLAY_HEIGHT as u32;

    canvas.set_draw_color(Color::BLACK);
    canvas.clear();
    canvas.set_draw_color(Color::GREEN);
    for (x, y) in framebuffer.lit_pixels() {
        let spot = Rect::new(
            x as i32 * spot_width as i32,
            y as i32 * spot_height as i32,
            spot_width,
            spot_height,
        );
        canvas.fill_rect(spot)?;
    }
    canvas.present();
    Ok(())
}
