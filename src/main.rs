//! Metaballs headless runner
//!
//! Drives the engine the way a rendering host would and logs what it would
//! hand to the GPU. Usage: `metaballs [config.json] [frames]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use metaballs::{Config, Engine, TimeUpdate, Viewport};

    env_logger::init();
    log::info!("Metaballs (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    let viewport = Viewport::new(1280, 720);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut engine = match Engine::initialize(config, viewport, seed) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let request = engine.sampling_request();
    log::info!(
        "Distance texture slot {} at {}x{}, time texture slot {} at {}x{}",
        request.distance.slot,
        request.distance.width,
        request.distance.height,
        request.time.slot,
        request.time.width,
        request.time.height
    );

    let dt = 1.0 / 60.0;
    for i in 0..frames {
        let frame = engine.on_frame(dt, viewport);
        if let TimeUpdate::Updated(texture) = frame.time {
            log::info!("Clock texture updated: {}", texture.time);
        }
        if i % 60 == 0 {
            log::info!(
                "Frame {}: covered {:.1}%",
                i,
                frame.distance.covered_fraction() * 100.0
            );
        }
    }

    let contour = engine.contour();
    log::info!(
        "Contour vertex buffer slot {}: {} bytes, stride {}",
        contour.slot,
        contour.as_bytes().len(),
        contour.layout().array_stride
    );
    println!(
        "Ran {} frames, {} balls, final contour has {} segments",
        engine.frames(),
        engine.ball_records().len(),
        contour.vertices.len() / 2
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: &str) -> metaballs::Result<metaballs::Config> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| metaballs::Error::Configuration {
            message: format!("cannot read {path}: {e}"),
        })?;
    metaballs::Config::from_json(&json)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
