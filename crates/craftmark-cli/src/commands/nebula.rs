use clap::Args;
use craftmark_core::{Config, NebulaField, ParticleColor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Args)]
pub struct NebulaArgs {
    /// Frames to simulate
    #[arg(long, default_value = "600")]
    frames: u32,
    /// Seed for a reproducible field
    #[arg(long)]
    seed: Option<u64>,
    /// Canvas width in pixels
    #[arg(long, default_value = "390")]
    width: f64,
    /// Canvas height in pixels
    #[arg(long, default_value = "844")]
    height: f64,
}

#[derive(Serialize)]
struct NebulaSummary {
    frames: u32,
    particles: usize,
    cyan: usize,
    pink: usize,
    mean_alpha: f64,
}

pub fn run(args: NebulaArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut field = NebulaField::new(&mut rng, args.width, args.height, config.nebula.particles);
    for _ in 0..args.frames {
        field.step(&mut rng);
    }

    let cyan = field
        .particles()
        .iter()
        .filter(|p| p.color == ParticleColor::Cyan)
        .count();
    let summary = NebulaSummary {
        frames: args.frames,
        particles: field.particles().len(),
        cyan,
        pink: field.particles().len() - cyan,
        mean_alpha: field.mean_alpha(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
