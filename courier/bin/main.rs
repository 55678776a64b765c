use anyhow::{bail, Context};
use courier::{util, PlanOutcome, Planner, PlannerConfig};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

const USAGE: &str = "usage: courier-plan [MAP] [--config FILE.json] [--seed N]";

#[derive(Default)]
struct Args {
    map: Option<String>,
    config: Option<String>,
    seed: Option<u64>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = Some(it.next().context("--config needs a file")?),
            "--seed" => {
                let seed = it.next().context("--seed needs a number")?;
                args.seed = Some(seed.parse().with_context(|| format!("bad seed {seed}"))?);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option {other}\n{USAGE}"),
            other => args.map = Some(other.to_owned()),
        }
    }
    Ok(args)
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => PlannerConfig::load(path)?,
        None => PlannerConfig::default(),
    };
    let map = match &args.map {
        Some(path) => util::load_map(path)?,
        None => {
            info!("no map given, using the demo map");
            util::demo_map(1000, 700)
        }
    };

    let planner = Planner::new(config);
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = planner.sample_random_safe(Some(&map), &mut rng);
    let goal = planner.sample_random_safe(Some(&map), &mut rng);
    println!("start {start}, destination {goal}");

    match planner.search(start, goal, &map) {
        PlanOutcome::NoRoute => println!("no route"),
        PlanOutcome::Found { waypoints, cost } => {
            println!("{cost} steps");
            for p in waypoints {
                println!("{} {}", p.x, p.y);
            }
        }
    }

    Ok(())
}
