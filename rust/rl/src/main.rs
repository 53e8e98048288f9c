mod algos;
mod environments;
mod export;

use algos::model_based::mdp::{pi::*, vi::*, *};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use environments::grid_adapter::*;
use gridworld::{common::utils::*, maps::TileDistribution, ui, *};
use rand::prelude::*;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    ValueIteration,
    PolicyIteration,
}

impl Algorithm {
    fn default_theta(self) -> Continous {
        match self {
            Algorithm::ValueIteration => VI_THETA,
            Algorithm::PolicyIteration => PI_EVAL_THETA,
        }
    }

    fn default_output(self) -> PathBuf {
        match self {
            Algorithm::ValueIteration => PathBuf::from("value_iteration.csv"),
            Algorithm::PolicyIteration => PathBuf::from("policy_iteration.csv"),
        }
    }
}

/// Solves the grid world MDP with dynamic programming.
#[derive(Parser, Debug)]
#[command(name = "rl")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Algorithm::ValueIteration)]
    algorithm: Algorithm,

    /// Discount factor, in (0, 1].
    #[arg(long, default_value_t = DEFAULT_GAMMA)]
    gamma: Continous,

    /// Convergence threshold. For policy iteration this bounds each evaluation phase.
    #[arg(long)]
    theta: Option<Continous>,

    /// Upper bound on sweeps (value iteration), or on evaluate/improve rounds and the
    /// sweeps of each evaluation (policy iteration). Undiscounted runs default to 10000 sweeps.
    #[arg(long)]
    max_iterations: Option<usize>,

    /// JSON file holding an array of rows of tile labels.
    #[arg(long, conflicts_with = "random_size")]
    map: Option<PathBuf>,

    /// JSON file holding a reward per tile label, e.g. {"White": -0.04, "Brown": -1, "Green": 1}.
    #[arg(long)]
    rewards: Option<PathBuf>,

    /// Solve a randomly generated n x n map instead of the built-in one.
    #[arg(long)]
    random_size: Option<usize>,

    #[arg(long, requires = "random_size")]
    seed: Option<u64>,

    /// Print the map's tile labels before solving.
    #[arg(long)]
    print_map: bool,

    /// Where to write the value history.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let grid = load_map(&cli)?;
    if cli.print_map {
        println!("{}\n", ui::render_labels(&grid));
    }

    let rewards = match &cli.rewards {
        Some(path) => {
            load_rewards(path).with_context(|| format!("loading rewards from {}", path.display()))?
        }
        None => RewardTable::default(),
    };

    let world = Rc::new(GridWorld::new(grid, rewards)?);
    let adapter = Rc::new(GridAdapter::new(Rc::clone(&world), SlipModel::default())?);
    let mdp = Rc::clone(&adapter) as Rc<dyn Mdp>;
    info!(
        rows = world.shape().0,
        cols = world.shape().1,
        states = world.states().len(),
        "grid world ready"
    );

    let theta = check_theta(cli.theta.unwrap_or(cli.algorithm.default_theta()))?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.algorithm.default_output());

    match cli.algorithm {
        Algorithm::ValueIteration => {
            let vi = &mut ValueIteration::new(mdp, cli.gamma)?;
            let (delta, sweeps) = vi.exec(theta, cli.max_iterations)?;
            println!(
                "Theta: {theta}, Final delta: {delta}, Number of iterations: {sweeps}"
            );
            info!(gamma = vi.gamma(), "solved with value iteration");
            report(&adapter, Rc::new(vi.clone()) as Rc<dyn MdpSolver<Continous>>, &output)
        }
        Algorithm::PolicyIteration => {
            let pi = &mut PolicyIteration::new(mdp, cli.gamma)?;
            let (stable, iterations) = pi.exec(theta, cli.max_iterations)?;
            println!(
                "Theta: {theta}, Policy stable: {stable}, Number of iterations: {iterations}"
            );
            info!(gamma = pi.gamma(), "solved with policy iteration");
            report(&adapter, Rc::new(pi.clone()) as Rc<dyn MdpSolver<bool>>, &output)
        }
    }
}

fn load_map(cli: &Cli) -> Result<Grid> {
    if let Some(path) = &cli.map {
        return load_grid(path).with_context(|| format!("loading map from {}", path.display()));
    }

    if let Some(n) = cli.random_size {
        let rng = &mut match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return Ok(TileDistribution::default().generate(n, rng)?);
    }

    Ok(Grid::default())
}

fn report<T: 'static>(
    adapter: &GridAdapter,
    solver: Rc<dyn MdpSolver<T>>,
    output: &Path,
) -> Result<()> {
    let grid = adapter.world().grid();

    println!("\nValues for each state:");
    println!("{}", ui::render_values(solver.values(), grid));

    let policy = MdpSolverPolicy {
        mdp_solver: Rc::clone(&solver),
    };
    println!("\nAgent policy:");
    println!("{}", ui::render_policy(&policy, grid));

    export::export_csv(solver.value_history(), output)
}
