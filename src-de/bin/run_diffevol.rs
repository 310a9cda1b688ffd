use clap::{Parser, ValueEnum};
use diffevol::{
    Boundary, DEConfig, DEConfigBuilder, DEReport, DifferentialEvolution, Mutation, Objective,
    ParallelConfig, Recombination,
};
use ndarray::ArrayView1;
use std::f64::consts::{E, PI};
use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "run_diffevol",
    about = "Run DE/rand/1/bin on a selected benchmark function"
)]
struct Cli {
    /// Benchmark function to optimize
    #[arg(long, value_enum, default_value_t = Benchmark::Sphere)]
    function: Benchmark,

    /// Dimensionality of the problem
    #[arg(long, default_value_t = 2)]
    dim: usize,

    /// Number of individuals in the population (>= 4)
    #[arg(long, default_value_t = 20)]
    popsize: usize,

    /// Number of generations to run
    #[arg(long, default_value_t = 1000)]
    generations: usize,

    /// Fixed differential weight F; overrides the range
    #[arg(long)]
    mutation_factor: Option<f64>,

    /// Lower end of the F range redrawn every generation
    #[arg(long, default_value_t = 0.25)]
    mutation_min: f64,

    /// Upper end of the F range redrawn every generation
    #[arg(long, default_value_t = 0.75)]
    mutation_max: f64,

    /// Fixed crossover probability C; overrides the range
    #[arg(long)]
    recombination: Option<f64>,

    /// Lower end of the C range redrawn every generation
    #[arg(long, default_value_t = 0.25)]
    recombination_min: f64,

    /// Upper end of the C range redrawn every generation
    #[arg(long, default_value_t = 1.0)]
    recombination_max: f64,

    /// Stop once the peak-to-peak spread of the population fitness is below this value (0 disables)
    #[arg(long, default_value_t = 1e-2)]
    tol: f64,

    /// Optional random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Maximize the function instead of minimizing it
    #[arg(long)]
    maximize: bool,

    /// Comma separated list of periodic dimensions, e.g. 0,2
    #[arg(long, value_delimiter = ',')]
    periodic: Vec<usize>,

    /// Clamp trial vectors to the bounds
    #[arg(long)]
    clip: bool,

    /// Disable parallel evaluation of the population
    #[arg(long)]
    no_parallel: bool,

    /// Number of threads for parallel evaluation (0 = rayon's global pool)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Read the optimizer configuration from a JSON file; other optimizer flags are ignored
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print intermediate progress every N generations (0 = never)
    #[arg(long, default_value_t = 10)]
    progress_every: usize,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Benchmark {
    Sphere,
    Rastrigin,
    Rosenbrock,
    Ackley,
}

impl Benchmark {
    fn bounds(self, dim: usize) -> Vec<(f64, f64)> {
        let b = match self {
            Benchmark::Sphere => (-5.0, 5.0),
            Benchmark::Rastrigin => (-5.12, 5.12),
            Benchmark::Rosenbrock => (-2.048, 2.048),
            Benchmark::Ackley => (-32.768, 32.768),
        };
        vec![b; dim]
    }

    fn eval(self, x: ArrayView1<f64>) -> f64 {
        let n = x.len() as f64;
        match self {
            Benchmark::Sphere => x.dot(&x),
            Benchmark::Rastrigin => {
                10.0 * n
                    + x
                        .iter()
                        .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
                        .sum::<f64>()
            }
            Benchmark::Rosenbrock => x
                .windows(2)
                .into_iter()
                .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
                .sum(),
            Benchmark::Ackley => {
                let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
                let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();
                -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
            }
        }
    }
}

fn build_config(args: &Cli) -> diffevol::Result<DEConfig> {
    if let Some(path) = &args.config {
        return DEConfig::from_json_file(path);
    }

    let mutation = match args.mutation_factor {
        Some(f) => Mutation::Factor(f),
        None => Mutation::Range {
            min: args.mutation_min,
            max: args.mutation_max,
        },
    };
    let recombination = match args.recombination {
        Some(c) => Recombination::Rate(c),
        None => Recombination::Range {
            min: args.recombination_min,
            max: args.recombination_max,
        },
    };
    let parallel = ParallelConfig {
        enabled: !args.no_parallel,
        num_threads: if args.threads == 0 {
            None
        } else {
            Some(args.threads)
        },
    };

    let mut builder = DEConfigBuilder::new()
        .popsize(args.popsize)
        .maxiter(args.generations)
        .mutation(mutation)
        .recombination(recombination)
        .periodic(args.periodic.clone())
        .maximize(args.maximize)
        .boundary(if args.clip {
            Boundary::Clip
        } else {
            Boundary::Free
        })
        .parallel(parallel);
    builder = if args.tol > 0.0 {
        builder.tol(args.tol)
    } else {
        builder.convergence(diffevol::Convergence::Disabled)
    };
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    builder.build()
}

fn format_vector(x: ArrayView1<f64>) -> String {
    let mut buffer = String::new();
    for (idx, value) in x.iter().enumerate() {
        if idx > 0 {
            buffer.push_str(", ");
        }
        let _ = write!(&mut buffer, "{value:.6}");
    }
    buffer
}

fn run(args: &Cli) -> diffevol::Result<DEReport> {
    let config = build_config(args)?;
    let generations = config.maxiter;
    let function = args.function;
    let objective = Objective::individual(move |x| function.eval(x)).with_dimension(args.dim);
    let mut de = DifferentialEvolution::new(objective, &function.bounds(args.dim), config)?;

    for generation in de.generations(generations) {
        let g = generation?;
        if args.progress_every > 0 && (g.iter == 1 || g.iter % args.progress_every == 0) {
            println!(
                "iter {:>5} | f(x) = {:>12.6e} | conv = {:>10.3e}",
                g.iter, g.fun, g.convergence
            );
            println!("            x = [{}]", format_vector(g.x.view()));
        }
    }
    de.report()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    if args.dim == 0 {
        eprintln!("Error: problem dimension must be greater than zero.");
        process::exit(2);
    }

    println!("Running DE/rand/1/bin on '{:?}' ({}D)...", args.function, args.dim);
    let start = Instant::now();

    let report = match run(&args) {
        Ok(r) => r,
        Err(e) if e.is_config_error() || e.is_bounds_error() || e.is_dimension_error() => {
            eprintln!("Error: invalid configuration: {}", e);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: optimization failed: {}", e);
            process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: cannot serialize report: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("\nOptimization completed in {:.2?}", start.elapsed());
    println!("Status: {}", report.message);
    println!(
        "Iterations: {} | Evaluations: {} | Success: {}",
        report.nit, report.nfev, report.success
    );
    println!("Best objective: {:.6e}", report.fun);
    println!("Best parameters: [{}]", format_vector(report.x.view()));
}
