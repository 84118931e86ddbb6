use std::path::Path;
use std::process::ExitCode;

use fem1d_solver::problems::{self, ReferenceProblem};
use fem1d_solver::{BackendKind, Fem1dSolver, FemSolution, Mesh, SolverConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_NODES: usize = 11;
const DEFAULT_LEVELS: usize = 5;

fn usage() {
    eprintln!("usage:");
    eprintln!("  fem1d-cli problems");
    eprintln!("  fem1d-cli solve <problem> [n] [options]");
    eprintln!("  fem1d-cli convergence <problem> [n0] [levels] [options]");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --backend <dense_lu|tridiagonal|sparse_cg>");
    eprintln!("  --config <solver.json>");
    eprintln!("  --parallel      assemble element contributions in parallel");
    eprintln!("  --trace         log the stiffness matrix (target fem1d::trace)");
    eprintln!("  --json          print the solution as JSON (solve only)");
}

fn timestamp() {
    println!("{}", chrono::Local::now().format("%d %B %Y %I:%M:%S %p"));
}

#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    config: SolverConfig,
    json: bool,
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut backend: Option<BackendKind> = None;
    let mut trace = false;
    let mut parallel = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--backend" => {
                let value = iter.next().ok_or("--backend requires a value")?;
                backend = Some(value.parse().map_err(|err| format!("{err}"))?);
            }
            "--config" => {
                let path = iter.next().ok_or("--config requires a path")?;
                options.config = load_config(Path::new(path))?;
            }
            "--trace" => trace = true,
            "--parallel" => parallel = true,
            "--json" => options.json = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ => options.positional.push(arg.clone()),
        }
    }

    // Command-line flags override the config file
    if let Some(backend) = backend {
        options.config.backend = backend;
    }
    if trace {
        options.config.trace = true;
    }
    if parallel {
        options.config.parallel_assembly = true;
    }
    Ok(options)
}

fn load_config(path: &Path) -> Result<SolverConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    SolverConfig::from_json_str(&text).map_err(|err| format!("{}: {err}", path.display()))
}

fn problem_arg(options: &Options) -> Result<&'static ReferenceProblem, String> {
    let name = options
        .positional
        .first()
        .ok_or("missing problem name (see `fem1d-cli problems`)")?;
    problems::by_name(name).ok_or_else(|| format!("unknown problem '{name}'"))
}

fn count_arg(options: &Options, index: usize, default: usize, min: usize) -> Result<usize, String> {
    match options.positional.get(index) {
        None => Ok(default),
        Some(raw) => {
            let value: usize = raw
                .parse()
                .map_err(|_| format!("expected a non-negative integer, got '{raw}'"))?;
            if value < min {
                return Err(format!("value {value} must be at least {min}"));
            }
            Ok(value)
        }
    }
}

fn solve_problem(
    problem: &ReferenceProblem,
    n: usize,
    config: &SolverConfig,
) -> Result<FemSolution, String> {
    let mesh = Mesh::uniform(n, 0.0, 1.0).map_err(|err| err.to_string())?;
    Fem1dSolver::new(config.clone())
        .solve(&mesh, &problem.a, &problem.c, &problem.f)
        .map_err(|err| err.to_string())
}

enum Command {
    Solve {
        problem: &'static ReferenceProblem,
        n: usize,
    },
    Convergence {
        problem: &'static ReferenceProblem,
        n0: usize,
        levels: usize,
    },
}

fn parse_command(name: &str, options: &Options) -> Result<Command, String> {
    match name {
        "solve" => Ok(Command::Solve {
            problem: problem_arg(options)?,
            n: count_arg(options, 1, DEFAULT_NODES, 2)?,
        }),
        "convergence" => Ok(Command::Convergence {
            problem: problem_arg(options)?,
            n0: count_arg(options, 1, 5, 2)?,
            levels: count_arg(options, 2, DEFAULT_LEVELS, 1)?,
        }),
        other => Err(format!("unknown command '{other}'")),
    }
}

fn print_problems() {
    for problem in problems::ALL {
        println!("{:<20} {}", problem.name, problem.description);
    }
}

fn run_solve(problem: &ReferenceProblem, n: usize, options: &Options) -> Result<(), String> {
    if options.json {
        let solution = solve_problem(problem, n, &options.config)?;
        let json = serde_json::to_string_pretty(&solution).map_err(|err| err.to_string())?;
        println!("{json}");
        return Ok(());
    }

    timestamp();
    println!();
    println!("problem: {} ({})", problem.name, problem.description);
    println!("nodes: {}", n);
    println!("backend: {}", options.config.backend);
    println!();

    let solution = solve_problem(problem, n, &options.config)?;

    println!("{:>4}  {:>10}  {:>14}  {:>14}  {:>10}", "i", "x", "u", "exact", "error");
    for (i, (&x, &u)) in solution.nodes().iter().zip(&solution.values).enumerate() {
        let exact = (problem.exact)(x);
        println!(
            "{:>4}  {:>10.6}  {:>14.6e}  {:>14.6e}  {:>10.2e}",
            i,
            x,
            u,
            exact,
            (u - exact).abs()
        );
    }
    println!();
    println!("solver: {} ({} iterations)", solution.solver, solution.iterations);
    println!("max nodal error: {:.6e}", solution.max_nodal_error(problem.exact));
    println!("l1 nodal error: {:.6e}", solution.l1_nodal_error(problem.exact));
    println!("l2 error: {:.6e}", solution.l2_error(problem.exact));
    println!(
        "h1 seminorm error: {:.6e}",
        solution.h1_seminorm_error(problem.exact_derivative)
    );
    println!();
    timestamp();
    Ok(())
}

fn run_convergence(
    problem: &ReferenceProblem,
    n0: usize,
    levels: usize,
    options: &Options,
) -> Result<(), String> {
    println!("problem: {} ({})", problem.name, problem.description);
    println!("backend: {}", options.config.backend);
    println!(
        "{:>6}  {:>10}  {:>12}  {:>6}  {:>12}  {:>6}",
        "n", "h", "max nodal", "order", "l2", "order"
    );

    let mut previous: Option<(f64, f64)> = None;
    let mut n = n0;
    for _ in 0..levels {
        let solution = solve_problem(problem, n, &options.config)?;
        let h = 1.0 / (n - 1) as f64;
        let nodal = solution.max_nodal_error(problem.exact);
        let l2 = solution.l2_error(problem.exact);

        let (nodal_order, l2_order) = match previous {
            Some((prev_nodal, prev_l2)) => (
                format!("{:.2}", (prev_nodal / nodal).log2()),
                format!("{:.2}", (prev_l2 / l2).log2()),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        println!(
            "{:>6}  {:>10.4e}  {:>12.4e}  {:>6}  {:>12.4e}  {:>6}",
            n, h, nodal, nodal_order, l2, l2_order
        );

        previous = Some((nodal, l2));
        // Halve the spacing
        n = 2 * n - 1;
    }
    Ok(())
}

/// Run one invocation and return its exit status: 2 for usage errors, 1 when
/// the solve fails.
fn run(args: &[String]) -> u8 {
    if args.len() < 2 {
        usage();
        return 2;
    }

    if args[1] == "problems" {
        print_problems();
        return 0;
    }

    let parsed = parse_options(&args[2..])
        .and_then(|options| parse_command(&args[1], &options).map(|command| (command, options)));
    let (command, options) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}");
            usage();
            return 2;
        }
    };
    tracing::debug!(config = ?options.config, "parsed options");

    let result = match command {
        Command::Solve { problem, n } => run_solve(problem, n, &options),
        Command::Convergence {
            problem,
            n0,
            levels,
        } => run_convergence(problem, n0, levels, &options),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(command = %args[1], backend = %options.config.backend, "{err}");
            1
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    ExitCode::from(run(&args))
}
