// src/main.rs

// lazy_lambda
// A normal-order lambda calculus with numbers, conditionals, let, letrec and lists.

use std::io::Write;

use clap::{ArgAction, Parser as ClapParser};
use tracing::Level;

use lazy_lambda::{parse, read_program, Interpreter, RunError};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// A script file, or the program text itself. If not provided, launches the REPL.
    input: Option<String>,

    /// Abort evaluation after this many reduction steps.
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Print the parsed term to stderr before evaluating it.
    #[arg(long)]
    ast: bool,

    /// Log more detail to stderr (-v for debug, -vv for every reduction step).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn show_examples() {
    println!("\n--- Examples ---\n");

    let examples = [
        ("Arithmetic", "1-2*3-4"),
        ("Application", "(\\x.x + 1) 5"),
        ("Let and conditionals", "let x = 5 in if x == 5 then x+1 else x-1"),
        ("Factorial (recursive)", "letrec f = \\n. if n==0 then 1 else n*f(n-1) in f 5"),
        ("Lists", "hd (1:2:3:#)"),
        ("Higher-order map", "letrec map = \\f. \\xs. if xs==# then # else (f (hd xs)) : (map f (tl xs)) in map (\\x.x+1) (1:2:3:#)"),
        ("Laziness", "(\\x.5) ((\\x.x x) (\\x.x x))"),
    ];

    for (description, code) in examples.iter() {
        println!("// {}", description);
        println!("{}\n", code);
    }
    println!("----------------\n");
}

fn run(interpreter: &Interpreter, source: &str, show_ast: bool) -> Result<String, RunError> {
    let term = parse(source)?;
    if show_ast {
        eprintln!("{}", term);
    }
    Ok(interpreter.run_term(term)?.to_string())
}

// Simple REPL
fn repl(interpreter: &Interpreter, show_ast: bool) {
    println!("lazy_lambda REPL");
    println!("Enter expressions, 'quit', or ':examples'");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        if std::io::stdout().flush().is_err() {
            break;
        }
        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input_str = input.trim();

        if input_str == "quit" || input_str == "exit" { break; }
        if input_str.is_empty() { continue; }
        if input_str == ":examples" {
            show_examples();
            continue;
        }

        match run(interpreter, input_str, show_ast) {
            Ok(result) => println!("{}", result),
            Err(e) => println!("Error: {}", e),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut interpreter = Interpreter::new();
    if let Some(limit) = cli.max_steps {
        interpreter = interpreter.with_step_limit(limit);
    }

    let Some(input) = cli.input else {
        repl(&interpreter, cli.ast);
        return;
    };

    let result = read_program(&input).and_then(|source| run(&interpreter, &source, cli.ast));
    match result {
        // Only the rendered result goes to stdout.
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
