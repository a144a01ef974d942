//! `bindc` CLI: inspect how binding expressions lex and parse.

use bindc::commands::{explain_error, lex_expr, parse_expr};

fn print_usage() {
    eprintln!("Usage: bindc <command> <argument>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  lex <expr>       Show the token stream of an expression");
    eprintln!("  parse <expr>     Show the parse tree of an expression");
    eprintln!("  explain <code>   Describe an error code (e.g. E2005)");
}

fn main() {
    bindc::init_tracing();
    let args: Vec<String> = std::env::args().collect();

    let (Some(command), Some(argument)) = (args.get(1), args.get(2)) else {
        print_usage();
        std::process::exit(1);
    };

    match command.as_str() {
        "lex" => print!("{}", lex_expr(argument)),
        "parse" => match parse_expr(argument) {
            Ok(tree) => println!("{tree}"),
            Err(rendered) => {
                eprint!("{rendered}");
                std::process::exit(1);
            }
        },
        "explain" => match explain_error(argument) {
            Ok(text) => println!("{text}"),
            Err(message) => {
                eprintln!("error: {message}");
                std::process::exit(1);
            }
        },
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
