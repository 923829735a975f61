use std::{env, io, process};

use rocks_lang::rocks;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut stdout = io::stdout();
    let mut rocks = rocks::new(&mut stdout);

    match args.len() {
        n if n > 2 => {
            println!("Usage: rocks [script]");
            process::exit(64);
        }
        2 => rocks.run_file(&args[1]),
        _ => rocks.run_prompt(),
    };
}
