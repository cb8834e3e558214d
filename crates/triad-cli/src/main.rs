use colored::Colorize;

fn main() {
    if let Err(err) = triad_cli::run() {
        eprintln!("{} {}", "✗".red(), err);
        std::process::exit(1);
    }
}
