fn main() {
    if let Err(err) = formbox::cli::run_cli() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
