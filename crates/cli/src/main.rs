fn main() {
    if let Err(e) = defscope_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
