fn main() {
    if let Err(error) = tunedeck_cli::run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
