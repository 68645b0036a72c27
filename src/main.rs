fn main() {
    if let Err(err) = yolovet::run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
