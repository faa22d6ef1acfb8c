fn main() {
    if let Err(e) = snowscape::app::run() {
        eprintln!("Snowscape failed to start: {}", e);
        std::process::exit(1);
    }
}
