fn main() {
    if let Err(err) = cdr_analytics::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
