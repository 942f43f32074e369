fn main() {
    if let Err(err) = napkin_diagrams::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
