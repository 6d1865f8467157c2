fn main() {
    if let Err(e) = hey_gemini_lib::run() {
        eprintln!("hey-gemini: {}", e);
        std::process::exit(1);
    }
}
