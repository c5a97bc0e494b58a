fn main() {
    env_logger::init();
    println!("dama v{}, by {}", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_AUTHORS"));

    let perft_mode = std::env::args().nth(1).map_or(false, |arg| arg == "perft");

    // Launches a perft test
    if perft_mode {
        let expected_format = "Expected : perft <depth> [<board>]";
        let depth = match std::env::args().nth(2).and_then(|d| d.parse::<u32>().ok()) {
            Some(d) => d,
            None => {
                eprintln!("{}", expected_format);
                std::process::exit(1)
            }
        };
        let notation = std::env::args().nth(3);

        if let Err(e) = dama::perft(depth, notation) {
            eprintln!("{}", e);
            std::process::exit(1)
        }
    } else {
        dama::shell::Shell::default().run()
    }
}
