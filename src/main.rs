fn main() -> anyhow::Result<()> {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
    }

    mixtape::app::run()
}

fn print_help() {
    println!("Mixtape");
    println!("  Enter play, Space pause, n next, b previous");
    println!("  s shuffle, r repeat, / search, : command, Ctrl+C quit");
}
