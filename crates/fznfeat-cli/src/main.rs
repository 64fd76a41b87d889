mod cli;
mod commands;


use cli::ExtractParams;

fn main() {
    // Engine warnings (degree-zero constraints, graph timeouts) go to
    // stderr; the feature row owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let matches = cli::build_cli().get_matches();
    let code = match matches.subcommand() {
        Some(("extract", m)) => {
            let params = ExtractParams::from_matches(m);
            commands::extract::run(params.into())
        }
        _ => unreachable!("clap should have caught this"),
    };
    std::process::exit(code);
}
