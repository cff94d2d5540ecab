use clap::Parser;
use measure_tool::{Cli, run};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let session = run(&cli)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&session.measurements)?);
    } else {
        for m in &session.measurements {
            let state = if m.locked { "locked" } else { "live" };
            let note = if m.degenerate { " (below minimum size)" } else { "" };
            println!(
                "{state:>6}  {}  at ({}, {}){note}",
                m.label, m.left, m.top
            );
        }
    }
    Ok(())
}
