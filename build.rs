use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use std::fs;
use std::path::Path;

include!("src/cli.rs");

fn main() -> std::io::Result<()> {
    let out_dir = Path::new("generate");
    if !out_dir.exists() {
        fs::create_dir_all(out_dir)?;
    }

    let mut cmd = Cli::command();
    let bin_name = "dploy";

    for &shell in &[Shell::Bash, Shell::Fish, Shell::Zsh] {
        generate_to(shell, &mut cmd, bin_name, out_dir)?;
    }

    let man = clap_mangen::Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    fs::write(out_dir.join("dploy.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
