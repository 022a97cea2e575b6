//! `chorebot reset`: Start the rotation over. Stored schedules are kept.

use std::io::{self, BufRead, Write};

pub async fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, engine) = super::load_engine()?;

    if !yes {
        let first = engine.roster().rotate(0, 0);
        print!("Reset the rotation so {first} is next? [y/N] ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    engine.reset().await;
    println!(
        "✅ 輪值已重設，下一個輪到：{}",
        engine.roster().rotate(0, 0)
    );
    Ok(())
}
