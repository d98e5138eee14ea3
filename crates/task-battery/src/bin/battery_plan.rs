//! Print the full trial plan of one battery task as JSON.
//!
//! Usage:
//!   cargo run --bin battery-plan -- nback task [seed]

use std::env;

use rand::rngs::StdRng;
use rand::SeedableRng;
use task_battery::{build_task, plan_blocks, BlockType, TaskKind};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let kind: TaskKind = args.get(1).map(|s| s.as_str()).unwrap_or("nback").parse()?;
    let block_type: BlockType = args.get(2).map(|s| s.as_str()).unwrap_or("task").parse()?;
    let mut rng = match args.get(3) {
        Some(seed) => StdRng::seed_from_u64(seed.parse()?),
        None => StdRng::from_os_rng(),
    };

    let mut task = build_task(kind, block_type, &mut rng);
    let plan = plan_blocks(task.as_mut(), &mut rng)?;

    eprintln!(
        "{kind} ({block_type:?}): {} blocks, {} trials",
        plan.len(),
        plan.iter().map(|b| b.trials.len()).sum::<usize>()
    );
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
