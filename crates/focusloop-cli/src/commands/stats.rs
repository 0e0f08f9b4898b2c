use focusloop_core::timer::LONG_BREAK_INTERVAL;

use crate::context::{CliResult, Context};

pub fn run() -> CliResult {
    let ctx = Context::load()?;
    let store = ctx.open_store();
    let count = store.completed_focus_count();

    let stats = serde_json::json!({
        "completed_focus_count": count,
        "cycle_position": count % LONG_BREAK_INTERVAL + 1,
        "persistent": store.is_persistent(),
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
