use std::fs;
use std::path::Path;
use std::time::Instant;

use ug_compiler::{parse_rule_list, RuleList};

pub fn load_rule_list(path: &Path) -> Result<(RuleList, f64), String> {
    let start = Instant::now();

    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;

    let list = parse_rule_list(&content)
        .map_err(|e| format!("Invalid rule list '{}': {}", path.display(), e))?;

    let load_ms = start.elapsed().as_secs_f64() * 1000.0;
    log::info!(
        "loaded {} groups ({} patterns, {} rejected) from {} in {:.1}ms",
        list.stats.groups,
        list.stats.patterns,
        list.stats.rejected.len(),
        path.display(),
        load_ms
    );

    Ok((list, load_ms))
}
