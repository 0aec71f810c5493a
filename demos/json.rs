use std::io::Read;

use tree_diagram::DrawOptions;

/// Pipe a JSON document into this to see it as a tree:
///
/// `cargo metadata --format-version=1 | cargo run --example json --features json`
fn main() -> std::io::Result<()> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let json: serde_json::Value = serde_json::from_str(&input)?;
    let root = tree_diagram::json::tree("stdin", &json);
    println!("{}", root.draw_options(&DrawOptions::new().border(true)));
    Ok(())
}
