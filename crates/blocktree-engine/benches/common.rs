// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use blocktree_engine::{Block, BlockBuilder};

#[allow(dead_code)]
pub fn generate_tree(depth: usize, breadth: usize) -> Block {
    generate_level(depth, breadth, &mut 0)
}

#[allow(dead_code)]
fn generate_level(depth: usize, breadth: usize, next_id: &mut usize) -> Block {
    *next_id += 1;
    let mut builder = BlockBuilder::new()
        .with_id(format!("block-{next_id}"))
        .with_type(format!("level{depth}"))
        .with_content("Paragraph with some content.")
        .with_parameter("class", "container")
        .with_parameter("depth", depth.to_string());

    if depth > 1 {
        for _ in 0..breadth {
            builder = builder.with_child(generate_level(depth - 1, breadth, next_id));
        }
    }

    builder.build()
}
