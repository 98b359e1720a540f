#[pinky::ghost]
mod samples {}

fn main() {}
