// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n## Section\nParagraph with some content.\n- Bullet point\n* Another item\n**bold line**\n### Details\n> quoted text\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn long_line(words: usize) -> String {
    let mut line = String::new();
    for i in 0..words {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&format!("word{i}"));
    }
    line
}
