use console::{Color, Style};

pub mod style;

/// Renders `message` inside a heavy box drawn with `color`.
///
/// Width is measured in terminal cells so CJK messages line up.
pub fn render_box(message: &str, color: Color) -> String {
    let style = Style::new().fg(color).for_stderr();
    let bar = "━".repeat(console::measure_text_width(message));
    format!(
        "\n{}\n{} {message} {}\n{}\n",
        style.apply_to(format!("┏━{bar}━┓")),
        style.apply_to("┃"),
        style.apply_to("┃"),
        style.apply_to(format!("┗━{bar}━┛")),
    )
}

pub fn print_box(message: &str, color: Color) {
    let rendered = render_box(message, color);
    clx::progress::with_terminal_lock(|| eprintln!("{rendered}"));
}
