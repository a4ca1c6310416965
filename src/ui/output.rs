use crate::ui::theme;
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("🚀 {}", text.style(theme().header.clone()));
}

pub fn info(label: &str, value: &str) {
    println!("ℹ️  {}: {}", label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("✅ {}", label.style(theme().success.clone()));
}

pub fn warn(label: &str) {
    eprintln!("⚠️  {}", label.style(theme().warn.clone()));
}
