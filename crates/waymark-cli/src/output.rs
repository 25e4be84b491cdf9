//! Console output helpers.

use colored::Colorize;

pub fn print_update(lat: f64, lon: f64) {
    println!(
        "{} {}  {:>10.5}, {:>11.5}",
        chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
        "reported".green().bold(),
        lat,
        lon,
    );
}

pub fn print_error(code: i32, message: &str) {
    eprintln!(
        "{} {}  ({}) {}",
        chrono::Local::now().format("%H:%M:%S").to_string().dimmed(),
        "failed".red().bold(),
        code,
        message,
    );
}
